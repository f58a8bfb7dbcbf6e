//! Domain-specific assertion macros for msq harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that show the
//! whole form state, so it is clear which part of the form went wrong.

/// Assert the form's phase.
///
/// ```rust
/// assert_phase!(state, Phase::Success);
/// ```
#[macro_export]
macro_rules! assert_phase {
    ($state:expr, $phase:expr) => {{
        let state: &msq_core::FormState = &$state;
        let expected: msq_core::Phase = $phase;
        if state.phase() != expected {
            panic!(
                "assert_phase! failed:\n  expected: {:?}\n  actual:   {:?}\n  state: {:#?}",
                expected,
                state.phase(),
                state
            );
        }
    }};
}

/// Assert the draft query text exactly.
#[macro_export]
macro_rules! assert_draft {
    ($state:expr, $draft:expr) => {{
        let state: &msq_core::FormState = &$state;
        pretty_assertions::assert_eq!(state.draft.as_str(), $draft, "draft mismatch");
    }};
}

/// Assert that the form holds an error whose message contains `needle`.
#[macro_export]
macro_rules! assert_error_contains {
    ($state:expr, $needle:expr) => {{
        let state: &msq_core::FormState = &$state;
        let needle: &str = $needle;
        match state.error.as_deref() {
            Some(msg) if msg.contains(needle) => {}
            Some(msg) => panic!(
                "assert_error_contains! failed:\n  expected substring: {:?}\n  actual message:     {:?}",
                needle, msg
            ),
            None => panic!(
                "assert_error_contains! failed: no error set (phase {:?})",
                state.phase()
            ),
        }
    }};
}

/// Assert a recorded request carried `key=value`.
#[macro_export]
macro_rules! assert_query_param {
    ($request:expr, $key:expr, $value:expr) => {{
        let request = &$request;
        let key: &str = $key;
        match request.param(key) {
            Some(actual) => pretty_assertions::assert_eq!(actual, $value, "query parameter {:?}", key),
            None => panic!(
                "assert_query_param! failed: {:?} missing.\n  params: {:?}",
                key, request.params
            ),
        }
    }};
}
