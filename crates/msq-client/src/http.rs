//! HTTP client for the suggestion endpoint.
//!
//! One request per call:
//!
//! ```text
//! GET {base_url}{path}?term=<term>&type=<mode>
//! Accept: application/json
//! ```
//!
//! Query values are form-urlencoded. Any status outside 2xx fails with
//! [`SuggestError::Status`] without reading the body. A 2xx body is decoded
//! strictly into a [`SuggestionResult`].
//!
//! Only plain `http://` endpoints are supported.

use crate::SuggestClient;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{header::ACCEPT, Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use msq_core::{config::ApiConfig, SuggestError, SuggestionRequest, SuggestionResult};
use std::time::Duration;
use url::Url;

/// Suggestion client over a pooled hyper connection.
#[derive(Clone)]
pub struct HttpSuggestClient {
    client: Client<HttpConnector, Empty<Bytes>>,
    endpoint: Url,
    /// `None` when `timeout_secs = 0`.
    timeout: Option<Duration>,
}

impl HttpSuggestClient {
    /// Build a client for the endpoint described by `api`.
    ///
    /// Fails with [`SuggestError::Endpoint`] if the base URL does not parse or
    /// is not `http://`.
    pub fn new(api: &ApiConfig) -> Result<Self, SuggestError> {
        let endpoint = endpoint_url(&api.base_url, &api.path)?;
        let timeout = (api.timeout_secs > 0).then(|| Duration::from_secs(api.timeout_secs));
        tracing::debug!(endpoint = %endpoint, ?timeout, "suggestion client ready");
        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            endpoint,
            timeout,
        })
    }

    /// Endpoint without query string.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URI for `request`.
    pub fn request_uri(&self, request: &SuggestionRequest) -> Result<Uri, SuggestError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("term", &request.term)
            .append_pair("type", request.mode.as_wire());
        url.as_str()
            .parse::<Uri>()
            .map_err(|e| SuggestError::Endpoint(format!("{url}: {e}")))
    }

    async fn exchange(&self, uri: Uri) -> Result<SuggestionResult, SuggestError> {
        let req = Request::get(uri)
            .header(ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| SuggestError::Endpoint(e.to_string()))?;

        let response = self
            .client
            .request(req)
            .await
            .map_err(|e| SuggestError::Network(error_chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Status(status.as_u16()));
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| SuggestError::Network(error_chain(&e)))?
            .to_bytes();

        SuggestionResult::from_json(&body)
    }
}

impl SuggestClient for HttpSuggestClient {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<SuggestionResult, SuggestError> {
        let uri = self.request_uri(request)?;
        tracing::debug!(%uri, mode = %request.mode, "suggestion request");

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.exchange(uri)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(SuggestError::Timeout(limit.as_secs())),
            },
            None => self.exchange(uri).await,
        };

        match &outcome {
            Ok(result) => tracing::debug!(
                groups = result.entries.len(),
                terms = result.term_count(),
                "suggestion response"
            ),
            Err(err) => tracing::warn!(error = %err, "suggestion request failed"),
        }
        outcome
    }
}

/// Join `base_url` and `path` into the endpoint URL.
///
/// The path is appended to whatever path `base_url` already has, so a service
/// mounted under a prefix (`http://host/mesh-api`) keeps its prefix.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url, SuggestError> {
    let base = Url::parse(base_url)
        .map_err(|e| SuggestError::Endpoint(format!("{base_url}: {e}")))?;
    if base.scheme() != "http" {
        return Err(SuggestError::Endpoint(format!(
            "{base_url}: only http:// endpoints are supported"
        )));
    }

    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| SuggestError::Endpoint(format!("{joined}: {e}")))
}

/// `Display` of an error followed by each of its sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = inner.source();
    }
    msg
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use msq_core::Mode;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn client() -> HttpSuggestClient {
        HttpSuggestClient::new(&ApiConfig::default()).unwrap()
    }

    fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
        let url = Url::parse(&uri.to_string()).unwrap();
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn default_endpoint() {
        assert_eq!(
            client().endpoint().as_str(),
            "http://127.0.0.1:5000/api/v1/resources/mesh"
        );
    }

    #[test]
    fn base_url_prefix_is_kept() {
        let url = endpoint_url("http://example.test/mesh-api/", "/api/v1/resources/mesh").unwrap();
        assert_eq!(url.as_str(), "http://example.test/mesh-api/api/v1/resources/mesh");
    }

    #[test]
    fn https_is_rejected() {
        let err = endpoint_url("https://example.test", "/x").unwrap_err();
        assert!(matches!(err, SuggestError::Endpoint(_)));
    }

    #[test]
    fn garbage_base_url_is_rejected() {
        assert!(matches!(
            endpoint_url("not a url", "/x"),
            Err(SuggestError::Endpoint(_))
        ));
    }

    #[test]
    fn uri_carries_term_and_type() {
        let uri = client()
            .request_uri(&SuggestionRequest::new("fever$cough", Mode::MetaMap))
            .unwrap();
        assert_eq!(uri.path(), "/api/v1/resources/mesh");
        assert_eq!(uri.query(), Some("term=fever%24cough&type=MetaMap"));
    }

    #[test]
    fn empty_term_is_still_sent() {
        let uri = client()
            .request_uri(&SuggestionRequest::new("", Mode::ATM))
            .unwrap();
        assert_eq!(
            query_pairs(&uri),
            vec![("term".into(), "".into()), ("type".into(), "ATM".into())]
        );
    }

    #[test]
    fn zero_timeout_disables_limit() {
        let api = ApiConfig { timeout_secs: 0, ..ApiConfig::default() };
        assert!(HttpSuggestClient::new(&api).unwrap().timeout.is_none());
    }

    proptest! {
        #[test]
        fn any_term_survives_encoding(term in "\\PC{0,40}", idx in 0usize..6) {
            let mode = Mode::ALL[idx];
            let uri = client().request_uri(&SuggestionRequest::new(term.clone(), mode)).unwrap();
            prop_assert_eq!(
                query_pairs(&uri),
                vec![("term".to_string(), term), ("type".to_string(), mode.as_wire().to_string())]
            );
        }
    }
}
