//! HTTP plumbing: a reqwest client with a response cache and retry policy.

use reqwest::{Client, Url};

use crate::{
    config::HttpConfig,
    error::{Result, Stage, WeatherError},
};

pub mod cache;
pub mod retry;

pub use cache::ResponseCache;
pub use retry::RetryPolicy;

pub const USER_AGENT: &str = concat!("meteo/", env!("CARGO_PKG_VERSION"));

/// Client for cacheable GET requests. Only 2xx bodies are cached.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    cache: ResponseCache,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> reqwest::Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: Client, config: &HttpConfig) -> Self {
        Self {
            http,
            cache: ResponseCache::new(&config.cache_path, config.expire_after()),
            retry: RetryPolicy::new(config.retries, config.backoff_factor),
        }
    }

    /// GET `url` and return its body, serving fresh cached copies without a request.
    pub async fn get_text(&self, url: &Url, stage: Stage) -> Result<String> {
        if let Some(body) = self.cache.get(url.as_str()) {
            tracing::debug!(%url, "cache hit");
            return Ok(body);
        }

        tracing::debug!(%url, "cache miss, sending request");

        let res = retry::with_retry(&self.retry, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| WeatherError::network(stage, e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::network(stage, format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::network(
                stage,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        if let Err(e) = self.cache.put(url.as_str(), &body) {
            tracing::warn!(
                path = %self.cache.path().display(),
                "Failed to write response cache: {e}"
            );
        }

        Ok(body)
    }
}

/// Build `base?params` or report the bad endpoint as a network failure of `stage`.
pub(crate) fn endpoint_url<I, K, V>(base: &str, params: I, stage: Stage) -> Result<Url>
where
    I: IntoIterator,
    I::Item: std::borrow::Borrow<(K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Url::parse_with_params(base, params)
        .map_err(|e| WeatherError::network(stage, format!("invalid endpoint {base:?}: {e}")))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("{\"error\":true}"), "{\"error\":true}");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }

    #[test]
    fn endpoint_url_encodes_params() {
        let url = endpoint_url(
            "https://example.test/v1/search",
            &[("name", "São Paulo"), ("count", "1")],
            Stage::Geocoding,
        )
        .expect("valid url");

        assert_eq!(url.path(), "/v1/search");
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "São Paulo".to_string()),
                ("count".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn endpoint_url_rejects_bad_base() {
        let err = endpoint_url("not a url", &[("a", "b")], Stage::Weather).unwrap_err();

        assert_eq!(err.stage(), Stage::Weather);
        assert!(err.to_string().contains("invalid endpoint"));
    }
}
