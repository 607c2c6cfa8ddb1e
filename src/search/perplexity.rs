//! Perplexity `/search` API client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;

use super::{SearchOutcome, SearchProvider};
use crate::errors::SearchFailure;
use crate::model::SearchHit;
use crate::util::{domain_from_url, truncate_chars};

pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

pub struct PerplexityClient {
    client: Client,
    endpoint: String,
    api_key: String,
    max_results: usize,
}

impl PerplexityClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        max_results: usize,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/search", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            max_results,
        })
    }

    async fn try_search(&self, query: &str) -> Result<Vec<SearchHit>, SearchFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_failure)?;

        match status.as_u16() {
            200 => self.parse_results(&body),
            401 => Err(SearchFailure::Authentication),
            429 => Err(SearchFailure::RateLimited),
            code => Err(SearchFailure::Http {
                status: code,
                body: truncate_chars(&body, 200).to_string(),
            }),
        }
    }

    fn parse_results(&self, body: &str) -> Result<Vec<SearchHit>, SearchFailure> {
        let data: Value = serde_json::from_str(body)
            .map_err(|_| SearchFailure::MalformedResponse(truncate_chars(body, 200).to_string()))?;

        let items = match data.get("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SearchFailure::MalformedResponse(
                    truncate_chars(&data.to_string(), 200).to_string(),
                ));
            }
        };
        if items.is_empty() {
            return Err(SearchFailure::NoResults);
        }

        let field = |item: &Value, key: &str, fallback: &str| {
            item.get(key)
                .and_then(Value::as_str)
                .unwrap_or(fallback)
                .to_string()
        };

        Ok(items
            .iter()
            .take(self.max_results)
            .enumerate()
            .map(|(i, item)| {
                let url = field(item, "url", "No URL");
                SearchHit {
                    position: i as u32 + 1,
                    title: field(item, "title", "No title"),
                    domain: domain_from_url(&url),
                    url,
                    snippet: field(item, "snippet", ""),
                }
            })
            .collect())
    }
}

fn transport_failure(e: reqwest::Error) -> SearchFailure {
    if e.is_timeout() {
        SearchFailure::Timeout
    } else {
        SearchFailure::Transport(e.to_string())
    }
}

#[async_trait]
impl SearchProvider for PerplexityClient {
    async fn search(&self, query: &str) -> SearchOutcome {
        let result = self.try_search(query).await;
        match &result {
            Ok(hits) => tracing::debug!(query, hits = hits.len(), "Search succeeded"),
            Err(failure) => tracing::debug!(query, kind = failure.kind(), "Search failed"),
        }
        SearchOutcome::from_result(query, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::http::header::AUTHORIZATION;
    use axum::routing::post;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base: &str) -> PerplexityClient {
        PerplexityClient::new(base, "pplx-test", Duration::from_secs(5), 10).unwrap()
    }

    #[tokio::test]
    async fn test_successful_search_is_normalized() {
        let router = Router::new().route(
            "/search",
            post(|headers: axum::http::HeaderMap, axum::Json(body): axum::Json<Value>| async move {
                assert_eq!(headers[AUTHORIZATION], "Bearer pplx-test");
                assert_eq!(body["query"], "unemployment 2024");
                let results: Vec<Value> = (0..12)
                    .map(|i| json!({"title": format!("r{}", i), "url": format!("https://bls.gov/{}", i), "snippet": "s"}))
                    .collect();
                axum::Json(json!({ "results": results }))
            }),
        );
        let base = serve(router).await;
        let out = client(&base).search("unemployment 2024").await;
        assert!(out.success);
        assert_eq!(out.count, 10);
        assert_eq!(out.results[0].position, 1);
        assert_eq!(out.results[9].position, 10);
        assert_eq!(out.results[0].domain, "bls.gov");
    }

    #[tokio::test]
    async fn test_missing_fields_get_placeholders() {
        let router = Router::new().route(
            "/search",
            post(|| async { axum::Json(json!({"results": [{}]})) }),
        );
        let base = serve(router).await;
        let out = client(&base).search("q").await;
        assert_eq!(out.results[0].title, "No title");
        assert_eq!(out.results[0].url, "No URL");
        assert_eq!(out.results[0].domain, "unknown");
    }

    #[tokio::test]
    async fn test_failure_cases_are_distinguished() {
        let router = Router::new()
            .route("/empty/search", post(|| async { axum::Json(json!({"results": []})) }))
            .route("/odd/search", post(|| async { axum::Json(json!({"answer": 42})) }))
            .route("/auth/search", post(|| async { StatusCode::UNAUTHORIZED }))
            .route("/limit/search", post(|| async { StatusCode::TOO_MANY_REQUESTS }))
            .route(
                "/down/search",
                post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            );
        let base = serve(router).await;

        let cases = [
            ("empty", "no_results"),
            ("odd", "malformed_response"),
            ("auth", "authentication"),
            ("limit", "rate_limited"),
            ("down", "http"),
        ];
        for (path, kind) in cases {
            let out = client(&format!("{}/{}", base, path)).search("q").await;
            assert!(!out.success, "{}", path);
            assert_eq!(out.failure.as_ref().unwrap().kind(), kind, "{}", path);
            assert!(out.results.is_empty());
        }
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let router = Router::new().route(
            "/search",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                axum::Json(json!({"results": []}))
            }),
        );
        let base = serve(router).await;
        let client =
            PerplexityClient::new(&base, "k", Duration::from_millis(100), 10).unwrap();
        let out = client.search("q").await;
        assert_eq!(out.failure, Some(SearchFailure::Timeout));
        assert_eq!(out.error.as_deref(), Some("Request timeout"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let client = client("http://127.0.0.1:1");
        let out = client.search("q").await;
        assert!(!out.success);
        assert_eq!(out.failure.unwrap().kind(), "transport");
    }
}
