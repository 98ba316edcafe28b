//! HttpSuggestService -- concrete [`SuggestService`] over the
//! recommendation endpoint.
//!
//! `POST /api/chat/recommend` with chat content or context-window
//! entities; the caller (the recommendation scheduler) degrades any
//! error returned here to an empty list.

use std::time::Duration;

use mnema_core::client::SuggestService;
use mnema_types::error::GraphError;
use mnema_types::graph::{Suggestion, SuggestionRequest, SuggestionResponse};

/// Follow-up prompt recommendations over HTTP.
pub struct HttpSuggestService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSuggestService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: super::build_client(timeout),
            base_url: super::trim_base_url(base_url.into()),
        }
    }

    fn url(&self) -> String {
        format!("{}/api/chat/recommend", self.base_url)
    }
}

impl SuggestService for HttpSuggestService {
    async fn suggest(&self, request: SuggestionRequest) -> Result<Vec<Suggestion>, GraphError> {
        let url = self.url();
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GraphError::Http(format!("POST {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Http(format!("HTTP {status}: {body}")));
        }

        let parsed: SuggestionResponse = response
            .json()
            .await
            .map_err(|e| GraphError::Deserialization(e.to_string()))?;
        Ok(parsed.suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_url() {
        let service = HttpSuggestService::new("http://127.0.0.1:8000/", Duration::from_secs(5));
        assert_eq!(service.url(), "http://127.0.0.1:8000/api/chat/recommend");
    }
}
