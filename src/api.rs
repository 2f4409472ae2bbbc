use reqwest::Client;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

/// Response shape of the `/ask` endpoint.
///
/// `answer` is required; a 2xx body without it is a schema error rather than
/// something to render. `sources` is opaque to this client and only parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub sources: Vec<serde_json::Value>,
}

/// Client for the legal assistant backend.
///
/// One POST per question, no retries, no caching. Timeouts are whatever
/// reqwest's transport defaults are.
#[derive(Clone)]
pub struct AskClient {
    client: Client,
    base_url: String,
}

impl AskClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn ask(&self, question: &str) -> Result<AskResponse> {
        let url = format!("{}/ask", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await?;

        if !response.status().is_success() {
            // The backend reports failures as a plain text body.
            let body = response.text().await.unwrap_or_default();
            if body.is_empty() {
                return Err(anyhow!("Server error"));
            }
            return Err(anyhow!(body));
        }

        let answer: AskResponse = response.json().await?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(AskRequest {
            question: "What is IPC 302?",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "question": "What is IPC 302?" }));
    }

    #[test]
    fn test_response_parses_answer_and_sources() {
        let response: AskResponse = serde_json::from_str(
            r#"{"answer": "IPC 302 defines punishment for murder.",
                "sources": [{"title": "IPC", "section": "302"}]}"#,
        )
        .unwrap();
        assert_eq!(response.answer, "IPC 302 defines punishment for murder.");
        assert_eq!(response.sources.len(), 1);
    }

    #[test]
    fn test_sources_are_optional() {
        let response: AskResponse =
            serde_json::from_str(r#"{"answer": "Bail is a release from custody."}"#).unwrap();
        assert!(response.sources.is_empty());
    }

    #[test]
    fn test_missing_answer_is_a_schema_error() {
        let result: std::result::Result<AskResponse, _> =
            serde_json::from_str(r#"{"sources": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = AskClient::new("http://127.0.0.1:8000/");
        assert_eq!(client.base_url, "http://127.0.0.1:8000");
    }
}
