use anyhow::{anyhow, Context};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::prompts::Prompt;
use crate::error::AdvisorError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// A Gemini key supplied at runtime.  Held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn parse(raw: &str) -> Result<Self, AdvisorError> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(AdvisorError::ApiKeyMissing);
        }
        if key.chars().any(|c| c.is_whitespace() || !c.is_ascii()) {
            return Err(AdvisorError::InvalidInput(
                "API key must be a single token of ASCII characters".to_string(),
            ));
        }

        Ok(Self(key.to_string()))
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// The provider refused the key, as opposed to any other call failure.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct KeyRejected(pub String);

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    status: Option<String>,
}

pub struct Gemini {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl Gemini {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Builds the payload, calls the model and parses what comes back.
    pub async fn execute<P: Prompt>(
        &self,
        api_key: &ApiKey,
        prompt: P,
    ) -> anyhow::Result<P::Response> {
        let raw_response = self.call_model(api_key, prompt.build_payload()).await?;
        prompt.parse_response(raw_response)
    }

    // Calls the model once, no retries.  Gets a String back.
    pub async fn call_model(
        &self,
        api_key: &ApiKey,
        payload: GenerateContentRequest,
    ) -> anyhow::Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key.expose())
            .json(&payload)
            .send()
            .await
            .with_context(|| "Failed to call gemini generateContent endpoint")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| "Failed to extract text from gemini response body")?;

        if status != StatusCode::OK {
            return Err(classify_failure(status, &body));
        }

        extract_text(&body)
    }
}

/// Turns a non-200 reply into an error, marking key problems with
/// [`KeyRejected`] so callers can tell them apart.
pub fn classify_failure(status: StatusCode, body: &str) -> anyhow::Error {
    let detail = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| body.to_string());

    let key_problem = status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || (status == StatusCode::BAD_REQUEST && body.contains("API_KEY_INVALID"));

    if key_problem {
        return anyhow!(KeyRejected(message));
    }

    let code = detail
        .and_then(|d| d.status)
        .unwrap_or_else(|| status.as_u16().to_string());
    anyhow!("Error calling gemini ({code}): {message}")
}

/// Joins the text parts of the first candidate.  The text itself is passed
/// through untouched.
pub fn extract_text(body: &str) -> anyhow::Result<String> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).with_context(|| "Failed to parse gemini response")?;

    let candidate = match parsed.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            let reason = parsed
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "unknown".to_string());
            return Err(anyhow!("no candidates in response, block reason: {reason}"));
        }
    };

    let content = match candidate.content {
        Some(content) => content,
        None => return Err(anyhow!("no content in candidate")),
    };

    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        return Err(anyhow!("no text in candidate content"));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_parse() {
        let key = ApiKey::parse("  AIzaSyExample  ").unwrap();
        assert_eq!(key.expose(), "AIzaSyExample");

        assert!(matches!(
            ApiKey::parse("   "),
            Err(AdvisorError::ApiKeyMissing)
        ));
        assert!(matches!(
            ApiKey::parse("two words"),
            Err(AdvisorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::parse("AIzaSecret").unwrap();
        assert!(!format!("{key:?}").contains("Secret"));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r###"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "## Stage\n"}, {"text": "- Irrigate weekly"}]
                },
                "finishReason": "STOP"
            }]
        }"###;

        assert_eq!(extract_text(body).unwrap(), "## Stage\n- Irrigate weekly");
    }

    #[test]
    fn test_extract_text_blocked() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;

        let err = extract_text(body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_extract_text_garbage() {
        assert!(extract_text("<html>oops</html>").is_err());
    }

    #[test]
    fn test_classify_invalid_key() {
        let body = r#"{
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{"reason": "API_KEY_INVALID"}]
            }
        }"#;

        let err = classify_failure(StatusCode::BAD_REQUEST, body);
        let rejected = err.downcast_ref::<KeyRejected>().unwrap();
        assert_eq!(rejected.0, "API key not valid. Please pass a valid API key.");

        let err = classify_failure(StatusCode::FORBIDDEN, "denied");
        assert!(err.downcast_ref::<KeyRejected>().is_some());
    }

    #[test]
    fn test_classify_other_failure() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;

        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, body);
        assert!(err.downcast_ref::<KeyRejected>().is_none());
        assert_eq!(
            err.to_string(),
            "Error calling gemini (RESOURCE_EXHAUSTED): Quota exceeded"
        );

        let err = classify_failure(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "Error calling gemini (502): upstream down");
    }
}
