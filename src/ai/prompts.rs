use crate::ai::gemini;

pub mod recommendation;

/// A prompt knows how to build a payload for a gemini request
/// and how to parse the response.
pub trait Prompt {
    type Response;

    fn build_payload(&self) -> gemini::GenerateContentRequest;
    fn parse_response(&self, raw_response: String) -> anyhow::Result<Self::Response>;
}

fn build_user_request(prompt: String) -> gemini::GenerateContentRequest {
    gemini::GenerateContentRequest {
        contents: vec![gemini::Content {
            role: Some(String::from("user")),
            parts: vec![gemini::Part { text: Some(prompt) }],
        }],
    }
}
