use self::{
    gemini::{ApiKey, Gemini},
    prompts::recommendation::RecommendationPrompt,
};
use crate::domain::FarmRequest;
use mockall::automock;

pub mod gemini;
mod prompts;

pub struct Ai {
    pub gemini: Gemini,
}

#[automock]
impl Ai {
    pub fn new(gemini: Gemini) -> Self {
        Self { gemini }
    }

    // One call to gemini, the recommendation text comes back untouched.
    pub async fn fetch_recommendation(
        &self,
        api_key: &ApiKey,
        request: &FarmRequest,
    ) -> anyhow::Result<String> {
        self.gemini
            .execute(api_key, RecommendationPrompt::new(request))
            .await
    }
}
