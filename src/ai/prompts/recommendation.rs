use crate::{ai::gemini, domain::FarmRequest};

use super::Prompt;

pub struct RecommendationPrompt {
    request: FarmRequest,
}

impl RecommendationPrompt {
    pub fn new(request: &FarmRequest) -> Self {
        Self {
            request: request.trimmed(),
        }
    }

    pub fn text(&self) -> String {
        build_recommendation_prompt(&self.request)
    }
}

impl Prompt for RecommendationPrompt {
    type Response = String;

    fn build_payload(&self) -> gemini::GenerateContentRequest {
        super::build_user_request(self.text())
    }

    // Shown to the user as-is, nothing to pull out of it.
    fn parse_response(&self, raw_response: String) -> anyhow::Result<String> {
        Ok(raw_response)
    }
}

fn build_recommendation_prompt(request: &FarmRequest) -> String {
    let focus_areas = if request.concerns.is_empty() {
        "General recommendations".to_string()
    } else {
        request
            .concerns
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let additional_context = if request.additional_info.is_empty() {
        "None"
    } else {
        request.additional_info.as_str()
    };

    format!(
        "As an expert agricultural consultant, provide comprehensive farming recommendations based on the following details:

**Location & Environment:**
- Location: {}
- Climate Type: {}
- Soil Type: {}

**Crop Information:**
- Crop: {}
- Current Stage: {}
- Farm Size: {:?} acres

**Farming Practices:**
- Farming Type: {}
- Irrigation Method: {}
- Budget Level: {}

**Focus Areas:** {}

**Additional Context:** {}

Please provide:
1. **Stage-Specific Recommendations**: Detailed advice for the current crop stage
2. **Pest & Disease Management**: Prevention and treatment strategies
3. **Fertilizer & Nutrition**: NPK requirements and application schedule
4. **Water Management**: Irrigation frequency and quantity
5. **Expected Timeline**: Key dates and milestones
6. **Cost Estimates**: Approximate costs for recommended interventions
7. **Best Practices**: Tips for maximizing yield and quality
8. **Risk Alerts**: Potential challenges to watch for

Format the response clearly with sections and bullet points for easy reading.",
        request.location,
        request.climate,
        request.soil_type,
        request.crop,
        request.stage,
        request.farm_size,
        request.farming_type,
        request.irrigation,
        request.budget,
        focus_areas,
        additional_context,
    )
}
