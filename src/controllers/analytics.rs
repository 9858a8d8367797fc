use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use std::sync::Mutex;

use crate::{
    analytics::{self, Analytics},
    app::FarmingAssistantApp,
    session::{self, Session},
};

pub const NO_DATA_MESSAGE: &str =
    "No data available yet. Generate some recommendations to see analytics!";

#[derive(Serialize, Debug)]
pub struct AnalyticsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Analytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct AnalyticsController;

impl AnalyticsController {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, session: &Mutex<Session>) -> AnalyticsResponse {
        let summary = analytics::summarize(session::lock(session).log.all());

        match summary {
            Some(summary) => AnalyticsResponse {
                summary: Some(summary),
                message: None,
            },
            None => AnalyticsResponse {
                summary: None,
                message: Some(NO_DATA_MESSAGE.to_string()),
            },
        }
    }
}

impl Default for AnalyticsController {
    fn default() -> Self {
        Self::new()
    }
}

#[get("/analytics")]
pub async fn analytics_handler(app: web::Data<&'static FarmingAssistantApp>) -> impl Responder {
    HttpResponse::Ok().json(app.analytics_controller.summarize(&app.session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FarmRequest;
    use chrono::NaiveDate;

    fn session_with(crops: &[&str]) -> Mutex<Session> {
        let mut session = Session::default();
        for (i, crop) in crops.iter().enumerate() {
            let timestamp = NaiveDate::from_ymd_opt(2025, 2, 2)
                .unwrap()
                .and_hms_opt(10, i as u32, 0)
                .unwrap();
            let request = FarmRequest {
                location: "Punjab".to_string(),
                crop: crop.to_string(),
                ..FarmRequest::default()
            };
            session.log.append(timestamp, &request, "advice".to_string());
        }
        Mutex::new(session)
    }

    #[test]
    fn test_empty_log_has_message() {
        let response = AnalyticsController::new().summarize(&session_with(&[]));

        assert!(response.summary.is_none());
        assert_eq!(response.message.as_deref(), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_summary() {
        let response =
            AnalyticsController::new().summarize(&session_with(&["wheat", "rice", "wheat"]));

        let summary = response.summary.unwrap();
        assert!(response.message.is_none());
        assert_eq!(summary.total_queries, 3);
        assert_eq!(summary.unique_crops, 2);
        assert_eq!(summary.most_queried_crop, "wheat");
        assert_eq!(summary.recent[0].crop, "wheat");
    }
}
