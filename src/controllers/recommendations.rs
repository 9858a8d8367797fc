use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Local;
use mockall_double::double;
use serde::Serialize;
use std::sync::Mutex;
use tracing::{info, warn};

#[double]
use crate::ai::Ai;
use crate::{
    ai::gemini::{ApiKey, KeyRejected},
    app::FarmingAssistantApp,
    domain::{FarmRequest, FormOptions, QueryRecord},
    download,
    error::AdvisorError,
    session::{self, Session},
};

#[derive(Serialize, Debug)]
pub struct RecommendationResponse {
    pub record: QueryRecord,
    pub file_name: String,
    pub download_url: String,
}

pub struct RecommendationsController {
    pub ai: Ai,
}

impl RecommendationsController {
    pub fn new(ai: Ai) -> Self {
        Self { ai }
    }

    pub async fn create(
        &self,
        session: &Mutex<Session>,
        payload: FarmRequest,
    ) -> Result<RecommendationResponse, AdvisorError> {
        info!("{payload:?}");

        // Nothing goes over the network until the form is usable.
        payload.validate()?;
        let request = payload.trimmed();
        drop(payload); // Don't use the untrimmed payload by mistake

        let api_key = session::lock(session)
            .api_key
            .clone()
            .ok_or(AdvisorError::ApiKeyMissing)?;

        // The session is not locked while waiting on the model.
        let recommendation = match self.ai.fetch_recommendation(&api_key, &request).await {
            Ok(recommendation) => recommendation,
            Err(e) => return Err(handle_failure(session, &api_key, e)),
        };

        let mut session = session::lock(session);
        let record = session
            .log
            .append(Local::now().naive_local(), &request, recommendation)
            .clone();
        info!(
            "Stored recommendation {} for {} in {}",
            record.id, record.crop, record.location
        );

        Ok(RecommendationResponse {
            file_name: download::recommendation_file_name(&record),
            download_url: format!("/recommendations/{}/download", record.id),
            record,
        })
    }

    pub fn download(&self, session: &Mutex<Session>, id: usize) -> Result<HttpResponse, AdvisorError> {
        let session = session::lock(session);
        let record = session.log.get(id).ok_or(AdvisorError::NotFound(id))?;

        Ok(super::text_attachment(
            record,
            download::recommendation_file_name(record),
        ))
    }
}

/// A rejected key halts the session: it is forgotten so every later
/// submission fails fast until the user enters a new one.
fn handle_failure(session: &Mutex<Session>, used_key: &ApiKey, e: anyhow::Error) -> AdvisorError {
    if let Some(KeyRejected(message)) = e.downcast_ref::<KeyRejected>() {
        warn!("Gemini rejected the api key: {message}");

        let mut session = session::lock(session);
        // Only forget the key that failed, not one set while we were waiting.
        if session.api_key.as_ref() == Some(used_key) {
            session.api_key = None;
        }

        return AdvisorError::ApiConfiguration(message.clone());
    }

    warn!("Error generating recommendations: {e:#}");
    AdvisorError::ApiCall(format!("{e:#}"))
}

#[get("/recommendations/options")]
pub async fn recommendation_options_handler() -> impl Responder {
    HttpResponse::Ok().json(FormOptions::build())
}

#[post("/recommendations")]
pub async fn create_recommendation_handler(
    web::Json(payload): web::Json<FarmRequest>,
    app: web::Data<&'static FarmingAssistantApp>,
) -> Result<impl Responder, AdvisorError> {
    let response = app
        .recommendations_controller
        .create(&app.session, payload)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[get("/recommendations/{id}/download")]
pub async fn download_recommendation_handler(
    id: web::Path<usize>,
    app: web::Data<&'static FarmingAssistantApp>,
) -> Result<impl Responder, AdvisorError> {
    app.recommendations_controller
        .download(&app.session, id.into_inner())
}
