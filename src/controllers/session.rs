use actix_web::{delete, get, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

use crate::{
    ai::gemini::ApiKey,
    app::FarmingAssistantApp,
    error::AdvisorError,
    session::{self, Session},
};

#[derive(Deserialize)]
pub struct ApiKeyRequest {
    api_key: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct SessionStatus {
    pub api_key_configured: bool,
    pub total_queries: usize,
    pub model: String,
}

pub struct SessionController {
    pub model: String,
}

impl SessionController {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }

    pub fn status(&self, session: &Mutex<Session>) -> SessionStatus {
        let session = session::lock(session);

        SessionStatus {
            api_key_configured: session.api_key.is_some(),
            total_queries: session.log.len(),
            model: self.model.clone(),
        }
    }

    pub fn set_api_key(&self, session: &Mutex<Session>, raw_key: &str) -> Result<(), AdvisorError> {
        let api_key = ApiKey::parse(raw_key)?;

        session::lock(session).api_key = Some(api_key);
        info!("API key configured for session");

        Ok(())
    }

    pub fn forget_api_key(&self, session: &Mutex<Session>) {
        session::lock(session).api_key = None;
        info!("API key removed from session");
    }
}

#[get("/session")]
pub async fn session_status_handler(app: web::Data<&'static FarmingAssistantApp>) -> impl Responder {
    HttpResponse::Ok().json(app.session_controller.status(&app.session))
}

// The key is never logged or written anywhere, so no Debug on the request.
#[put("/session/api_key")]
pub async fn set_api_key_handler(
    web::Json(payload): web::Json<ApiKeyRequest>,
    app: web::Data<&'static FarmingAssistantApp>,
) -> Result<impl Responder, AdvisorError> {
    app.session_controller
        .set_api_key(&app.session, &payload.api_key)?;

    Ok(HttpResponse::NoContent().finish())
}

#[delete("/session/api_key")]
pub async fn forget_api_key_handler(app: web::Data<&'static FarmingAssistantApp>) -> impl Responder {
    app.session_controller.forget_api_key(&app.session);
    HttpResponse::NoContent().finish()
}
