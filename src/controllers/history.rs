use actix_web::{delete, get, web, HttpResponse, Responder};
use serde::Serialize;
use std::sync::Mutex;
use tracing::info;

use crate::{
    app::FarmingAssistantApp,
    domain::QueryRecord,
    download,
    error::AdvisorError,
    session::{self, Session},
};

pub const NO_HISTORY_MESSAGE: &str =
    "No history available yet. Start by getting some recommendations!";

#[derive(Serialize, Debug)]
pub struct HistoryResponse {
    pub records: Vec<QueryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct HistoryController;

impl HistoryController {
    pub fn new() -> Self {
        Self
    }

    /// Every record, newest first, with the full recommendation text.
    pub fn list(&self, session: &Mutex<Session>) -> HistoryResponse {
        let session = session::lock(session);
        let records: Vec<QueryRecord> = session.log.newest_first().cloned().collect();

        let message = if records.is_empty() {
            Some(NO_HISTORY_MESSAGE.to_string())
        } else {
            None
        };

        HistoryResponse { records, message }
    }

    /// Drops every record.  There is no confirmation or partial clear.
    pub fn clear(&self, session: &Mutex<Session>) {
        let mut session = session::lock(session);
        info!("Clearing {} records from history", session.log.len());
        session.log.clear();
    }

    pub fn download(&self, session: &Mutex<Session>, id: usize) -> Result<HttpResponse, AdvisorError> {
        let session = session::lock(session);
        let record = session.log.get(id).ok_or(AdvisorError::NotFound(id))?;

        Ok(super::text_attachment(
            record,
            download::history_file_name(record),
        ))
    }
}

impl Default for HistoryController {
    fn default() -> Self {
        Self::new()
    }
}

#[get("/history")]
pub async fn list_history_handler(app: web::Data<&'static FarmingAssistantApp>) -> impl Responder {
    HttpResponse::Ok().json(app.history_controller.list(&app.session))
}

#[delete("/history")]
pub async fn clear_history_handler(app: web::Data<&'static FarmingAssistantApp>) -> impl Responder {
    app.history_controller.clear(&app.session);
    HttpResponse::NoContent().finish()
}

#[get("/history/{id}/download")]
pub async fn download_history_handler(
    id: web::Path<usize>,
    app: web::Data<&'static FarmingAssistantApp>,
) -> Result<impl Responder, AdvisorError> {
    app.history_controller.download(&app.session, id.into_inner())
}
