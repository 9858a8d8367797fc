pub mod analytics;
pub mod history;
pub mod recommendations;
pub mod session;

use actix_web::{http::header, HttpResponse};

use crate::domain::QueryRecord;

/// Sends the recommendation text back as a plain text attachment.
fn text_attachment(record: &QueryRecord, file_name: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(record.recommendation.clone())
}
