use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Everything a submission or lookup can fail with, as shown to the user.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Please fill in at least Location and Crop Name to continue.")]
    MissingRequiredFields,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Please enter your Gemini API key to continue.")]
    ApiKeyMissing,

    /// The provider refused the key.  The session stops until a new key is set.
    #[error("Error configuring API: {0}")]
    ApiConfiguration(String),

    #[error("Error generating recommendations: {0}. Please check your API key and try again.")]
    ApiCall(String),

    #[error("No recommendation with id {0}")]
    NotFound(usize),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for AdvisorError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdvisorError::MissingRequiredFields | AdvisorError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AdvisorError::ApiKeyMissing | AdvisorError::ApiConfiguration(_) => {
                StatusCode::UNAUTHORIZED
            }
            AdvisorError::ApiCall(_) => StatusCode::BAD_GATEWAY,
            AdvisorError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AdvisorError::MissingRequiredFields.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AdvisorError::ApiKeyMissing.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AdvisorError::ApiConfiguration("bad key".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AdvisorError::ApiCall("quota".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(AdvisorError::NotFound(3).status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_api_call_message_invites_retry() {
        let message = AdvisorError::ApiCall("quota exceeded".to_string()).to_string();
        assert!(message.contains("quota exceeded"));
        assert!(message.ends_with("try again."));
    }
}
