use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::error;
use thiserror::Error;

use crate::structs::api_response::ErrorResponse;

/// Everything that stops a visit from being answered with a success body.
#[derive(Debug, Error)]
pub enum VisitError {
    #[error("Request body is empty.")]
    EmptyBody,
    #[error("Request body is too large.")]
    BodyTooLarge,
    #[error("Invalid JSON format.")]
    InvalidJson,
    #[error("Invalid or missing 'pageVisited' field.")]
    MissingPage,
    /// Only produced when storage failures are not reported as successes.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    StorageUnavailable(String),
    #[error("Internal Server Error.")]
    Internal(#[source] anyhow::Error),
}

impl ResponseError for VisitError {
    fn status_code(&self) -> StatusCode {
        match self {
            VisitError::EmptyBody
            | VisitError::InvalidJson
            | VisitError::MissingPage
            | VisitError::Rejected(_) => StatusCode::BAD_REQUEST,
            VisitError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            VisitError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            VisitError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let VisitError::Internal(cause) = self {
            error!("Error processing LogVisit request: {:#}", cause);
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
