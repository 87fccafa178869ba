use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::db::store::StoreError;
use crate::services::{
    blog_service::BlogError, booking_service::BookingError, organizer_service::OrganizerError,
    trek_resolution_service::ResolutionError,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Internal(detail) => {
                log::error!("Internal Server Error: {}", detail);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, .. } => {
                ApiError::NotFound(format!("No such document in {}", collection))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ResolutionError> for ApiError {
    fn from(_: ResolutionError) -> Self {
        ApiError::NotFound("Trek Not Found".to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidParticipants => ApiError::BadRequest(err.to_string()),
            BookingError::TrekUnavailable(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<OrganizerError> for ApiError {
    fn from(err: OrganizerError) -> Self {
        match err {
            OrganizerError::BookingNotFound => ApiError::NotFound(err.to_string()),
            OrganizerError::NotOwner => ApiError::Forbidden(err.to_string()),
            OrganizerError::Store(e) => e.into(),
        }
    }
}

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::MissingField(_) => ApiError::BadRequest(err.to_string()),
            BlogError::NotFound => ApiError::NotFound(err.to_string()),
            BlogError::NotAuthor => ApiError::Forbidden(err.to_string()),
            BlogError::Store(e) => e.into(),
        }
    }
}
