//! Conversion of domain failures into HTTP responses
//!
//! Every failure kind has a fixed status and a stable error code. Server
//! errors are logged with their cause and answered with a generic message.

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;
use vp_core::errors::{DomainError, VerificationError};
use vp_shared::{error_codes, ErrorResponse};

/// HTTP status for a verification failure
pub fn status_for(error: &VerificationError) -> StatusCode {
    match error {
        VerificationError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        VerificationError::NotFound => StatusCode::NOT_FOUND,
        VerificationError::Locked => StatusCode::FORBIDDEN,
        VerificationError::WrongStage { .. } => StatusCode::FORBIDDEN,
        VerificationError::AlreadyPastStage { .. } => StatusCode::BAD_REQUEST,
        VerificationError::IdentityMismatch => StatusCode::UNAUTHORIZED,
        VerificationError::NotIssued { .. } => StatusCode::BAD_REQUEST,
        VerificationError::RateLimited => StatusCode::FORBIDDEN,
        VerificationError::Expired { .. } => StatusCode::BAD_REQUEST,
        VerificationError::InvalidCode { .. } => StatusCode::BAD_REQUEST,
        VerificationError::Unauthorized => StatusCode::UNAUTHORIZED,
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Verification(error) => {
            let mut body = ErrorResponse::new(error.error_code(), error.to_string());
            if let Some(remaining) = error.remaining_attempts() {
                body = body.add_detail("remaining_attempts", remaining);
            }
            HttpResponse::build(status_for(&error)).json(body)
        }
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::INVALID_INPUT, message))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorResponse::new(
            error_codes::NOT_FOUND,
            format!("{} not found", resource),
        )),
        DomainError::Internal { message } => {
            tracing::error!(error = %message, event = "server_error", "Request failed with a server error");
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new(error_codes::INTERNAL_ERROR, "Server error"))
        }
    }
}

/// Response for a request body that failed its length bounds
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::INVALID_INPUT, "Invalid request data")
            .add_detail("fields", fields),
    )
}

/// Malformed or oversized JSON bodies get the standard error body
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::INVALID_INPUT,
        "Malformed JSON request body",
    ));
    InternalError::from_response(error, response).into()
}
