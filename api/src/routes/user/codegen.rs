use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{CodegenRequest, MessageResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use vp_core::repositories::user::{UserAdminStore, UserStore};

use super::AppState;

/// Handler for POST /user/codegen (development only)
///
/// Stores caller-supplied OTP and pairing codes, both issued now.
pub async fn codegen<S>(state: web::Data<AppState<S>>, request: web::Json<CodegenRequest>) -> HttpResponse
where
    S: UserStore + UserAdminStore + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .issuance
        .issue_codes(
            request.phone.as_deref(),
            request.otp_code.as_deref(),
            request.pairing_code.as_deref(),
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(format!(
            "Created new codes for user {}",
            request.phone.as_deref().unwrap_or_default()
        ))),
        Err(error) => handle_domain_error(error),
    }
}
