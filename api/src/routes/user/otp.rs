use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{OtpVerifiedResponse, VerifyOtpRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use vp_core::repositories::user::{UserAdminStore, UserStore};

use super::AppState;

/// Handler for POST /user/otp
///
/// Verifies the OTP for a phone and binds the session to a new token that
/// the client presents on every later stage.
///
/// # Request Body
///
/// ```json
/// { "phone": "111-222-333", "code": "123456" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "message": "Successfully validated", "binding_token": "6f1c..." }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing field, wrong code (with remaining attempts), already verified, no OTP issued
/// - 403 Forbidden: Locked or attempts limit reached
/// - 404 Not Found: Unknown phone
/// - 500 Internal Server Error: Store transaction failure
pub async fn verify_otp<S>(
    state: web::Data<AppState<S>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    S: UserStore + UserAdminStore + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .verification
        .verify_otp(request.phone.as_deref(), request.code.as_deref())
        .await
    {
        Ok(verified) => HttpResponse::Ok().json(OtpVerifiedResponse {
            message: "Successfully validated".to_string(),
            binding_token: verified.binding_token.into_inner(),
        }),
        Err(error) => handle_domain_error(error),
    }
}
