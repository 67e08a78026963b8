use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{MessageResponse, PairRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use vp_core::repositories::user::{UserAdminStore, UserStore};

use super::AppState;

/// Handler for POST /user/pair
///
/// Body: `{ "phone", "code", "binding_token" }`. An expired pairing code
/// locks the user until an agent resets it.
pub async fn pair<S>(state: web::Data<AppState<S>>, request: web::Json<PairRequest>) -> HttpResponse
where
    S: UserStore + UserAdminStore + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .verification
        .verify_pairing(
            request.phone.as_deref(),
            request.code.as_deref(),
            request.binding_token.as_deref(),
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Successfully paired")),
        Err(error) => handle_domain_error(error),
    }
}
