use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{MessageResponse, UnlockRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use vp_core::repositories::user::{UserAdminStore, UserStore};

use super::AppState;

/// Handler for POST /user/unlock
pub async fn unlock<S>(state: web::Data<AppState<S>>, request: web::Json<UnlockRequest>) -> HttpResponse
where
    S: UserStore + UserAdminStore + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .verification
        .unlock(request.phone.as_deref(), request.binding_token.as_deref())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Vehicle has been unlocked")),
        Err(error) => handle_domain_error(error),
    }
}
