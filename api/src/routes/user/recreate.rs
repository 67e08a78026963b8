use actix_web::{web, HttpResponse};

use crate::dto::MessageResponse;
use crate::handlers::error::handle_domain_error;

use vp_core::repositories::user::{UserAdminStore, UserStore};
use vp_infra::fixtures::recreate_users;

use super::AppState;

/// Handler for DELETE /user (development only)
///
/// Deletes every user and seeds the fixture users again.
pub async fn recreate<S>(state: web::Data<AppState<S>>) -> HttpResponse
where
    S: UserStore + UserAdminStore + 'static,
{
    match recreate_users(state.store.as_ref()).await {
        Ok(_) => HttpResponse::Ok().json(MessageResponse::new("All users recreated")),
        Err(error) => handle_domain_error(error),
    }
}
