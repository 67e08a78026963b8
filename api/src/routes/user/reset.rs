use actix_web::{web, HttpResponse};
use constant_time_eq::constant_time_eq;
use validator::Validate;

use crate::dto::{MessageResponse, ResetRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use vp_core::errors::VerificationError;
use vp_core::repositories::user::{UserAdminStore, UserStore};
use vp_shared::AgentAuthConfig;

use super::AppState;

/// Handler for POST /user/reset
///
/// Only customer agents may reset a user. The presented `auth_token` is
/// compared with the configured agent token; with no token configured
/// nobody is an agent.
pub async fn reset<S>(state: web::Data<AppState<S>>, request: web::Json<ResetRequest>) -> HttpResponse
where
    S: UserStore + UserAdminStore + 'static,
{
    // Unauthorized wins over every other failure, malformed input included
    let is_agent = is_agent(&state.agent, request.auth_token.as_deref());
    if !is_agent {
        tracing::warn!(event = "reset_unauthorized", "Reset requested without agent credentials");
        return handle_domain_error(VerificationError::Unauthorized.into());
    }

    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .verification
        .reset(request.phone.as_deref(), is_agent)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("User has been reset")),
        Err(error) => handle_domain_error(error),
    }
}

/// Constant-time check of a presented agent token
pub fn is_agent(config: &AgentAuthConfig, presented: Option<&str>) -> bool {
    match presented {
        Some(token) if config.is_configured() && !token.is_empty() => {
            constant_time_eq(token.as_bytes(), config.token.as_bytes())
        }
        _ => false,
    }
}
