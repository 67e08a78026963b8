use actix_web::{web, HttpResponse};

use vp_core::repositories::user::{UserAdminStore, UserStore};

use crate::routes::user::AppState;

/// Handler for GET /health
///
/// Reports 503 when the MySQL pool backing the store fails its check.
pub async fn health_check<S>(state: web::Data<AppState<S>>) -> HttpResponse
where
    S: UserStore + UserAdminStore + 'static,
{
    let database = match &state.database {
        None => "not_configured",
        Some(pool) => match pool.health_check().await {
            Ok(true) => "healthy",
            Ok(false) => "unhealthy",
            Err(e) => {
                tracing::error!(error = %e, "Database health check failed");
                "unhealthy"
            }
        },
    };

    let body = serde_json::json!({
        "status": if database == "unhealthy" { "unhealthy" } else { "healthy" },
        "service": "vehicle-pairing-api",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if database == "unhealthy" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}
