//! Application factory
//!
//! Builds the Actix-web application around an [`AppState`]. The store type
//! is a generic parameter so the same routes serve MySQL and the in-memory
//! store.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use crate::handlers::error::json_error_handler;
use crate::middleware::{cors::create_cors, security::SecurityHeaders};
use crate::routes::health::health_check;
use crate::routes::user::{codegen, otp, pair, recreate, reset, unlock, AppState};

use vp_core::repositories::user::{UserAdminStore, UserStore};
use vp_shared::error_codes;
use vp_shared::ErrorResponse;

/// Create and configure the application with all dependencies
pub fn create_app<S>(
    app_state: web::Data<AppState<S>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: UserStore + UserAdminStore + 'static,
{
    let environment = app_state.environment;
    let json_config = web::JsonConfig::default()
        .limit(app_state.max_payload_size)
        .error_handler(json_error_handler);

    let security = if environment.is_production() {
        SecurityHeaders::new()
    } else {
        SecurityHeaders::without_hsts()
    };

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Registration order is inverse of execution: tracing sees every request first
        .wrap(security)
        .wrap(create_cors(environment))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check::<S>))
        .service(
            web::scope("/user")
                .route("/otp", web::post().to(otp::verify_otp::<S>))
                .route("/pair", web::post().to(pair::pair::<S>))
                .route("/unlock", web::post().to(unlock::unlock::<S>))
                .route("/reset", web::post().to(reset::reset::<S>))
                .configure(|cfg| {
                    if environment.is_development() {
                        cfg.route("/codegen", web::post().to(codegen::codegen::<S>))
                            .route("", web::delete().to(recreate::recreate::<S>));
                    }
                }),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
