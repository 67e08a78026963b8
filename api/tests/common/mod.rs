//! Shared helpers for API tests

#![allow(dead_code)]

use actix_web::web;
use chrono::{TimeZone, Utc};
use std::sync::Arc;

use vp_api::AppState;
use vp_core::repositories::user::InMemoryUserStore;
use vp_core::services::verification::FixedClock;
use vp_infra::fixtures::apply_fixture;
use vp_shared::{AgentAuthConfig, AppConfig, Environment};

pub const AGENT_TOKEN: &str = "agent-secret";
pub const PHONE: &str = "111-222-333";
pub const OTP: &str = "111111";
pub const PAIRING: &str = "222222";

/// Call the service and decode the JSON body
macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}

pub struct TestContext {
    pub store: Arc<InMemoryUserStore>,
    pub clock: Arc<FixedClock>,
    pub state: web::Data<AppState<InMemoryUserStore>>,
}

/// Fixture-seeded in-memory store on a fixed clock
pub async fn context(environment: Environment) -> TestContext {
    let store = Arc::new(InMemoryUserStore::new());
    apply_fixture(store.as_ref()).await.unwrap();

    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    ));
    let config = AppConfig {
        environment,
        agent: AgentAuthConfig::new(AGENT_TOKEN),
        ..Default::default()
    };
    let state = web::Data::new(AppState::new(store.clone(), &config).with_clock(clock.clone()));

    TestContext { store, clock, state }
}
