//! User verification route handlers
//!
//! - OTP verification, pairing and unlock for the vehicle owner
//! - Agent reset
//! - Development-only code generation and user recreation

pub mod codegen;
pub mod otp;
pub mod pair;
pub mod recreate;
pub mod reset;
pub mod unlock;

use std::sync::Arc;

use vp_core::repositories::user::{UserAdminStore, UserStore};
use vp_core::services::issuance::CodeIssuanceService;
use vp_core::services::verification::{Clock, VerificationService, VerificationServiceConfig};
use vp_infra::database::DatabasePool;
use vp_shared::{AgentAuthConfig, AppConfig, Environment};

/// Application state that holds shared services
pub struct AppState<S>
where
    S: UserStore + UserAdminStore,
{
    pub verification: Arc<VerificationService<S>>,
    pub issuance: Arc<CodeIssuanceService<S>>,
    /// Direct store access for development endpoints
    pub store: Arc<S>,
    pub agent: AgentAuthConfig,
    pub environment: Environment,
    /// Maximum JSON body size in bytes
    pub max_payload_size: usize,
    /// Pool behind the MySQL store, checked by `/health`
    pub database: Option<DatabasePool>,
}

impl<S> AppState<S>
where
    S: UserStore + UserAdminStore,
{
    pub fn new(store: Arc<S>, config: &AppConfig) -> Self {
        let service_config = VerificationServiceConfig::from(&config.verification);
        Self {
            verification: Arc::new(VerificationService::new(store.clone(), service_config)),
            issuance: Arc::new(CodeIssuanceService::new(store.clone())),
            store,
            agent: config.agent.clone(),
            environment: config.environment,
            max_payload_size: config.server.max_payload_size,
            database: None,
        }
    }

    /// Attach the pool the store runs on
    pub fn with_database(mut self, pool: DatabasePool) -> Self {
        self.database = Some(pool);
        self
    }

    /// Rebuild both services on `clock`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        let service_config = self.verification.config().clone();
        self.verification = Arc::new(
            VerificationService::new(self.store.clone(), service_config).with_clock(clock.clone()),
        );
        self.issuance = Arc::new(CodeIssuanceService::new(self.store.clone()).with_clock(clock));
        self
    }
}
