//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use ghostrepo_auth::jwt::{JwtDecoder, JwtEncoder};
use ghostrepo_auth::password::{PasswordHasher, PasswordValidator};
use ghostrepo_billing::PaymentGateway;
use ghostrepo_core::config::AppConfig;
use ghostrepo_database::Stores;
use ghostrepo_github::SourceControl;
use ghostrepo_service::{
    AccessEvaluator, CheckoutService, ContentResolver, LinkRegistry, LinkService, UnlockLedger,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Share and unlock storage backend
    pub stores: Stores,

    // ── Auth ─────────────────────────────────────────────────
    /// Signs sessions, visitor passes and grants
    pub jwt_encoder: Arc<JwtEncoder>,
    /// Verifies sessions, visitor passes and grants
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Share link registry
    pub registry: Arc<LinkRegistry>,
    /// Visitor access gate
    pub evaluator: Arc<AccessEvaluator>,
    /// Paid unlock ledger
    pub ledger: Arc<UnlockLedger>,
    /// Checkout round-trip
    pub checkout: Arc<CheckoutService>,
    /// Repository content resolver
    pub resolver: Arc<ContentResolver>,
}

impl AppState {
    /// Wires services on top of the given storage backend and upstream clients.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        source: Arc<dyn SourceControl>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let registry = Arc::new(LinkRegistry::new(
            Arc::clone(&stores.shares),
            Arc::clone(&source),
            Arc::new(LinkService::new()),
            Arc::clone(&password_hasher),
            password_validator,
        ));
        let ledger = Arc::new(UnlockLedger::new(
            Arc::clone(&stores.unlocks),
            Arc::clone(&jwt_encoder),
            Arc::clone(&jwt_decoder),
        ));
        let evaluator = Arc::new(AccessEvaluator::new(
            Arc::clone(&registry),
            Arc::clone(&ledger),
            password_hasher,
        ));
        let checkout = Arc::new(CheckoutService::new(
            Arc::clone(&registry),
            Arc::clone(&ledger),
            gateway,
            &config.server,
            &config.payment,
        ));
        let resolver = Arc::new(ContentResolver::new(source));

        Self {
            config: Arc::new(config),
            stores,
            jwt_encoder,
            jwt_decoder,
            registry,
            evaluator,
            ledger,
            checkout,
            resolver,
        }
    }
}
