use std::sync::Arc;

use crate::auth::oidc::OidcProvider;
use crate::auth::{IdentityVerifier, LoginPolicy, TokenCodec};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::repositories::{
    CustomerRepository, OrderRepository, PgCustomerRepository, PgOrderRepository,
};
use crate::services::notifications::OrderNotifier;
use crate::sms::{AfricasTalkingSms, LogSms, SmsSender};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// Customer persistence.
    pub customers: Arc<dyn CustomerRepository>,
    /// Order persistence.
    pub orders: Arc<dyn OrderRepository>,
    /// Verifies bearer tokens on protected routes.
    pub tokens: TokenCodec,
    /// Runs the login flows.
    pub verifier: IdentityVerifier,
    /// Sends order confirmations.
    pub notifier: OrderNotifier,
}

impl AppState {
    /// Wires the state from already-built collaborators.
    pub fn from_parts(
        customers: Arc<dyn CustomerRepository>,
        orders: Arc<dyn OrderRepository>,
        tokens: TokenCodec,
        policy: LoginPolicy,
        token_ttl: chrono::Duration,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        Self {
            customers,
            orders,
            verifier: IdentityVerifier::new(tokens.clone(), policy, token_ttl),
            tokens,
            notifier: OrderNotifier::new(sms),
        }
    }

    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    ///
    /// Connects to PostgreSQL and creates the schema. When OIDC is configured
    /// but discovery fails, the failure is logged and direct login is used.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = crate::db::create_pool(&config.database_url)?;
        crate::db::ensure_schema(&pool).await?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        let policy = match &config.oidc {
            Some(settings) => match OidcProvider::discover(settings).await {
                Ok(provider) => {
                    tracing::info!("✅ OIDC provider discovered at {}", settings.provider_url);
                    LoginPolicy::Delegated(Arc::new(provider))
                }
                Err(e) => {
                    tracing::error!("❌ OIDC discovery failed, falling back to direct login: {}", e);
                    LoginPolicy::Direct
                }
            },
            None => {
                tracing::info!("🔑 No OIDC provider configured, using direct login");
                LoginPolicy::Direct
            }
        };

        let sms: Arc<dyn SmsSender> = match &config.sms {
            Some(settings) => Arc::new(
                AfricasTalkingSms::new(settings.clone())
                    .map_err(|e| AppError::Internal(e.to_string()))?,
            ),
            None => {
                tracing::warn!("⚠️ SMS gateway not configured, messages will only be logged");
                Arc::new(LogSms)
            }
        };

        Ok(Self::from_parts(
            Arc::new(PgCustomerRepository::new(pool.clone())),
            Arc::new(PgOrderRepository::new(pool)),
            TokenCodec::new(config.jwt_secret.clone()),
            policy,
            chrono::Duration::hours(config.token_ttl_hours),
            sms,
        ))
    }
}
