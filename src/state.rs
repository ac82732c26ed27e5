use std::sync::Arc;

use crate::auth::{hash_password, JwtKeys};
use crate::config::Config;
use crate::error::AppError;
use crate::store::{MemoryStore, PgStore, Store};

/// Plaintext behind `AppState::dummy_password_hash`; no account can hold this hash.
const DUMMY_PASSWORD: &str = "taskboard-login-timing-placeholder";

/// Shared, immutable application state, registered as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt: JwtKeys,
    pub bcrypt_cost: u32,
    /// Hash at `bcrypt_cost` that logins for unknown emails are verified against, so
    /// they take as long as logins with a wrong password.
    pub dummy_password_hash: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt: JwtKeys, bcrypt_cost: u32) -> Result<Self, AppError> {
        Ok(Self {
            store,
            jwt,
            bcrypt_cost,
            dummy_password_hash: hash_password(DUMMY_PASSWORD, bcrypt_cost)?,
        })
    }

    /// Connects the configured store and derives the signing keys.
    ///
    /// With `DATABASE_URL` set this uses Postgres (creating the tables if needed),
    /// otherwise an in-memory store that is lost on restart.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url).await?;
                store.ensure_schema().await?;
                log::info!("Using Postgres store");
                Arc::new(store)
            }
            None => {
                log::warn!("DATABASE_URL not set, keeping data in memory");
                Arc::new(MemoryStore::new())
            }
        };

        Self::new(store, JwtKeys::new(&config.jwt_secret), config.bcrypt_cost)
    }
}
