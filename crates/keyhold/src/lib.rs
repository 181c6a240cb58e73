//! Facade crate for Keyhold stores and shared modules.
//! Re-exports domain/kernel primitives and aggregates store initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init`] with a [`domain::config::DatabaseConfig`] to connect,
//!   migrate, and receive the initialized store handles.
//! - Use [`vault`] to produce the cryptographic material the stores persist.

mod error;

pub use error::{KeyholdError, KeyholdErrorExt};

use keyhold_database::Database;
pub use keyhold_domain as domain;
pub use keyhold_kernel as kernel;
pub use keyhold_logger as logger;
pub use keyhold_vault as vault;

use domain::config::DatabaseConfig;
use keyhold_credentials::Credentials;
use keyhold_users::Users;

/// Store slices for direct use.
pub mod stores {
    pub use keyhold_credentials as credentials;
    pub use keyhold_users as users;
}

/// Initialized Keyhold handles: one database session shared by both stores.
#[derive(Debug, Clone)]
pub struct Keyhold {
    pub database: Database,
    pub users: Users,
    pub credentials: Credentials,
}

/// Connect the database described by `config`, apply migrations, and
/// initialize the user and credential stores.
///
/// # Errors
/// Returns [`KeyholdError::Database`] if the connection, authentication,
/// or a schema migration fails.
pub async fn init(config: &DatabaseConfig) -> Result<Keyhold, KeyholdError> {
    let mut builder = Database::builder()
        .url(config.url.as_str())
        .session(config.namespace.as_str(), config.database.as_str());
    if let Some(credentials) = &config.credentials {
        builder =
            builder.auth(credentials.username.as_str(), credentials.password.as_str());
    }
    let database = builder.init().await?;

    tracing::info!("Keyhold stores initialized");

    Ok(Keyhold {
        users: keyhold_users::init(database.clone()),
        credentials: keyhold_credentials::init(database.clone()),
        database,
    })
}
