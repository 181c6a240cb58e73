//! Credential store feature slice: per-site records with embedded login
//! entries, owned by users.

mod error;
mod models;
mod repository;

pub use error::{CredentialsError, CredentialsErrorExt};
pub use models::{
    CredentialPatch, CredentialRecord, LoginEntry, LoginEntryPatch, NewLoginEntry,
};
pub use repository::{Credentials, CredentialsInner};

use keyhold_database::Database;

/// Initialize the credential store over an established database session.
pub fn init(db: Database) -> Credentials {
    tracing::info!("Credentials slice initialized");

    Credentials::new(CredentialsInner { db })
}
