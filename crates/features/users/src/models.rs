use surrealdb::types::{Bytes, Datetime, SurrealValue};

/// A persisted user account row.
///
/// The `id` is the plain record key, projected out of the record link.
/// `secret_hash` is the Argon2id PHC string of the master secret; `salt`,
/// `encrypted_key`, and `key_iv` carry the vault material needed to restore
/// the user's data key. The raw master secret is never stored.
#[derive(Debug, Clone, SurrealValue)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub secret_hash: String,
    pub salt: Bytes,
    pub encrypted_key: Bytes,
    pub key_iv: Bytes,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

/// Fields required to register a new user. Timestamps and the record id are
/// assigned server-side.
#[derive(Debug, Clone, SurrealValue)]
pub struct NewUser {
    pub username: String,
    pub secret_hash: String,
    pub salt: Bytes,
    pub encrypted_key: Bytes,
    pub key_iv: Bytes,
}

/// Partial update of a user record. `None` fields are left untouched;
/// `updated_at` is always refreshed.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub secret_hash: Option<String>,
    pub salt: Option<Bytes>,
    pub encrypted_key: Option<Bytes>,
    pub key_iv: Option<Bytes>,
}

/// Outcome of a cascading user delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeReport {
    /// Users removed (1 on success).
    pub users: usize,
    /// Dependent credential records removed in the same transaction.
    pub credentials: usize,
}
