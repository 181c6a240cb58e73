use surrealdb::types::{Bytes, Datetime, SurrealValue};

/// One login stored inside a credential record's entry list.
///
/// `secret` holds the sealed password bytes and `iv` the nonce they were
/// sealed with; the plaintext never reaches the store.
#[derive(Debug, Clone, SurrealValue)]
pub struct LoginEntry {
    pub username: String,
    pub secret: Bytes,
    pub iv: Bytes,
    pub notes: Option<String>,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

/// A login entry as submitted by a caller; timestamps are stamped on insert.
#[derive(Debug, Clone)]
pub struct NewLoginEntry {
    pub username: String,
    pub secret: Bytes,
    pub iv: Bytes,
    pub notes: Option<String>,
}

impl NewLoginEntry {
    pub(crate) fn stamp(self) -> LoginEntry {
        let now = Datetime::from(chrono::Utc::now());
        LoginEntry {
            username: self.username,
            secret: self.secret,
            iv: self.iv,
            notes: self.notes,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Partial mutation of a single login entry. `None` fields are left
/// untouched; the entry's `updated_at` is always refreshed.
#[derive(Debug, Clone, Default)]
pub struct LoginEntryPatch {
    pub username: Option<String>,
    pub secret: Option<Bytes>,
    pub iv: Option<Bytes>,
    pub notes: Option<Option<String>>,
}

/// A persisted credential record: one website/application under one owner,
/// with its ordered list of login entries.
#[derive(Debug, Clone, SurrealValue)]
pub struct CredentialRecord {
    pub id: String,
    pub owner: String,
    pub website: String,
    pub entries: Vec<LoginEntry>,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

/// Partial update of a credential record's own fields.
#[derive(Debug, Clone, Default)]
pub struct CredentialPatch {
    pub website: Option<String>,
}
