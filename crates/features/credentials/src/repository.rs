use keyhold_database::Database;
use keyhold_kernel::safe_nanoid;
use surrealdb::types::Datetime;
use tracing::instrument;

use crate::error::CredentialsError;
use crate::models::{
    CredentialPatch, CredentialRecord, LoginEntry, LoginEntryPatch, NewLoginEntry,
};

/// Record fields are projected through `id.id()` / `owner.id()` so callers
/// only ever see plain string keys.
const PROJECTION: &str = "*, id.id() AS id, owner.id() AS owner";

/// Credential store state.
#[keyhold_derive::keyhold_slice]
pub struct Credentials {
    pub db: Database,
}

impl Credentials {
    /// Creates a credential record for `owner_id`, seeded with the given
    /// entries. The owner check and the insert run in one transaction.
    ///
    /// Multiple records for the same `(owner, website)` pair are permitted.
    ///
    /// # Errors
    /// * [`CredentialsError::OwnerNotFound`] if no such user exists.
    /// * [`CredentialsError::Database`] for engine failures.
    #[instrument(skip(self, entries), fields(website = %website.as_ref()))]
    pub async fn create(
        &self,
        owner_id: &str,
        website: impl AsRef<str>,
        entries: Vec<NewLoginEntry>,
    ) -> Result<CredentialRecord, CredentialsError> {
        let key = safe_nanoid!();
        let entries: Vec<LoginEntry> = entries.into_iter().map(NewLoginEntry::stamp).collect();

        let query = format!(
            "BEGIN TRANSACTION;
            IF !record::exists(type::record('user', $owner)) {{ THROW 'owner-not-found' }};
            LET $created = (CREATE ONLY type::record('credential', $key) CONTENT {{
                owner: type::record('user', $owner),
                website: $website,
                entries: $entries
            }});
            RETURN SELECT {PROJECTION} FROM $created;
            COMMIT TRANSACTION;"
        );

        self.db
            .query(query)
            .bind(("owner", owner_id.to_owned()))
            .bind(("key", key))
            .bind(("website", website.as_ref().to_owned()))
            .bind(("entries", entries))
            .await
            .map_err(classify)?
            .take::<Vec<CredentialRecord>>(2)
            .map_err(classify)?
            .into_iter()
            .next()
            .ok_or_else(|| CredentialsError::Internal {
                message: "Create returned no record".into(),
                context: None,
            })
    }

    /// Fetches a credential record by record key.
    ///
    /// # Errors
    /// * [`CredentialsError::NotFound`] if no such record exists.
    #[instrument(skip(self))]
    pub async fn read(&self, id: &str) -> Result<CredentialRecord, CredentialsError> {
        self.db
            .query(format!("SELECT {PROJECTION} FROM type::record('credential', $id)"))
            .bind(("id", id.to_owned()))
            .await?
            .take::<Vec<CredentialRecord>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| CredentialsError::NotFound {
                message: format!("credential:{id}").into(),
                context: None,
            })
    }

    /// Fetches every credential record owned by `owner_id`, oldest first.
    ///
    /// # Errors
    /// * [`CredentialsError::Database`] for engine failures.
    #[instrument(skip(self))]
    pub async fn read_by_user(
        &self,
        owner_id: &str,
    ) -> Result<Vec<CredentialRecord>, CredentialsError> {
        let records = self
            .db
            .query(format!(
                "SELECT {PROJECTION} FROM credential
                WHERE owner = type::record('user', $owner)
                ORDER BY created_at ASC"
            ))
            .bind(("owner", owner_id.to_owned()))
            .await?
            .take::<Vec<CredentialRecord>>(0)?;
        Ok(records)
    }

    /// Applies a partial update to the record's own fields and refreshes
    /// `updated_at`. Returns the number of records changed (0 when absent).
    ///
    /// # Errors
    /// * [`CredentialsError::Database`] for engine failures.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: &str,
        patch: CredentialPatch,
    ) -> Result<usize, CredentialsError> {
        let mut clauses = vec!["updated_at = time::now()"];
        if patch.website.is_some() {
            clauses.push("website = $website");
        }

        let query = format!(
            "UPDATE type::record('credential', $id) SET {} RETURN VALUE id.id()",
            clauses.join(", ")
        );

        let mut query = self.db.query(query).bind(("id", id.to_owned()));
        if let Some(website) = patch.website {
            query = query.bind(("website", website));
        }

        let updated = query.await?.take::<Vec<String>>(0)?;
        Ok(updated.len())
    }

    /// Appends a login entry to the record's entry list. Existing entries
    /// are never overwritten; a second login for the same site coexists
    /// with the first.
    ///
    /// # Errors
    /// * [`CredentialsError::Database`] for engine failures.
    #[instrument(skip(self, entry))]
    pub async fn add_entry(
        &self,
        id: &str,
        entry: NewLoginEntry,
    ) -> Result<usize, CredentialsError> {
        let updated = self
            .db
            .query(
                "UPDATE type::record('credential', $id)
                SET entries += $entry, updated_at = time::now()
                RETURN VALUE id.id()",
            )
            .bind(("id", id.to_owned()))
            .bind(("entry", entry.stamp()))
            .await?
            .take::<Vec<String>>(0)?;
        Ok(updated.len())
    }

    /// Applies a partial mutation to the entry at `index` and refreshes that
    /// entry's `updated_at`.
    ///
    /// # Errors
    /// * [`CredentialsError::NotFound`] if the record does not exist.
    /// * [`CredentialsError::EntryOutOfRange`] if `index` is past the list.
    #[instrument(skip(self, patch))]
    pub async fn update_entry(
        &self,
        id: &str,
        index: usize,
        patch: LoginEntryPatch,
    ) -> Result<usize, CredentialsError> {
        let mut record = self.read(id).await?;
        let entry = record.entries.get_mut(index).ok_or_else(|| entry_out_of_range(id, index))?;

        if let Some(username) = patch.username {
            entry.username = username;
        }
        if let Some(secret) = patch.secret {
            entry.secret = secret;
        }
        if let Some(iv) = patch.iv {
            entry.iv = iv;
        }
        if let Some(notes) = patch.notes {
            entry.notes = notes;
        }
        entry.updated_at = Datetime::from(chrono::Utc::now());

        self.write_entries(id, record.entries).await
    }

    /// Removes the entry at `index`, preserving the order of the rest.
    ///
    /// # Errors
    /// * [`CredentialsError::NotFound`] if the record does not exist.
    /// * [`CredentialsError::EntryOutOfRange`] if `index` is past the list.
    #[instrument(skip(self))]
    pub async fn remove_entry(&self, id: &str, index: usize) -> Result<usize, CredentialsError> {
        let mut record = self.read(id).await?;
        if index >= record.entries.len() {
            return Err(entry_out_of_range(id, index));
        }
        record.entries.remove(index);

        self.write_entries(id, record.entries).await
    }

    /// Deletes one credential record. Returns the number removed.
    ///
    /// # Errors
    /// * [`CredentialsError::Database`] for engine failures.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<usize, CredentialsError> {
        let removed = self
            .db
            .query("DELETE type::record('credential', $id) RETURN VALUE id.id()")
            .bind(("id", id.to_owned()))
            .await?
            .take::<Vec<String>>(0)?;
        Ok(removed.len())
    }

    /// Deletes every credential record owned by `owner_id`. Returns the
    /// number removed.
    ///
    /// # Errors
    /// * [`CredentialsError::Database`] for engine failures.
    #[instrument(skip(self))]
    pub async fn delete_by_owner(&self, owner_id: &str) -> Result<usize, CredentialsError> {
        let removed = self
            .db
            .query(
                "DELETE credential WHERE owner = type::record('user', $owner)
                RETURN VALUE id.id()",
            )
            .bind(("owner", owner_id.to_owned()))
            .await?
            .take::<Vec<String>>(0)?;
        Ok(removed.len())
    }

    async fn write_entries(
        &self,
        id: &str,
        entries: Vec<LoginEntry>,
    ) -> Result<usize, CredentialsError> {
        let updated = self
            .db
            .query(
                "UPDATE type::record('credential', $id)
                SET entries = $entries, updated_at = time::now()
                RETURN VALUE id.id()",
            )
            .bind(("id", id.to_owned()))
            .bind(("entries", entries))
            .await?
            .take::<Vec<String>>(0)?;
        Ok(updated.len())
    }
}

fn entry_out_of_range(id: &str, index: usize) -> CredentialsError {
    CredentialsError::EntryOutOfRange {
        message: format!("credential:{id} has no entry at index {index}").into(),
        context: None,
    }
}

/// Maps engine errors onto domain errors by inspecting the failure text.
fn classify(e: surrealdb::Error) -> CredentialsError {
    let text = e.to_string();
    if text.contains("owner-not-found") {
        CredentialsError::OwnerNotFound {
            message: text.into(),
            context: Some("Owner check inside create transaction".into()),
        }
    } else {
        CredentialsError::Database { source: e, context: None }
    }
}
