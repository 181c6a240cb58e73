use keyhold_database::Database;
use keyhold_kernel::safe_nanoid;
use surrealdb::types::SurrealValue;
use tracing::instrument;

use crate::error::UsersError;
use crate::models::{CascadeReport, NewUser, UserPatch, UserRecord};

/// User store state.
#[keyhold_derive::keyhold_slice]
pub struct Users {
    pub db: Database,
}

#[derive(Debug, SurrealValue)]
struct CascadeCounts {
    users: i64,
    credentials: i64,
}

impl Users {
    /// Registers a new user under a fresh NanoID record key.
    ///
    /// # Errors
    /// * [`UsersError::UsernameTaken`] if the username violates the unique index.
    /// * [`UsersError::Database`] for engine failures.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create(&self, user: NewUser) -> Result<UserRecord, UsersError> {
        let key = safe_nanoid!();

        self.db
            .query(
                "SELECT *, id.id() AS id
                FROM (CREATE ONLY type::record('user', $key) CONTENT $user)",
            )
            .bind(("key", key))
            .bind(("user", user))
            .await
            .map_err(classify)?
            .take::<Option<UserRecord>>(0)
            .map_err(classify)?
            .ok_or_else(|| UsersError::Internal {
                message: "Create returned no record".into(),
                context: None,
            })
    }

    /// Fetches a user by record key.
    ///
    /// # Errors
    /// * [`UsersError::NotFound`] if no such user exists.
    #[instrument(skip(self))]
    pub async fn read(&self, id: &str) -> Result<UserRecord, UsersError> {
        self.db
            .query("SELECT *, id.id() AS id FROM type::record('user', $id)")
            .bind(("id", id.to_owned()))
            .await?
            .take::<Vec<UserRecord>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| UsersError::NotFound {
                message: format!("user:{id}").into(),
                context: None,
            })
    }

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// Returns the number of records changed: 1 when the user exists,
    /// 0 when it does not.
    ///
    /// # Errors
    /// * [`UsersError::UsernameTaken`] if a username change collides.
    /// * [`UsersError::Database`] for engine failures.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<usize, UsersError> {
        let mut clauses = vec!["updated_at = time::now()"];
        if patch.username.is_some() {
            clauses.push("username = $username");
        }
        if patch.secret_hash.is_some() {
            clauses.push("secret_hash = $secret_hash");
        }
        if patch.salt.is_some() {
            clauses.push("salt = $salt");
        }
        if patch.encrypted_key.is_some() {
            clauses.push("encrypted_key = $encrypted_key");
        }
        if patch.key_iv.is_some() {
            clauses.push("key_iv = $key_iv");
        }

        let query = format!(
            "UPDATE type::record('user', $id) SET {} RETURN VALUE id.id()",
            clauses.join(", ")
        );

        let mut query = self.db.query(query).bind(("id", id.to_owned()));
        if let Some(username) = patch.username {
            query = query.bind(("username", username));
        }
        if let Some(secret_hash) = patch.secret_hash {
            query = query.bind(("secret_hash", secret_hash));
        }
        if let Some(salt) = patch.salt {
            query = query.bind(("salt", salt));
        }
        if let Some(encrypted_key) = patch.encrypted_key {
            query = query.bind(("encrypted_key", encrypted_key));
        }
        if let Some(key_iv) = patch.key_iv {
            query = query.bind(("key_iv", key_iv));
        }

        let updated =
            query.await.map_err(classify)?.take::<Vec<String>>(0).map_err(classify)?;
        Ok(updated.len())
    }

    /// Deletes a user and all credential records it owns, in one transaction.
    ///
    /// Dependents are removed before the owner; if the user does not exist
    /// the transaction aborts and no credential is touched.
    ///
    /// # Errors
    /// * [`UsersError::NotFound`] if the user does not exist.
    /// * [`UsersError::Database`] for engine failures.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<CascadeReport, UsersError> {
        let counts = self
            .db
            .query(
                "BEGIN TRANSACTION;
                IF !record::exists(type::record('user', $id)) { THROW 'user-not-found' };
                LET $credentials = (DELETE credential WHERE owner = type::record('user', $id) RETURN VALUE id);
                LET $users = (DELETE type::record('user', $id) RETURN VALUE id);
                RETURN { users: count($users), credentials: count($credentials) };
                COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_owned()))
            .await
            .map_err(classify)?
            .take::<Option<CascadeCounts>>(3)
            .map_err(classify)?
            .ok_or_else(|| UsersError::Internal {
                message: "Cascade delete returned no report".into(),
                context: None,
            })?;

        Ok(CascadeReport {
            users: usize::try_from(counts.users).unwrap_or_default(),
            credentials: usize::try_from(counts.credentials).unwrap_or_default(),
        })
    }
}

/// Maps engine errors onto domain errors by inspecting the failure text.
/// Unique index violations surface as `UsernameTaken`, aborted owner checks
/// as `NotFound`.
fn classify(e: surrealdb::Error) -> UsersError {
    let text = e.to_string();
    if text.contains("already contains") {
        UsersError::UsernameTaken {
            message: text.into(),
            context: Some("Unique username index".into()),
        }
    } else if text.contains("user-not-found") {
        UsersError::NotFound { message: text.into(), context: None }
    } else {
        UsersError::Database { source: e, context: None }
    }
}
