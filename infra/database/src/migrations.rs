use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// Bootstraps the migration ledger itself. Applied outside the ledger check,
/// so it must stay idempotent (`IF NOT EXISTS` / `OVERWRITE` only).
const LEDGER_SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS migration SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS slice_key ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS version ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS checksum ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS applied_at ON migration TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS migration_key ON migration FIELDS slice_key, version UNIQUE;
";

const USERS_SCHEMA: &str = "
    DEFINE TABLE user SCHEMAFULL;
    DEFINE FIELD username ON user TYPE string;
    DEFINE FIELD secret_hash ON user TYPE string;
    DEFINE FIELD salt ON user TYPE bytes;
    DEFINE FIELD encrypted_key ON user TYPE bytes;
    DEFINE FIELD key_iv ON user TYPE bytes;
    DEFINE FIELD created_at ON user TYPE datetime DEFAULT time::now() READONLY;
    DEFINE FIELD updated_at ON user TYPE datetime DEFAULT time::now();
    DEFINE INDEX user_username ON user FIELDS username UNIQUE;
";

const CREDENTIALS_SCHEMA: &str = "
    DEFINE TABLE credential SCHEMAFULL;
    DEFINE FIELD owner ON credential TYPE record<user>;
    DEFINE FIELD website ON credential TYPE string;
    DEFINE FIELD entries ON credential TYPE array DEFAULT [];
    DEFINE FIELD entries.* ON credential TYPE object FLEXIBLE;
    DEFINE FIELD created_at ON credential TYPE datetime DEFAULT time::now() READONLY;
    DEFINE FIELD updated_at ON credential TYPE datetime DEFAULT time::now();
    DEFINE INDEX credential_owner ON credential FIELDS owner;
";

#[derive(Debug)]
pub(crate) struct Migration {
    pub slice_key: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub(crate) const fn new(
        slice_key: &'static str,
        version: &'static str,
        script: &'static str,
    ) -> Self {
        Self { slice_key, version, script }
    }

    fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.script.as_bytes()))
    }

    fn to_applied(&self) -> AppliedMigration {
        AppliedMigration {
            slice_key: self.slice_key.to_owned(),
            version: self.version.to_owned(),
            checksum: self.checksum(),
        }
    }
}

/// Ordered list of schema migrations. `user` must precede `credential`
/// because of the `record<user>` link on the owner field.
fn builtin_migrations() -> Vec<Migration> {
    vec![
        Migration::new("users", "0001", USERS_SCHEMA),
        Migration::new("credentials", "0001", CREDENTIALS_SCHEMA),
    ]
}

#[derive(Debug, Default)]
pub(crate) struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct AppliedMigration {
    pub slice_key: String,
    pub version: String,
    pub checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner {
    db: Surreal<Any>,
}

impl MigrationRunner {
    #[must_use]
    pub(crate) const fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        let mut report = MigrationReport::default();
        let applied_migrations = self.get_migrations_map().await?;

        self.db.query(LEDGER_SCHEMA).await.context("Bootstrapping migration ledger")?;

        for migration in builtin_migrations() {
            if let Some(applied) =
                applied_migrations.get(&format!("{}:{}", migration.slice_key, migration.version))
            {
                ensure_checksum_match(&migration, &applied.checksum)?;
                report.skipped.push(migration.to_applied());
                continue;
            }

            self.apply_migration(&migration).await?;
            report.applied.push(migration.to_applied());
        }

        Ok(report)
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration SET slice_key = $slice, version = $version, checksum = $checksum;
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("slice", migration.slice_key))
            .bind(("version", migration.version))
            .bind(("checksum", migration.checksum()))
            .await
            .context(format!(
                "SQL execution failed at {}:{}",
                migration.slice_key, migration.version
            ))?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(())
    }

    async fn is_ledger_ready(&self) -> Result<bool, DatabaseError> {
        let mut response = self
            .db
            .query("!(SELECT VALUE fields FROM ONLY INFO FOR TABLE migration).is_empty()")
            .await
            .context("Checking if migration ledger exists")?;

        let is_ready = response.take::<Option<bool>>(0)?.unwrap_or_default();
        Ok(is_ready)
    }

    async fn get_migrations_map(
        &self,
    ) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let is_ready = self.is_ledger_ready().await?;

        if !is_ready {
            return Ok(FxHashMap::default());
        }

        let entries = self
            .db
            .query("SELECT slice_key, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing migrations map")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice_key, entry.version), entry))
            .collect())
    }
}

fn ensure_checksum_match(migration: &Migration, existing: &str) -> Result<(), DatabaseError> {
    if existing != migration.checksum() {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {}:{} (expected {}, got {})",
                migration.slice_key,
                migration.version,
                existing,
                migration.checksum()
            )
            .into(),
            context: Some("Migration already applied with different checksum".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered_users_first() {
        let slices: Vec<_> = builtin_migrations().iter().map(|m| m.slice_key).collect();
        assert_eq!(slices, vec!["users", "credentials"]);
    }

    #[tokio::test]
    async fn second_run_skips_applied_migrations() {
        let db = surrealdb::engine::any::connect("mem://").await.expect("In-memory engine");
        db.use_ns("test").use_db("migrations").await.expect("Session");
        let runner = MigrationRunner::new(db);

        let first = runner.run().await.expect("First run");
        assert_eq!(first.applied.len(), 2);
        assert!(first.skipped.is_empty());

        let second = runner.run().await.expect("Second run");
        assert!(second.applied.is_empty());
        assert_eq!(second.skipped.len(), 2);
    }

    #[test]
    fn checksum_mismatch_is_a_migration_error() {
        let migration = Migration::new("users", "0001", USERS_SCHEMA);

        assert!(ensure_checksum_match(&migration, &migration.checksum()).is_ok());
        assert!(matches!(
            ensure_checksum_match(&migration, "deadbeef"),
            Err(DatabaseError::Migration { .. })
        ));
    }
}
