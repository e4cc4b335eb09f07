//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Role tags use the storage
//! vocabulary (`student` / `alumni` / `admin`).

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD first_name ON TABLE user TYPE string;
DEFINE FIELD last_name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['student', 'alumni', 'admin'];
DEFINE FIELD status ON TABLE user TYPE string \
    ASSERT $value IN ['pending', 'verified', 'suspended'];
DEFINE FIELD email_verified ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD profile ON TABLE user TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Pending registrations (one active draft per email)
-- =======================================================================
DEFINE TABLE pending_registration SCHEMAFULL;
DEFINE FIELD email ON TABLE pending_registration TYPE string;
DEFINE FIELD role ON TABLE pending_registration TYPE string \
    ASSERT $value IN ['student', 'alumni', 'admin'];
DEFINE FIELD first_name ON TABLE pending_registration TYPE string;
DEFINE FIELD last_name ON TABLE pending_registration TYPE string;
DEFINE FIELD password_hash ON TABLE pending_registration TYPE string;
DEFINE FIELD profile ON TABLE pending_registration TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE pending_registration TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE pending_registration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_pending_email ON TABLE pending_registration \
    COLUMNS email UNIQUE;

-- =======================================================================
-- Verification tokens (one active token per email + purpose)
-- =======================================================================
DEFINE TABLE verification_token SCHEMAFULL;
DEFINE FIELD email ON TABLE verification_token TYPE string;
DEFINE FIELD value ON TABLE verification_token TYPE string;
DEFINE FIELD kind ON TABLE verification_token TYPE string \
    ASSERT $value IN ['otp', 'link_token'];
DEFINE FIELD purpose ON TABLE verification_token TYPE string \
    ASSERT $value IN ['email_verification', 'password_reset'];
DEFINE FIELD issued_at ON TABLE verification_token TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD expires_at ON TABLE verification_token TYPE datetime;
DEFINE FIELD consumed ON TABLE verification_token TYPE bool DEFAULT false;
DEFINE INDEX idx_token_email_purpose ON TABLE verification_token \
    COLUMNS email, purpose UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );

            db.query(migration.sql)
                .await?
                .check()
                .map_err(|e| DbError::Migration(e.to_string()))?;

            db.query("CREATE _migration SET version = $version, name = $name")
                .bind(("version", migration.version))
                .bind(("name", migration.name.to_string()))
                .await?
                .check()
                .map_err(|e| DbError::Migration(e.to_string()))?;
        }
    }

    Ok(())
}
