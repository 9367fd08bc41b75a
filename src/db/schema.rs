//! Schema provisioning for the user store.
//!
//! The users table is created lazily on first use: [`ensure_schema`] probes
//! the store catalog and applies the bundled schema script when the table is
//! missing. The script is sanitized before execution: comment lines and
//! blank lines are stripped and the remainder is split into individual
//! statements on `;` boundaries, each executed in sequence. Some stores
//! reject multi-statement execution or choke on a leading comment; running
//! statements one at a time tolerates both.
//!
//! # Example
//!
//! ```no_run
//! use userstore::db::pool::{create_pool, DatabaseConfig};
//! use userstore::db::schema::ensure_schema;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig {
//!     url: "sqlite:data/users.db".to_string(),
//!     ..Default::default()
//! };
//! let pool = create_pool(config).await?;
//!
//! ensure_schema(&pool).await?;
//! # Ok(())
//! # }
//! ```

use sqlx::sqlite::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::StoreError;

/// Bundled schema script, embedded at compile time.
const SCHEMA_SQL: &str = include_str!("../../migrations/0001_create_users.sql");

/// Name of the provisioned table.
pub const USERS_TABLE: &str = "users";

/// Ensures the users table exists, applying the bundled schema if needed
///
/// Idempotent and safe to call on every store construction. If the catalog
/// probe itself fails, the failure is logged and the schema is applied
/// anyway, since a failed check is not proof the table exists.
///
/// # Errors
///
/// Returns [`StoreError::Provisioning`] if the schema script fails to apply.
/// No further operation can succeed without the table, so this is fatal.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    match table_exists(pool, USERS_TABLE).await {
        Ok(true) => {
            debug!(table = USERS_TABLE, "Schema already provisioned");
            return Ok(());
        }
        Ok(false) => {
            info!(table = USERS_TABLE, "Table missing, applying bundled schema");
        }
        Err(e) => {
            // The probe can fail on a cold store before any catalog exists;
            // applying the schema either cures that or fails fatally below.
            warn!(
                error = %e,
                "Table existence check failed, attempting schema application anyway"
            );
        }
    }

    apply_schema(pool).await
}

/// Checks the store catalog for a table with the given name
///
/// # Errors
///
/// Returns an error if the catalog query fails
pub async fn table_exists(pool: &SqlitePool, name: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;

    Ok(row.is_some())
}

/// Applies the bundled schema script, one statement at a time
async fn apply_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    for statement in statements(SCHEMA_SQL) {
        debug!(statement = %statement, "Executing schema statement");
        sqlx::query(&statement)
            .execute(pool)
            .await
            .map_err(StoreError::Provisioning)?;
    }

    info!("Schema migration completed successfully");
    Ok(())
}

/// Splits a schema script into executable statements
///
/// Comment lines (`--`) and blank lines are dropped, then the remainder is
/// split on `;` boundaries. Statements come back trimmed and non-empty.
pub(crate) fn statements(script: &str) -> Vec<String> {
    let sanitized = script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    sanitized
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(str::to_owned)
        .collect()
}
