//! Database layer for the user store
//!
//! This module provides connection pooling and schema provisioning.
//!
//! # Modules
//!
//! - `pool`: SQLite connection pool management with health checks
//! - `schema`: lazy, idempotent provisioning of the users table
//!
//! # Example
//!
//! ```no_run
//! use userstore::db::pool::{create_pool, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig {
//!         url: std::env::var("DATABASE_URL")?,
//!         ..Default::default()
//!     };
//!
//!     let pool = create_pool(config).await?;
//!     Ok(())
//! }
//! ```

pub mod pool;
pub mod schema;
