//! # userstore
//!
//! Embeddable user store: CRUD, filtered search, pagination, and aggregate
//! statistics over a single-table SQLite user store, with self-healing
//! schema bootstrap.
//!
//! ## Module Organization
//!
//! - `db`: connection pool management and schema provisioning
//! - `models`: the user row type and mutation inputs
//! - `query`: listing descriptors, predicate assembly, pagination
//! - `store`: the query engine
//! - `config`: environment-based configuration
//! - `error`: the store error type
//!
//! ## Getting started
//!
//! ```no_run
//! use userstore::config::Config;
//! use userstore::db::pool::create_pool;
//! use userstore::store::UserStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let pool = create_pool(config.database).await?;
//!
//!     // Construction provisions the users table if it is missing.
//!     let store = UserStore::connect(pool).await?;
//!
//!     let stats = store.stats().await?;
//!     println!("{} users, {} active", stats.total_users, stats.active_users);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod store;

/// Current version of the userstore library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
