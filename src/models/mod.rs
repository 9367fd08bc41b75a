//! Data types for the user store
//!
//! # Models
//!
//! - `user`: the user row type plus creation and partial-update inputs

pub mod user;
