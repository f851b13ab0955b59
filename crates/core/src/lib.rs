//! Jiraibrary Core - Shared catalog types.
//!
//! This crate provides the domain types used across all Jiraibrary components:
//! - `facets` - Faceted browse engine over the item catalog
//! - `api` - HTTP service exposing the browse endpoint
//! - `cli` - Command-line tools for migrations, seeding, and offline queries
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, statuses, measurements, and catalog records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
