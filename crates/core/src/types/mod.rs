//! Core types for Jiraibrary.
//!
//! This module provides type-safe wrappers for catalog domain concepts.

pub mod catalog;
pub mod id;
pub mod measurement;
pub mod price;
pub mod status;

pub use catalog::*;
pub use id::*;
pub use measurement::{Measurement, MeasurementField};
pub use price::{CurrencyCode, CurrencyCodeError, Price, PriceSource};
pub use status::*;
