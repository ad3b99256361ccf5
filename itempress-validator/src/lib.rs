//! # Itempress Validator
//!
//! Best-effort remote round-trip validation of compiled documents against
//! the authoritative schema validator, without ever mutating production
//! content.
//!
//! ## Protocol
//!
//! ```text
//! compiled doc ──► rewrite root id to temp namespace
//!                  ──► upsert (create on not-found)
//!                  ──► read {success}
//!                  ──► delete temp doc (always; failure only logged)
//! ```
//!
//! This is the pipeline's only network-bound component. Batches run
//! concurrently inside and sequentially across, with a configurable
//! inter-batch delay as the sole backpressure control. Retry policy is
//! the caller's concern; the crate adds no timeouts of its own.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;

pub use client::{
    rewrite_identifier, RoundTripReport, RoundTripValidator, ValidatorConfig, ValidatorError,
    DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE, DEFAULT_TEMP_PREFIX,
};

/// Validator crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
