//! # Itempress QTI
//!
//! The document compiler: sanitizes one validated assessment item, embeds
//! its rendered widget fragments, and emits a single QTI 3.0 XML document
//! with response/outcome declarations and interaction markup.
//!
//! ## Pipeline position
//!
//! ```text
//! raw JSON ──► itempress-core (schema) ──► sanitize ──► widgets render
//!                                                          │
//!                      compiled XML ◄── compile_item ◄─────┘
//! ```
//!
//! Compilation is pure and synchronous: no I/O, no retries, and never a
//! partially emitted document.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod audit;
pub mod compile;
pub mod error;
pub mod sanitize;

pub use audit::{multi_entry_string_mappings, MappingAuditFinding};
pub use compile::{
    compile_item, compile_stimulus, compile_test, CompiledDocument, QTI_NS, QTI_SCHEMA_LOCATION,
    XSI_NS,
};
pub use error::{CompileError, CompileResult};
pub use sanitize::{
    sanitize_fragment, sanitize_item, sanitize_stimulus, SanitizeError, ALLOWED_ATTRIBUTES,
    ALLOWED_TAGS,
};

/// QTI crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
