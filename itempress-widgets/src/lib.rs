//! # Itempress Widgets
//!
//! The shared 2D geometry-to-markup rendering kernel and the per-kind
//! widget generators it powers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             itempress-widgets                │
//! ├──────────────────────┬───────────────────────┤
//! │  Geometry Kernel     │  Generators           │
//! │  - PlotFrame scaling │  - coordinate plane   │
//! │  - RenderExtents     │  - number line        │
//! │  - SvgDoc builder    │  - charts, tables     │
//! ├──────────────────────┴───────────────────────┤
//! │  Dispatcher (exhaustive over WidgetSpec)     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Rendering is pure and synchronous: no network, no filesystem, no shared
//! mutable state. Identical specs produce byte-identical fragments, which
//! snapshot tests rely on.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod charts;
pub mod dispatch;
pub mod error;
pub mod extents;
pub mod number_line;
pub mod plane;
pub mod scale;
pub mod svg;
pub mod tables;

pub use dispatch::{render_widget, HANDLED_TAGS};
pub use error::{WidgetError, WidgetResult};
pub use extents::{RenderExtents, CANVAS_MARGIN};
pub use scale::{PlotFrame, PAD_BOTTOM, PAD_LEFT, PAD_RIGHT, PAD_TOP};
pub use svg::{escape_xml, fmt_num, SvgDoc, SVG_NS};

/// Widgets crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
