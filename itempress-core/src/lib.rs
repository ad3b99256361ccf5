//! # Itempress Core
//!
//! Data model for the assessment-item compiler pipeline: the closed widget
//! schema registry, the assessment-item input contract with local schema
//! validation, and the deterministic variant bucketer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               itempress-core                 │
//! ├──────────────────────┬───────────────────────┤
//! │  Widget Registry     │  Item Input Model     │
//! │  - WidgetSpec union  │  - AssessmentItemInput│
//! │  - WidgetKind::ALL   │  - declarations       │
//! │  - prompt catalog    │  - local validation   │
//! ├──────────────────────┴───────────────────────┤
//! │  Variant Bucketer (seeded, hash-ordered)     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Everything here is pure data: no I/O, no shared state, safe to use from
//! parallel compilations without locking.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bucket;
pub mod error;
pub mod item;
pub mod prompt;
pub mod registry;
pub mod widget;

pub use bucket::{bucketize, BucketError, PoolQuestion};
pub use error::{SchemaDiagnostic, SchemaError};
pub use item::{
    placeholders, AssessmentItemInput, AssessmentTestInput, BaseType, Cardinality, Choice,
    ChoiceInteraction, DocumentKind, InlineChoiceInteraction, Interaction, ItemRef, MappingEntry,
    OutcomeDeclaration, Placeholder, ResponseDeclaration, ResponseMapping, StimulusInput,
    TestSection, TextEntryInteraction,
};
pub use prompt::{catalog, PromptWidget};
pub use registry::WidgetKind;
pub use widget::{
    AxisOptions, BarChartWidget, BarDatum, Coordinate, CoordinatePlaneWidget, DataTableWidget,
    DistanceSpec, DotPlotColumn, DotPlotWidget, FrequencyRow, FrequencyTableWidget, GraphSeries,
    HistogramBin, HistogramWidget, LineEquation, LineGraphWidget, LineSpec, NumberLinePoint,
    NumberLineWidget, PieChartWidget, PieSlice, PlotPoint, PointStyle, PolygonSpec, PolylineSpec,
    ScatterPlotWidget, StrokeStyle, WidgetSpec, CHART_PALETTE, DEFAULT_COLOR,
};

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
