//! Widget rendering error types.

use thiserror::Error;

/// Result type for widget rendering.
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Errors that abort the rendering of a single widget.
///
/// A failed widget never takes sibling widgets or the surrounding
/// compilation down with it; the caller decides how to proceed.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Non-positive canvas size, inverted axis range, or bad tick step.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A polygon or distance referenced a point id that was never plotted.
    #[error("unknown point reference: {0}")]
    UnknownPointReference(String),

    /// Two plotted points share an id, so references would be ambiguous.
    #[error("duplicate point id: {0}")]
    DuplicatePointId(String),

    /// A standard-form equation with `a = b = 0` describes no line.
    #[error("degenerate line equation: {0}")]
    DegenerateEquation(String),

    /// A widget that needs data was given none.
    #[error("empty dataset: {0}")]
    EmptyDataset(String),
}
