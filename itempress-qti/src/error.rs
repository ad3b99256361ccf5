//! Compilation error types.

use itempress_core::SchemaError;
use itempress_widgets::WidgetError;
use thiserror::Error;

use crate::sanitize::SanitizeError;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that abort a document compilation.
///
/// Compilation never partially emits: any error here means no document.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The input failed local schema validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A markup field could not be reduced to the sanitizer allow-list.
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    /// One widget failed to render.
    #[error("widget {slot} failed to render: {source}")]
    Widget {
        /// The widget slot id.
        slot: String,
        /// The underlying widget error.
        source: WidgetError,
    },

    /// The body references a widget slot with no definition.
    #[error("body references undefined widget slot {0}")]
    UnknownWidgetSlot(String),

    /// A widget definition is never referenced by the body.
    #[error("widget slot {0} is never referenced by the body")]
    UnreferencedWidget(String),

    /// The body contains the same placeholder more than once.
    #[error("placeholder {0} appears more than once in the body")]
    DuplicatePlaceholder(String),

    /// The body contains a placeholder that is neither widget nor
    /// interaction.
    #[error("unrecognized placeholder {{{{{0}}}}}")]
    UnknownPlaceholder(String),

    /// The body references an interaction that was never defined.
    #[error("body references undefined interaction for response {0}")]
    UnknownInteractionRef(String),

    /// An interaction was defined but never placed in the body.
    #[error("interaction for response {0} is never placed in the body")]
    UnplacedInteraction(String),

    /// An interaction's response identifier has no declaration.
    #[error("no response declaration for response {0}")]
    MissingResponseDeclaration(String),

    /// A question shape the compiler cannot represent. Terminal: callers
    /// must classify this as non-retriable, never retry it blindly.
    #[error("unsupported interaction for response {response}: {reason}")]
    UnsupportedInteraction {
        /// The bound response identifier.
        response: String,
        /// Why the shape cannot be represented.
        reason: String,
    },
}
