//! Assessment item input model and local schema validation.
//!
//! [`AssessmentItemInput`] is the published contract the upstream authoring
//! layer (human or AI) produces: it is constructed once upstream, consumed
//! once by the compiler, and never mutated in place. `from_json` is the
//! single entry point and fails fast with structured diagnostics.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{SchemaDiagnostic, SchemaError};
use crate::widget::WidgetSpec;

/// Maximum length for document and response identifiers.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Check if a character is valid for identifiers.
fn is_valid_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
}

/// Validate an identifier: 1-64 chars, alphanumeric/hyphen/underscore/dot.
#[must_use]
pub fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_IDENTIFIER_LEN && id.chars().all(is_valid_id_char)
}

/// The three document kinds the compiler can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// One scored question.
    Item,
    /// An ordered collection of item references.
    Test,
    /// A shared reading passage.
    Stimulus,
}

impl DocumentKind {
    /// The root element tag of a compiled document of this kind.
    #[must_use]
    pub fn root_tag(self) -> &'static str {
        match self {
            Self::Item => "qti-assessment-item",
            Self::Test => "qti-assessment-test",
            Self::Stimulus => "qti-assessment-stimulus",
        }
    }

    /// The schema name the remote validator expects.
    #[must_use]
    pub fn schema_name(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Test => "test",
            Self::Stimulus => "stimulus",
        }
    }
}

/// How many values a response may carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Exactly one value.
    #[default]
    Single,
    /// An unordered set of values.
    Multiple,
    /// An ordered list of values.
    Ordered,
}

impl Cardinality {
    /// The QTI attribute value for this cardinality.
    #[must_use]
    pub fn as_qti(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Ordered => "ordered",
        }
    }
}

/// The value type of a response or outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    /// A choice identifier.
    #[default]
    Identifier,
    /// Free text.
    String,
    /// A whole number.
    Integer,
    /// A floating-point number.
    Float,
}

impl BaseType {
    /// The QTI attribute value for this base type.
    #[must_use]
    pub fn as_qti(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }
}

/// One entry of a response value-mapping table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MappingEntry {
    /// Candidate response value.
    pub map_key: String,
    /// Score awarded for that value.
    pub mapped_value: f64,
}

/// A value-mapping table attached to a response declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResponseMapping {
    /// Score for values absent from the table.
    #[serde(default)]
    pub default_value: f64,
    /// The mapping entries.
    pub entries: Vec<MappingEntry>,
}

/// Declares the expected shape and scoring of one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResponseDeclaration {
    /// Response identifier, referenced by exactly one interaction.
    pub identifier: String,
    /// Value cardinality.
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Value base type.
    #[serde(default)]
    pub base_type: BaseType,
    /// Correct response values.
    #[serde(default)]
    pub correct: Vec<String>,
    /// Optional value-mapping table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<ResponseMapping>,
}

/// Declares one scored or reported outcome variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutcomeDeclaration {
    /// Outcome identifier, e.g. `SCORE`.
    pub identifier: String,
    /// Value cardinality.
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Value base type.
    #[serde(default = "OutcomeDeclaration::default_base_type")]
    pub base_type: BaseType,
    /// Maximum value the outcome normalizes to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_maximum: Option<f64>,
    /// Initial value of the outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
}

impl OutcomeDeclaration {
    fn default_base_type() -> BaseType {
        BaseType::Float
    }
}

/// One selectable choice of a choice or inline-choice interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Choice {
    /// Choice identifier, the value submitted when selected.
    pub identifier: String,
    /// Markup content shown to the learner.
    pub content: String,
}

/// Parameters of a multiple-choice interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChoiceInteraction {
    /// The response this interaction is bound to.
    pub response_identifier: String,
    /// Markup prompt shown above the choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// The selectable choices.
    pub choices: Vec<Choice>,
    /// Whether the delivery engine may shuffle choice order.
    #[serde(default)]
    pub shuffle: bool,
    /// Maximum number of selectable choices.
    #[serde(default = "ChoiceInteraction::default_max_choices")]
    pub max_choices: u32,
}

impl ChoiceInteraction {
    fn default_max_choices() -> u32 {
        1
    }
}

/// Parameters of a text-entry interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextEntryInteraction {
    /// The response this interaction is bound to.
    pub response_identifier: String,
    /// Hint for the rendered input width, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_length: Option<u32>,
}

/// Parameters of an inline-choice (dropdown) interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InlineChoiceInteraction {
    /// The response this interaction is bound to.
    pub response_identifier: String,
    /// The selectable choices.
    pub choices: Vec<Choice>,
    /// Whether the delivery engine may shuffle choice order.
    #[serde(default)]
    pub shuffle: bool,
}

/// The interactive controls the compiler can represent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Interaction {
    /// Radio/checkbox choice block.
    Choice(ChoiceInteraction),
    /// Inline text input.
    TextEntry(TextEntryInteraction),
    /// Inline dropdown.
    InlineChoice(InlineChoiceInteraction),
}

impl Interaction {
    /// The response identifier this interaction is bound to.
    #[must_use]
    pub fn response_identifier(&self) -> &str {
        match self {
            Self::Choice(c) => &c.response_identifier,
            Self::TextEntry(t) => &t.response_identifier,
            Self::InlineChoice(i) => &i.response_identifier,
        }
    }
}

/// One `{{...}}` placeholder found in a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `{{widget:SLOT}}` - replaced by a rendered widget fragment.
    Widget(String),
    /// `{{interaction:RESPONSE_ID}}` - replaced by interaction markup.
    Interaction(String),
    /// Anything else between double braces; always a compile error.
    Unknown(String),
}

/// Scan a body for placeholders, in order of appearance, duplicates kept.
#[must_use]
pub fn placeholders(body: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else { break };
        let token = &after[..end];
        let placeholder = match token.split_once(':') {
            Some(("widget", slot)) => Placeholder::Widget(slot.trim().to_string()),
            Some(("interaction", id)) => Placeholder::Interaction(id.trim().to_string()),
            _ => Placeholder::Unknown(token.to_string()),
        };
        found.push(placeholder);
        rest = &after[end + 2..];
    }
    found
}

/// The full input for one assessment item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssessmentItemInput {
    /// Document identifier, echoed on the compiled root element.
    pub identifier: String,
    /// Document title, echoed on the compiled root element.
    pub title: String,
    /// Markup body with `{{widget:...}}` and `{{interaction:...}}` slots.
    pub body: String,
    /// Widget specs keyed by slot id. Ordered for deterministic output.
    #[serde(default)]
    pub widgets: BTreeMap<String, WidgetSpec>,
    /// Interactive controls referenced from the body.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    /// Response declarations, one per interaction.
    #[serde(default)]
    pub response_declarations: Vec<ResponseDeclaration>,
    /// Outcome declarations.
    #[serde(default)]
    pub outcome_declarations: Vec<OutcomeDeclaration>,
}

impl AssessmentItemInput {
    /// Parse and validate one raw structured item.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Contract`] when the JSON does not deserialize
    /// against the contract, or [`SchemaError::Invalid`] with every semantic
    /// diagnostic found. Nothing downstream runs on a failed parse.
    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        let item: Self = serde_json::from_str(raw)?;
        item.validate()?;
        Ok(item)
    }

    /// Run semantic validation on an already-deserialized item.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Invalid`] listing every violation.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut diagnostics = Vec::new();

        if !is_valid_identifier(&self.identifier) {
            diagnostics.push(SchemaDiagnostic::new(
                "identifier",
                "must be 1-64 chars of [A-Za-z0-9._-]",
            ));
        }
        if self.title.trim().is_empty() {
            diagnostics.push(SchemaDiagnostic::new("title", "must not be empty"));
        }
        if self.body.trim().is_empty() {
            diagnostics.push(SchemaDiagnostic::new("body", "must not be empty"));
        }

        for slot in self.widgets.keys() {
            if !is_valid_identifier(slot) {
                diagnostics.push(SchemaDiagnostic::new(
                    format!("widgets.{slot}"),
                    "slot id must be 1-64 chars of [A-Za-z0-9._-]",
                ));
            }
        }

        let mut seen_responses = BTreeSet::new();
        for (idx, decl) in self.response_declarations.iter().enumerate() {
            if !is_valid_identifier(&decl.identifier) {
                diagnostics.push(SchemaDiagnostic::new(
                    format!("responseDeclarations[{idx}].identifier"),
                    "must be 1-64 chars of [A-Za-z0-9._-]",
                ));
            }
            if !seen_responses.insert(decl.identifier.clone()) {
                diagnostics.push(SchemaDiagnostic::new(
                    format!("responseDeclarations[{idx}].identifier"),
                    format!("duplicate declaration for {}", decl.identifier),
                ));
            }
        }

        let mut seen_outcomes = BTreeSet::new();
        for (idx, decl) in self.outcome_declarations.iter().enumerate() {
            if !seen_outcomes.insert(decl.identifier.clone()) {
                diagnostics.push(SchemaDiagnostic::new(
                    format!("outcomeDeclarations[{idx}].identifier"),
                    format!("duplicate declaration for {}", decl.identifier),
                ));
            }
        }

        let mut seen_interactions = BTreeSet::new();
        for (idx, interaction) in self.interactions.iter().enumerate() {
            let response = interaction.response_identifier();
            if !seen_interactions.insert(response.to_string()) {
                diagnostics.push(SchemaDiagnostic::new(
                    format!("interactions[{idx}]"),
                    format!("second interaction bound to response {response}"),
                ));
            }
        }

        if diagnostics.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Invalid { diagnostics })
        }
    }
}

/// A reference from a test section to a compiled item document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemRef {
    /// Reference identifier, unique within the test.
    pub identifier: String,
    /// Location of the referenced item document.
    pub href: String,
}

/// One ordered section of a test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestSection {
    /// Section identifier.
    pub identifier: String,
    /// Section title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Item references in delivery order.
    pub item_refs: Vec<ItemRef>,
}

/// The full input for one assessment test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssessmentTestInput {
    /// Document identifier.
    pub identifier: String,
    /// Document title.
    pub title: String,
    /// Test parts, each a section of item references.
    pub sections: Vec<TestSection>,
}

/// The full input for one shared stimulus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StimulusInput {
    /// Document identifier.
    pub identifier: String,
    /// Document title.
    pub title: String,
    /// Markup passage body.
    pub body: String,
}
