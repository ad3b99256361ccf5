//! QTI 3.0 document assembly.
//!
//! Pure and synchronous: one fully-validated input plus rendered widget
//! fragments in, one immutable XML document out. No I/O, no retries, and
//! never a partial document.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use itempress_core::{
    placeholders, AssessmentItemInput, AssessmentTestInput, BaseType, Choice, ChoiceInteraction,
    DocumentKind, InlineChoiceInteraction, Interaction, OutcomeDeclaration, Placeholder,
    ResponseDeclaration, SchemaDiagnostic, SchemaError, StimulusInput, TextEntryInteraction,
};
use itempress_widgets::{escape_xml, fmt_num, render_widget};

use crate::error::{CompileError, CompileResult};
use crate::sanitize::{sanitize_item, sanitize_stimulus};

/// The QTI 3.0 namespace, reproduced byte-exact on every document.
pub const QTI_NS: &str = "http://www.imsglobal.org/xsd/imsqtiasi_v3p0";
/// The XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// The fixed schema-location pair.
pub const QTI_SCHEMA_LOCATION: &str = "http://www.imsglobal.org/xsd/imsqtiasi_v3p0 \
     https://purl.imsglobal.org/spec/qti/v3p0/schema/xsd/imsqti_asiv3p0_v1p0.xsd";

/// Response-processing template for match-correct scoring.
const RP_MATCH_CORRECT: &str =
    "https://purl.imsglobal.org/spec/qti/v3p0/rptemplates/match_correct.xml";
/// Response-processing template for mapped scoring.
const RP_MAP_RESPONSE: &str =
    "https://purl.imsglobal.org/spec/qti/v3p0/rptemplates/map_response.xml";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// An immutable compiled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDocument {
    kind: DocumentKind,
    identifier: String,
    xml: String,
}

impl CompiledDocument {
    /// The document kind the root element matches.
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// The identifier echoed on the root element.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The UTF-8 XML text.
    #[must_use]
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Consume the document, returning the XML text.
    #[must_use]
    pub fn into_xml(self) -> String {
        self.xml
    }
}

fn open_root(xml: &mut String, kind: DocumentKind, identifier: &str, title: &str) {
    let _ = write!(
        xml,
        "<{} xmlns=\"{QTI_NS}\" xmlns:xsi=\"{XSI_NS}\" xsi:schemaLocation=\"{QTI_SCHEMA_LOCATION}\" identifier=\"{}\" title=\"{}\"",
        kind.root_tag(),
        escape_xml(identifier),
        escape_xml(title),
    );
}

/// Compile one assessment item.
///
/// Runs local validation and sanitization first, renders every widget,
/// substitutes body placeholders, and emits declarations, interactions,
/// and response processing.
///
/// # Errors
///
/// Returns [`CompileError`] on any validation, sanitization, widget, or
/// placeholder failure; nothing is emitted on error.
pub fn compile_item(item: &AssessmentItemInput) -> CompileResult<CompiledDocument> {
    item.validate()?;
    sanitize_item(item)?;

    // Render every widget up front; a failed widget fails the document.
    let mut fragments = BTreeMap::new();
    for (slot, spec) in &item.widgets {
        let fragment = render_widget(spec).map_err(|source| CompileError::Widget {
            slot: slot.clone(),
            source,
        })?;
        fragments.insert(slot.as_str(), fragment);
    }

    let interactions: BTreeMap<&str, &Interaction> = item
        .interactions
        .iter()
        .map(|interaction| (interaction.response_identifier(), interaction))
        .collect();
    let declarations: BTreeMap<&str, &ResponseDeclaration> = item
        .response_declarations
        .iter()
        .map(|declaration| (declaration.identifier.as_str(), declaration))
        .collect();

    for interaction in &item.interactions {
        let response = interaction.response_identifier();
        let declaration = declarations
            .get(response)
            .copied()
            .ok_or_else(|| CompileError::MissingResponseDeclaration(response.to_string()))?;
        check_supported(interaction, declaration)?;
    }

    let body = substitute_body(item, &fragments, &interactions)?;

    let mut xml = String::with_capacity(body.len() + 2048);
    xml.push_str(XML_DECL);
    open_root(&mut xml, DocumentKind::Item, &item.identifier, &item.title);
    xml.push_str(" adaptive=\"false\" time-dependent=\"false\">");

    for declaration in &item.response_declarations {
        write_response_declaration(&mut xml, declaration);
    }
    for declaration in &item.outcome_declarations {
        write_outcome_declaration(&mut xml, declaration);
    }

    let _ = write!(xml, "<qti-item-body>{body}</qti-item-body>");

    if !item.interactions.is_empty() {
        let template = if item
            .response_declarations
            .iter()
            .any(|declaration| declaration.mapping.is_some())
        {
            RP_MAP_RESPONSE
        } else {
            RP_MATCH_CORRECT
        };
        let _ = write!(xml, "<qti-response-processing template=\"{template}\"/>");
    }

    let _ = write!(xml, "</{}>", DocumentKind::Item.root_tag());

    tracing::debug!(
        identifier = %item.identifier,
        widgets = item.widgets.len(),
        interactions = item.interactions.len(),
        bytes = xml.len(),
        "compiled assessment item"
    );
    Ok(CompiledDocument {
        kind: DocumentKind::Item,
        identifier: item.identifier.clone(),
        xml,
    })
}

/// Compile one assessment test.
///
/// # Errors
///
/// Returns [`CompileError::Schema`] for an invalid identifier, an empty
/// title, or empty sections.
pub fn compile_test(test: &AssessmentTestInput) -> CompileResult<CompiledDocument> {
    let mut diagnostics = Vec::new();
    if !itempress_core::item::is_valid_identifier(&test.identifier) {
        diagnostics.push(SchemaDiagnostic::new(
            "identifier",
            "must be 1-64 chars of [A-Za-z0-9._-]",
        ));
    }
    if test.title.trim().is_empty() {
        diagnostics.push(SchemaDiagnostic::new("title", "must not be empty"));
    }
    if test.sections.is_empty() {
        diagnostics.push(SchemaDiagnostic::new("sections", "must not be empty"));
    }
    for (index, section) in test.sections.iter().enumerate() {
        if section.item_refs.is_empty() {
            diagnostics.push(SchemaDiagnostic::new(
                format!("sections[{index}].itemRefs"),
                "must not be empty",
            ));
        }
    }
    if !diagnostics.is_empty() {
        return Err(CompileError::Schema(SchemaError::Invalid { diagnostics }));
    }

    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    open_root(&mut xml, DocumentKind::Test, &test.identifier, &test.title);
    xml.push('>');
    let _ = write!(
        xml,
        "<qti-test-part identifier=\"part-1\" navigation-mode=\"linear\" submission-mode=\"individual\">"
    );
    for section in &test.sections {
        let _ = write!(
            xml,
            "<qti-assessment-section identifier=\"{}\" visible=\"true\"",
            escape_xml(&section.identifier),
        );
        if let Some(title) = &section.title {
            let _ = write!(xml, " title=\"{}\"", escape_xml(title));
        }
        xml.push('>');
        for item_ref in &section.item_refs {
            let _ = write!(
                xml,
                "<qti-assessment-item-ref identifier=\"{}\" href=\"{}\"/>",
                escape_xml(&item_ref.identifier),
                escape_xml(&item_ref.href),
            );
        }
        xml.push_str("</qti-assessment-section>");
    }
    xml.push_str("</qti-test-part>");
    let _ = write!(xml, "</{}>", DocumentKind::Test.root_tag());

    Ok(CompiledDocument {
        kind: DocumentKind::Test,
        identifier: test.identifier.clone(),
        xml,
    })
}

/// Compile one shared stimulus.
///
/// # Errors
///
/// Returns [`CompileError`] for invalid metadata or a body that fails the
/// sanitizer.
pub fn compile_stimulus(stimulus: &StimulusInput) -> CompileResult<CompiledDocument> {
    let mut diagnostics = Vec::new();
    if !itempress_core::item::is_valid_identifier(&stimulus.identifier) {
        diagnostics.push(SchemaDiagnostic::new(
            "identifier",
            "must be 1-64 chars of [A-Za-z0-9._-]",
        ));
    }
    if stimulus.title.trim().is_empty() {
        diagnostics.push(SchemaDiagnostic::new("title", "must not be empty"));
    }
    if !diagnostics.is_empty() {
        return Err(CompileError::Schema(SchemaError::Invalid { diagnostics }));
    }
    sanitize_stimulus(stimulus)?;

    let mut xml = String::with_capacity(stimulus.body.len() + 512);
    xml.push_str(XML_DECL);
    open_root(
        &mut xml,
        DocumentKind::Stimulus,
        &stimulus.identifier,
        &stimulus.title,
    );
    xml.push('>');
    let _ = write!(xml, "<qti-stimulus-body>{}</qti-stimulus-body>", stimulus.body);
    let _ = write!(xml, "</{}>", DocumentKind::Stimulus.root_tag());

    Ok(CompiledDocument {
        kind: DocumentKind::Stimulus,
        identifier: stimulus.identifier.clone(),
        xml,
    })
}

/// Replace every placeholder in the body, enforcing exact resolution.
fn substitute_body(
    item: &AssessmentItemInput,
    fragments: &BTreeMap<&str, String>,
    interactions: &BTreeMap<&str, &Interaction>,
) -> CompileResult<String> {
    let found = placeholders(&item.body);

    let mut seen = BTreeSet::new();
    let mut used_widgets = BTreeSet::new();
    let mut placed_interactions = BTreeSet::new();
    for placeholder in &found {
        match placeholder {
            Placeholder::Widget(slot) => {
                if !seen.insert(format!("widget:{slot}")) {
                    return Err(CompileError::DuplicatePlaceholder(format!("widget:{slot}")));
                }
                if !fragments.contains_key(slot.as_str()) {
                    return Err(CompileError::UnknownWidgetSlot(slot.clone()));
                }
                used_widgets.insert(slot.clone());
            }
            Placeholder::Interaction(response) => {
                if !seen.insert(format!("interaction:{response}")) {
                    return Err(CompileError::DuplicatePlaceholder(format!(
                        "interaction:{response}"
                    )));
                }
                if !interactions.contains_key(response.as_str()) {
                    return Err(CompileError::UnknownInteractionRef(response.clone()));
                }
                placed_interactions.insert(response.clone());
            }
            Placeholder::Unknown(token) => {
                return Err(CompileError::UnknownPlaceholder(token.clone()));
            }
        }
    }

    for slot in fragments.keys() {
        if !used_widgets.contains(*slot) {
            return Err(CompileError::UnreferencedWidget((*slot).to_string()));
        }
    }
    for response in interactions.keys() {
        if !placed_interactions.contains(*response) {
            return Err(CompileError::UnplacedInteraction((*response).to_string()));
        }
    }

    // Each placeholder resolves to exactly one fragment, inserted verbatim.
    let mut body = item.body.clone();
    for (slot, fragment) in fragments {
        body = body.replace(&format!("{{{{widget:{slot}}}}}"), fragment);
    }
    for (response, interaction) in interactions {
        body = body.replace(
            &format!("{{{{interaction:{response}}}}}"),
            &render_interaction(interaction),
        );
    }
    Ok(body)
}

/// Reject question shapes the compiler cannot represent.
///
/// These are terminal: the orchestration layer must classify them as
/// non-retriable rather than retry blindly.
fn check_supported(
    interaction: &Interaction,
    declaration: &ResponseDeclaration,
) -> CompileResult<()> {
    let response = interaction.response_identifier().to_string();
    match interaction {
        Interaction::Choice(choice) => {
            if choice.choices.is_empty() {
                return Err(CompileError::UnsupportedInteraction {
                    response,
                    reason: "choice interaction with no choices".to_string(),
                });
            }
            // max-choices 0 means unlimited in QTI and is always valid.
            if choice.max_choices != 0 && u64::from(choice.max_choices) > choice.choices.len() as u64 {
                return Err(CompileError::UnsupportedInteraction {
                    response,
                    reason: format!(
                        "maxChoices {} exceeds the {} available choices",
                        choice.max_choices,
                        choice.choices.len()
                    ),
                });
            }
        }
        Interaction::InlineChoice(inline) => {
            if inline.choices.is_empty() {
                return Err(CompileError::UnsupportedInteraction {
                    response,
                    reason: "inline choice interaction with no choices".to_string(),
                });
            }
        }
        Interaction::TextEntry(_) => {
            if declaration.base_type == BaseType::Identifier {
                return Err(CompileError::UnsupportedInteraction {
                    response,
                    reason: "text entry bound to an identifier-typed response".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn render_interaction(interaction: &Interaction) -> String {
    match interaction {
        Interaction::Choice(choice) => render_choice(choice),
        Interaction::TextEntry(entry) => render_text_entry(entry),
        Interaction::InlineChoice(inline) => render_inline_choice(inline),
    }
}

fn render_choice(choice: &ChoiceInteraction) -> String {
    let mut xml = String::with_capacity(256);
    let _ = write!(
        xml,
        "<qti-choice-interaction response-identifier=\"{}\" shuffle=\"{}\" max-choices=\"{}\">",
        escape_xml(&choice.response_identifier),
        choice.shuffle,
        choice.max_choices,
    );
    if let Some(prompt) = &choice.prompt {
        let _ = write!(xml, "<qti-prompt>{prompt}</qti-prompt>");
    }
    for option in &choice.choices {
        write_simple_choice(&mut xml, "qti-simple-choice", option);
    }
    xml.push_str("</qti-choice-interaction>");
    xml
}

fn render_text_entry(entry: &TextEntryInteraction) -> String {
    let mut xml = String::with_capacity(96);
    let _ = write!(
        xml,
        "<qti-text-entry-interaction response-identifier=\"{}\"",
        escape_xml(&entry.response_identifier),
    );
    if let Some(expected_length) = entry.expected_length {
        let _ = write!(xml, " expected-length=\"{expected_length}\"");
    }
    xml.push_str("/>");
    xml
}

fn render_inline_choice(inline: &InlineChoiceInteraction) -> String {
    let mut xml = String::with_capacity(256);
    let _ = write!(
        xml,
        "<qti-inline-choice-interaction response-identifier=\"{}\" shuffle=\"{}\">",
        escape_xml(&inline.response_identifier),
        inline.shuffle,
    );
    for option in &inline.choices {
        write_simple_choice(&mut xml, "qti-inline-choice", option);
    }
    xml.push_str("</qti-inline-choice-interaction>");
    xml
}

fn write_simple_choice(xml: &mut String, tag: &str, option: &Choice) {
    let _ = write!(
        xml,
        "<{tag} identifier=\"{}\">{}</{tag}>",
        escape_xml(&option.identifier),
        option.content,
    );
}

fn write_response_declaration(xml: &mut String, declaration: &ResponseDeclaration) {
    let _ = write!(
        xml,
        "<qti-response-declaration identifier=\"{}\" cardinality=\"{}\" base-type=\"{}\"",
        escape_xml(&declaration.identifier),
        declaration.cardinality.as_qti(),
        declaration.base_type.as_qti(),
    );
    if declaration.correct.is_empty() && declaration.mapping.is_none() {
        xml.push_str("/>");
        return;
    }
    xml.push('>');
    if !declaration.correct.is_empty() {
        xml.push_str("<qti-correct-response>");
        for value in &declaration.correct {
            let _ = write!(xml, "<qti-value>{}</qti-value>", escape_xml(value));
        }
        xml.push_str("</qti-correct-response>");
    }
    if let Some(mapping) = &declaration.mapping {
        let _ = write!(
            xml,
            "<qti-mapping default-value=\"{}\">",
            fmt_num(mapping.default_value),
        );
        for entry in &mapping.entries {
            let _ = write!(
                xml,
                "<qti-map-entry map-key=\"{}\" mapped-value=\"{}\"/>",
                escape_xml(&entry.map_key),
                fmt_num(entry.mapped_value),
            );
        }
        xml.push_str("</qti-mapping>");
    }
    xml.push_str("</qti-response-declaration>");
}

fn write_outcome_declaration(xml: &mut String, declaration: &OutcomeDeclaration) {
    let _ = write!(
        xml,
        "<qti-outcome-declaration identifier=\"{}\" cardinality=\"{}\" base-type=\"{}\"",
        escape_xml(&declaration.identifier),
        declaration.cardinality.as_qti(),
        declaration.base_type.as_qti(),
    );
    if let Some(normal_maximum) = declaration.normal_maximum {
        let _ = write!(xml, " normal-maximum=\"{}\"", fmt_num(normal_maximum));
    }
    if let Some(default_value) = declaration.default_value {
        let _ = write!(
            xml,
            "><qti-default-value><qti-value>{}</qti-value></qti-default-value></qti-outcome-declaration>",
            fmt_num(default_value),
        );
    } else {
        xml.push_str("/>");
    }
}
