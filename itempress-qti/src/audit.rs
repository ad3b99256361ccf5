//! Data-quality audits over assessment items.
//!
//! Audits detect smells the compiler deliberately permits. They never
//! mutate or repair anything; callers decide what to do with findings.

use itempress_core::{AssessmentItemInput, BaseType};

/// One multi-entry string-mapping finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingAuditFinding {
    /// The response declaration carrying the mapping.
    pub response_identifier: String,
    /// How many entries the mapping carries.
    pub entry_count: usize,
}

/// Find string-base-type response declarations whose value-mapping table
/// carries more than one entry.
///
/// Such declarations are expected to carry exactly one mapping entry;
/// documents with more are a known data-quality smell. The compiler does
/// not reject them - this detector exists so downstream tooling can flag
/// them item by item.
#[must_use]
pub fn multi_entry_string_mappings(item: &AssessmentItemInput) -> Vec<MappingAuditFinding> {
    item.response_declarations
        .iter()
        .filter(|declaration| declaration.base_type == BaseType::String)
        .filter_map(|declaration| {
            let mapping = declaration.mapping.as_ref()?;
            (mapping.entries.len() > 1).then(|| MappingAuditFinding {
                response_identifier: declaration.identifier.clone(),
                entry_count: mapping.entries.len(),
            })
        })
        .collect()
}
