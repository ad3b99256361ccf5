//! Tabular widgets, rendered as minimal HTML rather than SVG.

use std::fmt::Write;

use itempress_core::{DataTableWidget, FrequencyTableWidget};

use crate::error::{WidgetError, WidgetResult};
use crate::svg::{escape_xml, fmt_num};

/// Render the `dataTable` widget.
///
/// # Errors
///
/// Returns [`WidgetError`] when there are no headers or a row width does
/// not match the header width.
pub fn render_data_table(widget: &DataTableWidget) -> WidgetResult<String> {
    if widget.headers.is_empty() {
        return Err(WidgetError::EmptyDataset(
            "data table needs at least one header".to_string(),
        ));
    }
    for (index, row) in widget.rows.iter().enumerate() {
        if row.len() != widget.headers.len() {
            return Err(WidgetError::InvalidDimensions(format!(
                "row {index} has {} cells, expected {}",
                row.len(),
                widget.headers.len()
            )));
        }
    }

    let mut html = String::with_capacity(512);
    html.push_str("<table class=\"itempress-table\">");
    if let Some(title) = &widget.title {
        let _ = write!(html, "<caption>{}</caption>", escape_xml(title));
    }
    html.push_str("<thead><tr>");
    for header in &widget.headers {
        let _ = write!(html, "<th>{}</th>", escape_xml(header));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &widget.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_xml(cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    Ok(html)
}

/// Render the `frequencyTable` widget.
///
/// # Errors
///
/// Returns [`WidgetError::EmptyDataset`] when there are no rows.
pub fn render_frequency_table(widget: &FrequencyTableWidget) -> WidgetResult<String> {
    if widget.rows.is_empty() {
        return Err(WidgetError::EmptyDataset(
            "frequency table needs at least one row".to_string(),
        ));
    }

    let mut html = String::with_capacity(512);
    html.push_str("<table class=\"itempress-table\">");
    if let Some(title) = &widget.title {
        let _ = write!(html, "<caption>{}</caption>", escape_xml(title));
    }
    let _ = write!(
        html,
        "<thead><tr><th>{}</th><th>{}</th></tr></thead><tbody>",
        escape_xml(&widget.category_label),
        escape_xml(&widget.count_label),
    );
    for row in &widget.rows {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_xml(&row.category),
            fmt_num(row.count),
        );
    }
    html.push_str("</tbody></table>");
    Ok(html)
}
