//! Widget dispatch: one validated spec in, one markup fragment out.

use itempress_core::WidgetSpec;

use crate::charts::{
    render_bar_chart, render_dot_plot, render_histogram, render_line_graph, render_pie_chart,
    render_scatter_plot,
};
use crate::error::WidgetResult;
use crate::number_line::render_number_line;
use crate::plane::render_coordinate_plane;
use crate::tables::{render_data_table, render_frequency_table};

/// The tags this dispatcher's match arms handle.
///
/// Written out by hand: the dispatcher's own enumeration of the widget
/// set, compared against the registry and the prompt catalog by the
/// consistency tests.
pub const HANDLED_TAGS: [&str; 10] = [
    "coordinatePlane",
    "numberLine",
    "scatterPlot",
    "lineGraph",
    "barChart",
    "histogram",
    "dotPlot",
    "pieChart",
    "dataTable",
    "frequencyTable",
];

/// Render one widget spec to its markup fragment.
///
/// Pure and deterministic: the same spec always produces byte-identical
/// markup, with no I/O of any kind.
///
/// # Errors
///
/// Returns [`crate::WidgetError`] aborting only this widget's render.
pub fn render_widget(spec: &WidgetSpec) -> WidgetResult<String> {
    let fragment = match spec {
        WidgetSpec::CoordinatePlane(widget) => render_coordinate_plane(widget)?,
        WidgetSpec::NumberLine(widget) => render_number_line(widget)?,
        WidgetSpec::ScatterPlot(widget) => render_scatter_plot(widget)?,
        WidgetSpec::LineGraph(widget) => render_line_graph(widget)?,
        WidgetSpec::BarChart(widget) => render_bar_chart(widget)?,
        WidgetSpec::Histogram(widget) => render_histogram(widget)?,
        WidgetSpec::DotPlot(widget) => render_dot_plot(widget)?,
        WidgetSpec::PieChart(widget) => render_pie_chart(widget)?,
        WidgetSpec::DataTable(widget) => render_data_table(widget)?,
        WidgetSpec::FrequencyTable(widget) => render_frequency_table(widget)?,
    };
    tracing::debug!(
        kind = %spec.kind(),
        bytes = fragment.len(),
        "rendered widget fragment"
    );
    Ok(fragment)
}
