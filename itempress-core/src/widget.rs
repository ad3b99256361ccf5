//! Widget specifications - the diagram vocabulary of an assessment item.
//!
//! Every widget kind is a variant of [`WidgetSpec`], an internally tagged
//! union whose JSON property names are the published structured-output
//! contract. The same shapes constrain AI generation upstream, so renames
//! here are a compatibility break, not a refactor.

use serde::{Deserialize, Serialize};

/// Default marker/stroke color used when the author omits one.
pub const DEFAULT_COLOR: &str = "#11accd";

/// Categorical palette for charts without per-datum colors.
///
/// Indexed deterministically by datum position so repeated renders agree.
pub const CHART_PALETTE: [&str; 6] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948",
];

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

fn default_canvas_side() -> f64 {
    400.0
}

fn default_chart_width() -> f64 {
    480.0
}

fn default_chart_height() -> f64 {
    320.0
}

/// Marker style for a plotted point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStyle {
    /// Hollow circle, used for excluded endpoints.
    Open,
    /// Filled circle.
    #[default]
    Closed,
}

/// Stroke style for lines and polylines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    /// Continuous stroke.
    #[default]
    Solid,
    /// Dashed stroke.
    Dashed,
    /// Dotted stroke.
    Dotted,
}

impl StrokeStyle {
    /// SVG `stroke-dasharray` value for this style, if any.
    #[must_use]
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("8 4"),
            Self::Dotted => Some("2 3"),
        }
    }
}

/// Axis configuration for one dimension of a plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AxisOptions {
    /// Axis title drawn alongside the axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Lower bound of the visible range. Must be strictly below `max`.
    pub min: f64,
    /// Upper bound of the visible range.
    pub max: f64,
    /// Distance between consecutive ticks. Must be positive.
    pub tick_interval: f64,
    /// Whether grid lines are drawn at each tick.
    #[serde(default = "default_true")]
    pub show_grid_lines: bool,
}

impl AxisOptions {
    /// Visible span of the axis (`max - min`).
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// A single plotted point, addressable by id from polygons and distances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlotPoint {
    /// Identifier unique within one diagram; the join key for overlays.
    pub id: String,
    /// Model-space x coordinate.
    pub x: f64,
    /// Model-space y coordinate.
    pub y: f64,
    /// Label drawn next to the marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Marker color.
    #[serde(default = "default_color")]
    pub color: String,
    /// Filled or hollow marker.
    #[serde(default)]
    pub style: PointStyle,
}

/// A line described by one of three equation forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LineSpec {
    /// Identifier unique within one diagram.
    pub id: String,
    /// The equation defining the line.
    pub equation: LineEquation,
    /// Stroke color.
    #[serde(default = "default_color")]
    pub color: String,
    /// Stroke style.
    #[serde(default)]
    pub style: StrokeStyle,
}

/// The three accepted equation forms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LineEquation {
    /// `y = slope * x + yIntercept`.
    SlopeIntercept {
        /// Slope of the line.
        slope: f64,
        /// Value of y where the line crosses the y axis.
        y_intercept: f64,
    },
    /// `a * x + b * y = c`. `a = b = 0` is degenerate and widget-fatal.
    Standard {
        /// Coefficient of x.
        a: f64,
        /// Coefficient of y.
        b: f64,
        /// Constant term.
        c: f64,
    },
    /// `y - y1 = slope * (x - x1)`.
    PointSlope {
        /// x coordinate of the anchor point.
        x1: f64,
        /// y coordinate of the anchor point.
        y1: f64,
        /// Slope of the line.
        slope: f64,
    },
}

/// A polygon whose vertices reference [`PlotPoint`] ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolygonSpec {
    /// Ordered vertex point ids. Every id must resolve to a plotted point.
    pub vertices: Vec<String>,
    /// Whether the last vertex connects back to the first.
    #[serde(default = "default_true")]
    pub is_closed: bool,
    /// Interior fill color, `"none"` for outline only.
    #[serde(default = "PolygonSpec::default_fill")]
    pub fill_color: String,
    /// Outline color.
    #[serde(default = "default_color")]
    pub stroke_color: String,
    /// Label drawn at the polygon centroid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PolygonSpec {
    fn default_fill() -> String {
        "none".to_string()
    }
}

/// A literal x/y coordinate pair (not an id reference).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coordinate {
    /// Model-space x coordinate.
    pub x: f64,
    /// Model-space y coordinate.
    pub y: f64,
}

/// An open path through literal coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolylineSpec {
    /// Identifier unique within one diagram.
    pub id: String,
    /// Path vertices in draw order. At least two.
    pub points: Vec<Coordinate>,
    /// Stroke color.
    #[serde(default = "default_color")]
    pub color: String,
    /// Stroke style.
    #[serde(default)]
    pub style: StrokeStyle,
}

/// A distance overlay between two plotted points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DistanceSpec {
    /// First endpoint's point id.
    pub point_id1: String,
    /// Second endpoint's point id.
    pub point_id2: String,
    /// Draw the horizontal/vertical legs of the right triangle.
    #[serde(default)]
    pub show_legs: bool,
    /// Annotate the legs with their lengths.
    #[serde(default)]
    pub show_leg_labels: bool,
    /// Label drawn at the hypotenuse midpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypotenuse_label: Option<String>,
    /// Stroke color.
    #[serde(default = "default_color")]
    pub color: String,
    /// Stroke style.
    #[serde(default)]
    pub style: StrokeStyle,
}

/// Parameters for the `coordinatePlane` widget family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CoordinatePlaneWidget {
    /// Nominal canvas width in pixels; extents may widen the final canvas.
    #[serde(default = "default_canvas_side")]
    pub width: f64,
    /// Nominal canvas height in pixels.
    #[serde(default = "default_canvas_side")]
    pub height: f64,
    /// Horizontal axis.
    pub x_axis: AxisOptions,
    /// Vertical axis.
    pub y_axis: AxisOptions,
    /// Draw Roman-numeral quadrant labels.
    #[serde(default)]
    pub show_quadrant_labels: bool,
    /// Plotted points.
    #[serde(default)]
    pub points: Vec<PlotPoint>,
    /// Equation-defined lines, clipped to the plot rectangle.
    #[serde(default)]
    pub lines: Vec<LineSpec>,
    /// Polygons over plotted point ids.
    #[serde(default)]
    pub polygons: Vec<PolygonSpec>,
    /// Literal-coordinate paths.
    #[serde(default)]
    pub polylines: Vec<PolylineSpec>,
    /// Distance overlays between plotted points.
    #[serde(default)]
    pub distances: Vec<DistanceSpec>,
}

/// A value marked on a number line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NumberLinePoint {
    /// Position on the line.
    pub value: f64,
    /// Label drawn above the marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Filled or hollow marker.
    #[serde(default)]
    pub style: PointStyle,
    /// Marker color.
    #[serde(default = "default_color")]
    pub color: String,
}

/// Parameters for the `numberLine` widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NumberLineWidget {
    /// Nominal canvas width in pixels.
    #[serde(default = "default_chart_width")]
    pub width: f64,
    /// Lower bound of the line. Must be strictly below `max`.
    pub min: f64,
    /// Upper bound of the line.
    pub max: f64,
    /// Distance between consecutive ticks. Must be positive.
    pub tick_interval: f64,
    /// Marked values.
    #[serde(default)]
    pub points: Vec<NumberLinePoint>,
}

/// Parameters for the `scatterPlot` widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScatterPlotWidget {
    /// Nominal canvas width in pixels.
    #[serde(default = "default_canvas_side")]
    pub width: f64,
    /// Nominal canvas height in pixels.
    #[serde(default = "default_canvas_side")]
    pub height: f64,
    /// Horizontal axis.
    pub x_axis: AxisOptions,
    /// Vertical axis.
    pub y_axis: AxisOptions,
    /// Unconnected data points.
    pub points: Vec<PlotPoint>,
}

/// One connected series of a line graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GraphSeries {
    /// Legend name for the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Vertices in draw order. At least two.
    pub points: Vec<Coordinate>,
    /// Stroke color.
    #[serde(default = "default_color")]
    pub color: String,
}

/// Parameters for the `lineGraph` widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LineGraphWidget {
    /// Nominal canvas width in pixels.
    #[serde(default = "default_chart_width")]
    pub width: f64,
    /// Nominal canvas height in pixels.
    #[serde(default = "default_chart_height")]
    pub height: f64,
    /// Horizontal axis.
    pub x_axis: AxisOptions,
    /// Vertical axis.
    pub y_axis: AxisOptions,
    /// Connected series.
    pub series: Vec<GraphSeries>,
    /// Draw a marker at each series vertex.
    #[serde(default = "default_true")]
    pub show_markers: bool,
}

/// One bar of a bar chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BarDatum {
    /// Category label under the bar.
    pub label: String,
    /// Bar height in axis units.
    pub value: f64,
    /// Bar fill; palette-by-position when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Parameters for the `barChart` widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BarChartWidget {
    /// Nominal canvas width in pixels.
    #[serde(default = "default_chart_width")]
    pub width: f64,
    /// Nominal canvas height in pixels.
    #[serde(default = "default_chart_height")]
    pub height: f64,
    /// Chart title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Category axis label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    /// Value axis.
    pub y_axis: AxisOptions,
    /// Bars in display order.
    pub bars: Vec<BarDatum>,
}

/// One contiguous bin of a histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Exclusive upper edge.
    pub end: f64,
    /// Observation count for the bin.
    pub frequency: f64,
}

/// Parameters for the `histogram` widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistogramWidget {
    /// Nominal canvas width in pixels.
    #[serde(default = "default_chart_width")]
    pub width: f64,
    /// Nominal canvas height in pixels.
    #[serde(default = "default_chart_height")]
    pub height: f64,
    /// Value axis label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    /// Frequency axis.
    pub y_axis: AxisOptions,
    /// Bins in ascending order of `start`.
    pub bins: Vec<HistogramBin>,
    /// Bar fill color.
    #[serde(default = "default_color")]
    pub color: String,
}

/// One column of a dot plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DotPlotColumn {
    /// Category label under the column.
    pub label: String,
    /// Number of stacked dots.
    pub count: u32,
}

/// Parameters for the `dotPlot` widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DotPlotWidget {
    /// Nominal canvas width in pixels.
    #[serde(default = "default_chart_width")]
    pub width: f64,
    /// Nominal canvas height in pixels.
    #[serde(default = "default_chart_height")]
    pub height: f64,
    /// Axis label under the categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    /// Columns in display order.
    pub categories: Vec<DotPlotColumn>,
    /// Dot fill color.
    #[serde(default = "default_color")]
    pub color: String,
}

/// One slice of a pie chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PieSlice {
    /// Slice label.
    pub label: String,
    /// Slice weight; proportions are computed from the total.
    pub value: f64,
    /// Slice fill; palette-by-position when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Parameters for the `pieChart` widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PieChartWidget {
    /// Nominal canvas width in pixels.
    #[serde(default = "default_canvas_side")]
    pub width: f64,
    /// Nominal canvas height in pixels.
    #[serde(default = "default_canvas_side")]
    pub height: f64,
    /// Chart title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Slices in clockwise order from twelve o'clock.
    pub slices: Vec<PieSlice>,
}

/// Parameters for the `dataTable` widget (HTML output).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DataTableWidget {
    /// Table caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Header cells.
    pub headers: Vec<String>,
    /// Body rows; every row should match the header width.
    pub rows: Vec<Vec<String>>,
}

/// One row of a frequency table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FrequencyRow {
    /// Category name.
    pub category: String,
    /// Observation count.
    pub count: f64,
}

/// Parameters for the `frequencyTable` widget (HTML output).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FrequencyTableWidget {
    /// Table caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Header for the category column.
    #[serde(default = "FrequencyTableWidget::default_category_label")]
    pub category_label: String,
    /// Header for the count column.
    #[serde(default = "FrequencyTableWidget::default_count_label")]
    pub count_label: String,
    /// Rows in display order.
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyTableWidget {
    fn default_category_label() -> String {
        "Category".to_string()
    }

    fn default_count_label() -> String {
        "Frequency".to_string()
    }
}

/// The closed widget union. One variant per diagram kind.
///
/// The tag set here, the dispatcher's match arms, and the prompt catalog
/// must enumerate identical sets; `registry::tests` and the widgets crate
/// enforce that at test time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WidgetSpec {
    /// Cartesian grid with points, lines, polygons, polylines, distances.
    CoordinatePlane(CoordinatePlaneWidget),
    /// Horizontal axis with marked values.
    NumberLine(NumberLineWidget),
    /// Plane with unconnected data points.
    ScatterPlot(ScatterPlotWidget),
    /// Plane with one or more connected series.
    LineGraph(LineGraphWidget),
    /// Categorical bars against a value axis.
    BarChart(BarChartWidget),
    /// Contiguous bins against a frequency axis.
    Histogram(HistogramWidget),
    /// Stacked dots per category.
    DotPlot(DotPlotWidget),
    /// Proportional slices with labels.
    PieChart(PieChartWidget),
    /// Header plus body rows, rendered as HTML.
    DataTable(DataTableWidget),
    /// Category/count table, rendered as HTML.
    FrequencyTable(FrequencyTableWidget),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_tag_round_trip() {
        let json = r#"{
            "type": "numberLine",
            "min": -5, "max": 5, "tickInterval": 1,
            "points": [{"value": 2, "style": "open"}]
        }"#;
        let spec: WidgetSpec = serde_json::from_str(json).expect("parse");
        match &spec {
            WidgetSpec::NumberLine(nl) => {
                assert_eq!(nl.points.len(), 1);
                assert_eq!(nl.points[0].style, PointStyle::Open);
            }
            other => panic!("wrong variant: {other:?}"),
        }

        let back = serde_json::to_value(&spec).expect("serialize");
        assert_eq!(back["type"], "numberLine");
        assert_eq!(back["tickInterval"], 1.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_equation_forms_parse() {
        let json = r#"{
            "id": "l1",
            "equation": {"form": "standard", "a": 2, "b": -1, "c": 4}
        }"#;
        let line: LineSpec = serde_json::from_str(json).expect("parse");
        assert!(matches!(
            line.equation,
            LineEquation::Standard { a, b, c } if a == 2.0 && b == -1.0 && c == 4.0
        ));
        assert_eq!(line.color, DEFAULT_COLOR);

        let json = r#"{"form": "slopeIntercept", "slope": 0.5, "yIntercept": -3}"#;
        let eq: LineEquation = serde_json::from_str(json).expect("parse");
        assert!(matches!(eq, LineEquation::SlopeIntercept { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{
            "type": "barChart",
            "yAxis": {"min": 0, "max": 10, "tickInterval": 2},
            "bars": [],
            "surprise": true
        }"#;
        assert!(serde_json::from_str::<WidgetSpec>(json).is_err());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let json = r#"{"type": "hologram", "spin": 3}"#;
        assert!(serde_json::from_str::<WidgetSpec>(json).is_err());
    }
}
