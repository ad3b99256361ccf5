//! The closed registry of widget kinds.
//!
//! [`WidgetKind`] is the fieldless mirror of [`WidgetSpec`]: the canonical
//! enumeration other subsystems compare themselves against. The dispatcher
//! in the widgets crate and the prompt catalog in [`crate::prompt`] must
//! cover exactly this set.

use std::fmt;
use std::str::FromStr;

use crate::widget::WidgetSpec;

/// Every widget kind the pipeline can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetKind {
    /// Cartesian grid with overlays.
    CoordinatePlane,
    /// Horizontal axis with marked values.
    NumberLine,
    /// Unconnected data points on a plane.
    ScatterPlot,
    /// Connected series on a plane.
    LineGraph,
    /// Categorical bars.
    BarChart,
    /// Binned frequencies.
    Histogram,
    /// Stacked dots per category.
    DotPlot,
    /// Proportional slices.
    PieChart,
    /// HTML table with arbitrary cells.
    DataTable,
    /// HTML category/count table.
    FrequencyTable,
}

impl WidgetKind {
    /// All kinds, in catalog order.
    pub const ALL: [WidgetKind; 10] = [
        WidgetKind::CoordinatePlane,
        WidgetKind::NumberLine,
        WidgetKind::ScatterPlot,
        WidgetKind::LineGraph,
        WidgetKind::BarChart,
        WidgetKind::Histogram,
        WidgetKind::DotPlot,
        WidgetKind::PieChart,
        WidgetKind::DataTable,
        WidgetKind::FrequencyTable,
    ];

    /// The serialized `type` tag for this kind.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::CoordinatePlane => "coordinatePlane",
            Self::NumberLine => "numberLine",
            Self::ScatterPlot => "scatterPlot",
            Self::LineGraph => "lineGraph",
            Self::BarChart => "barChart",
            Self::Histogram => "histogram",
            Self::DotPlot => "dotPlot",
            Self::PieChart => "pieChart",
            Self::DataTable => "dataTable",
            Self::FrequencyTable => "frequencyTable",
        }
    }

    /// Whether this kind emits an SVG fragment (as opposed to HTML).
    #[must_use]
    pub fn is_svg(self) -> bool {
        !matches!(self, Self::DataTable | Self::FrequencyTable)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for WidgetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| format!("unknown widget kind: {s}"))
    }
}

impl WidgetSpec {
    /// The kind of this spec.
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::CoordinatePlane(_) => WidgetKind::CoordinatePlane,
            Self::NumberLine(_) => WidgetKind::NumberLine,
            Self::ScatterPlot(_) => WidgetKind::ScatterPlot,
            Self::LineGraph(_) => WidgetKind::LineGraph,
            Self::BarChart(_) => WidgetKind::BarChart,
            Self::Histogram(_) => WidgetKind::Histogram,
            Self::DotPlot(_) => WidgetKind::DotPlot,
            Self::PieChart(_) => WidgetKind::PieChart,
            Self::DataTable(_) => WidgetKind::DataTable,
            Self::FrequencyTable(_) => WidgetKind::FrequencyTable,
        }
    }
}
