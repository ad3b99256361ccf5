//! Prompt-facing enumeration of the widget vocabulary.
//!
//! The catalog is what the upstream authoring layer embeds in structured-
//! output prompts to constrain AI generation. It is written out by hand:
//! the third independent enumeration of the widget tag set (registry,
//! dispatcher, catalog), with consistency tests to catch the three
//! drifting apart.

/// One catalog entry describing a widget kind to the generation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptWidget {
    /// The serialized `type` tag.
    pub tag: &'static str,
    /// One-line human description.
    pub description: &'static str,
    /// Compact shape hint listing the required properties.
    pub shape: &'static str,
}

/// The full prompt catalog, in presentation order.
#[must_use]
pub fn catalog() -> &'static [PromptWidget] {
    &[
        PromptWidget {
            tag: "coordinatePlane",
            description: "Cartesian grid with optional points, equation lines, polygons, polylines, and distance overlays",
            shape: "xAxis{min,max,tickInterval}, yAxis{...}, points[], lines[], polygons[], polylines[], distances[]",
        },
        PromptWidget {
            tag: "numberLine",
            description: "Horizontal number line with open or closed marked values",
            shape: "min, max, tickInterval, points[{value,label?,style}]",
        },
        PromptWidget {
            tag: "scatterPlot",
            description: "Unconnected data points on a coordinate plane",
            shape: "xAxis, yAxis, points[{id,x,y,label?}]",
        },
        PromptWidget {
            tag: "lineGraph",
            description: "One or more connected data series on a coordinate plane",
            shape: "xAxis, yAxis, series[{name?,points[{x,y}]}]",
        },
        PromptWidget {
            tag: "barChart",
            description: "Vertical bars for labeled categories against a value axis",
            shape: "yAxis, bars[{label,value,color?}], title?, xLabel?",
        },
        PromptWidget {
            tag: "histogram",
            description: "Contiguous numeric bins against a frequency axis",
            shape: "yAxis, bins[{start,end,frequency}], xLabel?",
        },
        PromptWidget {
            tag: "dotPlot",
            description: "Stacked dots counting observations per category",
            shape: "categories[{label,count}], xLabel?",
        },
        PromptWidget {
            tag: "pieChart",
            description: "Proportional slices with labels",
            shape: "slices[{label,value,color?}], title?",
        },
        PromptWidget {
            tag: "dataTable",
            description: "HTML table with a header row and arbitrary body cells",
            shape: "headers[], rows[[]], title?",
        },
        PromptWidget {
            tag: "frequencyTable",
            description: "Two-column HTML table of categories and counts",
            shape: "rows[{category,count}], categoryLabel?, countLabel?",
        },
    ]
}
