//! Rendering properties across the full widget catalog.
//!
//! Exercises every registered kind through the dispatcher: determinism,
//! well-formedness of the emitted markup, and the pixel-bound guarantees
//! the geometry kernel makes.

use itempress_core::{WidgetKind, WidgetSpec};
use itempress_widgets::{render_widget, PAD_BOTTOM, PAD_LEFT, PAD_RIGHT, PAD_TOP};
use quick_xml::events::Event;
use quick_xml::Reader;

/// A representative valid spec for each registered kind.
fn sample_json(kind: WidgetKind) -> &'static str {
    match kind {
        WidgetKind::CoordinatePlane => {
            r#"{
                "type": "coordinatePlane",
                "xAxis": {"min": -10, "max": 10, "tickInterval": 2},
                "yAxis": {"min": -10, "max": 10, "tickInterval": 2},
                "showQuadrantLabels": true,
                "points": [
                    {"id": "a", "x": -4, "y": 3, "label": "A"},
                    {"id": "b", "x": 2, "y": -1, "label": "B"}
                ],
                "lines": [{
                    "id": "l1",
                    "equation": {"form": "slopeIntercept", "slope": 2, "yIntercept": 1}
                }],
                "polygons": [{"vertices": ["a", "b"], "isClosed": false}],
                "distances": [{"pointId1": "a", "pointId2": "b", "showLegs": true}]
            }"#
        }
        WidgetKind::NumberLine => {
            r#"{
                "type": "numberLine",
                "min": 0, "max": 12, "tickInterval": 3,
                "points": [{"value": 6, "label": "m", "style": "closed"}]
            }"#
        }
        WidgetKind::ScatterPlot => {
            r#"{
                "type": "scatterPlot",
                "xAxis": {"min": 0, "max": 10, "tickInterval": 2},
                "yAxis": {"min": 0, "max": 10, "tickInterval": 2},
                "points": [{"id": "p1", "x": 3, "y": 4}, {"id": "p2", "x": 8, "y": 1}]
            }"#
        }
        WidgetKind::LineGraph => {
            r#"{
                "type": "lineGraph",
                "xAxis": {"min": 0, "max": 5, "tickInterval": 1},
                "yAxis": {"min": 0, "max": 40, "tickInterval": 10},
                "series": [{"name": "walk", "points": [{"x": 0, "y": 0}, {"x": 5, "y": 30}]}]
            }"#
        }
        WidgetKind::BarChart => {
            r#"{
                "type": "barChart",
                "yAxis": {"min": 0, "max": 10, "tickInterval": 2},
                "bars": [{"label": "red", "value": 4}, {"label": "blue", "value": 9}]
            }"#
        }
        WidgetKind::Histogram => {
            r#"{
                "type": "histogram",
                "yAxis": {"min": 0, "max": 8, "tickInterval": 2},
                "bins": [
                    {"start": 0, "end": 10, "frequency": 3},
                    {"start": 10, "end": 20, "frequency": 7}
                ]
            }"#
        }
        WidgetKind::DotPlot => {
            r#"{
                "type": "dotPlot",
                "categories": [{"label": "1", "count": 2}, {"label": "2", "count": 5}]
            }"#
        }
        WidgetKind::PieChart => {
            r#"{
                "type": "pieChart",
                "slices": [{"label": "yes", "value": 3}, {"label": "no", "value": 1}]
            }"#
        }
        WidgetKind::DataTable => {
            r#"{
                "type": "dataTable",
                "headers": ["x", "y"],
                "rows": [["1", "2"], ["3", "4"]]
            }"#
        }
        WidgetKind::FrequencyTable => {
            r#"{
                "type": "frequencyTable",
                "rows": [{"category": "heads", "count": 11}, {"category": "tails", "count": 9}]
            }"#
        }
    }
}

fn sample(kind: WidgetKind) -> WidgetSpec {
    serde_json::from_str(sample_json(kind)).expect("sample parses")
}

/// Every attribute named `cx`/`cy` on `circle` elements, in document order.
fn circle_centers(svg: &str) -> Vec<(f64, f64)> {
    let mut reader = Reader::from_str(svg);
    let mut centers = Vec::new();
    loop {
        match reader.read_event().expect("well-formed SVG") {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"circle" => {
                let mut cx = None;
                let mut cy = None;
                for attr in e.attributes() {
                    let attr = attr.expect("attribute");
                    let value = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                    match attr.key.as_ref() {
                        b"cx" => cx = value,
                        b"cy" => cy = value,
                        _ => {}
                    }
                }
                centers.push((cx.expect("cx"), cy.expect("cy")));
            }
            _ => {}
        }
    }
    centers
}

fn assert_well_formed(markup: &str) {
    let mut reader = Reader::from_str(markup);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed markup: {e}\n{markup}"),
        }
    }
}

// ==========================================================================
// Catalog-wide properties
// ==========================================================================

#[test]
fn test_every_kind_renders_deterministically() {
    for kind in WidgetKind::ALL {
        let spec = sample(kind);
        let first = render_widget(&spec).unwrap_or_else(|e| panic!("{kind} failed: {e}"));
        let second = render_widget(&spec).expect("second render");
        assert_eq!(first, second, "{kind} is not deterministic");
    }
}

#[test]
fn test_every_fragment_is_well_formed_markup() {
    for kind in WidgetKind::ALL {
        let fragment = render_widget(&sample(kind)).expect("render");
        assert_well_formed(&fragment);
    }
}

#[test]
fn test_fragment_root_matches_output_medium() {
    for kind in WidgetKind::ALL {
        let fragment = render_widget(&sample(kind)).expect("render");
        if kind.is_svg() {
            assert!(
                fragment.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""),
                "{kind}: {fragment}"
            );
            assert!(fragment.ends_with("</svg>"), "{kind}");
        } else {
            assert!(fragment.starts_with("<table"), "{kind}: {fragment}");
            assert!(fragment.ends_with("</table>"), "{kind}");
        }
    }
}

// ==========================================================================
// Geometry kernel guarantees
// ==========================================================================

#[test]
fn test_point_plot_markers_stay_inside_plot_rect() {
    let spec: WidgetSpec = serde_json::from_str(
        r#"{
            "type": "scatterPlot",
            "width": 400, "height": 400,
            "xAxis": {"min": -10, "max": 10, "tickInterval": 5},
            "yAxis": {"min": -10, "max": 10, "tickInterval": 5},
            "points": [
                {"id": "a", "x": -10, "y": -10},
                {"id": "b", "x": 0, "y": 0},
                {"id": "c", "x": 10, "y": 10}
            ]
        }"#,
    )
    .expect("parse");
    let svg = render_widget(&spec).expect("render");
    let centers = circle_centers(&svg);
    assert_eq!(centers.len(), 3);

    let plot_w = 400.0 - PAD_LEFT - PAD_RIGHT;
    let plot_h = 400.0 - PAD_TOP - PAD_BOTTOM;
    for (cx, cy) in centers {
        assert!((PAD_LEFT..=PAD_LEFT + plot_w).contains(&cx), "cx {cx}");
        assert!((PAD_TOP..=PAD_TOP + plot_h).contains(&cy), "cy {cy}");
    }
}

#[test]
fn test_steep_line_never_escapes_plot_rect() {
    let spec: WidgetSpec = serde_json::from_str(
        r#"{
            "type": "coordinatePlane",
            "width": 400, "height": 400,
            "xAxis": {"min": -10, "max": 10, "tickInterval": 5},
            "yAxis": {"min": -10, "max": 10, "tickInterval": 5},
            "lines": [{
                "id": "steep",
                "equation": {"form": "pointSlope", "x1": 0, "y1": 0, "slope": 40}
            }]
        }"#,
    )
    .expect("parse");
    let svg = render_widget(&spec).expect("render");

    // The mathematical extent of the line is y in [-400, 400]; the clip
    // group confines the visible path to the plot rectangle and the canvas
    // keeps its nominal size.
    assert!(svg.contains("<g clip-path=\"url(#plot-area)\">"), "{svg}");
    assert!(svg.contains("viewBox=\"0 0 400 400\""), "{svg}");
}

#[test]
fn test_long_tick_labels_widen_canvas_instead_of_clipping() {
    let spec: WidgetSpec = serde_json::from_str(
        r#"{
            "type": "scatterPlot",
            "width": 400, "height": 400,
            "xAxis": {"min": 0, "max": 10, "tickInterval": 5},
            "yAxis": {"min": -1000000, "max": 1000000, "tickInterval": 500000},
            "points": [{"id": "a", "x": 5, "y": 0}]
        }"#,
    )
    .expect("parse");
    let svg = render_widget(&spec).expect("render");
    // Seven-digit labels overflow the left padding; the viewBox origin
    // must move into negative x so they are not cut off by the canvas.
    assert!(svg.contains("viewBox=\"-"), "{svg}");
}

// ==========================================================================
// Failure isolation
// ==========================================================================

#[test]
fn test_invalid_axis_aborts_only_that_widget() {
    let bad: WidgetSpec = serde_json::from_str(
        r#"{
            "type": "scatterPlot",
            "xAxis": {"min": 10, "max": -10, "tickInterval": 1},
            "yAxis": {"min": 0, "max": 10, "tickInterval": 1},
            "points": [{"id": "a", "x": 0, "y": 0}]
        }"#,
    )
    .expect("parse");
    assert!(render_widget(&bad).is_err());

    // A sibling render on the same thread is unaffected.
    let good = sample(WidgetKind::BarChart);
    assert!(render_widget(&good).is_ok());
}
