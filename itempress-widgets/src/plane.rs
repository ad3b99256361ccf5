//! Coordinate-plane rendering.
//!
//! Composes the shared renderers in a fixed paint order: background grid,
//! then equation lines (clipped to the plot rectangle), polygons,
//! polylines and distance overlays, and finally point markers so they are
//! never occluded.

use std::collections::HashMap;
use std::fmt::Write;

use itempress_core::{
    AxisOptions, CoordinatePlaneWidget, DistanceSpec, LineEquation, PlotPoint, PointStyle,
    PolygonSpec, PolylineSpec, StrokeStyle,
};

use crate::error::{WidgetError, WidgetResult};
use crate::scale::{tick_values, PlotFrame, PAD_LEFT, PAD_TOP};
use crate::svg::{escape_xml, fmt_num, SvgDoc};

pub(crate) const GRID_COLOR: &str = "#e3e3e3";
pub(crate) const AXIS_COLOR: &str = "#21242c";
pub(crate) const LABEL_COLOR: &str = "#5d5f63";
pub(crate) const TICK_FONT: f64 = 11.0;
pub(crate) const POINT_RADIUS: f64 = 4.0;

/// Id of the clip path that bounds equation lines to the plot rectangle.
const PLOT_CLIP_ID: &str = "plot-area";

/// Render the `coordinatePlane` widget family.
///
/// # Errors
///
/// Returns [`WidgetError`] for dimension violations, duplicate or unknown
/// point ids, degenerate equations, or under-sized polygons/polylines.
pub fn render_coordinate_plane(widget: &CoordinatePlaneWidget) -> WidgetResult<String> {
    let frame = PlotFrame::new(widget.width, widget.height, &widget.x_axis, &widget.y_axis)?;
    let mut doc = SvgDoc::new(widget.width, widget.height);

    draw_grid(&mut doc, &frame, &widget.x_axis, &widget.y_axis);
    if widget.show_quadrant_labels {
        draw_quadrant_labels(&mut doc, &frame);
    }

    if !widget.lines.is_empty() {
        let (px, py, pw, ph) = frame.plot_rect();
        let clip = doc.add_clip_rect(PLOT_CLIP_ID, px, py, pw, ph);
        let _ = write!(doc.body_mut(), "<g clip-path=\"{clip}\">");
        for line in &widget.lines {
            let segment = boundary_segment(&frame, &normalize_equation(&line.equation, &line.id)?);
            draw_clipped_segment(&mut doc, segment, &line.color, line.style);
        }
        doc.body_mut().push_str("</g>");
        // Only the plot rectangle is visible; clipped overshoot must not
        // widen the canvas.
        doc.extents_mut().include_rect(px, py, pw, ph);
    }

    let pixels = point_pixel_map(&frame, &widget.points)?;

    for polygon in &widget.polygons {
        draw_polygon(&mut doc, &pixels, polygon)?;
    }
    for polyline in &widget.polylines {
        draw_polyline(&mut doc, &frame, polyline)?;
    }
    for distance in &widget.distances {
        draw_distance(&mut doc, &pixels, distance)?;
    }
    for point in &widget.points {
        draw_point(&mut doc, &frame, point);
    }

    Ok(doc.finish())
}

/// Grid lines, tick labels, axis lines, and axis titles.
pub(crate) fn draw_grid(doc: &mut SvgDoc, frame: &PlotFrame, x_axis: &AxisOptions, y_axis: &AxisOptions) {
    let (px, py, pw, ph) = frame.plot_rect();

    for tick in tick_values(frame.x_min(), frame.x_max(), x_axis.tick_interval) {
        let x = frame.svg_x(tick);
        if x_axis.show_grid_lines {
            doc.line(x, py, x, py + ph, GRID_COLOR, "");
        }
        doc.text(
            x,
            py + ph + 14.0,
            &fmt_num(tick),
            TICK_FONT,
            "middle",
            &format!(" fill=\"{LABEL_COLOR}\""),
        );
    }
    for tick in tick_values(frame.y_min(), frame.y_max(), y_axis.tick_interval) {
        let y = frame.svg_y(tick);
        if y_axis.show_grid_lines {
            doc.line(px, y, px + pw, y, GRID_COLOR, "");
        }
        doc.text(
            px - 6.0,
            y + 4.0,
            &fmt_num(tick),
            TICK_FONT,
            "end",
            &format!(" fill=\"{LABEL_COLOR}\""),
        );
    }

    // Axes pass through the origin when it is visible, otherwise hug the
    // bottom/left edges.
    let axis_y = if frame.y_min() <= 0.0 && frame.y_max() >= 0.0 {
        frame.svg_y(0.0)
    } else {
        py + ph
    };
    let axis_x = if frame.x_min() <= 0.0 && frame.x_max() >= 0.0 {
        frame.svg_x(0.0)
    } else {
        px
    };
    doc.line(px, axis_y, px + pw, axis_y, AXIS_COLOR, " stroke-width=\"1.5\"");
    doc.line(axis_x, py, axis_x, py + ph, AXIS_COLOR, " stroke-width=\"1.5\"");

    if let Some(label) = &x_axis.label {
        doc.text(
            px + pw / 2.0,
            frame.height() - 4.0,
            label,
            12.0,
            "middle",
            &format!(" fill=\"{AXIS_COLOR}\""),
        );
    }
    if let Some(label) = &y_axis.label {
        let cy = py + ph / 2.0;
        doc.extents_mut().include_rect(2.0, cy - 40.0, 14.0, 80.0);
        let _ = write!(
            doc.body_mut(),
            "<text x=\"12\" y=\"{}\" font-size=\"12\" text-anchor=\"middle\" font-family=\"sans-serif\" fill=\"{AXIS_COLOR}\" transform=\"rotate(-90 12 {})\">{}</text>",
            fmt_num(cy),
            fmt_num(cy),
            escape_xml(label),
        );
    }
}

/// Roman-numeral quadrant labels, drawn only when the origin is interior.
fn draw_quadrant_labels(doc: &mut SvgDoc, frame: &PlotFrame) {
    if frame.x_min() >= 0.0 || frame.x_max() <= 0.0 || frame.y_min() >= 0.0 || frame.y_max() <= 0.0 {
        return;
    }
    let quadrants = [
        ("I", frame.x_max() / 2.0, frame.y_max() / 2.0),
        ("II", frame.x_min() / 2.0, frame.y_max() / 2.0),
        ("III", frame.x_min() / 2.0, frame.y_min() / 2.0),
        ("IV", frame.x_max() / 2.0, frame.y_min() / 2.0),
    ];
    for (numeral, x, y) in quadrants {
        doc.text(
            frame.svg_x(x),
            frame.svg_y(y),
            numeral,
            14.0,
            "middle",
            " fill=\"#b8bcc4\"",
        );
    }
}

/// A line equation reduced to renderable form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NormalizedLine {
    /// `y = slope * x + intercept`.
    Sloped {
        /// Slope.
        slope: f64,
        /// y intercept.
        intercept: f64,
    },
    /// `x = at`.
    Vertical {
        /// Fixed x.
        at: f64,
    },
}

/// Reduce any of the three equation forms to [`NormalizedLine`].
///
/// The coefficients are typed input, so the zero checks are exact: only a
/// literal zero selects the vertical branch.
#[allow(clippy::float_cmp)]
pub(crate) fn normalize_equation(equation: &LineEquation, id: &str) -> WidgetResult<NormalizedLine> {
    match *equation {
        LineEquation::SlopeIntercept { slope, y_intercept } => Ok(NormalizedLine::Sloped {
            slope,
            intercept: y_intercept,
        }),
        LineEquation::PointSlope { x1, y1, slope } => Ok(NormalizedLine::Sloped {
            slope,
            intercept: y1 - slope * x1,
        }),
        LineEquation::Standard { a, b, c } => {
            if b != 0.0 {
                Ok(NormalizedLine::Sloped {
                    slope: -a / b,
                    intercept: c / b,
                })
            } else if a != 0.0 {
                Ok(NormalizedLine::Vertical { at: c / a })
            } else {
                Err(WidgetError::DegenerateEquation(format!(
                    "line {id} has a = b = 0"
                )))
            }
        }
    }
}

/// Pixel endpoints of a normalized line across the visible x (or y) span.
///
/// The vertical overshoot of steep lines is left to the clip group.
fn boundary_segment(frame: &PlotFrame, line: &NormalizedLine) -> ((f64, f64), (f64, f64)) {
    match *line {
        NormalizedLine::Sloped { slope, intercept } => {
            let y_at = |x: f64| slope * x + intercept;
            (
                (frame.svg_x(frame.x_min()), frame.svg_y(y_at(frame.x_min()))),
                (frame.svg_x(frame.x_max()), frame.svg_y(y_at(frame.x_max()))),
            )
        }
        NormalizedLine::Vertical { at } => (
            (frame.svg_x(at), frame.svg_y(frame.y_min())),
            (frame.svg_x(at), frame.svg_y(frame.y_max())),
        ),
    }
}

/// Write one clipped line segment directly into the body.
///
/// Bypasses [`SvgDoc::line`]: the segment endpoints may lie far outside
/// the plot, and recording them would grow the canvas for content the
/// clip removes.
fn draw_clipped_segment(
    doc: &mut SvgDoc,
    ((x1, y1), (x2, y2)): ((f64, f64), (f64, f64)),
    color: &str,
    style: StrokeStyle,
) {
    let dash = style
        .dash_array()
        .map(|d| format!(" stroke-dasharray=\"{d}\""))
        .unwrap_or_default();
    let _ = write!(
        doc.body_mut(),
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"2\"{dash}/>",
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2),
        escape_xml(color),
    );
}

/// Build the point-id to pixel-coordinate map for one diagram.
///
/// Built once per render and consulted by polygons and distances; an
/// absent id is a typed error, never a silent miss.
pub(crate) fn point_pixel_map<'a>(
    frame: &PlotFrame,
    points: &'a [PlotPoint],
) -> WidgetResult<HashMap<&'a str, (f64, f64)>> {
    let mut pixels = HashMap::with_capacity(points.len());
    for point in points {
        let entry = (frame.svg_x(point.x), frame.svg_y(point.y));
        if pixels.insert(point.id.as_str(), entry).is_some() {
            return Err(WidgetError::DuplicatePointId(point.id.clone()));
        }
    }
    Ok(pixels)
}

fn resolve<'m>(
    pixels: &'m HashMap<&str, (f64, f64)>,
    id: &str,
    context: &str,
) -> WidgetResult<&'m (f64, f64)> {
    pixels
        .get(id)
        .ok_or_else(|| WidgetError::UnknownPointReference(format!("{context} references {id}")))
}

fn draw_polygon(
    doc: &mut SvgDoc,
    pixels: &HashMap<&str, (f64, f64)>,
    polygon: &PolygonSpec,
) -> WidgetResult<()> {
    if polygon.vertices.is_empty() {
        return Err(WidgetError::EmptyDataset(
            "polygon needs at least one vertex".to_string(),
        ));
    }

    let mut path = String::new();
    let mut centroid = (0.0, 0.0);
    for (index, id) in polygon.vertices.iter().enumerate() {
        let &(x, y) = resolve(pixels, id, "polygon vertex")?;
        doc.extents_mut().include(x, y);
        centroid.0 += x;
        centroid.1 += y;
        let op = if index == 0 { 'M' } else { 'L' };
        let _ = write!(path, "{op}{},{} ", fmt_num(x), fmt_num(y));
    }
    if polygon.is_closed {
        path.push('Z');
    }

    let _ = write!(
        doc.body_mut(),
        "<path d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
        path.trim_end(),
        escape_xml(&polygon.fill_color),
        escape_xml(&polygon.stroke_color),
    );

    if let Some(label) = &polygon.label {
        #[allow(clippy::cast_precision_loss)]
        let n = polygon.vertices.len() as f64;
        doc.text(
            centroid.0 / n,
            centroid.1 / n,
            label,
            12.0,
            "middle",
            &format!(" fill=\"{AXIS_COLOR}\""),
        );
    }
    Ok(())
}

fn draw_polyline(doc: &mut SvgDoc, frame: &PlotFrame, polyline: &PolylineSpec) -> WidgetResult<()> {
    if polyline.points.len() < 2 {
        return Err(WidgetError::EmptyDataset(format!(
            "polyline {} needs at least two points",
            polyline.id
        )));
    }

    let mut attr = String::new();
    for coordinate in &polyline.points {
        let (x, y) = (frame.svg_x(coordinate.x), frame.svg_y(coordinate.y));
        doc.extents_mut().include(x, y);
        let _ = write!(attr, "{},{} ", fmt_num(x), fmt_num(y));
    }
    let dash = polyline
        .style
        .dash_array()
        .map(|d| format!(" stroke-dasharray=\"{d}\""))
        .unwrap_or_default();
    let _ = write!(
        doc.body_mut(),
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"{dash}/>",
        attr.trim_end(),
        escape_xml(&polyline.color),
    );
    Ok(())
}

fn draw_distance(
    doc: &mut SvgDoc,
    pixels: &HashMap<&str, (f64, f64)>,
    distance: &DistanceSpec,
) -> WidgetResult<()> {
    let &(x1, y1) = resolve(pixels, &distance.point_id1, "distance endpoint")?;
    let &(x2, y2) = resolve(pixels, &distance.point_id2, "distance endpoint")?;

    if distance.show_legs {
        // Right-triangle legs: horizontal from the first point, vertical
        // up/down to the second.
        doc.line(x1, y1, x2, y1, &distance.color, " stroke-dasharray=\"4 4\"");
        doc.line(x2, y1, x2, y2, &distance.color, " stroke-dasharray=\"4 4\"");
    }

    let dash = distance
        .style
        .dash_array()
        .map(|d| format!(" stroke-dasharray=\"{d}\""))
        .unwrap_or_default();
    let _ = write!(
        doc.body_mut(),
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"2\"{dash}/>",
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2),
        escape_xml(&distance.color),
    );

    if distance.show_legs && distance.show_leg_labels {
        doc.text(
            (x1 + x2) / 2.0,
            y1 + 14.0,
            &fmt_num((x2 - x1).abs()),
            TICK_FONT,
            "middle",
            &format!(" fill=\"{LABEL_COLOR}\""),
        );
        doc.text(
            x2 + 8.0,
            (y1 + y2) / 2.0 + 4.0,
            &fmt_num((y2 - y1).abs()),
            TICK_FONT,
            "start",
            &format!(" fill=\"{LABEL_COLOR}\""),
        );
    }
    if let Some(label) = &distance.hypotenuse_label {
        doc.text(
            (x1 + x2) / 2.0 + 6.0,
            (y1 + y2) / 2.0 - 6.0,
            label,
            12.0,
            "start",
            &format!(" fill=\"{AXIS_COLOR}\""),
        );
    }
    Ok(())
}

/// Draw one point marker with its label.
pub(crate) fn draw_point(doc: &mut SvgDoc, frame: &PlotFrame, point: &PlotPoint) {
    let (px, py) = (frame.svg_x(point.x), frame.svg_y(point.y));
    draw_marker(doc, px, py, &point.color, point.style);

    if let Some(label) = &point.label {
        // Flip the offset near the plot edges so labels stay legible.
        let near_right = px > PAD_LEFT + frame.plot_width() - 30.0;
        let (lx, anchor) = if near_right { (px - 8.0, "end") } else { (px + 8.0, "start") };
        let ly = if py < PAD_TOP + 14.0 { py + 18.0 } else { py - 8.0 };
        doc.text(lx, ly, label, 12.0, anchor, &format!(" fill=\"{AXIS_COLOR}\""));
    }
}

/// Filled vs hollow marker per point style.
pub(crate) fn draw_marker(doc: &mut SvgDoc, px: f64, py: f64, color: &str, style: PointStyle) {
    match style {
        PointStyle::Closed => doc.circle(px, py, POINT_RADIUS, color, ""),
        PointStyle::Open => doc.circle(
            px,
            py,
            POINT_RADIUS,
            "#ffffff",
            &format!(" stroke=\"{}\" stroke-width=\"2\"", escape_xml(color)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use itempress_core::{LineSpec, WidgetSpec};

    use super::*;

    fn axis(min: f64, max: f64) -> AxisOptions {
        AxisOptions {
            label: None,
            min,
            max,
            tick_interval: 1.0,
            show_grid_lines: true,
        }
    }

    fn plane() -> CoordinatePlaneWidget {
        CoordinatePlaneWidget {
            width: 400.0,
            height: 400.0,
            x_axis: axis(-10.0, 10.0),
            y_axis: axis(-10.0, 10.0),
            show_quadrant_labels: false,
            points: Vec::new(),
            lines: Vec::new(),
            polygons: Vec::new(),
            polylines: Vec::new(),
            distances: Vec::new(),
        }
    }

    fn point(id: &str, x: f64, y: f64) -> PlotPoint {
        PlotPoint {
            id: id.to_string(),
            x,
            y,
            label: None,
            color: "#11accd".to_string(),
            style: PointStyle::Closed,
        }
    }

    #[test]
    fn test_three_points_yield_three_markers() {
        let mut widget = plane();
        widget.points = vec![point("a", -5.0, 2.0), point("b", 0.0, 0.0), point("c", 7.0, -3.0)];
        let svg = render_coordinate_plane(&widget).expect("render");
        assert_eq!(svg.matches("<circle").count(), 3, "{svg}");
    }

    #[test]
    fn test_lines_render_inside_clip_group() {
        let mut widget = plane();
        widget.lines = vec![LineSpec {
            id: "l1".to_string(),
            equation: LineEquation::SlopeIntercept {
                slope: 5.0,
                y_intercept: 0.0,
            },
            color: "#ca337c".to_string(),
            style: StrokeStyle::Solid,
        }];
        let svg = render_coordinate_plane(&widget).expect("render");
        assert!(svg.contains("<clipPath id=\"plot-area\">"), "{svg}");
        assert!(svg.contains("<g clip-path=\"url(#plot-area)\">"), "{svg}");
        // A slope of 5 across x in [-10, 10] overshoots y wildly; the
        // canvas must stay at its nominal size because the clip hides it.
        assert!(svg.contains("viewBox=\"0 0 400 400\""), "{svg}");
    }

    #[test]
    fn test_degenerate_standard_form_rejected() {
        let err = normalize_equation(
            &LineEquation::Standard { a: 0.0, b: 0.0, c: 3.0 },
            "l9",
        )
        .expect_err("must fail");
        assert!(matches!(err, WidgetError::DegenerateEquation(_)));
    }

    #[test]
    fn test_standard_form_normalizes_to_slope() {
        // 2x + y = 4  =>  y = -2x + 4
        let line = normalize_equation(&LineEquation::Standard { a: 2.0, b: 1.0, c: 4.0 }, "l1")
            .expect("normalize");
        assert_eq!(line, NormalizedLine::Sloped { slope: -2.0, intercept: 4.0 });

        // 3x = 6  =>  x = 2
        let line = normalize_equation(&LineEquation::Standard { a: 3.0, b: 0.0, c: 6.0 }, "l2")
            .expect("normalize");
        assert_eq!(line, NormalizedLine::Vertical { at: 2.0 });
    }

    #[test]
    fn test_polygon_unknown_vertex_is_hard_error() {
        let mut widget = plane();
        widget.points = vec![point("a", 0.0, 0.0), point("b", 3.0, 0.0)];
        widget.polygons = vec![PolygonSpec {
            vertices: vec!["a".to_string(), "b".to_string(), "ghost".to_string()],
            is_closed: true,
            fill_color: "none".to_string(),
            stroke_color: "#11accd".to_string(),
            label: None,
        }];
        let err = render_coordinate_plane(&widget).expect_err("must fail");
        assert!(matches!(err, WidgetError::UnknownPointReference(msg) if msg.contains("ghost")));
    }

    #[test]
    fn test_duplicate_point_id_rejected() {
        let mut widget = plane();
        widget.points = vec![point("a", 0.0, 0.0), point("a", 1.0, 1.0)];
        let err = render_coordinate_plane(&widget).expect_err("must fail");
        assert!(matches!(err, WidgetError::DuplicatePointId(id) if id == "a"));
    }

    #[test]
    fn test_quadrant_labels_when_origin_interior() {
        let mut widget = plane();
        widget.show_quadrant_labels = true;
        let svg = render_coordinate_plane(&widget).expect("render");
        for numeral in ["III", "IV"] {
            assert!(svg.contains(&format!(">{numeral}</text>")), "{numeral} missing");
        }

        // First-quadrant-only plane: no quadrant labels.
        let mut widget = plane();
        widget.x_axis = axis(0.0, 10.0);
        widget.y_axis = axis(0.0, 10.0);
        widget.show_quadrant_labels = true;
        let svg = render_coordinate_plane(&widget).expect("render");
        assert!(!svg.contains(">II</text>"), "{svg}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut widget = plane();
        widget.points = vec![point("a", 1.5, 2.25), point("b", -3.0, 4.0)];
        widget.distances = vec![DistanceSpec {
            point_id1: "a".to_string(),
            point_id2: "b".to_string(),
            show_legs: true,
            show_leg_labels: true,
            hypotenuse_label: Some("d".to_string()),
            color: "#11accd".to_string(),
            style: StrokeStyle::Dashed,
        }];
        let first = render_coordinate_plane(&widget).expect("render");
        let second = render_coordinate_plane(&widget).expect("render");
        assert_eq!(first, second);
    }

    #[test]
    fn test_spec_round_trip_through_union() {
        let spec: WidgetSpec = serde_json::from_str(
            r#"{
                "type": "coordinatePlane",
                "xAxis": {"min": -10, "max": 10, "tickInterval": 2},
                "yAxis": {"min": -10, "max": 10, "tickInterval": 2},
                "points": [{"id": "p", "x": 5, "y": 5}]
            }"#,
        )
        .expect("parse");
        let WidgetSpec::CoordinatePlane(widget) = spec else {
            panic!("wrong variant");
        };
        let svg = render_coordinate_plane(&widget).expect("render");
        assert!(svg.contains("<circle"));
    }
}
