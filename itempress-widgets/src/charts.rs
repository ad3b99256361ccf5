//! Statistical chart widgets: scatter, line graph, bar, histogram, dot
//! plot, and pie.
//!
//! Plot-based charts share the geometry kernel with the coordinate plane;
//! categorical charts lay out slots by hand but still draw their value
//! axis through the same [`PlotFrame`] transform.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::Write;

use itempress_core::{
    AxisOptions, BarChartWidget, DotPlotWidget, HistogramWidget, LineGraphWidget, PieChartWidget,
    ScatterPlotWidget, CHART_PALETTE,
};

use crate::error::{WidgetError, WidgetResult};
use crate::plane::{draw_grid, draw_point, point_pixel_map, AXIS_COLOR, GRID_COLOR, LABEL_COLOR, TICK_FONT};
use crate::scale::{tick_values, PlotFrame, PAD_BOTTOM, PAD_LEFT, PAD_TOP};
use crate::svg::{escape_xml, fmt_num, SvgDoc};

/// Render the `scatterPlot` widget.
///
/// # Errors
///
/// Returns [`WidgetError`] for dimension violations, duplicate point ids,
/// or an empty point set.
pub fn render_scatter_plot(widget: &ScatterPlotWidget) -> WidgetResult<String> {
    if widget.points.is_empty() {
        return Err(WidgetError::EmptyDataset(
            "scatter plot needs at least one point".to_string(),
        ));
    }
    let frame = PlotFrame::new(widget.width, widget.height, &widget.x_axis, &widget.y_axis)?;
    let mut doc = SvgDoc::new(widget.width, widget.height);

    draw_grid(&mut doc, &frame, &widget.x_axis, &widget.y_axis);
    point_pixel_map(&frame, &widget.points)?;
    for point in &widget.points {
        draw_point(&mut doc, &frame, point);
    }
    Ok(doc.finish())
}

/// Render the `lineGraph` widget.
///
/// # Errors
///
/// Returns [`WidgetError`] for dimension violations, no series, or a
/// series with fewer than two points.
pub fn render_line_graph(widget: &LineGraphWidget) -> WidgetResult<String> {
    if widget.series.is_empty() {
        return Err(WidgetError::EmptyDataset(
            "line graph needs at least one series".to_string(),
        ));
    }
    let frame = PlotFrame::new(widget.width, widget.height, &widget.x_axis, &widget.y_axis)?;
    let mut doc = SvgDoc::new(widget.width, widget.height);
    draw_grid(&mut doc, &frame, &widget.x_axis, &widget.y_axis);

    for series in &widget.series {
        if series.points.len() < 2 {
            return Err(WidgetError::EmptyDataset(format!(
                "series {} needs at least two points",
                series.name.as_deref().unwrap_or("(unnamed)")
            )));
        }
        let mut attr = String::new();
        for coordinate in &series.points {
            let (x, y) = (frame.svg_x(coordinate.x), frame.svg_y(coordinate.y));
            doc.extents_mut().include(x, y);
            let _ = write!(attr, "{},{} ", fmt_num(x), fmt_num(y));
        }
        let _ = write!(
            doc.body_mut(),
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
            attr.trim_end(),
            escape_xml(&series.color),
        );
        if widget.show_markers {
            for coordinate in &series.points {
                doc.circle(
                    frame.svg_x(coordinate.x),
                    frame.svg_y(coordinate.y),
                    3.0,
                    &series.color,
                    "",
                );
            }
        }
    }
    Ok(doc.finish())
}

/// Render the `barChart` widget.
///
/// # Errors
///
/// Returns [`WidgetError`] for dimension violations or an empty bar set.
pub fn render_bar_chart(widget: &BarChartWidget) -> WidgetResult<String> {
    if widget.bars.is_empty() {
        return Err(WidgetError::EmptyDataset(
            "bar chart needs at least one bar".to_string(),
        ));
    }
    #[allow(clippy::cast_precision_loss)]
    let bar_count = widget.bars.len() as f64;
    let frame = PlotFrame::new(
        widget.width,
        widget.height,
        &category_axis_stub(0.0, bar_count),
        &widget.y_axis,
    )?;
    let mut doc = SvgDoc::new(widget.width, widget.height);

    draw_value_axis(&mut doc, &frame, widget.y_axis.tick_interval, widget.y_axis.show_grid_lines);
    if let Some(title) = &widget.title {
        doc.text(widget.width / 2.0, 12.0, title, 13.0, "middle", &format!(" fill=\"{AXIS_COLOR}\""));
    }
    if let Some(x_label) = &widget.x_label {
        doc.text(
            PAD_LEFT + frame.plot_width() / 2.0,
            widget.height - 4.0,
            x_label,
            12.0,
            "middle",
            &format!(" fill=\"{AXIS_COLOR}\""),
        );
    }

    let base = frame.y_min().max(0.0).min(frame.y_max());
    let slot = frame.plot_width() / bar_count;
    for (index, bar) in widget.bars.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = PAD_LEFT + index as f64 * slot + 0.2 * slot;
        let y_top = frame.svg_y(bar.value.max(base));
        let y_base = frame.svg_y(bar.value.min(base));
        let color = bar
            .color
            .as_deref()
            .unwrap_or(CHART_PALETTE[index % CHART_PALETTE.len()]);
        doc.rect(x, y_top, 0.6 * slot, y_base - y_top, color, " rx=\"2\"");
        doc.text(
            x + 0.3 * slot,
            PAD_TOP + frame.plot_height() + 14.0,
            &bar.label,
            TICK_FONT,
            "middle",
            &format!(" fill=\"{LABEL_COLOR}\""),
        );
    }
    Ok(doc.finish())
}

/// Render the `histogram` widget.
///
/// # Errors
///
/// Returns [`WidgetError`] for dimension violations, no bins, inverted or
/// overlapping bins, or a negative frequency.
pub fn render_histogram(widget: &HistogramWidget) -> WidgetResult<String> {
    let (Some(first), Some(last)) = (widget.bins.first(), widget.bins.last()) else {
        return Err(WidgetError::EmptyDataset(
            "histogram needs at least one bin".to_string(),
        ));
    };
    for (index, bin) in widget.bins.iter().enumerate() {
        if bin.start >= bin.end {
            return Err(WidgetError::InvalidDimensions(format!(
                "bin {index} range [{}, {}] must satisfy start < end",
                bin.start, bin.end
            )));
        }
        if bin.frequency < 0.0 {
            return Err(WidgetError::InvalidDimensions(format!(
                "bin {index} frequency {} must be non-negative",
                bin.frequency
            )));
        }
        if let Some(next) = widget.bins.get(index + 1) {
            if next.start < bin.end {
                return Err(WidgetError::InvalidDimensions(format!(
                    "bin {} overlaps bin {index}",
                    index + 1
                )));
            }
        }
    }

    let x_min = first.start;
    let x_max = last.end;
    let frame = PlotFrame::new(
        widget.width,
        widget.height,
        &category_axis_stub(x_min, x_max),
        &widget.y_axis,
    )?;
    let mut doc = SvgDoc::new(widget.width, widget.height);

    draw_value_axis(&mut doc, &frame, widget.y_axis.tick_interval, widget.y_axis.show_grid_lines);

    let base = frame.y_min().max(0.0);
    for bin in &widget.bins {
        let x = frame.svg_x(bin.start);
        let y = frame.svg_y(bin.frequency.max(base));
        doc.rect(
            x,
            y,
            frame.svg_x(bin.end) - x,
            frame.svg_y(base) - y,
            &widget.color,
            " stroke=\"#ffffff\" stroke-width=\"1\"",
        );
    }

    // Edge labels: every bin start plus the final end.
    let mut edges: Vec<f64> = widget.bins.iter().map(|b| b.start).collect();
    edges.push(x_max);
    for edge in edges {
        doc.text(
            frame.svg_x(edge),
            PAD_TOP + frame.plot_height() + 14.0,
            &fmt_num(edge),
            TICK_FONT,
            "middle",
            &format!(" fill=\"{LABEL_COLOR}\""),
        );
    }
    if let Some(x_label) = &widget.x_label {
        doc.text(
            PAD_LEFT + frame.plot_width() / 2.0,
            widget.height - 4.0,
            x_label,
            12.0,
            "middle",
            &format!(" fill=\"{AXIS_COLOR}\""),
        );
    }
    Ok(doc.finish())
}

/// Render the `dotPlot` widget.
///
/// # Errors
///
/// Returns [`WidgetError`] for a non-positive canvas or no categories.
pub fn render_dot_plot(widget: &DotPlotWidget) -> WidgetResult<String> {
    if widget.categories.is_empty() {
        return Err(WidgetError::EmptyDataset(
            "dot plot needs at least one category".to_string(),
        ));
    }
    if !(widget.width > PAD_LEFT + 16.0 && widget.height > PAD_TOP + PAD_BOTTOM) {
        return Err(WidgetError::InvalidDimensions(format!(
            "canvas {}x{} leaves no room inside the padding",
            widget.width, widget.height
        )));
    }

    let mut doc = SvgDoc::new(widget.width, widget.height);
    let baseline = widget.height - PAD_BOTTOM;
    #[allow(clippy::cast_precision_loss)]
    let slot = (widget.width - PAD_LEFT - 16.0) / widget.categories.len() as f64;

    doc.line(PAD_LEFT, baseline, widget.width - 16.0, baseline, AXIS_COLOR, " stroke-width=\"1.5\"");

    for (index, column) in widget.categories.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let cx = PAD_LEFT + (index as f64 + 0.5) * slot;
        for level in 0..column.count {
            doc.circle(cx, baseline - 10.0 - f64::from(level) * 14.0, 5.0, &widget.color, "");
        }
        doc.text(
            cx,
            baseline + 16.0,
            &column.label,
            TICK_FONT,
            "middle",
            &format!(" fill=\"{LABEL_COLOR}\""),
        );
    }
    if let Some(x_label) = &widget.x_label {
        doc.text(
            PAD_LEFT + (widget.width - PAD_LEFT - 16.0) / 2.0,
            widget.height - 4.0,
            x_label,
            12.0,
            "middle",
            &format!(" fill=\"{AXIS_COLOR}\""),
        );
    }
    Ok(doc.finish())
}

/// Render the `pieChart` widget.
///
/// # Errors
///
/// Returns [`WidgetError`] for no slices, a negative slice value, or a
/// zero total.
pub fn render_pie_chart(widget: &PieChartWidget) -> WidgetResult<String> {
    if widget.slices.is_empty() {
        return Err(WidgetError::EmptyDataset(
            "pie chart needs at least one slice".to_string(),
        ));
    }
    for slice in &widget.slices {
        if slice.value < 0.0 {
            return Err(WidgetError::InvalidDimensions(format!(
                "slice {} value {} must be non-negative",
                slice.label, slice.value
            )));
        }
    }
    let total: f64 = widget.slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return Err(WidgetError::EmptyDataset(
            "pie chart slice values sum to zero".to_string(),
        ));
    }

    let mut doc = SvgDoc::new(widget.width, widget.height);
    let title_room = if widget.title.is_some() { 10.0 } else { 0.0 };
    let cx = widget.width / 2.0;
    let cy = (widget.height + title_room) / 2.0;
    let radius = (widget.width.min(widget.height) / 2.0 - 28.0 - title_room).max(10.0);

    if let Some(title) = &widget.title {
        doc.text(cx, 14.0, title, 13.0, "middle", &format!(" fill=\"{AXIS_COLOR}\""));
    }

    let mut start_angle = -FRAC_PI_2;
    for (index, slice) in widget.slices.iter().enumerate() {
        let sweep = slice.value / total * TAU;
        let color = slice
            .color
            .as_deref()
            .unwrap_or(CHART_PALETTE[index % CHART_PALETTE.len()]);

        if sweep >= TAU - 1.0e-9 {
            // A single full-circle slice has coincident arc endpoints; the
            // arc command degenerates, so draw the disc directly.
            doc.circle(cx, cy, radius, color, "");
        } else if sweep > 0.0 {
            let end_angle = start_angle + sweep;
            let (x1, y1) = (cx + radius * start_angle.cos(), cy + radius * start_angle.sin());
            let (x2, y2) = (cx + radius * end_angle.cos(), cy + radius * end_angle.sin());
            let large_arc = i32::from(sweep > PI);
            doc.extents_mut().include_rect(cx - radius, cy - radius, 2.0 * radius, 2.0 * radius);
            let _ = write!(
                doc.body_mut(),
                "<path d=\"M{},{} L{},{} A{},{} 0 {large_arc},1 {},{} Z\" fill=\"{}\"/>",
                fmt_num(cx),
                fmt_num(cy),
                fmt_num(x1),
                fmt_num(y1),
                fmt_num(radius),
                fmt_num(radius),
                fmt_num(x2),
                fmt_num(y2),
                escape_xml(color),
            );
        }

        if sweep > 0.0 {
            let mid = start_angle + sweep / 2.0;
            let lx = cx + (radius + 12.0) * mid.cos();
            let ly = cy + (radius + 12.0) * mid.sin() + 4.0;
            let anchor = if mid.cos() > 0.05 {
                "start"
            } else if mid.cos() < -0.05 {
                "end"
            } else {
                "middle"
            };
            doc.text(lx, ly, &slice.label, TICK_FONT, anchor, &format!(" fill=\"{AXIS_COLOR}\""));
        }
        start_angle += sweep;
    }
    Ok(doc.finish())
}

/// Y-axis grid lines and tick labels for categorical charts.
fn draw_value_axis(doc: &mut SvgDoc, frame: &PlotFrame, tick_interval: f64, show_grid_lines: bool) {
    let (px, py, pw, ph) = frame.plot_rect();
    for tick in tick_values(frame.y_min(), frame.y_max(), tick_interval) {
        let y = frame.svg_y(tick);
        if show_grid_lines {
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
    doc.line(px, py + ph, px + pw, py + ph, AXIS_COLOR, " stroke-width=\"1.5\"");
    doc.line(px, py, px, py + ph, AXIS_COLOR, " stroke-width=\"1.5\"");
}

/// A synthetic x axis for frame construction where the widget's horizontal
/// dimension is categorical rather than author-specified.
fn category_axis_stub(min: f64, max: f64) -> AxisOptions {
    AxisOptions {
        label: None,
        min,
        max,
        tick_interval: (max - min).max(1.0),
        show_grid_lines: false,
    }
}
