//! Number-line rendering.

use itempress_core::NumberLineWidget;

use crate::error::{WidgetError, WidgetResult};
use crate::plane::{draw_marker, AXIS_COLOR, LABEL_COLOR, TICK_FONT};
use crate::scale::tick_values;
use crate::svg::{fmt_num, SvgDoc};

/// Fixed canvas height; number lines only grow horizontally.
const HEIGHT: f64 = 90.0;
/// Horizontal padding on each side.
const PAD: f64 = 24.0;
/// Pixel y of the line itself.
const BASELINE: f64 = 54.0;

/// Render the `numberLine` widget.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidDimensions`] for a non-positive width, an
/// inverted range, or a non-positive tick interval.
pub fn render_number_line(widget: &NumberLineWidget) -> WidgetResult<String> {
    if !(widget.width.is_finite() && widget.width > 2.0 * PAD) {
        return Err(WidgetError::InvalidDimensions(format!(
            "number line width {} must exceed {}",
            widget.width,
            2.0 * PAD
        )));
    }
    if widget.min >= widget.max {
        return Err(WidgetError::InvalidDimensions(format!(
            "number line range [{}, {}] must satisfy min < max",
            widget.min, widget.max
        )));
    }
    if !(widget.tick_interval.is_finite() && widget.tick_interval > 0.0) {
        return Err(WidgetError::InvalidDimensions(format!(
            "number line tick interval {} must be positive",
            widget.tick_interval
        )));
    }

    let span = widget.max - widget.min;
    let scale = (widget.width - 2.0 * PAD) / span;
    let svg_x = |value: f64| PAD + (value - widget.min) * scale;

    let mut doc = SvgDoc::new(widget.width, HEIGHT);
    doc.line(
        svg_x(widget.min),
        BASELINE,
        svg_x(widget.max),
        BASELINE,
        AXIS_COLOR,
        " stroke-width=\"1.5\"",
    );

    for tick in tick_values(widget.min, widget.max, widget.tick_interval) {
        let x = svg_x(tick);
        doc.line(x, BASELINE - 5.0, x, BASELINE + 5.0, AXIS_COLOR, "");
        doc.text(
            x,
            BASELINE + 20.0,
            &fmt_num(tick),
            TICK_FONT,
            "middle",
            &format!(" fill=\"{LABEL_COLOR}\""),
        );
    }

    for point in &widget.points {
        let x = svg_x(point.value);
        draw_marker(&mut doc, x, BASELINE, &point.color, point.style);
        if let Some(label) = &point.label {
            doc.text(
                x,
                BASELINE - 12.0,
                label,
                12.0,
                "middle",
                &format!(" fill=\"{AXIS_COLOR}\""),
            );
        }
    }

    Ok(doc.finish())
}
