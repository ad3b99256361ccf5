//! Model-space to pixel-space axis scaling.
//!
//! The only place coordinate math happens: every generator maps `(x, y)`
//! through a [`PlotFrame`], one independent affine transform per axis.

use itempress_core::AxisOptions;

use crate::error::{WidgetError, WidgetResult};

/// Left padding reserving room for y tick labels.
pub const PAD_LEFT: f64 = 44.0;
/// Right padding.
pub const PAD_RIGHT: f64 = 16.0;
/// Top padding.
pub const PAD_TOP: f64 = 16.0;
/// Bottom padding reserving room for x tick labels.
pub const PAD_BOTTOM: f64 = 36.0;

/// The pixel frame of one plot: canvas size, padding, and axis ranges.
#[derive(Debug, Clone, Copy)]
pub struct PlotFrame {
    width: f64,
    height: f64,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl PlotFrame {
    /// Build a frame from axis options, checking every dimension invariant.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidDimensions`] for a non-positive canvas,
    /// an inverted or degenerate axis range, or a non-positive tick step.
    pub fn new(
        width: f64,
        height: f64,
        x_axis: &AxisOptions,
        y_axis: &AxisOptions,
    ) -> WidgetResult<Self> {
        check_tick(x_axis.tick_interval, "x")?;
        check_tick(y_axis.tick_interval, "y")?;
        Self::from_ranges(width, height, (x_axis.min, x_axis.max), (y_axis.min, y_axis.max))
    }

    /// Build a frame from raw ranges (for widgets without full axis specs).
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidDimensions`] for a non-positive canvas
    /// or an inverted/degenerate range.
    pub fn from_ranges(
        width: f64,
        height: f64,
        (x_min, x_max): (f64, f64),
        (y_min, y_max): (f64, f64),
    ) -> WidgetResult<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(WidgetError::InvalidDimensions(format!(
                "canvas must be positive, got {width}x{height}"
            )));
        }
        if width <= PAD_LEFT + PAD_RIGHT || height <= PAD_TOP + PAD_BOTTOM {
            return Err(WidgetError::InvalidDimensions(format!(
                "canvas {width}x{height} leaves no room inside the padding"
            )));
        }
        check_range(x_min, x_max, "x")?;
        check_range(y_min, y_max, "y")?;
        Ok(Self {
            width,
            height,
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Nominal canvas width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Nominal canvas height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Lower x bound.
    #[must_use]
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Upper x bound.
    #[must_use]
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Lower y bound.
    #[must_use]
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Upper y bound.
    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Width of the plot rectangle in pixels.
    #[must_use]
    pub fn plot_width(&self) -> f64 {
        self.width - PAD_LEFT - PAD_RIGHT
    }

    /// Height of the plot rectangle in pixels.
    #[must_use]
    pub fn plot_height(&self) -> f64 {
        self.height - PAD_TOP - PAD_BOTTOM
    }

    /// The plot rectangle as `(x, y, width, height)`.
    #[must_use]
    pub fn plot_rect(&self) -> (f64, f64, f64, f64) {
        (PAD_LEFT, PAD_TOP, self.plot_width(), self.plot_height())
    }

    /// Map a model-space x to pixel space.
    #[must_use]
    pub fn svg_x(&self, x: f64) -> f64 {
        PAD_LEFT + (x - self.x_min) / (self.x_max - self.x_min) * self.plot_width()
    }

    /// Map a model-space y to pixel space.
    ///
    /// Pixel y grows downward while axis y grows upward, hence the flip.
    #[must_use]
    pub fn svg_y(&self, y: f64) -> f64 {
        PAD_TOP + (1.0 - (y - self.y_min) / (self.y_max - self.y_min)) * self.plot_height()
    }

    /// Whether a model-space point lies inside the axis ranges.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

fn check_range(min: f64, max: f64, axis: &str) -> WidgetResult<()> {
    if !(min.is_finite() && max.is_finite()) || min >= max {
        return Err(WidgetError::InvalidDimensions(format!(
            "{axis} axis range [{min}, {max}] must satisfy min < max"
        )));
    }
    Ok(())
}

fn check_tick(tick: f64, axis: &str) -> WidgetResult<()> {
    if !tick.is_finite() || tick <= 0.0 {
        return Err(WidgetError::InvalidDimensions(format!(
            "{axis} axis tick interval {tick} must be positive"
        )));
    }
    Ok(())
}

/// Tick positions along `[min, max]` at `interval` steps, starting from
/// the first multiple of `interval` at or above `min`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn tick_values(min: f64, max: f64, interval: f64) -> Vec<f64> {
    let mut ticks = Vec::new();
    let first = (min / interval).ceil();
    let mut step = first;
    // Half-a-step tolerance absorbs accumulated float error at the far end.
    while step * interval <= max + interval * 1.0e-9 {
        let value = step * interval;
        ticks.push(if value == 0.0 { 0.0 } else { value });
        step += 1.0;
    }
    ticks
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn axis(min: f64, max: f64, tick: f64) -> AxisOptions {
        AxisOptions {
            label: None,
            min,
            max,
            tick_interval: tick,
            show_grid_lines: true,
        }
    }

    #[test]
    fn test_midpoint_maps_to_half_plot_width() {
        let frame =
            PlotFrame::new(400.0, 400.0, &axis(0.0, 10.0, 1.0), &axis(0.0, 10.0, 1.0)).expect("frame");
        let expected = PAD_LEFT + 0.5 * frame.plot_width();
        assert!((frame.svg_x(5.0) - expected).abs() < 1.0e-12);
    }

    #[test]
    fn test_y_axis_inverts() {
        let frame =
            PlotFrame::new(400.0, 400.0, &axis(-10.0, 10.0, 2.0), &axis(-10.0, 10.0, 2.0)).expect("frame");
        assert!(frame.svg_y(10.0) < frame.svg_y(-10.0));
        assert!((frame.svg_y(10.0) - PAD_TOP).abs() < 1.0e-12);
        assert!((frame.svg_y(-10.0) - (PAD_TOP + frame.plot_height())).abs() < 1.0e-12);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = PlotFrame::new(400.0, 400.0, &axis(5.0, 5.0, 1.0), &axis(0.0, 10.0, 1.0))
            .expect_err("must fail");
        assert!(matches!(err, WidgetError::InvalidDimensions(_)));
    }

    #[test]
    fn test_bad_canvas_rejected() {
        assert!(PlotFrame::from_ranges(0.0, 300.0, (0.0, 1.0), (0.0, 1.0)).is_err());
        assert!(PlotFrame::from_ranges(300.0, -5.0, (0.0, 1.0), (0.0, 1.0)).is_err());
        assert!(PlotFrame::from_ranges(40.0, 40.0, (0.0, 1.0), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_bad_tick_rejected() {
        assert!(PlotFrame::new(400.0, 400.0, &axis(0.0, 10.0, 0.0), &axis(0.0, 10.0, 1.0)).is_err());
        assert!(PlotFrame::new(400.0, 400.0, &axis(0.0, 10.0, 1.0), &axis(0.0, 10.0, -2.0)).is_err());
    }

    #[test]
    fn test_tick_values_cover_range() {
        assert_eq!(tick_values(-2.0, 2.0, 1.0), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(tick_values(0.0, 1.0, 0.25), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        // Ticks snap to multiples of the interval, not to min.
        assert_eq!(tick_values(-2.5, 2.5, 1.0), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
    }

    proptest! {
        #[test]
        fn prop_in_range_points_map_inside_plot_rect(
            x in -50.0f64..50.0,
            y in -50.0f64..50.0,
        ) {
            let frame = PlotFrame::from_ranges(
                480.0,
                360.0,
                (-50.0, 50.0),
                (-50.0, 50.0),
            ).expect("frame");

            let px = frame.svg_x(x);
            let py = frame.svg_y(y);
            prop_assert!(px >= PAD_LEFT - 1.0e-9);
            prop_assert!(px <= PAD_LEFT + frame.plot_width() + 1.0e-9);
            prop_assert!(py >= PAD_TOP - 1.0e-9);
            prop_assert!(py <= PAD_TOP + frame.plot_height() + 1.0e-9);
        }
    }
}
