//! SVG document assembly.
//!
//! Fragments are built by writing markup into a [`SvgDoc`], which tracks
//! [`RenderExtents`] alongside the body and emits the final `<svg>` header
//! only at [`SvgDoc::finish`], once the true canvas size is known.

use std::fmt::Write;

use crate::extents::{RenderExtents, CANVAS_MARGIN};

/// The SVG namespace stamped on every fragment root.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Format a coordinate or numeric attribute deterministically.
///
/// Integral values print without a decimal point; everything else rounds
/// to two places with trailing zeros trimmed. The same input always
/// produces the same text, which is what makes snapshot testing of
/// fragments possible.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn fmt_num(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1.0e9 {
        #[allow(clippy::cast_possible_truncation)]
        return format!("{}", value as i64);
    }
    let rounded = format!("{value:.2}");
    rounded.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Escape special XML characters.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// An SVG fragment under construction.
#[derive(Debug)]
pub struct SvgDoc {
    nominal_width: f64,
    nominal_height: f64,
    defs: String,
    body: String,
    extents: RenderExtents,
}

impl SvgDoc {
    /// Start a fragment with a nominal canvas size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let mut extents = RenderExtents::new();
        // The nominal canvas is always part of the drawing area.
        extents.include_rect(0.0, 0.0, width, height);
        Self {
            nominal_width: width,
            nominal_height: height,
            defs: String::new(),
            body: String::with_capacity(2048),
            extents,
        }
    }

    /// The body buffer, for direct `write!` calls.
    pub fn body_mut(&mut self) -> &mut String {
        &mut self.body
    }

    /// The extent accumulator.
    pub fn extents_mut(&mut self) -> &mut RenderExtents {
        &mut self.extents
    }

    /// Register a rectangular clip path and return the attribute value
    /// that applies it.
    pub fn add_clip_rect(&mut self, id: &str, x: f64, y: f64, width: f64, height: f64) -> String {
        let _ = write!(
            self.defs,
            "<clipPath id=\"{id}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>",
            fmt_num(x),
            fmt_num(y),
            fmt_num(width),
            fmt_num(height),
        );
        format!("url(#{id})")
    }

    /// Draw a line segment.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, extra: &str) {
        self.extents.include(x1, y1);
        self.extents.include(x2, y2);
        let _ = write!(
            self.body,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\"{extra}/>",
            fmt_num(x1),
            fmt_num(y1),
            fmt_num(x2),
            fmt_num(y2),
            escape_xml(stroke),
        );
    }

    /// Draw a circle.
    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, extra: &str) {
        self.extents.include_rect(cx - r, cy - r, 2.0 * r, 2.0 * r);
        let _ = write!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"{extra}/>",
            fmt_num(cx),
            fmt_num(cy),
            fmt_num(r),
            escape_xml(fill),
        );
    }

    /// Draw a rectangle.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str, extra: &str) {
        self.extents.include_rect(x, y, width, height);
        let _ = write!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"{extra}/>",
            fmt_num(x),
            fmt_num(y),
            fmt_num(width),
            fmt_num(height),
            escape_xml(fill),
        );
    }

    /// Draw a text run. `anchor` is an SVG `text-anchor` value.
    pub fn text(&mut self, x: f64, y: f64, content: &str, font_size: f64, anchor: &str, extra: &str) {
        self.extents
            .include_text(x, y, content, font_size, anchor == "end");
        let _ = write!(
            self.body,
            "<text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"{anchor}\" font-family=\"sans-serif\"{extra}>{}</text>",
            fmt_num(x),
            fmt_num(y),
            fmt_num(font_size),
            escape_xml(content),
        );
    }

    /// Close the fragment: size the canvas from the accumulated extents
    /// and emit the complete `<svg>` element.
    ///
    /// The canvas only ever grows: sides the content stays inside keep
    /// their nominal bound, overflowing sides gain [`CANVAS_MARGIN`].
    #[must_use]
    pub fn finish(self) -> String {
        let origin_x = if self.extents.min_x() < 0.0 {
            self.extents.min_x() - CANVAS_MARGIN
        } else {
            0.0
        };
        let origin_y = if self.extents.min_y() < 0.0 {
            self.extents.min_y() - CANVAS_MARGIN
        } else {
            0.0
        };
        let max_x = if self.extents.max_x() > self.nominal_width {
            self.extents.max_x() + CANVAS_MARGIN
        } else {
            self.nominal_width
        };
        let max_y = if self.extents.max_y() > self.nominal_height {
            self.extents.max_y() + CANVAS_MARGIN
        } else {
            self.nominal_height
        };
        let width = max_x - origin_x;
        let height = max_y - origin_y;

        let mut svg = String::with_capacity(self.body.len() + self.defs.len() + 256);
        let _ = write!(
            svg,
            "<svg xmlns=\"{SVG_NS}\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">",
            fmt_num(width),
            fmt_num(height),
            fmt_num(origin_x),
            fmt_num(origin_y),
            fmt_num(width),
            fmt_num(height),
        );
        if !self.defs.is_empty() {
            let _ = write!(svg, "<defs>{}</defs>", self.defs);
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num_trims() {
        assert_eq!(fmt_num(4.0), "4");
        assert_eq!(fmt_num(-0.5), "-0.5");
        assert_eq!(fmt_num(3.14159), "3.14");
        assert_eq!(fmt_num(2.10), "2.1");
        assert_eq!(fmt_num(-0.0), "0");
    }

    #[test]
    fn test_canvas_keeps_nominal_size_when_unexceeded() {
        let mut doc = SvgDoc::new(200.0, 100.0);
        doc.circle(50.0, 50.0, 4.0, "#000", "");
        let svg = doc.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"200\""), "{svg}");
        assert!(svg.contains("viewBox=\"0 0 200 100\""), "{svg}");
    }

    #[test]
    fn test_canvas_grows_for_overflowing_text() {
        let mut doc = SvgDoc::new(200.0, 100.0);
        // Right-anchored label hanging left of x=0.
        doc.text(2.0, 50.0, "-10000", 11.0, "end", "");
        let svg = doc.finish();
        // viewBox origin must move left of zero so the label survives.
        assert!(svg.contains("viewBox=\"-"), "{svg}");
    }

    #[test]
    fn test_clip_path_lands_in_defs() {
        let mut doc = SvgDoc::new(100.0, 100.0);
        let clip = doc.add_clip_rect("plot-area", 10.0, 10.0, 80.0, 80.0);
        assert_eq!(clip, "url(#plot-area)");
        let svg = doc.finish();
        assert!(svg.contains("<defs><clipPath id=\"plot-area\">"), "{svg}");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
    }
}
