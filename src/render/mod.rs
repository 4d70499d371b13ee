use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};

pub mod colorbar;
pub mod style;
pub mod summary;
pub mod timeline;

use style::ChartStyle;

/// Text style in the configured font family, sized in points.
pub(crate) fn text<'a>(
    style: &'a ChartStyle,
    points: f64,
    color: &RGBColor,
    h: HPos,
    v: VPos,
) -> TextStyle<'a> {
    (style.font_family.as_str(), style.pt(points))
        .into_font()
        .color(color)
        .pos(Pos::new(h, v))
}

pub(crate) fn bold_text<'a>(
    style: &'a ChartStyle,
    points: f64,
    color: &RGBColor,
    h: HPos,
    v: VPos,
) -> TextStyle<'a> {
    (style.font_family.as_str(), style.pt(points))
        .into_font()
        .style(FontStyle::Bold)
        .color(color)
        .pos(Pos::new(h, v))
}

/// Text turned to read bottom-to-top.
pub(crate) fn vertical_text<'a>(style: &'a ChartStyle, points: f64, color: &RGBColor) -> TextStyle<'a> {
    (style.font_family.as_str(), style.pt(points))
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

/// Rough rendered width of `text`, good enough to reserve margins before a
/// backend exists to measure with.
pub(crate) fn approx_text_width(text: &str, px_size: f64) -> u32 {
    (text.chars().count() as f64 * px_size * 0.6).ceil() as u32
}
