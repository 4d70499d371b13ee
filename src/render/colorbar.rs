use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};

use super::style::ChartStyle;
use super::text;

const SLICES: i32 = 100;

/// Horizontal colour scale across `[x0, x1]` starting at `top`, with whole
/// rating ticks underneath and `label` below those.
pub fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    style: &ChartStyle,
    (x0, x1): (i32, i32),
    top: i32,
    label: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let bar_height = style.px(0.15) as i32;
    let width = (x1 - x0).max(1);

    for slice in 0..SLICES {
        let left = x0 + width * slice / SLICES;
        let right = x0 + width * (slice + 1) / SLICES;
        let t = (f64::from(slice) + 0.5) / f64::from(SLICES);
        let rating = style.rating_min + t * (style.rating_max - style.rating_min);
        area.draw(&Rectangle::new(
            [(left, top), (right, top + bar_height)],
            style.rating_color(rating).filled(),
        ))?;
    }

    let text_color = style.text();
    let tick_style = text(style, 7.0, &text_color, HPos::Center, VPos::Top);
    for (rating, x) in tick_positions(style, x0, x1) {
        area.draw(&PathElement::new(
            vec![(x, top + bar_height), (x, top + bar_height + 4)],
            text_color,
        ))?;
        area.draw(&Text::new(
            format!("{rating}"),
            (x, top + bar_height + 6),
            tick_style.clone(),
        ))?;
    }

    area.draw(&Text::new(
        label.to_string(),
        ((x0 + x1) / 2, top + bar_height + style.px(0.22) as i32),
        text(style, 8.0, &text_color, HPos::Center, VPos::Top),
    ))?;

    Ok(())
}

/// Pixel position of every even whole rating within the style's range.
fn tick_positions(style: &ChartStyle, x0: i32, x1: i32) -> Vec<(i64, i32)> {
    let span = style.rating_max - style.rating_min;
    if span <= 0.0 {
        return Vec::new();
    }
    let first = style.rating_min.ceil() as i64;
    let last = style.rating_max.floor() as i64;
    (first..=last)
        .filter(|rating| rating % 2 == 0)
        .map(|rating| {
            let t = (rating as f64 - style.rating_min) / span;
            (rating, x0 + (t * f64::from(x1 - x0)).round() as i32)
        })
        .collect()
}
