//! Per-series rating summary: a season-average strip on top of a
//! season × episode heatmap.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use std::path::Path;

use super::colorbar::draw_colorbar;
use super::style::{contrasting_text, ChartStyle};
use super::{approx_text_width, bold_text, text, vertical_text};
use crate::domain::models::EpisodeRecord;
use crate::table::matrix::RatingMatrix;

pub struct SummaryChart<'a> {
    pub title: &'a str,
    pub matrix: &'a RatingMatrix,
    pub best: &'a EpisodeRecord,
    pub worst: &'a EpisodeRecord,
    pub obtained: NaiveDate,
}

impl SummaryChart<'_> {
    fn best_label(&self) -> String {
        format!("Highest rated: {}", self.best.title)
    }

    fn worst_label(&self) -> String {
        format!("Lowest rated: {}", self.worst.title)
    }
}

/// Pixel geometry of a summary chart.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Layout {
    width: u32,
    height: u32,
    grid_left: i32,
    grid_top: i32,
    cell_w: i32,
    cell_h: i32,
    strip_top: i32,
    strip_bottom: i32,
    colorbar_top: i32,
}

impl Layout {
    fn new(chart: &SummaryChart, style: &ChartStyle) -> Self {
        let cols = chart.matrix.seasons.len() as i32;
        let rows = chart.matrix.episodes.len() as i32;
        let px = |inches: f64| style.px(inches) as i32;

        let pad = px(0.25);
        let cell_w = px(0.45);
        let cell_h = px(0.3);

        let label_px = style.pt(9.0);
        let side_label = approx_text_width(&chart.best_label(), label_px)
            .max(approx_text_width(&chart.worst_label(), label_px)) as i32
            + px(0.1);
        let axis_w = px(0.6);
        // labels sit on both sides so the grid stays centred
        let side = side_label.max(axis_w);

        let grid_w = cols * cell_w;
        let width = 2 * pad + 2 * side + grid_w;

        let title_h = px(0.9);
        let strip_top = pad + title_h;
        let strip_bottom = strip_top + px(1.2);
        let grid_top = strip_bottom + px(0.6);
        let colorbar_top = grid_top + rows * cell_h + px(0.15);
        let height = colorbar_top + px(0.7) + pad;

        Self {
            width: width as u32,
            height: height as u32,
            grid_left: pad + side,
            grid_top,
            cell_w,
            cell_h,
            strip_top,
            strip_bottom,
            colorbar_top,
        }
    }

    fn grid_right(&self, cols: usize) -> i32 {
        self.grid_left + cols as i32 * self.cell_w
    }

    fn column_centre(&self, col: usize) -> i32 {
        self.grid_left + col as i32 * self.cell_w + self.cell_w / 2
    }

    fn row_centre(&self, row: usize) -> i32 {
        self.grid_top + row as i32 * self.cell_h + self.cell_h / 2
    }

    fn cell(&self, row: usize, col: usize) -> [(i32, i32); 2] {
        let x = self.grid_left + col as i32 * self.cell_w;
        let y = self.grid_top + row as i32 * self.cell_h;
        [(x, y), (x + self.cell_w, y + self.cell_h)]
    }

    /// Vertical position of `rating` in the average strip.
    fn strip_y(&self, style: &ChartStyle, rating: f64) -> i32 {
        let span = style.rating_max - style.rating_min;
        let t = if span > 0.0 {
            ((rating - style.rating_min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        // leave headroom for the value labels
        let usable = f64::from(self.strip_bottom - self.strip_top) * 0.75;
        self.strip_bottom - (t * usable).round() as i32
    }
}

pub fn save_summary(path: &Path, chart: &SummaryChart, style: &ChartStyle) -> Result<()> {
    if chart.matrix.is_empty() {
        bail!("No rated episodes to chart for {}", chart.title);
    }
    let layout = Layout::new(chart, style);
    let root = BitMapBackend::new(path, (layout.width, layout.height)).into_drawing_area();
    draw_summary(&root, chart, style)?;
    // surface write failures instead of losing them on drop
    root.present()?;
    Ok(())
}

pub fn draw_summary<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &SummaryChart,
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let layout = Layout::new(chart, style);
    root.fill(&style.background())?;

    draw_heading(root, &layout, chart, style)?;
    draw_average_strip(root, &layout, chart, style)?;
    draw_axes(root, &layout, chart, style)?;
    draw_cells(root, &layout, chart, style)?;
    draw_highlights(root, &layout, chart, style)?;

    let cols = chart.matrix.seasons.len();
    let centre = (layout.grid_left + layout.grid_right(cols)) / 2;
    let half = (layout.grid_right(cols) - layout.grid_left).max(style.px(2.0) as i32) / 2;
    draw_colorbar(
        root,
        style,
        (centre - half, centre + half),
        layout.colorbar_top,
        &format!("{} Rating", style.source_label),
    )?;

    Ok(())
}

fn draw_heading<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    chart: &SummaryChart,
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let centre = layout.width as i32 / 2;
    let top = style.px(0.25) as i32;
    let text_color = style.text();

    root.draw(&Text::new(
        format!("{} {} Ratings", chart.title, style.source_label),
        (centre, top),
        bold_text(style, 18.0, &text_color, HPos::Center, VPos::Top),
    ))?;
    root.draw(&Text::new(
        format!("Data obtained {}", chart.obtained.format("%-d %B %Y")),
        (centre, top + style.pt(18.0).round() as i32 + style.px(0.1) as i32),
        text(style, 7.0, &text_color, HPos::Center, VPos::Top),
    ))?;
    Ok(())
}

fn draw_average_strip<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    chart: &SummaryChart,
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let text_color = style.text();
    let points: Vec<(i32, i32, f64)> = chart
        .matrix
        .season_means()
        .into_iter()
        .enumerate()
        .filter_map(|(col, mean)| {
            mean.map(|m| (layout.column_centre(col), layout.strip_y(style, m), m))
        })
        .collect();

    root.draw(&PathElement::new(
        points.iter().map(|(x, y, _)| (*x, *y)).collect::<Vec<_>>(),
        text_color.mix(0.1).stroke_width(2),
    ))?;

    let radius = style.px(0.04).max(3) as i32;
    let value_style = text(style, 8.0, &text_color, HPos::Center, VPos::Bottom);
    for (x, y, mean) in &points {
        root.draw(&Circle::new((*x, *y), radius, style.rating_color(*mean).filled()))?;
        root.draw(&Text::new(
            format!("{mean:.1}"),
            (*x, *y - radius - 4),
            value_style.clone(),
        ))?;
    }

    root.draw(&Text::new(
        "Average Rating",
        (
            layout.grid_left - style.px(0.35) as i32,
            (layout.strip_top + layout.strip_bottom) / 2,
        ),
        vertical_text(style, 8.0, &text_color),
    ))?;
    Ok(())
}

fn draw_axes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    chart: &SummaryChart,
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let text_color = style.text();
    let cols = chart.matrix.seasons.len();
    let tick_style = text(style, 8.0, &text_color, HPos::Center, VPos::Bottom);

    for (col, season) in chart.matrix.seasons.iter().enumerate() {
        root.draw(&Text::new(
            season.to_string(),
            (layout.column_centre(col), layout.grid_top - 4),
            tick_style.clone(),
        ))?;
    }
    root.draw(&Text::new(
        "Season",
        (
            (layout.grid_left + layout.grid_right(cols)) / 2,
            layout.grid_top - style.px(0.3) as i32,
        ),
        text(style, 9.0, &text_color, HPos::Center, VPos::Bottom),
    ))?;

    let row_style = text(style, 8.0, &text_color, HPos::Right, VPos::Center);
    for (row, episode) in chart.matrix.episodes.iter().enumerate() {
        root.draw(&Text::new(
            episode.to_string(),
            (layout.grid_left - 6, layout.row_centre(row)),
            row_style.clone(),
        ))?;
    }
    let rows = chart.matrix.episodes.len() as i32;
    root.draw(&Text::new(
        "Episode",
        (
            layout.grid_left - style.px(0.45) as i32,
            layout.grid_top + rows * layout.cell_h / 2,
        ),
        vertical_text(style, 9.0, &text_color),
    ))?;
    Ok(())
}

fn draw_cells<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    chart: &SummaryChart,
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    for (row, cells) in chart.matrix.cells.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let Some(rating) = cell else {
                continue;
            };
            let [(x0, y0), (x1, y1)] = layout.cell(row, col);
            let fill = style.rating_color(*rating);
            // one pixel of background between cells
            root.draw(&Rectangle::new(
                [(x0 + 1, y0 + 1), (x1 - 1, y1 - 1)],
                fill.filled(),
            ))?;
            root.draw(&Text::new(
                format!("{rating:.1}"),
                ((x0 + x1) / 2, (y0 + y1) / 2),
                text(style, 8.0, &contrasting_text(fill), HPos::Center, VPos::Center),
            ))?;
        }
    }
    Ok(())
}

fn draw_highlights<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    chart: &SummaryChart,
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let matrix = chart.matrix;
    let text_color = style.text();
    let label_x = layout.grid_right(matrix.seasons.len()) + style.px(0.05) as i32;

    // both in one row: stack the labels instead of overprinting
    let (best_v, worst_v) = if chart.best.episode == chart.worst.episode {
        (VPos::Bottom, VPos::Top)
    } else {
        (VPos::Center, VPos::Center)
    };

    for (record, label, v) in [
        (chart.best, chart.best_label(), best_v),
        (chart.worst, chart.worst_label(), worst_v),
    ] {
        let (Some(row), Some(col)) = (matrix.row_of(record.episode), matrix.column_of(record.season))
        else {
            continue;
        };
        root.draw(&Rectangle::new(
            layout.cell(row, col),
            text_color.stroke_width(2),
        ))?;
        root.draw(&Text::new(
            label,
            (label_x, layout.row_centre(row)),
            text(style, 9.0, &text_color, HPos::Left, v),
        ))?;
    }
    Ok(())
}
