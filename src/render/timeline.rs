//! One row per show, one tick per episode at its plot date.

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use std::collections::HashMap;
use std::path::Path;

use super::colorbar::draw_colorbar;
use super::style::ChartStyle;
use super::{approx_text_width, bold_text, text};
use crate::domain::models::TimelinePoint;

const WIDTH_IN: f64 = 30.0;
const ROW_IN: f64 = 0.28;
const HEADER_IN: f64 = 1.6;
const FOOTER_IN: f64 = 1.0;
const TICK_HALF_HEIGHT: f64 = 0.35;

pub struct TimelineChart<'a> {
    pub points: &'a [TimelinePoint],
    /// How many shows were requested, for the title
    pub show_count: usize,
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRow {
    pub name: String,
    pub first_aired: NaiveDate,
}

/// Shows in order of their earliest air date; ties keep the order in which
/// the shows first appear in `points`.
pub fn show_rows(points: &[TimelinePoint]) -> Vec<ShowRow> {
    let mut rows: Vec<ShowRow> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for point in points {
        match index.get(point.show.as_str()) {
            Some(&i) => {
                let row = &mut rows[i];
                row.first_aired = row.first_aired.min(point.air_date);
            }
            None => {
                index.insert(point.show.as_str(), rows.len());
                rows.push(ShowRow {
                    name: point.show.clone(),
                    first_aired: point.air_date,
                });
            }
        }
    }

    rows.sort_by_key(|row| row.first_aired);
    rows
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Calendar years worth labelling between `start` and `end`, at most
/// `max_labels` of them, on round multiples of the step.
fn year_labels(start: NaiveDate, end: NaiveDate, max_labels: i32) -> Vec<i32> {
    let first = start.year();
    let last = end.year();
    let span = (last - first).max(1);
    let step = [1, 2, 5, 10, 20, 50]
        .into_iter()
        .find(|step| span / step < max_labels)
        .unwrap_or(100);
    (first..=last)
        .filter(|year| year % step == 0)
        .filter(|year| NaiveDate::from_ymd_opt(*year, 1, 1).is_some_and(|d| d >= start))
        .collect()
}

pub fn save_timeline(path: &Path, chart: &TimelineChart, style: &ChartStyle) -> Result<()> {
    if chart.points.is_empty() {
        bail!("No episodes to place on the timeline");
    }
    let rows = show_rows(chart.points).len();
    let height = style.px(HEADER_IN + FOOTER_IN + (rows as f64 + 2.0) * ROW_IN);
    let root = BitMapBackend::new(path, (style.px(WIDTH_IN), height)).into_drawing_area();
    draw_timeline(&root, chart, style)?;
    root.present()?;
    Ok(())
}

pub fn draw_timeline<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &TimelineChart,
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let rows = show_rows(chart.points);
    let (Some(min_date), Some(max_date)) = (
        chart.points.iter().map(|p| p.plot_date).min(),
        chart.points.iter().map(|p| p.plot_date).max(),
    ) else {
        bail!("No episodes to place on the timeline");
    };

    root.fill(&style.background())?;
    let (width, height) = root.dim_in_pixel();
    let (header, body) = root.split_vertically(style.px(HEADER_IN));
    let (plot, footer) = body.split_vertically(height.saturating_sub(style.px(HEADER_IN + FOOTER_IN)));

    let text_color = style.text();
    let centre = width as i32 / 2;
    header.draw(&Text::new(
        format!(
            "{}'s {} Highest User-Rated TV Shows",
            style.source_label, chart.show_count
        ),
        (centre, style.px(0.3) as i32),
        bold_text(style, 40.0, &text_color, HPos::Center, VPos::Top),
    ))?;
    header.draw(&Text::new(
        format!(
            "As of {}, sorted by original air date of first episode.",
            chart.as_of.format("%Y-%m-%d")
        ),
        (centre, style.px(0.3) as i32 + style.pt(40.0).round() as i32 + style.px(0.1) as i32),
        text(style, 14.0, &text_color, HPos::Center, VPos::Top),
    ))?;

    // room on the left of the earliest show for its name
    let label_px = style.pt(12.0);
    let longest = rows
        .iter()
        .map(|row| approx_text_width(&row.name, label_px))
        .max()
        .unwrap_or(0)
        + style.px(0.2);
    let margin = style.px(0.1);
    let plot_w = f64::from(width.saturating_sub(2 * margin).max(1));
    let fraction = (f64::from(longest) / plot_w).min(0.5);
    let span = (day_number(max_date) - day_number(min_date)).max(1.0);
    let x_start = day_number(min_date) - span * fraction / (1.0 - fraction);
    let x_end = day_number(max_date) + span * 0.01;

    let row_count = rows.len() as f64;
    // one spare row at the bottom carries the year labels
    let mut chart_ctx = ChartBuilder::on(&plot)
        .margin(margin)
        .build_cartesian_2d(x_start..x_end, -1.5..row_count - 0.5)?;

    let y_of: HashMap<&str, f64> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.name.as_str(), row_count - 1.0 - i as f64))
        .collect();

    let grid = text_color.mix(0.3);
    let year_style = text(style, 14.0, &text_color, HPos::Center, VPos::Center);
    let years = year_labels(min_date, max_date, 15);
    chart_ctx.draw_series(years.iter().filter_map(|year| {
        let x = day_number(NaiveDate::from_ymd_opt(*year, 1, 1)?);
        Some(PathElement::new(vec![(x, -0.5), (x, row_count - 0.5)], grid))
    }))?;
    chart_ctx.draw_series(years.iter().filter_map(|year| {
        let x = day_number(NaiveDate::from_ymd_opt(*year, 1, 1)?);
        Some(EmptyElement::at((x, -1.0)) + Text::new(year.to_string(), (0, 0), year_style.clone()))
    }))?;

    let stroke = style.px(0.015).max(2);
    chart_ctx.draw_series(chart.points.iter().filter_map(|point| {
        let y = *y_of.get(point.show.as_str())?;
        let x = day_number(point.plot_date);
        Some(PathElement::new(
            vec![(x, y - TICK_HALF_HEIGHT), (x, y + TICK_HALF_HEIGHT)],
            style.rating_color(point.rating).stroke_width(stroke),
        ))
    }))?;

    let name_style = text(style, 12.0, &text_color, HPos::Right, VPos::Center);
    let offset = -(style.px(0.13) as i32);
    chart_ctx.draw_series(rows.iter().filter_map(|row| {
        let y = *y_of.get(row.name.as_str())?;
        Some(
            EmptyElement::at((day_number(row.first_aired), y))
                + Text::new(row.name.clone(), (offset, 0), name_style.clone()),
        )
    }))?;

    let bar_half = (width as i32) * 3 / 20;
    draw_colorbar(
        &footer,
        style,
        (centre - bar_half, centre + bar_half),
        style.px(0.15) as i32,
        "User Rating",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn point(show: &str, air: &str) -> TimelinePoint {
        TimelinePoint {
            show: show.to_string(),
            season: 1,
            episode: 1,
            rating: 8.0,
            air_date: date(air),
            plot_date: date(air),
        }
    }

    #[test]
    fn test_show_rows_follow_first_air_date() {
        let points = vec![
            point("Late", "2010-01-01"),
            point("Early", "1999-01-01"),
            point("Late", "2005-06-01"),
            point("Middle", "2005-06-01"),
        ];

        let rows = show_rows(&points);

        assert_eq!(
            rows,
            vec![
                ShowRow {
                    name: "Early".to_string(),
                    first_aired: date("1999-01-01")
                },
                ShowRow {
                    name: "Late".to_string(),
                    first_aired: date("2005-06-01")
                },
                ShowRow {
                    name: "Middle".to_string(),
                    first_aired: date("2005-06-01")
                },
            ]
        );
    }

    #[test]
    fn test_show_rows_label_uses_air_date_not_plot_date() {
        let mut shifted = point("Show", "2001-01-01");
        shifted.plot_date = date("2001-01-02");
        let rows = show_rows(&[shifted]);
        assert_eq!(rows[0].first_aired, date("2001-01-01"));
    }

    #[test]
    fn test_year_labels_step_with_span() {
        assert_eq!(
            year_labels(date("2019-06-01"), date("2022-03-01"), 15),
            vec![2020, 2021, 2022]
        );
        assert_eq!(
            year_labels(date("1951-10-15"), date("2024-05-01"), 15),
            vec![1955, 1960, 1965, 1970, 1975, 1980, 1985, 1990, 1995, 2000, 2005, 2010, 2015, 2020]
        );
    }

    #[test]
    fn test_save_timeline_rejects_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let chart = TimelineChart {
            points: &[],
            show_count: 100,
            as_of: date("2021-06-23"),
        };

        assert!(save_timeline(&dir.path().join("top.png"), &chart, &ChartStyle::default()).is_err());
    }
}
