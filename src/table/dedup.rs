use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::models::TimelinePoint;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DedupError {
    #[error("plot dates still collide after {passes} pass(es) ({collisions} point(s) affected)")]
    NotConverged { passes: usize, collisions: usize },
    #[error("plot date overflowed the calendar")]
    DateOverflow,
}

/// Moves same-show points that share a plot date apart, one day per rank,
/// until every (show, plot date) pair is unique.
///
/// Ranks are taken in slice order, so the first point of a collision group
/// stays put and later ones move forward. A shifted date can land on another
/// episode of the same show, which is resolved on the next pass. At most
/// `points.len()` shifting passes are made; past that the points keep their
/// last plot dates and [`DedupError::NotConverged`] is returned.
///
/// Returns the number of shifting passes performed.
pub fn resolve_plot_dates(points: &mut [TimelinePoint]) -> Result<usize, DedupError> {
    resolve_plot_dates_within(points, points.len())
}

pub fn resolve_plot_dates_within(
    points: &mut [TimelinePoint],
    max_passes: usize,
) -> Result<usize, DedupError> {
    let mut passes = 0;

    loop {
        let ranks = collision_ranks(points);
        let collisions = ranks.iter().filter(|rank| **rank > 0).count();
        if collisions == 0 {
            return Ok(passes);
        }
        if passes == max_passes {
            return Err(DedupError::NotConverged { passes, collisions });
        }

        for (point, rank) in points.iter_mut().zip(ranks) {
            point.plot_date = shift(point.plot_date, rank)?;
        }
        passes += 1;
    }
}

/// Zero-based position of each point within its (show, plot date) group.
fn collision_ranks(points: &[TimelinePoint]) -> Vec<u64> {
    let mut seen: HashMap<(&str, NaiveDate), u64> = HashMap::with_capacity(points.len());
    points
        .iter()
        .map(|point| {
            let count = seen
                .entry((point.show.as_str(), point.plot_date))
                .or_insert(0);
            let rank = *count;
            *count += 1;
            rank
        })
        .collect()
}

fn shift(date: NaiveDate, days: u64) -> Result<NaiveDate, DedupError> {
    date.checked_add_days(Days::new(days))
        .ok_or(DedupError::DateOverflow)
}
