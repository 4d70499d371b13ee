use std::cmp::Ordering;

use crate::domain::models::{EpisodeRecord, TimelinePoint};

pub mod dedup;
pub mod flatten;
pub mod matrix;
pub mod validate;

pub fn sort_by_episode_key(records: &mut [EpisodeRecord]) {
    records.sort_by_key(|record| record.episode_key());
}

/// Air date, then show, then season, then episode. Undated records sort last.
pub fn sort_for_timeline(records: &mut [EpisodeRecord]) {
    records.sort_by(|a, b| {
        match (a.air_date, b.air_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.show.cmp(&b.show))
        .then_with(|| a.season.cmp(&b.season))
        .then_with(|| a.episode.cmp(&b.episode))
    });
}

/// First record holding the highest rating.
pub fn best(records: &[EpisodeRecord]) -> Option<&EpisodeRecord> {
    extreme(records, Ordering::Greater)
}

/// First record holding the lowest rating.
pub fn worst(records: &[EpisodeRecord]) -> Option<&EpisodeRecord> {
    extreme(records, Ordering::Less)
}

fn extreme(records: &[EpisodeRecord], wanted: Ordering) -> Option<&EpisodeRecord> {
    let mut found: Option<(&EpisodeRecord, f64)> = None;
    for record in records {
        let Some(rating) = record.rating else {
            continue;
        };
        match found {
            Some((_, current)) if rating.partial_cmp(&current) != Some(wanted) => {}
            _ => found = Some((record, rating)),
        }
    }
    found.map(|(record, _)| record)
}

/// Timeline points for records that have both an air date and a rating,
/// in the order given.
pub fn timeline_points(records: &[EpisodeRecord]) -> Vec<TimelinePoint> {
    records
        .iter()
        .filter_map(|record| {
            let air_date = record.air_date?;
            Some(TimelinePoint {
                show: record.show.clone(),
                season: record.season,
                episode: record.episode,
                rating: record.rating?,
                air_date,
                plot_date: air_date,
            })
        })
        .collect()
}
