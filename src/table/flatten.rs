use chrono::NaiveDate;

use crate::domain::models::EpisodeRecord;
use crate::infra::tmdb::{EpisodePayload, SeasonMap};

/// Flattens season -> episode -> payload into one record per episode, in
/// season/episode order. The payload's `show_id` link is not carried over;
/// every record is owned by `show` instead.
pub fn flatten(show: &str, seasons: &SeasonMap) -> Vec<EpisodeRecord> {
    seasons
        .iter()
        .flat_map(|(season, episodes)| {
            episodes
                .iter()
                .map(move |(episode, payload)| to_record(show, *season, *episode, payload))
        })
        .collect()
}

fn to_record(show: &str, season: u32, episode: u32, payload: &EpisodePayload) -> EpisodeRecord {
    EpisodeRecord {
        show: show.to_string(),
        season,
        episode,
        rating: rating(payload),
        air_date: payload.air_date.as_deref().and_then(parse_air_date),
        title: payload
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("Episode {episode}")),
    }
}

// Unrated episodes come back as 0.0 with no votes
fn rating(payload: &EpisodePayload) -> Option<f64> {
    if payload.vote_count == 0 {
        return None;
    }
    payload.vote_average.filter(|r| r.is_finite())
}

fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
