use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::batch::{BatchReport, ShowError};
use super::output::chart_path;
use crate::domain::models::{EpisodeRecord, Exclusion, Field, ShowRef, TimelinePoint};
use crate::infra::tmdb::{SeriesEpisodes, TmdbClient};
use crate::infra::EpisodeSource;
use crate::render::style::ChartStyle;
use crate::render::timeline::{save_timeline, TimelineChart};
use crate::table::dedup::{resolve_plot_dates, DedupError};
use crate::table::flatten::flatten;
use crate::table::validate::{log_exclusions, require};
use crate::table::{sort_for_timeline, timeline_points};

const CHART_NAME: &str = "Highest Rated";

#[derive(Debug)]
pub struct FetchedShow {
    pub episodes: usize,
}

impl fmt::Display for FetchedShow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} episode(s)", self.episodes)
    }
}

#[derive(Debug)]
pub struct Timeline {
    pub points: Vec<TimelinePoint>,
    pub excluded: Vec<Exclusion>,
    /// Set when the plot dates could not be fully separated
    pub unresolved: Option<DedupError>,
}

/// Fetches the `count` top rated shows and draws all their episodes on a
/// single timeline.
pub fn chart_top_shows(
    client: &TmdbClient,
    count: usize,
    output: &Path,
    style: &ChartStyle,
    today: NaiveDate,
) -> Result<(PathBuf, BatchReport<FetchedShow>)> {
    let shows = client.top_rated(count)?;
    if shows.is_empty() {
        bail!("TMDB returned no top rated shows");
    }

    let (series, report) = fetch_all(client, &shows);
    let timeline = build_timeline(&series);
    log_exclusions("Top shows", &timeline.excluded);
    if let Some(e) = &timeline.unresolved {
        log::warn!("{e}; some episodes will overlap on the chart");
    }

    fs::create_dir_all(output)?;
    let path = chart_path(output, CHART_NAME);
    let chart = TimelineChart {
        points: &timeline.points,
        show_count: shows.len(),
        as_of: today,
    };
    save_timeline(&path, &chart, style)?;
    println!("Saved {}", path.display());

    Ok((path, report))
}

/// Fetches every show, keeping whatever succeeded.
pub fn fetch_all(
    source: &dyn EpisodeSource,
    shows: &[ShowRef],
) -> (Vec<SeriesEpisodes>, BatchReport<FetchedShow>) {
    let mut series = Vec::with_capacity(shows.len());
    let mut report = BatchReport::default();

    for show in shows {
        println!("{}", show.title);
        match source.fetch_episodes(show) {
            Ok(episodes) => {
                let count = episodes.seasons.values().map(|s| s.len()).sum();
                report.record(&show.title, Ok(FetchedShow { episodes: count }));
                series.push(episodes);
            }
            Err(e) => {
                log::warn!("Could not get episodes for {}: {e:#}", show.title);
                report.record(&show.title, Err(ShowError::Fetch(e)));
            }
        }
    }

    (series, report)
}

/// Flattens every show, keeps episodes with an air date and a rating, and
/// spreads same-day episodes of a show over consecutive days.
pub fn build_timeline(series: &[SeriesEpisodes]) -> Timeline {
    let mut records: Vec<EpisodeRecord> = series
        .iter()
        .flat_map(|s| flatten(s.show.short_title(), &s.seasons))
        .collect();
    sort_for_timeline(&mut records);

    let validated = require(records, &[Field::AirDate, Field::Rating]);
    let mut points = timeline_points(&validated.kept);

    let unresolved = match resolve_plot_dates(&mut points) {
        Ok(passes) => {
            log::debug!("Plot dates settled after {passes} pass(es)");
            None
        }
        Err(e) => Some(e),
    };
    for point in points.iter().filter(|p| p.plot_date != p.air_date) {
        log::debug!(
            "{} S{:02}E{:02} aired {} drawn at {}",
            point.show,
            point.season,
            point.episode,
            point.air_date,
            point.plot_date
        );
    }

    Timeline {
        points,
        excluded: validated.excluded,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tmdb::{EpisodePayload, SeasonMap};

    fn payload(season: u32, episode: u32, date: Option<&str>, rating: Option<f64>) -> EpisodePayload {
        EpisodePayload {
            season_number: season,
            episode_number: episode,
            name: Some(format!("{season}x{episode}")),
            air_date: date.map(str::to_string),
            vote_average: rating,
            vote_count: if rating.is_some() { 5 } else { 0 },
            show_id: Some(1),
        }
    }

    fn series(id: u64, title: &str, payloads: Vec<EpisodePayload>) -> SeriesEpisodes {
        let mut seasons = SeasonMap::new();
        for p in payloads {
            seasons
                .entry(p.season_number)
                .or_default()
                .insert(p.episode_number, p);
        }
        SeriesEpisodes {
            show: ShowRef::new(id, title),
            seasons,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_build_timeline_spreads_double_premiere() {
        let all = vec![series(
            1,
            "A (2021)",
            vec![
                payload(1, 1, Some("2021-01-01"), Some(8.0)),
                payload(1, 2, Some("2021-01-01"), Some(8.5)),
                payload(1, 3, Some("2021-01-02"), Some(9.0)),
            ],
        )];

        let timeline = build_timeline(&all);

        assert!(timeline.unresolved.is_none());
        let placed: Vec<(u32, NaiveDate)> = timeline
            .points
            .iter()
            .map(|p| (p.episode, p.plot_date))
            .collect();
        assert_eq!(
            placed,
            vec![
                (1, date("2021-01-01")),
                (2, date("2021-01-02")),
                (3, date("2021-01-03")),
            ]
        );
        assert!(timeline.points.iter().all(|p| p.show == "A"));
    }

    #[test]
    fn test_build_timeline_leaves_other_shows_alone() {
        let all = vec![
            series(1, "B", vec![
                payload(1, 1, Some("2021-05-05"), Some(7.0)),
                payload(1, 2, Some("2021-05-05"), Some(7.0)),
            ]),
            series(2, "C", vec![
                payload(1, 1, Some("2021-05-05"), Some(6.0)),
                payload(1, 2, Some("2021-05-05"), Some(6.0)),
            ]),
        ];

        let timeline = build_timeline(&all);

        let placed: Vec<(&str, u32, NaiveDate)> = timeline
            .points
            .iter()
            .map(|p| (p.show.as_str(), p.episode, p.plot_date))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("B", 1, date("2021-05-05")),
                ("B", 2, date("2021-05-06")),
                ("C", 1, date("2021-05-05")),
                ("C", 2, date("2021-05-06")),
            ]
        );
    }

    #[test]
    fn test_build_timeline_reports_exclusions() {
        let all = vec![series(
            1,
            "D",
            vec![
                payload(1, 1, Some("2020-01-01"), Some(7.0)),
                payload(1, 2, None, Some(7.0)),
                payload(1, 3, Some("2020-01-15"), None),
            ],
        )];

        let timeline = build_timeline(&all);

        assert_eq!(timeline.points.len(), 1);
        let missing: Vec<(u32, Field)> = timeline
            .excluded
            .iter()
            .map(|e| (e.episode, e.missing))
            .collect();
        assert_eq!(missing, vec![(3, Field::Rating), (2, Field::AirDate)]);
    }

    struct FlakySource;

    impl EpisodeSource for FlakySource {
        fn fetch_episodes(&self, show: &ShowRef) -> Result<SeriesEpisodes> {
            if show.id == 2 {
                bail!("HTTP 500");
            }
            Ok(series(
                show.id,
                &show.title,
                vec![payload(1, 1, Some("2020-01-01"), Some(7.0))],
            ))
        }
    }

    #[test]
    fn test_fetch_all_skips_failures() {
        let shows = vec![
            ShowRef::new(1, "One"),
            ShowRef::new(2, "Two"),
            ShowRef::new(3, "Three"),
        ];

        let (fetched, report) = fetch_all(&FlakySource, &shows);

        assert_eq!(fetched.len(), 2);
        assert_eq!(report.succeeded(), 2);
        let failed: Vec<&str> = report.failures().map(|(show, _)| show).collect();
        assert_eq!(failed, vec!["Two"]);
        assert_eq!(report.outcomes[0].result.as_ref().unwrap().episodes, 1);
    }
}
