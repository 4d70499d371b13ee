use anyhow::Result;
use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::batch::{BatchReport, ShowError};
use super::output::chart_path;
use crate::domain::models::{Field, ShowRef};
use crate::infra::EpisodeSource;
use crate::render::style::ChartStyle;
use crate::render::summary::{save_summary, SummaryChart};
use crate::table::flatten::flatten;
use crate::table::matrix::RatingMatrix;
use crate::table::validate::{log_exclusions, require};
use crate::table::{best, sort_by_episode_key, worst};

#[derive(Debug)]
pub struct SavedSummary {
    pub path: PathBuf,
    /// Episodes left off the chart for lack of a rating
    pub excluded: usize,
}

impl fmt::Display for SavedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if self.excluded > 0 {
            write!(f, " ({} unrated episode(s) left out)", self.excluded)?;
        }
        Ok(())
    }
}

/// Draws a summary chart per show into `output`.
pub fn summarize_all(
    source: &dyn EpisodeSource,
    shows: &[ShowRef],
    output: &Path,
    style: &ChartStyle,
    today: NaiveDate,
) -> Result<BatchReport<SavedSummary>> {
    fs::create_dir_all(output)?;

    let mut report = BatchReport::default();
    for show in shows {
        println!("{}", show.title);
        let result = summarize(source, show, output, style, today);
        if let Err(e) = &result {
            log::warn!("Skipping {}: {e}", show.title);
        }
        report.record(&show.title, result);
    }
    Ok(report)
}

fn summarize(
    source: &dyn EpisodeSource,
    show: &ShowRef,
    output: &Path,
    style: &ChartStyle,
    today: NaiveDate,
) -> Result<SavedSummary, ShowError> {
    let episodes = source.fetch_episodes(show).map_err(ShowError::Fetch)?;

    let mut records = flatten(&show.title, &episodes.seasons);
    sort_by_episode_key(&mut records);
    let validated = require(records, &[Field::Rating]);
    log_exclusions(&show.title, &validated.excluded);

    let (Some(best_episode), Some(worst_episode)) = (best(&validated.kept), worst(&validated.kept))
    else {
        return Err(ShowError::NoRatedEpisodes);
    };
    let matrix = RatingMatrix::pivot(&validated.kept);

    let path = chart_path(output, &show.title);
    let chart = SummaryChart {
        title: &show.title,
        matrix: &matrix,
        best: best_episode,
        worst: worst_episode,
        obtained: today,
    };
    save_summary(&path, &chart, style).map_err(ShowError::Render)?;
    println!("Saved {}", path.display());

    Ok(SavedSummary {
        path,
        excluded: validated.excluded.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tmdb::{EpisodePayload, SeasonMap, SeriesEpisodes};
    use anyhow::bail;
    use tempfile::TempDir;

    /// Serves canned seasons; unknown shows fail like a 404.
    struct FakeSource {
        seasons: Vec<(u64, SeasonMap)>,
    }

    impl EpisodeSource for FakeSource {
        fn fetch_episodes(&self, show: &ShowRef) -> Result<SeriesEpisodes> {
            match self.seasons.iter().find(|(id, _)| *id == show.id) {
                Some((_, seasons)) => Ok(SeriesEpisodes {
                    show: show.clone(),
                    seasons: seasons.clone(),
                }),
                None => bail!("TMDB request /tv/{} failed: HTTP 404 Not Found", show.id),
            }
        }
    }

    fn unrated_season() -> SeasonMap {
        let mut seasons = SeasonMap::new();
        seasons.entry(1).or_default().insert(
            1,
            EpisodePayload {
                season_number: 1,
                episode_number: 1,
                name: Some("Pilot".to_string()),
                air_date: Some("2030-01-01".to_string()),
                vote_average: Some(0.0),
                vote_count: 0,
                show_id: Some(7),
            },
        );
        seasons
    }

    #[test]
    fn test_failures_are_reported_and_batch_continues() {
        let source = FakeSource {
            seasons: vec![(7, unrated_season())],
        };
        let shows = vec![ShowRef::new(404, "Missing"), ShowRef::new(7, "Unaired")];
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("Series Summaries");

        let report = summarize_all(
            &source,
            &shows,
            &output,
            &ChartStyle::default(),
            NaiveDate::from_ymd_opt(2021, 6, 27).unwrap(),
        )
        .unwrap();

        assert!(output.is_dir());
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.failed(), 2);
        assert!(matches!(
            report.outcomes[0].result,
            Err(ShowError::Fetch(_))
        ));
        assert!(matches!(
            report.outcomes[1].result,
            Err(ShowError::NoRatedEpisodes)
        ));
        assert!(report.to_string().contains("HTTP 404"));
    }

    #[test]
    fn test_saved_summary_display() {
        let saved = SavedSummary {
            path: PathBuf::from("Graphs/Lost.png"),
            excluded: 2,
        };
        assert_eq!(
            saved.to_string(),
            "Graphs/Lost.png (2 unrated episode(s) left out)"
        );
    }
}
