use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

/// A show as known to the metadata provider.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ShowRef {
    #[serde(rename = "series_id")]
    pub id: u64,
    #[serde(rename = "series_name")]
    pub title: String,
}

impl ShowRef {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Title with any trailing parenthetical (usually a year) removed.
    pub fn short_title(&self) -> &str {
        short_title(&self.title)
    }
}

pub fn short_title(title: &str) -> &str {
    title.split(" (").next().unwrap_or(title).trim()
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub show: String,
    pub season: u32,
    pub episode: u32,
    pub rating: Option<f64>,
    pub air_date: Option<NaiveDate>,
    pub title: String,
}

impl EpisodeRecord {
    /// Sortable composite key, `season * 100 + episode`.
    pub fn episode_key(&self) -> u64 {
        u64::from(self.season) * 100 + u64::from(self.episode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Rating,
    AirDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Rating => write!(f, "rating"),
            Field::AirDate => write!(f, "air date"),
        }
    }
}

/// A row removed before charting, and the field it was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub show: String,
    pub season: u32,
    pub episode: u32,
    pub missing: Field,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} S{:02}E{:02}: missing {}",
            self.show, self.season, self.episode, self.missing
        )
    }
}

/// An episode positioned on the timeline. `plot_date` starts at `air_date`
/// and is only ever moved forward.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    pub show: String,
    pub season: u32,
    pub episode: u32,
    pub rating: f64,
    pub air_date: NaiveDate,
    pub plot_date: NaiveDate,
}
