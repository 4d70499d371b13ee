use anyhow::Result;

use crate::domain::models::ShowRef;
use tmdb::SeriesEpisodes;

pub mod tmdb;

/// Anything that can produce the nested season/episode data for a show.
pub trait EpisodeSource {
    fn fetch_episodes(&self, show: &ShowRef) -> Result<SeriesEpisodes>;
}
