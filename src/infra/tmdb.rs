use serde::Deserialize;
use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};

use super::EpisodeSource;
use crate::domain::models::ShowRef;

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
const TOP_RATED_PAGE_SIZE: usize = 20;

/// season number -> episode number -> episode payload
pub type SeasonMap = BTreeMap<u32, BTreeMap<u32, EpisodePayload>>;

#[derive(Debug, Clone)]
pub struct SeriesEpisodes {
    pub show: ShowRef,
    pub seasons: SeasonMap,
}

#[derive(Debug)]
pub struct TmdbClient {
    credential: Credential,
    http: reqwest::blocking::Client,
}

#[derive(Debug)]
enum Credential {
    /// v3 API key, sent as the `api_key` query parameter
    ApiKey(String),
    /// v4 read access token, sent as a bearer token
    Bearer(String),
}

#[derive(Debug, Deserialize)]
struct PagedResponse {
    page: u32,
    total_pages: u32,
    results: Vec<ShowSummary>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShowSummary {
    pub id: u64,
    pub name: String,
    pub first_air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeriesDetails {
    name: String,
    #[serde(default)]
    seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Deserialize)]
struct SeasonSummary {
    season_number: u32,
    #[serde(default)]
    episode_count: u32,
}

#[derive(Debug, Deserialize)]
struct SeasonDetails {
    #[serde(default)]
    episodes: Vec<EpisodePayload>,
}

/// One episode as the provider returns it.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EpisodePayload {
    pub season_number: u32,
    pub episode_number: u32,
    pub name: Option<String>,
    pub air_date: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: u32,
    /// Link back to the parent show.
    pub show_id: Option<u64>,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Result<Self> {
        // v4 tokens are JWTs
        let credential = if api_key.starts_with("eyJ") {
            Credential::Bearer(api_key)
        } else {
            Credential::ApiKey(api_key)
        };
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("series-ratings/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { credential, http })
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{}", TMDB_API_BASE, path);
        log::debug!("GET {url} {query:?}");

        let mut request = self.http.get(&url).query(query);
        request = match &self.credential {
            Credential::ApiKey(key) => request.query(&[("api_key", key)]),
            Credential::Bearer(token) => request.header("Authorization", format!("Bearer {token}")),
        };

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            bail!("TMDB request {path} failed: HTTP {status}");
        }
        Ok(response.text()?)
    }

    pub fn search_series(&self, query: &str) -> Result<Vec<ShowSummary>> {
        let body = self.get("/search/tv", &[("query", query.to_string())])?;
        let search_resp: PagedResponse = serde_json::from_str(&body)?;
        Ok(search_resp.results)
    }

    pub fn get_series_name(&self, series_id: u64) -> Result<String> {
        let body = self.get(&format!("/tv/{series_id}"), &[])?;
        let details: SeriesDetails = serde_json::from_str(&body)?;
        Ok(details.name)
    }

    /// Highest rated shows, best first, truncated to `count`.
    pub fn top_rated(&self, count: usize) -> Result<Vec<ShowRef>> {
        let mut shows = Vec::with_capacity(count);
        let mut page = 1;

        while shows.len() < count {
            let body = self.get("/tv/top_rated", &[("page", page.to_string())])?;
            let page_resp: PagedResponse = serde_json::from_str(&body)?;
            let done = page_resp.results.len() < TOP_RATED_PAGE_SIZE
                || page_resp.page >= page_resp.total_pages;

            shows.extend(
                page_resp
                    .results
                    .into_iter()
                    .map(|show| ShowRef::new(show.id, show.name)),
            );

            if done {
                break;
            }
            page += 1;
        }

        shows.truncate(count);
        Ok(shows)
    }

    fn get_season(&self, series_id: u64, season_number: u32) -> Result<Vec<EpisodePayload>> {
        let body = self.get(&format!("/tv/{series_id}/season/{season_number}"), &[])?;
        let season: SeasonDetails = serde_json::from_str(&body)
            .with_context(|| format!("Malformed season {season_number} of series {series_id}"))?;
        Ok(season.episodes)
    }
}

impl EpisodeSource for TmdbClient {
    fn fetch_episodes(&self, show: &ShowRef) -> Result<SeriesEpisodes> {
        let body = self.get(&format!("/tv/{}", show.id), &[])?;
        let details: SeriesDetails = serde_json::from_str(&body)?;

        let mut seasons = SeasonMap::new();
        for summary in details.seasons.iter().filter(|s| s.episode_count > 0) {
            for episode in self.get_season(show.id, summary.season_number)? {
                seasons
                    .entry(episode.season_number)
                    .or_default()
                    .insert(episode.episode_number, episode);
            }
        }

        log::debug!(
            "Fetched {} season(s) for {} ({})",
            seasons.len(),
            details.name,
            show.id
        );

        Ok(SeriesEpisodes {
            show: show.clone(),
            seasons,
        })
    }
}
