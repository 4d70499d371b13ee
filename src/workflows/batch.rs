use std::fmt;
use thiserror::Error;

/// Why a single show was skipped.
#[derive(Debug, Error)]
pub enum ShowError {
    #[error("could not fetch episodes: {0:#}")]
    Fetch(anyhow::Error),
    #[error("no rated episodes")]
    NoRatedEpisodes,
    #[error("could not draw chart: {0:#}")]
    Render(anyhow::Error),
}

#[derive(Debug)]
pub struct ShowOutcome<T> {
    pub show: String,
    pub result: Result<T, ShowError>,
}

/// Per-show results of a batch run. One failing show never stops the rest.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub outcomes: Vec<ShowOutcome<T>>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn record(&mut self, show: &str, result: Result<T, ShowError>) {
        self.outcomes.push(ShowOutcome {
            show: show.to_string(),
            result,
        });
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ShowError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.show.as_str(), e)))
    }
}

impl<T: fmt::Display> fmt::Display for BatchReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} succeeded, {} failed",
            self.succeeded(),
            self.failed()
        )?;
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(done) => writeln!(f, "  ok     {}: {done}", outcome.show)?,
                Err(e) => writeln!(f, "  failed {}: {e}", outcome.show)?,
            }
        }
        Ok(())
    }
}
