mod cli;
mod config;
mod domain;
mod infra;
mod render;
mod table;
mod workflows;

use anyhow::{bail, Result};
use chrono::Local;
use clap::Parser;

use cli::{Cli, Command};
use config::Settings;
use domain::models::ShowRef;
use infra::tmdb::TmdbClient;
use workflows::select::search_and_select_show;
use workflows::{summaries, top_shows};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let client = TmdbClient::new(settings.tmdb_api_key()?)?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Summaries {
            series_file,
            show_id,
            show,
            output,
        } => {
            let shows = match (show, show_id) {
                (Some(name), None) => vec![search_and_select_show(&client, &name)?],
                (None, Some(id)) => vec![ShowRef::new(id, client.get_series_name(id)?)],
                (None, None) => config::load_tracked_series(&series_file)?,
                (Some(_), Some(_)) => bail!("Cannot specify both --show and --show-id"),
            };
            if shows.is_empty() {
                bail!("No series to summarize in {}", series_file.display());
            }

            let report = summaries::summarize_all(&client, &shows, &output, &settings.style, today)?;
            print!("\n{report}");
        }
        Command::Top { count, output } => {
            let (_, report) =
                top_shows::chart_top_shows(&client, count, &output, &settings.style, today)?;
            for (show, e) in report.failures() {
                eprintln!("Skipped {show}: {e}");
            }
        }
    }

    Ok(())
}
