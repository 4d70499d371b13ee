use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "series-ratings")]
#[command(about = "Chart episode ratings of TV series using TMDB data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Draw a season/episode rating summary for each tracked series
    Summaries {
        /// TOML file listing the series to summarize
        #[arg(long, default_value = "tracked_series.toml")]
        series_file: PathBuf,

        /// Summarize only this TMDB series ID
        #[arg(long, conflicts_with = "show")]
        show_id: Option<u64>,

        /// Summarize only the series matching this name
        #[arg(long)]
        show: Option<String>,

        /// Directory the charts are written to
        #[arg(short, long, default_value = "Graphs/Series Summaries")]
        output: PathBuf,
    },

    /// Draw every episode of the top rated series on one timeline
    Top {
        /// Number of series to include
        #[arg(short = 'n', long, default_value_t = 100)]
        count: usize,

        /// Directory the chart is written to
        #[arg(short, long, default_value = "Graphs")]
        output: PathBuf,
    },
}
