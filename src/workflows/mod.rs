pub mod batch;
pub mod output;
pub mod select;
pub mod summaries;
pub mod top_shows;
