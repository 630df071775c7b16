//! Raw tabular input: the CSV record model, parsing, and the asset fetch.

mod fetch;
mod parse;
mod row;

pub use fetch::fetch_text;
pub use parse::parse_rows;
pub use row::Row;

use thiserror::Error;

use crate::graph::{BuildOptions, SystemGraph, build};

/// Path of the dataset shipped alongside the page.
pub const DATA_URL: &str = "llw_system_analysis.csv";

/// Failures while loading the shipped dataset. All of them degrade to an
/// unrendered page; none are fatal.
#[derive(Debug, Error)]
pub enum DataError {
	#[error("fetch failed: {0}")]
	Fetch(String),
	#[error("server returned HTTP {0}")]
	Status(u16),
	#[error("csv parse failed: {0}")]
	Csv(#[from] csv::Error),
}

/// Fetch, parse, and build the renderable graph in one pass.
pub async fn load_graph(options: &BuildOptions) -> Result<SystemGraph, DataError> {
	let text = fetch_text(DATA_URL).await?;
	let rows = parse_rows(&text)?;
	Ok(build(&rows, options))
}
