//! Brazilian championship scraper.
//!
//! Reads the Wikipedia (pt) page of every season listed in a URL file and writes
//! one CSV line per match: date, teams, score, stadium, kickoff, goal minutes,
//! audience and income.

mod error;
mod macros;
mod request;

pub mod config;
pub mod extract;
pub mod logging;
pub mod process;
pub mod record;
pub mod walk;

pub use error::{Error, Result};

pub const DEFAULT_URLS_PATH: &str = "urls.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "brazilian_championship.csv";
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Headline word marking the round sections, matched lowercased.
const ROUND_KEYWORD: &str = "rodada";
/// The "See also" section, end of the match listing.
const SENTINEL: &str = "Ver também";
const STATE_SUFFIX: &str = " (estado)";
/// Pages in flight towards the writer.
const LINES_CHANNEL_CAPACITY: usize = 64;
