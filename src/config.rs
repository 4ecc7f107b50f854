//! Command line configuration. Every flag can also come from the environment.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{DEFAULT_OUTPUT_PATH, DEFAULT_URLS_PATH, DEFAULT_USER_AGENT};

/// How the season pages get fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// One page at a time.
    Sequential,
    /// All pages at once, one task per page.
    Concurrent,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// File with one season page URL per line
    #[arg(short, long, env = "BRASILEIRAO_URLS", default_value = DEFAULT_URLS_PATH)]
    pub urls: PathBuf,

    /// CSV file to write, truncated on every run
    #[arg(short, long, env = "BRASILEIRAO_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    #[arg(short, long, env = "BRASILEIRAO_MODE", value_enum, default_value_t = Mode::Concurrent)]
    pub mode: Mode,

    /// User-Agent sent with every request
    #[arg(long, env = "BRASILEIRAO_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}
