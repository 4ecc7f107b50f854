use thiserror::Error;
use tokio::sync::mpsc;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("Regex Error: {0}")]
    Regex(#[from] regex::Error),

    // -- Page structure
    #[error("No round heading ('rodada') found in an h2/h3 headline.")]
    NoRoundHeading,
    #[error("No 4 digit year found in the page title: {0:?}")]
    MissingYear(String),
    #[error("Ran out of siblings before reaching the 'Ver também' section.")]
    MissingSentinel,
    #[error("A match fragment needs a header and a details row, found {0} row(s).")]
    RowCount(usize),
    #[error("The {row} row should have {expected} cells, found {found}.")]
    CellCount {
        row: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Missing element '{selector}' #{index} in {context}.")]
    MissingElement {
        context: &'static str,
        selector: &'static str,
        index: usize,
    },
    #[error("Missing attribute '{attr}' on an anchor in {context}.")]
    MissingAttribute {
        context: &'static str,
        attr: &'static str,
    },
    #[error("Round heading has {0} span(s), can't pick its label.")]
    RoundLabel(usize),

    // -- Transport
    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("GET {url} answered with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    // -- Runtime
    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
    #[error("Couldn't send a page through a channel.")]
    RuntimeSendError,
}

impl Error {
    /// True for errors caused by a page that doesn't follow the expected layout.
    pub fn is_structure(&self) -> bool {
        matches!(
            self,
            Error::NoRoundHeading
                | Error::MissingYear(_)
                | Error::MissingSentinel
                | Error::RowCount(_)
                | Error::CellCount { .. }
                | Error::MissingElement { .. }
                | Error::MissingAttribute { .. }
                | Error::RoundLabel(_)
        )
    }
}

impl From<mpsc::error::SendError<Vec<String>>> for Error {
    fn from(_value: mpsc::error::SendError<Vec<String>>) -> Self {
        Error::RuntimeSendError
    }
}
