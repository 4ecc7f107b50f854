use std::path::Path;

use chrono::Local;
use reqwest::Client;
use tokio::{
    fs::File,
    io::AsyncWriteExt,
    sync::mpsc,
    task::{spawn_blocking, JoinSet},
};

use crate::config::{Config, Mode};
use crate::record::{header_line, MatchRow};
use crate::request::{build_client, request_page_html};
use crate::walk::extract_season;
use crate::{info_time, Error, Result, LINES_CHANNEL_CAPACITY};

/// What a run did, page by page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_ok: usize,
    pub pages_failed: usize,
    pub rows: usize,
}

impl RunSummary {
    fn record(&mut self, url: &str, outcome: Result<usize>) {
        match outcome {
            Ok(rows) => {
                tracing::debug!(url, rows, "page done");
                self.pages_ok += 1;
                self.rows += rows;
            }
            Err(e) if e.is_structure() => {
                tracing::warn!(url, error = %e, "unexpected page structure, page skipped");
                self.pages_failed += 1;
            }
            Err(e) => {
                tracing::error!(url, error = %e, "couldn't scrape page");
                self.pages_failed += 1;
            }
        }
    }
}

/// Reads the URL list, one per line. Blank lines are ignored.
pub async fn load_urls(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Runs a whole scrape as configured: URL list in, CSV out.
pub async fn process_urls(config: &Config) -> Result<RunSummary> {
    let urls = load_urls(&config.urls).await?;
    info_time!("Loaded {} url(s) from {}", urls.len(), config.urls.display());
    let client = build_client(&config.user_agent)?;
    scrape_urls(client, urls, &config.output, config.mode).await
}

/// Writes the header to `output`, then the matches of every page.
/// A page that fails is logged and left out; only output errors end the run.
pub async fn scrape_urls(
    client: Client,
    urls: Vec<String>,
    output: &Path,
    mode: Mode,
) -> Result<RunSummary> {
    let start_time = Local::now();
    let mut file = File::create(output).await?;
    file.write_all(format!("{}\n", header_line()).as_bytes()).await?;

    let (lines_tx, lines_rx) = mpsc::channel(LINES_CHANNEL_CAPACITY);
    let writer_handle = tokio::spawn(async move { write_lines(file, lines_rx).await });

    let summary = match mode {
        Mode::Sequential => process_sequential(client, urls, lines_tx).await,
        Mode::Concurrent => process_concurrent(client, urls, lines_tx).await?,
    };

    let written = writer_handle.await??;
    info_time!(
        start_time,
        "Wrote {} line(s) to {}, {} page(s) failed",
        written,
        output.display(),
        summary.pages_failed
    );

    Ok(summary)
}

async fn process_sequential(
    client: Client,
    urls: Vec<String>,
    lines_tx: mpsc::Sender<Vec<String>>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for url in urls {
        let outcome = process_page(client.clone(), &url, lines_tx.clone()).await;
        summary.record(&url, outcome);
    }
    summary
}

async fn process_concurrent(
    client: Client,
    urls: Vec<String>,
    lines_tx: mpsc::Sender<Vec<String>>,
) -> Result<RunSummary> {
    let mut task_set = JoinSet::new();
    for url in urls {
        task_set.spawn({
            // Client uses Arc so we can clone cheaply
            let client = client.clone();
            let lines_tx = lines_tx.clone();

            async move {
                let outcome = process_page(client, &url, lines_tx).await;
                (url, outcome)
            }
        });
    }
    // Only the tasks keep the channel open now.
    drop(lines_tx);

    let mut summary = RunSummary::default();
    while let Some(task) = task_set.join_next().await {
        let (url, outcome) = task?;
        summary.record(&url, outcome);
    }
    Ok(summary)
}

/// Fetches one page, reads its matches and hands the lines to the writer as a
/// single batch, so a page's lines stay together and in document order.
async fn process_page(
    client: Client,
    url: &str,
    lines_tx: mpsc::Sender<Vec<String>>,
) -> Result<usize> {
    let html = request_page_html(client, url).await?;

    // `Html` isn't `Send`, parse and walk it away from the runtime.
    let rows = spawn_blocking({
        let url = url.to_string();
        move || extract_season(&url, &html)
    })
    .await??;

    let lines: Vec<String> = rows.iter().map(MatchRow::to_line).collect();
    let count = lines.len();
    if count > 0 {
        lines_tx.send(lines).await?;
    }
    Ok(count)
}

/// The only owner of the output file. Appends every batch it receives until
/// all senders are gone, returns how many lines it wrote.
async fn write_lines(mut file: File, mut lines_rx: mpsc::Receiver<Vec<String>>) -> Result<usize> {
    let mut written = 0;
    while let Some(lines) = lines_rx.recv().await {
        let mut batch = lines.join("\n");
        batch.push('\n');
        file.write_all(batch.as_bytes()).await?;
        written += lines.len();
    }
    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn urls_skip_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        tokio::fs::write(&path, "https://a/2019\n\n  https://a/2020  \n")
            .await
            .unwrap();

        let urls = load_urls(&path).await.unwrap();
        assert_eq!(urls, vec!["https://a/2019", "https://a/2020"]);
    }

    #[tokio::test]
    async fn missing_url_list_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_urls(&dir.path().join("nope.txt")).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn writer_keeps_batches_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let file = File::create(&path).await.unwrap();
        let (tx, rx) = mpsc::channel(2);
        let handle = tokio::spawn(write_lines(file, rx));

        tx.send(vec!["a1".into(), "a2".into()]).await.unwrap();
        tx.send(vec!["b1".into()]).await.unwrap();
        drop(tx);

        assert_eq!(handle.await.unwrap().unwrap(), 3);
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "a1\na2\nb1\n");
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut summary = RunSummary::default();
        summary.record("a", Ok(10));
        summary.record("b", Err(Error::MissingSentinel));
        summary.record("c", Err(Error::RuntimeSendError));
        assert_eq!(
            summary,
            RunSummary {
                pages_ok: 1,
                pages_failed: 2,
                rows: 10
            }
        );
    }
}
