//! Walks the elements following the first round heading of a season page.
//!
//! The page has no container per round: a round is an `h3` heading followed by
//! the match tables of that round, all siblings, until the "Ver também"
//! section closes the listing. The walk is a small state machine fed with
//! those siblings in document order.

use scraper::{ElementRef, Html};

use crate::extract::{element_text, extract_year, find_round_heading, round_header_text};
use crate::record::{assemble_match, MatchRecord, MatchRow};
use crate::{Error, Result, SENTINEL};

#[derive(Debug, Clone, Copy)]
pub enum WalkState<'a> {
    BeforeFirstRound,
    InRound {
        heading: ElementRef<'a>,
        previous: ElementRef<'a>,
    },
    Done,
}

impl<'a> WalkState<'a> {
    /// Enters the first round. Only meaningful before any round was seen.
    pub fn enter(self, heading: ElementRef<'a>) -> Self {
        match self {
            WalkState::BeforeFirstRound => WalkState::InRound {
                heading,
                previous: heading,
            },
            _ => self,
        }
    }

    /// Feeds the next sibling. Returns the new state and the match read from
    /// `node`, if any. The match belongs to the heading of the returned state.
    pub fn step(self, node: ElementRef<'a>) -> Result<(Self, Option<MatchRecord>)> {
        let WalkState::InRound { heading, previous } = self else {
            return Ok((self, None));
        };

        if element_text(node).contains(SENTINEL) {
            return Ok((WalkState::Done, None));
        }

        let next = |heading| WalkState::InRound {
            heading,
            previous: node,
        };

        if node.value().name() == "h3" {
            return Ok((next(node), None));
        }
        // Whatever trails a table belongs to it.
        if previous.value().name() == "table" {
            return Ok((next(heading), None));
        }

        Ok((next(heading), assemble_match(node)?))
    }

    pub fn heading(&self) -> Option<ElementRef<'a>> {
        match self {
            WalkState::InRound { heading, .. } => Some(*heading),
            _ => None,
        }
    }
}

/// A fetched season page.
pub struct SeasonPage {
    pub url: String,
    pub year: String,
    document: Html,
}

impl SeasonPage {
    pub fn parse(url: impl Into<String>, html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let year = extract_year(&document)?;
        Ok(SeasonPage {
            url: url.into(),
            year,
            document,
        })
    }

    /// Every match of the page in document order.
    /// Any structure error discards the whole page.
    pub fn rows(&self) -> Result<Vec<MatchRow>> {
        let first_heading = find_round_heading(&self.document)?;
        tracing::debug!(url = %self.url, year = %self.year, "walking season page");
        let siblings = first_heading.next_siblings().filter_map(ElementRef::wrap);

        let mut state = WalkState::BeforeFirstRound.enter(first_heading);

        let mut rows = Vec::new();
        for node in siblings {
            let (next, record) = state.step(node)?;
            state = next;
            if let WalkState::Done = state {
                return Ok(rows);
            }

            let (Some(record), Some(heading)) = (record, state.heading()) else {
                continue;
            };
            let round = round_header_text(heading)?;
            tracing::info!(
                "{}, {}, {}, {}, {}, {}",
                record.day_month,
                self.year,
                round,
                record.home.nick,
                record.result,
                record.visitor.nick
            );
            rows.push(MatchRow {
                year: self.year.clone(),
                round,
                record,
            });
        }

        Err(Error::MissingSentinel)
    }
}

/// Parses a page and reads all of its matches.
pub fn extract_season(url: &str, html: &str) -> Result<Vec<MatchRow>> {
    SeasonPage::parse(url, html)?.rows()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATCH: &str = r#"<table>
        <tr>
            <td>27/4</td>
            <td><a href="/wiki/A" title="Clube A">A</a><a href="/wiki/SP" title="São Paulo (estado)"></a></td>
            <td>1–0</td>
            <td><a href="/wiki/RJ" title="Rio de Janeiro (estado)"></a><a href="/wiki/B" title="Clube B">B</a></td>
            <td><a href="/wiki/E" title="Estádio E">E</a> <a href="/wiki/C">Cidade</a></td>
        </tr>
        <tr><td>16h00</td><td><span>10'</span></td><td></td><td></td><td></td></tr>
    </table>"#;

    fn page(body: &str) -> String {
        format!(
            r#"<html><body><h1 id="firstHeading">Campeonato Brasileiro de Futebol de 2019</h1>
            <div id="content">{body}</div></body></html>"#
        )
    }

    const ROUND_1: &str =
        r#"<h2><span id="x"></span><span class="mw-headline">1ª rodada</span></h2>"#;
    const ROUND_2: &str = r#"<h3><span id="y"></span><span class="mw-headline">2ª rodada</span></h3>"#;
    const SEE_ALSO: &str = r#"<h2><span class="mw-headline">Ver também</span></h2>"#;

    fn rounds(rows: &[MatchRow]) -> Vec<&str> {
        rows.iter().map(|r| r.round.as_str()).collect()
    }

    #[test]
    fn matches_are_tagged_with_their_round() {
        let html = page(&format!(
            "{ROUND_1}{MATCH}<p>Árbitro</p>{MATCH}{ROUND_2}{MATCH}{SEE_ALSO}{MATCH}"
        ));
        let rows = extract_season("test", &html).unwrap();
        assert_eq!(rounds(&rows), vec!["1ª rodada", "1ª rodada", "2ª rodada"]);
        assert!(rows.iter().all(|r| r.year == "2019"));
        assert_eq!(rows[0].record.home.nick, "A");
        assert_eq!(rows[0].record.visitor.state, "Rio de Janeiro");
    }

    #[test]
    fn element_right_after_a_table_is_skipped() {
        let html = page(&format!("{ROUND_1}{MATCH}{MATCH}{MATCH}{SEE_ALSO}"));
        assert_eq!(extract_season("test", &html).unwrap().len(), 1);

        let html = page(&format!("{ROUND_1}{MATCH}{MATCH}<p></p>{MATCH}{SEE_ALSO}"));
        assert_eq!(extract_season("test", &html).unwrap().len(), 2);
    }

    #[test]
    fn nothing_after_the_sentinel_is_read() {
        let html = page(&format!("{ROUND_1}{SEE_ALSO}<table><tr><td>x</td></tr></table>"));
        assert!(extract_season("test", &html).unwrap().is_empty());
    }

    #[test]
    fn missing_sentinel_is_an_error() {
        let html = page(&format!("{ROUND_1}{MATCH}"));
        assert!(matches!(
            extract_season("test", &html),
            Err(Error::MissingSentinel)
        ));
    }

    #[test]
    fn malformed_table_fails_the_page() {
        let html = page(&format!(
            "{ROUND_1}{MATCH}<p></p><table><tr><td>x</td></tr></table>{SEE_ALSO}"
        ));
        assert!(matches!(
            extract_season("test", &html),
            Err(Error::RowCount(1))
        ));
    }

    #[test]
    fn page_without_rounds() {
        let html = page(&format!("<h2><span class=\"mw-headline\">Tabela</span></h2>{SEE_ALSO}"));
        assert!(matches!(
            extract_season("test", &html),
            Err(Error::NoRoundHeading)
        ));
    }

    #[test]
    fn page_without_year() {
        let html = format!(r#"<h1 id="firstHeading">Série A</h1>{ROUND_1}{SEE_ALSO}"#);
        assert!(matches!(
            SeasonPage::parse("test", &html),
            Err(Error::MissingYear(_))
        ));
    }

    #[test]
    fn states_outside_a_round_ignore_nodes() {
        let doc = Html::parse_fragment(MATCH);
        let table = doc
            .select(&scraper::Selector::parse("table").unwrap())
            .next()
            .unwrap();
        let (state, record) = WalkState::Done.step(table).unwrap();
        assert!(matches!(state, WalkState::Done));
        assert!(record.is_none());
    }
}
