//! Field extractors for the pieces of a season page.
//!
//! Everything in here is a pure function over a parsed element: no I/O and no
//! state. The page layout is the one used by the pt.wikipedia season articles,
//! anything else is expected to fail with a structure error.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::{Error, Result, ROUND_KEYWORD, STATE_SUFFIX};

const YEAR_PATTERN: &str = r"\d{4}";

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

/// All the text below `el`, concatenated.
#[inline]
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Trimmed text of a plain cell (date, result).
pub fn cell_text(cell: ElementRef<'_>) -> String {
    element_text(cell).trim().to_string()
}

/// Kickoff cell, `"16h00"` becomes `"16:00"`.
pub fn hour_text(cell: ElementRef<'_>) -> String {
    element_text(cell).replace('h', ":").trim().to_string()
}

fn nth<'a>(
    elements: &[ElementRef<'a>],
    index: usize,
    context: &'static str,
    selector: &'static str,
) -> Result<ElementRef<'a>> {
    elements.get(index).copied().ok_or(Error::MissingElement {
        context,
        selector,
        index,
    })
}

fn attr(el: ElementRef<'_>, attr: &'static str, context: &'static str) -> Result<String> {
    el.value()
        .attr(attr)
        .map(str::to_string)
        .ok_or(Error::MissingAttribute { context, attr })
}

/// Which side of the fixture a team cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Visitor,
}

impl Side {
    /// Positions of the (team, state) anchors in the cell.
    /// The home cell reads `Team [flag]`, the visitor one `[flag] Team`.
    fn anchor_indexes(self) -> (usize, usize) {
        match self {
            Side::Home => (0, 1),
            Side::Visitor => (1, 0),
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Side::Home => "HOME",
            Side::Visitor => "VISITOR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    pub wiki: String,
    pub name: String,
    pub nick: String,
    pub state: String,
}

pub fn extract_team(cell: ElementRef<'_>, side: Side) -> Result<Team> {
    let anchors: Vec<_> = cell.select(&create_selector("a")?).collect();
    let (team_idx, state_idx) = side.anchor_indexes();
    let team = nth(&anchors, team_idx, "team cell", "a")?;
    let state = nth(&anchors, state_idx, "team cell", "a")?;

    Ok(Team {
        wiki: attr(team, "href", "team cell")?,
        name: attr(team, "title", "team cell")?,
        nick: element_text(team),
        state: attr(state, "title", "team cell")?.replacen(STATE_SUFFIX, "", 1),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stadium {
    pub name: String,
    pub nick: String,
    pub city: String,
}

pub fn extract_stadium(cell: ElementRef<'_>) -> Result<Stadium> {
    let anchors: Vec<_> = cell.select(&create_selector("a")?).collect();
    let stadium = nth(&anchors, 0, "stadium cell", "a")?;
    let city = nth(&anchors, 1, "stadium cell", "a")?;

    Ok(Stadium {
        name: attr(stadium, "title", "stadium cell")?,
        nick: element_text(stadium),
        city: element_text(city),
    })
}

/// Minute markers of a goals cell, in document order: `"45+1'"` becomes `"45+1"`.
pub fn extract_goal_minutes(cell: ElementRef<'_>) -> Result<Vec<String>> {
    Ok(cell
        .select(&create_selector("span")?)
        .map(|span| element_text(span).replace('\'', "").trim().to_string())
        .collect())
}

/// Writes a minute list the way the output file expects it: `['12', '45+1']`, or `[]`.
pub fn format_minutes(minutes: &[String]) -> String {
    let quoted: Vec<String> = minutes.iter().map(|m| format!("'{m}'")).collect();
    format!("[{}]", quoted.join(", "))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attendance {
    pub audience: String,
    pub income: String,
}

/// Reads the `Público:` and `Renda:` labels of the extra info cell.
/// A missing label leaves the field empty.
pub fn extract_attendance(cell: ElementRef<'_>) -> Result<Attendance> {
    let labels: Vec<_> = cell.select(&create_selector("b")?).collect();
    let value_after = |label: &str| {
        labels
            .iter()
            .find(|b| element_text(**b) == label)
            .map(|b| text_after(*b))
    };

    let audience = value_after("Público:")
        .map(|v| v.replace([' ', '.'], ""))
        .unwrap_or_default();
    let income = value_after("Renda:")
        .map(|v| v.replace(',', "."))
        .unwrap_or_default();

    Ok(Attendance { audience, income })
}

/// The trimmed text of the node right after `el`.
fn text_after(el: ElementRef<'_>) -> String {
    match el.next_sibling() {
        Some(node) => match node.value() {
            Node::Text(text) => text.trim().to_string(),
            _ => ElementRef::wrap(node)
                .map(|sibling| element_text(sibling).trim().to_string())
                .unwrap_or_default(),
        },
        None => String::new(),
    }
}

/// Label of a round heading.
///
/// Depending on how the accented title got rendered the heading holds 5 spans,
/// with the label in the first one, or fewer with the label in the second.
pub fn round_header_text(heading: ElementRef<'_>) -> Result<String> {
    let spans: Vec<_> = heading.select(&create_selector("span")?).collect();
    let label = if spans.len() == 5 {
        spans.first()
    } else {
        spans.get(1)
    };
    label
        .map(|span| element_text(*span))
        .ok_or(Error::RoundLabel(spans.len()))
}

/// Season year, the first run of 4 digits in the page title.
pub fn extract_year(document: &Html) -> Result<String> {
    let title = document
        .select(&create_selector("#firstHeading")?)
        .next()
        .map(element_text)
        .ok_or(Error::MissingElement {
            context: "page",
            selector: "#firstHeading",
            index: 0,
        })?;

    let year_re = Regex::new(YEAR_PATTERN)?;
    year_re
        .find(&title)
        .map(|m| m.as_str().to_string())
        .ok_or(Error::MissingYear(title))
}

/// The `h2`/`h3` heading of the first round listed on the page.
pub fn find_round_heading(document: &Html) -> Result<ElementRef<'_>> {
    document
        .select(&create_selector("span.mw-headline")?)
        .filter(|span| element_text(*span).to_lowercase().contains(ROUND_KEYWORD))
        .filter_map(|span| span.parent().and_then(ElementRef::wrap))
        .find(|parent| matches!(parent.value().name(), "h2" | "h3"))
        .ok_or(Error::NoRoundHeading)
}
