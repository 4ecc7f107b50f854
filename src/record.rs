//! Assembling one match out of its two table rows, and writing it out as a line.

use scraper::ElementRef;

use crate::extract::{
    cell_text, create_selector, extract_attendance, extract_goal_minutes, extract_stadium,
    extract_team, format_minutes, hour_text, Attendance, Side, Stadium, Team,
};
use crate::{Error, Result};

/// Columns of the output file, in order.
pub const OUT_HEADER: [&str; 20] = [
    "YEAR",
    "ROUND",
    "day_month",
    "team_wiki_HOME",
    "team_name_HOME",
    "team_nick_HOME",
    "team_state_HOME",
    "result",
    "team_wiki_VISITOR",
    "team_name_VISITOR",
    "team_nick_VISITOR",
    "team_state_VISITOR",
    "stadium_name",
    "stadium_nick",
    "stadium_city",
    "hour",
    "goals_home_time",
    "goals_visitor_time",
    "audience",
    "income",
];

const CELLS_PER_ROW: usize = 5;

/// Everything read from one match fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRecord {
    pub day_month: String,
    pub home: Team,
    pub result: String,
    pub visitor: Team,
    pub stadium: Stadium,
    pub hour: String,
    pub goals_home_time: String,
    pub goals_visitor_time: String,
    pub attendance: Attendance,
}

impl MatchRecord {
    /// Field values in the order of `OUT_HEADER[2..]`.
    pub fn values(&self) -> [&str; 18] {
        [
            self.day_month.as_str(),
            self.home.wiki.as_str(),
            self.home.name.as_str(),
            self.home.nick.as_str(),
            self.home.state.as_str(),
            self.result.as_str(),
            self.visitor.wiki.as_str(),
            self.visitor.name.as_str(),
            self.visitor.nick.as_str(),
            self.visitor.state.as_str(),
            self.stadium.name.as_str(),
            self.stadium.nick.as_str(),
            self.stadium.city.as_str(),
            self.hour.as_str(),
            self.goals_home_time.as_str(),
            self.goals_visitor_time.as_str(),
            self.attendance.audience.as_str(),
            self.attendance.income.as_str(),
        ]
    }
}

/// A match tagged with the season and round it was listed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub year: String,
    pub round: String,
    pub record: MatchRecord,
}

impl MatchRow {
    /// Comma joined line. The goal lists get their quotes by wrapping every
    /// bracket in the line, not through CSV escaping.
    pub fn to_line(&self) -> String {
        let mut values = vec![self.year.as_str(), self.round.as_str()];
        values.extend(self.record.values());
        values
            .join(",")
            .replace('[', "\"[")
            .replace(']', "]\"")
    }
}

pub fn header_line() -> String {
    OUT_HEADER.join(",")
}

fn row_cells<'a>(row: ElementRef<'a>, name: &'static str) -> Result<[ElementRef<'a>; 5]> {
    let cells: Vec<_> = row.select(&create_selector("td")?).collect();
    <[ElementRef<'a>; CELLS_PER_ROW]>::try_from(cells).map_err(|cells| Error::CellCount {
        row: name,
        expected: CELLS_PER_ROW,
        found: cells.len(),
    })
}

/// Builds a match out of a fragment holding a header and a details row.
///
/// A fragment without any row isn't a match and yields `Ok(None)`. Rows past
/// the second are ignored.
pub fn assemble_match(fragment: ElementRef<'_>) -> Result<Option<MatchRecord>> {
    let rows: Vec<_> = fragment.select(&create_selector("tr")?).collect();
    let (header, details) = match rows.as_slice() {
        [] => return Ok(None),
        [header, details, ..] => (*header, *details),
        _ => return Err(Error::RowCount(rows.len())),
    };

    let [day_month, home, result, visitor, stadium] = row_cells(header, "header")?;
    let [hour, goals_home, _, goals_visitor, more_info] = row_cells(details, "details")?;

    Ok(Some(MatchRecord {
        day_month: cell_text(day_month),
        home: extract_team(home, Side::Home)?,
        result: cell_text(result),
        visitor: extract_team(visitor, Side::Visitor)?,
        stadium: extract_stadium(stadium)?,
        hour: hour_text(hour),
        goals_home_time: format_minutes(&extract_goal_minutes(goals_home)?),
        goals_visitor_time: format_minutes(&extract_goal_minutes(goals_visitor)?),
        attendance: extract_attendance(more_info)?,
    }))
}
