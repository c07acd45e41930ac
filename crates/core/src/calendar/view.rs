//! Resolves the date segments of a listing request into a window, a header
//! and previous/next jump links.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use super::error::ViewError;
use crate::storage::DateRange;

/// Header shown for the default upcoming-events listing.
pub const DEFAULT_HEADER: &str = "Upcoming Events";

/// Months covered by the default listing.
pub const DEFAULT_FUTURE_MONTHS: u32 = 3;

/// The shape of the requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Default,
    Today,
    Day,
    Week,
    Month,
    Range,
}

impl ViewKind {
    pub fn has_jump_links(self) -> bool {
        matches!(
            self,
            ViewKind::Day | ViewKind::Today | ViewKind::Week | ViewKind::Month
        )
    }
}

/// A resolved listing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub kind: ViewKind,
    pub range: DateRange,
}

/// One navigation link to an adjacent window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JumpLink {
    pub title: &'static str,
    pub range: DateRange,
}

impl JumpLink {
    /// Path segments that resolve back to this window, e.g. `2018-11-13` or
    /// `2018-11-04/2018-11-10`.
    pub fn path(&self) -> String {
        if self.range.start == self.range.end {
            self.range.start.format("%Y-%m-%d").to_string()
        } else {
            format!(
                "{}/{}",
                self.range.start.format("%Y-%m-%d"),
                self.range.end.format("%Y-%m-%d")
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JumpLinks {
    pub previous: JumpLink,
    pub next: JumpLink,
}

/// A month offered in the month picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    /// `YYYY-MM`, usable as the first path segment.
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateShape {
    Month,
    FullDate,
    Other,
}

/// Classifies a segment by its digit layout: `YYYY-MM`, `YYYY-MM-DD` or other.
fn shape(segment: &str) -> DateShape {
    let mask: String = segment
        .chars()
        .map(|c| if c.is_ascii_digit() { 'x' } else { c })
        .collect();
    match mask.as_str() {
        "xxxx-xx" => DateShape::Month,
        "xxxx-xx-xx" => DateShape::FullDate,
        _ => DateShape::Other,
    }
}

fn parse_date(segment: &str) -> Result<NaiveDate, ViewError> {
    NaiveDate::parse_from_str(segment, "%Y-%m-%d")
        .map_err(|_| ViewError::InvalidDate(segment.to_string()))
}

fn parse_month(segment: &str) -> Result<DateRange, ViewError> {
    let date = parse_date(&format!("{segment}-01"))
        .map_err(|_| ViewError::InvalidDate(segment.to_string()))?;
    DateRange::month(date.year(), date.month())
        .map_err(|_| ViewError::InvalidDate(segment.to_string()))
}

impl CalendarView {
    /// Resolves the `id` and `other` path segments relative to `today`.
    ///
    /// A full date in `other` makes the request a range from `id` to
    /// `other`, narrowed to day, week or month when it lines up with one.
    /// Otherwise `id` selects the view, and anything unrecognised falls back
    /// to the default window of `future_months` months from today.
    pub fn resolve(
        id: Option<&str>,
        other: Option<&str>,
        today: NaiveDate,
        future_months: u32,
    ) -> Result<Self, ViewError> {
        if let Some(other) = other.filter(|other| shape(other) == DateShape::FullDate) {
            let start = parse_date(id.unwrap_or_default())?;
            let end = parse_date(other)?;
            let range = DateRange::new(start, end).map_err(|_| ViewError::InvalidRange)?;
            return Ok(Self::classify(range));
        }

        let view = match id.unwrap_or_default() {
            "today" => Self {
                kind: ViewKind::Today,
                range: DateRange::day(today),
            },
            "week" => Self {
                kind: ViewKind::Week,
                range: DateRange::week(today),
            },
            "month" => Self {
                kind: ViewKind::Month,
                range: month_of(today)?,
            },
            segment => match shape(segment) {
                DateShape::Month => Self {
                    kind: ViewKind::Month,
                    range: parse_month(segment)?,
                },
                DateShape::FullDate => Self {
                    kind: ViewKind::Day,
                    range: DateRange::day(parse_date(segment)?),
                },
                DateShape::Other => Self::default_view(today, future_months),
            },
        };
        Ok(view)
    }

    /// The upcoming-events window.
    pub fn default_view(today: NaiveDate, future_months: u32) -> Self {
        Self {
            kind: ViewKind::Default,
            range: DateRange::months_from(today, future_months),
        }
    }

    /// Names an explicit range after the day, week or month it covers.
    pub fn classify(range: DateRange) -> Self {
        let kind = if range.start == range.end {
            ViewKind::Day
        } else if range.is_whole_week() {
            ViewKind::Week
        } else if range.is_whole_month() {
            ViewKind::Month
        } else {
            ViewKind::Range
        };
        Self { kind, range }
    }

    /// Header text for this view.
    pub fn header(&self, default_header: &str) -> String {
        let long = |date: NaiveDate| date.format("%-d %B %Y").to_string();
        match self.kind {
            ViewKind::Default => default_header.to_string(),
            ViewKind::Month => self.range.start.format("%B %Y").to_string(),
            ViewKind::Week | ViewKind::Range => {
                format!("{} - {}", long(self.range.start), long(self.range.end))
            }
            ViewKind::Today | ViewKind::Day => long(self.range.start),
        }
    }

    /// Links to the adjacent day, week or month, if this view has them.
    pub fn jump_links(&self) -> Option<JumpLinks> {
        let start = self.range.start;
        let links = match self.kind {
            ViewKind::Day | ViewKind::Today => JumpLinks {
                previous: JumpLink {
                    title: "Previous day",
                    range: DateRange::day(start.checked_sub_days(Days::new(1))?),
                },
                next: JumpLink {
                    title: "Next day",
                    range: DateRange::day(start.checked_add_days(Days::new(1))?),
                },
            },
            ViewKind::Week => JumpLinks {
                previous: JumpLink {
                    title: "Previous week",
                    range: DateRange::week(start.checked_sub_days(Days::new(7))?),
                },
                next: JumpLink {
                    title: "Next week",
                    range: DateRange::week(start.checked_add_days(Days::new(7))?),
                },
            },
            ViewKind::Month => JumpLinks {
                previous: JumpLink {
                    title: "Previous month",
                    range: month_of(start.checked_sub_months(Months::new(1))?).ok()?,
                },
                next: JumpLink {
                    title: "Next month",
                    range: month_of(start.checked_add_months(Months::new(1))?).ok()?,
                },
            },
            ViewKind::Default | ViewKind::Range => return None,
        };
        Some(links)
    }
}

fn month_of(date: NaiveDate) -> Result<DateRange, ViewError> {
    DateRange::month(date.year(), date.month())
        .map_err(|_| ViewError::InvalidDate(date.to_string()))
}

/// Months offered by the month picker: from a year before `today` to three
/// years after it.
pub fn month_options(today: NaiveDate) -> Vec<MonthOption> {
    let years = (today.year() - 1)..=(today.year() + 3);
    years
        .flat_map(|year| (1..=12).map(move |month| (year, month)))
        .filter_map(|(year, month)| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|first| MonthOption {
            value: first.format("%Y-%m").to_string(),
            label: first.format("%B %Y").to_string(),
        })
        .collect()
}
