use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Number of day columns in the visible grid.
pub const DAYS_PER_WEEK: i64 = 7;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical Monday-to-Sunday window currently displayed.
///
/// Dates are timezone-naive local calendar days. `start` is always a Monday and
/// `end` is always `start + 6 days`; the only way to build one is through
/// [`WeekWindow::containing`] so the invariant cannot be broken by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWeekWindow")]
pub struct WeekWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawWeekWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWeekWindow> for WeekWindow {
    type Error = TimelineError;

    fn try_from(raw: RawWeekWindow) -> TimelineResult<Self> {
        let window = Self::containing(raw.start)?;
        if window.start != raw.start || window.end != raw.end {
            return Err(TimelineError::InvalidData(format!(
                "week window {}..{} is not a Monday-start week",
                raw.start, raw.end
            )));
        }
        Ok(window)
    }
}

impl WeekWindow {
    /// Builds the window for the calendar week containing `date`.
    pub fn containing(date: NaiveDate) -> TimelineResult<Self> {
        let start = week_start(date)?;
        let end = add_days(start, DAYS_PER_WEEK - 1)?;
        Ok(Self { start, end })
    }

    /// Builds the window containing `datetime`, truncating the time to midnight.
    pub fn containing_datetime(datetime: NaiveDateTime) -> TimelineResult<Self> {
        Self::containing(datetime.date())
    }

    /// Window for the current local week.
    pub fn current_local() -> TimelineResult<Self> {
        Self::containing(Local::now().date_naive())
    }

    #[must_use]
    pub fn start(self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(self) -> NaiveDate {
        self.end
    }

    /// `"YYYY-MM-DD"` key of the Monday, used to address collaborator queries.
    #[must_use]
    pub fn start_key(self) -> String {
        format_date_key(self.start)
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The seven dates of the window, Monday first.
    #[must_use]
    pub fn days(self) -> [NaiveDate; 7] {
        let mut days = [self.start; 7];
        for (slot, day) in days.iter_mut().zip(self.start.iter_days()) {
            *slot = day;
        }
        days
    }

    /// Shifts the window by whole weeks (negative moves backwards).
    pub fn shifted_by_weeks(self, weeks: i64) -> TimelineResult<Self> {
        let days = weeks.checked_mul(DAYS_PER_WEEK).ok_or_else(|| {
            TimelineError::InvalidData(format!("week shift {weeks} overflows day arithmetic"))
        })?;
        Self::containing(add_days(self.start, days)?)
    }

    pub fn next(self) -> TimelineResult<Self> {
        self.shifted_by_weeks(1)
    }

    pub fn previous(self) -> TimelineResult<Self> {
        self.shifted_by_weeks(-1)
    }

    /// Signed day offset of `date` relative to the window start.
    #[must_use]
    pub fn offset_of(self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.start).num_days()
    }

    /// Per-column header labels, Monday first.
    #[must_use]
    pub fn day_headers(self) -> Vec<DayHeader> {
        self.days().into_iter().map(DayHeader::for_date).collect()
    }

    /// Range label such as `"Jan 1 - Jan 7, 2024"`.
    #[must_use]
    pub fn range_label(self) -> String {
        format!(
            "{} - {}, {}",
            month_day_label(self.start),
            month_day_label(self.end),
            self.end.year()
        )
    }
}

/// Header cell for one grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHeader {
    pub date_key: String,
    pub weekday_label: String,
    pub month_label: String,
}

impl DayHeader {
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date_key: format_date_key(date),
            weekday_label: weekday_day_label(date),
            month_label: month_day_label(date),
        }
    }
}

/// Monday of the week containing `date`.
///
/// With Sunday = 0 .. Saturday = 6 the shift is `(weekday == 0 ? -6 : 1) - weekday`,
/// so Sundays belong to the week that started six days earlier.
pub fn week_start(date: NaiveDate) -> TimelineResult<NaiveDate> {
    let weekday = i64::from(date.weekday().num_days_from_sunday());
    let diff = (if weekday == 0 { -6 } else { 1 }) - weekday;
    add_days(date, diff)
}

/// Adds a signed number of days, failing on calendar overflow.
pub fn add_days(date: NaiveDate, days: i64) -> TimelineResult<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.ok_or_else(|| {
        TimelineError::InvalidData(format!("adding {days} days to {date} overflows the calendar"))
    })
}

/// Zero-padded `"YYYY-MM-DD"`.
#[must_use]
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a strict, zero-padded `"YYYY-MM-DD"` key.
pub fn parse_date_key(key: &str) -> TimelineResult<NaiveDate> {
    let bytes = key.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());
    if !shaped {
        return Err(TimelineError::InvalidData(format!(
            "date key `{key}` must be zero-padded YYYY-MM-DD"
        )));
    }

    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .map_err(|e| TimelineError::InvalidData(format!("invalid date key `{key}`: {e}")))
}

/// `"Mon 3"`.
#[must_use]
pub fn weekday_day_label(date: NaiveDate) -> String {
    date.format("%a %-d").to_string()
}

/// `"Jan 3"`.
#[must_use]
pub fn month_day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
