//! Window calculator: the selectable `[min_date, max_date]` range for an
//! event's start date.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::offset::Offset;
use crate::payload::ScriptVars;
use crate::timezone;

/// Inclusive range of selectable start dates for one form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    pub min_date: NaiveDate,
    /// `None` means no upper bound.
    pub max_date: Option<NaiveDate>,
    /// Zone the midnight timestamps are expressed in.
    pub timezone: Tz,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.min_date && self.max_date.is_none_or(|max| date <= max)
    }

    pub fn min_timestamp(&self) -> i64 {
        timezone::midnight_timestamp(self.min_date, self.timezone)
    }

    pub fn max_timestamp(&self) -> Option<i64> {
        self.max_date
            .map(|d| timezone::midnight_timestamp(d, self.timezone))
    }

    /// Replace the minimum with the date of an overriding timestamp. A zero
    /// timestamp is treated as "no override".
    pub fn with_min_timestamp(self, ts: i64) -> Self {
        if ts == 0 {
            return self;
        }
        match timezone::date_from_timestamp(ts, self.timezone) {
            Some(min_date) => Self { min_date, ..self },
            None => {
                warn!(ts, "ignoring out-of-range minimum start override");
                self
            }
        }
    }

    pub fn to_script_vars(&self, error_class: impl Into<String>) -> ScriptVars {
        ScriptVars {
            min_date: self.min_timestamp(),
            max_date: self.max_timestamp(),
            error_class: error_class.into(),
        }
    }
}

/// Everything one render knows about the field being restricted.
#[derive(Clone, Debug)]
pub struct WindowInputs<'a> {
    pub now: DateTime<Utc>,
    pub time_zone: &'a str,
    /// Persisted start date of the event being edited.
    pub existing_start: Option<NaiveDate>,
    /// How far before today the window may reach.
    pub min_offset: &'a str,
    /// How far after today the window may reach. Blank or zero is unbounded.
    pub max_offset: &'a str,
}

impl<'a> WindowInputs<'a> {
    pub fn new(now: DateTime<Utc>, time_zone: &'a str) -> Self {
        Self {
            now,
            time_zone,
            existing_start: None,
            min_offset: "",
            max_offset: "",
        }
    }
}

#[derive(Clone, Debug)]
pub struct WindowCalculator {
    fallback: Tz,
}

impl Default for WindowCalculator {
    fn default() -> Self {
        Self::from_env()
    }
}

impl WindowCalculator {
    /// Calculator whose fallback zone is the process default (`TZ`, else UTC).
    pub fn from_env() -> Self {
        Self::with_fallback(timezone::system_default_with(|k| std::env::var(k).ok()))
    }

    pub fn with_fallback(fallback: Tz) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> Tz {
        self.fallback
    }

    pub fn compute(&self, inputs: &WindowInputs<'_>) -> DateWindow {
        let tz = timezone::resolve_or(inputs.time_zone, self.fallback);

        let today = timezone::local_date(inputs.now, tz);
        let existing = inputs.existing_start.unwrap_or(today);
        let anchor_low = today.min(existing);
        let anchor_high = today.max(existing);

        let min_date = soft_offset(inputs.min_offset, "min")
            .and_then(|o| o.before(today))
            .map_or(anchor_low, |d| d.min(anchor_high));

        let max_date = soft_offset(inputs.max_offset, "max")
            .and_then(|o| o.after(today))
            .map(|d| d.max(anchor_high));

        let window = DateWindow {
            min_date,
            max_date,
            timezone: tz,
        };
        debug!(
            %today,
            min = %window.min_date,
            max = ?window.max_date,
            tz = %tz.name(),
            "computed start date window"
        );
        window
    }
}

fn soft_offset(raw: &str, which: &str) -> Option<Offset> {
    match Offset::parse(raw) {
        Ok(o) => o,
        Err(e) => {
            warn!(error = %e, boundary = which, "ignoring offset");
            None
        }
    }
}
