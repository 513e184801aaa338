//! Relative date offsets in the date-picker's `minDate`/`maxDate` grammar.
//!
//! An offset is one or more `[+-]N[unit]` terms where the unit is one of
//! `d`, `w`, `m`, `y` (case-insensitive) and defaults to days: `7`, `3w`,
//! `+1m -1w`.

use std::sync::LazyLock;

use chrono::{Months, NaiveDate, TimeDelta};
use regex::Regex;

use crate::WindowError;

static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([+-]?[0-9]+)\s*([dDwWmMyY])?").expect("offset term pattern is valid")
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offset {
    pub months: i32,
    pub days: i64,
}

impl Offset {
    pub fn days(days: i64) -> Self {
        Self { months: 0, days }
    }

    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.days == 0
    }

    /// Parse an offset string. Blank input and a zero total both yield `None`.
    pub fn parse(s: &str) -> Result<Option<Self>, WindowError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }

        let mut offset = Offset::default();
        let mut matched = 0usize;
        for caps in TERM.captures_iter(s) {
            if let Some(whole) = caps.get(0) {
                matched += whole.as_str().chars().filter(|c| !c.is_whitespace()).count();
            }

            let n: i64 = caps[1]
                .parse()
                .map_err(|_| WindowError::ConfigParse(s.to_string()))?;
            let overflow = || WindowError::ConfigParse(s.to_string());
            match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
                None | Some("d") => {
                    offset.days = offset.days.checked_add(n).ok_or_else(overflow)?
                }
                Some("w") => {
                    offset.days = n
                        .checked_mul(7)
                        .and_then(|w| offset.days.checked_add(w))
                        .ok_or_else(overflow)?
                }
                Some("m") => {
                    offset.months = offset
                        .months
                        .checked_add(to_months(n, 1, s)?)
                        .ok_or_else(overflow)?
                }
                Some("y") => {
                    offset.months = offset
                        .months
                        .checked_add(to_months(n, 12, s)?)
                        .ok_or_else(overflow)?
                }
                Some(_) => return Err(overflow()),
            }
        }

        // Anything left over besides whitespace means the string was not an offset.
        let significant = s.chars().filter(|c| !c.is_whitespace()).count();
        if matched == 0 || significant != matched {
            return Err(WindowError::ConfigParse(s.to_string()));
        }

        Ok((!offset.is_zero()).then_some(offset))
    }

    /// `date` moved forward by this offset. Month steps clamp to the end of
    /// the target month.
    pub fn after(&self, date: NaiveDate) -> Option<NaiveDate> {
        let date = shift_months(date, self.months)?;
        date.checked_add_signed(TimeDelta::try_days(self.days)?)
    }

    /// `date` moved backward by this offset.
    pub fn before(&self, date: NaiveDate) -> Option<NaiveDate> {
        let date = shift_months(date, self.months.checked_neg()?)?;
        date.checked_sub_signed(TimeDelta::try_days(self.days)?)
    }
}

fn to_months(n: i64, factor: i64, src: &str) -> Result<i32, WindowError> {
    n.checked_mul(factor)
        .and_then(|m| i32::try_from(m).ok())
        .ok_or_else(|| WindowError::ConfigParse(src.to_string()))
}

fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}
