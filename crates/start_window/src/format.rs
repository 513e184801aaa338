//! Date formats the admin date-picker can be configured with.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::WindowError;

/// The site's date-picker format, stored by the host either as an index into
/// the list below or as the PHP-style pattern itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatepickerFormat {
    #[default]
    YearMonthDayDash,
    MonthDaySlashUnpadded,
    MonthDaySlash,
    DayMonthSlashUnpadded,
    DayMonthSlash,
    MonthDayDashUnpadded,
    MonthDayDash,
    DayMonthDashUnpadded,
    DayMonthDash,
    YearMonthDayDot,
    MonthDayDot,
    DayMonthDot,
}

static ALL: [(DatepickerFormat, &str, &str); 12] = [
    (DatepickerFormat::YearMonthDayDash, "Y-m-d", "%Y-%m-%d"),
    (DatepickerFormat::MonthDaySlashUnpadded, "n/j/Y", "%-m/%-d/%Y"),
    (DatepickerFormat::MonthDaySlash, "m/d/Y", "%m/%d/%Y"),
    (DatepickerFormat::DayMonthSlashUnpadded, "j/n/Y", "%-d/%-m/%Y"),
    (DatepickerFormat::DayMonthSlash, "d/m/Y", "%d/%m/%Y"),
    (DatepickerFormat::MonthDayDashUnpadded, "n-j-Y", "%-m-%-d-%Y"),
    (DatepickerFormat::MonthDayDash, "m-d-Y", "%m-%d-%Y"),
    (DatepickerFormat::DayMonthDashUnpadded, "j-n-Y", "%-d-%-m-%Y"),
    (DatepickerFormat::DayMonthDash, "d-m-Y", "%d-%m-%Y"),
    (DatepickerFormat::YearMonthDayDot, "Y.m.d", "%Y.%m.%d"),
    (DatepickerFormat::MonthDayDot, "m.d.Y", "%m.%d.%Y"),
    (DatepickerFormat::DayMonthDot, "d.m.Y", "%d.%m.%Y"),
];

impl DatepickerFormat {
    /// Accepts a stored option value: `"0"`..`"11"` or a pattern like `"d/m/Y"`.
    pub fn from_option(value: &str) -> Result<Self, WindowError> {
        let value = value.trim();
        if let Ok(idx) = value.parse::<usize>() {
            return ALL
                .get(idx)
                .map(|(f, _, _)| *f)
                .ok_or_else(|| WindowError::Config(format!("unknown datepicker format {value}")));
        }
        ALL.iter()
            .find(|(_, php, _)| *php == value)
            .map(|(f, _, _)| *f)
            .ok_or_else(|| WindowError::Config(format!("unknown datepicker format {value}")))
    }

    fn entry(&self) -> &'static (DatepickerFormat, &'static str, &'static str) {
        ALL.iter()
            .find(|(f, _, _)| f == self)
            .unwrap_or(&ALL[0])
    }

    pub fn pattern(&self) -> &'static str {
        self.entry().1
    }

    /// Render a date the way the picker displays it.
    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.entry().2).to_string()
    }

    /// Parse manually typed text. Padding is optional when reading.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let read = self.entry().2.replace("%-", "%");
        NaiveDate::parse_from_str(text.trim(), &read).ok()
    }
}
