//! Disabled-day ranges for the block editor's calendar component.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::payload::ClientWindow;

/// Days the calendar refuses: everything before `before` and after `after`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabledDays {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<NaiveDate>,
}

impl DisabledDays {
    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        self.before.is_some_and(|b| date < b) || self.after.is_some_and(|a| date > a)
    }
}

/// Filter for the calendar's `disabledDays` chain.
///
/// A decision made earlier in the chain is returned untouched.
pub fn filter(prior: Option<DisabledDays>, window: &ClientWindow) -> Option<DisabledDays> {
    if prior.is_some() {
        return prior;
    }
    Some(DisabledDays {
        before: Some(window.min_date),
        after: window.max_date,
    })
}
