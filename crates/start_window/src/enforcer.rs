//! Client-side enforcement of the window on the start date field.
//!
//! The widget is reached only through [`DatePickerField`], so the same
//! enforcement runs against the real picker or the in-memory [`TextField`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;

use crate::format::DatepickerFormat;
use crate::payload::{ClientWindow, ScriptVars};

/// The date-picker input as seen by the enforcer.
pub trait DatePickerField {
    fn set_min_date(&mut self, date: NaiveDate);
    fn set_max_date(&mut self, date: Option<NaiveDate>);
    /// Current value resolved to a date, whether picked or typed.
    fn date(&self) -> Option<NaiveDate>;
    fn clear(&mut self);
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState {
    Valid,
    Invalid,
}

#[derive(Clone, Debug)]
pub struct DateBoundaryEnforcer {
    window: ClientWindow,
    error_class: String,
}

impl DateBoundaryEnforcer {
    pub fn new(window: ClientWindow, error_class: impl Into<String>) -> Self {
        Self {
            window,
            error_class: error_class.into(),
        }
    }

    /// Build from the render payload, decoding timestamps in the viewer's zone.
    pub fn from_vars(vars: &ScriptVars, viewer_tz: Tz) -> Option<Self> {
        ClientWindow::from_vars(vars, viewer_tz).map(|w| Self::new(w, vars.error_class.clone()))
    }

    pub fn window(&self) -> &ClientWindow {
        &self.window
    }

    /// Push the bounds into the widget.
    pub fn attach<F: DatePickerField>(&self, field: &mut F) {
        field.set_min_date(self.window.min_date);
        field.set_max_date(self.window.max_date);
    }

    /// Change handler: clear and flag an out-of-window value, unflag a valid one.
    ///
    /// An empty field keeps whatever state it is already in, so a field this
    /// handler just cleared stays flagged until a valid date is chosen.
    /// Typed text the picker cannot parse reads as empty and is left as-is.
    pub fn on_change<F: DatePickerField>(&self, field: &mut F) -> FieldState {
        let Some(date) = field.date() else {
            return if field.has_class(&self.error_class) {
                FieldState::Invalid
            } else {
                FieldState::Valid
            };
        };

        if self.window.contains(date) {
            field.remove_class(&self.error_class);
            FieldState::Valid
        } else {
            debug!(%date, min = %self.window.min_date, max = ?self.window.max_date, "rejecting start date");
            field.clear();
            field.add_class(&self.error_class);
            FieldState::Invalid
        }
    }
}

/// Plain text input with a picker format: what a user can type into.
#[derive(Clone, Debug, Default)]
pub struct TextField {
    pub value: String,
    pub format: DatepickerFormat,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    classes: BTreeSet<String>,
}

impl TextField {
    pub fn new(format: DatepickerFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Simulate typing into the field.
    pub fn type_text(&mut self, text: &str) {
        self.value = text.to_string();
    }

    /// Simulate choosing a date in the picker.
    pub fn pick(&mut self, date: NaiveDate) {
        self.value = self.format.format(date);
    }
}

impl DatePickerField for TextField {
    fn set_min_date(&mut self, date: NaiveDate) {
        self.min_date = Some(date);
    }

    fn set_max_date(&mut self, date: Option<NaiveDate>) {
        self.max_date = date;
    }

    fn date(&self) -> Option<NaiveDate> {
        self.format.parse(&self.value)
    }

    fn clear(&mut self) {
        self.value.clear();
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }
}
