//! Start-date window for event admin forms.
//!
//! Computes the range of dates a non-administrator may pick as an event's
//! start date, encodes it into the payload handed to the browser date-picker
//! and applies it to the picker field on the client side.

use thiserror::Error;

pub mod assets;
pub mod config;
pub mod disabled_days;
pub mod enforcer;
pub mod format;
pub mod hooks;
pub mod offset;
pub mod payload;
pub mod style;
pub mod timezone;
pub mod window;

pub use assets::{AdminScreen, AssetBundle, Extension, Post, RenderContext, User};
pub use config::Config;
pub use disabled_days::DisabledDays;
pub use enforcer::{DateBoundaryEnforcer, DatePickerField, FieldState};
pub use format::DatepickerFormat;
pub use hooks::{FilterChain, Hooks};
pub use offset::Offset;
pub use payload::{ClientWindow, ScriptVars};
pub use window::{DateWindow, WindowCalculator, WindowInputs};

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("unparsable offset: {0}")]
    ConfigParse(String),
    #[error("unknown time zone: {0}")]
    InvalidTimezone(String),
    #[error("host runtime {found} is older than the required {required}")]
    EnvironmentUnsupported { required: String, found: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for window operations.
pub type WindowResult<T> = Result<T, WindowError>;
