use crate::WindowError;
use crate::format::DatepickerFormat;
use crate::style::DEFAULT_HANDLE;

#[derive(Clone, Debug)]
pub struct Config {
    pub handle: String,
    /// Site time zone name; per-event zones come in through the hooks.
    pub time_zone: String,
    pub min_offset: String,
    pub max_offset: String,
    pub capability: String,
    pub datepicker_format: DatepickerFormat,
    pub min_host_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            handle: DEFAULT_HANDLE.into(),
            time_zone: "UTC".into(),
            min_offset: String::new(),
            max_offset: String::new(),
            capability: "manage_options".into(),
            datepicker_format: DatepickerFormat::default(),
            min_host_version: "5.3".into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, WindowError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function, so tests never touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, WindowError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let handle = get("START_WINDOW_HANDLE").unwrap_or(defaults.handle);
        if handle.trim().is_empty() {
            return Err(WindowError::Config("START_WINDOW_HANDLE is empty".into()));
        }
        let datepicker_format = match get("START_WINDOW_DATEPICKER_FORMAT") {
            Some(v) => DatepickerFormat::from_option(&v)?,
            None => defaults.datepicker_format,
        };
        let min_host_version =
            get("START_WINDOW_MIN_HOST_VERSION").unwrap_or(defaults.min_host_version);
        if parse_version(&min_host_version).is_none() {
            return Err(WindowError::Config(format!(
                "START_WINDOW_MIN_HOST_VERSION is not a version: {min_host_version}"
            )));
        }
        Ok(Self {
            handle,
            time_zone: get("START_WINDOW_TIMEZONE").unwrap_or(defaults.time_zone),
            min_offset: get("START_WINDOW_MIN_OFFSET").unwrap_or_default(),
            max_offset: get("START_WINDOW_MAX_OFFSET").unwrap_or_default(),
            capability: get("START_WINDOW_CAPABILITY").unwrap_or(defaults.capability),
            datepicker_format,
            min_host_version,
        })
    }
}

/// Dotted numeric version, e.g. `5.3` or `8.2.1`. Missing parts count as zero.
///
/// Each part is read up to its first non-digit and reading stops there, so
/// `8.3.0RC1` is `8.3.0` and `8.1.2-1ubuntu2.14` is `8.1.2`.
pub fn parse_version(s: &str) -> Option<[u32; 3]> {
    let mut out = [0u32; 3];
    let mut parts = s.trim().split('.');
    for (i, slot) in out.iter_mut().enumerate() {
        let Some(part) = parts.next() else { break };
        let end = part.find(|c: char| !c.is_ascii_digit()).unwrap_or(part.len());
        match part[..end].parse() {
            Ok(n) => *slot = n,
            Err(_) if i == 0 => return None,
            Err(_) => break,
        }
        if end < part.len() {
            break;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_defaults() {
        let cfg = Config::from_env_with(|_| None).expect("cfg");
        assert_eq!(cfg.handle, DEFAULT_HANDLE);
        assert_eq!(cfg.capability, "manage_options");
        assert_eq!(cfg.time_zone, "UTC");
        assert!(cfg.max_offset.is_empty());
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "START_WINDOW_TIMEZONE" => Some("Europe/Paris".into()),
            "START_WINDOW_MAX_OFFSET" => Some("3w".into()),
            "START_WINDOW_DATEPICKER_FORMAT" => Some("d.m.Y".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.time_zone, "Europe/Paris");
        assert_eq!(cfg.max_offset, "3w");
        assert_eq!(cfg.datepicker_format, DatepickerFormat::DayMonthDot);
    }

    #[test]
    fn from_env_rejects_bad_format() {
        let get = |k: &str| match k {
            "START_WINDOW_DATEPICKER_FORMAT" => Some("dd/mm/yyyy".into()),
            _ => None,
        };
        assert!(Config::from_env_with(get).is_err());
    }

    #[test]
    fn versions_compare_numerically() {
        assert_eq!(parse_version("5.3"), Some([5, 3, 0]));
        assert!(parse_version("5.10").unwrap() > parse_version("5.9.9").unwrap());
        assert_eq!(parse_version("five"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn version_suffixes_are_ignored() {
        assert_eq!(parse_version("8.1.2-1ubuntu2.14"), Some([8, 1, 2]));
        assert_eq!(parse_version("8.3.0RC1"), Some([8, 3, 0]));
        assert_eq!(parse_version("7.4.33"), Some([7, 4, 33]));
        assert_eq!(parse_version("5.3-dev"), Some([5, 3, 0]));
        assert_eq!(parse_version("v8"), None);
    }
}
