//! Global monthcal configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_STORAGE_KEY, DEFAULT_STORAGE_QUOTA, DOUBLE_CLICK_WINDOW_MS};
use crate::error::{CalendarError, CalendarResult};
use crate::event::EventColor;
use crate::storage::FileStorage;

static DEFAULT_STORAGE_DIR: &str = "~/.local/share/monthcal";

fn default_storage_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_DIR)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_storage_quota() -> usize {
    DEFAULT_STORAGE_QUOTA
}

fn default_color() -> String {
    EventColor::default().name().to_string()
}

fn default_double_click_window() -> String {
    format!("{}ms", DOUBLE_CLICK_WINDOW_MS)
}

/// Configuration at ~/.config/monthcal/config.toml, overridable with
/// `MONTHCAL_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonthcalConfig {
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Byte limit of the stored mapping.
    #[serde(default = "default_storage_quota")]
    pub storage_quota: usize,

    #[serde(default = "default_color")]
    pub default_color: String,

    /// Maximum age of kept events, e.g. "365days". Unset keeps everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<String>,

    #[serde(default = "default_double_click_window")]
    pub double_click_window: String,
}

impl Default for MonthcalConfig {
    fn default() -> Self {
        MonthcalConfig {
            storage_dir: default_storage_dir(),
            storage_key: default_storage_key(),
            storage_quota: default_storage_quota(),
            default_color: default_color(),
            retention: None,
            double_click_window: default_double_click_window(),
        }
    }
}

impl MonthcalConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("monthcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented default file on
    /// first run.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        let config: MonthcalConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("MONTHCAL"))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later.
    fn validate(&self) -> CalendarResult<()> {
        self.default_color()?;
        self.retention()?;
        self.double_click_window()?;
        if self.storage_key.trim().is_empty() {
            return Err(CalendarError::Config("storage_key must not be empty".into()));
        }
        Ok(())
    }

    pub fn storage_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.storage_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.storage_path()).with_quota(self.storage_quota)
    }

    pub fn default_color(&self) -> CalendarResult<EventColor> {
        self.default_color
            .parse()
            .map_err(|e: String| CalendarError::Config(format!("default_color: {e}")))
    }

    pub fn retention(&self) -> CalendarResult<Option<Duration>> {
        self.retention
            .as_deref()
            .map(|r| parse_duration("retention", r))
            .transpose()
    }

    /// First day kept under the retention policy, if any.
    pub fn retention_cutoff(&self, today: NaiveDate) -> CalendarResult<Option<NaiveDate>> {
        let Some(retention) = self.retention()? else {
            return Ok(None);
        };
        let days = i64::try_from(retention.as_secs() / 86_400)
            .map_err(|_| CalendarError::Config("retention is too large".into()))?;

        Ok(Some(
            today
                .checked_sub_signed(chrono::Duration::days(days))
                .unwrap_or(NaiveDate::MIN),
        ))
    }

    pub fn double_click_window(&self) -> CalendarResult<Duration> {
        parse_duration("double_click_window", &self.double_click_window)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# monthcal configuration

# Where events are stored:
# storage_dir = \"{}\"

# Storage key (file name) holding all events:
# storage_key = \"{}\"

# Color for events created without one:
# default_color = \"blue\"

# Drop events older than this when running `monthcal clean`:
# retention = \"365days\"

# Second click within this window counts as a double click:
# double_click_window = \"{}ms\"
",
            DEFAULT_STORAGE_DIR, DEFAULT_STORAGE_KEY, DOUBLE_CLICK_WINDOW_MS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// The effective configuration as TOML.
    pub fn to_toml(&self) -> CalendarResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalendarError::Config(e.to_string()))
    }
}

fn parse_duration(field: &str, value: &str) -> CalendarResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| CalendarError::Config(format!("{field}: invalid duration '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = MonthcalConfig::load_from(&tmp.path().join("missing.toml")).unwrap();

        assert_eq!(config.storage_key, "calendar-events");
        assert_eq!(config.default_color().unwrap(), EventColor::Blue);
        assert_eq!(config.retention().unwrap(), None);
        assert_eq!(config.double_click_window().unwrap(), Duration::from_millis(300));
    }

    #[test]
    fn generated_default_file_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("monthcal/config.toml");
        MonthcalConfig::create_default_config(&path).unwrap();

        let config = MonthcalConfig::load_from(&path).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from(DEFAULT_STORAGE_DIR));
    }

    #[test]
    fn reads_values_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "storage_dir = \"/tmp/events\"\ndefault_color = \"green\"\nretention = \"30days\"\n",
        )
        .unwrap();

        let config = MonthcalConfig::load_from(&path).unwrap();
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/events"));
        assert_eq!(config.default_color().unwrap(), EventColor::Green);

        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            config.retention_cutoff(today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn rejects_bad_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        std::fs::write(&path, "default_color = \"mauve\"\n").unwrap();
        assert!(matches!(
            MonthcalConfig::load_from(&path),
            Err(CalendarError::Config(_))
        ));

        std::fs::write(&path, "retention = \"soon\"\n").unwrap();
        assert!(matches!(
            MonthcalConfig::load_from(&path),
            Err(CalendarError::Config(_))
        ));
    }

    #[test]
    fn tilde_is_expanded() {
        let config = MonthcalConfig::default();
        assert!(!config.storage_path().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn effective_config_serializes() {
        let toml = MonthcalConfig::default().to_toml().unwrap();
        assert!(toml.contains("storage_key = \"calendar-events\""));
        assert!(!toml.contains("retention"));
    }
}
