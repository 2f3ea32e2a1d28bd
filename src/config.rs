use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub timing: TimingConfig,
    pub tracker: TrackerConfig,
    pub keymap: KeymapConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub search_debounce_ms: u64,
    pub submit_delay_ms: u64,
    pub contact_submit_delay_ms: u64,
    pub stats_duration_ms: u64,
    pub stats_tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            submit_delay_ms: 1500,
            contact_submit_delay_ms: 2000,
            stats_duration_ms: 2000,
            stats_tick_ms: 16,
        }
    }
}

impl TimingConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn contact_submit_delay(&self) -> Duration {
        Duration::from_millis(self.contact_submit_delay_ms)
    }

    pub fn stats_duration(&self) -> Duration {
        Duration::from_millis(self.stats_duration_ms)
    }

    pub fn stats_tick(&self) -> Duration {
        Duration::from_millis(self.stats_tick_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerConfig {
    pub capacity: usize,
    /// JSON file standing in for browser local storage. In-memory when unset.
    pub store_path: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            store_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Second status row with the most recent tracked interaction.
    pub debug_status: bool,
    /// Page width in columns at or below which the nav collapses into a menu
    /// button.
    pub mobile_breakpoint: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debug_status: false,
            mobile_breakpoint: 80,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ncpr=info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.timing.search_debounce_ms = self.timing.search_debounce_ms.max(1);
        self.timing.submit_delay_ms = self.timing.submit_delay_ms.max(1);
        self.timing.contact_submit_delay_ms = self.timing.contact_submit_delay_ms.max(1);
        self.timing.stats_duration_ms = self.timing.stats_duration_ms.max(1);
        self.timing.stats_tick_ms = self.timing.stats_tick_ms.max(1);
        self.tracker.capacity = self.tracker.capacity.max(1);
        if self.logging.filter.trim().is_empty() {
            self.logging.filter = LoggingConfig::default().filter;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("NCPR_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("ncpr").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("ncpr")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("ncpr").join("config.toml"));
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::Config;

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let missing = dir.path().join("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
        assert_eq!(config.timing.search_debounce_ms, 300);
        assert_eq!(config.tracker.capacity, 50);
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            r#"
            [timing]
            search_debounce_ms = 0
            submit_delay_ms = 0
            stats_tick_ms = 0

            [tracker]
            capacity = 0
            store_path = "interactions.json"

            [ui]
            debug_status = true
            mobile_breakpoint = 60

            [logging]
            filter = "  "
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert_eq!(config.timing.search_debounce_ms, 1);
        assert_eq!(config.timing.submit_delay_ms, 1);
        assert_eq!(config.timing.stats_tick_ms, 1);
        assert_eq!(config.timing.contact_submit_delay_ms, 2000);
        assert_eq!(config.timing.stats_duration_ms, 2000);
        assert_eq!(config.tracker.capacity, 1);
        assert_eq!(
            config.tracker.store_path.as_deref(),
            Some(std::path::Path::new("interactions.json"))
        );
        assert_eq!(config.logging.filter, "ncpr=info");
        assert_eq!(config.keymap.preset, "default");
        assert!(config.ui.debug_status);
        assert_eq!(config.ui.mobile_breakpoint, 60);
    }

    #[test]
    fn load_from_path_rejects_directories_and_bad_toml() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        assert!(Config::load_from_path(dir.path()).is_err());

        let path = dir.path().join("broken.toml");
        fs::write(&path, "[timing\nsearch_debounce_ms = ").expect("config file should be written");
        assert!(Config::load_from_path(&path).is_err());
    }
}
