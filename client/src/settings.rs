use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use hud_core::constants::DEFAULT_PROJECT_URL;
use hud_core::messages::PanelKind;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE_NAME: &str = "spf_hud_settings.json";
const LOG_FILE_NAME: &str = "spf_hud.log";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HudSettings {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub log_file: Option<String>,

    /// Opened by the project link on the character screen.
    pub project_url: String,

    /// Unanswered requests older than this get the "нет ответа" marker.
    pub request_timeout_secs: f64,

    /// How long the loading screen waits for the host before simulating a load.
    pub loading_grace_secs: f64,
    pub fallback_tick_ms: u64,
    pub fallback_file_count: i64,

    /// Panel the preview window opens with.
    pub initial_panel: PanelKind,
}

impl Default for HudSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: Some(LOG_FILE_NAME.to_string()),
            project_url: DEFAULT_PROJECT_URL.to_string(),
            request_timeout_secs: 10.0,
            loading_grace_secs: 1.0,
            fallback_tick_ms: 300,
            fallback_file_count: 25,
            initial_panel: PanelKind::CharacterSelect,
        }
    }
}

fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

impl HudSettings {
    pub fn request_timeout(&self) -> Duration {
        seconds(self.request_timeout_secs)
    }

    pub fn loading_grace(&self) -> Duration {
        seconds(self.loading_grace_secs)
    }

    /// Never zero, so the fallback simulation always advances one file per tick.
    pub fn fallback_tick(&self) -> Duration {
        Duration::from_millis(self.fallback_tick_ms.max(1))
    }

    /// Log level from `SPF_HUD_LOG`, else from the settings file.
    pub fn log_level_filter(&self) -> LevelFilter {
        log_level_from(std::env::var("SPF_HUD_LOG").ok(), &self.log_level)
    }
}

/// Parses `env_value` when it is set and valid, then `configured`, then falls back to `Info`.
pub fn log_level_from(env_value: Option<String>, configured: &str) -> LevelFilter {
    env_value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .and_then(|value| LevelFilter::from_str(&value).ok())
        .or_else(|| LevelFilter::from_str(configured.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

fn working_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Settings file location: `SPF_HUD_SETTINGS` when set, else next to the working directory.
pub fn settings_file_path() -> PathBuf {
    std::env::var("SPF_HUD_SETTINGS")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| working_directory().join(SETTINGS_FILE_NAME))
}

/// Reads settings from `path`.
///
/// A missing file is `Ok(None)`; an unreadable or malformed one is an error message.
pub fn read_settings(path: &Path) -> Result<Option<HudSettings>, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(format!("Failed to read {}: {err}", path.display())),
    };

    serde_json::from_str::<HudSettings>(&raw)
        .map(Some)
        .map_err(|err| format!("Failed to parse HUD settings at {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "spf_hud_settings_{}_{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    /// A settings file that does not exist yields the defaults.
    #[test]
    fn missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("spf_hud_settings_does_not_exist.json");
        assert_eq!(read_settings(&path).unwrap(), None);
    }

    /// Keys missing from the file keep their default values.
    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_file(
            "partial",
            r#"{"project_url": "https://example.org", "initial_panel": "inventory"}"#,
        );
        let settings = read_settings(&path).unwrap().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.project_url, "https://example.org");
        assert_eq!(settings.initial_panel, PanelKind::Inventory);
        assert_eq!(settings.fallback_file_count, 25);
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    }

    /// Malformed JSON is reported with the offending path.
    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_file("malformed", "{ not json");
        let err = read_settings(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.contains("spf_hud_settings_malformed"), "{err}");
    }

    /// Negative or zero durations never produce a stuck timer.
    #[test]
    fn durations_are_clamped() {
        let settings = HudSettings {
            loading_grace_secs: -3.0,
            fallback_tick_ms: 0,
            ..HudSettings::default()
        };
        assert_eq!(settings.loading_grace(), Duration::ZERO);
        assert_eq!(settings.fallback_tick(), Duration::from_millis(1));
    }

    /// The environment override wins over the configured level when it parses.
    #[test]
    fn log_level_prefers_valid_env_value() {
        assert_eq!(log_level_from(Some("debug".into()), "warn"), LevelFilter::Debug);
        assert_eq!(log_level_from(Some("loud".into()), "warn"), LevelFilter::Warn);
        assert_eq!(log_level_from(None, "nonsense"), LevelFilter::Info);
    }
}
