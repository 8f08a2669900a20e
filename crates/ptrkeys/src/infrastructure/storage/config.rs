//! TOML settings file.
//!
//! Read from `$XDG_CONFIG_HOME/ptrkeys/config.toml` (or
//! `~/.config/ptrkeys/config.toml`). Every field has a serde default, so a
//! missing file or a partial file works; `Settings::default()` is the
//! compiled-in configuration.
//!
//! ```toml
//! [engine]
//! fps = 60
//! base_speed = 1000.0
//! base_scroll = 14.0
//! internal_mods = ["Shift", "Control", "Mod1"]
//! log_level = "info"
//!
//! [grab]
//! retry_interval_ms = 10
//! retry_timeout_ms = 200
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ptrkeys_core::ModMask;

use crate::application::engine::EngineTuning;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config base directory could not be determined.
    #[error("could not determine config directory (HOME and XDG_CONFIG_HOME unset)")]
    NoConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// An internal_mods entry is not a known modifier name.
    #[error("unknown modifier name {0:?} in internal_mods")]
    UnknownModifier(String),
}

// ── Settings schema ───────────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub grab: GrabSettings,
}

/// Rates, internal modifiers, and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    /// Integration ticks per second while movement is active.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Pointer speed in pixels per second.
    #[serde(default = "default_base_speed")]
    pub base_speed: f64,
    /// Scroll rate in events per second.
    #[serde(default = "default_base_scroll")]
    pub base_scroll: f64,
    /// Modifier bits suppressed while the keyboard is grabbed, as names:
    /// `"Shift"`, `"Lock"`, `"Control"`, `"Mod1"` .. `"Mod5"`.
    #[serde(default = "default_internal_mods")]
    pub internal_mods: Vec<String>,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Keyboard-grab retry policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrabSettings {
    /// Pause between grab attempts while the keyboard is busy.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
    /// Total time to keep retrying before giving up.
    #[serde(default = "default_retry_timeout_ms")]
    pub retry_timeout_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_fps() -> u32 {
    60
}
fn default_base_speed() -> f64 {
    1000.0
}
fn default_base_scroll() -> f64 {
    14.0
}
fn default_internal_mods() -> Vec<String> {
    vec!["Shift".to_string(), "Control".to_string(), "Mod1".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_retry_interval_ms() -> u64 {
    10
}
fn default_retry_timeout_ms() -> u64 {
    200
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            base_speed: default_base_speed(),
            base_scroll: default_base_scroll(),
            internal_mods: default_internal_mods(),
            log_level: default_log_level(),
        }
    }
}

impl Default for GrabSettings {
    fn default() -> Self {
        Self {
            retry_interval_ms: default_retry_interval_ms(),
            retry_timeout_ms: default_retry_timeout_ms(),
        }
    }
}

impl Settings {
    /// Translates the settings into the engine's tuning parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownModifier`] for an unrecognised name in
    /// `internal_mods`; a typo silently dropping a suppressed modifier
    /// would leak modifier state into injected events.
    pub fn tuning(&self) -> Result<EngineTuning, ConfigError> {
        Ok(EngineTuning {
            base_speed: self.engine.base_speed,
            base_scroll: self.engine.base_scroll,
            internal_mods: parse_mods(&self.engine.internal_mods)?,
            grab_retry_interval: Duration::from_millis(self.grab.retry_interval_ms),
            grab_retry_timeout: Duration::from_millis(self.grab.retry_timeout_ms),
        })
    }
}

fn parse_mods(names: &[String]) -> Result<ModMask, ConfigError> {
    let mut mask = ModMask::NONE;
    for name in names {
        let bit = match name.as_str() {
            "Shift" => ModMask::SHIFT,
            "Lock" => ModMask::LOCK,
            "Control" => ModMask::CONTROL,
            "Mod1" => ModMask::MOD1,
            "Mod2" => ModMask::MOD2,
            "Mod3" => ModMask::MOD3,
            "Mod4" => ModMask::MOD4,
            "Mod5" => ModMask::MOD5,
            _ => return Err(ConfigError::UnknownModifier(name.clone())),
        };
        mask = mask | bit;
    }
    Ok(mask)
}

// ── Settings file access ──────────────────────────────────────────────────────

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] when neither `XDG_CONFIG_HOME` nor
/// `HOME` is set.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("ptrkeys").join("config.toml"))
}

/// Loads settings from disk, returning `Settings::default()` if the file
/// does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not
/// found", and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_matches_compiled_in_rates() {
        let settings = Settings::default();
        assert_eq!(settings.engine.fps, 60);
        assert_eq!(settings.engine.base_speed, 1000.0);
        assert_eq!(settings.engine.base_scroll, 14.0);
        assert_eq!(settings.grab.retry_interval_ms, 10);
        assert_eq!(settings.grab.retry_timeout_ms, 200);
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let settings: Settings = toml::from_str("").expect("deserialize empty");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_deserialize_partial_engine_section_overrides_defaults() {
        let toml_str = r#"
[engine]
base_speed = 500.0
"#;
        let settings: Settings = toml::from_str(toml_str).expect("deserialize partial");
        assert_eq!(settings.engine.base_speed, 500.0);
        assert_eq!(settings.engine.fps, 60);
        assert_eq!(settings.grab.retry_timeout_ms, 200);
    }

    #[test]
    fn test_deserialize_invalid_toml_is_a_parse_error() {
        let result: Result<Settings, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_tuning_parses_default_internal_mods() {
        let tuning = Settings::default().tuning().expect("valid defaults");
        assert_eq!(
            tuning.internal_mods,
            ModMask::SHIFT | ModMask::CONTROL | ModMask::MOD1
        );
        assert_eq!(tuning.grab_retry_interval, Duration::from_millis(10));
        assert_eq!(tuning.grab_retry_timeout, Duration::from_millis(200));
    }

    #[test]
    fn test_tuning_rejects_unknown_modifier_name() {
        let mut settings = Settings::default();
        settings.engine.internal_mods = vec!["Sfhit".to_string()];
        let result = settings.tuning();
        assert!(matches!(result, Err(ConfigError::UnknownModifier(name)) if name == "Sfhit"));
    }

    #[test]
    fn test_tuning_accepts_every_modifier_name() {
        let mut settings = Settings::default();
        settings.engine.internal_mods = ["Shift", "Lock", "Control", "Mod1", "Mod2", "Mod3", "Mod4", "Mod5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(settings.tuning().expect("all names valid").internal_mods, ModMask(0xff));
    }

    #[test]
    fn test_config_file_path_ends_with_ptrkeys_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(path.ends_with("ptrkeys/config.toml"), "got {path:?}");
        }
        // NoConfigDir in a stripped environment is also acceptable.
    }

    #[test]
    fn test_settings_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.engine.fps = 120;
        settings.engine.log_level = "trace".to_string();
        let text = toml::to_string(&settings).expect("serialize");
        let restored: Settings = toml::from_str(&text).expect("deserialize");
        assert_eq!(settings, restored);
    }
}
