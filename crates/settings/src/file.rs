//! TOML config file support.
//!
//! Config location: `~/.config/gridmux/config.toml`. Loading never fails:
//! a missing, oversized, or malformed file falls back to defaults with a
//! warning, and out-of-range values are clamped rather than rejected.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants;

/// Layout presets a config file may name.
const KNOWN_PRESETS: [&str; 5] = ["1x1", "2x1", "2x2", "2x3", "3x3"];

/// User-facing config parsed from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Layout preset used for a fresh workspace ("1x1" .. "3x3").
    pub layout_preset: String,
    /// Maximum number of scrollback lines per pane surface.
    pub scrollback_lines: usize,
    /// Trailing debounce for surface re-fit, in milliseconds.
    pub resize_debounce_ms: u64,
    /// Periodic file-browser refresh, in seconds.
    pub file_refresh_secs: u64,
    /// Periodic markdown refresh, in seconds.
    pub markdown_refresh_secs: u64,
    /// Default tracing filter (overridden by RUST_LOG).
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout_preset: "2x2".to_string(),
            scrollback_lines: constants::terminal::SCROLLBACK_LINES,
            resize_debounce_ms: constants::timing::RESIZE_DEBOUNCE.as_millis() as u64,
            file_refresh_secs: constants::timing::FILE_BROWSER_REFRESH.as_secs(),
            markdown_refresh_secs: constants::timing::MARKDOWN_REFRESH.as_secs(),
            log_filter: None,
        }
    }
}

impl Config {
    /// Clamp out-of-range values back to sane ones, warning as we go.
    fn sanitized(mut self) -> Self {
        if !KNOWN_PRESETS.contains(&self.layout_preset.as_str()) {
            tracing::warn!(
                "Unknown layout preset {:?}, falling back to 2x2",
                self.layout_preset
            );
            self.layout_preset = "2x2".to_string();
        }
        if self.scrollback_lines == 0 {
            self.scrollback_lines = constants::terminal::SCROLLBACK_LINES;
        }
        // Zero-interval timers would spin the event loop.
        self.file_refresh_secs = self.file_refresh_secs.max(1);
        self.markdown_refresh_secs = self.markdown_refresh_secs.max(1);
        self
    }
}

/// Path of the config file, `None` if no config dir can be determined.
pub fn config_path() -> Option<PathBuf> {
    Some(crate::paths::config_dir().join("config.toml"))
}

/// Load the config from the default location, falling back to defaults.
pub fn load_config() -> Config {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Config::default(),
    }
}

/// Load a config from an explicit path (testable entry point).
pub fn load_config_from(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config: {}", e);
            }
            return Config::default();
        }
    };

    // Size guard
    if content.len() > constants::settings::MAX_FILE_SIZE as usize {
        tracing::warn!(
            "Config file too large ({} bytes), using defaults",
            content.len()
        );
        return Config::default();
    }

    match toml::from_str::<Config>(&content) {
        Ok(cfg) => cfg.sanitized(),
        Err(e) => {
            tracing::warn!("Failed to parse config.toml: {}", e);
            Config::default()
        }
    }
}

/// Save the config to the default location.
pub fn save_config(config: &Config) -> std::io::Result<()> {
    let Some(path) = config_path() else {
        return Ok(());
    };
    save_config_to(config, &path)
}

/// Save a config to an explicit path via write-then-rename.
pub fn save_config_to(config: &Config, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml"));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn round_trip_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config {
            layout_preset: "2x3".to_string(),
            scrollback_lines: 5000,
            resize_debounce_ms: 50,
            file_refresh_secs: 30,
            markdown_refresh_secs: 2,
            log_filter: Some("gridmux=debug".to_string()),
        };
        save_config_to(&cfg, &path).unwrap();

        assert_eq!(load_config_from(&path), cfg);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "layout-preset = [not toml").unwrap();

        assert_eq!(load_config_from(&path), Config::default());
    }

    #[test]
    fn oversized_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let big = format!("# {}\n", "x".repeat(65 * 1024));
        std::fs::write(&path, big).unwrap();

        assert_eq!(load_config_from(&path), Config::default());
    }

    #[test]
    fn unknown_preset_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "layout-preset = \"9x9\"").unwrap();

        assert_eq!(load_config_from(&path).layout_preset, "2x2");
    }

    #[test]
    fn zero_intervals_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "file-refresh-secs = 0\nmarkdown-refresh-secs = 0\nscrollback-lines = 0",
        )
        .unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.file_refresh_secs, 1);
        assert_eq!(cfg.markdown_refresh_secs, 1);
        assert_eq!(
            cfg.scrollback_lines,
            constants::terminal::SCROLLBACK_LINES
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "layout-preset = \"3x3\"").unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.layout_preset, "3x3");
        assert_eq!(cfg.scrollback_lines, Config::default().scrollback_lines);
    }
}
