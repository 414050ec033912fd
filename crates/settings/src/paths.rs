//! Application directories for gridmux.
//!
//! Lazily initialized and cached for the life of the process.

use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static LOGS_DIR: OnceLock<PathBuf> = OnceLock::new();

/// ~/.config/gridmux (or platform equivalent)
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridmux")
    })
}

/// ~/.local/share/gridmux (or platform equivalent)
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridmux")
    })
}

/// Log directory, under the data dir on every platform.
pub fn logs_dir() -> &'static PathBuf {
    LOGS_DIR.get_or_init(|| data_dir().join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_end_with_app_name() {
        assert!(config_dir().ends_with("gridmux"));
        assert!(data_dir().ends_with("gridmux"));
    }

    #[test]
    fn test_logs_dir_nests_under_data_dir() {
        assert!(logs_dir().starts_with(data_dir()));
    }
}
