//! Default paths for journal-jackpot
//!
//! Paths are user-writable (no root required):
//! - Data: `$XDG_DATA_HOME/journal-jackpot` or `~/.local/share/journal-jackpot`
//! - Config: `$XDG_CONFIG_HOME/journal-jackpot/config.toml` or `~/.config/journal-jackpot/config.toml`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const JACKPOT_DATA_DIR_ENV: &str = "JACKPOT_DATA_DIR";

/// Database filename within the data directory
pub const DATABASE_FILENAME: &str = "jackpot.db";

/// Application subdirectory name
const APP_DIR: &str = "journal-jackpot";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$JACKPOT_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/journal-jackpot` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/journal-jackpot` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(JACKPOT_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking the JACKPOT_DATA_DIR env var.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home)
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Database path inside a data directory
pub fn database_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(DATABASE_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_contains_app_dir() {
        let path = data_dir_without_env();
        assert!(path.to_string_lossy().contains("journal-jackpot"));
    }

    #[test]
    fn config_path_is_toml() {
        let path = default_config_path();
        assert!(path.to_string_lossy().contains("journal-jackpot"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
    }

    #[test]
    fn database_lives_in_data_dir() {
        let dir = PathBuf::from("/var/lib/jackpot");
        assert_eq!(database_path(&dir), dir.join("jackpot.db"));
    }
}
