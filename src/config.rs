use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_autosave_interval_seconds")]
    pub autosave_interval_seconds: u64,
}

fn default_autosave_interval_seconds() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Config {
            autosave_interval_seconds: default_autosave_interval_seconds(),
        }
    }
}

impl Config {
    /// Reads the optional settings file. A missing file means defaults; the
    /// file is never created here.
    pub fn load() -> Self {
        match fs::read_to_string(Self::config_path()) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(contents: &str) -> Self {
        toml::from_str::<Config>(contents).unwrap_or_else(|e| {
            warn!(target: "config", error = %e, "malformed config file, using defaults");
            Self::default()
        })
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_seconds.max(1))
    }

    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("smart-notepad");
        path.push("config.toml");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("");
        assert_eq!(config, Config::default());
        assert_eq!(config.autosave_interval(), Duration::from_secs(5));
    }

    #[test]
    fn interval_is_read_from_file() {
        let config = Config::parse("autosave_interval_seconds = 10\n");
        assert_eq!(config.autosave_interval(), Duration::from_secs(10));
    }

    #[test]
    fn malformed_file_falls_back() {
        let config = Config::parse("autosave_interval_seconds = \"soon\"");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = Config::parse("autosave_interval_seconds = 0");
        assert_eq!(config.autosave_interval(), Duration::from_secs(1));
    }
}
