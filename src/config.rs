//! Runtime configuration read from `MUSICPLAYER_*` environment variables

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::source::DEFAULT_API_URL;

pub const API_URL_VAR: &str = "MUSICPLAYER_API_URL";
pub const MUSIC_DIR_VAR: &str = "MUSICPLAYER_MUSIC_DIR";
pub const LOG_DIR_VAR: &str = "MUSICPLAYER_LOG_DIR";
pub const HTTP_TIMEOUT_VAR: &str = "MUSICPLAYER_HTTP_TIMEOUT_SECS";
pub const POLL_INTERVAL_VAR: &str = "MUSICPLAYER_POLL_INTERVAL_MS";

const DEFAULT_LOG_DIR: &str = ".logs";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_POLL_INTERVAL_MS: u64 = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub music_dir: PathBuf,
    pub log_dir: PathBuf,
    pub http_timeout: Duration,
    /// Progress refresh period while playing (~60 Hz by default)
    pub poll_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn log_dir_from_env() -> PathBuf {
        Self::log_dir_from_lookup(|key| std::env::var(key).ok())
    }

    /// Log directory alone, readable before logging is initialised.
    pub fn log_dir_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        lookup(LOG_DIR_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let log_dir = Self::log_dir_from_lookup(&lookup);

        Self {
            api_url: get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            music_dir: get(MUSIC_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(default_music_dir),
            log_dir,
            http_timeout: Duration::from_secs(parse_or(
                HTTP_TIMEOUT_VAR,
                get(HTTP_TIMEOUT_VAR),
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
            poll_interval: Duration::from_millis(parse_or(
                POLL_INTERVAL_VAR,
                get(POLL_INTERVAL_VAR),
                DEFAULT_POLL_INTERVAL_MS,
            )),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Parse a positive number, falling back to `default` with a warning.
fn parse_or<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    let Some(raw) = value else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => parsed,
        _ => {
            tracing::warn!(key, value = %raw, default = %default, "Invalid setting, using default");
            default
        }
    }
}

fn default_music_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
        .unwrap_or_else(|| PathBuf::from("music"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.log_dir, PathBuf::from(".logs"));
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.poll_interval, Duration::from_millis(16));
        assert_eq!(config.music_dir, default_music_dir());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            (API_URL_VAR, "http://localhost:9000"),
            (MUSIC_DIR_VAR, "/srv/music"),
            (LOG_DIR_VAR, "/tmp/logs"),
            (HTTP_TIMEOUT_VAR, "3"),
            (POLL_INTERVAL_VAR, "50"),
        ]);
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.music_dir, PathBuf::from("/srv/music"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.poll_interval, Duration::from_millis(50));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = config_from(&[(HTTP_TIMEOUT_VAR, "soon"), (POLL_INTERVAL_VAR, "0")]);
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.poll_interval, Duration::from_millis(16));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[(API_URL_VAR, "  "), (LOG_DIR_VAR, "")]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.log_dir, PathBuf::from(".logs"));
    }

    #[test]
    fn log_dir_reads_nothing_else() {
        let seen = std::cell::RefCell::new(Vec::new());
        let dir = AppConfig::log_dir_from_lookup(|key| {
            seen.borrow_mut().push(key.to_string());
            (key == LOG_DIR_VAR).then(|| "/var/log/musicplayer".to_string())
        });
        assert_eq!(dir, PathBuf::from("/var/log/musicplayer"));
        assert_eq!(*seen.borrow(), vec![LOG_DIR_VAR.to_string()]);
    }
}
