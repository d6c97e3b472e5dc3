//! Engine configuration from the environment.

use crate::db::DEFAULT_CACHE_TTL;
use std::path::PathBuf;
use std::time::Duration;

/// Database file inside the data directory.
pub const DB_FILE_NAME: &str = "lernpfad.db";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Directory holding the learner database.
    pub data_dir: PathBuf,
    /// Root of the static content tree.
    pub content_dir: PathBuf,
    pub cache_ttl: Duration,
    /// Hour (0-23) at which a new study day begins.
    pub daily_reset_hour: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("lernpfad"),
            content_dir: PathBuf::from("content"),
            cache_ttl: DEFAULT_CACHE_TTL,
            daily_reset_hour: 0,
        }
    }
}

impl EngineConfig {
    /// Read overrides from the environment, loading `.env` first if present.
    ///
    /// - LERNPFAD_DATA_DIR: database directory
    /// - LERNPFAD_CONTENT_DIR: static content root
    /// - LERNPFAD_CACHE_TTL_MS: collection cache lifetime
    /// - LERNPFAD_DAILY_RESET_HOUR: start of the study day
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("LERNPFAD_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("LERNPFAD_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("LERNPFAD_CACHE_TTL_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.cache_ttl = Duration::from_millis(ms),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid LERNPFAD_CACHE_TTL_MS"),
            }
        }
        if let Some(raw) = lookup("LERNPFAD_DAILY_RESET_HOUR") {
            match raw.trim().parse::<u32>() {
                Ok(hour) if hour < 24 => config.daily_reset_hour = hour,
                _ => tracing::warn!(value = %raw, "ignoring invalid LERNPFAD_DAILY_RESET_HOUR"),
            }
        }

        config
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
        assert_eq!(config.daily_reset_hour, 0);
        assert!(config.db_path().ends_with("lernpfad/lernpfad.db"));
    }

    #[test]
    fn env_overrides() {
        let config = config_from(&[
            ("LERNPFAD_DATA_DIR", "/tmp/lp"),
            ("LERNPFAD_CONTENT_DIR", "/srv/content"),
            ("LERNPFAD_CACHE_TTL_MS", "250"),
            ("LERNPFAD_DAILY_RESET_HOUR", "4"),
        ]);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/lp/lernpfad.db"));
        assert_eq!(config.content_dir, PathBuf::from("/srv/content"));
        assert_eq!(config.cache_ttl, Duration::from_millis(250));
        assert_eq!(config.daily_reset_hour, 4);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("LERNPFAD_CACHE_TTL_MS", "soon"),
            ("LERNPFAD_DAILY_RESET_HOUR", "25"),
        ]);
        assert_eq!(config.cache_ttl, DEFAULT_CACHE_TTL);
        assert_eq!(config.daily_reset_hour, 0);
    }
}
