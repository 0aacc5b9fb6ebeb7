use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::sequencer::{SequenceConfig, DEFAULT_SWITCH_PROBABILITY, DEFAULT_TRIAL_COUNT};
use crate::session::DEFAULT_FEEDBACK_DELAY_MS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub trial_count: usize,
    pub switch_probability: f64,
    pub feedback_delay_ms: u64,
    pub allow_word_repeats: bool,
    /// flag switch trials with a "RULE CHANGE!" cue
    pub show_switch_cue: bool,
    pub skip_practice: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trial_count: DEFAULT_TRIAL_COUNT,
            switch_probability: DEFAULT_SWITCH_PROBABILITY,
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
            allow_word_repeats: true,
            show_switch_cue: true,
            skip_practice: false,
        }
    }
}

impl Config {
    pub fn sequence_config(&self) -> SequenceConfig {
        SequenceConfig {
            trial_count: self.trial_count,
            switch_probability: self.switch_probability,
            allow_word_repeats: self.allow_word_repeats,
            ..SequenceConfig::default()
        }
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    pub fn validate(&self, vocabulary_size: usize) -> Result<()> {
        self.sequence_config().validate(vocabulary_size)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("catswitch_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            trial_count: 48,
            switch_probability: 0.5,
            feedback_delay_ms: 250,
            allow_word_repeats: false,
            show_switch_cue: false,
            skip_practice: true,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "trial_count": 12 }"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.trial_count, 12);
        assert_eq!(loaded.switch_probability, 0.35);
        assert_eq!(loaded.feedback_delay_ms, 500);
    }

    #[test]
    fn defaults_match_paradigm() {
        let cfg = Config::default();
        assert_eq!(cfg.trial_count, 30);
        assert_eq!(cfg.switch_probability, 0.35);
        assert_eq!(cfg.feedback_delay(), Duration::from_millis(500));
        assert!(cfg.validate(24).is_ok());
    }

    #[test]
    fn validate_rejects_exhausted_vocabulary() {
        let cfg = Config {
            allow_word_repeats: false,
            ..Config::default()
        };
        assert_matches!(cfg.validate(24), Err(Error::Config(_)));
    }
}
