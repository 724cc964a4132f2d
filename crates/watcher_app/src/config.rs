use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use watcher_engine::{ConfigError, ConfigSource, FetchSettings, PollConfig};

pub const DEFAULT_REFRESH_MINUTES: u64 = 5;

/// Either a single URL or a list; older option files stored a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceList {
    One(String),
    Many(Vec<String>),
}

impl Default for SourceList {
    fn default() -> Self {
        SourceList::Many(Vec::new())
    }
}

impl SourceList {
    pub fn urls(&self) -> Vec<String> {
        match self {
            SourceList::One(url) => vec![url.clone()],
            SourceList::Many(urls) => urls.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub jenkins_urls: SourceList,
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_refresh_minutes() -> u64 {
    DEFAULT_REFRESH_MINUTES
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jenkins_urls: SourceList::default(),
            refresh_minutes: DEFAULT_REFRESH_MINUTES,
            state_dir: default_state_dir(),
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: AppConfig = ron::from_str(&raw)
            .with_context(|| format!("parsing RON config: {}", path.display()))?;
        Ok(cfg)
    }

    pub fn poll_config(&self) -> PollConfig {
        let minutes = if self.refresh_minutes == 0 {
            DEFAULT_REFRESH_MINUTES
        } else {
            self.refresh_minutes
        };
        let sources = self
            .jenkins_urls
            .urls()
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .collect();
        PollConfig::new(sources, Duration::from_secs(minutes * 60))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let mut settings = FetchSettings::default();
        if let Some(secs) = self.request_timeout_secs.filter(|secs| *secs > 0) {
            settings.request_timeout = Duration::from_secs(secs);
        }
        settings
    }
}

/// Re-reads the options file at the start of every cycle so edits apply
/// without a restart.
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<PollConfig, ConfigError> {
        AppConfig::load(&self.path)
            .map(|cfg| cfg.poll_config())
            .map_err(|err| ConfigError::Invalid(format!("{err:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_of_sources() {
        let cfg: AppConfig = ron::from_str(
            r#"(
                jenkins_urls: ["https://a.example.com", "https://b.example.com"],
                refresh_minutes: 2,
                state_dir: "/tmp/watcher",
            )"#,
        )
        .unwrap();

        let poll = cfg.poll_config();
        assert_eq!(poll.sources.len(), 2);
        assert_eq!(poll.refresh_interval, Duration::from_secs(120));
        assert_eq!(cfg.state_dir, PathBuf::from("/tmp/watcher"));
    }

    #[test]
    fn accepts_single_source_string() {
        let cfg: AppConfig = ron::from_str(r#"(jenkins_urls: "https://a.example.com")"#).unwrap();
        assert_eq!(cfg.poll_config().sources, vec!["https://a.example.com"]);
        assert_eq!(cfg.refresh_minutes, DEFAULT_REFRESH_MINUTES);
    }

    #[test]
    fn zero_refresh_falls_back_to_default() {
        let cfg = AppConfig {
            refresh_minutes: 0,
            ..AppConfig::default()
        };
        assert_eq!(
            cfg.poll_config().refresh_interval,
            Duration::from_secs(DEFAULT_REFRESH_MINUTES * 60)
        );
    }

    #[test]
    fn empty_configuration_fails_validation() {
        let poll = AppConfig::default().poll_config();
        assert_eq!(poll.validate(), Err(ConfigError::NoSources));
    }

    #[test]
    fn missing_file_is_reported_as_invalid() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = FileConfigSource::new(temp.path().join("missing.ron"));
        assert!(matches!(source.load(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn file_source_reads_current_content() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("watcher.ron");
        std::fs::write(&path, r#"(jenkins_urls: ["https://a.example.com"])"#).unwrap();
        let source = FileConfigSource::new(path.clone());
        assert_eq!(source.load().unwrap().sources.len(), 1);

        std::fs::write(&path, r#"(jenkins_urls: [])"#).unwrap();
        assert!(source.load().unwrap().sources.is_empty());
    }

    #[test]
    fn request_timeout_overrides_default() {
        let cfg = AppConfig {
            request_timeout_secs: Some(3),
            ..AppConfig::default()
        };
        assert_eq!(cfg.fetch_settings().request_timeout, Duration::from_secs(3));
    }
}
