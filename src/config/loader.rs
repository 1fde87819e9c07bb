//! Configuration structures and loading logic.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::media::MediaKind;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub state: StateConfig,
}

/// Telegram API credentials configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Telegram API ID from my.telegram.org.
    #[serde(default)]
    pub api_id: i32,

    /// Telegram API hash from my.telegram.org.
    #[serde(default)]
    pub api_hash: String,

    /// Path to the MTProto session file.
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

/// Target chat configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Chat to download from: numeric ID, @username, or t.me link.
    #[serde(default)]
    pub chat: String,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Media types to download.
    #[serde(default = "default_media_types")]
    pub media_types: Vec<MediaKind>,

    /// Per-type file format allow-lists.
    #[serde(default)]
    pub file_formats: FormatFilters,

    /// Number of messages downloaded concurrently as one batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Download attempts per message before it is marked failed.
    #[serde(default = "default_download_retries")]
    pub download_retries: u32,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Whether to show skipped downloads.
    #[serde(default = "default_true")]
    pub show_skipped_downloads: bool,

    /// Whether to verify downloaded file sizes against the expected size.
    #[serde(default = "default_true")]
    pub verify_sizes: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            media_types: default_media_types(),
            file_formats: FormatFilters::default(),
            batch_size: default_batch_size(),
            download_retries: default_download_retries(),
            show_downloads: true,
            show_skipped_downloads: true,
            verify_sizes: true,
        }
    }
}

/// File format allow-lists for the filterable media types.
///
/// A list containing `"all"` passes every format. Formats are MIME subtypes
/// (e.g. `mp4`, `mpeg`, `pdf`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatFilters {
    #[serde(default = "default_all")]
    pub audio: Vec<String>,

    #[serde(default = "default_all")]
    pub document: Vec<String>,

    #[serde(default = "default_all")]
    pub video: Vec<String>,
}

impl Default for FormatFilters {
    fn default() -> Self {
        Self {
            audio: default_all(),
            document: default_all(),
            video: default_all(),
        }
    }
}

impl FormatFilters {
    /// Check whether a file format passes the filter for a media type.
    ///
    /// Only audio, document and video are filterable; every other type
    /// always passes.
    pub fn allows(&self, kind: MediaKind, format: Option<&str>) -> bool {
        let allowed = match kind {
            MediaKind::Audio => &self.audio,
            MediaKind::Document => &self.document,
            MediaKind::Video => &self.video,
            _ => return true,
        };

        if allowed.first().map(|f| f == "all").unwrap_or(false) {
            return true;
        }

        match format {
            Some(format) => allowed.iter().any(|f| f == format),
            None => false,
        }
    }
}

/// Persistent download state, written back after every batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateConfig {
    /// ID of the newest message already processed.
    #[serde(default)]
    pub last_read_message_id: i32,

    /// Message IDs to re-attempt before reading new history.
    #[serde(default)]
    pub ids_to_retry: Vec<i32>,
}

fn default_session_file() -> PathBuf {
    PathBuf::from("tgmd.session")
}

fn default_media_types() -> Vec<MediaKind> {
    vec![
        MediaKind::Photo,
        MediaKind::Video,
        MediaKind::Audio,
        MediaKind::Voice,
        MediaKind::Document,
    ]
}

fn default_all() -> Vec<String> {
    vec!["all".to_string()]
}

fn default_batch_size() -> usize {
    100
}

fn default_download_retries() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Save the config and drop a snapshot copy into the chat directory,
    /// so a download folder carries the settings it was produced with.
    pub fn save_with_snapshot(&self, path: &Path, chat_dir: &Path) -> Result<()> {
        self.save(path)?;
        fs::create_dir_all(chat_dir)?;
        fs::copy(path, chat_dir.join("config.toml"))?;
        Ok(())
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("downloads"))
    }

    /// Recompute the retry list at the end of a run.
    ///
    /// IDs that downloaded successfully leave the list; IDs that failed
    /// this run join it. The result is sorted and deduplicated.
    pub fn update_retry_ids(&mut self, downloaded: &HashSet<i32>, failed: &[i32]) {
        let mut ids: Vec<i32> = self
            .state
            .ids_to_retry
            .iter()
            .copied()
            .filter(|id| !downloaded.contains(id))
            .chain(failed.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        self.state.ids_to_retry = ids;
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            api_id: 0,
            api_hash: String::new(),
            session_file: default_session_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.options.batch_size, 100);
        assert_eq!(config.options.download_retries, 3);
        assert!(config.options.verify_sizes);
        assert_eq!(config.options.media_types.len(), 5);
        assert_eq!(config.download_directory(), PathBuf::from("downloads"));
        assert_eq!(config.state.last_read_message_id, 0);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            [account]
            api_id = 12345
            api_hash = "0123456789abcdef0123456789abcdef"

            [target]
            chat = "@rustlang"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.account.api_id, 12345);
        assert_eq!(config.target.chat, "@rustlang");
        assert_eq!(config.account.session_file, PathBuf::from("tgmd.session"));
        assert!(config.state.ids_to_retry.is_empty());
    }

    #[test]
    fn test_format_filter_all() {
        let filters = FormatFilters::default();
        assert!(filters.allows(MediaKind::Video, Some("mp4")));
        assert!(filters.allows(MediaKind::Audio, None));
        assert!(filters.allows(MediaKind::Photo, None));
    }

    #[test]
    fn test_format_filter_specific() {
        let filters = FormatFilters {
            video: vec!["mp4".to_string(), "webm".to_string()],
            ..Default::default()
        };
        assert!(filters.allows(MediaKind::Video, Some("mp4")));
        assert!(!filters.allows(MediaKind::Video, Some("mkv")));
        assert!(!filters.allows(MediaKind::Video, None));
        // Other types keep their own lists
        assert!(filters.allows(MediaKind::Audio, Some("mpeg")));
    }

    #[test]
    fn test_update_retry_ids() {
        let mut config = Config::default();
        config.state.ids_to_retry = vec![10, 20, 30];

        let downloaded: HashSet<i32> = [10, 30].into_iter().collect();
        config.update_retry_ids(&downloaded, &[40, 20]);

        assert_eq!(config.state.ids_to_retry, vec![20, 40]);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.account.api_id = 777;
        config.state.last_read_message_id = 42;
        config.save(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.account.api_id, 777);
        assert_eq!(reloaded.state.last_read_message_id, 42);
    }

    #[test]
    fn test_snapshot_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let chat_dir = dir.path().join("downloads").join("123");

        let config = Config::default();
        config.save_with_snapshot(&path, &chat_dir).unwrap();

        assert!(chat_dir.join("config.toml").exists());
    }
}
