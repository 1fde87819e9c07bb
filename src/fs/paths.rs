//! Path and directory management.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::media::MediaKind;

/// Directory for a chat's downloads: `{downloads}/{chat_id}`.
pub fn chat_dir(config: &Config, chat_id: i64) -> PathBuf {
    config.download_directory().join(chat_id.to_string())
}

/// Directory for a media item: `{downloads}/{chat_id}/{media_kind}`.
pub fn media_dir(config: &Config, chat_id: i64, kind: MediaKind) -> PathBuf {
    chat_dir(config, chat_id).join(kind.folder_name())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &PathBuf) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
