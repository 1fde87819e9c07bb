//! Per-message media downloading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use grammers_client::types::{Chat, Message};
use tokio::time::sleep;

use crate::client::Telegram;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fs::naming::make_unique_filename;
use crate::fs::paths::media_dir;
use crate::media::{media_item, MediaItem, MediaKind};

/// Files below this size pass verification but are logged.
const SMALL_FILE_WARN_BYTES: u64 = 512;

/// Seconds to wait before retrying after a transient error.
const RETRY_DELAY_SECS: u64 = 5;

/// Result of processing one message.
#[derive(Debug)]
pub enum Outcome {
    /// Media downloaded and verified.
    Downloaded {
        message_id: i32,
        kind: MediaKind,
        path: PathBuf,
    },
    /// Media filtered out by type or format configuration.
    Skipped { message_id: i32 },
    /// Message carries no downloadable media.
    NoMedia { message_id: i32 },
    /// All attempts exhausted; queued for retry on the next run.
    Failed { message_id: i32 },
}

impl Outcome {
    /// The message this outcome belongs to.
    pub fn message_id(&self) -> i32 {
        match self {
            Outcome::Downloaded { message_id, .. }
            | Outcome::Skipped { message_id }
            | Outcome::NoMedia { message_id }
            | Outcome::Failed { message_id } => *message_id,
        }
    }
}

/// Download the media of a single message, retrying transient failures.
pub async fn download_message_media(
    telegram: &Telegram,
    config: &Config,
    chat: &Chat,
    message: Message,
    total_files: u64,
) -> Outcome {
    let message_id = message.id();
    let mut message = message;
    let attempts = config.options.download_retries.max(1);

    let item = match media_item(&message) {
        Some(item) => item,
        None => return Outcome::NoMedia { message_id },
    };

    if !config.options.media_types.contains(&item.kind)
        || !config.options.file_formats.allows(item.kind, item.format())
    {
        if config.options.show_skipped_downloads {
            tracing::debug!(
                "Skipping message {}: {} filtered out by configuration",
                message_id,
                item.kind
            );
        }
        return Outcome::Skipped { message_id };
    }

    for attempt in 1..=attempts {
        match try_download(config, chat, &message, &item).await {
            Ok(path) => {
                if config.options.show_downloads {
                    tracing::info!(
                        "Downloaded successfully - {} (Message ID: {}, Total Files: {})",
                        path.display(),
                        message_id,
                        total_files
                    );
                }
                return Outcome::Downloaded {
                    message_id,
                    kind: item.kind,
                    path,
                };
            }
            // Size failures are not retried in-run; the ID goes to the retry list
            Err(e @ (Error::SizeMismatch { .. } | Error::EmptyFile(_))) => {
                tracing::error!(
                    "Download failed - Message ID: {} (Chat ID: {}): {}",
                    message_id,
                    chat.id(),
                    e
                );
                return Outcome::Failed { message_id };
            }
            Err(e) if attempt == attempts => {
                tracing::error!(
                    "Download failed - Message ID: {} after {} attempts: {}",
                    message_id,
                    attempts,
                    e
                );
                return Outcome::Failed { message_id };
            }
            Err(e) => {
                let text = e.to_string();
                if text.contains("FILE_REFERENCE") {
                    // Expired file reference; a fresh copy of the message carries a new one
                    tracing::debug!(
                        "File reference expired for message {}, re-fetching",
                        message_id
                    );
                    match telegram.refetch_message(chat, message_id).await {
                        Ok(Some(fresh)) => message = fresh,
                        Ok(None) => {
                            tracing::error!(
                                "Download failed - Message ID: {} (message deleted)",
                                message_id
                            );
                            return Outcome::Failed { message_id };
                        }
                        Err(e) => {
                            tracing::error!(
                                "Download failed - Message ID: {} (re-fetch error: {})",
                                message_id,
                                e
                            );
                            return Outcome::Failed { message_id };
                        }
                    }
                } else {
                    tracing::debug!(
                        "Transient error for message {} (attempt {}/{}): {}",
                        message_id,
                        attempt,
                        attempts,
                        e
                    );
                    sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
                }
            }
        }
    }

    Outcome::Failed { message_id }
}

/// One download attempt: resolve the path, fetch, verify.
async fn try_download(
    config: &Config,
    chat: &Chat,
    message: &Message,
    item: &MediaItem,
) -> Result<PathBuf> {
    let target_dir = media_dir(config, chat.id(), item.kind);
    tokio::fs::create_dir_all(&target_dir).await?;

    let filename = item.generate_filename()?;
    let path = make_unique_filename(&target_dir.join(filename));

    message
        .download_media(&path)
        .await
        .map_err(|e| Error::Download(e.to_string()))?;

    verify_download(&path, item.expected_size, config.options.verify_sizes).await?;

    Ok(path)
}

/// Verify a completed download against the expected size.
///
/// Empty files always fail. When verification is enabled and Telegram
/// reported an expected size, the on-disk size must match exactly; the
/// file is removed on mismatch so the retry starts clean.
async fn verify_download(path: &Path, expected: Option<u64>, verify_sizes: bool) -> Result<()> {
    let actual = tokio::fs::metadata(path).await?.len();

    if actual == 0 {
        tokio::fs::remove_file(path).await?;
        return Err(Error::EmptyFile(path.display().to_string()));
    }

    if verify_sizes {
        if let Some(expected) = expected {
            if actual != expected {
                tokio::fs::remove_file(path).await?;
                return Err(Error::SizeMismatch { expected, actual });
            }
        }
    }

    if actual < SMALL_FILE_WARN_BYTES {
        tracing::warn!(
            "File is small but not empty: {} ({} bytes)",
            path.display(),
            actual
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_matching_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        tokio::fs::write(&path, vec![0u8; 1024]).await.unwrap();

        assert!(verify_download(&path, Some(1024), true).await.is_ok());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_verify_size_mismatch_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        tokio::fs::write(&path, vec![0u8; 1000]).await.unwrap();

        let err = verify_download(&path, Some(2048), true).await.unwrap_err();
        assert!(matches!(
            err,
            Error::SizeMismatch {
                expected: 2048,
                actual: 1000
            }
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_verify_empty_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        tokio::fs::write(&path, b"").await.unwrap();

        let err = verify_download(&path, None, false).await.unwrap_err();
        assert!(matches!(err, Error::EmptyFile(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_verify_disabled_ignores_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        tokio::fs::write(&path, vec![0u8; 999]).await.unwrap();

        assert!(verify_download(&path, Some(2048), false).await.is_ok());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_verify_small_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        tokio::fs::write(&path, vec![0u8; 100]).await.unwrap();

        // Small but non-empty files are allowed
        assert!(verify_download(&path, Some(100), true).await.is_ok());
    }
}
