//! Download state tracking.

use std::collections::HashSet;

use crate::download::media::Outcome;
use crate::media::MediaKind;

/// Per-run download state for a chat.
#[derive(Debug, Default)]
pub struct DownloadState {
    // Chat info
    pub chat_id: i64,
    pub chat_name: String,

    /// Total media-bearing messages in the chat (pre-counted).
    pub total_files: u64,

    /// Message IDs downloaded successfully this run.
    pub downloaded_ids: HashSet<i32>,

    /// Message IDs that exhausted their attempts this run.
    pub failed_ids: Vec<i32>,

    /// Highest message ID processed so far (any outcome).
    pub last_processed_id: i32,

    // Statistics
    pub photo_count: u64,
    pub video_count: u64,
    pub audio_count: u64,
    pub voice_count: u64,
    pub document_count: u64,
    pub skipped_count: u64,
}

impl DownloadState {
    /// Create a new download state for a chat.
    pub fn new(chat_id: i64, chat_name: String) -> Self {
        Self {
            chat_id,
            chat_name,
            ..Default::default()
        }
    }

    /// Fold a per-message outcome into the state.
    pub fn apply(&mut self, outcome: &Outcome) {
        self.last_processed_id = self.last_processed_id.max(outcome.message_id());

        match outcome {
            Outcome::Downloaded { message_id, kind, .. } => {
                self.downloaded_ids.insert(*message_id);
                self.increment(*kind);
            }
            Outcome::Skipped { .. } => {
                self.skipped_count += 1;
            }
            Outcome::NoMedia { .. } => {}
            Outcome::Failed { message_id } => {
                self.failed_ids.push(*message_id);
            }
        }
    }

    /// Increment the counter for a media type.
    pub fn increment(&mut self, kind: MediaKind) {
        match kind {
            MediaKind::Photo => self.photo_count += 1,
            MediaKind::Video => self.video_count += 1,
            MediaKind::Audio => self.audio_count += 1,
            MediaKind::Voice => self.voice_count += 1,
            MediaKind::Document => self.document_count += 1,
        }
    }

    /// Get total downloaded count.
    pub fn total_downloaded(&self) -> u64 {
        self.photo_count + self.video_count + self.audio_count + self.voice_count
            + self.document_count
    }

    /// Number of distinct failed message IDs.
    pub fn failed_count(&self) -> usize {
        let unique: HashSet<i32> = self.failed_ids.iter().copied().collect();
        unique.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_apply_downloaded() {
        let mut state = DownloadState::new(1, "test".to_string());

        state.apply(&Outcome::Downloaded {
            message_id: 10,
            kind: MediaKind::Photo,
            path: PathBuf::from("downloads/1/photo/10_x.jpg"),
        });
        state.apply(&Outcome::Downloaded {
            message_id: 12,
            kind: MediaKind::Video,
            path: PathBuf::from("downloads/1/video/12_x.mp4"),
        });

        assert_eq!(state.photo_count, 1);
        assert_eq!(state.video_count, 1);
        assert_eq!(state.total_downloaded(), 2);
        assert!(state.downloaded_ids.contains(&10));
        assert_eq!(state.last_processed_id, 12);
    }

    #[test]
    fn test_cursor_advances_past_failures() {
        let mut state = DownloadState::new(1, "test".to_string());

        state.apply(&Outcome::Failed { message_id: 99 });
        state.apply(&Outcome::NoMedia { message_id: 100 });

        // Failed messages are queued for retry, not re-read from history
        assert_eq!(state.last_processed_id, 100);
        assert_eq!(state.failed_ids, vec![99]);
        assert!(state.downloaded_ids.is_empty());
    }

    #[test]
    fn test_failed_count_deduplicates() {
        let mut state = DownloadState::new(1, "test".to_string());
        state.apply(&Outcome::Failed { message_id: 7 });
        state.apply(&Outcome::Failed { message_id: 7 });
        assert_eq!(state.failed_count(), 1);
    }
}
