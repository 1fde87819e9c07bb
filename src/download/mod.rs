//! Download module for chat media downloading.
//!
//! This module provides:
//! - Download state tracking
//! - History collection and batch processing
//! - Per-message media downloading with retry and size verification
//! - Media pre-counting for progress reporting

pub mod history;
pub mod media;
pub mod state;

pub use history::{count_media_messages, run_download};
pub use media::{download_message_media, Outcome};
pub use state::DownloadState;
