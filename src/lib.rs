//! Telegram Media Downloader - download media from Telegram chats.
//!
//! This library provides functionality for downloading photos, videos,
//! audio and documents from a Telegram chat via MTProto.
//!
//! # Features
//!
//! - Resumable chat history downloads (cursor persisted between runs)
//! - Message-ID-prefixed filenames, one subfolder per media type
//! - Size verification with automatic retry queueing
//! - Pre-count of available media for progress reporting
//! - Media type and file format filtering
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use telegram_media_downloader::{Config, Telegram};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let telegram = Telegram::connect(&config).await?;
//!
//!     // ... download logic
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use client::Telegram;
pub use config::{ChatRef, Config};
pub use download::{run_download, DownloadState};
pub use error::{Error, Result};
pub use media::{MediaItem, MediaKind};
