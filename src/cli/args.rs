//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Config;
use crate::media::MediaKind;

/// Telegram chat media downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "tgmd",
    version,
    about = "Download media from Telegram chats",
    long_about = "A CLI tool to download photos, videos, audio and documents from a Telegram chat.\n\n\
                  Downloads resume from where the previous run stopped; failed downloads are\n\
                  retried automatically on the next run."
)]
pub struct Args {
    /// Chat to download from: numeric ID, @username, or t.me link.
    #[arg(short = 't', long)]
    pub chat: Option<String>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Telegram API ID (from my.telegram.org).
    #[arg(long, env = "TG_API_ID")]
    pub api_id: Option<i32>,

    /// Telegram API hash (from my.telegram.org).
    #[arg(long, env = "TG_API_HASH")]
    pub api_hash: Option<String>,

    /// Path to the MTProto session file.
    #[arg(long)]
    pub session_file: Option<PathBuf>,

    /// Media types to download.
    #[arg(long = "media-type", value_enum, num_args = 1..)]
    pub media_types: Option<Vec<MediaTypeArg>>,

    /// Messages downloaded concurrently as one batch.
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Download attempts per message before it is marked failed.
    #[arg(long)]
    pub retries: Option<u32>,

    /// Skip size verification of downloaded files.
    #[arg(long)]
    pub no_verify_sizes: bool,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Show information about skipped downloads.
    #[arg(long)]
    pub show_skipped: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI media type argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MediaTypeArg {
    /// Photos and images sent as files.
    Photo,
    /// Videos and video notes.
    Video,
    /// Music and other named audio files.
    Audio,
    /// Voice messages.
    Voice,
    /// Everything else sent as a file.
    Document,
}

impl From<MediaTypeArg> for MediaKind {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::Photo => MediaKind::Photo,
            MediaTypeArg::Video => MediaKind::Video,
            MediaTypeArg::Audio => MediaKind::Audio,
            MediaTypeArg::Voice => MediaKind::Voice,
            MediaTypeArg::Document => MediaKind::Document,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(chat) = &self.chat {
            config.target.chat = chat.clone();
        }

        if let Some(api_id) = self.api_id {
            config.account.api_id = api_id;
        }

        if let Some(api_hash) = &self.api_hash {
            config.account.api_hash = api_hash.clone();
        }

        if let Some(session_file) = &self.session_file {
            config.account.session_file = session_file.clone();
        }

        if let Some(dir) = &self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if let Some(types) = &self.media_types {
            config.options.media_types = types.iter().map(|t| MediaKind::from(*t)).collect();
        }

        if let Some(batch_size) = self.batch_size {
            config.options.batch_size = batch_size;
        }

        if let Some(retries) = self.retries {
            config.options.download_retries = retries;
        }

        if self.no_verify_sizes {
            config.options.verify_sizes = false;
        }

        if self.quiet {
            config.options.show_downloads = false;
            config.options.show_skipped_downloads = false;
        }

        if self.show_skipped {
            config.options.show_skipped_downloads = true;
        }
    }
}
