//! Media item representation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fs::naming::sanitize_path_component;

/// Type of media content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Voice,
    Document,
}

impl MediaKind {
    /// Get the subfolder name for this media type.
    pub fn folder_name(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::Document => "document",
        }
    }

    /// Default file extension when neither name nor MIME type provide one.
    pub fn default_extension(&self) -> &'static str {
        match self {
            MediaKind::Photo => "jpg",
            MediaKind::Video => "mp4",
            MediaKind::Audio => "mp3",
            MediaKind::Voice => "ogg",
            MediaKind::Document => "bin",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.folder_name())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "photo" => Ok(MediaKind::Photo),
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            "voice" => Ok(MediaKind::Voice),
            "document" => Ok(MediaKind::Document),
            _ => Err(format!("Unknown media type: {}", s)),
        }
    }
}

/// A downloadable media item extracted from a message.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// ID of the message carrying the media.
    pub message_id: i32,

    /// Classified media type.
    pub kind: MediaKind,

    /// Original filename, if Telegram provides one.
    pub file_name: Option<String>,

    /// MIME type, if known.
    pub mime_type: Option<String>,

    /// Expected size in bytes, where Telegram reports one.
    pub expected_size: Option<u64>,

    /// Message date, used for fallback filenames.
    pub date: DateTime<Utc>,
}

impl MediaItem {
    /// The file format used for filtering: the MIME subtype.
    pub fn format(&self) -> Option<&str> {
        self.mime_type.as_deref().and_then(|m| m.split('/').nth(1))
    }

    /// File extension for this item, without the dot.
    ///
    /// Prefers the original filename's extension, then the MIME subtype,
    /// then a per-kind default.
    pub fn extension(&self) -> String {
        if let Some(name) = &self.file_name {
            if let Some(ext) = name.rsplit_once('.').map(|(_, ext)| ext) {
                if !ext.is_empty()
                    && ext.len() <= 10
                    && ext.chars().all(|c| c.is_ascii_alphanumeric())
                {
                    return ext.to_lowercase();
                }
            }
        }

        if let Some(ext) = self.mime_type.as_deref().map(mime_to_extension) {
            if !ext.is_empty() {
                return ext;
            }
        }

        self.kind.default_extension().to_string()
    }

    /// Generate the output filename: `{message_id}_{sanitized_name}.{ext}`.
    ///
    /// Messages without an original filename fall back to
    /// `{message_id}_{kind}_{timestamp}.{ext}`.
    pub fn generate_filename(&self) -> crate::error::Result<String> {
        let extension = self.extension();

        let base = match &self.file_name {
            Some(name) => {
                // Strip the extension before sanitizing; it is re-appended below.
                let stem = name
                    .rsplit_once('.')
                    .map(|(stem, _)| stem)
                    .unwrap_or(name.as_str());
                sanitize_path_component(stem)?
            }
            None => format!(
                "{}_{}",
                self.kind,
                self.date.format("%Y-%m-%dT%H-%M-%S")
            ),
        };

        Ok(format!("{}_{}.{}", self.message_id, base, extension))
    }
}

/// Convert a MIME type to a file extension.
fn mime_to_extension(mimetype: &str) -> String {
    match mimetype {
        // Images
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",

        // Videos
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",

        // Audio
        "audio/mpeg" => "mp3",
        "audio/mp4" => "m4a",
        "audio/ogg" => "ogg",
        "audio/wav" => "wav",

        // Fall back to the subtype when it looks like an extension
        other => {
            let subtype = other.split('/').nth(1).unwrap_or("");
            if !subtype.is_empty()
                && subtype.len() <= 10
                && subtype.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return subtype.to_lowercase();
            }
            ""
        }
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_item(kind: MediaKind, name: Option<&str>, mime: Option<&str>) -> MediaItem {
        MediaItem {
            message_id: 42,
            kind,
            file_name: name.map(str::to_string),
            mime_type: mime.map(str::to_string),
            expected_size: None,
            date: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_filename_prefixed_with_message_id() {
        let item = make_item(MediaKind::Document, Some("report.pdf"), Some("application/pdf"));
        assert_eq!(item.generate_filename().unwrap(), "42_report.pdf");
    }

    #[test]
    fn test_filename_sanitized() {
        let item = make_item(MediaKind::Document, Some("a:b*c?.pdf"), None);
        assert_eq!(item.generate_filename().unwrap(), "42_a_b_c_.pdf");
    }

    #[test]
    fn test_filename_fallback_uses_date() {
        let item = make_item(MediaKind::Photo, None, None);
        assert_eq!(
            item.generate_filename().unwrap(),
            "42_photo_2024-01-15T10-30-00.jpg"
        );
    }

    #[test]
    fn test_extension_from_mime() {
        let item = make_item(MediaKind::Video, None, Some("video/quicktime"));
        assert_eq!(item.extension(), "mov");

        let item = make_item(MediaKind::Audio, None, Some("audio/flac"));
        assert_eq!(item.extension(), "flac");
    }

    #[test]
    fn test_extension_defaults_per_kind() {
        assert_eq!(make_item(MediaKind::Voice, None, None).extension(), "ogg");
        assert_eq!(make_item(MediaKind::Video, None, None).extension(), "mp4");
    }

    #[test]
    fn test_format_is_mime_subtype() {
        let item = make_item(MediaKind::Video, None, Some("video/mp4"));
        assert_eq!(item.format(), Some("mp4"));

        let item = make_item(MediaKind::Photo, None, None);
        assert_eq!(item.format(), None);
    }

    #[test]
    fn test_media_kind_round_trip() {
        for kind in [
            MediaKind::Photo,
            MediaKind::Video,
            MediaKind::Audio,
            MediaKind::Voice,
            MediaKind::Document,
        ] {
            assert_eq!(kind.to_string().parse::<MediaKind>().unwrap(), kind);
        }
        assert!("sticker".parse::<MediaKind>().is_err());
    }
}
