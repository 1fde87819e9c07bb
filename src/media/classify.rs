//! Media classification from Telegram message media.

use grammers_client::types::{Media, Message};

use crate::media::item::{MediaItem, MediaKind};

/// Extract a downloadable media item from a message.
///
/// Returns `None` for messages without media and for media this tool does
/// not handle (stickers, polls, geo points, web page previews).
pub fn media_item(message: &Message) -> Option<MediaItem> {
    let media = message.media()?;

    let (kind, file_name, mime_type, expected_size) = match &media {
        Media::Photo(_) => (
            MediaKind::Photo,
            None,
            Some("image/jpeg".to_string()),
            // Telegram does not report a single canonical size for photos
            None,
        ),
        Media::Document(document) => {
            let name = Some(document.name())
                .filter(|n| !n.is_empty())
                .map(str::to_string);
            let mime = document.mime_type().map(str::to_string);
            let kind = classify_document(mime.as_deref(), name.as_deref());
            let size = u64::try_from(document.size()).ok();
            (kind, name, mime, size)
        }
        _ => return None,
    };

    Some(MediaItem {
        message_id: message.id(),
        kind,
        file_name,
        mime_type,
        expected_size,
        date: message.date(),
    })
}

/// Classify a document by MIME type and filename.
///
/// Voice messages arrive as nameless `audio/ogg` documents; round video
/// notes are indistinguishable from plain videos at this layer and
/// classify as video.
fn classify_document(mime_type: Option<&str>, file_name: Option<&str>) -> MediaKind {
    let mime = mime_type.unwrap_or("");

    if mime.starts_with("video/") {
        MediaKind::Video
    } else if mime.starts_with("audio/") {
        if file_name.is_none() && mime.contains("ogg") {
            MediaKind::Voice
        } else {
            MediaKind::Audio
        }
    } else if mime.starts_with("image/") {
        // Uncompressed images sent as files
        MediaKind::Photo
    } else {
        MediaKind::Document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_video() {
        assert_eq!(
            classify_document(Some("video/mp4"), Some("clip.mp4")),
            MediaKind::Video
        );
        assert_eq!(classify_document(Some("video/webm"), None), MediaKind::Video);
    }

    #[test]
    fn test_classify_voice_vs_audio() {
        // Nameless ogg documents are voice messages
        assert_eq!(classify_document(Some("audio/ogg"), None), MediaKind::Voice);
        // Named audio files are regular audio
        assert_eq!(
            classify_document(Some("audio/ogg"), Some("song.ogg")),
            MediaKind::Audio
        );
        assert_eq!(classify_document(Some("audio/mpeg"), None), MediaKind::Audio);
    }

    #[test]
    fn test_classify_image_document() {
        assert_eq!(
            classify_document(Some("image/png"), Some("screenshot.png")),
            MediaKind::Photo
        );
    }

    #[test]
    fn test_classify_fallback_document() {
        assert_eq!(
            classify_document(Some("application/pdf"), Some("report.pdf")),
            MediaKind::Document
        );
        assert_eq!(classify_document(None, None), MediaKind::Document);
    }
}
