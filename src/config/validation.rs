//! Configuration validation logic.

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Expected length of a Telegram API hash (32 hex chars).
const API_HASH_LENGTH: usize = 32;

/// Maximum messages per batch accepted by Telegram APIs.
const MAX_BATCH_SIZE: usize = 100;

/// A parsed chat reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRef {
    /// Numeric chat ID (negative for groups/channels).
    Id(i64),
    /// Public username, without the leading `@`.
    Username(String),
}

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_api_id(config.account.api_id)?;
    validate_api_hash(&config.account.api_hash)?;
    parse_chat_ref(&config.target.chat)?;
    validate_media_types(config)?;
    validate_batch_size(config.options.batch_size)?;

    Ok(())
}

/// Validate the API ID.
pub fn validate_api_id(api_id: i32) -> Result<()> {
    if api_id <= 0 {
        return Err(Error::MissingConfig(
            "api_id (get one from https://my.telegram.org)".to_string(),
        ));
    }
    Ok(())
}

/// Validate the API hash.
pub fn validate_api_hash(api_hash: &str) -> Result<()> {
    if api_hash.is_empty() {
        return Err(Error::MissingConfig(
            "api_hash (get one from https://my.telegram.org)".to_string(),
        ));
    }

    let hash_lower = api_hash.to_lowercase();
    if hash_lower.contains("replaceme") || hash_lower.contains("your_api_hash") {
        return Err(Error::ConfigValidation {
            field: "api_hash".to_string(),
            message: "API hash appears to be a placeholder. Please provide your actual hash."
                .to_string(),
        });
    }

    if api_hash.len() != API_HASH_LENGTH || !api_hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::ConfigValidation {
            field: "api_hash".to_string(),
            message: format!(
                "API hash must be {} hexadecimal characters (got {})",
                API_HASH_LENGTH,
                api_hash.len()
            ),
        });
    }

    Ok(())
}

/// Validate that at least one media type is selected.
fn validate_media_types(config: &Config) -> Result<()> {
    if config.options.media_types.is_empty() {
        return Err(Error::MissingConfig(
            "media_types (at least one media type required)".to_string(),
        ));
    }
    Ok(())
}

/// Validate the batch size.
pub fn validate_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        return Err(Error::ConfigValidation {
            field: "batch_size".to_string(),
            message: format!("Batch size must be between 1 and {}", MAX_BATCH_SIZE),
        });
    }
    Ok(())
}

/// Parse a chat reference from an ID, `@username`, or t.me link.
pub fn parse_chat_ref(input: &str) -> Result<ChatRef> {
    let input = input.trim();

    if input.is_empty() {
        return Err(Error::MissingConfig(
            "chat (numeric ID, @username, or t.me link)".to_string(),
        ));
    }

    // Private channel link: https://t.me/c/1234567890/...
    let private_pattern = Regex::new(r"^(?:https?://)?t\.me/c/(\d+)").unwrap();
    if let Some(captures) = private_pattern.captures(input) {
        let internal: i64 = captures[1]
            .parse()
            .map_err(|_| invalid_chat(input, "channel ID out of range"))?;
        // Bot-API style marked ID for channels
        return Ok(ChatRef::Id(-1_000_000_000_000 - internal));
    }

    // Public link: https://t.me/username
    let public_pattern = Regex::new(r"^(?:https?://)?t\.me/([A-Za-z0-9_]{4,32})$").unwrap();
    if let Some(captures) = public_pattern.captures(input) {
        return Ok(ChatRef::Username(captures[1].to_string()));
    }

    // Numeric ID, possibly negative
    if input
        .strip_prefix('-')
        .unwrap_or(input)
        .chars()
        .all(|c| c.is_ascii_digit())
    {
        let id: i64 = input
            .parse()
            .map_err(|_| invalid_chat(input, "chat ID out of range"))?;
        return Ok(ChatRef::Id(id));
    }

    // @username or bare username
    let username = input.trim_start_matches('@');
    let username_pattern = Regex::new(r"^[A-Za-z0-9_]{4,32}$").unwrap();
    if username_pattern.is_match(username) {
        return Ok(ChatRef::Username(username.to_string()));
    }

    Err(invalid_chat(
        input,
        "expected a numeric ID, @username, or t.me link",
    ))
}

fn invalid_chat(input: &str, message: &str) -> Error {
    Error::ConfigValidation {
        field: "chat".to_string(),
        message: format!("Invalid chat reference '{}': {}", input, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_ref_numeric() {
        assert_eq!(parse_chat_ref("123456").unwrap(), ChatRef::Id(123456));
        assert_eq!(
            parse_chat_ref("-1001234567890").unwrap(),
            ChatRef::Id(-1001234567890)
        );
    }

    #[test]
    fn test_parse_chat_ref_username() {
        assert_eq!(
            parse_chat_ref("@rustlang").unwrap(),
            ChatRef::Username("rustlang".to_string())
        );
        assert_eq!(
            parse_chat_ref("rustlang").unwrap(),
            ChatRef::Username("rustlang".to_string())
        );
    }

    #[test]
    fn test_parse_chat_ref_public_link() {
        assert_eq!(
            parse_chat_ref("https://t.me/rustlang").unwrap(),
            ChatRef::Username("rustlang".to_string())
        );
        assert_eq!(
            parse_chat_ref("t.me/rustlang").unwrap(),
            ChatRef::Username("rustlang".to_string())
        );
    }

    #[test]
    fn test_parse_chat_ref_private_link() {
        assert_eq!(
            parse_chat_ref("https://t.me/c/1234567890/42").unwrap(),
            ChatRef::Id(-1001234567890)
        );
    }

    #[test]
    fn test_parse_chat_ref_invalid() {
        assert!(parse_chat_ref("").is_err());
        assert!(parse_chat_ref("no spaces allowed").is_err());
        assert!(parse_chat_ref("@ab").is_err()); // Too short
    }

    #[test]
    fn test_validate_api_hash() {
        assert!(validate_api_hash("0123456789abcdef0123456789abcdef").is_ok());
        assert!(validate_api_hash("").is_err());
        assert!(validate_api_hash("too-short").is_err());
        assert!(validate_api_hash("replaceme_replaceme_replaceme_12").is_err());
    }

    #[test]
    fn test_validate_batch_size() {
        assert!(validate_batch_size(1).is_ok());
        assert!(validate_batch_size(100).is_ok());
        assert!(validate_batch_size(0).is_err());
        assert!(validate_batch_size(101).is_err());
    }

    #[test]
    fn test_validate_api_id() {
        assert!(validate_api_id(12345).is_ok());
        assert!(validate_api_id(0).is_err());
        assert!(validate_api_id(-1).is_err());
    }
}
