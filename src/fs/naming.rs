//! Filename generation and manipulation.

use std::path::Path;

use crate::error::{Error, Result};

/// Sanitize a path component (folder or file name).
///
/// Problematic characters are replaced with underscores; path traversal
/// and null bytes are rejected outright.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    // Sanitize problematic characters (replace with underscore)
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Reject empty or whitespace-only names
    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Generate a unique filename by appending a number if the file exists.
pub fn make_unique_filename(path: &Path) -> std::path::PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    let mut counter = 1;
    loop {
        let new_name = if ext.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, ext)
        };

        let new_path = parent.join(&new_name);
        if !new_path.exists() {
            return new_path;
        }

        counter += 1;
        if counter > 1000 {
            // Safety limit
            return new_path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_valid() {
        assert_eq!(
            sanitize_path_component("normal_name").unwrap(),
            "normal_name"
        );
        assert_eq!(
            sanitize_path_component("file:name?txt").unwrap(),
            "file_name_txt"
        );
        // Path separators are sanitized, not rejected
        assert_eq!(
            sanitize_path_component("path/to/name").unwrap(),
            "path_to_name"
        );
    }

    #[test]
    fn test_sanitize_traversal() {
        assert!(sanitize_path_component("../evil").is_err());
        assert!(sanitize_path_component("foo/../bar").is_err());
    }

    #[test]
    fn test_sanitize_null_bytes() {
        assert!(sanitize_path_component("file\0name").is_err());
    }

    #[test]
    fn test_sanitize_empty() {
        assert!(sanitize_path_component("").is_err());
        assert!(sanitize_path_component("   ").is_err());
    }

    #[test]
    fn test_make_unique_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("42_photo.jpg");

        // Non-existent path is returned as-is
        assert_eq!(make_unique_filename(&path), path);

        std::fs::write(&path, b"first").unwrap();
        let second = make_unique_filename(&path);
        assert_eq!(second, dir.path().join("42_photo_1.jpg"));

        std::fs::write(&second, b"second").unwrap();
        let third = make_unique_filename(&path);
        assert_eq!(third, dir.path().join("42_photo_2.jpg"));
    }
}
