//! File system helpers: naming, sanitization, and download paths.

pub mod naming;
pub mod paths;

pub use naming::{make_unique_filename, sanitize_path_component};
pub use paths::{chat_dir, ensure_dir, media_dir};
