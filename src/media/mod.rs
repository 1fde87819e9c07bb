//! Media classification and naming.

pub mod classify;
pub mod item;

pub use classify::media_item;
pub use item::{MediaItem, MediaKind};
