//! Telegram client module.
//!
//! Thin wrapper over grammers-client handling session management,
//! interactive sign-in, and chat resolution.

pub mod telegram;

pub use telegram::Telegram;
