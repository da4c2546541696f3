//! Filmgate Telegram adapter.
//!
//! This crate provides:
//! - **platform**: `TelegramPlatform` — the real `MembershipCheck` and
//!   `ChatResolver` implementations backed by the Bot API
//! - **keyboard**: inline-keyboard rendering of the subscribe prompt
//! - **bot**: `FilmgateBot` — long-polling loop, update handling, and
//!   reply rendering

pub mod bot;
pub mod keyboard;
pub mod platform;

pub use bot::FilmgateBot;
pub use platform::TelegramPlatform;
