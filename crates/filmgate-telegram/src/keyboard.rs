//! Inline keyboard for the subscribe prompt.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;
use url::Url;

use filmgate_core::replies;
use filmgate_core::types::RequiredChannel;

/// Callback data carried by the re-check button.
pub const RECHECK_CALLBACK: &str = "check_subscription";

/// Build the subscribe-prompt keyboard: one URL button per pending channel
/// on the first row, and the re-check button on its own row.
pub fn subscribe_keyboard(channels: &[RequiredChannel]) -> InlineKeyboardMarkup {
    let mut links = Vec::new();
    for channel in channels {
        match Url::parse(&channel.invite_url()) {
            Ok(url) => links.push(InlineKeyboardButton::url(channel.name.clone(), url)),
            Err(e) => {
                warn!(username = %channel.username, error = %e, "unrenderable channel link")
            }
        }
    }

    InlineKeyboardMarkup::new(vec![
        links,
        vec![InlineKeyboardButton::callback(
            replies::RECHECK_BUTTON,
            RECHECK_CALLBACK,
        )],
    ])
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
