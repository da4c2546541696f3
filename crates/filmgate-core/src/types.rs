//! Core records and classifications.
//!
//! The persistent records (`RequiredChannel`, `KnownUser`, `Film`) mirror the
//! document-store collections; the transient types (`MembershipStatus`,
//! `Admission`) are computed fresh per interaction and never persisted.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Persistent records
// ─────────────────────────────────────────────

/// A channel the bot requires every user to be subscribed to.
///
/// `chat_id` and `username` are each unique across the collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredChannel {
    /// Telegram chat id of the channel (e.g. "-1001234567890").
    pub chat_id: String,
    /// Human-readable channel title.
    pub name: String,
    /// Public handle without the leading `@`.
    pub username: String,
}

impl RequiredChannel {
    /// Public join link for this channel.
    pub fn invite_url(&self) -> String {
        format!("https://t.me/{}", self.username)
    }
}

/// A user the bot has seen at least once.
///
/// Created lazily by the gate on the first interaction from an unseen user;
/// never updated or deleted. Only ever aggregate-counted (`/stat`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownUser {
    pub chat_id: String,
}

/// A film retrievable by its numeric code.
///
/// `code` and `url` are each unique across the collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub code: i64,
    pub url: String,
    pub name: String,
}

// ─────────────────────────────────────────────
// Transient classifications
// ─────────────────────────────────────────────

/// Result of a single per-channel membership query.
///
/// `Unknown` means the query itself failed; it is a first-class
/// classification, not an error. The gate treats `Unknown` channels as not
/// requiring a (re)subscription for this interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipStatus {
    Member,
    NotMember,
    Unknown,
}

/// The gate's admission decision for one interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The user may proceed to command dispatch.
    Admitted,
    /// The user is confirmed unsubscribed from these channels.
    Pending(Vec<RequiredChannel>),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_url() {
        let ch = RequiredChannel {
            chat_id: "-100123".into(),
            name: "News".into(),
            username: "newschannel".into(),
        };
        assert_eq!(ch.invite_url(), "https://t.me/newschannel");
    }

    #[test]
    fn test_channel_json_uses_camel_case() {
        let ch = RequiredChannel {
            chat_id: "-100123".into(),
            name: "News".into(),
            username: "news".into(),
        };
        let json = serde_json::to_value(&ch).unwrap();
        assert!(json.get("chatId").is_some());
        assert!(json.get("chat_id").is_none());
    }

    #[test]
    fn test_film_round_trip() {
        let film = Film {
            code: 7,
            url: "https://example.com/v.mp4".into(),
            name: "My Movie".into(),
        };
        let json = serde_json::to_string(&film).unwrap();
        let back: Film = serde_json::from_str(&json).unwrap();
        assert_eq!(back, film);
    }

    #[test]
    fn test_admission_is_admitted() {
        assert!(Admission::Admitted.is_admitted());
        assert!(!Admission::Pending(vec![]).is_admitted());
    }
}
