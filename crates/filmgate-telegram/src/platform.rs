//! Bot API implementations of the core's platform seams.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberStatus, Recipient};
use tracing::debug;

use filmgate_core::directory::{ChatResolver, ResolvedChat};
use filmgate_core::gate::MembershipCheck;
use filmgate_core::types::MembershipStatus;

/// Live Telegram backend for membership checks and handle resolution.
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MembershipCheck for TelegramPlatform {
    /// `getChatMember` with fail-open semantics: `left`/`kicked` means the
    /// user is not a member, any other status counts as membership, and a
    /// failed query (network error, bot lacking access, channel gone)
    /// reports `Unknown`. No retries.
    async fn status(&self, channel_chat_id: &str, user_id: u64) -> MembershipStatus {
        let chat_id = match channel_chat_id.parse::<i64>() {
            Ok(raw) => ChatId(raw),
            Err(_) => {
                debug!(channel = %channel_chat_id, "unparseable channel chat id");
                return MembershipStatus::Unknown;
            }
        };

        match self.bot.get_chat_member(chat_id, UserId(user_id)).await {
            Ok(member) => match member.status() {
                ChatMemberStatus::Left | ChatMemberStatus::Banned => MembershipStatus::NotMember,
                _ => MembershipStatus::Member,
            },
            Err(e) => {
                debug!(channel = %channel_chat_id, user_id, error = %e, "membership check failed");
                MembershipStatus::Unknown
            }
        }
    }
}

#[async_trait]
impl ChatResolver for TelegramPlatform {
    /// `getChat("@handle")` → chat id + title.
    async fn resolve(&self, username: &str) -> anyhow::Result<ResolvedChat> {
        let handle = username.trim_start_matches('@');
        let chat = self
            .bot
            .get_chat(Recipient::ChannelUsername(format!("@{handle}")))
            .await?;

        Ok(ResolvedChat {
            chat_id: chat.id.0.to_string(),
            title: chat.title().unwrap_or(handle).to_string(),
        })
    }
}
