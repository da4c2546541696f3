//! Command router — classifies admitted interactions and runs handlers.
//!
//! Every interaction passes through the subscription gate first; only
//! admitted interactions are dispatched. Privileged commands check the admin
//! set before the command body runs — a non-admin caller gets the same fixed
//! reply as an unknown command, so privileged commands stay invisible to
//! regular users.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::MediaCatalog;
use crate::directory::ChannelDirectory;
use crate::error::{CatalogError, DirectoryError};
use crate::gate::{AdminSet, SubscriptionGate};
use crate::replies;
use crate::types::{Admission, RequiredChannel};

// ─────────────────────────────────────────────
// Interaction and reply payloads
// ─────────────────────────────────────────────

/// One inbound interaction, already stripped of platform detail.
#[derive(Clone, Debug)]
pub struct Inbound {
    /// Telegram user id of the sender.
    pub user_id: u64,
    /// Chat the interaction arrived in (reply target; also the delete key
    /// for `/delete_channel`).
    pub chat_id: String,
    pub kind: InboundKind,
}

#[derive(Clone, Debug)]
pub enum InboundKind {
    /// A text message (commands included). Empty for non-text messages,
    /// which still run the gate but dispatch to nothing.
    Text(String),
    /// The subscribe-prompt re-check button was pressed.
    Recheck,
}

/// What the handler wants sent back. Rendering is the platform's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Text rendered with HTML parse mode.
    Html(String),
    Video {
        url: String,
        caption: String,
    },
    /// The subscribe prompt: one link per pending channel plus the
    /// re-check control.
    SubscribePrompt(Vec<RequiredChannel>),
}

// ─────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────

pub struct CommandRouter {
    gate: Arc<SubscriptionGate>,
    directory: Arc<ChannelDirectory>,
    catalog: MediaCatalog,
    admins: AdminSet,
}

impl CommandRouter {
    pub fn new(
        gate: Arc<SubscriptionGate>,
        directory: Arc<ChannelDirectory>,
        catalog: MediaCatalog,
        admins: AdminSet,
    ) -> Self {
        Self {
            gate,
            directory,
            catalog,
            admins,
        }
    }

    /// Process one interaction: gate, then dispatch.
    ///
    /// `None` means no reply is warranted (unknown command, non-text
    /// message); the gate's user-recording side effect has still happened.
    pub async fn handle(&self, inbound: &Inbound) -> Option<Reply> {
        match self.gate.evaluate(inbound.user_id).await {
            Admission::Pending(pending) => Some(Reply::SubscribePrompt(pending)),
            Admission::Admitted => self.dispatch(inbound).await,
        }
    }

    async fn dispatch(&self, inbound: &Inbound) -> Option<Reply> {
        let text = match &inbound.kind {
            InboundKind::Recheck => return Some(self.recheck(inbound.user_id).await),
            InboundKind::Text(text) => text.as_str(),
        };

        if let Some(rest) = text.strip_prefix('/') {
            let mut parts = rest.splitn(2, char::is_whitespace);
            let command = parts.next().unwrap_or("");
            // Strip @botname from the command (e.g. /start@filmbot).
            let command = command.split('@').next().unwrap_or(command);
            let args = parts.next().unwrap_or("").trim();
            return self.dispatch_command(inbound, command, args).await;
        }

        // Bare integer text is a film-code lookup.
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            return Some(self.lookup_film(text).await);
        }

        None
    }

    async fn dispatch_command(
        &self,
        inbound: &Inbound,
        command: &str,
        args: &str,
    ) -> Option<Reply> {
        if command == "start" {
            return Some(Reply::Text(replies::WELCOME.to_string()));
        }

        let privileged = matches!(
            command,
            "add_channel" | "list_channels" | "delete_channel" | "add_film" | "delete_film"
                | "stat"
        );
        if !privileged {
            debug!(command, "unknown command");
            return None;
        }

        // Admin check before the command body; non-admins see the same
        // reply as for an unknown command.
        if !self.admins.contains(inbound.user_id) {
            return Some(Reply::Text(replies::UNKNOWN_COMMAND.to_string()));
        }

        match command {
            "add_channel" => Some(self.add_channel(args).await),
            "list_channels" => Some(self.list_channels().await),
            "delete_channel" => Some(self.delete_channel(&inbound.chat_id, args).await),
            "add_film" => Some(self.add_film(args).await),
            "delete_film" => Some(self.delete_film(args).await),
            "stat" => Some(self.stat().await),
            _ => None,
        }
    }

    /// Re-check button: re-evaluate and either confirm or re-issue the
    /// (possibly smaller) pending list.
    async fn recheck(&self, user_id: u64) -> Reply {
        match self.gate.evaluate(user_id).await {
            Admission::Admitted => Reply::Text(replies::SUBSCRIPTION_CONFIRMED.to_string()),
            Admission::Pending(pending) => Reply::SubscribePrompt(pending),
        }
    }

    async fn add_channel(&self, args: &str) -> Reply {
        let username = args.trim();
        if username.is_empty() {
            return Reply::Text(replies::ADD_CHANNEL_USAGE.to_string());
        }

        match self.directory.add(username).await {
            Ok(channel) => Reply::Text(replies::channel_added(&channel.name)),
            Err(DirectoryError::Duplicate) => Reply::Text(replies::CHANNEL_EXISTS.to_string()),
            Err(DirectoryError::Unresolvable(reason)) => {
                debug!(username, reason, "channel resolution failed");
                Reply::Text(replies::CHANNEL_NOT_RESOLVABLE.to_string())
            }
            Err(e) => {
                warn!(username, error = %e, "add_channel failed");
                Reply::Text(replies::CHANNEL_ADD_FAILED.to_string())
            }
        }
    }

    async fn list_channels(&self) -> Reply {
        match self.directory.list().await {
            Ok(channels) => Reply::Html(replies::channel_list(&channels)),
            Err(e) => {
                warn!(error = %e, "list_channels failed");
                Reply::Text(replies::CHANNEL_LIST_FAILED.to_string())
            }
        }
    }

    async fn delete_channel(&self, chat_id: &str, args: &str) -> Reply {
        let name = args.trim();
        if name.is_empty() {
            return Reply::Text(replies::DELETE_CHANNEL_USAGE.to_string());
        }

        match self.directory.remove(chat_id, name).await {
            Ok(()) => Reply::Text(replies::channel_deleted(name)),
            Err(e) => {
                warn!(name, error = %e, "delete_channel failed");
                Reply::Text(replies::CHANNEL_DELETE_FAILED.to_string())
            }
        }
    }

    async fn add_film(&self, args: &str) -> Reply {
        let mut parts = args.split_whitespace();
        let (url, code_text) = match (parts.next(), parts.next()) {
            (Some(url), Some(code)) => (url, code),
            _ => return Reply::Text(replies::ADD_FILM_USAGE.to_string()),
        };
        let name = parts.collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            return Reply::Text(replies::ADD_FILM_USAGE.to_string());
        }

        match self.catalog.add(url, code_text, &name).await {
            Ok(film) => Reply::Text(replies::film_added(&film.name)),
            Err(CatalogError::InvalidCode) => {
                Reply::Text(replies::FILM_CODE_NOT_A_NUMBER.to_string())
            }
            Err(CatalogError::DuplicateUrl) => Reply::Text(replies::FILM_URL_EXISTS.to_string()),
            Err(CatalogError::DuplicateCode) => Reply::Text(replies::FILM_CODE_EXISTS.to_string()),
            Err(e) => {
                warn!(error = %e, "add_film failed");
                Reply::Text(replies::FILM_ADD_FAILED.to_string())
            }
        }
    }

    async fn delete_film(&self, args: &str) -> Reply {
        let code_text = args.trim();
        if code_text.is_empty() {
            return Reply::Text(replies::DELETE_FILM_USAGE.to_string());
        }
        let code: i64 = match code_text.parse() {
            Ok(code) => code,
            Err(_) => return Reply::Text(replies::FILM_CODE_NOT_A_NUMBER.to_string()),
        };

        match self.catalog.remove(code).await {
            Ok(()) => Reply::Text(replies::film_deleted(code)),
            Err(CatalogError::NotFound) => Reply::Text(replies::FILM_NOT_FOUND.to_string()),
            Err(e) => {
                warn!(code, error = %e, "delete_film failed");
                Reply::Text(replies::FILM_DELETE_FAILED.to_string())
            }
        }
    }

    async fn stat(&self) -> Reply {
        match self.gate.user_count().await {
            Ok(count) => Reply::Text(replies::user_count(count)),
            Err(e) => {
                warn!(error = %e, "stat failed");
                Reply::Text(replies::UNKNOWN_COMMAND.to_string())
            }
        }
    }

    async fn lookup_film(&self, code_text: &str) -> Reply {
        // Digits that overflow i64 cannot match any stored code.
        let code: i64 = match code_text.parse() {
            Ok(code) => code,
            Err(_) => return Reply::Text(replies::FILM_NOT_FOUND.to_string()),
        };

        match self.catalog.find_by_code(code).await {
            Ok(film) => Reply::Video {
                url: film.url,
                caption: film.name,
            },
            Err(CatalogError::NotFound) => Reply::Text(replies::FILM_NOT_FOUND.to_string()),
            Err(e) => {
                warn!(code, error = %e, "film lookup failed");
                Reply::Text(replies::FILM_NOT_FOUND.to_string())
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ChatResolver, ResolvedChat};
    use crate::gate::MembershipCheck;
    use crate::store::{MemoryStore, Store};
    use crate::types::MembershipStatus;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mutable membership table so tests can flip a user's status.
    struct TableCheck {
        table: Mutex<HashMap<(String, u64), MembershipStatus>>,
    }

    impl TableCheck {
        fn all_members() -> Arc<Self> {
            Arc::new(Self {
                table: Mutex::new(HashMap::new()),
            })
        }

        fn set(&self, chat_id: &str, user_id: u64, status: MembershipStatus) {
            self.table
                .lock()
                .unwrap()
                .insert((chat_id.to_string(), user_id), status);
        }
    }

    #[async_trait]
    impl MembershipCheck for TableCheck {
        async fn status(&self, channel_chat_id: &str, user_id: u64) -> MembershipStatus {
            self.table
                .lock()
                .unwrap()
                .get(&(channel_chat_id.to_string(), user_id))
                .copied()
                .unwrap_or(MembershipStatus::Member)
        }
    }

    struct FixedResolver;

    #[async_trait]
    impl ChatResolver for FixedResolver {
        async fn resolve(&self, username: &str) -> anyhow::Result<ResolvedChat> {
            match username {
                "news" => Ok(ResolvedChat {
                    chat_id: "-100111".into(),
                    title: "News Channel".into(),
                }),
                other => anyhow::bail!("no such channel: {other}"),
            }
        }
    }

    struct Fixture {
        router: CommandRouter,
        store: Arc<MemoryStore>,
        checker: Arc<TableCheck>,
    }

    fn fixture(admins: AdminSet) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let checker = TableCheck::all_members();
        let directory = Arc::new(ChannelDirectory::new(
            store.clone(),
            Arc::new(FixedResolver),
        ));
        let gate = Arc::new(SubscriptionGate::new(
            directory.clone(),
            store.clone(),
            checker.clone(),
            admins.clone(),
        ));
        let catalog = MediaCatalog::new(store.clone());
        Fixture {
            router: CommandRouter::new(gate, directory, catalog, admins),
            store,
            checker,
        }
    }

    fn text(user_id: u64, text: &str) -> Inbound {
        Inbound {
            user_id,
            chat_id: user_id.to_string(),
            kind: InboundKind::Text(text.to_string()),
        }
    }

    fn recheck(user_id: u64) -> Inbound {
        Inbound {
            user_id,
            chat_id: user_id.to_string(),
            kind: InboundKind::Recheck,
        }
    }

    const ADMIN: u64 = 9;

    #[tokio::test]
    async fn test_start_allowed_for_everyone() {
        let f = fixture(AdminSet::new([ADMIN]));
        let reply = f.router.handle(&text(1, "/start")).await;
        assert_eq!(reply, Some(Reply::Text(replies::WELCOME.to_string())));
    }

    #[tokio::test]
    async fn test_non_admin_privileged_command_hidden() {
        let f = fixture(AdminSet::new([ADMIN]));
        let reply = f.router.handle(&text(1, "/add_channel news")).await;
        assert_eq!(
            reply,
            Some(Reply::Text(replies::UNKNOWN_COMMAND.to_string()))
        );
        // The command body never ran.
        assert!(f.store.list_channels().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_adds_and_lists_channels() {
        let f = fixture(AdminSet::new([ADMIN]));

        let reply = f.router.handle(&text(ADMIN, "/add_channel news")).await;
        assert_eq!(
            reply,
            Some(Reply::Text(replies::channel_added("News Channel")))
        );

        let reply = f.router.handle(&text(ADMIN, "/list_channels")).await;
        match reply {
            Some(Reply::Html(listing)) => assert!(listing.contains("1. News Channel")),
            other => panic!("expected HTML listing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_channel_usage_and_duplicate() {
        let f = fixture(AdminSet::new([ADMIN]));

        let reply = f.router.handle(&text(ADMIN, "/add_channel")).await;
        assert_eq!(
            reply,
            Some(Reply::Text(replies::ADD_CHANNEL_USAGE.to_string()))
        );

        f.router.handle(&text(ADMIN, "/add_channel news")).await;
        let reply = f.router.handle(&text(ADMIN, "/add_channel news")).await;
        assert_eq!(
            reply,
            Some(Reply::Text(replies::CHANNEL_EXISTS.to_string()))
        );
    }

    #[tokio::test]
    async fn test_add_channel_unresolvable() {
        let f = fixture(AdminSet::new([ADMIN]));
        let reply = f.router.handle(&text(ADMIN, "/add_channel nothere")).await;
        assert_eq!(
            reply,
            Some(Reply::Text(replies::CHANNEL_NOT_RESOLVABLE.to_string()))
        );
    }

    #[tokio::test]
    async fn test_film_add_then_bare_code_lookup() {
        let f = fixture(AdminSet::new([ADMIN]));

        let reply = f
            .router
            .handle(&text(ADMIN, "/add_film https://x/1 7 My Movie"))
            .await;
        assert_eq!(reply, Some(Reply::Text(replies::film_added("My Movie"))));

        let reply = f.router.handle(&text(1, "7")).await;
        assert_eq!(
            reply,
            Some(Reply::Video {
                url: "https://x/1".to_string(),
                caption: "My Movie".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_film_duplicate_code_differing_url() {
        let f = fixture(AdminSet::new([ADMIN]));
        f.router
            .handle(&text(ADMIN, "/add_film https://x/1 7 My Movie"))
            .await;
        let reply = f
            .router
            .handle(&text(ADMIN, "/add_film https://x/2 7 Other"))
            .await;
        assert_eq!(
            reply,
            Some(Reply::Text(replies::FILM_CODE_EXISTS.to_string()))
        );
    }

    #[tokio::test]
    async fn test_film_code_must_be_numeric() {
        let f = fixture(AdminSet::new([ADMIN]));
        let reply = f
            .router
            .handle(&text(ADMIN, "/add_film https://x/1 abc My Movie"))
            .await;
        assert_eq!(
            reply,
            Some(Reply::Text(replies::FILM_CODE_NOT_A_NUMBER.to_string()))
        );
    }

    #[tokio::test]
    async fn test_lookup_unknown_code() {
        let f = fixture(AdminSet::default());
        let reply = f.router.handle(&text(1, "404")).await;
        assert_eq!(reply, Some(Reply::Text(replies::FILM_NOT_FOUND.to_string())));
    }

    #[tokio::test]
    async fn test_delete_film_not_found_vs_success() {
        let f = fixture(AdminSet::new([ADMIN]));

        let reply = f.router.handle(&text(ADMIN, "/delete_film 7")).await;
        assert_eq!(reply, Some(Reply::Text(replies::FILM_NOT_FOUND.to_string())));

        f.router
            .handle(&text(ADMIN, "/add_film https://x/1 7 My Movie"))
            .await;
        let reply = f.router.handle(&text(ADMIN, "/delete_film 7")).await;
        assert_eq!(reply, Some(Reply::Text(replies::film_deleted(7))));
    }

    #[tokio::test]
    async fn test_stat_counts_seen_users() {
        let f = fixture(AdminSet::new([ADMIN]));
        f.router.handle(&text(1, "/start")).await;
        f.router.handle(&text(2, "/start")).await;

        let reply = f.router.handle(&text(ADMIN, "/stat")).await;
        // Two regular users plus the admin interaction itself.
        assert_eq!(reply, Some(Reply::Text(replies::user_count(3))));
    }

    #[tokio::test]
    async fn test_unsubscribed_user_gets_prompt_not_dispatch() {
        let f = fixture(AdminSet::new([ADMIN]));
        f.router.handle(&text(ADMIN, "/add_channel news")).await;
        f.checker.set("-100111", 1, MembershipStatus::NotMember);

        let reply = f.router.handle(&text(1, "/start")).await;
        match reply {
            Some(Reply::SubscribePrompt(pending)) => {
                assert_eq!(pending.len(), 1);
                assert_eq!(pending[0].username, "news");
            }
            other => panic!("expected subscribe prompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_recheck_flow_left_then_member() {
        let f = fixture(AdminSet::new([ADMIN]));
        f.router.handle(&text(ADMIN, "/add_channel news")).await;
        f.checker.set("-100111", 1, MembershipStatus::NotMember);

        // Still unsubscribed: the prompt is re-issued.
        let reply = f.router.handle(&recheck(1)).await;
        assert!(matches!(reply, Some(Reply::SubscribePrompt(_))));

        // User subscribes, presses the button again: confirmation.
        f.checker.set("-100111", 1, MembershipStatus::Member);
        let reply = f.router.handle(&recheck(1)).await;
        assert_eq!(
            reply,
            Some(Reply::Text(replies::SUBSCRIPTION_CONFIRMED.to_string()))
        );
    }

    #[tokio::test]
    async fn test_delete_channel_keyed_on_interaction_chat() {
        let f = fixture(AdminSet::new([ADMIN]));
        f.router.handle(&text(ADMIN, "/add_channel news")).await;

        // The delete key pairs the interaction's chat id with the name, so
        // a mismatched pair is a permissive no-op that still reports success.
        let reply = f
            .router
            .handle(&text(ADMIN, "/delete_channel News Channel"))
            .await;
        assert_eq!(
            reply,
            Some(Reply::Text(replies::channel_deleted("News Channel")))
        );
        assert_eq!(f.store.list_channels().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_command_and_plain_text_ignored() {
        let f = fixture(AdminSet::default());
        assert_eq!(f.router.handle(&text(1, "/bogus")).await, None);
        assert_eq!(f.router.handle(&text(1, "hello there")).await, None);
        assert_eq!(f.router.handle(&text(1, "")).await, None);
    }

    #[tokio::test]
    async fn test_command_with_bot_suffix() {
        let f = fixture(AdminSet::default());
        let reply = f.router.handle(&text(1, "/start@filmgate_bot")).await;
        assert_eq!(reply, Some(Reply::Text(replies::WELCOME.to_string())));
    }
}
