//! The bot — long polling, update handling, reply rendering.
//!
//! Every inbound update is reduced to a core `Inbound`, run through the
//! router (gate first, then dispatch), and the resulting `Reply` payload is
//! rendered back to Telegram. A failure while processing one update is
//! logged and never stops the loop.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{
    BotCommand, CallbackQuery, InputFile, ParseMode, Update, UpdateKind,
};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};
use url::Url;

use filmgate_core::replies;
use filmgate_core::router::{CommandRouter, Inbound, InboundKind, Reply};

use crate::keyboard::{subscribe_keyboard, RECHECK_CALLBACK};

/// Telegram front end driving the core router.
pub struct FilmgateBot {
    bot: Bot,
    router: Arc<CommandRouter>,
    /// Shutdown signal.
    shutdown: Arc<Notify>,
}

impl FilmgateBot {
    pub fn new(bot: Bot, router: Arc<CommandRouter>) -> Self {
        Self {
            bot,
            router,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Run the long-polling loop until `stop()` is called.
    pub async fn run(&self) -> anyhow::Result<()> {
        info!("starting telegram bot (long polling)");

        // Only /start goes in the public command menu; the admin commands
        // stay invisible.
        let commands = vec![BotCommand::new("start", "Botni ishga tushirish")];
        if let Err(e) = self.bot.set_my_commands(commands).await {
            warn!(error = %e, "failed to set bot commands menu");
        }

        info!("telegram bot connected, polling for updates");

        let mut offset: i32 = 0;

        loop {
            tokio::select! {
                updates = self.bot.get_updates().offset(offset).timeout(30).send() => {
                    match updates {
                        Ok(updates) => {
                            for update in &updates {
                                offset = (update.id.0 as i32).wrapping_add(1);
                                self.handle_update(update).await;
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "telegram polling error");
                            tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                        }
                    }
                }
                _ = self.shutdown.notified() => {
                    info!("telegram bot shutting down");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Signal the polling loop to exit.
    pub fn stop(&self) {
        self.shutdown.notify_waiters();
    }

    async fn handle_update(&self, update: &Update) {
        match &update.kind {
            UpdateKind::Message(message) => self.process_message(message).await,
            UpdateKind::CallbackQuery(query) => self.process_callback(query).await,
            _ => {}
        }
    }

    /// Reduce a message to an `Inbound` and route it. Non-text messages
    /// still pass through the gate (which records the user) but dispatch to
    /// nothing.
    async fn process_message(&self, message: &Message) {
        let user = match message.from.as_ref() {
            Some(u) => u,
            None => return,
        };

        let text = message.text().unwrap_or("");
        debug!(user_id = user.id.0, chat = message.chat.id.0, "telegram inbound message");

        let inbound = Inbound {
            user_id: user.id.0,
            chat_id: message.chat.id.0.to_string(),
            kind: InboundKind::Text(text.to_string()),
        };

        if let Some(reply) = self.router.handle(&inbound).await {
            self.send_reply(message.chat.id, &reply).await;
        }
    }

    /// Inline-keyboard button press. Only the re-check button is known;
    /// anything else is answered (to dismiss the spinner) and dropped.
    async fn process_callback(&self, query: &CallbackQuery) {
        // Answer first so the client stops showing the loading state.
        if let Err(e) = self.bot.answer_callback_query(query.id.clone()).await {
            debug!(error = %e, "failed to answer callback query");
        }

        if query.data.as_deref() != Some(RECHECK_CALLBACK) {
            return;
        }

        // Callbacks from inaccessible messages fall back to the user's DM.
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat().id)
            .unwrap_or(ChatId(query.from.id.0 as i64));

        let inbound = Inbound {
            user_id: query.from.id.0,
            chat_id: chat_id.0.to_string(),
            kind: InboundKind::Recheck,
        };

        if let Some(reply) = self.router.handle(&inbound).await {
            self.send_reply(chat_id, &reply).await;
        }
    }

    /// Render a core reply payload to the chat. Send failures are logged,
    /// never propagated.
    async fn send_reply(&self, chat_id: ChatId, reply: &Reply) {
        let result = match reply {
            Reply::Text(text) => self.bot.send_message(chat_id, text).await,
            Reply::Html(html) => {
                self.bot
                    .send_message(chat_id, html)
                    .parse_mode(ParseMode::Html)
                    .await
            }
            Reply::Video { url, caption } => match Url::parse(url) {
                Ok(parsed) => {
                    self.bot
                        .send_video(chat_id, InputFile::url(parsed))
                        .caption(caption)
                        .await
                }
                Err(e) => {
                    // A stored locator that isn't a valid URL can't be sent
                    // as video; fall back to the raw link.
                    warn!(url = %url, error = %e, "stored film url is not a valid URL");
                    self.bot
                        .send_message(chat_id, format!("{caption}\n{url}"))
                        .await
                }
            },
            Reply::SubscribePrompt(channels) => {
                self.bot
                    .send_message(chat_id, replies::SUBSCRIBE_PROMPT)
                    .reply_markup(subscribe_keyboard(channels))
                    .await
            }
        };

        if let Err(e) = result {
            warn!(chat = chat_id.0, error = %e, "failed to send reply");
        }
    }
}
