//! Filmgate core — platform-agnostic domain logic for the subscription-gate bot.
//!
//! This crate provides:
//! - **types**: the persistent records (channels, users, films) and the
//!   transient admission/membership classifications
//! - **store**: the document store trait plus in-memory and file-backed
//!   implementations
//! - **directory** / **catalog**: CRUD over required channels and the film
//!   catalog
//! - **gate**: the subscription gate — per-interaction admission decisions
//!   with fail-open membership checks
//! - **router**: command dispatch with an admin allow-list
//! - **config**: JSON config file + `FILMGATE_*` env overrides
//!
//! Everything that talks to Telegram lives behind the `MembershipCheck` and
//! `ChatResolver` traits; the `filmgate-telegram` crate supplies the real
//! implementations.

pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod gate;
pub mod replies;
pub mod router;
pub mod store;
pub mod types;
pub mod utils;

pub use catalog::MediaCatalog;
pub use directory::{ChannelDirectory, ChatResolver, ResolvedChat};
pub use gate::{AdminSet, MembershipCheck, SubscriptionGate};
pub use router::{CommandRouter, Inbound, InboundKind, Reply};
pub use store::{FileStore, MemoryStore, Store};
pub use types::{Admission, Film, MembershipStatus, RequiredChannel};
