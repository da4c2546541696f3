//! Subscription gate — the admission decision made on every interaction.
//!
//! For each required channel the gate asks the `MembershipCheck` seam
//! whether the user belongs to it. A channel whose check fails reports
//! `Unknown` and is excluded from the pending list, so an unreachable
//! channel degrades to "not required this interaction" instead of locking
//! everyone out. No retries.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::directory::ChannelDirectory;
use crate::store::Store;
use crate::types::{Admission, MembershipStatus};

/// Per-channel membership query against the platform.
///
/// Implementations must not propagate failures: an errored query is
/// reported as `MembershipStatus::Unknown`.
#[async_trait]
pub trait MembershipCheck: Send + Sync {
    async fn status(&self, channel_chat_id: &str, user_id: u64) -> MembershipStatus;
}

/// The immutable set of administrator user ids.
///
/// Built once at startup from configuration and passed into the gate and
/// router; never read from the environment inside handlers.
#[derive(Clone, Debug, Default)]
pub struct AdminSet {
    ids: HashSet<u64>,
}

impl AdminSet {
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, user_id: u64) -> bool {
        self.ids.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Orchestrates membership checks across the channel directory and
/// classifies the user's admission state.
pub struct SubscriptionGate {
    directory: Arc<ChannelDirectory>,
    store: Arc<dyn Store>,
    checker: Arc<dyn MembershipCheck>,
    admins: AdminSet,
}

impl SubscriptionGate {
    pub fn new(
        directory: Arc<ChannelDirectory>,
        store: Arc<dyn Store>,
        checker: Arc<dyn MembershipCheck>,
        admins: AdminSet,
    ) -> Self {
        Self {
            directory,
            store,
            checker,
            admins,
        }
    }

    /// Decide whether `user_id` may proceed.
    ///
    /// Side effect, exactly once per call and regardless of the outcome
    /// (admins included): a `KnownUser` record is ensured for the user.
    /// Channels are checked one at a time; `NotMember` accumulates into the
    /// pending list, `Unknown` is silently excluded. Admins are admitted
    /// even with a non-empty pending list.
    pub async fn evaluate(&self, user_id: u64) -> Admission {
        if let Err(e) = self.store.ensure_user(&user_id.to_string()).await {
            // A failed user write must not block the interaction.
            warn!(user_id, error = %e, "failed to record user");
        }

        let channels = match self.directory.list().await {
            Ok(channels) => channels,
            Err(e) => {
                warn!(error = %e, "failed to load channel list, admitting");
                return Admission::Admitted;
            }
        };

        let mut pending = Vec::new();
        for channel in channels {
            match self.checker.status(&channel.chat_id, user_id).await {
                MembershipStatus::NotMember => pending.push(channel),
                MembershipStatus::Member | MembershipStatus::Unknown => {}
            }
        }

        if !pending.is_empty() && !self.admins.contains(user_id) {
            Admission::Pending(pending)
        } else {
            Admission::Admitted
        }
    }

    /// Number of users the gate has ever seen.
    pub async fn user_count(&self) -> Result<u64, crate::error::StoreError> {
        self.store.count_users().await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
