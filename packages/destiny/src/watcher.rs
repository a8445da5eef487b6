// ABOUTME: Per-user watch run triggered from outside
// ABOUTME: Token check, reconciliation, then hand-off to the notifier

use std::sync::Arc;

use async_trait::async_trait;
use modwatch_auth::TokenManager;
use modwatch_storage::UserCredential;
use tracing::info;

use crate::{
    error::{DestinyResult, NotifyError},
    pipeline::ModReconciler,
};

/// Delivers the list of unowned mods to the player.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user: &UserCredential, mod_names: &[String]) -> Result<(), NotifyError>;
}

/// One watch run per trigger.
pub struct ModWatcher {
    tokens: Arc<TokenManager>,
    reconciler: ModReconciler,
    notifier: Arc<dyn Notifier>,
}

impl ModWatcher {
    pub fn new(
        tokens: Arc<TokenManager>,
        reconciler: ModReconciler,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            tokens,
            reconciler,
            notifier,
        }
    }

    /// Refresh credentials if due, reconcile, and notify when anything is missing.
    ///
    /// The refreshed token is persisted before any vendor request is made.
    pub async fn process(&self, mut user: UserCredential) -> DestinyResult<Vec<String>> {
        info!("Processing {}", user.bungie_username);

        let token = self.tokens.access_token(&mut user).await?;

        let mod_names = self
            .reconciler
            .unowned_mods_for_sale(&user, &token.access_token)
            .await?;

        if mod_names.is_empty() {
            info!("{} owns everything Ada-1 sells", user.bungie_username);
        } else {
            self.notifier.notify(&user, &mod_names).await?;
        }

        Ok(mod_names)
    }
}
