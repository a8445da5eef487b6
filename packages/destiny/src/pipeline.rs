// ABOUTME: Mod reconciliation pipeline
// ABOUTME: Joins collectibles, vendor sales, and the manifest into unowned mods for sale

use std::collections::HashSet;

use modwatch_config::destiny::ADA_VENDOR_ID;
use modwatch_storage::UserCredential;
use tracing::{debug, error, info};

use crate::{
    client::BungieClient,
    collectibles::unowned_ids,
    error::{DestinyError, DestinyResult},
    manifest::{ManifestIndex, ManifestIndexBuilder},
    types::{ItemHash, Mod},
    vendor,
};

/// Computes which of Ada-1's mods a player still has to collect.
#[derive(Clone)]
pub struct ModReconciler {
    client: BungieClient,
    manifest: ManifestIndexBuilder,
}

impl ModReconciler {
    pub fn new(client: BungieClient, manifest: ManifestIndexBuilder) -> Self {
        Self { client, manifest }
    }

    /// Display names of the mods Ada-1 sells that `user` has not acquired.
    ///
    /// `access_token` must come from a completed (and persisted) refresh. Every failure
    /// is reported as [`DestinyError::Reconciliation`] wrapping the stage error.
    pub async fn unowned_mods_for_sale(
        &self,
        user: &UserCredential,
        access_token: &str,
    ) -> DestinyResult<Vec<String>> {
        self.reconcile(user, access_token).await.map_err(|e| {
            error!(
                "Reconciliation for {} failed: {}",
                user.bungie_username, e
            );
            DestinyError::Reconciliation(Box::new(e))
        })
    }

    async fn reconcile(&self, user: &UserCredential, access_token: &str) -> DestinyResult<Vec<String>> {
        let (collectibles, sales, index) = tokio::try_join!(
            self.client.collectibles(&user.destiny_id),
            self.client
                .vendor_sales(&user.destiny_id, &user.destiny_character_id, access_token),
            self.manifest.build(),
        )?;

        let unowned = unowned_ids(&collectibles);
        let vendor_mods = vendor::extract(&sales, ADA_VENDOR_ID);
        debug!(
            "{} unowned collectibles, {} items for sale",
            unowned.len(),
            vendor_mods.len()
        );

        let names = unowned_for_sale(vendor_mods, &index, &unowned);
        info!(
            "{} unowned mods for sale for {}",
            names.len(),
            user.bungie_username
        );
        Ok(names)
    }
}

/// Names of the vendor mods known to the manifest whose hash is still unowned.
pub fn unowned_for_sale(
    vendor_mods: Vec<Mod>,
    index: &ManifestIndex,
    unowned: &HashSet<ItemHash>,
) -> Vec<String> {
    index
        .resolve(vendor_mods)
        .into_iter()
        .filter(|m| unowned.contains(&m.item_hash))
        .filter_map(|m| m.display_name)
        .collect()
}
