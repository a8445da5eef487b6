// ABOUTME: Ownership filter over a profile's collectible states

use std::collections::HashSet;

use modwatch_config::destiny::COLLECTIBLE_NOT_ACQUIRED_STATE;

use crate::types::{Collectible, CollectiblesDocument, ItemHash};

/// Collectibles of the document that carry a state.
pub fn collectibles(document: &CollectiblesDocument) -> impl Iterator<Item = Collectible> + '_ {
    document.iter().filter_map(|(id, component)| {
        component.state.map(|state| Collectible {
            id: ItemHash::from(id.as_str()),
            state,
        })
    })
}

/// Ids whose state is exactly the "not acquired" value.
pub fn unowned_ids(document: &CollectiblesDocument) -> HashSet<ItemHash> {
    collectibles(document)
        .filter(|c| c.state == COLLECTIBLE_NOT_ACQUIRED_STATE)
        .map(|c| c.id)
        .collect()
}
