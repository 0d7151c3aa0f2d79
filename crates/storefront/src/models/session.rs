//! Visitor state kept in the session.
//!
//! The cart snapshot is stored in the same JSON form the CLI writes to disk,
//! so one [`CartStore`](crate::cart::CartStore) implementation serves both.

use tower_sessions::Session;

use crate::cart::MemorySnapshotStore;
use crate::shop::BrowseState;

/// Session keys for visitor data.
pub mod keys {
    /// Key for the encoded cart snapshot.
    pub const CART: &str = "cart";

    /// Key for the selected category and search text.
    pub const BROWSE: &str = "browse";
}

/// Visitor state loaded from the session for one request.
#[derive(Debug, Clone, Default)]
pub struct VisitorSession {
    /// Cart snapshot, shared with the request's cart store.
    pub cart: MemorySnapshotStore,
    pub browse: BrowseState,
}

impl VisitorSession {
    /// Load visitor state. Missing or unreadable values start fresh.
    pub async fn load(session: &Session) -> Self {
        let snapshot = match session.get::<String>(keys::CART).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Failed to read cart from session: {e}");
                None
            }
        };
        let browse = match session.get::<BrowseState>(keys::BROWSE).await {
            Ok(browse) => browse.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Failed to read browse state from session: {e}");
                BrowseState::default()
            }
        };

        Self {
            cart: MemorySnapshotStore::with_contents(snapshot),
            browse,
        }
    }

    /// Write the cart snapshot and `browse` back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save(
        &self,
        session: &Session,
        browse: &BrowseState,
    ) -> Result<(), tower_sessions::session::Error> {
        if let Some(snapshot) = self.cart.contents() {
            session.insert(keys::CART, snapshot).await?;
        }
        session.insert(keys::BROWSE, browse).await
    }
}
