//! Cart line type shared by the cart store and its persisted snapshot.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// One consolidated cart line.
///
/// Serialized as `{"productId": 1, "quantity": 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}
