//! Quantity-consolidating cart store.
//!
//! The cart is a mapping from product ID to quantity, kept in first-add
//! order for display. Invariants:
//!
//! - at most one line per product ID
//! - every stored quantity is at least 1; a line that would drop to zero is
//!   removed instead
//!
//! Every effective mutation overwrites the persisted snapshot with the full
//! line set. Persistence failures are logged and swallowed: the in-memory
//! cart stays authoritative for the session.
//!
//! ```text
//! Absent --add--> Present(1)
//! Present(n) --add/increment--> Present(n+1)
//! Present(n) --decrement--> Present(n-1), or Absent when n-1 == 0
//! Present(n) --remove--> Absent
//! ```

pub mod snapshot;

use marketstall_core::{CartLine, Price, Product, ProductId};
use tracing::{debug, warn};

pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, PersistenceError, SnapshotStore};

/// Effect of a cart mutation on the targeted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// A new line with quantity 1 was created.
    Created,
    /// The line now has the given quantity.
    Updated(u32),
    /// The line was removed.
    Removed,
    /// Nothing changed (unknown product or absent line).
    Unchanged,
}

impl LineChange {
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Aggregate cart figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of all line quantities.
    pub item_count: u32,
    /// Sum of `quantity * price` over all lines.
    pub amount_due: Price,
}

/// The cart for one visitor.
#[derive(Debug)]
pub struct CartStore<P> {
    lines: Vec<CartLine>,
    store: P,
}

impl<P: SnapshotStore> CartStore<P> {
    /// Open the cart persisted in `store`.
    ///
    /// A missing, unreadable, or malformed snapshot yields an empty cart.
    pub fn open(store: P) -> Self {
        let lines = match store.read() {
            Ok(Some(raw)) => decode(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding malformed cart snapshot");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart snapshot, starting empty");
                Vec::new()
            }
        };

        Self {
            lines: consolidate(lines),
            store,
        }
    }

    /// Add one unit of `id`.
    ///
    /// An existing line is incremented. Otherwise a line is created only if
    /// `catalog` knows the product; unknown products are ignored.
    pub fn add(&mut self, id: ProductId, catalog: &[Product]) -> LineChange {
        if self.position(id).is_some() {
            return self.increment(id);
        }
        if !catalog.iter().any(|p| p.id == id) {
            debug!(product_id = %id, "Ignoring add for unknown product");
            return LineChange::Unchanged;
        }

        self.lines.push(CartLine::new(id, 1));
        self.persist();
        LineChange::Created
    }

    /// Increase the quantity of an existing line by one.
    pub fn increment(&mut self, id: ProductId) -> LineChange {
        let Some(line) = self.lines.iter_mut().find(|l| l.product_id == id) else {
            return LineChange::Unchanged;
        };
        line.quantity = line.quantity.saturating_add(1);
        let quantity = line.quantity;

        self.persist();
        LineChange::Updated(quantity)
    }

    /// Decrease the quantity of an existing line by one, removing it at zero.
    pub fn decrement(&mut self, id: ProductId) -> LineChange {
        let Some(index) = self.position(id) else {
            return LineChange::Unchanged;
        };

        let change = match self.lines.get_mut(index) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                LineChange::Updated(line.quantity)
            }
            _ => {
                self.lines.remove(index);
                LineChange::Removed
            }
        };

        self.persist();
        change
    }

    /// Remove the line for `id` if present.
    pub fn remove(&mut self, id: ProductId) -> LineChange {
        let Some(index) = self.position(id) else {
            return LineChange::Unchanged;
        };
        self.lines.remove(index);

        self.persist();
        LineChange::Removed
    }

    /// Count and amount due, pricing each line from `catalog`.
    ///
    /// A line whose product is not in `catalog` contributes its quantity but
    /// no amount.
    #[must_use]
    pub fn totals(&self, catalog: &[Product]) -> CartTotals {
        let amount_due = self
            .lines
            .iter()
            .map(|line| {
                catalog
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map_or(Price::ZERO, |p| p.price.times(line.quantity))
            })
            .sum();

        CartTotals {
            item_count: self.item_count(),
            amount_due,
        }
    }

    /// Sum of all line quantities, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .map(|l| l.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Lines in first-add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of `id`, zero when absent.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product_id == id)
            .map_or(0, |l| l.quantity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The snapshot store backing this cart.
    pub const fn store(&self) -> &P {
        &self.store
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == id)
    }

    fn persist(&self) {
        let result = encode(&self.lines).and_then(|raw| self.store.write(&raw));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist cart snapshot");
        }
    }
}

/// Encode cart lines as a snapshot record.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(lines: &[CartLine]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(lines)?)
}

/// Decode a snapshot record into cart lines.
///
/// # Errors
///
/// Returns an error if the record is not a JSON array of cart lines.
pub fn decode(raw: &str) -> Result<Vec<CartLine>, PersistenceError> {
    Ok(serde_json::from_str(raw)?)
}

/// Merge duplicate product lines and drop zero quantities, keeping first-seen
/// order.
fn consolidate(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines.into_iter().filter(|l| l.quantity > 0) {
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}
