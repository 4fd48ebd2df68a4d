//! Selection

use rustc_hash::FxHashSet;

use crate::{
    cart::Cart,
    items::{BrandId, LineItem, LineItemId},
};

/// The set of line items currently checked for purchase.
///
/// Semantically a set: membership is all that matters, no ordering is kept.
/// The set must be reconciled against the cart whenever the cart contents
/// change, so totals never reference items that no longer exist.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: FxHashSet<LineItemId>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Selection::default()
    }

    /// Creates a selection from the given identifiers.
    pub fn from_ids(ids: impl IntoIterator<Item = LineItemId>) -> Self {
        Selection {
            ids: ids.into_iter().collect(),
        }
    }

    /// Returns whether the item is selected.
    pub fn contains(&self, id: LineItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Selects an item. Returns whether the selection changed.
    pub fn select(&mut self, id: LineItemId) -> bool {
        self.ids.insert(id)
    }

    /// Deselects an item. Returns whether the selection changed.
    pub fn deselect(&mut self, id: LineItemId) -> bool {
        self.ids.remove(&id)
    }

    /// Toggles an item's membership. Returns whether it is now selected.
    pub fn toggle(&mut self, id: LineItemId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Selects every item currently in the cart (set union).
    pub fn select_all(&mut self, cart: &Cart<'_>) {
        self.ids.extend(cart.item_ids());
    }

    /// Selects every item of one brand (set union).
    pub fn select_brand(&mut self, cart: &Cart<'_>, brand: BrandId) {
        self.ids
            .extend(cart.brand_items(brand).iter().map(LineItem::id));
    }

    /// Deselects every item of one brand (set difference).
    pub fn deselect_brand(&mut self, cart: &Cart<'_>, brand: BrandId) {
        for item in cart.brand_items(brand) {
            self.ids.remove(&item.id());
        }
    }

    /// Clears the selection entirely.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Prunes identifiers that are no longer present in the cart.
    ///
    /// Returns whether anything was removed, so callers know to re-run the
    /// downstream total computations.
    pub fn reconcile(&mut self, cart: &Cart<'_>) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| cart.contains(*id));

        self.ids.len() != before
    }

    /// Iterates over the selected identifiers.
    pub fn iter(&self) -> impl Iterator<Item = LineItemId> + '_ {
        self.ids.iter().copied()
    }

    /// Returns the number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
