//! Catalog - the menu, kept in insertion order alongside a price index.
//!
//! Every [`Catalog::add`] appends the entry and mirrors `(price, name)` into
//! the [`PriceIndex`]. The two views are only loosely coupled:
//!
//! - Adding an entry at a price that is already indexed stores the entry,
//!   but the index keeps the name of the first entry at that price.
//! - [`Catalog::remove`] drops the entry but leaves the index alone, so a
//!   removed item is still found by a price search.
//!
//! Both gaps are long-standing observable behavior and are kept as-is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PalaceError;
use crate::order::OrderItemLine;
use crate::price_index::PriceIndex;
use crate::sorter::{sort_by_price, Priced};

/// A dish on the menu.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Caller-assigned identifier (uniqueness is not enforced)
    pub id: u64,
    pub name: String,
    /// Unit price, never negative
    pub price: Decimal,
}

impl MenuEntry {
    /// Build an entry, rejecting negative prices.
    pub fn new(id: u64, name: impl Into<String>, price: Decimal) -> Result<Self, PalaceError> {
        if price < Decimal::ZERO {
            return Err(PalaceError::NegativePrice(price));
        }
        Ok(Self {
            id,
            name: name.into(),
            price,
        })
    }
}

impl Priced for MenuEntry {
    #[inline]
    fn price(&self) -> Decimal {
        self.price
    }
}

/// Menu entries in insertion order plus the price index.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<MenuEntry>,
    index: PriceIndex,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: PriceIndex::new(),
        }
    }

    /// Create a catalog pre-populated with `entries`, in order
    pub fn from_entries(entries: impl IntoIterator<Item = MenuEntry>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.add(entry);
        }
        catalog
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append an entry and mirror it into the price index.
    ///
    /// # Returns
    /// `true` if the index now answers searches at this price with this
    /// entry's name, `false` if an earlier entry already owned the price.
    pub fn add(&mut self, entry: MenuEntry) -> bool {
        let indexed = self.index.insert(entry.price, &entry.name);
        debug!(
            id = entry.id,
            name = %entry.name,
            price = %entry.price,
            indexed,
            "menu entry added"
        );
        self.entries.push(entry);
        indexed
    }

    /// Remove the first entry whose identifier matches.
    ///
    /// The price index is not updated.
    pub fn remove(&mut self, id: u64) -> Result<MenuEntry, PalaceError> {
        let position = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(PalaceError::ItemNotFound(id))?;
        let removed = self.entries.remove(position);
        debug!(id, name = %removed.name, "menu entry removed");
        Ok(removed)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All entries by ascending price; equal prices keep insertion order.
    pub fn sorted_view(&self) -> Vec<MenuEntry> {
        sort_by_price(&self.entries)
    }

    /// Look up an entry by identifier against the sorted view.
    ///
    /// With duplicate identifiers the cheapest entry wins, then the
    /// earliest added.
    pub fn find(&self, id: u64) -> Option<MenuEntry> {
        self.sorted_view().into_iter().find(|e| e.id == id)
    }

    /// Resolve an order line, snapshotting the current name and price.
    pub fn resolve_line(&self, id: u64, quantity: u32) -> Result<OrderItemLine, PalaceError> {
        self.find(id)
            .map(|entry| OrderItemLine::new(entry.name, quantity, entry.price))
            .ok_or(PalaceError::UnresolvedReference(id))
    }

    /// Exact-price lookup through the index.
    #[inline]
    pub fn search_by_price(&self, price: Decimal) -> Option<&str> {
        self.index.search(price)
    }

    /// Read-only access to the index
    #[inline]
    pub fn index(&self) -> &PriceIndex {
        &self.index
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &MenuEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
