//! Engine - the application state and its command dispatcher.
//!
//! One `Engine` owns the catalog and the order pipeline. Front ends build
//! [`Command`]s and render the [`OutputEvent`]s that come back; nothing
//! else touches the state. Every command runs to completion before the
//! next one starts.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::catalog::{Catalog, MenuEntry};
use crate::command::{
    AddMenuEntry, Command, EntryAdded, OrderDecided, OutputEvent, PlaceOrder, RejectReason,
};
use crate::error::PalaceError;
use crate::order::Decision;
use crate::pipeline::OrderPipeline;

/// Catalog + order pipeline behind a single command entry point.
#[derive(Debug, Default)]
pub struct Engine {
    pub catalog: Catalog,
    pub pipeline: OrderPipeline,
}

impl Engine {
    /// Create an engine with an empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine whose menu starts with `entries`, in order.
    pub fn with_menu(entries: impl IntoIterator<Item = MenuEntry>) -> Self {
        Self {
            catalog: Catalog::from_entries(entries),
            pipeline: OrderPipeline::new(),
        }
    }

    /// Process a single command and return output events.
    ///
    /// Failures come back as a single [`OutputEvent::Rejected`]; the state
    /// is unchanged in that case.
    pub fn process_command(&mut self, cmd: Command) -> Vec<OutputEvent> {
        let command = cmd.name();
        debug!(command, "processing command");

        let result = match cmd {
            Command::AddMenuEntry(add) => self.process_add(add),
            Command::RemoveMenuEntry { id } => self
                .catalog
                .remove(id)
                .map(|entry| vec![OutputEvent::EntryRemoved(entry)]),
            Command::ListMenuSorted => Ok(vec![OutputEvent::Menu(self.catalog.sorted_view())]),
            Command::SearchByPrice { price } => Ok(vec![self.search(price)]),
            Command::PlaceOrder(order) => Ok(self.process_place(order)),
            Command::ProcessNextOrder { decision } => self.process_next(decision),
            Command::ListPendingOrders => Ok(vec![OutputEvent::Pending(
                self.pipeline.pending().cloned().collect(),
            )]),
            Command::ListOrderHistory => Ok(vec![OutputEvent::History(
                self.pipeline.history().cloned().collect(),
            )]),
            Command::GetRevenue => Ok(vec![OutputEvent::Revenue(
                self.pipeline.cumulative_revenue(),
            )]),
        };

        result.unwrap_or_else(|err| {
            warn!(command, kind = err.kind(), error = %err, "command rejected");
            vec![OutputEvent::Rejected {
                command,
                reason: RejectReason::from(&err),
            }]
        })
    }

    fn process_add(&mut self, add: AddMenuEntry) -> Result<Vec<OutputEvent>, PalaceError> {
        let entry = MenuEntry::new(add.id, add.name, add.price)?;
        let id = entry.id;
        let indexed = self.catalog.add(entry);
        Ok(vec![OutputEvent::EntryAdded(EntryAdded { id, indexed })])
    }

    fn search(&self, price: Decimal) -> OutputEvent {
        OutputEvent::SearchResult {
            price,
            name: self.catalog.search_by_price(price).map(str::to_owned),
        }
    }

    /// Resolve requested lines against the menu and queue the order.
    ///
    /// Lines naming an unknown item are dropped and reported; the order is
    /// queued regardless, even if no line survives.
    fn process_place(&mut self, order: PlaceOrder) -> Vec<OutputEvent> {
        let mut events = Vec::new();
        let mut lines = Vec::with_capacity(order.lines.len());

        for request in &order.lines {
            match self.catalog.resolve_line(request.item_id, request.quantity) {
                Ok(line) => lines.push(line),
                Err(err) => {
                    warn!(table = order.table, error = %err, "dropping order line");
                    events.push(OutputEvent::UnresolvedItem {
                        table: order.table,
                        item_id: request.item_id,
                    });
                }
            }
        }

        let line_count = lines.len();
        let ticket = self.pipeline.place_order(order.table, lines);
        events.push(OutputEvent::OrderQueued {
            ticket,
            table: order.table,
            lines: line_count,
        });
        events
    }

    fn process_next(&mut self, decision: Decision) -> Result<Vec<OutputEvent>, PalaceError> {
        let order = self.pipeline.process_next(decision)?;
        let (ticket, table, status, total) =
            (order.ticket, order.table, order.status(), order.total());

        Ok(vec![OutputEvent::OrderDecided(OrderDecided {
            ticket,
            table,
            status,
            total,
            revenue: self.pipeline.cumulative_revenue(),
        })])
    }

    // ========================================================================
    // Utility Methods
    // ========================================================================

    /// Get the running revenue.
    #[inline]
    pub fn revenue(&self) -> Decimal {
        self.pipeline.cumulative_revenue()
    }

    /// Get the number of orders awaiting a decision.
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pipeline.pending_len()
    }

    /// Compute state hash for determinism testing.
    ///
    /// Covers the menu, the index contents, both order collections and
    /// revenue. Timestamps are left out.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        for entry in self.catalog.iter() {
            entry.hash(&mut hasher);
        }
        for (price, name) in self.catalog.index().iter() {
            price.hash(&mut hasher);
            name.hash(&mut hasher);
        }
        self.catalog.index().height().hash(&mut hasher);

        for order in self.pipeline.pending().chain(self.pipeline.history()) {
            order.ticket.hash(&mut hasher);
            order.table.hash(&mut hasher);
            order.lines.hash(&mut hasher);
            order.status().hash(&mut hasher);
        }
        self.pipeline.cumulative_revenue().hash(&mut hasher);

        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::LineRequest;
    use crate::order::OrderStatus;

    fn seeded() -> Engine {
        Engine::with_menu([
            MenuEntry::new(1, "Burger", Decimal::new(10000, 2)).unwrap(),
            MenuEntry::new(2, "Pizza", Decimal::new(50000, 2)).unwrap(),
            MenuEntry::new(3, "Pasta", Decimal::new(35000, 2)).unwrap(),
        ])
    }

    fn place(table: u32, lines: &[(u64, u32)]) -> Command {
        Command::PlaceOrder(PlaceOrder {
            table,
            lines: lines
                .iter()
                .map(|&(item_id, quantity)| LineRequest { item_id, quantity })
                .collect(),
        })
    }

    #[test]
    fn test_engine_creation() {
        let engine = Engine::new();
        assert!(engine.catalog.is_empty());
        assert_eq!(engine.pending_count(), 0);
        assert_eq!(engine.revenue(), Decimal::ZERO);
    }

    #[test]
    fn test_add_menu_entry() {
        let mut engine = Engine::new();
        let events = engine.process_command(Command::AddMenuEntry(AddMenuEntry {
            id: 10,
            name: "Soup".into(),
            price: Decimal::new(4500, 2),
        }));
        assert_eq!(
            events,
            vec![OutputEvent::EntryAdded(EntryAdded { id: 10, indexed: true })]
        );
        assert_eq!(engine.catalog.len(), 1);
    }

    #[test]
    fn test_add_negative_price_rejected() {
        let mut engine = Engine::new();
        let events = engine.process_command(Command::AddMenuEntry(AddMenuEntry {
            id: 10,
            name: "Soup".into(),
            price: Decimal::new(-1, 0),
        }));
        assert!(matches!(
            events[..],
            [OutputEvent::Rejected { reason: RejectReason::NegativePrice(_), .. }]
        ));
        assert!(engine.catalog.is_empty());
    }

    #[test]
    fn test_remove_missing_item() {
        let mut engine = seeded();
        let events = engine.process_command(Command::RemoveMenuEntry { id: 99 });
        assert_eq!(
            events,
            vec![OutputEvent::Rejected {
                command: "remove_menu_entry",
                reason: RejectReason::ItemNotFound(99),
            }]
        );
    }

    #[test]
    fn test_search_hit_and_miss() {
        let mut engine = seeded();
        let hit = engine.process_command(Command::SearchByPrice { price: Decimal::new(35000, 2) });
        assert_eq!(
            hit,
            vec![OutputEvent::SearchResult {
                price: Decimal::new(35000, 2),
                name: Some("Pasta".into()),
            }]
        );

        let miss = engine.process_command(Command::SearchByPrice { price: Decimal::new(999, 0) });
        assert!(matches!(&miss[..], [OutputEvent::SearchResult { name: None, .. }]));
    }

    #[test]
    fn test_place_order_drops_unknown_items() {
        let mut engine = seeded();
        let events = engine.process_command(place(4, &[(1, 2), (42, 1), (3, 1)]));

        assert_eq!(
            events,
            vec![
                OutputEvent::UnresolvedItem { table: 4, item_id: 42 },
                OutputEvent::OrderQueued { ticket: 1, table: 4, lines: 2 },
            ]
        );
        let pending: Vec<_> = engine.pipeline.pending().collect();
        assert_eq!(pending[0].lines.len(), 2);
        assert_eq!(pending[0].lines[1].name, "Pasta");
    }

    #[test]
    fn test_place_order_with_no_valid_lines_still_queues() {
        let mut engine = seeded();
        engine.process_command(place(8, &[(77, 1)]));
        assert_eq!(engine.pending_count(), 1);
    }

    #[test]
    fn test_process_empty_queue() {
        let mut engine = seeded();
        let events =
            engine.process_command(Command::ProcessNextOrder { decision: Decision::Accept });
        assert!(matches!(
            events[..],
            [OutputEvent::Rejected { reason: RejectReason::EmptyQueue, .. }]
        ));
    }

    #[test]
    fn test_price_snapshot_survives_menu_change() {
        let mut engine = seeded();
        engine.process_command(place(1, &[(1, 1)]));

        // Burger is replaced by a pricier one
        engine.process_command(Command::RemoveMenuEntry { id: 1 });
        engine.process_command(Command::AddMenuEntry(AddMenuEntry {
            id: 1,
            name: "Burger".into(),
            price: Decimal::new(20000, 2),
        }));

        let events =
            engine.process_command(Command::ProcessNextOrder { decision: Decision::Accept });
        match &events[..] {
            [OutputEvent::OrderDecided(d)] => {
                assert_eq!(d.total, Some(Decimal::new(10000, 2)));
                assert_eq!(d.status, OrderStatus::Approved);
            }
            other => panic!("Expected OrderDecided, got {:?}", other),
        }
        assert_eq!(engine.revenue(), Decimal::new(10000, 2));
    }

    #[test]
    fn test_reject_overflowing_order_reports_no_total() {
        let mut engine = Engine::with_menu([MenuEntry::new(1, "Gold", Decimal::MAX).unwrap()]);
        engine.process_command(place(1, &[(1, 2)]));

        let events =
            engine.process_command(Command::ProcessNextOrder { decision: Decision::Reject });
        match &events[..] {
            [OutputEvent::OrderDecided(d)] => {
                assert_eq!(d.status, OrderStatus::Rejected);
                assert_eq!(d.total, None);
            }
            other => panic!("Expected OrderDecided, got {:?}", other),
        }
        assert_eq!(engine.revenue(), Decimal::ZERO);
    }

    #[test]
    fn test_state_hash_determinism() {
        let mut engine1 = seeded();
        let mut engine2 = seeded();

        for table in 0..20 {
            let cmd = place(table, &[(u64::from(table % 4), 1 + table)]);
            engine1.process_command(cmd.clone());
            engine2.process_command(cmd);
        }
        assert_eq!(engine1.state_hash(), engine2.state_hash());

        engine1.process_command(Command::ProcessNextOrder { decision: Decision::Reject });
        assert_ne!(engine1.state_hash(), engine2.state_hash());
    }
}
