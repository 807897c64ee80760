//! Order Pipeline - pending queue, decision history and revenue.
//!
//! New orders join the tail of a FIFO queue. An admin decides on the head
//! of the queue one order at a time; the decided order is pushed onto a
//! history stack, so history reads most-recent-first. Accepted orders add
//! their total to the running revenue.
//!
//! An order lives in exactly one of the two collections. The move from
//! queue to history happens once and is never undone.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::PalaceError;
use crate::order::{Decision, Order, OrderItemLine};

/// FIFO pending queue + LIFO history stack.
#[derive(Debug, Default)]
pub struct OrderPipeline {
    pending: VecDeque<Order>,
    history: Vec<Order>,
    revenue: Decimal,
    next_ticket: u64,
}

impl OrderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a new pending order for `table`.
    ///
    /// # Returns
    /// The ticket number assigned to the order.
    pub fn place_order(&mut self, table: u32, lines: Vec<OrderItemLine>) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let order = Order::new(ticket, table, lines);
        info!(
            ticket,
            table,
            lines = order.lines.len(),
            items = order.item_count(),
            "order queued"
        );
        self.pending.push_back(order);
        ticket
    }

    /// Decide on the oldest pending order and move it to history.
    ///
    /// # Errors
    /// - [`PalaceError::EmptyQueue`] if nothing is pending.
    /// - [`PalaceError::AmountOverflow`] if an accepted order's total (or
    ///   the new revenue) leaves the decimal range. The order stays at the
    ///   head of the queue.
    pub fn process_next(&mut self, decision: Decision) -> Result<&Order, PalaceError> {
        let head = self.pending.front().ok_or(PalaceError::EmptyQueue)?;

        let revenue = match decision {
            Decision::Accept => head
                .total()
                .and_then(|total| self.revenue.checked_add(total))
                .ok_or(PalaceError::AmountOverflow { table: head.table })?,
            Decision::Reject => self.revenue,
        };

        let mut order = self.pending.pop_front().ok_or(PalaceError::EmptyQueue)?;
        let status = order.decide(decision)?;
        self.revenue = revenue;

        info!(
            ticket = order.ticket,
            table = order.table,
            %status,
            revenue = %self.revenue,
            "order decided"
        );

        let slot = self.history.len();
        self.history.push(order);
        Ok(&self.history[slot])
    }

    /// Running total of accepted orders; never decreases.
    #[inline]
    pub fn cumulative_revenue(&self) -> Decimal {
        self.revenue
    }

    /// Pending orders, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &Order> {
        self.pending.iter()
    }

    /// Decided orders, most recent first
    pub fn history(&self) -> impl Iterator<Item = &Order> {
        self.history.iter().rev()
    }

    /// The order that would be decided next
    #[inline]
    pub fn peek_next(&self) -> Option<&Order> {
        self.pending.front()
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
