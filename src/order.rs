//! Orders and their lifecycle.
//!
//! ```text
//!            accept
//!          +--------> Approved
//! Pending -+
//!          +--------> Rejected
//!            reject
//! ```
//!
//! Both outcomes are terminal. A decided order is never mutated again.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PalaceError;

/// Where an order is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Waiting in the queue for an admin decision
    Pending,
    /// Accepted; its total counts towards revenue
    Approved,
    /// Declined; no revenue
    Rejected,
}

impl OrderStatus {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Approved => "Approved",
            OrderStatus::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

/// Admin verdict on the head of the queue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    /// Status an order ends in under this decision
    #[inline]
    pub const fn outcome(self) -> OrderStatus {
        match self {
            Decision::Accept => OrderStatus::Approved,
            Decision::Reject => OrderStatus::Rejected,
        }
    }
}

/// One dish on an order, priced at the moment the order was placed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderItemLine {
    pub name: String,
    pub quantity: u32,
    /// Catalog price snapshot; later menu changes do not affect it
    pub unit_price: Decimal,
}

impl OrderItemLine {
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// quantity × unit price, or `None` on decimal overflow
    #[inline]
    pub fn subtotal(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}

/// A table's order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    /// Sequence number assigned by the pipeline at placement
    pub ticket: u64,
    pub table: u32,
    /// Lines in entry order
    pub lines: Vec<OrderItemLine>,
    status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a pending order
    pub fn new(ticket: u64, table: u32, lines: Vec<OrderItemLine>) -> Self {
        Self {
            ticket,
            table,
            lines,
            status: OrderStatus::Pending,
            placed_at: Utc::now(),
            decided_at: None,
        }
    }

    #[inline]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    #[inline]
    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    /// Σ quantity × unit price over all lines, or `None` on decimal overflow
    pub fn total(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.subtotal()?))
    }

    /// Total number of items across all lines
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Apply the single allowed status transition.
    ///
    /// Fails with [`PalaceError::AlreadyDecided`] if the order is no longer
    /// pending.
    pub fn decide(&mut self, decision: Decision) -> Result<OrderStatus, PalaceError> {
        if self.status.is_terminal() {
            return Err(PalaceError::AlreadyDecided { ticket: self.ticket });
        }
        self.status = decision.outcome();
        self.decided_at = Some(Utc::now());
        Ok(self.status)
    }
}
