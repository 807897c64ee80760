//! Error type shared by every component.
//!
//! All failures are locally recoverable. Components return
//! `Result<_, PalaceError>`, or `Option` where absence is a normal outcome
//! such as a price search miss, and the engine turns failures into
//! [`OutputEvent::Rejected`](crate::command::OutputEvent::Rejected).

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the catalog, the order pipeline and the I/O edges.
#[derive(Debug, Error)]
pub enum PalaceError {
    /// No menu entry carries this identifier.
    #[error("item {0} not found")]
    ItemNotFound(u64),

    /// Processing was requested with no pending orders.
    #[error("order queue is empty")]
    EmptyQueue,

    /// An order line referenced an unknown item identifier.
    ///
    /// Order placement never raises this; it is reported through
    /// [`OutputEvent::UnresolvedItem`](crate::command::OutputEvent::UnresolvedItem).
    #[error("order line references unknown item {0}")]
    UnresolvedReference(u64),

    /// Menu prices must be zero or positive.
    #[error("price {0} is negative")]
    NegativePrice(Decimal),

    /// Order total exceeded the decimal range.
    #[error("order total for table {table} overflows")]
    AmountOverflow { table: u32 },

    /// An order left the pending state already.
    #[error("order {ticket} was already decided")]
    AlreadyDecided { ticket: u64 },

    /// The terminal input stream ended while a value was expected.
    #[error("input stream closed")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PalaceError {
    /// Short machine-friendly tag, used in logs and replay output.
    pub fn kind(&self) -> &'static str {
        match self {
            PalaceError::ItemNotFound(_) => "not_found",
            PalaceError::EmptyQueue => "empty_queue",
            PalaceError::UnresolvedReference(_) => "unresolved_reference",
            PalaceError::NegativePrice(_) => "negative_price",
            PalaceError::AmountOverflow { .. } => "amount_overflow",
            PalaceError::AlreadyDecided { .. } => "already_decided",
            PalaceError::InputClosed => "input_closed",
            PalaceError::Io(_) => "io",
            PalaceError::Csv(_) => "csv",
        }
    }
}
