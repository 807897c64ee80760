//! Command and Event types for the engine.
//!
//! Commands are requests from whatever front end drives the engine (the
//! console session, a replay script, the dashboard). Events are what the
//! engine reports back; front ends only render them.

use rust_decimal::Decimal;

use crate::catalog::MenuEntry;
use crate::error::PalaceError;
use crate::order::{Decision, Order, OrderStatus};

// ============================================================================
// Input Commands
// ============================================================================

/// Add a dish to the menu
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddMenuEntry {
    pub id: u64,
    pub name: String,
    pub price: Decimal,
}

/// One requested line of an order, before catalog resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineRequest {
    /// Menu identifier to resolve
    pub item_id: u64,
    pub quantity: u32,
}

/// Place an order for a table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceOrder {
    pub table: u32,
    pub lines: Vec<LineRequest>,
}

/// Input commands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AddMenuEntry(AddMenuEntry),
    RemoveMenuEntry { id: u64 },
    ListMenuSorted,
    SearchByPrice { price: Decimal },
    PlaceOrder(PlaceOrder),
    ProcessNextOrder { decision: Decision },
    ListPendingOrders,
    ListOrderHistory,
    GetRevenue,
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddMenuEntry(_) => "add_menu_entry",
            Command::RemoveMenuEntry { .. } => "remove_menu_entry",
            Command::ListMenuSorted => "list_menu_sorted",
            Command::SearchByPrice { .. } => "search_by_price",
            Command::PlaceOrder(_) => "place_order",
            Command::ProcessNextOrder { .. } => "process_next_order",
            Command::ListPendingOrders => "list_pending_orders",
            Command::ListOrderHistory => "list_order_history",
            Command::GetRevenue => "get_revenue",
        }
    }
}

// ============================================================================
// Output Events
// ============================================================================

/// A menu entry was stored
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryAdded {
    pub id: u64,
    /// False when another entry already owned this price in the index
    pub indexed: bool,
}

/// An order was decided and moved to history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderDecided {
    pub ticket: u64,
    pub table: u32,
    pub status: OrderStatus,
    /// Order total, `None` if it overflows; counted towards revenue only
    /// when approved
    pub total: Option<Decimal>,
    pub revenue: Decimal,
}

/// Output events from the engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputEvent {
    EntryAdded(EntryAdded),
    EntryRemoved(MenuEntry),
    /// Menu by ascending price
    Menu(Vec<MenuEntry>),
    /// Price search result; `name` is `None` when nothing matched
    SearchResult { price: Decimal, name: Option<String> },
    /// An order line named an unknown item and was dropped
    UnresolvedItem { table: u32, item_id: u64 },
    OrderQueued { ticket: u64, table: u32, lines: usize },
    OrderDecided(OrderDecided),
    /// Pending orders, oldest first
    Pending(Vec<Order>),
    /// Decided orders, most recent first
    History(Vec<Order>),
    Revenue(Decimal),
    /// The command failed; nothing changed
    Rejected { command: &'static str, reason: RejectReason },
}

/// Why a command was rejected.
///
/// A cloneable mirror of the [`PalaceError`] variants a command can hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    ItemNotFound(u64),
    EmptyQueue,
    NegativePrice(Decimal),
    AmountOverflow { table: u32 },
    AlreadyDecided { ticket: u64 },
    /// An I/O-level failure that cannot occur inside the engine
    Internal,
}

impl From<&PalaceError> for RejectReason {
    fn from(err: &PalaceError) -> Self {
        match *err {
            PalaceError::ItemNotFound(id) | PalaceError::UnresolvedReference(id) => {
                RejectReason::ItemNotFound(id)
            }
            PalaceError::EmptyQueue => RejectReason::EmptyQueue,
            PalaceError::NegativePrice(price) => RejectReason::NegativePrice(price),
            PalaceError::AmountOverflow { table } => RejectReason::AmountOverflow { table },
            PalaceError::AlreadyDecided { ticket } => RejectReason::AlreadyDecided { ticket },
            PalaceError::InputClosed | PalaceError::Io(_) | PalaceError::Csv(_) => {
                RejectReason::Internal
            }
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::ItemNotFound(_) => f.write_str("Item not found!"),
            RejectReason::EmptyQueue => f.write_str("No pending orders."),
            RejectReason::NegativePrice(price) => write!(f, "Price {} cannot be negative.", price),
            RejectReason::AmountOverflow { table } => {
                write!(f, "Order total for table {} is too large.", table)
            }
            RejectReason::AlreadyDecided { ticket } => {
                write!(f, "Order #{} was already processed.", ticket)
            }
            RejectReason::Internal => f.write_str("Internal error."),
        }
    }
}
