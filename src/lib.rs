//! # Food Palace
//!
//! A restaurant ordering engine: a menu catalog with a balanced price
//! index, a first-come first-served order queue and a running tally of the
//! day's revenue.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: One [`Engine`] owns all state; front ends only send commands
//! - **Arena Allocation**: Index nodes live in one vector, linked by 32-bit indices
//! - **Exact Money**: Prices are decimals with checked arithmetic, never floats
//!
//! ## Architecture
//!
//! ```text
//! [Console / Script / Dashboard] --> [Command] --> [Engine]
//!                                                     |
//!                                              [Output Events]
//! ```

pub mod arena;
pub mod catalog;
pub mod command;
pub mod engine;
pub mod error;
pub mod logging;
pub mod order;
pub mod pipeline;
pub mod price_index;
pub mod script;
pub mod seed;
pub mod sorter;
pub mod terminal;

// Re-exports for convenience
pub use arena::{Arena, ArenaIndex, IndexNode, NULL_INDEX};
pub use catalog::{Catalog, MenuEntry};
pub use command::{
    AddMenuEntry, Command, LineRequest, OrderDecided, OutputEvent, PlaceOrder, RejectReason,
};
pub use engine::Engine;
pub use error::PalaceError;
pub use order::{Decision, Order, OrderItemLine, OrderStatus};
pub use pipeline::OrderPipeline;
pub use price_index::PriceIndex;
pub use sorter::{sort_by_price, Priced};
pub use terminal::{Console, Prompt, Session};
