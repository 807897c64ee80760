//! Session scripts: CSV rows decoded into engine commands.
//!
//! A script replays a shift without a keyboard. Each row names an `op`
//! and fills in only the columns that op needs:
//!
//! ```text
//! op,id,name,price,table,items,decision
//! add,4,Soup,120.00,,,
//! order,,,,7,1:2;3:1,
//! process,,,,,,accept
//! revenue,,,,,,
//! ```
//!
//! `items` is a `;`-separated list of `item_id:quantity` pairs.

use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use crate::command::{AddMenuEntry, Command, LineRequest, PlaceOrder};
use crate::error::PalaceError;
use crate::order::Decision;

/// Raw CSV row of a session script
#[derive(Debug, Default, Deserialize)]
pub struct ScriptRow {
    pub op: String,
    pub id: Option<u64>,
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    pub table: Option<u32>,
    pub items: Option<String>,
    pub decision: Option<String>,
}

impl ScriptRow {
    /// Convert raw row to a typed command.
    ///
    /// Returns `None` for unknown ops or when a required column is missing.
    pub fn to_command(&self) -> Option<Command> {
        match self.op.trim().to_ascii_lowercase().as_str() {
            "add" => Some(Command::AddMenuEntry(AddMenuEntry {
                id: self.id?,
                name: self.name.as_deref()?.trim().to_string(),
                price: self.price?,
            })),
            "remove" => Some(Command::RemoveMenuEntry { id: self.id? }),
            "menu" => Some(Command::ListMenuSorted),
            "search" => Some(Command::SearchByPrice { price: self.price? }),
            "order" => Some(Command::PlaceOrder(PlaceOrder {
                table: self.table?,
                lines: parse_items(self.items.as_deref().unwrap_or(""))?,
            })),
            "process" => Some(Command::ProcessNextOrder {
                decision: parse_decision(self.decision.as_deref()?)?,
            }),
            "pending" => Some(Command::ListPendingOrders),
            "history" => Some(Command::ListOrderHistory),
            "revenue" => Some(Command::GetRevenue),
            _ => None,
        }
    }
}

/// Parse `1:2;3:1` into line requests. An empty string is an empty order.
pub fn parse_items(items: &str) -> Option<Vec<LineRequest>> {
    items
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (id, qty) = pair.split_once(':')?;
            Some(LineRequest {
                item_id: id.trim().parse().ok()?,
                quantity: qty.trim().parse().ok()?,
            })
        })
        .collect()
}

/// Accepts `accept`/`reject` and the console's `yes`/`no`.
pub fn parse_decision(word: &str) -> Option<Decision> {
    match word.trim().to_ascii_lowercase().as_str() {
        "accept" | "yes" | "y" => Some(Decision::Accept),
        "reject" | "no" | "n" => Some(Decision::Reject),
        _ => None,
    }
}

/// Decode every usable row of a script.
///
/// Undecodable rows are skipped with a warning.
pub fn read_script<R: Read>(reader: R) -> Result<Vec<Command>, PalaceError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut commands = Vec::new();

    for (line, row) in csv.deserialize::<ScriptRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(row = line + 1, error = %err, "skipping unreadable script row");
                continue;
            }
        };
        match row.to_command() {
            Some(cmd) => commands.push(cmd),
            None => warn!(row = line + 1, op = %row.op, "skipping incomplete script row"),
        }
    }

    Ok(commands)
}

/// Load a script from disk.
pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<Command>, PalaceError> {
    let path = path.as_ref();
    let commands = read_script(std::fs::File::open(path)?)?;
    info!(path = %path.display(), commands = commands.len(), "script loaded");
    Ok(commands)
}
