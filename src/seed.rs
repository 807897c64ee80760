//! Initial menu: the house defaults or a CSV file.
//!
//! CSV layout (header required):
//!
//! ```text
//! id,name,price
//! 1,Burger,100.00
//! 2,Pizza,500.00
//! ```

use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::MenuEntry;
use crate::error::PalaceError;

/// The menu the restaurant opens with.
pub fn default_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry {
            id: 1,
            name: "Burger".to_string(),
            price: Decimal::new(10000, 2),
        },
        MenuEntry {
            id: 2,
            name: "Pizza".to_string(),
            price: Decimal::new(50000, 2),
        },
        MenuEntry {
            id: 3,
            name: "Pasta".to_string(),
            price: Decimal::new(35000, 2),
        },
    ]
}

/// Raw row of a menu CSV
#[derive(Debug, Deserialize)]
pub struct MenuRow {
    pub id: u64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

impl MenuRow {
    /// Convert into a validated entry
    pub fn into_entry(self) -> Result<MenuEntry, PalaceError> {
        MenuEntry::new(self.id, self.name.trim(), self.price)
    }
}

/// Read menu entries from CSV.
///
/// Rows that fail to parse or carry a negative price are skipped with a
/// warning; the remaining rows are returned in file order.
pub fn read_menu<R: Read>(reader: R) -> Result<Vec<MenuEntry>, PalaceError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut entries = Vec::new();

    for (line, row) in csv.deserialize::<MenuRow>().enumerate() {
        match row.map_err(PalaceError::from).and_then(MenuRow::into_entry) {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!(row = line + 1, error = %err, "skipping menu row"),
        }
    }

    Ok(entries)
}

/// Load a menu CSV from disk.
pub fn load_menu(path: impl AsRef<Path>) -> Result<Vec<MenuEntry>, PalaceError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let entries = read_menu(file)?;
    info!(path = %path.display(), items = entries.len(), "menu loaded");
    Ok(entries)
}
