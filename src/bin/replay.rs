use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use food_palace::script::load_script;
use food_palace::seed::{default_menu, load_menu};
use food_palace::terminal::render_event;
use food_palace::{logging, Engine, Order, OrderStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

/// Replay a CSV session script against a fresh engine
#[derive(Parser, Debug)]
#[command(name = "replay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script CSV (op,id,name,price,table,items,decision)
    script: PathBuf,

    /// Menu CSV to open with instead of the house menu
    #[arg(long, conflicts_with = "empty_menu")]
    menu: Option<PathBuf>,

    /// Open with no menu items
    #[arg(long)]
    empty_menu: bool,

    /// Write the decided orders, most recent first, to this CSV
    #[arg(long)]
    history_out: Option<PathBuf>,

    /// Log filter (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

/// One exported history row
#[derive(Debug, Serialize)]
struct HistoryRow {
    ticket: u64,
    table: u32,
    status: OrderStatus,
    items: u64,
    #[serde(with = "rust_decimal::serde::str_option")]
    total: Option<Decimal>,
    placed_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
}

impl From<&Order> for HistoryRow {
    fn from(order: &Order) -> Self {
        Self {
            ticket: order.ticket,
            table: order.table,
            status: order.status(),
            items: order.item_count(),
            total: order.total(),
            placed_at: order.placed_at,
            decided_at: order.decided_at(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logging::init(args.log.as_deref());

    let menu = match (&args.menu, args.empty_menu) {
        (Some(path), _) => load_menu(path)?,
        (None, true) => Vec::new(),
        (None, false) => default_menu(),
    };
    let mut engine = Engine::with_menu(menu);

    let commands = load_script(&args.script)?;
    for (step, cmd) in commands.into_iter().enumerate() {
        println!("[{}] {}", step + 1, cmd.name());
        for event in engine.process_command(cmd) {
            println!("{}", render_event(&event));
        }
    }

    println!("---------------------------");
    println!("Pending: {}", engine.pending_count());
    println!("Decided: {}", engine.pipeline.history_len());
    println!("Total Income of the Day: Rs.{}", engine.revenue());
    println!("State hash: {:016x}", engine.state_hash());

    if let Some(path) = &args.history_out {
        let mut writer = csv::Writer::from_path(path)?;
        for order in engine.pipeline.history() {
            writer.serialize(HistoryRow::from(order))?;
        }
        writer.flush()?;
        info!(path = %path.display(), orders = engine.pipeline.history_len(), "history written");
    }

    Ok(())
}
