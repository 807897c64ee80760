use std::io;
use std::path::PathBuf;

use clap::Parser;
use food_palace::seed::{default_menu, load_menu};
use food_palace::{logging, Console, Engine, Session};
use tracing::info;

/// Food Palace ordering console
#[derive(Parser, Debug)]
#[command(name = "food-palace")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Menu CSV (id,name,price) to open with instead of the house menu
    #[arg(long, conflicts_with = "empty_menu")]
    menu: Option<PathBuf>,

    /// Open with no menu items
    #[arg(long)]
    empty_menu: bool,

    /// Log filter, e.g. `info` or `food_palace=debug` (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
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
    info!(items = engine.catalog.len(), "food palace open");

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    Session::new(&mut engine, console).run()?;

    info!(revenue = %engine.revenue(), "food palace closed");
    Ok(())
}
