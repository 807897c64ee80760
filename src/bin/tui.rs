use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use food_palace::seed::default_menu;
use food_palace::terminal::render_event;
use food_palace::{
    Command, Decision, Engine, LineRequest, MenuEntry, Order, OrderStatus, PlaceOrder,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::{io, time::Duration};
use tracing::warn;

const FEED_INTERVAL: Duration = Duration::from_millis(1500);
const MAX_PENDING: usize = 12;

struct Shared {
    engine: Mutex<Engine>,
    orders_fed: AtomicU64,
    running: AtomicBool,
}

/// What one frame shows, copied out under the lock
struct Snapshot {
    menu: Vec<MenuEntry>,
    pending: Vec<Order>,
    next_table: Option<u32>,
    history: Vec<Order>,
    revenue: Decimal,
}

impl Snapshot {
    fn take(engine: &Engine) -> Self {
        Self {
            menu: engine.catalog.sorted_view(),
            pending: engine.pipeline.pending().cloned().collect(),
            next_table: engine.pipeline.peek_next().map(|o| o.table),
            history: engine.pipeline.history().take(15).cloned().collect(),
            revenue: engine.revenue(),
        }
    }
}

fn lock(shared: &Shared) -> std::sync::MutexGuard<'_, Engine> {
    shared.engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Synthetic customers: a random table orders one to three dishes.
fn run_feed(shared: Arc<Shared>) {
    let mut rng = 12345u64; // Simple LCG

    while shared.running.load(Ordering::Relaxed) {
        thread::sleep(FEED_INTERVAL);

        let mut engine = lock(&shared);
        if engine.pending_count() >= MAX_PENDING {
            continue;
        }
        let ids: Vec<u64> = engine.catalog.iter().map(|e| e.id).collect();
        if ids.is_empty() {
            continue;
        }

        rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
        // High bits only (LCG low bits are poor)
        let r = rng >> 33;
        let line_count = 1 + (r % 3) as usize;
        let lines = (0..line_count)
            .map(|i| LineRequest {
                item_id: ids[((r >> (i * 4)) as usize) % ids.len()],
                quantity: 1 + ((r >> (i * 3)) % 4) as u32,
            })
            .collect();

        engine.process_command(Command::PlaceOrder(PlaceOrder {
            table: 1 + (r % 20) as u32,
            lines,
        }));
        shared.orders_fed.fetch_add(1, Ordering::Relaxed);
    }
}

fn render_menu(menu: &[MenuEntry]) -> String {
    menu.iter()
        .map(|e| format!("{:>3}. {:<14} Rs.{:>8}\n", e.id, e.name, e.price))
        .collect()
}

fn render_order(order: &Order) -> String {
    let items: Vec<String> = order
        .lines
        .iter()
        .map(|l| format!("{} x{}", l.name, l.quantity))
        .collect();
    let total = order.total().map_or_else(|| "overflow".to_string(), |t| t.to_string());
    format!("#{:<4} T{:<3} Rs.{:>8}  {}\n", order.ticket, order.table, total, items.join(", "))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let shared = Arc::new(Shared {
        engine: Mutex::new(Engine::with_menu(default_menu())),
        orders_fed: AtomicU64::new(0),
        running: AtomicBool::new(true),
    });
    let feed = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || run_feed(shared))
    };

    let mut last_message = String::from("Waiting for orders...");

    loop {
        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let decision = match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Char('a') => Some(Decision::Accept),
                        KeyCode::Char('r') => Some(Decision::Reject),
                        _ => None,
                    };
                    if let Some(decision) = decision {
                        let cmd = Command::ProcessNextOrder { decision };
                        let events = lock(&shared).process_command(cmd);
                        if let Some(event) = events.first() {
                            last_message = render_event(event);
                        }
                    }
                }
            }
        }

        let snapshot = Snapshot::take(&lock(&shared));
        let fed = shared.orders_fed.load(Ordering::Relaxed);

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints(
                    [
                        Constraint::Length(3), // Header
                        Constraint::Min(10),   // Menu + queues
                        Constraint::Length(5), // Stats
                    ]
                    .as_ref(),
                )
                .split(f.size());

            // 1. Header
            let header = Block::default()
                .borders(Borders::ALL)
                .title("FOOD PALACE Kitchen Dashboard");
            let title = Paragraph::new("'a' accept next | 'r' reject next | 'q' quit")
                .block(header)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(title, chunks[0]);

            // 2. Menu, pending queue, history
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(25),
                    Constraint::Percentage(40),
                    Constraint::Percentage(35),
                ])
                .split(chunks[1]);

            let menu_widget = Paragraph::new(render_menu(&snapshot.menu))
                .block(Block::default().borders(Borders::ALL).title("MENU (by price)"));

            let pending_text: String = snapshot.pending.iter().map(render_order).collect();
            let pending_widget = Paragraph::new(pending_text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(match snapshot.next_table {
                        Some(table) => {
                            format!("PENDING ({}) next: table {}", snapshot.pending.len(), table)
                        }
                        None => "PENDING (0)".to_string(),
                    })
                    .style(Style::default().fg(Color::Yellow)),
            );

            let history_lines: Vec<Line> = snapshot
                .history
                .iter()
                .map(|order| {
                    let color = match order.status() {
                        OrderStatus::Approved => Color::Green,
                        _ => Color::Red,
                    };
                    let text = render_order(order).trim_end().to_string();
                    Line::styled(text, Style::default().fg(color))
                })
                .collect();
            let history_widget = Paragraph::new(history_lines)
                .block(Block::default().borders(Borders::ALL).title("HISTORY (latest first)"));

            f.render_widget(menu_widget, body[0]);
            f.render_widget(pending_widget, body[1]);
            f.render_widget(history_widget, body[2]);

            // 3. Stats
            let stats_text = format!(
                "Total Income of the Day: Rs.{}\nOrders fed: {}\nLast action: {}",
                snapshot.revenue, fed, last_message
            );
            let stats_block = Paragraph::new(stats_text)
                .block(Block::default().borders(Borders::ALL).title("Billing"))
                .style(Style::default().fg(Color::Green));
            f.render_widget(stats_block, chunks[2]);
        })?;
    }

    shared.running.store(false, Ordering::Relaxed);
    let feed_result = join_feed(feed);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    feed_result?;
    Ok(())
}

/// Wait for the feed thread; a panic there becomes an error.
fn join_feed(feed: thread::JoinHandle<()>) -> Result<(), String> {
    feed.join().map_err(|panic| {
        let reason = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        warn!(%reason, "order feed thread panicked");
        format!("order feed thread panicked: {}", reason)
    })
}
