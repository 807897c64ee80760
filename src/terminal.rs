//! Terminal front end: prompting, rendering and the menu-driven session.
//!
//! Nothing in here owns state. The [`Session`] turns keyboard choices into
//! [`Command`]s, hands them to the [`Engine`] and prints whatever comes
//! back, so the same engine can sit behind a script runner or a dashboard
//! instead.

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::MenuEntry;
use crate::command::{AddMenuEntry, Command, LineRequest, OutputEvent, PlaceOrder};
use crate::engine::Engine;
use crate::error::PalaceError;
use crate::order::{Decision, Order, OrderStatus};

const RULE: &str = "---------------------------";

// ============================================================================
// Prompting
// ============================================================================

/// Source of user input plus a sink for text.
///
/// Implementors supply raw line I/O; the typed readers re-prompt until the
/// input parses.
pub trait Prompt {
    /// Show `label` and read one line, without the trailing newline.
    fn read_line(&mut self, label: &str) -> Result<String, PalaceError>;

    /// Print a block of text followed by a newline.
    fn say(&mut self, text: &str) -> Result<(), PalaceError>;

    fn read_int<T: FromStr>(&mut self, label: &str) -> Result<T, PalaceError> {
        loop {
            let raw = self.read_line(label)?;
            match raw.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => self.say("Please enter a whole number.")?,
            }
        }
    }

    fn read_decimal(&mut self, label: &str) -> Result<Decimal, PalaceError> {
        loop {
            let raw = self.read_line(label)?;
            match Decimal::from_str(raw.trim()) {
                Ok(value) => return Ok(value),
                Err(_) => self.say("Please enter a number such as 120.50.")?,
            }
        }
    }

    /// Accepts yes/no (and y/n), case-insensitive.
    fn read_yes_no(&mut self, label: &str) -> Result<bool, PalaceError> {
        loop {
            let raw = self.read_line(label)?;
            match raw.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => self.say("Please answer yes or no.")?,
            }
        }
    }
}

/// [`Prompt`] over any buffered reader and writer (stdin/stdout in the
/// binary, in-memory buffers in tests).
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for Console<R, W> {
    fn read_line(&mut self, label: &str) -> Result<String, PalaceError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PalaceError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, text: &str) -> Result<(), PalaceError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn money(value: Option<Decimal>) -> String {
    value.map_or_else(|| "overflow".to_string(), |v| v.to_string())
}

/// `id. name - Rs.price`, one line per entry
pub fn render_menu(entries: &[MenuEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}. {} - Rs.{}", entry.id, entry.name, entry.price);
    }
    out.trim_end().to_string()
}

/// Tabular menu shown before taking an order
pub fn render_order_menu(entries: &[MenuEntry]) -> String {
    let mut out = String::from("\n\t------OUR FOOD MENU------\nItem Id\t\tFood Item\tPrice\n");
    for entry in entries {
        let _ = writeln!(out, "   {}\t\t{}\t\tRs.{}", entry.id, entry.name, entry.price);
    }
    out.trim_end().to_string()
}

/// Pending orders with quantities only
pub fn render_pending(orders: &[Order]) -> String {
    let mut out = String::from("Current Orders:\n");
    for order in orders {
        let _ = writeln!(out, "Table {}:", order.table);
        for line in &order.lines {
            let _ = writeln!(out, "{} x{}", line.name, line.quantity);
        }
        let _ = writeln!(out, "----------------");
    }
    out.trim_end().to_string()
}

fn render_lines(out: &mut String, order: &Order) {
    for line in &order.lines {
        let _ = writeln!(out, "{} x{} - Rs.{}", line.name, line.quantity, money(line.subtotal()));
    }
}

/// Decided orders with subtotals and totals, most recent first
pub fn render_history(orders: &[Order]) -> String {
    let mut out = String::from("Order Summaries:\n");
    for order in orders {
        let _ = writeln!(out, "Table {}: [{}]", order.table, order.status());
        render_lines(&mut out, order);
        let _ = writeln!(out, "Total: Rs.{}", money(order.total()));
        let _ = writeln!(out, "{}", RULE);
    }
    out.trim_end().to_string()
}

/// Customer-facing bills: pending orders first, then decided ones
pub fn render_bills(pending: &[Order], history: &[Order]) -> String {
    let mut out = String::from("Order Bills:\n");
    for order in pending {
        let _ = writeln!(out, "Table {}:", order.table);
        render_lines(&mut out, order);
        let _ = writeln!(out, "Status: Waiting for Admin Approval.");
        let _ = writeln!(out, "{}", RULE);
    }
    for order in history {
        let _ = writeln!(out, "Table {}:", order.table);
        render_lines(&mut out, order);
        match order.status() {
            OrderStatus::Rejected => {
                let _ = writeln!(out, "Status: Sorry, we can't proceed with your order.");
            }
            OrderStatus::Approved => {
                let _ = writeln!(out, "Status: Admin Approved your order.");
                let _ = writeln!(out, "Total: Rs.{}", money(order.total()));
            }
            OrderStatus::Pending => {}
        }
        let _ = writeln!(out, "{}", RULE);
    }
    out.trim_end().to_string()
}

pub fn render_revenue(revenue: Decimal) -> String {
    format!("Total Income of the Day: Rs.{}", revenue)
}

/// One event as console text
pub fn render_event(event: &OutputEvent) -> String {
    match event {
        OutputEvent::EntryAdded(added) if added.indexed => "Item added successfully!".to_string(),
        OutputEvent::EntryAdded(_) => {
            "Item added successfully! (search by its price shows an earlier item)".to_string()
        }
        OutputEvent::EntryRemoved(_) => "Item removed successfully!".to_string(),
        OutputEvent::Menu(entries) => render_menu(entries),
        OutputEvent::SearchResult { price, name: Some(name) } => {
            format!("Found: {} - Rs.{}", name, price)
        }
        OutputEvent::SearchResult { name: None, .. } => "Item not found.".to_string(),
        OutputEvent::UnresolvedItem { item_id, .. } => format!("Invalid item ID {}!", item_id),
        OutputEvent::OrderQueued { ticket, table, .. } => {
            format!("Order #{} placed for table {}.", ticket, table)
        }
        OutputEvent::OrderDecided(decided) => match decided.status {
            OrderStatus::Approved => "Order accepted and added to history.".to_string(),
            _ => "Order rejected.".to_string(),
        },
        OutputEvent::Pending(orders) => render_pending(orders),
        OutputEvent::History(orders) => render_history(orders),
        OutputEvent::Revenue(revenue) => render_revenue(*revenue),
        OutputEvent::Rejected { reason, .. } => reason.to_string(),
    }
}

// ============================================================================
// Session
// ============================================================================

/// Where control goes after a sub-menu returns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Back,
    Exit,
}

/// Menu-driven console session over an engine.
pub struct Session<'a, P> {
    engine: &'a mut Engine,
    prompt: P,
}

impl<'a, P: Prompt> Session<'a, P> {
    pub fn new(engine: &'a mut Engine, prompt: P) -> Self {
        Self { engine, prompt }
    }

    /// Give back the prompt (and with it the output sink)
    pub fn into_prompt(self) -> P {
        self.prompt
    }

    /// Run until the user exits.
    ///
    /// # Errors
    /// [`PalaceError::InputClosed`] if input ends mid-session, or any
    /// I/O error from the prompt.
    pub fn run(&mut self) -> Result<(), PalaceError> {
        loop {
            self.prompt.say(
                "--------------------------------------------------------------\n\
                 ====================WELCOME TO FOOD PALACE====================\n\
                 --------------------------------------------------------------\n\
                 \t1. Admin Section\n\
                 \t2. Customer Section\n\
                 \t3. Exit\n",
            )?;
            let flow = match self.prompt.read_int::<i64>("Enter your choice: ")? {
                1 => self.admin_section()?,
                2 => self.customer_section()?,
                3 => Flow::Exit,
                _ => {
                    self.prompt.say("Invalid choice! Try again.\n")?;
                    Flow::Back
                }
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn execute(&mut self, cmd: Command) -> Vec<OutputEvent> {
        debug!(command = cmd.name(), "session dispatch");
        self.engine.process_command(cmd)
    }

    /// Execute and print every resulting event
    fn show(&mut self, cmd: Command) -> Result<(), PalaceError> {
        for event in self.execute(cmd) {
            self.prompt.say(&render_event(&event))?;
        }
        Ok(())
    }

    fn pending_orders(&mut self) -> Vec<Order> {
        self.execute(Command::ListPendingOrders)
            .into_iter()
            .find_map(|e| match e {
                OutputEvent::Pending(orders) => Some(orders),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn order_history(&mut self) -> Vec<Order> {
        self.execute(Command::ListOrderHistory)
            .into_iter()
            .find_map(|e| match e {
                OutputEvent::History(orders) => Some(orders),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn sorted_menu(&mut self) -> Vec<MenuEntry> {
        self.execute(Command::ListMenuSorted)
            .into_iter()
            .find_map(|e| match e {
                OutputEvent::Menu(entries) => Some(entries),
                _ => None,
            })
            .unwrap_or_default()
    }

    // ========================================================================
    // Admin
    // ========================================================================

    fn admin_section(&mut self) -> Result<Flow, PalaceError> {
        loop {
            self.prompt.say(
                "\n\t================ADMIN SECTION===============\n\
                 \t\t1. Menu Management\n\
                 \t\t2. Order Processing\n\
                 \t\t3. Billing System\n\
                 \t\t4. Back to Main Menu\n\
                 \t\t5. Exit",
            )?;
            match self.prompt.read_int::<i64>("\nEnter your choice: ")? {
                1 => self.manage_menu()?,
                2 => self.process_orders()?,
                3 => self.billing_system()?,
                4 => return Ok(Flow::Back),
                5 => return Ok(Flow::Exit),
                _ => self.prompt.say("Invalid choice! Try again.")?,
            }
        }
    }

    fn manage_menu(&mut self) -> Result<(), PalaceError> {
        self.prompt.say("Menu Management:\n1. Add Item\n2. Remove Item\n3. Show Menu")?;
        match self.prompt.read_int::<i64>("Enter your choice: ")? {
            1 => {
                let id = self.prompt.read_int("Enter Item ID: ")?;
                let name = self.prompt.read_line("Enter Item Name: ")?;
                let price = self.prompt.read_decimal("Enter Price: ")?;
                self.show(Command::AddMenuEntry(AddMenuEntry {
                    id,
                    name: name.trim().to_string(),
                    price,
                }))
            }
            2 => {
                let id = self.prompt.read_int("Enter Item ID to Remove: ")?;
                self.show(Command::RemoveMenuEntry { id })
            }
            3 => {
                self.prompt.say("Updated Menu:")?;
                self.show(Command::ListMenuSorted)
            }
            _ => Ok(()),
        }
    }

    /// Decide on every pending order, oldest first.
    fn process_orders(&mut self) -> Result<(), PalaceError> {
        loop {
            let table = match self.pending_orders().first() {
                Some(order) => order.table,
                None => return self.prompt.say("No pending orders."),
            };
            self.prompt.say(&format!("Processing Order for Table {}", table))?;
            let accept = self.prompt.read_yes_no("Do you accept this order? (yes/no): ")?;
            let decision = if accept { Decision::Accept } else { Decision::Reject };

            let events = self.execute(Command::ProcessNextOrder { decision });
            let stuck = events.iter().any(|e| matches!(e, OutputEvent::Rejected { .. }));
            for event in &events {
                self.prompt.say(&render_event(event))?;
            }
            if stuck {
                return Ok(());
            }
        }
    }

    fn billing_system(&mut self) -> Result<(), PalaceError> {
        let history = self.order_history();
        self.prompt.say(&render_history(&history))?;
        self.show(Command::GetRevenue)
    }

    // ========================================================================
    // Customer
    // ========================================================================

    fn customer_section(&mut self) -> Result<Flow, PalaceError> {
        loop {
            self.prompt.say(
                "\n\t==============CUSTOMER SECTION================\n\
                 \t\t1. Place Your Order\n\
                 \t\t2. Show Ordered Food Items\n\
                 \t\t3. Display the Bill\n\
                 \t\t4. Search Item by Price\n\
                 \t\t5. Back to Main Menu\n\
                 \t\t6. Exit",
            )?;
            match self.prompt.read_int::<i64>("\nEnter your choice: ")? {
                1 => self.place_order()?,
                2 => {
                    let pending = self.pending_orders();
                    self.prompt.say(&render_pending(&pending))?;
                }
                3 => {
                    let pending = self.pending_orders();
                    let history = self.order_history();
                    self.prompt.say(&render_bills(&pending, &history))?;
                }
                4 => {
                    let price = self.prompt.read_decimal("Enter the price to search for: ")?;
                    self.show(Command::SearchByPrice { price })?;
                }
                5 => return Ok(Flow::Back),
                6 => return Ok(Flow::Exit),
                _ => self.prompt.say("Invalid choice! Try again.\n")?,
            }
        }
    }

    fn place_order(&mut self) -> Result<(), PalaceError> {
        let menu = self.sorted_menu();
        self.prompt.say(&render_order_menu(&menu))?;

        let table = self.prompt.read_int("Enter Table Number: ")?;
        let mut lines = Vec::new();
        loop {
            let item_id = self.prompt.read_int("Enter Item ID: ")?;
            let quantity = self.prompt.read_int("Enter Quantity: ")?;
            lines.push(LineRequest { item_id, quantity });
            if !self.prompt.read_yes_no("Do you need anything else? (yes/no): ")? {
                break;
            }
        }

        self.show(Command::PlaceOrder(PlaceOrder { table, lines }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_menu;
    use std::io::Cursor;

    fn run_session(engine: &mut Engine, input: &str) -> (Result<(), PalaceError>, String) {
        let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let mut session = Session::new(engine, console);
        let result = session.run();
        let output = session.into_prompt().into_output();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_read_int_reprompts() {
        let mut console = Console::new(Cursor::new(b"abc\n42\n".to_vec()), Vec::new());
        let value: u32 = console.read_int("n: ").unwrap();
        assert_eq!(value, 42);

        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("Please enter a whole number."));
    }

    #[test]
    fn test_read_yes_no() {
        let mut console = Console::new(Cursor::new(b"maybe\nYES\nn\n".to_vec()), Vec::new());
        assert!(console.read_yes_no("? ").unwrap());
        assert!(!console.read_yes_no("? ").unwrap());
    }

    #[test]
    fn test_closed_input() {
        let mut console = Console::new(Cursor::new(Vec::new()), Vec::new());
        assert!(matches!(console.read_decimal("p: "), Err(PalaceError::InputClosed)));
    }

    #[test]
    fn test_render_menu() {
        let text = render_menu(&default_menu());
        assert_eq!(text, "1. Burger - Rs.100.00\n2. Pizza - Rs.500.00\n3. Pasta - Rs.350.00");
    }

    #[test]
    fn test_exit_immediately() {
        let mut engine = Engine::new();
        let (result, output) = run_session(&mut engine, "3\n");
        assert!(result.is_ok());
        assert!(output.contains("WELCOME TO FOOD PALACE"));
    }

    #[test]
    fn test_customer_search() {
        let mut engine = Engine::with_menu(default_menu());
        let (result, output) = run_session(&mut engine, "2\n4\n350\n4\n999\n6\n");
        assert!(result.is_ok());
        assert!(output.contains("Found: Pasta - Rs.350"));
        assert!(output.contains("Item not found."));
    }

    #[test]
    fn test_order_then_admin_approval() {
        let mut engine = Engine::with_menu(default_menu());
        let input = [
            "2", // customer
            "1", // place order
            "5", // table
            "1", "2", "yes", // 2 x Burger
            "9", "1", "no", // unknown item
            "5", // back
            "1", // admin
            "2", // process orders
            "yes", "3", // billing
            "5", // exit
        ]
        .join("\n");

        let (result, output) = run_session(&mut engine, &input);
        assert!(result.is_ok());
        assert!(output.contains("Invalid item ID 9!"));
        assert!(output.contains("Order #1 placed for table 5."));
        assert!(output.contains("Processing Order for Table 5"));
        assert!(output.contains("Order accepted and added to history."));
        assert!(output.contains("Burger x2 - Rs.200.00"));
        assert!(output.contains("Total Income of the Day: Rs.200.00"));
        assert_eq!(engine.revenue(), Decimal::new(20000, 2));
    }

    #[test]
    fn test_bill_shows_waiting_status() {
        let mut engine = Engine::with_menu(default_menu());
        let (result, output) = run_session(&mut engine, "2\n1\n3\n2\n1\nno\n3\n6\n");
        assert!(result.is_ok());
        assert!(output.contains("Pizza x1 - Rs.500.00"));
        assert!(output.contains("Status: Waiting for Admin Approval."));
    }

    #[test]
    fn test_admin_add_and_remove() {
        let mut engine = Engine::new();
        let input = "1\n1\n1\n7\nSoup\n45.5\n1\n2\n7\n1\n3\n5\n";
        let (result, output) = run_session(&mut engine, input);
        assert!(result.is_ok());
        assert!(output.contains("Item added successfully!"));
        assert!(output.contains("Item removed successfully!"));
        assert!(engine.catalog.is_empty());
        // Removal leaves the price searchable
        assert_eq!(engine.catalog.search_by_price(Decimal::new(455, 1)), Some("Soup"));
    }

    #[test]
    fn test_input_closed_mid_session() {
        let mut engine = Engine::new();
        let (result, _) = run_session(&mut engine, "2\n");
        assert!(matches!(result, Err(PalaceError::InputClosed)));
    }
}
