// Command loop - text menu over the expense store
//
// Reads one command token per line, dispatches to the store / persistence
// adapter, and writes result lines back. Input checks happen here, before
// anything reaches `ExpenseStore::add`.

use crate::entities::{Expense, ExpenseStore};
use crate::persistence::{Import, PersistenceAdapter};
use chrono::NaiveDate;
use log::warn;
use std::io::{self, BufRead, Write};
use thiserror::Error;

// ============================================================================
// MENU
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    AddExpense,
    ListExpenses,
    MonthlyTotal,
    ExportJson,
    ImportJson,
    ExportCsv,
    ImportCsv,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 8] = [
        MenuOption::AddExpense,
        MenuOption::ListExpenses,
        MenuOption::MonthlyTotal,
        MenuOption::ExportJson,
        MenuOption::ImportJson,
        MenuOption::ExportCsv,
        MenuOption::ImportCsv,
        MenuOption::Exit,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MenuOption::AddExpense => "1",
            MenuOption::ListExpenses => "2",
            MenuOption::MonthlyTotal => "3",
            MenuOption::ExportJson => "4",
            MenuOption::ImportJson => "5",
            MenuOption::ExportCsv => "6",
            MenuOption::ImportCsv => "7",
            MenuOption::Exit => "8",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MenuOption::AddExpense => "Add expense",
            MenuOption::ListExpenses => "List all expenses",
            MenuOption::MonthlyTotal => "Show monthly total",
            MenuOption::ExportJson => "Export data to JSON",
            MenuOption::ImportJson => "Import data from JSON",
            MenuOption::ExportCsv => "Export data to CSV",
            MenuOption::ImportCsv => "Import data from CSV",
            MenuOption::Exit => "Exit",
        }
    }

    /// Map a trimmed command token to an option
    pub fn parse(token: &str) -> Option<MenuOption> {
        match token {
            "q" | "quit" | "exit" => Some(MenuOption::Exit),
            _ => MenuOption::ALL.iter().copied().find(|o| o.key() == token),
        }
    }
}

// ============================================================================
// INPUT VALIDATION
// ============================================================================

/// Input refused before it reaches the store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationRejected {
    #[error("Description cannot be empty")]
    EmptyDescription,

    #[error("Invalid amount '{0}', please enter a valid number")]
    InvalidAmount(String),
}

pub fn validate_description(input: &str) -> Result<String, ValidationRejected> {
    let description = input.trim();
    if description.is_empty() {
        return Err(ValidationRejected::EmptyDescription);
    }
    Ok(description.to_string())
}

/// Parse a finite decimal amount. `NaN`/`inf` parse as f64 but cannot be
/// stored as JSON numbers, so they are refused too.
pub fn parse_amount(input: &str) -> Result<f64, ValidationRejected> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ValidationRejected::InvalidAmount(trimmed.to_string())),
    }
}

/// `YYYY-MM-DD` with a real calendar date
pub fn is_calendar_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// `YYYY-MM` with a real month
pub fn is_billing_month(month: &str) -> bool {
    month.len() == 7 && NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_ok()
}

// ============================================================================
// APP
// ============================================================================

/// Interactive session: owns the store, borrows nothing from the outside
/// except the line source and sink.
pub struct App<R, W> {
    store: ExpenseStore,
    persistence: PersistenceAdapter,
    input: R,
    output: W,
    running: bool,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(store: ExpenseStore, persistence: PersistenceAdapter, input: R, output: W) -> Self {
        App {
            store,
            persistence,
            input,
            output,
            running: true,
        }
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn app_name(&self) -> &str {
        &self.persistence.config().app_name
    }

    /// Banner + load `<app_name>.json` if there is anything in it
    pub fn initialize(&mut self) -> io::Result<()> {
        let app_name = self.app_name().to_string();
        writeln!(self.output, "\n=== {} ===", app_name)?;
        writeln!(self.output, "Credit card expense tracker initialized.\n")?;

        match self.persistence.import_json() {
            Ok(Import::Loaded(expenses)) if !expenses.is_empty() => {
                writeln!(
                    self.output,
                    "✓ Loaded {} existing expenses from {}.json",
                    expenses.len(),
                    app_name
                )?;
                self.store.replace_all(expenses);
            }
            Ok(_) => {
                writeln!(self.output, "No existing expenses found. Starting with an empty list.")?;
            }
            Err(e) => {
                warn!("Startup import failed: {}", e);
                writeln!(self.output, "Error importing existing data ({}). Starting fresh.", e)?;
            }
        }

        Ok(())
    }

    /// Menu loop until Exit or end of input
    pub fn run(&mut self) -> io::Result<()> {
        while self.running {
            self.show_menu()?;
            self.handle_user_input()?;
        }
        Ok(())
    }

    pub fn shutdown(&mut self) -> io::Result<()> {
        let app_name = self.app_name().to_string();
        writeln!(self.output, "Thank you for using {}!", app_name)?;
        self.output.flush()
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Main Menu ---")?;
        for option in MenuOption::ALL {
            writeln!(self.output, "{}. {}", option.key(), option.title())?;
        }
        write!(self.output, "Choose an option: ")?;
        self.output.flush()
    }

    /// Next input line without its line ending; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    fn handle_user_input(&mut self) -> io::Result<()> {
        let Some(token) = self.read_line()? else {
            self.running = false;
            return writeln!(self.output, "\nEnd of input. Exiting application...");
        };

        match MenuOption::parse(&token) {
            Some(MenuOption::AddExpense) => self.add_expense(),
            Some(MenuOption::ListExpenses) => self.list_expenses(),
            Some(MenuOption::MonthlyTotal) => self.show_monthly_total(),
            Some(MenuOption::ExportJson) => self.export(false),
            Some(MenuOption::ImportJson) => self.import(false),
            Some(MenuOption::ExportCsv) => self.export(true),
            Some(MenuOption::ImportCsv) => self.import(true),
            Some(MenuOption::Exit) => {
                self.running = false;
                writeln!(self.output, "\nExiting application...")
            }
            None => writeln!(self.output, "Invalid option. Please try again."),
        }
    }

    fn add_expense(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Add Expense ---")?;

        let Some(raw_description) = self.prompt("Description: ")? else {
            return Ok(());
        };
        let description = match validate_description(&raw_description) {
            Ok(description) => description,
            Err(e) => return writeln!(self.output, "{}. Expense not added.", e),
        };

        let Some(raw_amount) = self.prompt("Amount: ")? else {
            return Ok(());
        };
        let amount = match parse_amount(&raw_amount) {
            Ok(amount) => amount,
            Err(e) => return writeln!(self.output, "{}. Expense not added.", e),
        };

        let Some(date) = self.prompt("Purchase date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        let Some(billing_month) = self.prompt("Billing month (YYYY-MM): ")? else {
            return Ok(());
        };

        // Accepted either way; the store does not validate dates
        if !is_calendar_date(&date) {
            warn!("Purchase date '{}' is not YYYY-MM-DD", date);
        }
        if !is_billing_month(&billing_month) {
            warn!("Billing month '{}' is not YYYY-MM", billing_month);
        }

        let expense = self.store.add(description, amount, date, billing_month);

        writeln!(self.output, "✓ Expense added successfully:")?;
        writeln!(self.output, "{}", expense.display_line())
    }

    fn list_expenses(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- List of Expenses ---")?;

        if self.store.is_empty() {
            return writeln!(self.output, "No expenses recorded.");
        }

        for line in format_listing(self.store.list()) {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn show_monthly_total(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Monthly Total ---")?;

        let Some(billing_month) = self.prompt("Enter billing month (YYYY-MM): ")? else {
            return Ok(());
        };

        let summary = self.store.monthly_total(&billing_month);

        writeln!(
            self.output,
            "Number of expenses for {}: {}",
            billing_month, summary.count
        )?;
        writeln!(
            self.output,
            "Total amount for {}: {:.2}",
            billing_month, summary.total
        )
    }

    fn export(&mut self, csv: bool) -> io::Result<()> {
        let label = if csv { "CSV" } else { "JSON" };
        writeln!(self.output, "\n--- Export Data to {} ---", label)?;

        let snapshot = self.store.snapshot();
        let result = if csv {
            self.persistence.export_csv(&snapshot)
        } else {
            self.persistence.export_json(&snapshot)
        };

        match result {
            Ok(path) => writeln!(
                self.output,
                "✓ Exported {} expenses to {}",
                snapshot.len(),
                path.display()
            ),
            Err(e) => writeln!(self.output, "Error exporting data: {}", e),
        }
    }

    /// Replaces the in-memory list only when the file held at least one
    /// expense; anything else leaves it untouched.
    fn import(&mut self, csv: bool) -> io::Result<()> {
        let label = if csv { "CSV" } else { "JSON" };
        writeln!(self.output, "\n--- Import Data from {} ---", label)?;

        let result = if csv {
            self.persistence.import_csv()
        } else {
            self.persistence.import_json()
        };

        match result {
            Ok(Import::Loaded(expenses)) if !expenses.is_empty() => {
                let count = expenses.len();
                self.store.replace_all(expenses);
                writeln!(self.output, "✓ Data imported successfully")?;
                writeln!(self.output, "Total expenses loaded: {}", count)
            }
            Ok(_) => writeln!(
                self.output,
                "No data found in file. The in-memory list remains unchanged."
            ),
            Err(e) => writeln!(self.output, "Error importing data: {}", e),
        }
    }
}

/// Format a whole listing the way the menu prints it
pub fn format_listing(expenses: &[Expense]) -> Vec<String> {
    expenses
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}) {}", i + 1, e.display_line()))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
