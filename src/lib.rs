// Credit Card Tracker - Core Library
// Exposes all modules for use in the CLI and tests

pub mod config;
pub mod entities;
pub mod persistence;
pub mod ui;

// Re-export commonly used types
pub use config::AppConfig;
pub use entities::{Expense, ExpenseStore, MonthlyTotal};
pub use persistence::{
    CsvFormat, FormatAdapter, Import, JsonFormat, PersistenceAdapter, PersistenceError,
};
pub use ui::{App, MenuOption, ValidationRejected};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
