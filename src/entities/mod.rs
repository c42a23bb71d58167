// Entity Models
//
// Each entity has a stable identity (UUID) that NEVER changes, plus a store
// that owns the in-memory collection and answers queries over it.

pub mod expense;

pub use expense::{Expense, ExpenseStore, MonthlyTotal};
