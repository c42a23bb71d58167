// 💳 Expense Entity - one credit card charge + its billing bucket
//
// "The id is IDENTITY (never changes), everything else is the VALUE recorded"
//
// Records are never edited or deleted once added. The only way to change
// the collection is to add to it or replace it wholesale after an import.

use log::debug;
use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// EXPENSE ENTITY
// ============================================================================

/// A single recorded expense.
///
/// Serialized field names are stable: `id`, `description`, `amount`,
/// `date`, `billingMonth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Stable identity (UUID v4) - NEVER changes
    pub id: String,

    /// What was bought. Example: "Netflix", "Groceries", "Uber"
    pub description: String,

    /// Signed monetary amount, currency implied
    #[serde(serialize_with = "serialize_amount")]
    pub amount: f64,

    /// Purchase date, `YYYY-MM-DD` (not validated)
    pub date: String,

    /// Billing month this charge is totalled under, `YYYY-MM`
    #[serde(rename = "billingMonth")]
    pub billing_month: String,
}

impl Expense {
    /// Create new expense with a fresh UUID
    pub fn new(
        description: String,
        amount: f64,
        date: String,
        billing_month: String,
    ) -> Self {
        Expense {
            id: uuid::Uuid::new_v4().to_string(),
            description,
            amount,
            date,
            billing_month,
        }
    }

    /// Single readable line, used by listings and confirmations
    pub fn display_line(&self) -> String {
        format!(
            "[ID: {}] [{}] {} | Date: {} | Amount: {:.2}",
            self.id, self.billing_month, self.description, self.date, self.amount
        )
    }
}

/// Amounts are stored as plain numbers; `NaN`/`inf` have no such form
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !amount.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "amount {} is not a finite number",
            amount
        )));
    }
    serializer.serialize_f64(*amount)
}

// ============================================================================
// MONTHLY TOTAL
// ============================================================================

/// Result of aggregating one billing month
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlyTotal {
    pub count: usize,
    pub total: f64,
}

// ============================================================================
// EXPENSE STORE
// ============================================================================

/// In-memory, insertion-ordered collection of expenses.
///
/// The store accepts whatever it is given. Input checks (non-empty
/// description, numeric amount) belong to the caller.
#[derive(Debug, Default)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
}

impl ExpenseStore {
    /// Create empty store
    pub fn new() -> Self {
        ExpenseStore {
            expenses: Vec::new(),
        }
    }

    /// Record a new expense and return a copy of it (with its id)
    pub fn add(
        &mut self,
        description: String,
        amount: f64,
        date: String,
        billing_month: String,
    ) -> Expense {
        let expense = Expense::new(description, amount, date, billing_month);
        debug!("Adding expense {} ({:.2})", expense.id, expense.amount);
        self.expenses.push(expense.clone());
        expense
    }

    /// All expenses in insertion order
    pub fn list(&self) -> &[Expense] {
        &self.expenses
    }

    /// Count and sum of expenses whose billing month equals `billing_month`
    ///
    /// Exact, case-sensitive match. Linear scan; no index is kept.
    pub fn monthly_total(&self, billing_month: &str) -> MonthlyTotal {
        self.expenses
            .iter()
            .filter(|e| e.billing_month == billing_month)
            .fold(MonthlyTotal::default(), |acc, e| MonthlyTotal {
                count: acc.count + 1,
                total: acc.total + e.amount,
            })
    }

    /// Discard the current expenses and adopt `expenses` verbatim
    pub fn replace_all(&mut self, expenses: Vec<Expense>) {
        debug!(
            "Replacing {} expenses with {} loaded ones",
            self.expenses.len(),
            expenses.len()
        );
        self.expenses = expenses;
    }

    /// Owned copy of the current expenses, same order as `list()`
    pub fn snapshot(&self) -> Vec<Expense> {
        self.expenses.clone()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn add(store: &mut ExpenseStore, description: &str, amount: f64, month: &str) -> Expense {
        store.add(
            description.to_string(),
            amount,
            format!("{}-15", month),
            month.to_string(),
        )
    }

    #[test]
    fn test_expense_creation() {
        let expense = Expense::new(
            "Netflix".to_string(),
            15.99,
            "2025-12-03".to_string(),
            "2025-12".to_string(),
        );

        assert!(!expense.id.is_empty());
        assert_eq!(expense.description, "Netflix");
        assert_eq!(expense.amount, 15.99);
        assert_eq!(expense.date, "2025-12-03");
        assert_eq!(expense.billing_month, "2025-12");
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ExpenseStore::new();

        assert!(store.list().is_empty());
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_add_appends_with_unique_ids() {
        let mut store = ExpenseStore::new();
        let mut seen = HashSet::new();

        for i in 0..50 {
            let added = add(&mut store, &format!("Item {}", i), i as f64, "2025-12");

            assert_eq!(store.list().last(), Some(&added));
            assert!(!added.id.is_empty());
            assert!(seen.insert(added.id.clone()), "duplicate id {}", added.id);
        }

        assert_eq!(store.len(), 50);
    }

    #[test]
    fn test_add_is_permissive() {
        let mut store = ExpenseStore::new();

        let added = store.add(String::new(), -42.0, "yesterday".to_string(), "dec".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(added.description, "");
        assert_eq!(added.amount, -42.0);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut store = ExpenseStore::new();
        add(&mut store, "Groceries", 80.0, "2025-12");
        add(&mut store, "Uber", 12.0, "2025-11");
        add(&mut store, "Coffee", 4.5, "2025-12");

        let names: Vec<&str> = store.list().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Uber", "Coffee"]);
    }

    #[test]
    fn test_monthly_total() {
        let mut store = ExpenseStore::new();
        add(&mut store, "Netflix", 12.50, "2025-12");
        add(&mut store, "Coffee", 7.49, "2025-12");
        add(&mut store, "Flight", 100.00, "2025-11");

        let december = store.monthly_total("2025-12");

        assert_eq!(december.count, 2);
        assert!((december.total - 19.99).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_total_no_matches() {
        let mut store = ExpenseStore::new();
        assert_eq!(store.monthly_total("2025-12"), MonthlyTotal { count: 0, total: 0.0 });

        add(&mut store, "Flight", 100.00, "2025-11");
        assert_eq!(store.monthly_total("2025-12"), MonthlyTotal { count: 0, total: 0.0 });
    }

    #[test]
    fn test_monthly_total_is_exact_match() {
        let mut store = ExpenseStore::new();
        store.add("A".to_string(), 1.0, "2025-12-01".to_string(), "2025-12".to_string());
        store.add("B".to_string(), 2.0, "2025-12-01".to_string(), " 2025-12".to_string());
        store.add("C".to_string(), 4.0, "2025-12-01".to_string(), "Dec".to_string());

        assert_eq!(store.monthly_total("2025-12").count, 1);
        assert_eq!(store.monthly_total("dec").count, 0);
        assert_eq!(store.monthly_total("Dec").total, 4.0);
    }

    #[test]
    fn test_monthly_total_with_refund() {
        let mut store = ExpenseStore::new();
        add(&mut store, "Shoes", 60.0, "2026-01");
        add(&mut store, "Shoes refund", -60.0, "2026-01");

        let total = store.monthly_total("2026-01");
        assert_eq!(total.count, 2);
        assert_eq!(total.total, 0.0);
    }

    #[test]
    fn test_replace_all_keeps_loaded_ids() {
        let mut store = ExpenseStore::new();
        add(&mut store, "Old", 1.0, "2025-10");

        let loaded = vec![Expense {
            id: "fixed-id".to_string(),
            description: "Loaded".to_string(),
            amount: 9.99,
            date: "2025-12-01".to_string(),
            billing_month: "2025-12".to_string(),
        }];
        store.replace_all(loaded.clone());

        assert_eq!(store.list(), loaded.as_slice());
        assert_eq!(store.list()[0].id, "fixed-id");
    }

    #[test]
    fn test_snapshot_matches_list() {
        let mut store = ExpenseStore::new();
        add(&mut store, "One", 1.0, "2025-12");
        add(&mut store, "Two", 2.0, "2025-12");

        let snapshot = store.snapshot();
        assert_eq!(snapshot.as_slice(), store.list());

        // Snapshot is detached from the store
        add(&mut store, "Three", 3.0, "2025-12");
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_display_line() {
        let expense = Expense {
            id: "abc".to_string(),
            description: "Uber".to_string(),
            amount: 7.5,
            date: "2025-12-02".to_string(),
            billing_month: "2025-12".to_string(),
        };

        assert_eq!(
            expense.display_line(),
            "[ID: abc] [2025-12] Uber | Date: 2025-12-02 | Amount: 7.50"
        );
    }

    #[test]
    fn test_non_finite_amount_does_not_serialize() {
        let expense = Expense::new(
            "Broken".to_string(),
            f64::NAN,
            "2025-12-01".to_string(),
            "2025-12".to_string(),
        );

        let err = serde_json::to_string(&expense).unwrap_err();
        assert!(err.to_string().contains("not a finite number"));
    }

    #[test]
    fn test_json_field_names() {
        let expense = Expense {
            id: "abc".to_string(),
            description: "Uber".to_string(),
            amount: 7.5,
            date: "2025-12-02".to_string(),
            billing_month: "2025-12".to_string(),
        };

        let value = serde_json::to_value(&expense).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 5);
        assert_eq!(object["billingMonth"], "2025-12");
        assert_eq!(object["amount"], 7.5);
        assert!(object.contains_key("id"));
        assert!(!object.contains_key("billing_month"));
    }
}
