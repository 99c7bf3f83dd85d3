//! The in-memory ledger of expenses.
//!
//! The `Ledger` is the only shared mutable state in the server. Every operation, reads included,
//! takes the same lock, so a reader never observes a half-applied add or delete and two concurrent
//! adds can never be handed the same `ExpenseId`. Nothing awaits while the lock is held.

use crate::analysis;
use crate::model::{Amount, CategoryTotal, Expense, ExpenseId, NewExpense};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// The authoritative, process-lifetime store of expenses.
///
/// Expenses are kept in insertion order. Identifiers start at 1, increase with every add, and are
/// never reused, even after the expense holding them is deleted.
#[derive(Debug, Default)]
pub struct Ledger {
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    expenses: Vec<Expense>,
    next_id: ExpenseId,
}

impl Default for State {
    fn default() -> Self {
        Self {
            expenses: Vec::new(),
            next_id: ExpenseId::FIRST,
        }
    }
}

impl Ledger {
    /// Creates an empty ledger whose first expense will get id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock. Every mutation is a single `push` or `retain`, so the state is consistent
    /// even if another thread panicked while holding the lock, and we carry on with it.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a new expense and returns the id assigned to it.
    pub fn add(&self, expense: NewExpense) -> ExpenseId {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id = id.next();
        state.expenses.push(Expense::new(id, expense));
        trace!("Added expense {id}, next id is {}", state.next_id);
        id
    }

    /// Returns a copy of all expenses in insertion order. Changes to the returned list do not
    /// affect the ledger.
    pub fn list(&self) -> Vec<Expense> {
        self.lock().expenses.clone()
    }

    /// Removes the expense with `id`. Deleting an id that does not exist is not an error; the
    /// return value only reports whether anything was removed.
    pub fn delete(&self, id: ExpenseId) -> bool {
        let mut state = self.lock();
        let before = state.expenses.len();
        state.expenses.retain(|e| e.id() != id);
        state.expenses.len() != before
    }

    /// Per-category totals in the order each category was first recorded.
    pub fn category_totals(&self) -> Vec<(String, Amount)> {
        analysis::category_totals(&self.lock().expenses)
    }

    /// The sum of all amounts, zero when the ledger is empty.
    pub fn total_spending(&self) -> Amount {
        analysis::total_spending(&self.lock().expenses)
    }

    /// Runs `analysis::analyze` against a single consistent view of the ledger.
    pub fn analyze(&self) -> Vec<CategoryTotal> {
        analysis::analyze(&self.lock().expenses)
    }

    pub fn len(&self) -> usize {
        self.lock().expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
