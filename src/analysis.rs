//! Spending analysis over a snapshot of the ledger.
//!
//! These are pure functions; the `Ledger` calls them while holding its lock, and they can equally
//! be run on a `Vec<Expense>` returned by `Ledger::list`.

use crate::model::{Amount, CategoryTotal, Expense};
use rust_decimal::Decimal;

/// Sums the amount of each category, in the order each category is first seen. Categories with no
/// expenses do not appear.
pub fn category_totals(expenses: &[Expense]) -> Vec<(String, Amount)> {
    let mut totals: Vec<(String, Amount)> = Vec::new();
    for expense in expenses {
        match totals
            .iter_mut()
            .find(|(category, _)| category == expense.category())
        {
            Some((_, total)) => *total += expense.amount(),
            None => totals.push((expense.category().to_string(), expense.amount())),
        }
    }
    totals
}

/// Sums the amounts of all expenses. Returns zero for an empty slice.
pub fn total_spending(expenses: &[Expense]) -> Amount {
    expenses.iter().map(Expense::amount).sum()
}

/// Breaks spending down by category, annotating each category with its percentage of the grand
/// total.
///
/// Returns an empty list when the grand total is zero, which is always the case for an empty
/// ledger. Callers render that as "no data" rather than dividing by zero.
pub fn analyze(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let grand_total = total_spending(expenses);
    if grand_total.is_zero() {
        return Vec::new();
    }
    category_totals(expenses)
        .into_iter()
        .map(|(category, total)| {
            let percentage = percentage(total, grand_total);
            CategoryTotal::new(category, total, percentage)
        })
        .collect()
}

/// `100 * part / whole`, saturating when the ratio is too large for a `Decimal`. `whole` must
/// not be zero.
fn percentage(part: Amount, whole: Amount) -> Decimal {
    part.value()
        .checked_div(whole.value())
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_negative() == whole.is_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}
