//! Types that represent the core data model, such as `Expense` and `CategoryTotal`.
mod amount;
mod category;
mod expense;

pub use amount::{Amount, AmountError};
pub use category::{CategoryTotal, KnownCategory};
pub use expense::{Expense, ExpenseId, NewExpense};
