use crate::model::Amount;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The identifier the ledger assigns to an expense. Identifiers start at 1 and are never reused.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ExpenseId(u64);

impl ExpenseId {
    /// The first identifier a new ledger hands out.
    pub const FIRST: ExpenseId = ExpenseId(1);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for ExpenseId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str(s.trim()).map(ExpenseId)
    }
}

/// The caller-supplied fields of an expense. The ledger turns this into an `Expense` by assigning
/// an `ExpenseId`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub category: String,
    pub store_name: String,
    #[serde(rename = "storeID")]
    pub store_id: String,
    pub amount: Amount,
    pub date: String,
}

impl NewExpense {
    pub fn new(
        category: impl Into<String>,
        store_name: impl Into<String>,
        store_id: impl Into<String>,
        amount: Amount,
        date: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            store_name: store_name.into(),
            store_id: store_id.into(),
            amount,
            date: date.into(),
        }
    }
}

/// A recorded expense. Once the ledger has created it, it is never modified.
///
/// Serializes to the wire shape used by `/api/expenses`:
/// `{"id":1,"category":"Food","storeName":"A","storeID":"S1","amount":10.00,"date":"..."}`
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    id: ExpenseId,
    category: String,
    store_name: String,
    #[serde(rename = "storeID")]
    store_id: String,
    amount: Amount,
    date: String,
}

impl Expense {
    pub(crate) fn new(id: ExpenseId, new: NewExpense) -> Self {
        let NewExpense {
            category,
            store_name,
            store_id,
            amount,
            date,
        } = new;
        Self {
            id,
            category,
            store_name,
            store_id,
            amount,
            date,
        }
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}
