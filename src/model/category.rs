use crate::model::amount::serialize_2dp;
use crate::model::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The category labels offered by the dashboard. The ledger stores categories as free text, so an
/// expense may carry a category that is not listed here.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum KnownCategory {
    Food,
    Travel,
    Bills,
    Entertainment,
    Supplies,
    Clothing,
}

serde_plain::derive_display_from_serialize!(KnownCategory);
serde_plain::derive_fromstr_from_deserialize!(KnownCategory);

impl KnownCategory {
    /// All known categories in the order the dashboard lists them.
    pub const ALL: [KnownCategory; 6] = [
        KnownCategory::Food,
        KnownCategory::Travel,
        KnownCategory::Bills,
        KnownCategory::Entertainment,
        KnownCategory::Supplies,
        KnownCategory::Clothing,
    ];
}

/// The spending in one category along with its share of the grand total.
///
/// This is derived from a ledger snapshot on demand and is never stored.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CategoryTotal {
    category: String,
    total: Amount,
    /// `100 * total / grand_total`, kept at full precision and rounded only on the wire.
    #[serde(serialize_with = "serialize_2dp")]
    percentage: Decimal,
}

impl CategoryTotal {
    pub(crate) fn new(category: impl Into<String>, total: Amount, percentage: Decimal) -> Self {
        Self {
            category: category.into(),
            total,
            percentage,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn percentage(&self) -> Decimal {
        self.percentage
    }
}
