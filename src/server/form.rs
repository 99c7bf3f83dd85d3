//! The forms and query strings accepted by the routes, and their validation.
//!
//! axum decodes the `application/x-www-form-urlencoded` payloads into these structs. Every field
//! arrives as optional text so that a missing or malformed value is reported as a request error
//! naming the field, rather than as a generic rejection.

use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, ExpenseId, NewExpense};
use crate::Result;
use anyhow::Context;
use serde::Deserialize;
use std::error::Error as StdError;
use std::str::FromStr;

/// Forms posted by the dashboard are tiny. Anything larger than this is refused.
pub(crate) const MAX_FORM_BYTES: usize = 16 * 1024;

/// `POST /`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) password: String,
}

/// `POST /api/add`. Text fields that were not sent are empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddExpenseForm {
    #[serde(default)]
    category: String,
    #[serde(default)]
    store_name: String,
    #[serde(default, rename = "storeID")]
    store_id: String,
    amount: Option<String>,
}

impl AddExpenseForm {
    /// Validates the form. `date` is the timestamp to record with the expense.
    pub(crate) fn into_new_expense(self, date: impl Into<String>) -> Result<NewExpense> {
        let amount: Amount = required("amount", self.amount.as_deref())?;
        Ok(NewExpense::new(
            self.category,
            self.store_name,
            self.store_id,
            amount,
            date,
        ))
    }
}

/// `/api/delete?id=N`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DeleteQuery {
    id: Option<String>,
}

impl DeleteQuery {
    pub(crate) fn id(&self) -> Result<ExpenseId> {
        required("id", self.id.as_deref())
    }
}

/// Parses the value of the field `name` as a `T`. A missing or unparseable value is a request
/// error.
fn required<T>(name: &str, value: Option<&str>) -> Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    let value = value
        .with_context(|| format!("The '{name}' field is required"))
        .pub_result(ErrorType::Request)?;
    value
        .parse::<T>()
        .with_context(|| format!("The '{name}' field is invalid"))
        .pub_result(ErrorType::Request)
}
