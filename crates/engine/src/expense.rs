//! Expense primitives.
//!
//! An [`Expense`] is the only entity of the tracker: a dated, categorised,
//! positive amount with an optional note. Records are flat and independent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, Money, ResultEngine};

/// Category used when the form leaves it empty.
pub const DEFAULT_CATEGORY: &str = "Other";

const INVALID_AMOUNT: &str = "Please enter a valid amount.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    #[serde(default, with = "amount")]
    pub amount: Money,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub note: String,
    pub date: NaiveDate,
    pub time: DateTime<Utc>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Raw values of the entry form, as typed by the user.
///
/// `id` is set only while editing an existing record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseForm {
    pub id: Option<Uuid>,
    pub amount: String,
    pub category: String,
    pub note: String,
    pub date: Option<NaiveDate>,
}

impl ExpenseForm {
    /// An empty form, as shown after a reset or a successful submit.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Populates the form from an existing record, ready for editing.
    #[must_use]
    pub fn from_expense(expense: &Expense, currency: Currency) -> Self {
        Self {
            id: Some(expense.id),
            amount: expense.amount.to_major_string(currency),
            category: expense.category.clone(),
            note: expense.note.clone(),
            date: Some(expense.date),
        }
    }
}

impl Expense {
    /// Validates a submitted form and builds the record to store.
    ///
    /// The id is kept when editing, otherwise `new_id` is called. `time` is
    /// always refreshed to `now`; an absent date falls back to `today`.
    pub fn from_form(
        form: &ExpenseForm,
        currency: Currency,
        new_id: impl FnOnce() -> Uuid,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> ResultEngine<Self> {
        let amount = Money::parse_major(&form.amount, currency)
            .map_err(|_| EngineError::InvalidAmount(INVALID_AMOUNT.to_string()))?;
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(INVALID_AMOUNT.to_string()));
        }

        let category = form.category.trim();
        let category = if category.is_empty() {
            default_category()
        } else {
            category.to_string()
        };

        Ok(Self {
            id: form.id.unwrap_or_else(new_id),
            amount,
            category,
            note: form.note.trim().to_string(),
            date: form.date.unwrap_or(today),
            time: now,
        })
    }
}

/// JSON representation of [`Money`] inside a persisted record.
///
/// Amounts are written as a number in major units. Reading is lenient: a
/// numeric string is parsed, while `null`, non-numeric strings and other
/// shapes become zero so that a single bad record does not discard the
/// whole collection.
mod amount {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::{Currency, Money};

    const STORAGE_CURRENCY: Currency = Currency::Inr;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_major_f64(STORAGE_CURRENCY))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let parsed = match &value {
            Value::Number(number) => number
                .as_f64()
                .and_then(|v| Money::from_major_f64(v, STORAGE_CURRENCY)),
            Value::String(raw) => Money::parse_major(raw, STORAGE_CURRENCY).ok(),
            _ => None,
        };
        if parsed.is_none() {
            tracing::debug!("non-numeric amount {value} read as zero");
        }
        Ok(parsed.unwrap_or(Money::ZERO))
    }
}
