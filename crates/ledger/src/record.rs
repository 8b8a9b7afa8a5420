//! The module contains the inbound shape of an expense and the outcome of
//! recording it.
//!
//! An [`ExpenseRecord`] is an open mapping: only `payee`, `amount` and `date`
//! are checked, everything else is carried through to storage untouched.
use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys every expense must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 3] = ["payee", "amount", "date"];

/// Key owned by storage; a client-supplied value is discarded.
const ID_FIELD: &str = "id";

/// A single value of an expense field.
///
/// Required fields are checked as `Number` or `Text`; any other JSON value
/// is only carried through to storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl FieldValue {
    /// Interpret raw text, e.g. an XML element body.
    ///
    /// Text becomes a [`FieldValue::Number`] only when the number renders
    /// back to the same text, so `1e3` or an overlong integer stay `Text`.
    pub fn from_text(text: &str) -> Self {
        match text.parse::<serde_json::Number>() {
            Ok(number) if number.to_string() == text => Self::Number(number),
            _ => Self::Text(text.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Number(number) => Value::Number(number),
            FieldValue::Text(text) => Value::String(text),
            FieldValue::Other(value) => value,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Self::Number)
            .unwrap_or_else(|| Self::Text(value.to_string()))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// An expense as decoded from a request body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseRecord(BTreeMap<String, FieldValue>);

impl ExpenseRecord {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the required keys and split the record into its stored parts.
    ///
    /// On failure the error is one message per missing key, in
    /// [`REQUIRED_FIELDS`] order, joined with `"; "`.
    pub(crate) fn validate(self) -> Result<NewExpense, String> {
        let mut fields = self.0;
        let payee = fields.remove("payee");
        let amount = fields.remove("amount");
        let date = fields.remove("date");
        fields.remove(ID_FIELD);

        match (payee, amount, date) {
            (Some(payee), Some(amount), Some(date)) => Ok(NewExpense {
                payee: payee.to_string(),
                amount: amount.into(),
                date: date.to_string(),
                extra: fields.into_iter().map(|(k, v)| (k, v.into())).collect(),
            }),
            (payee, amount, date) => {
                let present = [payee.is_some(), amount.is_some(), date.is_some()];
                let message = REQUIRED_FIELDS
                    .iter()
                    .zip(present)
                    .filter(|(_, present)| !present)
                    .map(|(key, _)| invalid_expense_key(key))
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(message)
            }
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for ExpenseRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

fn invalid_expense_key(key: &str) -> String {
    format!("Invalid expense: `{key}` is required")
}

/// A validated expense, ready to be inserted.
#[derive(Debug)]
pub(crate) struct NewExpense {
    pub payee: String,
    pub amount: Value,
    pub date: String,
    pub extra: Map<String, Value>,
}

/// Outcome of [`Ledger::record`].
///
///  [`Ledger::record`]: super::Ledger::record
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordResult {
    Recorded { expense_id: i32 },
    Rejected { error_message: String },
}

impl RecordResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }
}
