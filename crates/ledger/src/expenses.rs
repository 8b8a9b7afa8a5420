//! The `expenses` table and its public, read-side view [`StoredExpense`].
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::NewExpense;

/// An expense as persisted, with the identifier assigned by storage.
///
/// Serializes flat: the pass-through keys sit next to the required ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredExpense {
    pub id: i32,
    pub payee: String,
    pub amount: Value,
    pub date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Model> for StoredExpense {
    fn from(model: Model) -> Self {
        let extra = match model.extra {
            Some(Value::Object(extra)) => extra,
            _ => Map::new(),
        };

        Self {
            id: model.id,
            payee: model.payee,
            amount: model.amount,
            date: model.date,
            extra,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub payee: String,
    pub amount: Json,
    pub date: String,
    pub extra: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<NewExpense> for ActiveModel {
    fn from(expense: NewExpense) -> Self {
        let extra = if expense.extra.is_empty() {
            None
        } else {
            Some(Value::Object(expense.extra))
        };

        Self {
            id: ActiveValue::NotSet,
            payee: ActiveValue::Set(expense.payee),
            amount: ActiveValue::Set(expense.amount),
            date: ActiveValue::Set(expense.date),
            extra: ActiveValue::Set(extra),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn stored_expense_serializes_flat() {
        let model = Model {
            id: 3,
            payee: "Zoo".to_string(),
            amount: json!(15.25),
            date: "2017-06-10".to_string(),
            extra: Some(json!({"note": "tickets"})),
        };

        let value = serde_json::to_value(StoredExpense::from(model)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 3,
                "payee": "Zoo",
                "amount": 15.25,
                "date": "2017-06-10",
                "note": "tickets"
            })
        );
    }

    #[test]
    fn missing_extra_is_empty() {
        let model = Model {
            id: 1,
            payee: "Starbucks".to_string(),
            amount: json!(5.75),
            date: "2017-06-10".to_string(),
            extra: None,
        };

        assert!(StoredExpense::from(model).extra.is_empty());
    }
}
