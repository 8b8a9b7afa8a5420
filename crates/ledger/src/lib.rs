//! Validation and persistence of expense records.
//!
//! [`Ledger`] is the only writer of the `expenses` table. It checks that an
//! [`ExpenseRecord`] carries the required keys, inserts it and answers
//! per-date queries. The HTTP layer talks to it through [`ExpenseLedger`].
use async_trait::async_trait;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};

pub use error::LedgerError;
pub use expenses::StoredExpense;
pub use record::{ExpenseRecord, FieldValue, REQUIRED_FIELDS, RecordResult};

mod error;
mod expenses;
mod record;

type ResultLedger<T> = Result<T, LedgerError>;

/// Operations the HTTP layer needs from a ledger.
#[async_trait]
pub trait ExpenseLedger: Send + Sync {
    /// Validate and persist `expense`.
    async fn record(&self, expense: ExpenseRecord) -> ResultLedger<RecordResult>;

    /// All expenses stored under `date`.
    async fn expenses_on(&self, date: &str) -> ResultLedger<Vec<StoredExpense>>;
}

#[derive(Debug, Clone)]
pub struct Ledger {
    database: DatabaseConnection,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Record a new expense.
    ///
    /// A record missing any of [`REQUIRED_FIELDS`] is rejected without
    /// touching storage. Otherwise one row is inserted and its generated id
    /// is returned; the id comes from the insert itself, so concurrent
    /// callers never observe each other's rows.
    pub async fn record(&self, expense: ExpenseRecord) -> ResultLedger<RecordResult> {
        let expense = match expense.validate() {
            Ok(expense) => expense,
            Err(error_message) => {
                tracing::debug!("expense rejected: {error_message}");
                return Ok(RecordResult::Rejected { error_message });
            }
        };

        let inserted = expenses::Entity::insert(expenses::ActiveModel::from(expense))
            .exec(&self.database)
            .await?;
        let expense_id = inserted.last_insert_id;
        tracing::info!("expense {expense_id} recorded");

        Ok(RecordResult::Recorded { expense_id })
    }

    /// Return every expense whose `date` equals `date`, oldest first.
    pub async fn expenses_on(&self, date: &str) -> ResultLedger<Vec<StoredExpense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::Date.eq(date))
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(StoredExpense::from).collect())
    }
}

#[async_trait]
impl ExpenseLedger for Ledger {
    async fn record(&self, expense: ExpenseRecord) -> ResultLedger<RecordResult> {
        Ledger::record(self, expense).await
    }

    async fn expenses_on(&self, date: &str) -> ResultLedger<Vec<StoredExpense>> {
        Ledger::expenses_on(self, date).await
    }
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> Ledger {
        Ledger {
            database: self.database,
        }
    }
}
