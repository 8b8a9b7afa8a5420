//! Translation between HTTP payloads and [`ExpenseLedger`] calls.
//!
//! Every expected failure (unsupported media type, undecodable body,
//! rejected expense) becomes a 422 [`Reply`]. Only storage and encoding
//! failures leave as a [`ServerError`].

use std::sync::Arc;

use api_types::{ApiError, expense::ExpenseCreated};
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use ledger::{ExpenseLedger, RecordResult};
use serde::Serialize;

use crate::{MediaType, ServerError};

pub const UNSUPPORTED_FORMAT: &str = "Unsupported format";
pub const FORMAT_MISMATCH: &str = "Expense payload does not match the format advertised";

/// A fully encoded response.
#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    media_type: MediaType,
    body: Vec<u8>,
}

impl Reply {
    fn encode<T: Serialize>(
        status: StatusCode,
        media_type: MediaType,
        value: &T,
    ) -> Result<Self, ServerError> {
        Ok(Self {
            status,
            media_type,
            body: media_type.encode(value)?,
        })
    }

    fn unprocessable(media_type: MediaType, error: impl Into<String>) -> Result<Self, ServerError> {
        Self::encode(
            StatusCode::UNPROCESSABLE_ENTITY,
            media_type,
            &ApiError::new(error),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.media_type.as_str())],
            self.body,
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct RequestDispatcher {
    ledger: Arc<dyn ExpenseLedger>,
}

impl RequestDispatcher {
    pub fn new(ledger: Arc<dyn ExpenseLedger>) -> Self {
        Self { ledger }
    }

    /// Handle `POST /expenses`.
    ///
    /// `content_type` is the raw header value, `None` when it is absent or
    /// not valid ASCII.
    pub async fn handle_create(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<Reply, ServerError> {
        let Some(media_type) = content_type.and_then(MediaType::from_content_type) else {
            tracing::debug!("unsupported content type {content_type:?}");
            return Reply::unprocessable(MediaType::Json, UNSUPPORTED_FORMAT);
        };

        let expense = match media_type.decode_expense(body) {
            Ok(expense) => expense,
            Err(err) => {
                tracing::debug!("{} payload rejected: {err}", media_type.as_str());
                return Reply::unprocessable(media_type, FORMAT_MISMATCH);
            }
        };

        match self.ledger.record(expense).await? {
            RecordResult::Recorded { expense_id } => {
                Reply::encode(StatusCode::OK, media_type, &ExpenseCreated { expense_id })
            }
            RecordResult::Rejected { error_message } => {
                Reply::unprocessable(media_type, error_message)
            }
        }
    }

    /// Handle `GET /expenses/{date}`. Always JSON.
    pub async fn handle_read(&self, date: &str) -> Result<Reply, ServerError> {
        let expenses = self.ledger.expenses_on(date).await?;
        Reply::encode(StatusCode::OK, MediaType::Json, &expenses)
    }
}
