//! Expense API endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, header},
};

use crate::{Reply, ServerError, server::ServerState};

/// Handle requests recording a new expense, in JSON or XML.
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Reply, ServerError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    state.dispatcher.handle_create(content_type, &body).await
}

/// Handle requests listing the expenses of a day
pub async fn on_date(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> Result<Reply, ServerError> {
    state.dispatcher.handle_read(&date).await
}
