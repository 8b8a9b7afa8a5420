use api_types::ApiError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

pub use codec::{CodecError, MediaType};
pub use dispatcher::{Reply, RequestDispatcher};
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod codec;
mod dispatcher;
mod expenses;
mod server;

/// Failures the dispatcher cannot turn into a 422 reply.
#[derive(Debug)]
pub enum ServerError {
    Ledger(LedgerError),
    Codec(CodecError),
}

fn status_for_server_error(err: &ServerError) -> StatusCode {
    match err {
        ServerError::Ledger(LedgerError::Database(_)) | ServerError::Codec(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_server_error(err: ServerError) -> String {
    match err {
        ServerError::Ledger(LedgerError::Database(db_err)) => {
            tracing::error!("database error: {db_err}");
        }
        ServerError::Codec(codec_err) => {
            tracing::error!("codec error: {codec_err}");
        }
    }
    "internal server error".to_string()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = status_for_server_error(&self);
        let error = message_for_server_error(self);

        (status, Json(ApiError::new(error))).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<CodecError> for ServerError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use sea_orm::DbErr;

    use super::*;

    #[test]
    fn ledger_database_maps_to_500() {
        let res = ServerError::from(LedgerError::Database(DbErr::Custom("boom".to_string())))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn codec_maps_to_500() {
        let res = ServerError::from(CodecError::Encode("bad".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_details_stay_out_of_the_body() {
        let res = ServerError::from(LedgerError::Database(DbErr::Custom(
            "disk I/O error".to_string(),
        )))
        .into_response();

        let body = res.into_body().collect().await.unwrap().to_bytes();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error, ApiError::new("internal server error"));
    }
}
