use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::{processor::BalanceUpdateError, store::StoreError};

#[derive(Debug)]
pub enum ApiError {
    MalformedBody(String),
    InvalidAccountId(String),
    UnknownAccount(String),
    BalanceUpdate(BalanceUpdateError),
    Storage(StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::MalformedBody(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::InvalidAccountId(raw) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid account id `{raw}`"),
            ),
            ApiError::UnknownAccount(raw) => {
                (StatusCode::NOT_FOUND, format!("Account {raw} not found"))
            }
            ApiError::BalanceUpdate(err) => {
                let status = match &err {
                    BalanceUpdateError::InvalidRequest(_)
                    | BalanceUpdateError::LimitExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    BalanceUpdateError::AccountNotFound(_) => StatusCode::NOT_FOUND,
                    BalanceUpdateError::Contention { .. }
                    | BalanceUpdateError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, err.to_string())
            }
            ApiError::Storage(err) => {
                let status = match &err {
                    StoreError::AccountNotFound(_) => StatusCode::NOT_FOUND,
                    StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(%status, "responding with {message}");
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<BalanceUpdateError> for ApiError {
    fn from(err: BalanceUpdateError) -> Self {
        ApiError::BalanceUpdate(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Storage(err)
    }
}
