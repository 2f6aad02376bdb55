use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{AuthUser, ServerState, router, run_with_listener, spawn_with_listener};

mod catalog;
mod reports;
mod server;
mod transactions;
mod views;

pub mod types {
    pub use api_types::{
        CategoryKind, PeriodQuery, account, category, dashboard, fixed, transaction,
    };
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        err if err.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        err if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "service unavailable, retry later".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let field = err.field().map(ToString::to_string);
                (
                    status,
                    Error {
                        error: message_for_engine_error(err),
                        field,
                    },
                )
            }
            ServerError::Generic(err) => (
                StatusCode::BAD_REQUEST,
                Error {
                    error: err,
                    field: None,
                },
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
