use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// FieldError
///
/// A single rejected field of a request payload. Validation collects every
/// failing field instead of stopping at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// AppError
///
/// The error taxonomy shared by every layer. Storage reports absence, the service
/// turns it into `NotFound`, and the transport layer maps each variant to a fixed
/// status code through `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid payload: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        AppError::NotFound {
            resource,
            key: id.to_string(),
        }
    }

    pub fn field(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// ErrorBody
///
/// JSON envelope returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = match &self {
            AppError::Validation(_) => "validation_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Database(_) => "database_error",
        };

        let (message, details) = match self {
            AppError::Database(e) => {
                // Driver details stay server-side.
                tracing::error!("database error: {:?}", e);
                ("internal database error".to_string(), None)
            }
            AppError::Validation(fields) => {
                let message = format!("invalid payload: {} field error(s)", fields.len());
                (message, Some(fields))
            }
            other => (other.to_string(), None),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Maps constraint violations raised by Postgres onto the client-facing taxonomy.
///
/// 23505 (unique) surfaces when two writers race the name check, 23503 (foreign key)
/// when a delete hits a row that is still referenced or a referenced row vanished
/// between the service check and the write. Everything else stays a database error.
pub fn classify_db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some("23505") => {
                return AppError::Conflict(format!(
                    "unique constraint violated: {}",
                    db.constraint().unwrap_or("unknown")
                ));
            }
            Some("23503") => {
                return AppError::Conflict(format!(
                    "foreign key violated: {}",
                    db.constraint().unwrap_or("unknown")
                ));
            }
            _ => {}
        }
    }
    AppError::Database(err)
}
