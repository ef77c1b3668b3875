use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::{Error as StoreError, Result as StoreResult};

/// Machine-readable error codes returned alongside the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Validation,
    NotFound,
    TeamNotFound,
    Internal,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::TeamNotFound => "TEAM_NOT_FOUND",
            ErrorCode::Internal => "INTERNAL_ERROR",
        }
    }
}

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: ErrorCode::Validation,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: ErrorCode::NotFound,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn team_not_found(team_id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: ErrorCode::TeamNotFound,
            message: format!("El equipo con ID '{team_id}' no existe"),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: ErrorCode::Internal,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "message": self.message, "code": self.code.as_str() });
        (self.status, Json(body)).into_response()
    }
}

/// Confirmation body for deletions.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A record with a human-readable message merged into the same object.
#[derive(Debug, Serialize)]
pub struct WithMessage<T: Serialize> {
    #[serde(flatten)]
    pub record: T,
    pub message: String,
}

/// JSON body extractor whose rejections use the API error envelope.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::validation(format!(
                    "El cuerpo de la solicitud no es válido: {}",
                    rejection.body_text()
                )))
            }
        }
    }
}

/// Query string extractor whose rejections use the API error envelope.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected query string: {}", rejection.body_text());
                Err(ApiError::validation(format!(
                    "Los parámetros de consulta no son válidos: {}",
                    rejection.body_text()
                )))
            }
        }
    }
}

/// Extension trait for converting store results to API errors with a custom message.
pub trait StoreResultExt<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError>;

    /// Like `api_err`, but a record that vanished mid-request is a 404.
    fn api_err_or_not_found(
        self,
        message: &'static str,
        not_found: impl FnOnce() -> String,
    ) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            ApiError::internal(message)
        })
    }

    fn api_err_or_not_found(
        self,
        message: &'static str,
        not_found: impl FnOnce() -> String,
    ) -> Result<T, ApiError> {
        match self {
            Err(StoreError::NotFound) => Err(ApiError::not_found(not_found())),
            other => other.api_err(message),
        }
    }
}

/// Extension for store deletions reporting whether a row was removed.
pub trait StoreDeleteExt {
    fn deleted_or_not_found(
        self,
        message: &'static str,
        not_found: impl FnOnce() -> String,
    ) -> Result<(), ApiError>;
}

impl StoreDeleteExt for StoreResult<bool> {
    fn deleted_or_not_found(
        self,
        message: &'static str,
        not_found: impl FnOnce() -> String,
    ) -> Result<(), ApiError> {
        if self.api_err(message)? {
            Ok(())
        } else {
            Err(ApiError::not_found(not_found()))
        }
    }
}

/// Extension for Option types from store operations.
pub trait StoreOptionExt<T> {
    fn or_not_found(self, message: impl FnOnce() -> String) -> Result<T, ApiError>;
}

impl<T> StoreOptionExt<T> for Option<T> {
    fn or_not_found(self, message: impl FnOnce() -> String) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::not_found(message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::validation("x").code.as_str(), "VALIDATION_ERROR");
        assert_eq!(ApiError::not_found("x").status, StatusCode::NOT_FOUND);

        let team = ApiError::team_not_found("abc");
        assert_eq!(team.status, StatusCode::NOT_FOUND);
        assert_eq!(team.code.as_str(), "TEAM_NOT_FOUND");
        assert!(team.message.contains("'abc'"));
    }

    #[test]
    fn test_store_errors_become_internal() {
        let result: StoreResult<()> = Err(StoreError::Config("boom".into()));
        let err = result.api_err("Error al obtener los jugadores").unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, "Error al obtener los jugadores");
    }

    #[test]
    fn test_vanished_record_becomes_not_found() {
        let result: StoreResult<()> = Err(StoreError::NotFound);
        let err = result
            .api_err_or_not_found("Error al actualizar el equipo", || "gone".to_string())
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "gone");

        let result: StoreResult<()> = Err(StoreError::Config("boom".into()));
        let err = result
            .api_err_or_not_found("Error al actualizar el equipo", || "gone".to_string())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Internal);
    }

    #[test]
    fn test_delete_of_missing_row_becomes_not_found() {
        let removed: StoreResult<bool> = Ok(true);
        assert!(removed
            .deleted_or_not_found("Error al eliminar el jugador", || "gone".to_string())
            .is_ok());

        let already_gone: StoreResult<bool> = Ok(false);
        let err = already_gone
            .deleted_or_not_found("Error al eliminar el jugador", || "gone".to_string())
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_missing_option_becomes_not_found() {
        let err = None::<()>
            .or_not_found(|| "El jugador con ID 'x' no fue encontrado".to_string())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
