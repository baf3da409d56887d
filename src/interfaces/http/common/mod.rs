//! Common API types

pub mod validated_json;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// Every REST endpoint returns data in this wrapper.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "...", "kind": "..."}` where
/// `kind` is the machine-checkable error class.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload. `null` on failure
    pub data: Option<T>,
    /// Error description. `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-checkable error kind. `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            kind: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            kind: None,
        }
    }

    pub fn from_domain(e: &DomainError) -> Self {
        // Storage messages carry driver internals; never leak them.
        let message = match e {
            DomainError::Storage(_) => "internal storage error".to_string(),
            other => other.to_string(),
        };
        Self {
            success: false,
            data: None,
            error: Some(message),
            kind: Some(e.kind().to_string()),
        }
    }
}

/// HTTP status for each domain error kind.
pub fn error_status(e: &DomainError) -> StatusCode {
    match e {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotAuthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::InvalidState(_) => StatusCode::CONFLICT,
        DomainError::StaleBooking(_) => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error into the standard handler rejection tuple.
pub fn domain_error<T>(e: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    (error_status(&e), Json(ApiResponse::from_domain(&e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            error_status(&DomainError::Validation("d".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&DomainError::NotAuthorized("d".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_status(&DomainError::NotFound {
                entity: "Listing",
                field: "id",
                value: "7".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&DomainError::InvalidState("d".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&DomainError::StaleBooking("d".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&DomainError::Storage("d".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_payload_carries_kind_but_not_storage_internals() {
        let body = ApiResponse::<()>::from_domain(&DomainError::Storage(
            "SQLITE_BUSY: database is locked".into(),
        ));
        assert!(!body.success);
        assert_eq!(body.kind.as_deref(), Some("storage"));
        assert_eq!(body.error.as_deref(), Some("internal storage error"));

        let body =
            ApiResponse::<()>::from_domain(&DomainError::StaleBooking("window started".into()));
        assert_eq!(body.kind.as_deref(), Some("stale_booking"));
        assert!(body.error.unwrap().contains("window started"));
    }
}
