use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Booking window already started: {0}")]
    StaleBooking(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Machine-checkable error kind, surfaced in every error payload.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotAuthorized(_) => "not_authorized",
            Self::InvalidState(_) => "invalid_state",
            Self::StaleBooking(_) => "stale_booking",
            Self::Storage(_) => "storage",
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_transient() {
        assert!(DomainError::Storage("connection reset".into()).is_transient());
        assert!(!DomainError::Validation("duration".into()).is_transient());
        assert!(!DomainError::NotAuthorized("nope".into()).is_transient());
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(DomainError::InvalidState("x".into()).kind(), "invalid_state");
        assert_eq!(DomainError::StaleBooking("x".into()).kind(), "stale_booking");
        assert_eq!(
            DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: "1".into()
            }
            .kind(),
            "not_found"
        );
    }
}
