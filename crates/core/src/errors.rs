use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid order id `{0}` (expected ORD-####)")]
    InvalidOrderId(String),
}

/// Error surfaced at the HTTP boundary. `message` is for logs only; callers
/// see [`InterfaceError::user_message`] and the correlation id.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. } => correlation_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{DomainError, InterfaceError};

    #[test]
    fn bad_request_hides_the_detail_from_callers() {
        let interface = InterfaceError::BadRequest {
            message: "expected value at line 1 column 2".to_owned(),
            correlation_id: "req-1".to_owned(),
        };

        assert_eq!(interface.correlation_id(), "req-1");
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
        assert!(interface.to_string().contains("line 1 column 2"));
    }

    #[test]
    fn service_unavailable_keeps_its_correlation_id() {
        let interface = InterfaceError::ServiceUnavailable {
            message: "sheets quota exceeded".to_owned(),
            correlation_id: "req-2".to_owned(),
        };

        assert_eq!(interface.correlation_id(), "req-2");
        assert_eq!(
            interface.user_message(),
            "The service is temporarily unavailable. Please retry shortly."
        );
    }

    #[test]
    fn invalid_order_id_names_the_expected_shape() {
        let error = DomainError::InvalidOrderId("ORD-1".to_owned());
        assert_eq!(error.to_string(), "invalid order id `ORD-1` (expected ORD-####)");
    }
}
