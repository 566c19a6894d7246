//! Error types for the provider core.
//!
//! Errors are wrapped, never transformed: every layer stores the upstream error
//! as its `source` and prefixes the message with its own call-site name, so the
//! outermost `Display` reads `"<facade>: <service>: <repository>: <cause>"`.
//! Structured causes stay reachable through [`find_cause`].

use std::collections::BTreeMap;
use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A boxed, thread-safe error used as the general cause of a wrapping error.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Walk an error's `source` chain and return the first cause of type `E`.
///
/// This is how callers match sentinel errors by identity through any number
/// of wrapping layers.
pub fn find_cause<'a, E>(err: &'a (dyn StdError + 'static)) -> Option<&'a E>
where
    E: StdError + 'static,
{
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(found) = e.downcast_ref::<E>() {
            return Some(found);
        }
        current = e.source();
    }
    None
}

/// The operation observed a cancelled request context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Raw HTTP response attached to a failed API call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Response body, verbatim.
    pub body: String,
}

impl HttpResponse {
    /// A response with a status and a body and no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// The structured error body the API returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Id to quote to support.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Per-field messages.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub error_details: BTreeMap<String, Vec<String>>,
}

/// A failure at the REST boundary.
#[derive(Debug, Error)]
#[error("{prefix}: {source}")]
pub struct RepositoryError {
    prefix: String,
    #[source]
    source: BoxError,
    response: Option<HttpResponse>,
}

impl RepositoryError {
    /// Wrap a cause with a call-site prefix.
    pub fn new(prefix: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            prefix: prefix.into(),
            source: source.into(),
            response: None,
        }
    }

    /// Attach the raw HTTP response.
    pub fn with_response(mut self, response: HttpResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// The call-site prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The raw HTTP response, if the call got that far.
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// HTTP status of the failed call.
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    /// The response body parsed as an API error body.
    pub fn error_response(&self) -> Option<ErrorResponse> {
        let response = self.response.as_ref()?;
        serde_json::from_str(&response.body).ok()
    }

    /// Whether the API answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether the call was abandoned because the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        find_cause::<Cancelled>(self).is_some()
    }
}

/// A failure inside the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The repository failed.
    #[error("{prefix}: {source}")]
    Repository {
        /// Call-site prefix.
        prefix: String,
        /// Repository failure.
        #[source]
        source: RepositoryError,
    },

    /// Anything else, domain errors included.
    #[error("{prefix}: {source}")]
    General {
        /// Call-site prefix.
        prefix: String,
        /// Underlying cause.
        #[source]
        source: BoxError,
    },
}

impl ServiceError {
    /// Wrap a repository failure.
    pub fn from_repository(prefix: impl Into<String>, source: RepositoryError) -> Self {
        Self::Repository {
            prefix: prefix.into(),
            source,
        }
    }

    /// Wrap any other failure.
    pub fn general(prefix: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::General {
            prefix: prefix.into(),
            source: source.into(),
        }
    }

    /// The repository failure underneath, if any.
    pub fn repository_error(&self) -> Option<&RepositoryError> {
        find_cause::<RepositoryError>(self)
    }

    /// The parsed API error body underneath, if any.
    pub fn error_response(&self) -> Option<ErrorResponse> {
        self.repository_error()?.error_response()
    }

    /// Whether the failure is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        find_cause::<Cancelled>(self).is_some()
    }
}

/// A failure at the host boundary.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// The service failed.
    #[error("{prefix}: {source}")]
    Service {
        /// Call-site prefix.
        prefix: String,
        /// Service failure.
        #[source]
        source: ServiceError,
    },

    /// Anything else, adapter and domain errors included.
    #[error("{prefix}: {source}")]
    General {
        /// Call-site prefix.
        prefix: String,
        /// Underlying cause.
        #[source]
        source: BoxError,
    },
}

impl FacadeError {
    /// Wrap a service failure.
    pub fn from_service(prefix: impl Into<String>, source: ServiceError) -> Self {
        Self::Service {
            prefix: prefix.into(),
            source,
        }
    }

    /// Wrap any other failure.
    pub fn general(prefix: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::General {
            prefix: prefix.into(),
            source: source.into(),
        }
    }

    /// The parsed API error body underneath, if any.
    pub fn error_response(&self) -> Option<ErrorResponse> {
        find_cause::<RepositoryError>(self)?.error_response()
    }

    /// Whether the failure is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        find_cause::<Cancelled>(self).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Error)]
    #[error("connection reset")]
    struct Reset;

    fn repository_error() -> RepositoryError {
        RepositoryError::new("launch_instance", Reset)
            .with_response(HttpResponse::new(500, r#"{"errorCode":"54","errorMessage":"boom"}"#))
    }

    #[test]
    fn test_chain_keeps_every_frame() {
        let err = FacadeError::from_service(
            "create_instance",
            ServiceError::from_repository("launch_instance", repository_error()),
        );
        assert_eq!(
            err.to_string(),
            "create_instance: launch_instance: launch_instance: connection reset"
        );
    }

    #[test]
    fn test_error_code_reachable_through_chain() {
        let err = FacadeError::from_service(
            "create_instance",
            ServiceError::from_repository("launch_instance", repository_error()),
        );
        let body = err.error_response().unwrap();
        assert_eq!(body.error_code.as_deref(), Some("54"));
        assert_eq!(body.error_message.as_deref(), Some("boom"));
        assert_eq!(
            find_cause::<RepositoryError>(&err).and_then(RepositoryError::status),
            Some(500)
        );
    }

    #[test]
    fn test_unparsable_body_has_no_error_response() {
        let err = RepositoryError::new("get_instance", Reset)
            .with_response(HttpResponse::new(502, "<html>bad gateway</html>"));
        assert_eq!(err.error_response(), None);
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_sentinel_matched_by_identity() {
        let err = FacadeError::general(
            "create_instance",
            ServiceError::general("launch_instance", DomainError::ContractTermMustBeZero),
        );
        assert_eq!(
            find_cause::<DomainError>(&err),
            Some(&DomainError::ContractTermMustBeZero)
        );
        assert!(find_cause::<RepositoryError>(&err).is_none());
    }

    #[test]
    fn test_cancellation_detected() {
        let err = ServiceError::from_repository(
            "get_instance",
            RepositoryError::new("get_instance", Cancelled),
        );
        assert!(err.is_cancelled());
        assert!(FacadeError::from_service("get_instance", err).is_cancelled());
        assert!(!repository_error().is_cancelled());
    }

    #[test]
    fn test_not_found() {
        let err = RepositoryError::new("delete_instance", Reset)
            .with_response(HttpResponse::new(404, "").with_header("Content-Type", "text/plain"));
        assert!(err.is_not_found());
        assert_eq!(
            err.response().unwrap().headers.get("Content-Type").map(String::as_str),
            Some("text/plain")
        );
    }

    #[test]
    fn test_error_response_deserialises_details() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"correlationId":"c-1","errorCode":"400","errorMessage":"Validation failed","errorDetails":{"type":["is invalid"]}}"#,
        )
        .unwrap();
        assert_eq!(body.correlation_id.as_deref(), Some("c-1"));
        assert_eq!(body.error_details["type"], vec!["is invalid".to_string()]);
    }
}
