use async_trait::async_trait;
use thiserror::Error;

use super::models::{
    Instance, InstanceList, InstanceTypeList, LaunchInstanceOpts, RegionList, UpdateInstanceOpts,
};
use crate::error::{Cancelled, HttpResponse};
use crate::pagination::PageRequest;

/// Default page size of list calls.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Offset and limit of a list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest {
    /// Items to skip.
    pub offset: i64,
    /// Page size.
    pub limit: i64,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest for ListRequest {
    fn with_offset(self, offset: i64) -> Self {
        Self { offset, ..self }
    }
}

/// A failed API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("{status} {message}")]
    Http {
        /// Status code.
        status: u16,
        /// Status text or error message.
        message: String,
        /// The raw response.
        response: HttpResponse,
    },

    /// The request never got a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request was cancelled while in flight.
    #[error("{0}")]
    Cancelled(#[from] Cancelled),
}

impl ApiError {
    /// An HTTP failure carrying its raw response.
    pub fn http(response: HttpResponse) -> Self {
        let message = match response.status {
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            409 => "Conflict",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Unexpected Status",
        };
        Self::Http {
            status: response.status,
            message: message.to_string(),
            response,
        }
    }

    /// The raw response, if there was one.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Http { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// The public cloud REST client.
///
/// Implementations perform one HTTP round trip per call. Retries belong to
/// the implementation; callers never retry.
#[async_trait]
pub trait PublicCloudApi: Send + Sync {
    /// `GET /instances`.
    async fn get_instance_list(&self, request: ListRequest) -> Result<InstanceList, ApiError>;

    /// `GET /instances/{id}`.
    async fn get_instance(&self, id: &str) -> Result<Instance, ApiError>;

    /// `POST /instances`.
    async fn launch_instance(&self, opts: LaunchInstanceOpts) -> Result<Instance, ApiError>;

    /// `PUT /instances/{id}`.
    async fn update_instance(
        &self,
        id: &str,
        opts: UpdateInstanceOpts,
    ) -> Result<Instance, ApiError>;

    /// `DELETE /instances/{id}`.
    async fn terminate_instance(&self, id: &str) -> Result<(), ApiError>;

    /// `GET /regions`.
    async fn get_region_list(&self, request: ListRequest) -> Result<RegionList, ApiError>;

    /// `GET /instanceTypes?region={region}`.
    async fn get_instance_type_list(
        &self,
        region: &str,
        request: ListRequest,
    ) -> Result<InstanceTypeList, ApiError>;

    /// `GET /instances/{id}/instanceTypesUpdate`.
    async fn get_update_instance_type_list(
        &self,
        id: &str,
        request: ListRequest,
    ) -> Result<InstanceTypeList, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::find_cause;

    #[test]
    fn test_http_error_keeps_response() {
        let err = ApiError::http(HttpResponse::new(500, r#"{"errorCode":"54"}"#));
        assert_eq!(err.to_string(), "500 Internal Server Error");
        assert_eq!(err.response().map(|r| r.status), Some(500));
    }

    #[test]
    fn test_cancelled_is_a_source() {
        let err = ApiError::from(Cancelled);
        assert!(find_cause::<Cancelled>(&err).is_some());
        assert!(err.response().is_none());
    }

    #[test]
    fn test_list_request_offset() {
        let request = ListRequest::default().with_offset(100);
        assert_eq!(request.offset, 100);
        assert_eq!(request.limit, DEFAULT_PAGE_LIMIT);
    }
}
