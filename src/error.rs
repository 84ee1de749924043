//! Request errors
//!
//! Every error ends the request; handlers validate input before touching a
//! store, so a failed update or delete leaves the collection unchanged.

use crate::http;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error as ThisError;

/// Resource kind named in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Product,
    Category,
}

impl Resource {
    /// Label used in user-facing messages
    pub const fn label(self) -> &'static str {
        match self {
            Self::Product => "Produk",
            Self::Category => "Kategori",
        }
    }
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Path segment is not an integer
    #[error("Invalid {} ID", .0.label())]
    InvalidId(Resource),

    /// Body does not decode as the expected shape
    #[error("Invalid request")]
    InvalidRequest,

    /// No record with the requested id
    #[error("{} belum ada", .0.label())]
    NotFound(Resource),

    /// Route exists but not for this method
    #[error("Method not allowed")]
    MethodNotAllowed { allow: &'static str },

    /// Declared or actual body size exceeds the configured limit
    #[error("Request body too large")]
    PayloadTooLarge,
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Plain-text response carrying the error message
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = http::text_error(self.status_code(), &self.to_string());
        if let Self::MethodNotAllowed { allow } = self {
            response
                .headers_mut()
                .insert(hyper::header::ALLOW, hyper::header::HeaderValue::from_static(allow));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::InvalidId(Resource::Product).to_string(), "Invalid Produk ID");
        assert_eq!(ApiError::InvalidId(Resource::Category).to_string(), "Invalid Kategori ID");
        assert_eq!(ApiError::NotFound(Resource::Product).to_string(), "Produk belum ada");
        assert_eq!(ApiError::NotFound(Resource::Category).to_string(), "Kategori belum ada");
        assert_eq!(ApiError::InvalidRequest.to_string(), "Invalid request");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound(Resource::Category).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::MethodNotAllowed { allow: "GET" }.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed { allow: "GET, POST" }.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], "GET, POST");
    }
}
