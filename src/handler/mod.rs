//! Request handler module
//!
//! Routing dispatch plus the catalog handlers for products and categories.

mod categories;
mod products;
pub mod router;

// Re-export main entry point
pub use router::handle_request;

use crate::error::{ApiError, Resource};
use crate::http::json_response;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Response, StatusCode};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Success body for a delete
fn deleted_response() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &serde_json::json!({ "message": "sukses delete" }),
    )
}

/// Parse the trailing id segment of an item path, after percent-decoding it
fn parse_id(segment: &str, resource: Resource) -> Result<i64, ApiError> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .and_then(|decoded| decoded.parse::<i64>().ok())
        .ok_or(ApiError::InvalidId(resource))
}

/// Decode the first JSON value of a request body.
///
/// A literal `null` decodes to the default record and anything after the
/// first value is ignored. Object keys match field names case-insensitively;
/// for a repeated key the last occurrence wins.
fn decode<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    let value = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
        .ok_or(ApiError::InvalidRequest)?;

    match value {
        Value::Null => Ok(T::default()),
        Value::Object(fields) => serde_json::from_value(Value::Object(fold_keys(fields)))
            .map_err(|_| ApiError::InvalidRequest),
        _ => Err(ApiError::InvalidRequest),
    }
}

/// Lowercase object keys in document order, so the last spelling of a key wins
fn fold_keys(fields: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in fields {
        out.insert(key.to_lowercase(), value);
    }
    out
}

/// Collect a request body, enforcing the configured size limit
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Vec<u8>, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    use http_body_util::{BodyExt, LengthLimitError, Limited};

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes().to_vec()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(ApiError::PayloadTooLarge),
        Err(_) => Err(ApiError::InvalidRequest),
    }
}
