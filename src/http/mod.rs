//! HTTP protocol layer module
//!
//! Response builders shared by the catalog handlers and the router.

pub mod response;

pub use response::{empty_response, json_response, text_error, text_response};
