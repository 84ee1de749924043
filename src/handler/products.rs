//! Product handlers
//!
//! CRUD over the product store. Fetch-by-id resolves the category name.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::{decode, parse_id};
use crate::config::AppState;
use crate::error::{ApiError, Resource};
use crate::http::json_response;
use crate::model::{Product, ProductView};

type HandlerResult = Result<Response<Full<Bytes>>, ApiError>;

pub fn list(state: &AppState) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &state.products.list())
}

pub fn create(state: &AppState, body: &[u8]) -> HandlerResult {
    let product: Product = decode(body)?;
    let created = state.products.create(product);
    Ok(json_response(StatusCode::CREATED, &created))
}

pub fn get(state: &AppState, id_segment: &str) -> HandlerResult {
    let id = parse_id(id_segment, Resource::Product)?;
    let product = state
        .products
        .get(id)
        .ok_or(ApiError::NotFound(Resource::Product))?;
    // product lock is released before the category lookup
    let category = state.categories.name_of(product.category_id);
    Ok(json_response(StatusCode::OK, &ProductView::new(product, category)))
}

pub fn update(state: &AppState, id_segment: &str, body: &[u8]) -> HandlerResult {
    let id = parse_id(id_segment, Resource::Product)?;
    let replacement: Product = decode(body)?;
    let updated = state
        .products
        .update(id, replacement)
        .ok_or(ApiError::NotFound(Resource::Product))?;
    Ok(json_response(StatusCode::OK, &updated))
}

pub fn delete(state: &AppState, id_segment: &str) -> HandlerResult {
    let id = parse_id(id_segment, Resource::Product)?;
    state
        .products
        .delete(id)
        .ok_or(ApiError::NotFound(Resource::Product))?;
    Ok(super::deleted_response())
}
