//! Category handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::{decode, parse_id};
use crate::config::AppState;
use crate::error::{ApiError, Resource};
use crate::http::json_response;
use crate::model::Category;

type HandlerResult = Result<Response<Full<Bytes>>, ApiError>;

pub fn list(state: &AppState) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &state.categories.list())
}

pub fn create(state: &AppState, body: &[u8]) -> HandlerResult {
    let category: Category = decode(body)?;
    let created = state.categories.create(category);
    Ok(json_response(StatusCode::CREATED, &created))
}

pub fn get(state: &AppState, id_segment: &str) -> HandlerResult {
    let id = parse_id(id_segment, Resource::Category)?;
    let category = state
        .categories
        .get(id)
        .ok_or(ApiError::NotFound(Resource::Category))?;
    Ok(json_response(StatusCode::OK, &category))
}

pub fn update(state: &AppState, id_segment: &str, body: &[u8]) -> HandlerResult {
    let id = parse_id(id_segment, Resource::Category)?;
    let replacement: Category = decode(body)?;
    let updated = state
        .categories
        .update(id, replacement)
        .ok_or(ApiError::NotFound(Resource::Category))?;
    Ok(json_response(StatusCode::OK, &updated))
}

pub fn delete(state: &AppState, id_segment: &str) -> HandlerResult {
    let id = parse_id(id_segment, Resource::Category)?;
    state
        .categories
        .delete(id)
        .ok_or(ApiError::NotFound(Resource::Category))?;
    Ok(super::deleted_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::tests::{body_json, test_state};

    #[tokio::test]
    async fn test_create_and_get() {
        let state = test_state(true);
        let response = create(&state, br#"{"nama":"Snack"}"#).unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, serde_json::json!({"id": 3, "nama": "Snack"}));

        let fetched = body_json(get(&state, "3").unwrap()).await;
        assert_eq!(fetched, serde_json::json!({"id": 3, "nama": "Snack"}));
    }

    #[tokio::test]
    async fn test_update_renames_in_place() {
        let state = test_state(true);
        let body = body_json(update(&state, "1", br#"{"id":8,"nama":"Makanan Berat"}"#).unwrap()).await;
        assert_eq!(body, serde_json::json!({"id": 1, "nama": "Makanan Berat"}));
        assert_eq!(state.categories.name_of(1), "Makanan Berat");
    }

    #[test]
    fn test_update_errors_leave_store_untouched() {
        let state = test_state(true);
        assert_eq!(
            update(&state, "9", br#"{"nama":"Baru"}"#).unwrap_err(),
            ApiError::NotFound(Resource::Category)
        );
        assert_eq!(
            update(&state, "1", b"{\"nama\":").unwrap_err(),
            ApiError::InvalidRequest
        );
        assert_eq!(state.categories.list(), crate::model::seed_categories());
    }

    #[test]
    fn test_delete_then_get() {
        let state = test_state(true);
        assert!(delete(&state, "1").is_ok());
        assert_eq!(
            get(&state, "1").unwrap_err(),
            ApiError::NotFound(Resource::Category)
        );
        assert_eq!(state.categories.list(), vec![Category::new(2, "Minuman")]);
    }

    #[test]
    fn test_invalid_id_message() {
        let state = test_state(true);
        let err = get(&state, "dua").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Kategori ID");
    }

    #[test]
    fn test_delete_does_not_cascade() {
        let state = test_state(true);
        delete(&state, "1").unwrap();
        assert_eq!(state.products.len(), 3);
    }
}
