//! Request handlers.
//!
//! Each handler validates its input, runs one store operation on the
//! blocking pool and turns the outcome into a response.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::{debug, error};

use crate::record::NewRecord;
use crate::storage::RecordStore;
use crate::view::{render_error_page, render_page, RecordJson};

use super::{ApiError, AppState};

/// Run a store operation on the blocking pool.
async fn run_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&RecordStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ApiError::internal(format!("store task failed: {e}")))?
        .map_err(ApiError::from)
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid record id: {raw}")))
}

/// Read a creation body. Only a JSON object is accepted; serde would
/// otherwise also read `["name", "value"]` positionally.
fn parse_new_record(body: serde_json::Value) -> Result<NewRecord, ApiError> {
    if !body.is_object() {
        return Err(ApiError::bad_request("request body must be a JSON object"));
    }
    serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("invalid record body: {e}")))
}

/// `POST /api/records`
pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordJson>), ApiError> {
    let Json(body) = payload?;
    let input = parse_new_record(body)?;
    input.validate()?;

    let record = run_store(&state, move |store| store.create(&input)).await?;
    debug!(id = record.id, "Created record");
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// `GET /api/records`
pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecordJson>>, ApiError> {
    let records = run_store(&state, RecordStore::list_all).await?;
    Ok(Json(records.into_iter().map(RecordJson::from).collect()))
}

/// `GET /api/records/{id}`
pub async fn get_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<RecordJson>, ApiError> {
    let id = parse_id(&raw_id)?;
    run_store(&state, move |store| store.get(id))
        .await?
        .map(|record| Json(record.into()))
        .ok_or(ApiError::NotFound(id))
}

/// `DELETE /api/records/{id}`
///
/// Deletion is not supported; the id is still checked so a malformed one
/// gets 400 rather than 501. The store is never touched.
pub async fn delete_record(Path(raw_id): Path<String>) -> ApiError {
    match parse_id(&raw_id) {
        Ok(id) => {
            debug!(id, "Rejected delete request");
            ApiError::NotImplemented("record deletion is not implemented")
        }
        Err(err) => err,
    }
}

/// `GET /`
pub async fn records_page(State(state): State<AppState>) -> Response {
    match run_store(&state, RecordStore::list_all).await {
        Ok(records) => Html(render_page(&records)).into_response(),
        Err(err) => {
            error!("Failed to render records page: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page(&err.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("-1").unwrap(), -1);
    }

    #[test]
    fn test_parse_new_record_requires_object() {
        for body in [json!(["a", "b"]), json!([]), json!("a"), json!(1), json!(null)] {
            let err = parse_new_record(body.clone()).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "accepted {body}");
        }
    }

    #[test]
    fn test_parse_new_record_reads_fields() {
        let input = parse_new_record(json!({"name": "a", "value": "b"})).unwrap();
        assert_eq!(input, NewRecord::new("a", "b"));
    }

    #[test]
    fn test_parse_new_record_rejects_wrong_field_types() {
        let err = parse_new_record(json!({"name": 1, "value": "b"})).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_parse_id_rejects_non_integers() {
        for raw in ["abc", "1.5", "", "12abc", "99999999999999999999"] {
            let err = parse_id(raw).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "accepted {raw:?}");
        }
    }
}
