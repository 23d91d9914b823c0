//! REST handlers for `/api/people`.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::models::{NewPerson, Person};

use super::{error_response, ApiError, AppState};

/// Query parameters for person lookup by name.
#[derive(Debug, Deserialize)]
pub struct PersonQueryParams {
    /// Exact given name to look up.
    #[serde(default)]
    pub name: Option<String>,
}

/// Confirmation body for deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation text.
    pub message: String,
}

pub(crate) async fn create_person(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let input = state
        .people
        .decode(&body)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON format: {e}"), "INVALID_INPUT"))?;

    match state.people.create(input).await {
        Ok(person) => Ok((StatusCode::CREATED, Json(person))),
        Err(DomainError::Lookup(e)) => {
            tracing::warn!(kind = %e.kind(), error = %e, "enrichment failed for HTTP request");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error enriching person data: {e}"),
                "ENRICHMENT_ERROR",
            ))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create person");
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error creating person", "DATABASE_ERROR"))
        }
    }
}

pub(crate) async fn get_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let id = parse_id(&id)?;

    match state.people.get(id).await {
        Ok(Some(person)) => Ok(Json(person)),
        Ok(None) => Err(not_found()),
        Err(e) => {
            tracing::error!(person_id = id, error = %e, "failed to fetch person");
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching person", "DATABASE_ERROR"))
        }
    }
}

pub(crate) async fn find_person(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PersonQueryParams>,
) -> Result<Json<Person>, ApiError> {
    let name = params
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "Missing name query parameter", "INVALID_INPUT"))?;

    match state.people.find_by_name(&name).await {
        Ok(Some(person)) => Ok(Json(person)),
        Ok(None) => Err(not_found()),
        Err(e) => {
            tracing::error!(name = %name, error = %e, "failed to look up person by name");
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching person", "DATABASE_ERROR"))
        }
    }
}

pub(crate) async fn update_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Person>, ApiError> {
    let id = parse_id(&id)?;
    let replacement = NewPerson::decode(&body)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON format: {e}"), "INVALID_INPUT"))?;

    match state.people.update(id, replacement).await {
        Ok(person) => Ok(Json(person)),
        Err(DomainError::PersonNotFound(_)) => Err(not_found()),
        Err(DomainError::Decode(e)) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid JSON format: {e}"),
            "INVALID_INPUT",
        )),
        Err(e) => {
            tracing::error!(person_id = id, error = %e, "failed to update person");
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error updating person", "DATABASE_ERROR"))
        }
    }
}

pub(crate) async fn delete_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    match state.people.delete(id).await {
        Ok(true) => Ok(Json(MessageResponse {
            message: "Person deleted successfully".to_string(),
        })),
        Ok(false) => Err(not_found()),
        Err(e) => {
            tracing::error!(person_id = id, error = %e, "failed to delete person");
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error deleting person", "DATABASE_ERROR"))
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid person ID", "INVALID_ID"))
}

fn not_found() -> ApiError {
    error_response(StatusCode::NOT_FOUND, "Person not found", "NOT_FOUND")
}
