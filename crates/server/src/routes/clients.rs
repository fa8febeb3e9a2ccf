use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::Client;
use uuid::Uuid;

use crate::{db::ClientRow, error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Client>>, AppError> {
    let clients = state
        .db
        .list_clients()
        .await?
        .into_iter()
        .map(to_dto)
        .collect();
    Ok(Json(clients))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, AppError> {
    let row = state
        .db
        .get_client(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("client not found".to_string()))?;
    Ok(Json(to_dto(row)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ClientPayload>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let id = Uuid::new_v4().to_string();
    state
        .db
        .insert_client(&id, name, req.phone.as_deref(), req.email.as_deref())
        .await?;

    let row = state
        .db
        .get_client(&id)
        .await?
        .ok_or_else(|| AppError::Internal("client vanished after insert".to_string()))?;
    Ok((StatusCode::CREATED, Json(to_dto(row))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ClientPayload>,
) -> Result<Json<Client>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    state
        .db
        .update_client(&id, name, req.phone.as_deref(), req.email.as_deref())
        .await?;

    let row = state
        .db
        .get_client(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("client not found".to_string()))?;
    Ok(Json(to_dto(row)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_client(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub(super) fn to_dto(row: ClientRow) -> Client {
    Client {
        id: row.id,
        name: row.name,
        phone: row.phone,
        email: row.email,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
