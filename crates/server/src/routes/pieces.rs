use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{dates, CeramicPiece, PieceStatus};
use uuid::Uuid;

use crate::{
    db::{Database, PieceRow},
    error::AppError,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiecePayload {
    pub student_id: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub status: Option<PieceStatus>,
    pub created_on: Option<String>,
    pub concluded_on: Option<String>,
    pub glaze_type: Option<String>,
    pub delivery_date: Option<String>,
    pub notes: Option<String>,
    pub extra_commentary: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CeramicPiece>>, AppError> {
    let rows = state.db.list_pieces().await?;
    let pieces = rows.into_iter().map(to_dto).collect::<Result<_, _>>()?;
    Ok(Json(pieces))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CeramicPiece>, AppError> {
    let row = state
        .db
        .get_piece(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("piece not found".to_string()))?;
    Ok(Json(to_dto(row)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<PiecePayload>,
) -> Result<(StatusCode, Json<CeramicPiece>), AppError> {
    for d in [req.created_on.as_deref(), req.delivery_date.as_deref()]
        .into_iter()
        .flatten()
    {
        if dates::parse_date(d).is_none() {
            return Err(AppError::BadRequest(format!("invalid date '{}'", d)));
        }
    }

    let status = req.status.unwrap_or(PieceStatus::Creada);
    let owner = resolve_owner(&state.db, req.student_id.as_deref(), req.owner.as_deref()).await?;

    let concluded_on = if status == PieceStatus::Concluida {
        Some(req.concluded_on.unwrap_or_else(today))
    } else {
        req.concluded_on
    };

    let row = PieceRow {
        id: Uuid::new_v4().to_string(),
        student_id: req.student_id,
        owner,
        description: req.description,
        status: status.as_column().to_string(),
        created_on: req.created_on.unwrap_or_else(today),
        concluded_on,
        glaze_type: req.glaze_type,
        delivery_date: req.delivery_date,
        notes: req.notes,
        extra_commentary: req.extra_commentary,
    };
    state.db.insert_piece(&row).await?;
    Ok((StatusCode::CREATED, Json(to_dto(row)?)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PiecePayload>,
) -> Result<Json<CeramicPiece>, AppError> {
    let mut row = state
        .db
        .get_piece(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("piece not found".to_string()))?;

    if let Some(d) = req.delivery_date.as_deref() {
        if dates::parse_date(d).is_none() {
            return Err(AppError::BadRequest(format!("invalid date '{}'", d)));
        }
    }

    let was_concluded = row.status == PieceStatus::Concluida.as_column();

    if req.student_id.is_some() || req.owner.is_some() {
        row.owner = resolve_owner(
            &state.db,
            req.student_id.as_deref().or(row.student_id.as_deref()),
            req.owner.as_deref().or(Some(row.owner.as_str())),
        )
        .await?;
        if req.student_id.is_some() {
            row.student_id = req.student_id;
        }
    }
    if req.description.is_some() {
        row.description = req.description;
    }
    if let Some(status) = req.status {
        row.status = status.as_column().to_string();
        // Reaching the end of the pipeline stamps the conclusion date once.
        if status == PieceStatus::Concluida && !was_concluded && req.concluded_on.is_none() {
            row.concluded_on = Some(today());
        }
    }
    if req.concluded_on.is_some() {
        row.concluded_on = req.concluded_on;
    }
    if req.glaze_type.is_some() {
        row.glaze_type = req.glaze_type;
    }
    if req.delivery_date.is_some() {
        row.delivery_date = req.delivery_date;
    }
    if req.notes.is_some() {
        row.notes = req.notes;
    }
    if req.extra_commentary.is_some() {
        row.extra_commentary = req.extra_commentary;
    }

    state.db.update_piece(&row).await?;
    Ok(Json(to_dto(row)?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_piece(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// The cached owner name follows the student record when a back-reference is
/// set; free-text owner is only for pieces without one.
async fn resolve_owner(
    db: &Database,
    student_id: Option<&str>,
    owner: Option<&str>,
) -> Result<String, AppError> {
    if let Some(id) = student_id {
        let student = db
            .get_student(id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("unknown student '{}'", id)))?;
        return Ok(student.name);
    }
    match owner.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(AppError::BadRequest(
            "owner is required when no student is linked".to_string(),
        )),
    }
}

fn today() -> String {
    Utc::now().date_naive().format(dates::DATE_FORMAT).to_string()
}

fn to_dto(row: PieceRow) -> Result<CeramicPiece, AppError> {
    let status = PieceStatus::from_column(&row.status)
        .ok_or_else(|| AppError::Internal(format!("corrupt piece status '{}'", row.status)))?;
    Ok(CeramicPiece {
        id: row.id,
        student_id: row.student_id,
        owner: row.owner,
        description: row.description,
        status,
        created_on: row.created_on,
        concluded_on: row.concluded_on,
        glaze_type: row.glaze_type,
        delivery_date: row.delivery_date,
        notes: row.notes,
        extra_commentary: row.extra_commentary,
    })
}
