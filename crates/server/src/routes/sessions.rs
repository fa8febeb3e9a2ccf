use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{dates, AttendanceMark, SessionView};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub students: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub students: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    pub session_id: String,
    pub student_name: String,
    pub status: AttendanceMark,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SessionView>>, AppError> {
    Ok(Json(state.db.list_sessions().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    validate_schedule(Some(&req.date), Some(&req.start_time), Some(&req.end_time))?;
    let names = dedupe(req.students.unwrap_or_default());

    let view = state
        .db
        .create_session(&req.date, &req.start_time, &req.end_time, &names)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Json<SessionView>, AppError> {
    validate_schedule(
        req.date.as_deref(),
        req.start_time.as_deref(),
        req.end_time.as_deref(),
    )?;
    let names = req.students.map(dedupe);

    let view = state
        .db
        .update_session(
            &id,
            req.date.as_deref(),
            req.start_time.as_deref(),
            req.end_time.as_deref(),
            names.as_deref(),
        )
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/attendance, the single entry point of the attendance
/// subsystem. Whether a repeated click means "toggle back to none" is the
/// client's decision; this endpoint applies exactly the requested mark.
pub async fn update_attendance(
    State(state): State<AppState>,
    Json(req): Json<AttendanceRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = state
        .db
        .update_attendance(&req.session_id, &req.student_name, req.status)
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "session": session,
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_session(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

fn validate_schedule(
    date: Option<&str>,
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> Result<(), AppError> {
    if let Some(d) = date {
        if dates::parse_date(d).is_none() {
            return Err(AppError::BadRequest(format!("invalid date '{}'", d)));
        }
    }
    for t in [start_time, end_time].into_iter().flatten() {
        if dates::parse_time(t).is_none() {
            return Err(AppError::BadRequest(format!("invalid time '{}'", t)));
        }
    }
    Ok(())
}

/// Preserve roster order while dropping duplicate names; the store's
/// (session, name) uniqueness would reject them anyway.
fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && seen.insert(n.clone()))
        .collect()
}
