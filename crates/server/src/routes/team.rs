use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{dates, TaskPriority, TeamMember, TeamTask};
use uuid::Uuid;

use crate::{
    db::{TeamMemberRow, TeamTaskRow},
    error::AppError,
    state::AppState,
};

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayload {
    pub name: String,
    pub role: String,
    pub responsibilities: Option<String>,
    pub active: Option<bool>,
    pub color: Option<String>,
}

pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<TeamMember>>, AppError> {
    let members = state
        .db
        .list_team_members()
        .await?
        .into_iter()
        .map(member_dto)
        .collect();
    Ok(Json(members))
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(req): Json<MemberPayload>,
) -> Result<(StatusCode, Json<TeamMember>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let row = TeamMemberRow {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        role: req.role,
        responsibilities: req.responsibilities.unwrap_or_default(),
        active: req.active.unwrap_or(true),
        color: req.color.unwrap_or_else(|| "#6366f1".to_string()),
    };
    state.db.insert_team_member(&row).await?;
    Ok((StatusCode::CREATED, Json(member_dto(row))))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MemberPayload>,
) -> Result<Json<TeamMember>, AppError> {
    let existing = state
        .db
        .get_team_member(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("team member not found".to_string()))?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let row = TeamMemberRow {
        id,
        name: name.to_string(),
        role: req.role,
        responsibilities: req.responsibilities.unwrap_or(existing.responsibilities),
        active: req.active.unwrap_or(existing.active),
        color: req.color.unwrap_or(existing.color),
    };
    state.db.update_team_member(&row).await?;
    Ok(Json(member_dto(row)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_team_member(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: String,
    pub start_date: String,
    pub due_date: String,
    pub done: Option<bool>,
    pub done_on: Option<String>,
    pub progress: Option<i64>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TeamTask>>, AppError> {
    let tasks = state
        .db
        .list_team_tasks()
        .await?
        .into_iter()
        .map(task_dto)
        .collect::<Result<_, _>>()?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<TaskPayload>,
) -> Result<(StatusCode, Json<TeamTask>), AppError> {
    validate_task(&state, &req).await?;

    let done = req.done.unwrap_or(false);
    let row = TeamTaskRow {
        id: Uuid::new_v4().to_string(),
        title: req.title,
        description: req.description.unwrap_or_default(),
        assignee_id: req.assignee_id,
        start_date: req.start_date,
        due_date: req.due_date,
        done,
        done_on: req.done_on.or_else(|| done.then(today)),
        progress: if done { 100 } else { req.progress.unwrap_or(0) },
        priority: req.priority.unwrap_or(TaskPriority::Media).as_str().to_string(),
        category: req.category.unwrap_or_default(),
        created_at: String::new(),
        updated_at: String::new(),
    };
    state.db.insert_team_task(&row).await?;

    let row = state
        .db
        .get_team_task(&row.id)
        .await?
        .ok_or_else(|| AppError::Internal("task vanished after insert".to_string()))?;
    Ok((StatusCode::CREATED, Json(task_dto(row)?)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TaskPayload>,
) -> Result<Json<TeamTask>, AppError> {
    let existing = state
        .db
        .get_team_task(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("task not found".to_string()))?;

    validate_task(&state, &req).await?;

    let done = req.done.unwrap_or(existing.done);
    // Completing a task stamps the completion date once; reopening clears it.
    let done_on = match (done, existing.done) {
        (true, false) => req.done_on.or_else(|| Some(today())),
        (true, true) => req.done_on.or(existing.done_on),
        (false, _) => None,
    };

    let row = TeamTaskRow {
        id,
        title: req.title,
        description: req.description.unwrap_or(existing.description),
        assignee_id: req.assignee_id,
        start_date: req.start_date,
        due_date: req.due_date,
        done,
        done_on,
        progress: if done { 100 } else { req.progress.unwrap_or(existing.progress) },
        priority: req
            .priority
            .map(|p| p.as_str().to_string())
            .unwrap_or(existing.priority),
        category: req.category.unwrap_or(existing.category),
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };
    state.db.update_team_task(&row).await?;

    let row = state
        .db
        .get_team_task(&row.id)
        .await?
        .ok_or_else(|| AppError::NotFound("task not found".to_string()))?;
    Ok(Json(task_dto(row)?))
}

pub async fn remove_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_team_task(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

async fn validate_task(state: &AppState, req: &TaskPayload) -> Result<(), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }
    for d in [&req.start_date, &req.due_date] {
        if dates::parse_date(d).is_none() {
            return Err(AppError::BadRequest(format!("invalid date '{}'", d)));
        }
    }
    if let Some(p) = req.progress {
        if !(0..=100).contains(&p) {
            return Err(AppError::BadRequest(
                "progress must be between 0 and 100".to_string(),
            ));
        }
    }
    if state.db.get_team_member(&req.assignee_id).await?.is_none() {
        return Err(AppError::BadRequest(format!(
            "unknown team member '{}'",
            req.assignee_id
        )));
    }
    Ok(())
}

fn today() -> String {
    Utc::now().date_naive().format(dates::DATE_FORMAT).to_string()
}

fn member_dto(row: TeamMemberRow) -> TeamMember {
    TeamMember {
        id: row.id,
        name: row.name,
        role: row.role,
        responsibilities: row.responsibilities,
        active: row.active,
        color: row.color,
    }
}

fn task_dto(row: TeamTaskRow) -> Result<TeamTask, AppError> {
    let priority = TaskPriority::parse(&row.priority)
        .ok_or_else(|| AppError::Internal(format!("corrupt task priority '{}'", row.priority)))?;
    Ok(TeamTask {
        id: row.id,
        title: row.title,
        description: row.description,
        assignee_id: row.assignee_id,
        start_date: row.start_date,
        due_date: row.due_date,
        done: row.done,
        done_on: row.done_on,
        progress: row.progress,
        priority,
        category: row.category,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
