use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{dates, AssignedClass, AttendanceEntry, AttendanceMark, Student, StudentStatus};
use uuid::Uuid;

use crate::{
    db::{Database, StudentRow},
    error::AppError,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub name: String,
    pub phone: String,
    pub classes_remaining: Option<i64>,
    pub status: Option<StudentStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub class_type: Option<String>,
    pub expiry_date: Option<String>,
    pub assigned_classes: Option<Vec<AssignedClass>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub classes_remaining: Option<i64>,
    pub status: Option<StudentStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub class_type: Option<String>,
    pub expiry_date: Option<String>,
    pub assigned_classes: Option<Vec<AssignedClass>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewRequest {
    pub num_classes: Option<i64>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let rows = state.db.list_students().await?;
    let mut students = Vec::with_capacity(rows.len());
    for row in rows {
        students.push(to_dto(&state.db, row).await?);
    }
    Ok(Json(students))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let row = state
        .db
        .get_student(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("student not found".to_string()))?;
    Ok(Json(to_dto(&state.db, row).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    let phone = req.phone.trim();
    if phone.is_empty() {
        return Err(AppError::BadRequest("phone is required".to_string()));
    }
    validate_optional_fields(req.classes_remaining, req.price, req.expiry_date.as_deref())?;
    let assigned = req.assigned_classes.unwrap_or_default();
    validate_slots(&assigned)?;

    let row = StudentRow {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        classes_remaining: req.classes_remaining.unwrap_or(0),
        status: req.status.unwrap_or(StudentStatus::New).as_str().to_string(),
        payment_method: req.payment_method,
        notes: req.notes,
        price: req.price,
        class_type: req.class_type,
        expiry_date: req.expiry_date,
        created_at: None,
    };
    state.db.insert_student(&row, &assigned).await?;

    let row = state
        .db
        .get_student(&row.id)
        .await?
        .ok_or_else(|| AppError::Internal("student vanished after insert".to_string()))?;
    Ok((StatusCode::CREATED, Json(to_dto(&state.db, row).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    let mut row = state
        .db
        .get_student(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("student not found".to_string()))?;

    validate_optional_fields(req.classes_remaining, req.price, req.expiry_date.as_deref())?;
    if let Some(slots) = &req.assigned_classes {
        validate_slots(slots)?;
    }

    if let Some(name) = req.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        row.name = name;
    }
    if let Some(phone) = req.phone {
        let phone = phone.trim().to_string();
        if phone.is_empty() {
            return Err(AppError::BadRequest("phone must not be empty".to_string()));
        }
        row.phone = phone;
    }
    if let Some(n) = req.classes_remaining {
        row.classes_remaining = n;
    }
    if let Some(status) = req.status {
        row.status = status.as_str().to_string();
    }
    if req.payment_method.is_some() {
        row.payment_method = req.payment_method;
    }
    if req.notes.is_some() {
        row.notes = req.notes;
    }
    if req.price.is_some() {
        row.price = req.price;
    }
    if req.class_type.is_some() {
        row.class_type = req.class_type;
    }
    if req.expiry_date.is_some() {
        row.expiry_date = req.expiry_date;
    }

    state
        .db
        .update_student(&row, req.assigned_classes.as_deref())
        .await?;
    Ok(Json(to_dto(&state.db, row).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_student(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn renew(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenewRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let num_classes = req.num_classes.unwrap_or(4);
    if num_classes <= 0 {
        return Err(AppError::BadRequest(
            "numClasses must be greater than 0".to_string(),
        ));
    }

    let row = state.db.renew_student(&id, num_classes).await?;
    let student = to_dto(&state.db, row).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "student": student,
    })))
}

fn validate_optional_fields(
    classes_remaining: Option<i64>,
    price: Option<f64>,
    expiry_date: Option<&str>,
) -> Result<(), AppError> {
    if let Some(n) = classes_remaining {
        if n < 0 {
            return Err(AppError::BadRequest(
                "classesRemaining must not be negative".to_string(),
            ));
        }
    }
    if let Some(p) = price {
        if p < 0.0 {
            return Err(AppError::BadRequest("price must not be negative".to_string()));
        }
    }
    if let Some(d) = expiry_date {
        if dates::parse_date(d).is_none() {
            return Err(AppError::BadRequest("invalid expiryDate".to_string()));
        }
    }
    Ok(())
}

fn validate_slots(slots: &[AssignedClass]) -> Result<(), AppError> {
    for slot in slots {
        if dates::parse_date(&slot.date).is_none() {
            return Err(AppError::BadRequest(format!(
                "invalid assigned class date '{}'",
                slot.date
            )));
        }
        if dates::parse_time(&slot.start_time).is_none()
            || dates::parse_time(&slot.end_time).is_none()
        {
            return Err(AppError::BadRequest(
                "assigned class times must be HH:MM".to_string(),
            ));
        }
    }
    Ok(())
}

async fn to_dto(db: &Database, row: StudentRow) -> Result<Student, AppError> {
    let assigned = db.assigned_classes_for(&row.id).await?;
    let history = db.attendance_history_for(&row.id).await?;

    let status = StudentStatus::parse(&row.status)
        .ok_or_else(|| AppError::Internal(format!("corrupt student status '{}'", row.status)))?;

    Ok(Student {
        id: row.id,
        name: row.name,
        phone: row.phone,
        classes_remaining: row.classes_remaining,
        status,
        payment_method: row.payment_method,
        notes: row.notes,
        price: row.price,
        class_type: row.class_type,
        expiry_date: row.expiry_date,
        assigned_classes: assigned
            .into_iter()
            .map(|s| AssignedClass {
                date: s.date,
                start_time: s.start_time,
                end_time: s.end_time,
            })
            .collect(),
        attendance_history: history
            .into_iter()
            .filter_map(|r| {
                AttendanceMark::parse(&r.status).map(|status| AttendanceEntry {
                    session_id: r.session_id,
                    date: r.date,
                    status,
                })
            })
            .collect(),
    })
}
