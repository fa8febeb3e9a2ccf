use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub classes_remaining: i64,
    pub status: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub class_type: Option<String>,
    pub expiry_date: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AssignedClassRow {
    pub id: String,
    pub student_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionStudentRow {
    pub id: String,
    pub session_id: String,
    pub student_id: String,
    pub student_name: String,
    pub attendance_status: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRecordRow {
    pub id: String,
    pub student_id: String,
    pub session_id: String,
    pub date: String,
    pub status: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct PieceRow {
    pub id: String,
    pub student_id: Option<String>,
    pub owner: String,
    pub description: Option<String>,
    pub status: String,
    pub created_on: String,
    pub concluded_on: Option<String>,
    pub glaze_type: Option<String>,
    pub delivery_date: Option<String>,
    pub notes: Option<String>,
    pub extra_commentary: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct GiftCardRow {
    pub id: String,
    pub buyer_id: String,
    pub recipient_id: String,
    pub num_classes: i64,
    pub kind: String,
    pub scheduled_date: Option<String>,
    pub extra_commentary: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberRow {
    pub id: String,
    pub name: String,
    pub role: String,
    pub responsibilities: String,
    pub active: bool,
    pub color: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct TeamTaskRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub assignee_id: String,
    pub start_date: String,
    pub due_date: String,
    pub done: bool,
    pub done_on: Option<String>,
    pub progress: i64,
    pub priority: String,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}
