use serde::{Deserialize, Serialize};

// ============================================================================
// Students
// ============================================================================

/// Lifecycle of a student's class bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Regular,
    NeedsRenewal,
    New,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Regular => "regular",
            StudentStatus::NeedsRenewal => "needs_renewal",
            StudentStatus::New => "new",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(StudentStatus::Regular),
            "needs_renewal" => Some(StudentStatus::NeedsRenewal),
            "new" => Some(StudentStatus::New),
            _ => None,
        }
    }
}

/// Per-student attendance state within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceMark {
    None,
    Present,
    Absent,
}

impl AttendanceMark {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceMark::None => "none",
            AttendanceMark::Present => "present",
            AttendanceMark::Absent => "absent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(AttendanceMark::None),
            "present" => Some(AttendanceMark::Present),
            "absent" => Some(AttendanceMark::Absent),
            _ => None,
        }
    }
}

/// A weekly class slot assigned to a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedClass {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

/// One row of a student's durable attendance history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub session_id: String,
    pub date: String,
    /// Only ever `present` or `absent`; a mark reverted to `none` deletes the entry.
    pub status: AttendanceMark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub classes_remaining: i64,
    pub status: StudentStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub class_type: Option<String>,
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub assigned_classes: Vec<AssignedClass>,
    #[serde(default)]
    pub attendance_history: Vec<AttendanceEntry>,
}

// ============================================================================
// Class sessions
// ============================================================================

/// A scheduled class session as the client sees it. Roster order is
/// insertion order; `attendance_confirmed`/`attendance_absent` partition the
/// marked names, everything else in `students` carries mark `none`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub students: Vec<String>,
    pub attendance_confirmed: Vec<String>,
    pub attendance_absent: Vec<String>,
}

// ============================================================================
// Ceramic pieces
// ============================================================================

/// Production pipeline of a ceramic piece. Wire names keep the studio's
/// Spanish vocabulary, spaces included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceStatus {
    #[serde(rename = "creada")]
    Creada,
    #[serde(rename = "en secado")]
    EnSecado,
    #[serde(rename = "bizcochada")]
    Bizcochada,
    #[serde(rename = "esmaltada")]
    Esmaltada,
    #[serde(rename = "cocida final")]
    CocidaFinal,
    #[serde(rename = "concluida")]
    Concluida,
}

impl PieceStatus {
    /// Storage form: underscores instead of spaces.
    pub fn as_column(&self) -> &'static str {
        match self {
            PieceStatus::Creada => "creada",
            PieceStatus::EnSecado => "en_secado",
            PieceStatus::Bizcochada => "bizcochada",
            PieceStatus::Esmaltada => "esmaltada",
            PieceStatus::CocidaFinal => "cocida_final",
            PieceStatus::Concluida => "concluida",
        }
    }

    pub fn from_column(s: &str) -> Option<Self> {
        match s {
            "creada" => Some(PieceStatus::Creada),
            "en_secado" => Some(PieceStatus::EnSecado),
            "bizcochada" => Some(PieceStatus::Bizcochada),
            "esmaltada" => Some(PieceStatus::Esmaltada),
            "cocida_final" => Some(PieceStatus::CocidaFinal),
            "concluida" => Some(PieceStatus::Concluida),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeramicPiece {
    pub id: String,
    /// Back-reference to the owning student, when the piece belongs to one.
    pub student_id: Option<String>,
    /// Display name, cached from the student record when `student_id` is set.
    pub owner: String,
    pub description: Option<String>,
    pub status: PieceStatus,
    pub created_on: String,
    pub concluded_on: Option<String>,
    pub glaze_type: Option<String>,
    pub delivery_date: Option<String>,
    pub notes: Option<String>,
    pub extra_commentary: Option<String>,
}

// ============================================================================
// Clients & gift cards
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftCardKind {
    Modelado,
    Torno,
}

impl GiftCardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftCardKind::Modelado => "modelado",
            GiftCardKind::Torno => "torno",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "modelado" => Some(GiftCardKind::Modelado),
            "torno" => Some(GiftCardKind::Torno),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCard {
    pub id: String,
    pub buyer_id: String,
    pub recipient_id: String,
    pub buyer: Option<Client>,
    pub recipient: Option<Client>,
    pub num_classes: i64,
    #[serde(rename = "type")]
    pub kind: GiftCardKind,
    pub scheduled_date: Option<String>,
    pub extra_commentary: Option<String>,
    pub created_at: String,
}

// ============================================================================
// Team tasks
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub responsibilities: String,
    pub active: bool,
    /// Hex color used to identify the member in the Gantt view.
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Baja,
    Media,
    Alta,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Baja => "baja",
            TaskPriority::Media => "media",
            TaskPriority::Alta => "alta",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "baja" => Some(TaskPriority::Baja),
            "media" => Some(TaskPriority::Media),
            "alta" => Some(TaskPriority::Alta),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub assignee_id: String,
    pub start_date: String,
    pub due_date: String,
    pub done: bool,
    pub done_on: Option<String>,
    /// 0..=100
    pub progress: i64,
    pub priority: TaskPriority,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_mark_wire_names() {
        assert_eq!(serde_json::to_string(&AttendanceMark::Present).unwrap(), "\"present\"");
        assert_eq!(
            serde_json::from_str::<AttendanceMark>("\"none\"").unwrap(),
            AttendanceMark::None
        );
        assert_eq!(AttendanceMark::parse("absent"), Some(AttendanceMark::Absent));
        assert_eq!(AttendanceMark::parse("late"), None);
    }

    #[test]
    fn student_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&StudentStatus::NeedsRenewal).unwrap(),
            "\"needs_renewal\""
        );
        assert_eq!(StudentStatus::parse("regular"), Some(StudentStatus::Regular));
    }

    #[test]
    fn piece_status_wire_uses_spaces_column_uses_underscores() {
        assert_eq!(serde_json::to_string(&PieceStatus::EnSecado).unwrap(), "\"en secado\"");
        assert_eq!(
            serde_json::from_str::<PieceStatus>("\"cocida final\"").unwrap(),
            PieceStatus::CocidaFinal
        );
        assert_eq!(PieceStatus::CocidaFinal.as_column(), "cocida_final");
        for status in [
            PieceStatus::Creada,
            PieceStatus::EnSecado,
            PieceStatus::Bizcochada,
            PieceStatus::Esmaltada,
            PieceStatus::CocidaFinal,
            PieceStatus::Concluida,
        ] {
            assert_eq!(PieceStatus::from_column(status.as_column()), Some(status));
        }
    }

    #[test]
    fn gift_card_kind_serializes_as_type_field() {
        let card = GiftCard {
            id: "g1".into(),
            buyer_id: "c1".into(),
            recipient_id: "c2".into(),
            buyer: None,
            recipient: None,
            num_classes: 4,
            kind: GiftCardKind::Torno,
            scheduled_date: None,
            extra_commentary: None,
            created_at: "2025-01-01 10:00:00".into(),
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["type"], "torno");
        assert_eq!(json["numClasses"], 4);
    }
}
