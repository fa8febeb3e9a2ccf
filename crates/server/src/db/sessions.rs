use std::collections::HashSet;

use shared::{AttendanceMark, SessionView, StudentStatus};
use uuid::Uuid;

use super::{Database, SessionRow, SessionStudentRow};
use crate::attendance::{self, Ledger, RecordEffect};
use crate::error::AppError;

impl Database {
    pub async fn list_sessions(&self) -> Result<Vec<SessionView>, AppError> {
        let sessions = sqlx::query_as::<_, SessionRow>(
            "SELECT id, date, start_time, end_time FROM class_sessions ORDER BY date ASC, start_time ASC",
        )
        .fetch_all(self.pool())
        .await?;

        let mut views = Vec::with_capacity(sessions.len());
        for session in sessions {
            let roster = self.roster_for(&session.id).await?;
            views.push(build_view(&session, &roster));
        }
        Ok(views)
    }

    pub async fn session_view(&self, id: &str) -> Result<SessionView, AppError> {
        let session = sqlx::query_as::<_, SessionRow>(
            "SELECT id, date, start_time, end_time FROM class_sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| AppError::NotFound("session not found".to_string()))?;

        let roster = self.roster_for(id).await?;
        Ok(build_view(&session, &roster))
    }

    async fn roster_for(&self, session_id: &str) -> Result<Vec<SessionStudentRow>, AppError> {
        let roster = sqlx::query_as::<_, SessionStudentRow>(
            "SELECT id, session_id, student_id, student_name, attendance_status \
             FROM session_students WHERE session_id = ? ORDER BY rowid ASC",
        )
        .bind(session_id)
        .fetch_all(self.pool())
        .await?;
        Ok(roster)
    }

    /// Create a session and enroll the named students with mark `none`.
    /// Names that match no student record are skipped.
    pub async fn create_session(
        &self,
        date: &str,
        start_time: &str,
        end_time: &str,
        student_names: &[String],
    ) -> Result<SessionView, AppError> {
        let session_id = Uuid::new_v4().to_string();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO class_sessions (id, date, start_time, end_time) VALUES (?, ?, ?, ?)",
        )
        .bind(&session_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .execute(&mut *tx)
        .await?;

        for name in student_names {
            let student: Option<(String,)> =
                sqlx::query_as("SELECT id FROM students WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&mut *tx)
                    .await?;
            let Some((student_id,)) = student else {
                tracing::warn!("skipping unknown student '{}' on session create", name);
                continue;
            };

            sqlx::query(
                "INSERT INTO session_students (id, session_id, student_id, student_name, attendance_status) \
                 VALUES (?, ?, ?, ?, 'none')",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&session_id)
            .bind(&student_id)
            .bind(name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.session_view(&session_id).await
    }

    /// Update schedule fields and, when a student list is supplied, diff the
    /// roster against it. Retained names keep their rows and marks. New
    /// names join with mark `none`. Removed names leave, refunding the
    /// ledger and dropping the attendance record if they were marked
    /// present, so a removed student's balance never drifts.
    pub async fn update_session(
        &self,
        id: &str,
        date: Option<&str>,
        start_time: Option<&str>,
        end_time: Option<&str>,
        student_names: Option<&[String]>,
    ) -> Result<SessionView, AppError> {
        let mut tx = self.pool().begin().await?;

        let session = sqlx::query_as::<_, SessionRow>(
            "SELECT id, date, start_time, end_time FROM class_sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("session not found".to_string()))?;

        sqlx::query("UPDATE class_sessions SET date = ?, start_time = ?, end_time = ? WHERE id = ?")
            .bind(date.unwrap_or(session.date.as_str()))
            .bind(start_time.unwrap_or(session.start_time.as_str()))
            .bind(end_time.unwrap_or(session.end_time.as_str()))
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(names) = student_names {
            let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();

            let existing = sqlx::query_as::<_, SessionStudentRow>(
                "SELECT id, session_id, student_id, student_name, attendance_status \
                 FROM session_students WHERE session_id = ? ORDER BY rowid ASC",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

            for entry in &existing {
                if wanted.contains(entry.student_name.as_str()) {
                    continue;
                }
                // Removed from the roster: undo a present-mark's ledger
                // delta before the row disappears.
                if entry.attendance_status == AttendanceMark::Present.as_str() {
                    sqlx::query(
                        "UPDATE students SET classes_remaining = classes_remaining + 1 WHERE id = ?",
                    )
                    .bind(&entry.student_id)
                    .execute(&mut *tx)
                    .await?;
                }
                sqlx::query(
                    "DELETE FROM attendance_records WHERE student_id = ? AND session_id = ?",
                )
                .bind(&entry.student_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
                sqlx::query("DELETE FROM session_students WHERE id = ?")
                    .bind(&entry.id)
                    .execute(&mut *tx)
                    .await?;
            }

            let current: HashSet<&str> =
                existing.iter().map(|e| e.student_name.as_str()).collect();
            for name in names {
                if current.contains(name.as_str()) {
                    continue;
                }
                let student: Option<(String,)> =
                    sqlx::query_as("SELECT id FROM students WHERE name = ?")
                        .bind(name)
                        .fetch_optional(&mut *tx)
                        .await?;
                let Some((student_id,)) = student else {
                    tracing::warn!("skipping unknown student '{}' on roster edit", name);
                    continue;
                };

                sqlx::query(
                    "INSERT INTO session_students (id, session_id, student_id, student_name, attendance_status) \
                     VALUES (?, ?, ?, ?, 'none')",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(id)
                .bind(&student_id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        self.session_view(id).await
    }

    /// Delete a session as if it never happened: refund every present-mark,
    /// then cascade the roster and attendance records.
    pub async fn delete_session(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool().begin().await?;

        let deleted = sqlx::query("DELETE FROM class_sessions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("session not found".to_string()));
        }

        sqlx::query(
            "UPDATE students SET classes_remaining = classes_remaining + 1 \
             WHERE id IN (SELECT student_id FROM session_students WHERE session_id = ? AND attendance_status = 'present')",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM attendance_records WHERE session_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM session_students WHERE session_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Apply an attendance mark for one enrolled student: roster mark,
    /// ledger delta, and attendance record move together in one transaction
    /// or not at all.
    pub async fn update_attendance(
        &self,
        session_id: &str,
        student_name: &str,
        next: AttendanceMark,
    ) -> Result<SessionView, AppError> {
        let mut tx = self.pool().begin().await?;

        let session = sqlx::query_as::<_, SessionRow>(
            "SELECT id, date, start_time, end_time FROM class_sessions WHERE id = ?",
        )
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("session not found".to_string()))?;

        let entry = sqlx::query_as::<_, SessionStudentRow>(
            "SELECT id, session_id, student_id, student_name, attendance_status \
             FROM session_students WHERE session_id = ? AND student_name = ?",
        )
        .bind(session_id)
        .bind(student_name)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotEnrolled {
            session: session_id.to_string(),
            student: student_name.to_string(),
        })?;

        let prev = AttendanceMark::parse(&entry.attendance_status).ok_or_else(|| {
            AppError::Internal(format!(
                "corrupt attendance mark '{}'",
                entry.attendance_status
            ))
        })?;

        let (classes_remaining, status): (i64, String) =
            sqlx::query_as("SELECT classes_remaining, status FROM students WHERE id = ?")
                .bind(&entry.student_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("student not found".to_string()))?;
        let status = StudentStatus::parse(&status)
            .ok_or_else(|| AppError::Internal(format!("corrupt student status '{}'", status)))?;

        let outcome = attendance::transition(
            prev,
            next,
            Ledger {
                classes_remaining,
                status,
            },
        );

        sqlx::query("UPDATE session_students SET attendance_status = ? WHERE id = ?")
            .bind(outcome.mark.as_str())
            .bind(&entry.id)
            .execute(&mut *tx)
            .await?;

        if outcome.ledger.classes_remaining != classes_remaining || outcome.ledger.status != status
        {
            sqlx::query("UPDATE students SET classes_remaining = ?, status = ? WHERE id = ?")
                .bind(outcome.ledger.classes_remaining)
                .bind(outcome.ledger.status.as_str())
                .bind(&entry.student_id)
                .execute(&mut *tx)
                .await?;
        }

        match outcome.record {
            RecordEffect::Upsert(mark) => {
                sqlx::query(
                    "INSERT INTO attendance_records (id, student_id, session_id, date, status) \
                     VALUES (?, ?, ?, ?, ?) \
                     ON CONFLICT(student_id, session_id) DO UPDATE SET status = excluded.status, date = excluded.date",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&entry.student_id)
                .bind(session_id)
                .bind(&session.date)
                .bind(mark.as_str())
                .execute(&mut *tx)
                .await?;
            }
            RecordEffect::Delete => {
                sqlx::query(
                    "DELETE FROM attendance_records WHERE student_id = ? AND session_id = ?",
                )
                .bind(&entry.student_id)
                .bind(session_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        self.session_view(session_id).await
    }
}

fn build_view(session: &SessionRow, roster: &[SessionStudentRow]) -> SessionView {
    SessionView {
        id: session.id.clone(),
        date: session.date.clone(),
        start_time: session.start_time.clone(),
        end_time: session.end_time.clone(),
        students: roster.iter().map(|e| e.student_name.clone()).collect(),
        attendance_confirmed: roster
            .iter()
            .filter(|e| e.attendance_status == "present")
            .map(|e| e.student_name.clone())
            .collect(),
        attendance_absent: roster
            .iter()
            .filter(|e| e.attendance_status == "absent")
            .map(|e| e.student_name.clone())
            .collect(),
    }
}
