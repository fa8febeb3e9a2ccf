use shared::AssignedClass;
use uuid::Uuid;

use super::{AssignedClassRow, AttendanceRecordRow, Database, StudentRow};
use crate::error::AppError;

impl Database {
    pub async fn list_students(&self) -> Result<Vec<StudentRow>, AppError> {
        let students = sqlx::query_as::<_, StudentRow>(
            "SELECT id, name, phone, classes_remaining, status, payment_method, notes, price, class_type, expiry_date, created_at \
             FROM students ORDER BY created_at DESC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(students)
    }

    pub async fn get_student(&self, id: &str) -> Result<Option<StudentRow>, AppError> {
        let student = sqlx::query_as::<_, StudentRow>(
            "SELECT id, name, phone, classes_remaining, status, payment_method, notes, price, class_type, expiry_date, created_at \
             FROM students WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(student)
    }

    pub async fn find_student_by_name(&self, name: &str) -> Result<Option<StudentRow>, AppError> {
        let student = sqlx::query_as::<_, StudentRow>(
            "SELECT id, name, phone, classes_remaining, status, payment_method, notes, price, class_type, expiry_date, created_at \
             FROM students WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool())
        .await?;
        Ok(student)
    }

    pub async fn insert_student(
        &self,
        student: &StudentRow,
        assigned: &[AssignedClass],
    ) -> Result<(), AppError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO students (id, name, phone, classes_remaining, status, payment_method, notes, price, class_type, expiry_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&student.id)
        .bind(&student.name)
        .bind(&student.phone)
        .bind(student.classes_remaining)
        .bind(&student.status)
        .bind(&student.payment_method)
        .bind(&student.notes)
        .bind(student.price)
        .bind(&student.class_type)
        .bind(&student.expiry_date)
        .execute(&mut *tx)
        .await?;

        for slot in assigned {
            sqlx::query(
                "INSERT INTO assigned_classes (id, student_id, date, start_time, end_time) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&student.id)
            .bind(&slot.date)
            .bind(&slot.start_time)
            .bind(&slot.end_time)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Full update of the mutable student fields. When `assigned` is `Some`
    /// the slot list is replaced wholesale.
    pub async fn update_student(
        &self,
        student: &StudentRow,
        assigned: Option<&[AssignedClass]>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "UPDATE students SET name = ?, phone = ?, classes_remaining = ?, status = ?, payment_method = ?, notes = ?, price = ?, class_type = ?, expiry_date = ? \
             WHERE id = ?",
        )
        .bind(&student.name)
        .bind(&student.phone)
        .bind(student.classes_remaining)
        .bind(&student.status)
        .bind(&student.payment_method)
        .bind(&student.notes)
        .bind(student.price)
        .bind(&student.class_type)
        .bind(&student.expiry_date)
        .bind(&student.id)
        .execute(&mut *tx)
        .await?;

        if let Some(slots) = assigned {
            sqlx::query("DELETE FROM assigned_classes WHERE student_id = ?")
                .bind(&student.id)
                .execute(&mut *tx)
                .await?;

            for slot in slots {
                sqlx::query(
                    "INSERT INTO assigned_classes (id, student_id, date, start_time, end_time) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&student.id)
                .bind(&slot.date)
                .bind(&slot.start_time)
                .bind(&slot.end_time)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_student(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool().begin().await?;

        let deleted = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("student not found".to_string()));
        }

        sqlx::query("DELETE FROM assigned_classes WHERE student_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM session_students WHERE student_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM attendance_records WHERE student_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        // Pieces outlive their student; keep them under the cached owner name.
        sqlx::query("UPDATE pieces SET student_id = NULL WHERE student_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Add classes to a student's bundle and clear the renewal flag.
    /// Unconditional: no check that the student actually needed renewal.
    pub async fn renew_student(&self, id: &str, num_classes: i64) -> Result<StudentRow, AppError> {
        let updated = sqlx::query(
            "UPDATE students SET classes_remaining = classes_remaining + ?, status = 'regular' WHERE id = ?",
        )
        .bind(num_classes)
        .bind(id)
        .execute(self.pool())
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("student not found".to_string()));
        }

        self.get_student(id)
            .await?
            .ok_or_else(|| AppError::NotFound("student not found".to_string()))
    }

    pub async fn assigned_classes_for(
        &self,
        student_id: &str,
    ) -> Result<Vec<AssignedClassRow>, AppError> {
        let slots = sqlx::query_as::<_, AssignedClassRow>(
            "SELECT id, student_id, date, start_time, end_time FROM assigned_classes \
             WHERE student_id = ? ORDER BY date ASC",
        )
        .bind(student_id)
        .fetch_all(self.pool())
        .await?;
        Ok(slots)
    }

    pub async fn attendance_history_for(
        &self,
        student_id: &str,
    ) -> Result<Vec<AttendanceRecordRow>, AppError> {
        let records = sqlx::query_as::<_, AttendanceRecordRow>(
            "SELECT id, student_id, session_id, date, status FROM attendance_records \
             WHERE student_id = ? ORDER BY date DESC",
        )
        .bind(student_id)
        .fetch_all(self.pool())
        .await?;
        Ok(records)
    }
}
