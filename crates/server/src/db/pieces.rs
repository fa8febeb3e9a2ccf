use super::{Database, PieceRow};
use crate::error::AppError;

impl Database {
    pub async fn list_pieces(&self) -> Result<Vec<PieceRow>, AppError> {
        let pieces = sqlx::query_as::<_, PieceRow>(
            "SELECT id, student_id, owner, description, status, created_on, concluded_on, glaze_type, delivery_date, notes, extra_commentary \
             FROM pieces ORDER BY created_on DESC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(pieces)
    }

    pub async fn get_piece(&self, id: &str) -> Result<Option<PieceRow>, AppError> {
        let piece = sqlx::query_as::<_, PieceRow>(
            "SELECT id, student_id, owner, description, status, created_on, concluded_on, glaze_type, delivery_date, notes, extra_commentary \
             FROM pieces WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(piece)
    }

    pub async fn insert_piece(&self, piece: &PieceRow) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO pieces (id, student_id, owner, description, status, created_on, concluded_on, glaze_type, delivery_date, notes, extra_commentary) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&piece.id)
        .bind(&piece.student_id)
        .bind(&piece.owner)
        .bind(&piece.description)
        .bind(&piece.status)
        .bind(&piece.created_on)
        .bind(&piece.concluded_on)
        .bind(&piece.glaze_type)
        .bind(&piece.delivery_date)
        .bind(&piece.notes)
        .bind(&piece.extra_commentary)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn update_piece(&self, piece: &PieceRow) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE pieces SET student_id = ?, owner = ?, description = ?, status = ?, concluded_on = ?, glaze_type = ?, delivery_date = ?, notes = ?, extra_commentary = ? \
             WHERE id = ?",
        )
        .bind(&piece.student_id)
        .bind(&piece.owner)
        .bind(&piece.description)
        .bind(&piece.status)
        .bind(&piece.concluded_on)
        .bind(&piece.glaze_type)
        .bind(&piece.delivery_date)
        .bind(&piece.notes)
        .bind(&piece.extra_commentary)
        .bind(&piece.id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn delete_piece(&self, id: &str) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM pieces WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("piece not found".to_string()));
        }
        Ok(())
    }
}
