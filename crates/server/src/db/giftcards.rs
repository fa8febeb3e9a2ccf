use super::{Database, GiftCardRow};
use crate::error::AppError;

impl Database {
    pub async fn list_gift_cards(&self) -> Result<Vec<GiftCardRow>, AppError> {
        let cards = sqlx::query_as::<_, GiftCardRow>(
            "SELECT id, buyer_id, recipient_id, num_classes, kind, scheduled_date, extra_commentary, created_at \
             FROM gift_cards ORDER BY created_at DESC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(cards)
    }

    pub async fn get_gift_card(&self, id: &str) -> Result<Option<GiftCardRow>, AppError> {
        let card = sqlx::query_as::<_, GiftCardRow>(
            "SELECT id, buyer_id, recipient_id, num_classes, kind, scheduled_date, extra_commentary, created_at \
             FROM gift_cards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(card)
    }

    pub async fn insert_gift_card(&self, card: &GiftCardRow) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO gift_cards (id, buyer_id, recipient_id, num_classes, kind, scheduled_date, extra_commentary) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&card.id)
        .bind(&card.buyer_id)
        .bind(&card.recipient_id)
        .bind(card.num_classes)
        .bind(&card.kind)
        .bind(&card.scheduled_date)
        .bind(&card.extra_commentary)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn update_gift_card(&self, card: &GiftCardRow) -> Result<(), AppError> {
        let updated = sqlx::query(
            "UPDATE gift_cards SET buyer_id = ?, recipient_id = ?, num_classes = ?, kind = ?, scheduled_date = ?, extra_commentary = ? \
             WHERE id = ?",
        )
        .bind(&card.buyer_id)
        .bind(&card.recipient_id)
        .bind(card.num_classes)
        .bind(&card.kind)
        .bind(&card.scheduled_date)
        .bind(&card.extra_commentary)
        .bind(&card.id)
        .execute(self.pool())
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("gift card not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete_gift_card(&self, id: &str) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM gift_cards WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("gift card not found".to_string()));
        }
        Ok(())
    }
}
