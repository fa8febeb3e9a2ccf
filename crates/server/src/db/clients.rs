use super::{ClientRow, Database};
use crate::error::AppError;

impl Database {
    pub async fn list_clients(&self) -> Result<Vec<ClientRow>, AppError> {
        let clients = sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, phone, email, created_at, updated_at FROM clients ORDER BY name ASC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(clients)
    }

    pub async fn get_client(&self, id: &str) -> Result<Option<ClientRow>, AppError> {
        let client = sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, phone, email, created_at, updated_at FROM clients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(client)
    }

    pub async fn insert_client(
        &self,
        id: &str,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO clients (id, name, phone, email) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(phone)
            .bind(email)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn update_client(
        &self,
        id: &str,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), AppError> {
        let updated = sqlx::query(
            "UPDATE clients SET name = ?, phone = ?, email = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(id)
        .execute(self.pool())
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("client not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete_client(&self, id: &str) -> Result<(), AppError> {
        let in_use: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM gift_cards WHERE buyer_id = ? OR recipient_id = ? LIMIT 1",
        )
        .bind(id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        if in_use.is_some() {
            return Err(AppError::Conflict(
                "client is referenced by a gift card".to_string(),
            ));
        }

        let deleted = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("client not found".to_string()));
        }
        Ok(())
    }
}
