use super::{Database, TeamMemberRow, TeamTaskRow};
use crate::error::AppError;

impl Database {
    pub async fn list_team_members(&self) -> Result<Vec<TeamMemberRow>, AppError> {
        let members = sqlx::query_as::<_, TeamMemberRow>(
            "SELECT id, name, role, responsibilities, active, color FROM team_members ORDER BY name ASC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(members)
    }

    pub async fn get_team_member(&self, id: &str) -> Result<Option<TeamMemberRow>, AppError> {
        let member = sqlx::query_as::<_, TeamMemberRow>(
            "SELECT id, name, role, responsibilities, active, color FROM team_members WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(member)
    }

    pub async fn insert_team_member(&self, member: &TeamMemberRow) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO team_members (id, name, role, responsibilities, active, color) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&member.id)
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.responsibilities)
        .bind(member.active)
        .bind(&member.color)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn update_team_member(&self, member: &TeamMemberRow) -> Result<(), AppError> {
        let updated = sqlx::query(
            "UPDATE team_members SET name = ?, role = ?, responsibilities = ?, active = ?, color = ? WHERE id = ?",
        )
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.responsibilities)
        .bind(member.active)
        .bind(&member.color)
        .bind(&member.id)
        .execute(self.pool())
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("team member not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete_team_member(&self, id: &str) -> Result<(), AppError> {
        let assigned: Option<(String,)> =
            sqlx::query_as("SELECT id FROM team_tasks WHERE assignee_id = ? LIMIT 1")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        if assigned.is_some() {
            return Err(AppError::Conflict(
                "member still has tasks assigned".to_string(),
            ));
        }

        let deleted = sqlx::query("DELETE FROM team_members WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("team member not found".to_string()));
        }
        Ok(())
    }

    pub async fn list_team_tasks(&self) -> Result<Vec<TeamTaskRow>, AppError> {
        let tasks = sqlx::query_as::<_, TeamTaskRow>(
            "SELECT id, title, description, assignee_id, start_date, due_date, done, done_on, progress, priority, category, created_at, updated_at \
             FROM team_tasks ORDER BY start_date ASC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    pub async fn get_team_task(&self, id: &str) -> Result<Option<TeamTaskRow>, AppError> {
        let task = sqlx::query_as::<_, TeamTaskRow>(
            "SELECT id, title, description, assignee_id, start_date, due_date, done, done_on, progress, priority, category, created_at, updated_at \
             FROM team_tasks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(task)
    }

    pub async fn insert_team_task(&self, task: &TeamTaskRow) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO team_tasks (id, title, description, assignee_id, start_date, due_date, done, done_on, progress, priority, category) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.assignee_id)
        .bind(&task.start_date)
        .bind(&task.due_date)
        .bind(task.done)
        .bind(&task.done_on)
        .bind(task.progress)
        .bind(&task.priority)
        .bind(&task.category)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn update_team_task(&self, task: &TeamTaskRow) -> Result<(), AppError> {
        let updated = sqlx::query(
            "UPDATE team_tasks SET title = ?, description = ?, assignee_id = ?, start_date = ?, due_date = ?, done = ?, done_on = ?, progress = ?, priority = ?, category = ?, updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.assignee_id)
        .bind(&task.start_date)
        .bind(&task.due_date)
        .bind(task.done)
        .bind(&task.done_on)
        .bind(task.progress)
        .bind(&task.priority)
        .bind(&task.category)
        .bind(&task.id)
        .execute(self.pool())
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("task not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete_team_task(&self, id: &str) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM team_tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("task not found".to_string()));
        }
        Ok(())
    }
}
