use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;

use crate::error::AppError;

mod clients;
mod giftcards;
mod models;
mod pieces;
mod sessions;
mod students;
mod team;

pub use models::*;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(path: &str) -> Result<Self, AppError> {
        // Ensure the directory exists
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Internal(format!("create database dir: {}", e)))?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", path);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await?;

        Ok(Self { pool })
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                classes_remaining INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'new',
                payment_method TEXT,
                notes TEXT,
                price REAL,
                class_type TEXT,
                expiry_date TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assigned_classes (
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL REFERENCES students(id),
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS class_sessions (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Roster: one row per (session, student name), insertion order is
        // roster order (rowid).
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session_students (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL REFERENCES class_sessions(id),
                student_id TEXT NOT NULL REFERENCES students(id),
                student_name TEXT NOT NULL,
                attendance_status TEXT NOT NULL DEFAULT 'none',
                UNIQUE(session_id, student_name)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Durable attendance history; a row exists iff the roster mark is
        // present or absent.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS attendance_records (
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL REFERENCES students(id),
                session_id TEXT NOT NULL REFERENCES class_sessions(id),
                date TEXT NOT NULL,
                status TEXT NOT NULL,
                UNIQUE(student_id, session_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pieces (
                id TEXT PRIMARY KEY,
                student_id TEXT REFERENCES students(id),
                owner TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'creada',
                created_on TEXT NOT NULL,
                concluded_on TEXT,
                glaze_type TEXT,
                delivery_date TEXT,
                notes TEXT,
                extra_commentary TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clients (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT,
                email TEXT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gift_cards (
                id TEXT PRIMARY KEY,
                buyer_id TEXT NOT NULL REFERENCES clients(id),
                recipient_id TEXT NOT NULL REFERENCES clients(id),
                num_classes INTEGER NOT NULL,
                kind TEXT NOT NULL,
                scheduled_date TEXT,
                extra_commentary TEXT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS team_members (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                responsibilities TEXT NOT NULL DEFAULT '',
                active INTEGER NOT NULL DEFAULT 1,
                color TEXT NOT NULL DEFAULT '#6366f1'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS team_tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                assignee_id TEXT NOT NULL REFERENCES team_members(id),
                start_date TEXT NOT NULL,
                due_date TEXT NOT NULL,
                done INTEGER NOT NULL DEFAULT 0,
                done_on TEXT,
                progress INTEGER NOT NULL DEFAULT 0,
                priority TEXT NOT NULL DEFAULT 'media',
                category TEXT NOT NULL DEFAULT '',
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Database migrations completed");
        Ok(())
    }
}
