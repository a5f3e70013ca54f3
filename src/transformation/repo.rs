use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transformation::dto::{CreateProgressRequest, UpdateProgressRequest};

/// One body-transformation checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight: f64,
    pub biceps: f64,
    pub chest: f64,
    pub waist: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub image: String,
    pub image_type: Option<String>,
}

const PROGRESS_COLUMNS: &str =
    "id, user_id, weight, biceps, chest, waist, date, image, image_type";

impl ProgressEntry {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ProgressEntry>> {
        let rows = sqlx::query_as::<_, ProgressEntry>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress_entries WHERE user_id = $1 ORDER BY date DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_scoped(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<ProgressEntry>> {
        let row = sqlx::query_as::<_, ProgressEntry>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress_entries WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<ProgressEntry>> {
        let row = sqlx::query_as::<_, ProgressEntry>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress_entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        entry: &CreateProgressRequest,
    ) -> anyhow::Result<ProgressEntry> {
        let row = sqlx::query_as::<_, ProgressEntry>(&format!(
            r#"
            INSERT INTO progress_entries (user_id, weight, biceps, chest, waist, date, image, image_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROGRESS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(entry.weight)
        .bind(entry.biceps)
        .bind(entry.chest)
        .bind(entry.waist)
        .bind(entry.date)
        .bind(&entry.image)
        .bind(entry.image_type.as_deref())
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        changes: &UpdateProgressRequest,
    ) -> anyhow::Result<Option<ProgressEntry>> {
        let row = sqlx::query_as::<_, ProgressEntry>(&format!(
            r#"
            UPDATE progress_entries SET
                weight = COALESCE($2, weight),
                biceps = COALESCE($3, biceps),
                chest = COALESCE($4, chest),
                waist = COALESCE($5, waist),
                date = COALESCE($6, date),
                image = COALESCE($7, image),
                image_type = COALESCE($8, image_type)
            WHERE id = $1
            RETURNING {PROGRESS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.weight)
        .bind(changes.biceps)
        .bind(changes.chest)
        .bind(changes.waist)
        .bind(changes.date)
        .bind(changes.image.as_deref())
        .bind(changes.image_type.as_deref())
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM progress_entries WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
