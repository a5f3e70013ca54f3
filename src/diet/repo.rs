use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::diet::dto::UpdateDietEntryRequest;

/// One logged meal with its macros.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DietEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbs: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

const DIET_COLUMNS: &str = "id, user_id, meal, calories, proteins, fats, carbs, date";

impl DietEntry {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<DietEntry>> {
        let rows = sqlx::query_as::<_, DietEntry>(&format!(
            "SELECT {DIET_COLUMNS} FROM diet_entries WHERE user_id = $1 ORDER BY date DESC"
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
    ) -> anyhow::Result<Option<DietEntry>> {
        let row = sqlx::query_as::<_, DietEntry>(&format!(
            "SELECT {DIET_COLUMNS} FROM diet_entries WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<DietEntry>> {
        let row = sqlx::query_as::<_, DietEntry>(&format!(
            "SELECT {DIET_COLUMNS} FROM diet_entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        meal: &str,
        calories: f64,
        proteins: f64,
        fats: f64,
        carbs: f64,
        date: OffsetDateTime,
    ) -> anyhow::Result<DietEntry> {
        let row = sqlx::query_as::<_, DietEntry>(&format!(
            r#"
            INSERT INTO diet_entries (user_id, meal, calories, proteins, fats, carbs, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {DIET_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(meal)
        .bind(calories)
        .bind(proteins)
        .bind(fats)
        .bind(carbs)
        .bind(date)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        changes: &UpdateDietEntryRequest,
    ) -> anyhow::Result<Option<DietEntry>> {
        let row = sqlx::query_as::<_, DietEntry>(&format!(
            r#"
            UPDATE diet_entries SET
                meal = COALESCE($2, meal),
                calories = COALESCE($3, calories),
                proteins = COALESCE($4, proteins),
                fats = COALESCE($5, fats),
                carbs = COALESCE($6, carbs),
                date = COALESCE($7, date)
            WHERE id = $1
            RETURNING {DIET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.meal.as_deref())
        .bind(changes.calories)
        .bind(changes.proteins)
        .bind(changes.fats)
        .bind(changes.carbs)
        .bind(changes.date)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM diet_entries WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
