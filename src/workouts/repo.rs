use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::workouts::dto::UpdateWorkoutRequest;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise: String,
    pub sets: i32,
    pub reps: i32,
    pub weight: f64,
    pub volume: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

const WORKOUT_COLUMNS: &str = "id, user_id, exercise, sets, reps, weight, volume, date";

/// Training volume for one entry.
pub fn volume_of(sets: i32, reps: i32, weight: f64) -> f64 {
    f64::from(sets) * f64::from(reps) * weight
}

impl Workout {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Workout>> {
        let rows = sqlx::query_as::<_, Workout>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1 ORDER BY date DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Read path: scoped to the caller, so someone else's entry reads as
    /// absent.
    pub async fn find_scoped(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Workout>> {
        let row = sqlx::query_as::<_, Workout>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Mutation path: unscoped fetch so the handler can distinguish "absent"
    /// from "owned by someone else".
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Workout>> {
        let row = sqlx::query_as::<_, Workout>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        exercise: &str,
        sets: i32,
        reps: i32,
        weight: f64,
        date: OffsetDateTime,
    ) -> anyhow::Result<Workout> {
        let row = sqlx::query_as::<_, Workout>(&format!(
            r#"
            INSERT INTO workouts (user_id, exercise, sets, reps, weight, volume, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(exercise)
        .bind(sets)
        .bind(reps)
        .bind(weight)
        .bind(volume_of(sets, reps, weight))
        .bind(date)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        changes: &UpdateWorkoutRequest,
    ) -> anyhow::Result<Option<Workout>> {
        let row = sqlx::query_as::<_, Workout>(&format!(
            r#"
            UPDATE workouts SET
                exercise = COALESCE($2, exercise),
                sets = COALESCE($3, sets),
                reps = COALESCE($4, reps),
                weight = COALESCE($5, weight),
                date = COALESCE($6, date),
                volume = COALESCE($3, sets)::float8 * COALESCE($4, reps)::float8 * COALESCE($5, weight)
            WHERE id = $1
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.exercise.as_deref())
        .bind(changes.sets)
        .bind(changes.reps)
        .bind(changes.weight)
        .bind(changes.date)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_sets_times_reps_times_weight() {
        assert_eq!(volume_of(5, 5, 100.0), 2500.0);
        assert_eq!(volume_of(0, 10, 50.0), 0.0);
        assert_eq!(volume_of(3, 12, 22.5), 810.0);
    }
}
