use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutRequest {
    pub exercise: String,
    pub sets: i32,
    pub reps: i32,
    pub weight: f64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// Partial update; absent fields keep their stored values. Volume is always
/// recomputed server-side from the resulting sets/reps/weight.
#[derive(Debug, Deserialize)]
pub struct UpdateWorkoutRequest {
    pub exercise: Option<String>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_date_is_optional() {
        let req: CreateWorkoutRequest =
            serde_json::from_str(r#"{"exercise":"Squat","sets":5,"reps":5,"weight":100.0}"#)
                .unwrap();
        assert!(req.date.is_none());

        let req: CreateWorkoutRequest = serde_json::from_str(
            r#"{"exercise":"Squat","sets":5,"reps":5,"weight":100.0,"date":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(req.date.is_some());
    }
}
