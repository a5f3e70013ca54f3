use serde::Deserialize;
use time::OffsetDateTime;

/// `image` is an opaque string (data URL or object key); upload plumbing
/// lives outside this service.
#[derive(Debug, Deserialize)]
pub struct CreateProgressRequest {
    pub weight: f64,
    pub biceps: f64,
    pub chest: f64,
    pub waist: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub image: String,
    pub image_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub weight: Option<f64>,
    pub biceps: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    pub image: Option<String>,
    pub image_type: Option<String>,
}
