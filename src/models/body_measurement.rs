use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

/// Dated body snapshot. `measurements` keys are user-chosen ("waist", "chest", ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BodyMeasurement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub weight_kg: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub measurements: Json<BTreeMap<String, f64>>,
    pub progress_photos: Json<Vec<String>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewBodyMeasurement {
    pub date: Option<NaiveDate>,
    #[validate(range(min = 20.0, max = 400.0, message = "Weight must be between 20 and 400kg"))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 0.0, max = 80.0, message = "Body fat must be between 0 and 80%"))]
    pub body_fat_percentage: Option<f64>,
    #[validate(range(min = 0.0, max = 200.0))]
    pub muscle_mass_kg: Option<f64>,
    #[serde(default)]
    pub measurements: BTreeMap<String, f64>,
    #[serde(default)]
    pub progress_photos: Vec<String>,
    pub notes: Option<String>,
}
