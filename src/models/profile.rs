use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Physical and training attributes, one row per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    pub experience_level: Option<String>,
    pub primary_activity: Option<String>,
    pub training_location: Option<String>,
    pub training_days_per_week: Option<i32>,
    // Strength baselines
    pub squat_1rm: Option<f64>,
    pub bench_1rm: Option<f64>,
    pub deadlift_1rm: Option<f64>,
    pub overhead_press_1rm: Option<f64>,
    pub max_pull_ups: Option<i32>,
    pub five_km_time: Option<String>,
    pub preferred_intensity: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 13, max = 120, message = "Age must be between 13 and 120"))]
    pub age: Option<i32>,
    #[validate(length(max = 20, message = "Gender must be at most 20 characters"))]
    pub gender: Option<String>,
    #[serde(alias = "height")]
    pub height_cm: Option<f64>,
    #[serde(alias = "weight")]
    pub weight_kg: Option<f64>,
    /// `YYYY-MM-DD`; unparseable values are ignored.
    pub date_of_birth: Option<String>,
    #[serde(alias = "experience")]
    #[validate(length(max = 20, message = "Experience level must be at most 20 characters"))]
    pub experience_level: Option<String>,
    #[validate(length(max = 50, message = "Primary activity must be at most 50 characters"))]
    pub primary_activity: Option<String>,
    #[validate(length(max = 20, message = "Training location must be at most 20 characters"))]
    pub training_location: Option<String>,
    #[serde(alias = "training_days")]
    #[validate(range(min = 0, max = 7, message = "Training days must be between 0 and 7"))]
    pub training_days_per_week: Option<i32>,
    #[validate(range(min = 0.0, max = 1000.0, message = "Squat 1RM must be between 0 and 1000kg"))]
    pub squat_1rm: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0, message = "Bench 1RM must be between 0 and 1000kg"))]
    pub bench_1rm: Option<f64>,
    #[validate(range(
        min = 0.0,
        max = 1000.0,
        message = "Deadlift 1RM must be between 0 and 1000kg"
    ))]
    pub deadlift_1rm: Option<f64>,
    #[validate(range(
        min = 0.0,
        max = 1000.0,
        message = "Overhead Press 1RM must be between 0 and 1000kg"
    ))]
    pub overhead_press_1rm: Option<f64>,
    pub max_pull_ups: Option<i32>,
    #[validate(length(max = 20, message = "5km time must be at most 20 characters"))]
    pub five_km_time: Option<String>,
    #[validate(length(max = 20, message = "Preferred intensity must be at most 20 characters"))]
    pub preferred_intensity: Option<String>,
}

impl ProfileRequest {
    /// Trims free-text fields and drops the ones left empty.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        for field in [
            &mut self.gender,
            &mut self.date_of_birth,
            &mut self.experience_level,
            &mut self.primary_activity,
            &mut self.training_location,
            &mut self.five_km_time,
            &mut self.preferred_intensity,
        ] {
            *field = field
                .take()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty());
        }
        self
    }

    pub fn parsed_date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_rejected() {
        let request = ProfileRequest {
            name: "   ".to_string(),
            ..Default::default()
        }
        .normalized();

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_age_and_one_rep_max_bounds() {
        let base = ProfileRequest {
            name: "Sam".to_string(),
            ..Default::default()
        };

        assert!(base.clone().normalized().validate().is_ok());
        assert!(ProfileRequest { age: Some(12), ..base.clone() }.validate().is_err());
        assert!(ProfileRequest { age: Some(120), ..base.clone() }.validate().is_ok());
        assert!(ProfileRequest { squat_1rm: Some(1000.5), ..base.clone() }.validate().is_err());
        assert!(ProfileRequest { bench_1rm: Some(-1.0), ..base }.validate().is_err());
    }

    #[test]
    fn test_free_text_fields_respect_column_widths() {
        let base = ProfileRequest {
            name: "Sam".to_string(),
            ..Default::default()
        };
        let long = |n: usize| Some("x".repeat(n));

        assert!(ProfileRequest { gender: long(20), ..base.clone() }.validate().is_ok());
        assert!(ProfileRequest { gender: long(60), ..base.clone() }.validate().is_err());
        assert!(ProfileRequest { experience_level: long(21), ..base.clone() }.validate().is_err());
        assert!(ProfileRequest { training_location: long(21), ..base.clone() }.validate().is_err());
        assert!(ProfileRequest { five_km_time: long(21), ..base.clone() }.validate().is_err());
        let intensity = ProfileRequest { preferred_intensity: long(60), ..base.clone() };
        assert!(intensity.validate().is_err());
        assert!(ProfileRequest { primary_activity: long(50), ..base.clone() }.validate().is_ok());
        assert!(ProfileRequest { primary_activity: long(51), ..base }.validate().is_err());
    }

    #[test]
    fn test_date_of_birth_parsing_is_lenient() {
        let request = ProfileRequest {
            name: "Sam".to_string(),
            date_of_birth: Some("1990-04-12".to_string()),
            ..Default::default()
        };
        assert_eq!(
            request.parsed_date_of_birth(),
            NaiveDate::from_ymd_opt(1990, 4, 12)
        );

        let garbage = ProfileRequest {
            date_of_birth: Some("12/04/1990".to_string()),
            ..request
        };
        assert_eq!(garbage.parsed_date_of_birth(), None);
    }
}
