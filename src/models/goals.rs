use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// The single mutable goals record of a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goals {
    pub id: Uuid,
    pub user_id: Uuid,
    /// build-muscle, lose-weight, strength, endurance, ...
    pub workout_goal: String,
    pub compound_lifts: Json<Vec<String>>,
    pub include_running: bool,
    pub include_conditioning: bool,
    pub target_sessions_per_week: Option<i32>,
    /// Free-form targets such as "Bench 100kg" or "Run 5K in 25min".
    pub specific_targets: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GoalsRequest {
    #[validate(length(min = 1, max = 50, message = "Please provide a valid fitness goal."))]
    pub workout_goal: String,
    #[serde(default)]
    pub compound_lifts: Vec<String>,
    #[serde(default)]
    pub include_running: bool,
    #[serde(default)]
    pub include_conditioning: bool,
    #[validate(range(min = 1, max = 14, message = "Target sessions must be between 1 and 14"))]
    pub target_sessions_per_week: Option<i32>,
    #[serde(default)]
    pub specific_targets: Vec<String>,
}

impl GoalsRequest {
    pub fn normalized(mut self) -> Self {
        self.workout_goal = self.workout_goal.trim().to_string();
        self.compound_lifts = self
            .compound_lifts
            .into_iter()
            .map(|lift| lift.trim().to_string())
            .filter(|lift| !lift.is_empty())
            .collect();
        self
    }
}
