use serde::{Deserialize, Serialize};

use super::round1;
use crate::models::StravaActivity;

/// Number of recent activities the estimate is based on.
pub const RECOVERY_ACTIVITY_LIMIT: usize = 7;

/// Thresholds on the average effort score per activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessPolicy {
    pub high_load: f64,
    pub moderate_load: f64,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            high_load: 150.0,
            moderate_load: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    High,
    Moderate,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessLevel {
    Moderate,
    Good,
    Excellent,
}

impl ReadinessLevel {
    pub fn score(&self) -> u8 {
        match self {
            ReadinessLevel::Moderate => 65,
            ReadinessLevel::Good => 80,
            ReadinessLevel::Excellent => 95,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            ReadinessLevel::Moderate => {
                "Consider an active recovery day - high training load detected"
            }
            ReadinessLevel::Good => "You're training consistently - maintain current intensity",
            ReadinessLevel::Excellent => {
                "Low training stress - great time for a challenging workout"
            }
        }
    }
}

impl ReadinessPolicy {
    pub fn classify(&self, average_load: f64) -> (LoadStatus, ReadinessLevel) {
        if average_load > self.high_load {
            (LoadStatus::High, ReadinessLevel::Moderate)
        } else if average_load > self.moderate_load {
            (LoadStatus::Moderate, ReadinessLevel::Good)
        } else {
            (LoadStatus::Light, ReadinessLevel::Excellent)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingLoad {
    pub weekly_total: f64,
    pub average_per_session: f64,
    pub status: LoadStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingVolume {
    /// Kilometers.
    pub weekly_distance: f64,
    /// Hours.
    pub weekly_time: f64,
    pub activities_count: usize,
    pub average_distance_per_activity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Readiness {
    pub score: u8,
    pub status: ReadinessLevel,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryMetrics {
    pub training_load: TrainingLoad,
    pub volume: TrainingVolume,
    pub readiness: Readiness,
    pub last_activity: Option<StravaActivity>,
    pub athlete_stats: Option<serde_json::Value>,
}

/// Heuristic readiness from the most recent activities, newest first.
///
/// Returns `None` without activities. Activities without an effort score add
/// nothing to the load but still count towards the averages.
pub fn estimate_recovery(
    activities: &[StravaActivity],
    policy: &ReadinessPolicy,
) -> Option<RecoveryMetrics> {
    if activities.is_empty() {
        return None;
    }

    let count = activities.len();
    let total_load: f64 = activities.iter().filter_map(|a| a.suffer_score).sum();
    let total_km: f64 = activities.iter().map(|a| a.distance / 1000.0).sum();
    let total_hours: f64 = activities.iter().map(|a| a.moving_time as f64 / 3600.0).sum();

    let average_load = total_load / count as f64;
    let (load_status, level) = policy.classify(average_load);

    Some(RecoveryMetrics {
        training_load: TrainingLoad {
            weekly_total: total_load,
            average_per_session: round1(average_load),
            status: load_status,
        },
        volume: TrainingVolume {
            weekly_distance: round1(total_km),
            weekly_time: round1(total_hours),
            activities_count: count,
            average_distance_per_activity: round1(total_km / count as f64),
        },
        readiness: Readiness {
            score: level.score(),
            status: level,
            recommendation: level.recommendation().to_string(),
        },
        last_activity: activities.first().cloned(),
        athlete_stats: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn activity(id: i64, suffer_score: Option<f64>, meters: f64, seconds: i64) -> StravaActivity {
        StravaActivity {
            id,
            name: format!("Activity {}", id),
            activity_type: "Run".to_string(),
            start_date: Utc::now(),
            distance: meters,
            moving_time: seconds,
            suffer_score,
        }
    }

    #[test]
    fn test_no_activities_no_estimate() {
        assert!(estimate_recovery(&[], &ReadinessPolicy::default()).is_none());
    }

    #[test]
    fn test_high_load_suggests_recovery() {
        let activities = vec![
            activity(2, Some(180.0), 10_000.0, 3600),
            activity(1, Some(160.0), 8_000.0, 2700),
        ];

        let metrics = estimate_recovery(&activities, &ReadinessPolicy::default()).unwrap();

        assert_eq!(metrics.training_load.weekly_total, 340.0);
        assert_eq!(metrics.training_load.average_per_session, 170.0);
        assert_eq!(metrics.training_load.status, LoadStatus::High);
        assert_eq!(metrics.readiness.status, ReadinessLevel::Moderate);
        assert_eq!(metrics.readiness.score, 65);
        assert_eq!(metrics.volume.weekly_distance, 18.0);
        assert_eq!(metrics.volume.weekly_time, 1.8);
        assert_eq!(metrics.volume.average_distance_per_activity, 9.0);
        assert_eq!(metrics.last_activity.unwrap().id, 2);
    }

    #[test]
    fn test_missing_scores_lower_the_average() {
        let activities = vec![
            activity(1, Some(240.0), 5_000.0, 1800),
            activity(2, None, 5_000.0, 1800),
        ];

        let metrics = estimate_recovery(&activities, &ReadinessPolicy::default()).unwrap();

        assert_eq!(metrics.training_load.average_per_session, 120.0);
        assert_eq!(metrics.readiness.status, ReadinessLevel::Good);
        assert_eq!(metrics.readiness.score, 80);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.classify(150.0), (LoadStatus::Moderate, ReadinessLevel::Good));
        assert_eq!(policy.classify(100.0), (LoadStatus::Light, ReadinessLevel::Excellent));
        assert_eq!(policy.classify(150.1).1.score(), 65);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ReadinessPolicy { high_load: 50.0, moderate_load: 20.0 };
        let metrics = estimate_recovery(&[activity(1, Some(60.0), 0.0, 0)], &policy).unwrap();
        assert_eq!(metrics.readiness.status, ReadinessLevel::Moderate);
        assert_eq!(metrics.readiness.recommendation, ReadinessLevel::Moderate.recommendation());
    }
}
