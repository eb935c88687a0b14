use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ExerciseEntry, PersonalRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub unit: Option<String>,
    #[serde(rename = "type")]
    pub record_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPoint {
    pub date: NaiveDate,
    pub max_weight: f64,
    pub total_volume: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrengthProgress {
    pub personal_records: BTreeMap<String, Vec<RecordPoint>>,
    pub progression_data: BTreeMap<String, Vec<ProgressionPoint>>,
}

/// Heaviest set, 0 for an empty array.
pub fn max_weight(weights: &[f64]) -> f64 {
    weights.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Σweights × Σreps, 0 when no reps were recorded.
///
/// This is a product of sums, not the per-set dot product, and arrays of
/// different lengths are taken as stored.
pub fn total_volume(weights: &[f64], reps: Option<&[i32]>) -> f64 {
    match reps {
        Some(reps) if !reps.is_empty() => {
            let weight_sum: f64 = weights.iter().sum();
            let rep_sum: i64 = reps.iter().map(|r| i64::from(*r)).sum();
            weight_sum * rep_sum as f64
        }
        _ => 0.0,
    }
}

/// Groups records (newest first) and weighted exercises by exercise name. Input
/// order is preserved inside each group.
pub fn build_strength_progress(
    records: &[PersonalRecord],
    exercises: &[ExerciseEntry],
) -> StrengthProgress {
    let mut personal_records: BTreeMap<String, Vec<RecordPoint>> = BTreeMap::new();
    for record in records {
        personal_records
            .entry(record.exercise_name.clone())
            .or_default()
            .push(RecordPoint {
                date: record.date_achieved,
                value: record.value,
                unit: record.unit.clone(),
                record_type: record.record_type.clone(),
            });
    }

    let mut progression_data: BTreeMap<String, Vec<ProgressionPoint>> = BTreeMap::new();
    for exercise in exercises {
        let weights = exercise.weight_per_set.as_slice();
        let reps = exercise.reps_per_set.as_ref().map(|r| r.as_slice());
        progression_data
            .entry(exercise.exercise_name.clone())
            .or_default()
            .push(ProgressionPoint {
                date: exercise.date_completed,
                max_weight: max_weight(weights),
                total_volume: total_volume(weights, reps),
            });
    }

    StrengthProgress {
        personal_records,
        progression_data,
    }
}
