use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DataPoint;
use crate::models::CheckIn;

pub const WELLNESS_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellnessTrends {
    pub energy_levels: Vec<DataPoint<i32>>,
    pub motivation_levels: Vec<DataPoint<i32>>,
    pub sleep_quality: Vec<DataPoint<i32>>,
    pub stress_levels: Vec<DataPoint<i32>>,
    pub muscle_soreness: Vec<DataPoint<i32>>,
    pub mood_distribution: BTreeMap<String, u32>,
}

fn push_if_set(series: &mut Vec<DataPoint<i32>>, check_in: &CheckIn, value: Option<i32>) {
    if let Some(value) = value {
        series.push(DataPoint::new(check_in.date, value));
    }
}

/// `check_ins` are the window's check-ins in ascending date order.
pub fn build_wellness_trends(check_ins: &[CheckIn]) -> WellnessTrends {
    let mut trends = WellnessTrends::default();

    for check_in in check_ins {
        push_if_set(&mut trends.energy_levels, check_in, check_in.energy_level);
        push_if_set(&mut trends.motivation_levels, check_in, check_in.motivation_level);
        push_if_set(&mut trends.sleep_quality, check_in, check_in.sleep_quality);
        push_if_set(&mut trends.stress_levels, check_in, check_in.stress_level);
        push_if_set(&mut trends.muscle_soreness, check_in, check_in.muscle_soreness);

        // Blank moods count as unset.
        if let Some(mood) = check_in.mood.as_deref().filter(|m| !m.trim().is_empty()) {
            *trends.mood_distribution.entry(mood.to_string()).or_insert(0) += 1;
        }
    }

    trends
}
