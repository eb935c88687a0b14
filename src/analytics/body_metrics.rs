use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DataPoint;
use crate::models::BodyMeasurement;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub weight_progression: Vec<DataPoint<f64>>,
    pub body_fat_progression: Vec<DataPoint<f64>>,
    /// One series per custom measurement key found in the data.
    pub measurements: BTreeMap<String, Vec<DataPoint<f64>>>,
    pub latest_measurement: Option<BodyMeasurement>,
}

/// `rows` must be in ascending date order.
pub fn build_body_metrics(rows: Vec<BodyMeasurement>) -> BodyMetrics {
    let mut metrics = BodyMetrics::default();

    for row in &rows {
        if let Some(weight) = row.weight_kg {
            metrics.weight_progression.push(DataPoint::new(row.date, weight));
        }
        if let Some(body_fat) = row.body_fat_percentage {
            metrics.body_fat_progression.push(DataPoint::new(row.date, body_fat));
        }
        for (key, value) in row.measurements.iter() {
            metrics
                .measurements
                .entry(key.clone())
                .or_default()
                .push(DataPoint::new(row.date, *value));
        }
    }

    metrics.latest_measurement = rows.into_iter().last();
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use sqlx::types::Json;
    use uuid::Uuid;

    fn measurement(
        day: u32,
        weight: Option<f64>,
        body_fat: Option<f64>,
        custom: &[(&str, f64)],
    ) -> BodyMeasurement {
        BodyMeasurement {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            weight_kg: weight,
            body_fat_percentage: body_fat,
            muscle_mass_kg: None,
            measurements: Json(custom.iter().map(|(k, v)| (k.to_string(), *v)).collect()),
            progress_photos: Json(vec![]),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_custom_keys_come_only_from_data() {
        let rows = vec![
            measurement(1, Some(82.0), Some(18.0), &[("waist", 86.0)]),
            measurement(8, Some(81.5), None, &[("waist", 85.0)]),
        ];

        let metrics = build_body_metrics(rows);

        assert_eq!(metrics.measurements.keys().collect::<Vec<_>>(), vec!["waist"]);
        assert_eq!(metrics.measurements["waist"].len(), 2);
        assert!(!metrics.measurements.contains_key("chest"));
    }

    #[test]
    fn test_series_skip_missing_fields() {
        let rows = vec![
            measurement(1, Some(82.0), Some(18.0), &[]),
            measurement(8, None, Some(17.5), &[("chest", 104.0)]),
            measurement(15, Some(81.0), None, &[("waist", 85.0)]),
        ];

        let metrics = build_body_metrics(rows);

        assert_eq!(metrics.weight_progression.len(), 2);
        assert_eq!(metrics.body_fat_progression.len(), 2);
        assert_eq!(metrics.measurements["chest"][0].value, 104.0);
        let latest = metrics.latest_measurement.unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_empty_history() {
        let metrics = build_body_metrics(vec![]);
        assert!(metrics.weight_progression.is_empty());
        assert!(metrics.measurements.is_empty());
        assert!(metrics.latest_measurement.is_none());
    }
}
