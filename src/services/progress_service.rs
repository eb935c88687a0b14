use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::analytics::{
    build_body_metrics, build_overview, build_strength_progress, build_wellness_trends,
    current_streak, BodyMetrics, ProgressOverview, StrengthProgress, UserStats, WellnessTrends,
    OVERVIEW_CHECK_IN_LIMIT, OVERVIEW_WINDOW_DAYS, STREAK_LOOKBACK, WELLNESS_WINDOW_DAYS,
};
use crate::cache::{cache_key, get_json, set_json, user_prefix, Cache};
use crate::repository::{ProgressStore, SortOrder};

pub const OVERVIEW_REQUEST: &str = "overview";
pub const STRENGTH_REQUEST: &str = "strength";
pub const BODY_METRICS_REQUEST: &str = "body_metrics";
pub const WELLNESS_REQUEST: &str = "wellness";

/// Read path for the progress pages. Each result is cached per user, request
/// type and day; store failures are logged and answered with an empty result.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
    cache: Arc<dyn Cache>,
    ttl: StdDuration,
}

impl ProgressService {
    pub fn new(store: Arc<dyn ProgressStore>, cache: Arc<dyn Cache>, ttl: StdDuration) -> Self {
        Self { store, cache, ttl }
    }

    /// Uncached; the counters change with every write.
    pub async fn user_stats(&self, user_id: Uuid, today: NaiveDate) -> UserStats {
        match self.load_stats(user_id, today).await {
            Ok(stats) => stats,
            Err(e) => {
                error!(%user_id, error = ?e, "Failed to compute user stats");
                UserStats::default()
            }
        }
    }

    async fn load_stats(&self, user_id: Uuid, today: NaiveDate) -> Result<UserStats> {
        let total_workouts = self.store.count_workouts(user_id).await?;
        let personal_records = self.store.count_personal_records(user_id).await?;
        let dates = self.store.recent_workout_dates(user_id, STREAK_LOOKBACK).await?;

        Ok(UserStats {
            total_workouts,
            current_streak: current_streak(&dates, today),
            personal_records,
        })
    }

    pub async fn overview(&self, user_id: Uuid, today: NaiveDate) -> ProgressOverview {
        self.cached(user_id, OVERVIEW_REQUEST, today, async {
            let since = today - Duration::days(OVERVIEW_WINDOW_DAYS);
            let stats = self.load_stats(user_id, today).await?;
            let workouts = self.store.workouts_since(user_id, since).await?;
            let check_ins = self
                .store
                .check_ins_since(
                    user_id,
                    since,
                    SortOrder::Descending,
                    Some(OVERVIEW_CHECK_IN_LIMIT),
                )
                .await?;

            Ok(build_overview(stats, workouts, &check_ins))
        })
        .await
    }

    pub async fn strength(&self, user_id: Uuid, today: NaiveDate) -> StrengthProgress {
        self.cached(user_id, STRENGTH_REQUEST, today, async {
            let records = self.store.personal_records(user_id).await?;
            let exercises = self.store.weighted_exercises(user_id).await?;

            Ok(build_strength_progress(&records, &exercises))
        })
        .await
    }

    pub async fn body_metrics(&self, user_id: Uuid, today: NaiveDate) -> BodyMetrics {
        self.cached(user_id, BODY_METRICS_REQUEST, today, async {
            let rows = self.store.body_measurements(user_id).await?;
            Ok(build_body_metrics(rows))
        })
        .await
    }

    pub async fn wellness(&self, user_id: Uuid, today: NaiveDate) -> WellnessTrends {
        self.cached(user_id, WELLNESS_REQUEST, today, async {
            let since = today - Duration::days(WELLNESS_WINDOW_DAYS);
            let check_ins = self
                .store
                .check_ins_since(user_id, since, SortOrder::Ascending, None)
                .await?;

            Ok(build_wellness_trends(&check_ins))
        })
        .await
    }

    /// Drops every cached entry of the user. Called after each write.
    pub async fn invalidate_user(&self, user_id: Uuid) {
        match self.cache.invalidate_prefix(&user_prefix(user_id)).await {
            Ok(removed) => debug!(%user_id, removed, "Invalidated cached progress"),
            Err(e) => warn!(%user_id, error = %e, "Failed to invalidate cache"),
        }
    }

    async fn cached<T, F>(
        &self,
        user_id: Uuid,
        request_type: &str,
        today: NaiveDate,
        compute: F,
    ) -> T
    where
        T: Serialize + DeserializeOwned + Default + Sync,
        F: Future<Output = Result<T>>,
    {
        let key = cache_key(user_id, request_type, &today.to_string());

        match get_json::<T>(self.cache.as_ref(), &key).await {
            Ok(Some(hit)) => {
                debug!(%user_id, request_type, "Progress cache hit");
                return hit;
            }
            Ok(None) => {}
            Err(e) => warn!(%user_id, request_type, error = %e, "Cache read failed, computing"),
        }

        let value = match compute.await {
            Ok(value) => value,
            Err(e) => {
                error!(%user_id, request_type, error = ?e, "Failed to compute progress data");
                return T::default();
            }
        };

        if let Err(e) = set_json(self.cache.as_ref(), &key, &value, self.ttl).await {
            warn!(%user_id, request_type, error = %e, "Cache write failed");
        }
        value
    }
}
