#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use mockall::mock;
use sqlx::types::Json;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, Once};
use uuid::Uuid;

use thrshld::models::{
    BodyMeasurement, CheckIn, ExerciseEntry, Goals, NewCheckIn, NewWorkout, PersonalRecord, Profile,
    Workout,
};
use thrshld::repository::{CheckInStore, ProgressStore, SortOrder};
use thrshld::services::{CompletionClient, CompletionError, CompletionRequest};

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("thrshld=debug")
            .with_test_writer()
            .try_init();
    });
}

mock! {
    pub Completion {}

    #[async_trait]
    impl CompletionClient for Completion {
        async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    goals: HashMap<Uuid, Goals>,
    workouts: Vec<Workout>,
    check_ins: Vec<CheckIn>,
    records: Vec<PersonalRecord>,
    exercises: Vec<(Uuid, ExerciseEntry)>,
    measurements: Vec<BodyMeasurement>,
}

impl Tables {
    fn workouts_of(&self, user_id: Uuid) -> impl Iterator<Item = &Workout> {
        self.workouts.iter().filter(move |w| w.user_id == user_id)
    }

    fn check_ins_of(&self, user_id: Uuid) -> impl Iterator<Item = &CheckIn> {
        self.check_ins.iter().filter(move |c| c.user_id == user_id)
    }
}

/// In-memory double for both storage seams. Rows are keyed by user like the
/// real tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: Mutex<bool>,
    failing_calls: Mutex<HashSet<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails as if the database were down.
    pub fn fail_all(&self) {
        *self.failing.lock().unwrap() = true;
    }

    /// Only the named store call fails until `recover` is called.
    pub fn fail_on(&self, call: &'static str) {
        self.failing_calls.lock().unwrap().insert(call);
    }

    pub fn recover(&self) {
        *self.failing.lock().unwrap() = false;
        self.failing_calls.lock().unwrap().clear();
    }

    fn check(&self, call: &'static str) -> Result<()> {
        if *self.failing.lock().unwrap() || self.failing_calls.lock().unwrap().contains(call) {
            Err(anyhow!("connection refused"))
        } else {
            Ok(())
        }
    }

    pub fn set_goals(&self, user_id: Uuid, workout_goal: &str) {
        let goals = Goals {
            id: Uuid::new_v4(),
            user_id,
            workout_goal: workout_goal.to_string(),
            compound_lifts: Json(vec!["squat".to_string(), "deadlift".to_string()]),
            include_running: false,
            include_conditioning: false,
            target_sessions_per_week: Some(4),
            specific_targets: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tables.lock().unwrap().goals.insert(user_id, goals);
    }

    pub fn add_workout(&self, user_id: Uuid, on: NaiveDate) {
        self.tables.lock().unwrap().workouts.push(Workout {
            id: Uuid::new_v4(),
            user_id,
            workout_name: "Logged".to_string(),
            workout_type: Some("strength".to_string()),
            date_completed: on,
            duration_minutes: Some(45),
            exercises: None,
            notes: None,
            difficulty_rating: None,
            energy_level_before: None,
            energy_level_after: None,
            calories_burned: None,
            created_at: Utc::now(),
        });
    }

    pub fn add_check_in(
        &self,
        user_id: Uuid,
        on: NaiveDate,
        energy: Option<i32>,
        mood: Option<&str>,
    ) {
        self.tables.lock().unwrap().check_ins.push(CheckIn {
            id: Uuid::new_v4(),
            user_id,
            date: on,
            energy_level: energy,
            motivation_level: None,
            sleep_quality: None,
            stress_level: None,
            muscle_soreness: None,
            mood: mood.map(str::to_string),
            notes: Some(format!("check-in on {}", on)),
            planned_workout: true,
            workout_completed: false,
            created_at: Utc::now(),
        });
    }

    pub fn add_exercise(
        &self,
        user_id: Uuid,
        name: &str,
        on: NaiveDate,
        weights: Vec<f64>,
        reps: Option<Vec<i32>>,
    ) {
        let entry = ExerciseEntry {
            exercise_name: name.to_string(),
            date_completed: on,
            weight_per_set: Json(weights),
            reps_per_set: reps.map(Json),
        };
        self.tables.lock().unwrap().exercises.push((user_id, entry));
    }

    pub fn workout_count(&self) -> usize {
        self.tables.lock().unwrap().workouts.len()
    }

    pub fn check_in_count(&self) -> usize {
        self.tables.lock().unwrap().check_ins.len()
    }

    pub fn workouts(&self) -> Vec<Workout> {
        self.tables.lock().unwrap().workouts.clone()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn count_workouts(&self, user_id: Uuid) -> Result<i64> {
        self.check("count_workouts")?;
        Ok(self.tables.lock().unwrap().workouts_of(user_id).count() as i64)
    }

    async fn count_personal_records(&self, user_id: Uuid) -> Result<i64> {
        self.check("count_personal_records")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.records.iter().filter(|r| r.user_id == user_id).count() as i64)
    }

    async fn recent_workout_dates(&self, user_id: Uuid, limit: i64) -> Result<Vec<NaiveDate>> {
        self.check("recent_workout_dates")?;
        let mut dates: Vec<NaiveDate> = self
            .tables
            .lock()
            .unwrap()
            .workouts_of(user_id)
            .map(|w| w.date_completed)
            .collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.truncate(limit as usize);
        Ok(dates)
    }

    async fn workouts_since(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<Workout>> {
        self.check("workouts_since")?;
        let mut workouts: Vec<Workout> = self
            .tables
            .lock()
            .unwrap()
            .workouts_of(user_id)
            .filter(|w| w.date_completed >= since)
            .cloned()
            .collect();
        workouts.sort_by(|a, b| b.date_completed.cmp(&a.date_completed));
        Ok(workouts)
    }

    async fn check_ins_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
        order: SortOrder,
        limit: Option<i64>,
    ) -> Result<Vec<CheckIn>> {
        self.check("check_ins_since")?;
        let mut check_ins: Vec<CheckIn> = self
            .tables
            .lock()
            .unwrap()
            .check_ins_of(user_id)
            .filter(|c| c.date >= since)
            .cloned()
            .collect();
        match order {
            SortOrder::Ascending => check_ins.sort_by(|a, b| a.date.cmp(&b.date)),
            SortOrder::Descending => check_ins.sort_by(|a, b| b.date.cmp(&a.date)),
        }
        if let Some(limit) = limit {
            check_ins.truncate(limit as usize);
        }
        Ok(check_ins)
    }

    async fn personal_records(&self, user_id: Uuid) -> Result<Vec<PersonalRecord>> {
        self.check("personal_records")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.records.iter().filter(|r| r.user_id == user_id).cloned().collect())
    }

    async fn weighted_exercises(&self, user_id: Uuid) -> Result<Vec<ExerciseEntry>> {
        self.check("weighted_exercises")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .exercises
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn body_measurements(&self, user_id: Uuid) -> Result<Vec<BodyMeasurement>> {
        self.check("body_measurements")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.measurements.iter().filter(|m| m.user_id == user_id).cloned().collect())
    }
}

#[async_trait]
impl CheckInStore for MemoryStore {
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        self.check("profile")?;
        Ok(self.tables.lock().unwrap().profiles.get(&user_id).cloned())
    }

    async fn goals(&self, user_id: Uuid) -> Result<Option<Goals>> {
        self.check("goals")?;
        Ok(self.tables.lock().unwrap().goals.get(&user_id).cloned())
    }

    async fn recent_check_ins(&self, user_id: Uuid, limit: i64) -> Result<Vec<CheckIn>> {
        self.check("recent_check_ins")?;
        let mut check_ins: Vec<CheckIn> =
            self.tables.lock().unwrap().check_ins_of(user_id).cloned().collect();
        check_ins.sort_by(|a, b| b.date.cmp(&a.date));
        check_ins.truncate(limit as usize);
        Ok(check_ins)
    }

    async fn record_check_in(
        &self,
        user_id: Uuid,
        check_in: NewCheckIn,
        workout: NewWorkout,
    ) -> Result<(CheckIn, Workout)> {
        self.check("record_check_in")?;
        let saved_check_in = CheckIn {
            id: Uuid::new_v4(),
            user_id,
            date: check_in.date,
            energy_level: check_in.energy_level,
            motivation_level: check_in.motivation_level,
            sleep_quality: check_in.sleep_quality,
            stress_level: check_in.stress_level,
            muscle_soreness: check_in.muscle_soreness,
            mood: check_in.mood,
            notes: check_in.notes,
            planned_workout: check_in.planned_workout,
            workout_completed: false,
            created_at: Utc::now(),
        };
        let saved_workout = Workout {
            id: Uuid::new_v4(),
            user_id,
            workout_name: workout.workout_name,
            workout_type: workout.workout_type,
            date_completed: workout.date_completed.unwrap_or(check_in.date),
            duration_minutes: workout.duration_minutes,
            exercises: None,
            notes: workout.notes,
            difficulty_rating: workout.difficulty_rating,
            energy_level_before: workout.energy_level_before,
            energy_level_after: workout.energy_level_after,
            calories_burned: workout.calories_burned,
            created_at: Utc::now(),
        };

        let mut tables = self.tables.lock().unwrap();
        tables.check_ins.push(saved_check_in.clone());
        tables.workouts.push(saved_workout.clone());
        Ok((saved_check_in, saved_workout))
    }
}
