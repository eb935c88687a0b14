use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{CoachError, CoachResult};
use crate::models::{
    sanitize_input, CheckInRequest, CheckInResponse, NewCheckIn, NewWorkout, MAX_INPUT_LENGTH,
};
use crate::repository::CheckInStore;
use crate::services::completion_client::{CompletionClient, CompletionRequest};
use crate::services::progress_service::ProgressService;
use crate::services::prompt_builder::{
    build_prompt, format_workout_response, PROMPT_HISTORY_LEN, SYSTEM_INSTRUCTION,
};

pub const GOALS_REQUIRED_MESSAGE: &str = "Please set a fitness goal first before checking in.";

/// Daily check-in: asks the coach for a plan, then stores the check-in and the
/// generated workout together.
#[derive(Clone)]
pub struct CheckInService {
    store: Arc<dyn CheckInStore>,
    completion: Arc<dyn CompletionClient>,
    progress: ProgressService,
}

impl CheckInService {
    pub fn new(
        store: Arc<dyn CheckInStore>,
        completion: Arc<dyn CompletionClient>,
        progress: ProgressService,
    ) -> Self {
        Self {
            store,
            completion,
            progress,
        }
    }

    #[instrument(skip(self, request), fields(user_id = %user_id))]
    pub async fn check_in(
        &self,
        user_id: Uuid,
        request: CheckInRequest,
        today: NaiveDate,
    ) -> CoachResult<CheckInResponse> {
        request.validate()?;
        let status = sanitize_input(request.status.trim(), MAX_INPUT_LENGTH);
        if status.is_empty() {
            return Err(CoachError::Validation("Status is required".to_string()));
        }

        let goals = self
            .store
            .goals(user_id)
            .await?
            .ok_or_else(|| CoachError::NotConfigured(GOALS_REQUIRED_MESSAGE.to_string()))?;
        let profile = self.store.profile(user_id).await?;
        let recent = self.store.recent_check_ins(user_id, PROMPT_HISTORY_LEN).await?;

        let prompt = build_prompt(profile.as_ref(), &goals, &recent, &status);

        // Nothing is written until the coach has answered.
        let reply = self
            .completion
            .complete(CompletionRequest {
                system: SYSTEM_INSTRUCTION.to_string(),
                prompt,
            })
            .await
            .map_err(|e| {
                error!(error = %e, "Workout generation failed");
                CoachError::Upstream(e.user_message().to_string())
            })?;
        let reply = format_workout_response(&reply);

        let check_in = NewCheckIn::from_request(&request, today, status);
        let workout = NewWorkout::generated(today, reply.clone());
        let (check_in, workout) = self.store.record_check_in(user_id, check_in, workout).await?;
        info!(check_in_id = %check_in.id, workout_id = %workout.id, "Recorded check-in");

        self.progress.invalidate_user(user_id).await;
        let stats = self.progress.user_stats(user_id, today).await;

        Ok(CheckInResponse { reply, stats })
    }
}
