// Business logic services

pub mod check_in_service;
pub mod completion_client;
pub mod email_service;
pub mod profile_service;
pub mod progress_service;
pub mod prompt_builder;
pub mod strava_api_client;
pub mod strava_service;
pub mod workout_service;

pub use check_in_service::CheckInService;
pub use completion_client::{CompletionClient, CompletionError, CompletionRequest, OpenAiClient};
pub use email_service::{LogMailer, Mailer, SmtpMailer};
pub use profile_service::{ProfileService, UserData};
pub use progress_service::ProgressService;
pub use strava_api_client::StravaApiClient;
pub use strava_service::StravaService;
pub use workout_service::WorkoutService;
