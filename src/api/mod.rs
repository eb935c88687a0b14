// HTTP handlers, one router per area

pub mod auth;
pub mod check_in;
pub mod health;
pub mod profile;
pub mod progress;
pub mod routes;
pub mod strava;
pub mod workouts;

pub use routes::create_routes;
