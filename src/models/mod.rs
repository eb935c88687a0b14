// Persisted records and request payloads

pub mod body_measurement;
pub mod check_in;
pub mod goals;
pub mod personal_record;
pub mod profile;
pub mod strava;
pub mod user;
pub mod validation;
pub mod workout;

pub use body_measurement::*;
pub use check_in::*;
pub use goals::*;
pub use personal_record::*;
pub use profile::*;
pub use strava::*;
pub use user::*;
pub use validation::*;
pub use workout::*;
