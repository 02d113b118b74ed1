#![warn(clippy::pedantic)]

pub mod auth_gate;
pub mod config;
pub mod log;
pub mod login;
pub mod session_store;
pub mod workout_session;

pub use auth_gate::{Access, Gate};
pub use config::Config;
pub use login::FirstAccess;
pub use session_store::{SessionStorage, SessionStore};
pub use workout_session::{CompletionState, Phase, WorkoutSession};
