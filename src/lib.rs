// Library surface for the server binary and integration tests.
pub mod config;
pub mod error;
pub mod language;
pub mod letter_stats;
pub mod server;
pub mod session;
pub mod stats;
pub mod util;

pub use error::{Result, TrainerError};
pub use session::Trainer;
