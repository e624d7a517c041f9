pub mod errors;
pub mod id;

pub use errors::{ConfigError, TutorAppError};
pub use id::SessionId;
