pub mod error;
pub mod schedule;
pub mod scheduler;
pub mod stats;
pub mod store;
pub mod types;

pub use error::MemorizationError;
pub use schedule::LeitnerSchedule;
pub use scheduler::Scheduler;
pub use store::ProgressStore;
pub use types::{DueCard, MemorizationItem, ReviewOutcome, UserId, VerseKey};
