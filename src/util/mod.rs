//! Utility modules: poll scheduling, deadlines and cancellation.

pub mod scheduler;
pub mod timeout;

pub use scheduler::{Scheduler, TokioScheduler};
pub use timeout::{until_cancelled, with_deadline};
