pub mod batch;
pub mod error;
pub mod pacing;
pub mod retry;

pub use batch::{BatchReport, BatchRunner, ItemOutcome, ItemProcessor, ItemReport, ItemResult};
pub use error::{Error, Result};
pub use pacing::{DelayRange, Pacing};
pub use retry::{retry, retry_if, RetryPolicy};
