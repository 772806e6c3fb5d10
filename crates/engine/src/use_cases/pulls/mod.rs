//! Pull use cases: rate limiting, rank/card selection and window resets.

use std::sync::Arc;

mod error;
mod perform_pull;
mod rate_limiter;
mod reset_pulls;
mod selector;

pub use error::PullError;
pub use perform_pull::{PerformPull, PullOutcome, PullResult};
pub use rate_limiter::{ConsumeResult, PullRateLimiter};
pub use reset_pulls::{ResetOutcome, ResetPulls};
pub use selector::ProbabilitySelector;

/// Container for pull use cases.
pub struct PullUseCases {
    pub limiter: Arc<PullRateLimiter>,
    pub selector: Arc<ProbabilitySelector>,
    pub perform_pull: Arc<PerformPull>,
    pub reset_pulls: Arc<ResetPulls>,
}

impl PullUseCases {
    pub fn new(
        limiter: Arc<PullRateLimiter>,
        selector: Arc<ProbabilitySelector>,
        perform_pull: Arc<PerformPull>,
        reset_pulls: Arc<ResetPulls>,
    ) -> Self {
        Self {
            limiter,
            selector,
            perform_pull,
            reset_pulls,
        }
    }
}
