//! Transaction fee estimation for both fee-market variants.

pub mod envelope;
pub mod estimator;

pub use envelope::{FeeEnvelope, FeeError, FeePricing};
pub use estimator::FeeEstimator;
