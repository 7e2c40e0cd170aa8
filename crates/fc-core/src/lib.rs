//! fluent-check core library
//!
//! Probabilistic size and confidence estimation for property-based testing:
//! - `SizeEstimate` and the rules composing it across generators
//! - The `Arbitrary` generator interface and its concrete combinators
//! - Bayesian size estimates for filters, with warm/cold shrink policy
//! - Bayesian confidence and the early-stopping contract
//! - Structured logging
//!
//! Numerics live in `fc_math`; configuration files in `fc_config`.

pub mod arbitrary;
pub mod confidence;
pub mod distinct;
pub mod error;
pub mod logging;
pub mod settings;
pub mod shrink_policy;
pub mod size;

pub use arbitrary::{
    array, boolean, constant, empty, integer, tuple, union, Arbitrary, ArbitraryExt,
    BoxedArbitrary, CollisionCorrection, Draw, Pick,
};
pub use confidence::{
    calculate_bayesian_confidence, ConfidenceEngine, ConfidenceTracker, Decision, RunSummary,
    StopReason, StoppingRule, Verdict,
};
pub use distinct::{count_distinct, DistinctSet, Identity};
pub use error::{Error, ErrorCategory, Result};
pub use settings::{ConfidenceSettings, EstimatorSettings, Settings};
pub use shrink_policy::ShrinkPolicy;
pub use size::SizeEstimate;
