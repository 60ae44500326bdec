//! Reference-card detection: candidate scoring, temporal smoothing, and
//! the per-frame pipeline. Orchestration across frames lives in
//! [`crate::session`].

pub(crate) mod detect;

mod candidate;
mod smoother;

pub use candidate::CardCandidate;
pub use smoother::CornerSmoother;
