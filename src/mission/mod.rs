//! Mission phases composing the guidance layer into the de-orbit → correction
//! → landing sequence.

pub mod correction;
pub mod deorbit;
pub mod landing;
#[cfg(test)]
mod tests;

use strum_macros::Display;

/// How a mission phase ended.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// The phase ran its course. A correction loop that stopped on its first
    /// non-improving trial still counts: that early exit is an accepted
    /// partial result, not a failure.
    Complete,
    /// The cancellation token fired mid-phase.
    Cancelled,
}
