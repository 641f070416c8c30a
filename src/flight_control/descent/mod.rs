mod controller;
mod profile;

pub use controller::{DescentController, DescentOutcome};
pub use profile::{DescentProfile, gain_for, throttle_command};
