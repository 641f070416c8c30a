mod executor;
mod planner;

pub use executor::{BurnOutcome, execute_node};
pub use planner::{BurnMagnitude, ManeuverNode, plan_node};
