mod closest_approach;

pub use closest_approach::{
    ClosestApproachResult, SolverParams, chord_distance_at, find_closest_approach,
};
