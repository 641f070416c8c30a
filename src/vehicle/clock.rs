use async_trait::async_trait;

/// The simulation clock and its one time-acceleration primitive.
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// Current universal time, seconds.
    async fn ut_now(&self) -> f64;

    /// Fast-forwards the simulation to `ut`, returning once it is reached.
    /// A target in the past is a no-op.
    async fn warp_to(&self, ut: f64);
}
