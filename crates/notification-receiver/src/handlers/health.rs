//! Liveness probe. The receiver has no dependencies, so it is ready whenever
//! it is alive.

#[tracing::instrument(skip_all, name = "receiver.health.liveness")]
pub async fn health_check() -> &'static str {
    "OK"
}
