//! Politeness pacing between page fetches

use async_trait::async_trait;
use std::time::Duration;

/// Waits between consecutive fetches
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tracing::trace!("Waiting {:?} before next fetch", duration);
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}
