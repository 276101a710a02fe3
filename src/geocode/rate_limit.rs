use super::{Coordinates, Geocode};
use anyhow::Result;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Wraps a [`Geocode`] backend so that consecutive lookups are at least
/// `min_delay` apart, measured start-to-start. Calls are serialized through
/// `&mut self`; each invocation blocks until its slot in the schedule opens,
/// then performs exactly one underlying call. No retries.
pub struct RateLimited<G> {
    inner: G,
    min_delay: Duration,
    last_call: Option<Instant>,
}

impl<G: Geocode> RateLimited<G> {
    pub fn new(inner: G, min_delay: Duration) -> Self {
        RateLimited {
            inner,
            min_delay,
            last_call: None,
        }
    }

    /// Access the wrapped backend.
    pub fn inner_ref(&self) -> &G {
        &self.inner
    }

    pub async fn lookup(&mut self, query: &str) -> Result<Option<Coordinates>> {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                sleep(self.min_delay - elapsed).await;
            }
        }
        // Clock runs from the start of this call, not its completion.
        self.last_call = Some(Instant::now());
        self.inner.lookup(query).await
    }
}
