//! Throttle-aware retry around gateway calls
//!
//! A throttled call is retried indefinitely after waiting at least as long
//! as the provider asked. Any other error is returned untouched on the first
//! occurrence.

use crate::gateway::{Gateway, GatewayError, GatewayResult, MatchDetail, MatchSummary};
use crate::state::{AccountId, GameId, ParticipantId, RankEntry, Region};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Suspends the calling operation
///
/// Abstracted so tests can record waits instead of sleeping.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<S: Sleeper + ?Sized> Sleeper for std::sync::Arc<S> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

/// How long to wait after a throttle signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait used when the provider gives no hint
    pub default_wait: Duration,
}

impl RetryPolicy {
    pub fn new(default_wait: Duration) -> Self {
        Self { default_wait }
    }

    /// The wait to honor for a throttle signal with the given hint
    pub fn wait_for(&self, hint: Option<Duration>) -> Duration {
        hint.unwrap_or(self.default_wait)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Runs `call` until it returns something other than a throttle signal
///
/// # Arguments
///
/// * `sleeper` - Used to wait between attempts
/// * `policy` - Decides the wait when no hint is given
/// * `operation` - Name used in log lines
/// * `call` - Produces a fresh attempt each time it is invoked
pub async fn retry_on_throttle<T, S, F, Fut>(
    sleeper: &S,
    policy: RetryPolicy,
    operation: &str,
    mut call: F,
) -> GatewayResult<T>
where
    S: Sleeper + ?Sized,
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = GatewayResult<T>> + Send,
    T: Send,
{
    let mut throttled: u64 = 0;
    loop {
        match call().await {
            Err(GatewayError::Throttled { retry_after }) => {
                throttled += 1;
                let wait = policy.wait_for(retry_after);
                tracing::warn!(
                    "Rate limit exceeded during {} (throttled {} times), retrying in {:?}",
                    operation,
                    throttled,
                    wait
                );
                sleeper.sleep(wait).await;
            }
            outcome => {
                if throttled > 0 {
                    tracing::debug!("{} completed after {} throttles", operation, throttled);
                }
                return outcome;
            }
        }
    }
}

/// Gateway decorator that hides throttle signals from its callers
pub struct RetryingGateway<G, S = TokioSleeper> {
    inner: G,
    sleeper: S,
    policy: RetryPolicy,
}

impl<G: Gateway> RetryingGateway<G, TokioSleeper> {
    /// Wraps a gateway, sleeping on the tokio timer between attempts
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self::with_sleeper(inner, TokioSleeper, policy)
    }
}

impl<G: Gateway, S: Sleeper> RetryingGateway<G, S> {
    pub fn with_sleeper(inner: G, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            inner,
            sleeper,
            policy,
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: Gateway, S: Sleeper> Gateway for RetryingGateway<G, S> {
    async fn list_ranked_matches(
        &self,
        region: &Region,
        account: &AccountId,
    ) -> GatewayResult<Vec<MatchSummary>> {
        retry_on_throttle(&self.sleeper, self.policy, "match list", || {
            self.inner.list_ranked_matches(region, account)
        })
        .await
    }

    async fn fetch_match_detail(
        &self,
        region: &Region,
        game: GameId,
    ) -> GatewayResult<MatchDetail> {
        retry_on_throttle(&self.sleeper, self.policy, "match detail", || {
            self.inner.fetch_match_detail(region, game)
        })
        .await
    }

    async fn fetch_rank(
        &self,
        region: &Region,
        participant: &ParticipantId,
    ) -> GatewayResult<Option<RankEntry>> {
        retry_on_throttle(&self.sleeper, self.policy, "rank lookup", || {
            self.inner.fetch_rank(region, participant)
        })
        .await
    }
}
