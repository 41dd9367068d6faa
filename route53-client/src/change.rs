//! Waiting for changes to propagate
//!
//! [`PendingChange::wait_until_synced`] returns a [`ChangeWaiter`] right away.
//! The polling runs in its own tokio task bounded by the wait timeout, so the
//! task ends on its own even if the waiter is dropped unread.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout_at};

use crate::client::Route53Client;
use crate::error::{ClientError, Result};
use crate::types::ChangeInfo;

/// Shortest accepted poll interval.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Longest representable wait; longer intervals and timeouts are clamped to it.
const MAX_WAIT: Duration = Duration::from_secs(86_400 * 365 * 30);

/// The instant `delay` from now, clamped to [`MAX_WAIT`].
fn instant_after(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay.min(MAX_WAIT)).unwrap_or(now)
}

/// A change submitted to the service, not yet known to be in sync.
#[derive(Debug, Clone)]
pub struct PendingChange {
    client: Route53Client,
    info: ChangeInfo,
}

impl PendingChange {
    pub(crate) fn new(client: Route53Client, info: ChangeInfo) -> Self {
        Self { client, info }
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// Last observed status.
    pub fn info(&self) -> &ChangeInfo {
        &self.info
    }

    pub fn into_info(self) -> ChangeInfo {
        self.info
    }

    /// Query the current status once.
    pub async fn refresh(&mut self) -> Result<&ChangeInfo> {
        self.info = self.client.get_change(&self.info.id).await?;
        Ok(&self.info)
    }

    /// Poll every `poll_interval` until the change is in sync, fails to poll,
    /// or `timeout` elapses. Resolves immediately if already in sync.
    pub fn wait_until_synced(&self, poll_interval: Duration, timeout: Duration) -> ChangeWaiter {
        if self.info.is_synced() {
            return ChangeWaiter::ready(self.info.clone());
        }
        self.client
            .wait_for_change(&self.info.id, poll_interval, timeout)
    }
}

/// Single-fire outcome of a change wait.
#[derive(Debug)]
#[must_use = "a waiter does nothing unless awaited"]
pub struct ChangeWaiter {
    change_id: String,
    rx: oneshot::Receiver<Result<ChangeInfo>>,
}

impl ChangeWaiter {
    fn ready(info: ChangeInfo) -> Self {
        Self::settled(info.id.clone(), Ok(info))
    }

    fn settled(change_id: String, outcome: Result<ChangeInfo>) -> Self {
        let (tx, rx) = oneshot::channel();
        // The receiver is alive, so sending cannot fail.
        let _ = tx.send(outcome);
        Self { change_id, rx }
    }

    pub fn change_id(&self) -> &str {
        &self.change_id
    }
}

impl Future for ChangeWaiter {
    type Output = Result<ChangeInfo>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(ClientError::ChangeTrackerGone {
                    change_id: self.change_id.clone(),
                })
            })
        })
    }
}

impl Route53Client {
    /// Track a change by id. See [`PendingChange::wait_until_synced`].
    ///
    /// Outside a tokio runtime nothing can poll, and the waiter resolves to
    /// [`ClientError::ChangeTrackerGone`].
    pub fn wait_for_change(
        &self,
        change_id: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> ChangeWaiter {
        let change_id = crate::api::bare_id(change_id).to_string();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::error!("[route53] cannot track change {change_id}: no tokio runtime");
            return ChangeWaiter::settled(
                change_id.clone(),
                Err(ClientError::ChangeTrackerGone { change_id }),
            );
        };

        let (tx, rx) = oneshot::channel();
        let client = self.clone();
        let every = poll_interval.clamp(MIN_POLL_INTERVAL, MAX_WAIT);
        let deadline = instant_after(timeout);
        let tracked = change_id.clone();

        runtime.spawn(async move {
            let outcome = match timeout_at(deadline, poll_until_synced(&client, &tracked, every)).await
            {
                Ok(result) => result,
                Err(_) => {
                    log::warn!(
                        "[route53] change {tracked} not in sync after {}ms",
                        timeout.as_millis()
                    );
                    Err(ClientError::ChangeSyncTimeout {
                        change_id: tracked.clone(),
                        waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            };
            if tx.send(outcome).is_err() {
                log::debug!("[route53] waiter for change {tracked} dropped before completion");
            }
        });

        ChangeWaiter { change_id, rx }
    }
}

async fn poll_until_synced(
    client: &Route53Client,
    change_id: &str,
    every: Duration,
) -> Result<ChangeInfo> {
    let mut ticker = interval_at(instant_after(every), every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let info = client.get_change(change_id).await?;
        if info.is_synced() {
            log::debug!("[route53] change {change_id} in sync");
            return Ok(info);
        }
        log::debug!("[route53] change {change_id} still {}", info.status);
    }
}
