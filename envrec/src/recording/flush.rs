//! Periodic flushing of the recording file.
//!
//! Bounds data loss on a crash or storage failure to one interval of writes,
//! independent of how fast envelopes arrive.

use log::{debug, info};
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use super::target::SharedTarget;
use crate::storage::Storage;
use crate::transport::Liveness;

pub struct FlushScheduler<S: Storage> {
    target: SharedTarget<S>,
    liveness: Liveness,
    interval: Duration,
}

impl<S: Storage> FlushScheduler<S> {
    pub fn new(target: SharedTarget<S>, liveness: Liveness, interval: Duration) -> Self {
        Self {
            target,
            liveness,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Flush every interval until `shutdown` completes or the session stops
    /// running, with one last flush on the way out. Closing is left to the
    /// recorder, which may still be draining queued envelopes.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        debug!("Flush scheduler started, interval {:?}", self.interval);
        tokio::pin!(shutdown);

        let mut timer = interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Flush scheduler: shutdown requested");
                    break;
                }
                _ = timer.tick() => {
                    if !self.liveness.is_running() {
                        info!("Session is no longer running");
                        break;
                    }
                    self.target.flush();
                }
            }
        }

        self.target.flush();
    }
}
