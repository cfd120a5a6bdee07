//! Tokio-backed cooldown.

use std::future::Future;
use std::time::Duration;

use crate::ports::Cooldown;

/// [`Cooldown`] that sleeps on the tokio timer.
///
/// Tests can pause the tokio clock to make the wait instantaneous.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepCooldown;

impl Cooldown for SleepCooldown {
    fn wait(&self, period: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(period)
    }
}
