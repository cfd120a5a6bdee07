//! Cooldown port — the quiescent wait after an accepted command.

use std::future::Future;
use std::time::Duration;

/// Waits out the relay quiescent interval.
///
/// The dispatcher awaits this on its only processing path, so no other command
/// is handled until it completes.
pub trait Cooldown: Send + Sync {
    fn wait(&self, period: Duration) -> impl Future<Output = ()> + Send;
}

impl<T: Cooldown> Cooldown for std::sync::Arc<T> {
    fn wait(&self, period: Duration) -> impl Future<Output = ()> + Send {
        (**self).wait(period)
    }
}
