//! Cancellable simulated work.

use std::time::Duration;

use crate::shutdown::Shutdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
    Completed,
    /// Shutdown fired mid-sleep; the flag was re-asserted.
    Interrupted,
}

/// Sleep for `total` on the current task, waking early on shutdown.
///
/// Only this task is suspended. Interruption is not an error: the flag is
/// raised again for upstream observers and the caller carries on.
pub async fn simulate(total: Duration, shutdown: &Shutdown) -> WorkOutcome {
    tokio::select! {
        _ = tokio::time::sleep(total) => WorkOutcome::Completed,
        _ = shutdown.triggered() => {
            shutdown.trigger();
            WorkOutcome::Interrupted
        }
    }
}
