use birzha_core::BirzhaError;
use tokio::task::JoinHandle;

/// Events a background load run sends to the foreground.
///
/// The worker never touches foreground state directly; everything it has to
/// say travels through the event channel, and the combined result arrives
/// exactly once as `Finished`.
#[derive(Debug)]
pub enum LoadEvent<T> {
    /// One instrument finished its fetch/normalize step.
    Fetched {
        /// Display symbol of the instrument.
        symbol: String,
        /// Rows the instrument contributed.
        rows: usize,
    },
    /// The whole run completed with this outcome.
    Finished(Result<T, BirzhaError>),
}

/// Handle to an in-flight background load.
///
/// Dropping the handle aborts the task if it is still running; a load cannot
/// be restarted or re-joined, so one handle maps to exactly one run.
pub struct LoadHandle {
    inner: Option<JoinHandle<()>>,
}

impl LoadHandle {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self {
            inner: Some(handle),
        }
    }

    /// True once the background task has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the background task to finish.
    pub async fn join(mut self) {
        if let Some(handle) = self.inner.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.take()
            && !handle.is_finished()
        {
            handle.abort();
        }
    }
}
