// src/quiz/timer.rs

use std::time::Duration;

use tokio::task::JoinHandle;

/// A cancelable delayed callback.
///
/// The callback runs on a spawned tokio task after `delay`. Cancelling, or
/// dropping the timer, aborts the task; a cancelled timer never fires.
#[derive(Debug)]
pub struct FeedbackTimer {
    handle: Option<JoinHandle<()>>,
}

impl FeedbackTimer {
    pub fn schedule<F>(delay: Duration, fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire();
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for FeedbackTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
