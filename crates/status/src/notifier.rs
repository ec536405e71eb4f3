//! Status change notification

use std::sync::{Arc, Mutex};

use crate::Status;

/// Receives status changes. Called once per transition, never for a
/// repeat of the current status.
pub trait Notifier: Send + Sync + 'static {
    fn on_status_change(&self, status: Status);
}

impl<F> Notifier for F
where
    F: Fn(Status) + Send + Sync + 'static,
{
    fn on_status_change(&self, status: Status) {
        self(status)
    }
}

/// Notifier that keeps every status it receives, in order
#[derive(Debug, Clone, Default)]
pub struct StatusRecorder {
    received: Arc<Mutex<Vec<Status>>>,
}

impl StatusRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statuses received so far
    pub fn received(&self) -> Vec<Status> {
        self.received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of `status` notifications received
    pub fn count(&self, status: Status) -> usize {
        self.received().iter().filter(|&&s| s == status).count()
    }
}

impl Notifier for StatusRecorder {
    fn on_status_change(&self, status: Status) {
        self.received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closure_notifier() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let notifier = move |_status: Status| {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        notifier.on_status_change(Status::Pause);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recorder_clones_share_log() {
        let recorder = StatusRecorder::new();
        let handle = recorder.clone();

        handle.on_status_change(Status::Pause);
        handle.on_status_change(Status::Normal);

        assert_eq!(recorder.received(), vec![Status::Pause, Status::Normal]);
        assert_eq!(recorder.count(Status::Pause), 1);
    }
}
