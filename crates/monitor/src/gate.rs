//! Notification gate
//!
//! Once [`NotifyGate::close`] returns, no delivery is running and none will
//! start. Closing from inside a delivery on the same gate does not wait.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

thread_local! {
    // Address of the gate this thread is currently delivering through
    static DELIVERING: Cell<usize> = const { Cell::new(0) };
}

struct DeliveryMark {
    previous: usize,
}

impl DeliveryMark {
    fn set(gate: usize) -> Self {
        let previous = DELIVERING.with(|d| d.replace(gate));
        Self { previous }
    }
}

impl Drop for DeliveryMark {
    fn drop(&mut self) {
        DELIVERING.with(|d| d.set(self.previous));
    }
}

#[derive(Debug)]
pub(crate) struct NotifyGate {
    open: AtomicBool,
    delivering: Mutex<()>,
}

impl NotifyGate {
    pub(crate) fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
            delivering: Mutex::new(()),
        }
    }

    fn id(&self) -> usize {
        self as *const Self as usize
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.delivering
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Run `deliver` unless the gate is closed. Returns whether it ran.
    pub(crate) fn deliver(&self, deliver: impl FnOnce()) -> bool {
        let _guard = self.lock();
        if !self.is_open() {
            return false;
        }
        let _mark = DeliveryMark::set(self.id());
        deliver();
        true
    }

    /// Close the gate and wait out any delivery in progress
    pub(crate) fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        let reentrant = DELIVERING.with(|d| d.get() == self.id());
        if !reentrant {
            drop(self.lock());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_delivers_while_open() {
        let gate = NotifyGate::new();
        let mut calls = 0;
        assert!(gate.deliver(|| calls += 1));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_nothing_delivered_after_close() {
        let gate = NotifyGate::new();
        gate.close();
        gate.close();

        let mut calls = 0;
        assert!(!gate.deliver(|| calls += 1));
        assert_eq!(calls, 0);
        assert!(!gate.is_open());
    }

    #[test]
    fn test_close_from_inside_delivery() {
        let gate = NotifyGate::new();
        let delivered = gate.deliver(|| gate.close());

        assert!(delivered);
        assert!(!gate.is_open());
    }

    #[test]
    fn test_close_waits_for_running_delivery() {
        let gate = Arc::new(NotifyGate::new());
        let finished = Arc::new(AtomicUsize::new(0));
        let (started_tx, started_rx) = std::sync::mpsc::channel();

        let worker = {
            let gate = gate.clone();
            let finished = finished.clone();
            thread::spawn(move || {
                gate.deliver(|| {
                    started_tx.send(()).unwrap();
                    thread::sleep(Duration::from_millis(50));
                    finished.store(1, Ordering::SeqCst);
                });
            })
        };

        started_rx.recv().unwrap();
        gate.close();
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        worker.join().unwrap();
    }
}
