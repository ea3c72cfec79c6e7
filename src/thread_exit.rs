//! Process-wide callback run as a runtime-managed thread shuts down.
//!
//! The host's thread-detach hook calls [`ThreadExitSlot::notify_thread_exit`] on
//! the exiting thread, before the OS thread is released, so the runtime can
//! tear down its per-thread state.

use spin::Mutex;

pub type ThreadExitCallback = extern "C" fn();

/// Holds at most one callback. Setting a new one replaces the old one; callers
/// that need several must chain them themselves.
pub struct ThreadExitSlot {
    callback: Mutex<Option<ThreadExitCallback>>,
}

impl ThreadExitSlot {
    pub const fn new() -> Self {
        ThreadExitSlot {
            callback: Mutex::new(None),
        }
    }

    /// Installs `callback`, returning the one it replaced.
    pub fn set(&self, callback: ThreadExitCallback) -> Option<ThreadExitCallback> {
        let previous = self.callback.lock().replace(callback);
        if previous.is_some() {
            debug!("thread exit callback replaced");
        }
        previous
    }

    pub fn clear(&self) -> Option<ThreadExitCallback> {
        self.callback.lock().take()
    }

    pub fn get(&self) -> Option<ThreadExitCallback> {
        *self.callback.lock()
    }

    /// Runs the callback on the calling thread. Returns whether one was set.
    pub fn notify_thread_exit(&self) -> bool {
        // released before the call so the callback may touch the slot
        let callback = self.get();
        match callback {
            Some(callback) => {
                trace!("running thread exit callback");
                callback();
                true
            }
            None => false,
        }
    }
}

impl Default for ThreadExitSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FIRST: AtomicUsize = AtomicUsize::new(0);
    static SECOND: AtomicUsize = AtomicUsize::new(0);

    extern "C" fn first() {
        FIRST.fetch_add(1, Ordering::SeqCst);
    }

    extern "C" fn second() {
        SECOND.fetch_add(1, Ordering::SeqCst);
    }

    static REENTRANT_SLOT: ThreadExitSlot = ThreadExitSlot::new();
    static REENTRANT_RUNS: AtomicUsize = AtomicUsize::new(0);

    extern "C" fn clears_itself() {
        REENTRANT_RUNS.fetch_add(1, Ordering::SeqCst);
        REENTRANT_SLOT.clear();
    }

    #[test]
    fn empty_slot_does_nothing() {
        let slot = ThreadExitSlot::new();
        assert!(!slot.notify_thread_exit());
    }

    #[test]
    fn last_write_wins() {
        let slot = ThreadExitSlot::new();
        assert!(slot.set(first).is_none());
        assert!(slot.set(second).is_some());
        assert!(slot.notify_thread_exit());
        assert_eq!(FIRST.load(Ordering::SeqCst), 0);
        assert_eq!(SECOND.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn runs_on_the_exiting_thread() {
        static RUNS: AtomicUsize = AtomicUsize::new(0);
        extern "C" fn count() {
            RUNS.fetch_add(1, Ordering::SeqCst);
        }

        static SLOT: ThreadExitSlot = ThreadExitSlot::new();
        SLOT.set(count);
        let workers: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| SLOT.notify_thread_exit()))
            .collect();
        for worker in workers {
            assert!(worker.join().unwrap());
        }
        assert_eq!(RUNS.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn callback_may_clear_the_slot() {
        REENTRANT_SLOT.set(clears_itself);
        assert!(REENTRANT_SLOT.notify_thread_exit());
        assert!(!REENTRANT_SLOT.notify_thread_exit());
        assert_eq!(REENTRANT_RUNS.load(Ordering::SeqCst), 1);
    }
}
