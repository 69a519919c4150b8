//! Cancellation token shared between the transport and a content producer.
//!
//! The transport layer detects client disconnection asynchronously, relative
//! to whatever execution context runs the data-producing loop. The token
//! supports both observation modes at once:
//!
//! - **Polling**: the producer calls [`AbortSignal::check`] between reads of
//!   a streaming delivery; once the transport has flagged the abort, the
//!   check fails with [`SinkError::RequestAborted`] and unwinds the loop.
//! - **Push**: a callback registered with [`AbortSignal::set_aborter`] is
//!   invoked exactly once at the abort transition, from the transport's
//!   context. Registration after the abort fires the callback immediately,
//!   so no invocation is lost; re-registration replaces the previous
//!   callback, which is dropped uninvoked.

use crate::protocol::SinkError;
use std::mem;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// Callback invoked at the abort transition. Must not block.
pub type AbortCallback = Box<dyn FnOnce() + Send>;

/// Creates a connected handle/signal pair for one exchange.
///
/// The transport keeps the [`AbortHandle`] and calls
/// [`abort`](AbortHandle::abort) when it detects disconnection; the sink
/// holds the [`AbortSignal`] and exposes it to the producer.
pub fn abort_pair() -> (AbortHandle, AbortSignal) {
    let shared = Arc::new(Shared { aborted: AtomicBool::new(false), slot: Mutex::new(Slot::Idle) });
    (AbortHandle { shared: Arc::clone(&shared) }, AbortSignal { shared })
}

struct Shared {
    aborted: AtomicBool,
    slot: Mutex<Slot>,
}

enum Slot {
    /// No callback registered yet
    Idle,
    /// A callback waiting for the abort transition
    Armed(AbortCallback),
    /// The abort transition happened; any late registration fires directly
    Fired,
}

/// Transport-side half: flags the abort.
#[derive(Clone)]
pub struct AbortHandle {
    shared: Arc<Shared>,
}

impl AbortHandle {
    /// Marks the exchange as aborted and invokes the registered callback, if
    /// any. Only the first call performs the transition; the callback is
    /// never invoked twice.
    pub fn abort(&self) {
        self.shared.aborted.store(true, Ordering::Release);

        let callback = {
            let mut slot = self.shared.slot.lock().expect("abort slot lock poisoned");
            match mem::replace(&mut *slot, Slot::Fired) {
                Slot::Armed(callback) => Some(callback),
                Slot::Idle | Slot::Fired => None,
            }
        };

        // invoked outside the lock: the callback may re-enter set_aborter
        if let Some(callback) = callback {
            trace!("abort detected, invoking aborter callback");
            callback();
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.shared.aborted.load(Ordering::Acquire)
    }
}

/// Producer-side half: polls and registers the push callback.
#[derive(Clone)]
pub struct AbortSignal {
    shared: Arc<Shared>,
}

impl AbortSignal {
    /// Synchronous poll. Fails with [`SinkError::RequestAborted`] once the
    /// transport has flagged disconnection; no side effect otherwise.
    pub fn check(&self) -> Result<(), SinkError> {
        if self.is_aborted() { Err(SinkError::RequestAborted) } else { Ok(()) }
    }

    pub fn is_aborted(&self) -> bool {
        self.shared.aborted.load(Ordering::Acquire)
    }

    /// Registers the abort callback, replacing any previous registration.
    ///
    /// If the abort already happened the callback is invoked immediately on
    /// the calling context.
    pub fn set_aborter(&self, callback: AbortCallback) {
        let fire_now = {
            let mut slot = self.shared.slot.lock().expect("abort slot lock poisoned");
            match &*slot {
                Slot::Fired => Some(callback),
                Slot::Idle | Slot::Armed(_) => {
                    // replaced callback is dropped uninvoked
                    *slot = Slot::Armed(callback);
                    None
                }
            }
        };

        if let Some(callback) = fire_now {
            trace!("aborter registered after abort, invoking immediately");
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn check_passes_until_abort() {
        let (handle, signal) = abort_pair();
        assert!(signal.check().is_ok());
        assert!(!signal.is_aborted());

        handle.abort();

        assert!(matches!(signal.check(), Err(SinkError::RequestAborted)));
        assert!(signal.is_aborted());
        assert!(handle.is_aborted());
    }

    #[test]
    fn callback_fires_exactly_once() {
        let (handle, signal) = abort_pair();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        signal.set_aborter(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        handle.abort();
        handle.abort();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registration_after_abort_fires_immediately() {
        let (handle, signal) = abort_pair();
        handle.abort();

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        signal.set_aborter(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reregistration_replaces_previous_callback() {
        let (handle, signal) = abort_pair();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&first);
        signal.set_aborter(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let counter = Arc::clone(&second);
        signal.set_aborter(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        handle.abort();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_poll_and_abort_sees_single_invocation() {
        for _ in 0..64 {
            let (handle, signal) = abort_pair();
            let fired = Arc::new(AtomicUsize::new(0));

            let counter = Arc::clone(&fired);
            signal.set_aborter(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

            let poller = {
                let signal = signal.clone();
                thread::spawn(move || {
                    while signal.check().is_ok() {
                        thread::yield_now();
                    }
                })
            };
            let aborter = thread::spawn(move || handle.abort());

            poller.join().unwrap();
            aborter.join().unwrap();

            assert_eq!(fired.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn registration_racing_abort_never_loses_the_invocation() {
        for _ in 0..64 {
            let (handle, signal) = abort_pair();
            let fired = Arc::new(AtomicUsize::new(0));

            let registrar = {
                let signal = signal.clone();
                let counter = Arc::clone(&fired);
                thread::spawn(move || {
                    signal.set_aborter(Box::new(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }));
                })
            };
            let aborter = thread::spawn(move || handle.abort());

            registrar.join().unwrap();
            aborter.join().unwrap();

            assert_eq!(fired.load(Ordering::SeqCst), 1);
        }
    }
}
