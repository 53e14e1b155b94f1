use core::future::poll_fn;
use core::task::Poll;

use embassy_sync::waitqueue::AtomicWaker;

/// Carries a wake from interrupt context to one suspended task.
///
/// Single-consumer: at most one task may be inside [`wait_until`] at a
/// time (a later registration replaces the earlier waker). Callers that
/// can have multiple readers must serialize them, e.g. behind a read
/// lock.
///
/// [`wait_until`]: ReadyWait::wait_until
pub struct ReadyWait {
    waker: AtomicWaker,
}

impl ReadyWait {
    pub const fn new() -> Self {
        Self {
            waker: AtomicWaker::new(),
        }
    }

    /// Wake the registered waiter, if any. Safe from interrupt context:
    /// never blocks, never allocates.
    pub fn notify(&self) {
        self.waker.wake();
    }

    /// Suspend until `ready()` returns true.
    ///
    /// The predicate is checked once before the first suspension and again
    /// on every wake, so a condition that became true between the caller's
    /// last check and this call is caught immediately, and spurious wakes
    /// are tolerated. Registration happens before each check: a
    /// [`notify`](ReadyWait::notify) that lands after a waiter registered
    /// re-polls that waiter, so it is never lost.
    pub async fn wait_until(&self, mut ready: impl FnMut() -> bool) {
        poll_fn(|cx| {
            // Register first, then check. The other order loses a notify
            // that fires between the check and the registration.
            self.waker.register(cx.waker());
            if ready() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }
}

impl Default for ReadyWait {
    fn default() -> Self {
        Self::new()
    }
}
