// In-flight latch: at most one outbound request per synchronizer

use std::sync::atomic::{AtomicU64, Ordering};

const IDLE: u64 = 0;

/// Latch held while a request is outstanding.
///
/// The holder is identified by a ticket so that a guard released after a
/// forced reset cannot free a latch that a newer request has since taken.
#[derive(Debug)]
pub struct InFlightLatch {
    holder: AtomicU64,
    next_ticket: AtomicU64,
}

impl InFlightLatch {
    pub fn new() -> Self {
        Self {
            holder: AtomicU64::new(IDLE),
            next_ticket: AtomicU64::new(1),
        }
    }

    /// Take the latch, or `None` if another request holds it
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.holder
            .compare_exchange(IDLE, ticket, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                latch: self,
                ticket,
            })
    }

    pub fn is_held(&self) -> bool {
        self.holder.load(Ordering::Acquire) != IDLE
    }

    /// Free the latch regardless of who holds it
    pub fn force_release(&self) {
        if self.holder.swap(IDLE, Ordering::AcqRel) != IDLE {
            log::debug!("In-flight latch force-released");
        }
    }
}

impl Default for InFlightLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the latch on drop, including when the request future is cancelled
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    latch: &'a InFlightLatch,
    ticket: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        // Only release if this guard still owns the latch
        let _ = self.latch.holder.compare_exchange(
            self.ticket,
            IDLE,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}
