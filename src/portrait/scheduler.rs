//! Tick Scheduling
//!
//! The host owns the clock. The animator asks for a tick after a delay and
//! gets a `TickHandle` back; when the host fires that handle it calls
//! `Animator::tick`. At most one handle per animator is pending at a time.
//!
//! `ManualScheduler` is a host-side timer queue: clones share the same
//! queue, so the host keeps one clone and hands another to the animator.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Identifier of a scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host animation-frame primitive
pub trait Scheduler {
    /// Request a tick after `delay`
    fn schedule(&mut self, delay: Duration) -> TickHandle;

    /// Cancel a pending tick; cancelling a fired or unknown handle is a no-op
    fn cancel(&mut self, handle: TickHandle);
}

#[derive(Debug, Default)]
struct Queue {
    next_id: u64,
    /// Pending ticks in request order
    pending: Vec<(TickHandle, Duration)>,
    /// Every delay ever requested
    requested: Vec<Duration>,
    cancelled: usize,
}

/// Single-threaded timer queue drained by the host
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the next pending tick, if any
    pub fn fire_next(&self) -> Option<(TickHandle, Duration)> {
        let mut queue = self.queue.borrow_mut();
        if queue.pending.is_empty() {
            None
        } else {
            Some(queue.pending.remove(0))
        }
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Delays of every tick requested so far
    pub fn requested_delays(&self) -> Vec<Duration> {
        self.queue.borrow().requested.clone()
    }

    pub fn cancelled_count(&self) -> usize {
        self.queue.borrow().cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TickHandle {
        let mut queue = self.queue.borrow_mut();
        let handle = TickHandle(queue.next_id);
        queue.next_id += 1;
        queue.pending.push((handle, delay));
        queue.requested.push(delay);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        let mut queue = self.queue.borrow_mut();
        let before = queue.pending.len();
        queue.pending.retain(|(h, _)| *h != handle);
        if queue.pending.len() < before {
            queue.cancelled += 1;
        }
    }
}
