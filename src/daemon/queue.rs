//! Debounced, coalescing update queue.
//!
//! Requests are buffered for a debounce window and then dispatched together.
//! Requests for the same element never queue twice: a more demanding request
//! replaces a buffered one, a less demanding one is absorbed by it, and two
//! incomparable requests merge into one that does both. Pending work is never
//! downgraded.
//!
//! The queue is plain data; the dispatcher owns the clock and decides when
//! to call [`UpdateQueue::take_all`].

use std::time::Duration;

use indexmap::IndexMap;
use tokio::time::Instant;
use tracing::trace;

use crate::base::StructuralElement;

/// What to recompute for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest<E> {
    pub element: E,
    pub check: bool,
    pub collect_usages: bool,
    /// Position of the newest request folded into this one.
    pub seq: u64,
}

impl<E: StructuralElement> UpdateRequest<E> {
    pub fn new(element: E, check: bool, collect_usages: bool, seq: u64) -> Self {
        Self {
            element,
            check,
            collect_usages,
            seq,
        }
    }

    /// Whether this request does at least everything `other` does.
    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.element == other.element
            && (self.check || !other.check)
            && (self.collect_usages || !other.collect_usages)
    }

    /// Whether there is anything to do at all.
    pub fn is_empty(&self) -> bool {
        !self.check && !self.collect_usages
    }
}

/// How a request was absorbed into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coalesced {
    /// No request for the element was buffered.
    Queued,
    /// The buffered request already covered the new one.
    Absorbed,
    /// The new request covered the buffered one and took its place.
    Replaced,
    /// Neither covered the other; the buffered request now does both.
    Merged,
}

/// Buffer of pending requests, keyed by element, in first-request order.
#[derive(Debug)]
pub struct UpdateQueue<E> {
    pending: IndexMap<E, UpdateRequest<E>>,
    debounce: Duration,
    restart_timer_on_add: bool,
    deadline: Option<Instant>,
    active: bool,
}

impl<E: StructuralElement> UpdateQueue<E> {
    pub fn new(debounce: Duration, restart_timer_on_add: bool) -> Self {
        Self {
            pending: IndexMap::new(),
            debounce,
            restart_timer_on_add,
            deadline: None,
            active: true,
        }
    }

    /// Buffer `request`, coalescing with any pending request for the same element.
    pub fn queue(&mut self, request: UpdateRequest<E>, now: Instant) -> Coalesced {
        if self.deadline.is_none() || self.restart_timer_on_add {
            self.deadline = Some(now + self.debounce);
        }

        if let Some(buffered) = self.pending.get_mut(&request.element) {
            let outcome = if buffered.is_superset_of(&request) {
                Coalesced::Absorbed
            } else if request.is_superset_of(buffered) {
                Coalesced::Replaced
            } else {
                Coalesced::Merged
            };
            buffered.check |= request.check;
            buffered.collect_usages |= request.collect_usages;
            buffered.seq = buffered.seq.max(request.seq);
            trace!(
                "[QUEUE] {:?}: {:?} -> check={} usages={}",
                buffered.element, outcome, buffered.check, buffered.collect_usages
            );
            return outcome;
        }

        self.pending.insert(request.element.clone(), request);
        Coalesced::Queued
    }

    /// When the buffered requests are due, if any are buffered and the queue is active.
    pub fn deadline(&self) -> Option<Instant> {
        if self.active && !self.pending.is_empty() {
            self.deadline
        } else {
            None
        }
    }

    /// Drain every buffered request, in first-request order, dropping empty ones.
    pub fn take_all(&mut self) -> Vec<UpdateRequest<E>> {
        self.deadline = None;
        self.pending
            .drain(..)
            .map(|(_, request)| request)
            .filter(|request| !request.is_empty())
            .collect()
    }

    /// Drop the buffered request for `element`, if any.
    pub fn remove(&mut self, element: &E) -> Option<UpdateRequest<E>> {
        let removed = self.pending.shift_remove(element);
        if self.pending.is_empty() {
            self.deadline = None;
        }
        removed
    }

    /// Drop everything buffered.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.deadline = None;
    }

    /// Stop dispatching. Requests keep being buffered.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Resume dispatching; buffered requests get a fresh window.
    pub fn activate(&mut self, now: Instant) {
        self.active = true;
        if !self.pending.is_empty() {
            self.deadline = Some(now + self.debounce);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn get(&self, element: &E) -> Option<&UpdateRequest<E>> {
        self.pending.get(element)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
