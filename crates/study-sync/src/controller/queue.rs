//! Per-Id Operation Slots
//!
//! At most one remote call per entity id is in flight. Later operations for
//! the same id wait in FIFO order and are woken one at a time as the
//! current holder's guard drops. A wake-up carries the key the slot is held
//! under at hand-over time, which differs from the entered key when a
//! temporary id was confirmed in between.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

#[derive(Default)]
pub(crate) struct KeyedQueue {
    /// Held keys and the wake-ups waiting behind them
    busy: HashMap<String, VecDeque<oneshot::Sender<String>>>,
}

impl KeyedQueue {
    /// Take the slot immediately, or get a receiver that fires when it is ours
    fn enter(&mut self, key: &str) -> Option<oneshot::Receiver<String>> {
        match self.busy.get_mut(key) {
            None => {
                self.busy.insert(key.to_string(), VecDeque::new());
                None
            }
            Some(waiters) => {
                let (tx, rx) = oneshot::channel();
                waiters.push_back(tx);
                Some(rx)
            }
        }
    }

    /// Hand the slot to the next live waiter, or free it
    fn release(&mut self, key: &str) {
        if let Some(waiters) = self.busy.get_mut(key) {
            while let Some(next) = waiters.pop_front() {
                // A dropped receiver means that operation was abandoned
                if next.send(key.to_string()).is_ok() {
                    return;
                }
            }
            self.busy.remove(key);
        }
    }

    /// Move a held slot (and its waiters) to a new key
    fn rename(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        if let Some(mut waiters) = self.busy.remove(from) {
            match self.busy.get_mut(to) {
                Some(existing) => existing.append(&mut waiters),
                None => {
                    self.busy.insert(to.to_string(), waiters);
                }
            }
        }
    }

    pub(crate) fn is_busy(&self, key: &str) -> bool {
        self.busy.contains_key(key)
    }

    pub(crate) fn busy_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.busy.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Shared handle to the queue
#[derive(Clone, Default)]
pub(crate) struct Slots(Rc<RefCell<KeyedQueue>>);

/// How entering a slot resolved
pub(crate) enum Entry {
    Held(SlotGuard),
    Waiting(Turn),
}

impl Slots {
    pub(crate) fn enter(&self, key: &str) -> Entry {
        let waiting = self.0.borrow_mut().enter(key);
        match waiting {
            None => Entry::Held(self.guard(key)),
            Some(rx) => Entry::Waiting(Turn { rx, slots: self.clone() }),
        }
    }

    fn guard(&self, key: &str) -> SlotGuard {
        SlotGuard { slots: self.clone(), key: key.to_string() }
    }

    pub(crate) fn is_busy(&self, key: &str) -> bool {
        self.0.borrow().is_busy(key)
    }

    pub(crate) fn busy_keys(&self) -> Vec<String> {
        self.0.borrow().busy_keys()
    }
}

/// Releases its slot when dropped, including when the owning future is
/// abandoned mid-flight
pub(crate) struct SlotGuard {
    slots: Slots,
    key: String,
}

impl SlotGuard {
    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Follow a temporary id to its server-assigned id
    pub(crate) fn rename(&mut self, to: &str) {
        self.slots.0.borrow_mut().rename(&self.key, to);
        self.key = to.to_string();
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.slots.0.borrow_mut().release(&self.key);
    }
}

/// A place in line. Resolves to the guard once the slot is handed over;
/// dropping it after the hand-over but before it was polled passes the
/// slot on.
pub(crate) struct Turn {
    rx: oneshot::Receiver<String>,
    slots: Slots,
}

impl Future for Turn {
    type Output = Result<SlotGuard, oneshot::Canceled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(key)) => Poll::Ready(Ok(this.slots.guard(&key))),
            Poll::Ready(Err(canceled)) => Poll::Ready(Err(canceled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for Turn {
    fn drop(&mut self) {
        if let Ok(Some(key)) = self.rx.try_recv() {
            self.slots.0.borrow_mut().release(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;

    fn held(slots: &Slots, key: &str) -> SlotGuard {
        match slots.enter(key) {
            Entry::Held(guard) => guard,
            Entry::Waiting(_) => panic!("{} should be free", key),
        }
    }

    fn waiting(slots: &Slots, key: &str) -> Turn {
        match slots.enter(key) {
            Entry::Waiting(turn) => turn,
            Entry::Held(_) => panic!("{} should be busy", key),
        }
    }

    #[test]
    fn test_second_entry_waits_until_release() {
        let slots = Slots::default();
        let first = held(&slots, "t1");
        let mut turn = waiting(&slots, "t1");
        assert!((&mut turn).now_or_never().is_none());

        drop(first);
        let second = (&mut turn).now_or_never().unwrap().unwrap();
        assert_eq!(second.key(), "t1");
        assert!(slots.is_busy("t1"));

        drop(second);
        drop(turn);
        assert!(!slots.is_busy("t1"));
    }

    #[test]
    fn test_abandoned_waiter_is_skipped() {
        let slots = Slots::default();
        let first = held(&slots, "t1");
        let abandoned = waiting(&slots, "t1");
        let mut live = waiting(&slots, "t1");
        drop(abandoned);

        drop(first);
        assert!((&mut live).now_or_never().is_some_and(|guard| guard.is_ok()));
    }

    #[test]
    fn test_turn_dropped_after_handover_frees_slot() {
        let slots = Slots::default();
        let first = held(&slots, "t1");
        let handed = waiting(&slots, "t1");

        // The slot is handed over, but the waiting operation never runs again
        drop(first);
        assert!(slots.is_busy("t1"));
        drop(handed);

        assert!(!slots.is_busy("t1"));
        drop(held(&slots, "t1"));
    }

    #[test]
    fn test_turn_dropped_after_handover_passes_slot_on() {
        let slots = Slots::default();
        let first = held(&slots, "t1");
        let handed = waiting(&slots, "t1");
        let mut next = waiting(&slots, "t1");

        drop(first);
        assert!((&mut next).now_or_never().is_none());
        drop(handed);

        let guard = (&mut next).now_or_never().unwrap().unwrap();
        assert_eq!(guard.key(), "t1");
    }

    #[test]
    fn test_rename_carries_waiters() {
        let slots = Slots::default();
        let mut guard = held(&slots, "local-1");
        let mut turn = waiting(&slots, "local-1");

        guard.rename("abc123");
        assert!(!slots.is_busy("local-1"));
        assert_eq!(slots.busy_keys(), vec!["abc123".to_string()]);

        drop(guard);
        let next = (&mut turn).now_or_never().unwrap().unwrap();
        assert_eq!(next.key(), "abc123");
    }
}
