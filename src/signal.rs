//! Synchronous in-process signals.
//!
//! A [`Signal`] is an ordered list of subscriber closures invoked synchronously
//! in registration order. Subscribing yields a [`Connection`] handle; dropping
//! the handle unsubscribes. A connection can also be *blocked*, which
//! suppresses delivery without unsubscribing — the timing controller blocks its
//! document-commit connection while committing so it does not react to its own
//! commits.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug)]
struct SlotState {
    blocked: Cell<bool>,
    connected: Cell<bool>,
}

type SlotFn<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// Handle owning one subscription to a [`Signal`].
///
/// The subscription stays live for exactly as long as the handle does.
#[derive(Debug)]
pub struct Connection {
    state: Rc<SlotState>,
}

impl Connection {
    /// Suppresses delivery to this subscriber until [`Connection::unblock`].
    pub fn block(&self) {
        self.state.blocked.set(true);
    }

    pub fn unblock(&self) {
        self.state.blocked.set(false);
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.state.blocked.get()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.state.connected.set(false);
    }
}

pub struct Signal<T> {
    slots: RefCell<Vec<(Rc<SlotState>, SlotFn<T>)>>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Signal<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
        }
    }

    /// Registers a subscriber. Delivery order follows registration order.
    pub fn connect(&self, callback: impl FnMut(&T) + 'static) -> Connection {
        let state = Rc::new(SlotState {
            blocked: Cell::new(false),
            connected: Cell::new(true),
        });
        self.slots
            .borrow_mut()
            .push((Rc::clone(&state), Rc::new(RefCell::new(callback))));
        Connection { state }
    }

    /// Invokes every live, unblocked subscriber with `value`.
    ///
    /// The slot list is snapshotted before invocation so subscribers may
    /// connect or drop connections from inside a callback.
    pub fn emit(&self, value: &T) {
        self.slots
            .borrow_mut()
            .retain(|(state, _)| state.connected.get());

        let snapshot: Vec<(Rc<SlotState>, SlotFn<T>)> = self
            .slots
            .borrow()
            .iter()
            .map(|(state, slot)| (Rc::clone(state), Rc::clone(slot)))
            .collect();

        for (state, slot) in snapshot {
            if state.connected.get() && !state.blocked.get() {
                (slot.borrow_mut())(value);
            }
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|(state, _)| state.connected.get())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("slots", &self.len()).finish()
    }
}
