//! Scoped event subscriptions.
//!
//! This module provides the listener registry shared by the auth provider
//! and the environment hub. Execution is single-threaded and event-driven:
//! every emitted event runs each live listener to completion on the caller's
//! thread, so no locking is involved. Listeners are registered for the
//! lifetime of a [`Subscription`] handle and deregistered when the handle is
//! dropped, which is what lets consuming views release their environment
//! hooks on teardown without leaking.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Boxed listener callback.
type Callback<E> = Box<dyn FnMut(&E)>;

struct Entry<E> {
    id: u64,
    callback: Callback<E>,
}

/// Registry internals. Listener entries are moved out of the cell while an
/// emit is in flight, so `dead` records drops that happen mid-dispatch and
/// freshly subscribed entries accumulate in `entries` until the dispatch
/// merges them back.
struct Registry<E> {
    next_id: u64,
    entries: Vec<Entry<E>>,
    dead: Vec<u64>,
}

/// Erased view of a registry, so `Subscription` does not carry the event
/// type of the set it came from.
trait Detach {
    fn detach(&mut self, id: u64);
}

impl<E> Detach for Registry<E> {
    fn detach(&mut self, id: u64) {
        self.entries.retain(|entry| entry.id != id);
        // The entry may currently be checked out by an in-flight emit;
        // recording the id keeps it from being called again or merged back.
        self.dead.push(id);
    }
}

/// Handle to a registered listener.
///
/// Dropping the handle deregisters the listener. If the originating set has
/// already been dropped, dropping the handle is a no-op.
pub struct Subscription {
    registry: Weak<RefCell<dyn Detach>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Single-threaded set of listeners for one event type.
///
/// Cloning the set produces another handle to the same listeners, which is
/// how an emitter and its subscribers share a registry.
pub struct ListenerSet<E> {
    inner: Rc<RefCell<Registry<E>>>,
}

impl<E> Clone for ListenerSet<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: 'static> Default for ListenerSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> ListenerSet<E> {
    /// Creates an empty listener set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
                dead: Vec::new(),
            })),
        }
    }

    /// Registers a listener and returns the handle that keeps it alive.
    ///
    /// A listener registered while an emit is in flight does not observe the
    /// event currently being dispatched; it sees the next one.
    pub fn subscribe(&self, callback: impl FnMut(&E) + 'static) -> Subscription {
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push(Entry {
                id,
                callback: Box::new(callback),
            });
            id
        };

        let weak = Rc::downgrade(&self.inner);
        let registry: Weak<RefCell<dyn Detach>> = weak;
        Subscription { registry, id }
    }

    /// Delivers an event to every live listener.
    ///
    /// Listeners run to completion, in registration order. A listener that
    /// drops its own (or another) `Subscription` during dispatch suppresses
    /// the dropped listener from that point on. Reentrant emits from inside
    /// a listener see an empty set and deliver nothing.
    pub fn emit(&self, event: &E) {
        let mut checked_out = {
            let mut registry = self.inner.borrow_mut();
            std::mem::take(&mut registry.entries)
        };

        for entry in &mut checked_out {
            let is_dead = self.inner.borrow().dead.contains(&entry.id);
            if !is_dead {
                (entry.callback)(event);
            }
        }

        let mut registry = self.inner.borrow_mut();
        let dead = std::mem::take(&mut registry.dead);
        checked_out.retain(|entry| !dead.contains(&entry.id));
        // Entries subscribed during dispatch landed in the registry; keep
        // them after the checked-out survivors to preserve registration order.
        let added = std::mem::take(&mut registry.entries);
        checked_out.extend(added);
        registry.entries = checked_out;
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns true if no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}
