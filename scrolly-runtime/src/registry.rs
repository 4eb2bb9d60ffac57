//! Listener registry shared by every event source in this crate

use crate::Subscription;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct Entry<T> {
    id: u64,
    active: Cell<bool>,
    handler: Box<dyn Fn(&T)>,
}

struct Entries<T> {
    next_id: u64,
    list: Vec<Rc<Entry<T>>>,
}

/// Ordered set of handlers for one kind of event.
///
/// Handlers run in subscription order. `emit` works on a copy of the list,
/// so a handler may subscribe or unsubscribe while an event is being
/// dispatched; a handler removed mid-dispatch is not called.
pub(crate) struct Registry<T> {
    inner: Rc<RefCell<Entries<T>>>,
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Entries {
                next_id: 0,
                list: Vec::new(),
            })),
        }
    }
}

impl<T: 'static> Registry<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut entries = self.inner.borrow_mut();
            let id = entries.next_id;
            entries.next_id += 1;
            entries.list.push(Rc::new(Entry {
                id,
                active: Cell::new(true),
                handler: Box::new(handler),
            }));
            id
        };

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let removed = {
                let mut entries = inner.borrow_mut();
                let pos = entries.list.iter().position(|e| e.id == id);
                pos.map(|pos| entries.list.remove(pos))
            };
            // Dropped outside the borrow: the handler may own other subscriptions.
            if let Some(entry) = removed {
                entry.active.set(false);
            }
        })
    }

    pub(crate) fn emit(&self, value: &T) {
        let snapshot: Vec<Rc<Entry<T>>> = self.inner.borrow().list.clone();
        for entry in snapshot {
            if entry.active.get() {
                (entry.handler)(value);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.borrow().list.len()
    }
}
