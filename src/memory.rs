// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory history stack.
use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt::{self, Debug};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::traits::{History, Location, PopStateTarget};

type Listener = Rc<RefCell<Box<dyn FnMut(&str)>>>;

/// Handle of a listener registered on a [`MemoryHistory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Inner {
    entries: Vec<Location>,
    index: usize,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

/// History stack kept in memory, behaving like the browser's session history.
///
/// Pushing discards all entries ahead of the current one and does not fire popstate. Moving
/// through the stack with [`back`], [`forward`] or [`go`] fires popstate on every registered
/// listener with the query string of the entry navigated to.
///
/// Clones share the same stack. Not thread-safe, like the browser history it stands in for.
///
/// [`back`]: MemoryHistory::back
/// [`forward`]: MemoryHistory::forward
/// [`go`]: MemoryHistory::go
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                entries: vec![initial],
                index: 0,
                listeners: Vec::new(),
                next_listener_id: 0,
            })),
        }
    }

    /// The current entry.
    pub fn location(&self) -> Location {
        let inner = self.inner.borrow();
        inner.entries[inner.index].clone()
    }

    /// Number of entries on the stack, including ones ahead of the current entry.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Position of the current entry.
    pub fn index(&self) -> usize {
        self.inner.borrow().index
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Move `delta` entries through the stack. Returns `false` without firing popstate when the
    /// target lies outside the stack or `delta` is zero.
    pub fn go(&self, delta: isize) -> bool {
        let search = {
            let mut inner = self.inner.borrow_mut();
            let target = match inner.index.checked_add_signed(delta) {
                Some(target) if delta != 0 && target < inner.entries.len() => target,
                _ => return false,
            };
            inner.index = target;
            inner.entries[target].search.clone()
        };

        self.dispatch(&search);
        true
    }

    fn dispatch(&self, search: &str) {
        // Listeners may push or (un)register listeners, no borrow is held while they run.
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        trace!(search, listeners = listeners.len(), "dispatch popstate");

        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut listener) => (*listener)(search),
                // Navigation triggered from inside a listener does not re-enter that listener.
                Err(_) => trace!("skip listener already handling popstate"),
            }
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(Location::new("/", ""))
    }
}

impl History for MemoryHistory {
    type Error = Infallible;

    fn push(&mut self, location: Location) -> Result<(), Self::Error> {
        let mut inner = self.inner.borrow_mut();
        let next = inner.index + 1;
        inner.entries.truncate(next);
        inner.entries.push(location);
        inner.index = next;
        Ok(())
    }
}

impl PopStateTarget for MemoryHistory {
    type ListenerId = ListenerId;

    fn add_popstate_listener(&self, listener: Box<dyn FnMut(&str)>) -> Self::ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_listener_id);
        inner.next_listener_id += 1;
        inner.listeners.push((id, Rc::new(RefCell::new(listener))));
        id
    }

    fn remove_popstate_listener(&self, id: Self::ListenerId) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);

        if inner.listeners.len() == before {
            debug!(?id, "popstate listener was not registered");
        }
    }
}

impl Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryHistory")
            .field("entries", &inner.entries)
            .field("index", &inner.index)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
