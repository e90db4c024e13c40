//! Named-event handler registry.
//!
//! This module provides [`Component`], a minimal implementation of the [`Subject`] contract:
//! handlers are attached by event name and invoked synchronously, in attachment order, when
//! the event is raised.
//!
//! # Re-entrancy
//!
//! [`raise()`](Component::raise) snapshots the handler list and releases its lock before any
//! handler runs. Handlers may therefore attach further handlers or raise further events on the
//! same component. Handlers attached during a dispatch only see later firings.
//!
//! # Example
//!
//! ```rust,ignore
//! let component = Component::<SaveEvent>::new();
//!
//! component.attach("onSave", |event: &Arc<SaveEvent>| println!("saved {}", event.path));
//!
//! component.raise("onSave", Arc::new(SaveEvent { path: "a.txt".into() }));
//! ```

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use log::trace;

use crate::{
    component::Subject,
    event::{Event, Handler},
};

/// Handler registry for the named events of a single subject.
///
/// Event names are matched exactly (case-sensitive). Any name is accepted; a name nobody
/// raises just keeps its handlers idle.
pub struct Component<E: Event> {
    /// Attached handlers keyed by event name, in attachment order.
    handlers: RwLock<HashMap<String, Vec<Arc<dyn Handler<E>>>>>,
}

impl<E: Event> Component<E> {
    /// Creates a component with no handlers attached.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Attach `handler` to the event named `event_name`.
    ///
    /// Attaching the same handler twice registers it twice.
    pub fn attach(&self, event_name: &str, handler: impl Handler<E> + 'static) {
        self.attach_shared(event_name, Arc::new(handler));
    }

    /// Attach an already shared handler to the event named `event_name`.
    pub fn attach_shared(&self, event_name: &str, handler: Arc<dyn Handler<E>>) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers
            .entry(event_name.to_owned())
            .or_default()
            .push(handler);
    }

    /// Raise the event named `event_name`, invoking every attached handler with `event`.
    ///
    /// Returns the number of handlers invoked.
    pub fn raise(&self, event_name: &str, event: Arc<E>) -> usize {
        let handlers: Vec<Arc<dyn Handler<E>>> = {
            let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            match handlers.get(event_name) {
                Some(attached) => attached.clone(),
                None => return 0,
            }
        };

        trace!(
            "Raising '{}' to {} handler(s)",
            event_name,
            handlers.len()
        );
        for handler in &handlers {
            handler.handle(&event);
        }
        handlers.len()
    }

    /// Returns the number of handlers attached to `event_name`.
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_name)
            .map_or(0, Vec::len)
    }

    /// Returns `true` if at least one handler is attached to `event_name`.
    #[inline]
    pub fn has_handlers(&self, event_name: &str) -> bool {
        self.handler_count(event_name) > 0
    }

    /// Returns the names that have handlers attached, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = handlers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl<E: Event> Default for Component<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for Component<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let mut map = f.debug_map();
        for (name, attached) in handlers.iter() {
            map.entry(name, &attached.len());
        }
        map.finish()
    }
}

impl<E: Event> Subject for Component<E> {
    type Event = E;

    fn attach_handler(&self, event_name: &str, handler: Arc<dyn Handler<E>>) {
        self.attach_shared(event_name, handler);
    }
}
