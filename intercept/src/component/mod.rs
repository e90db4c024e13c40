pub mod bus;

use std::sync::Arc;

pub use bus::Component;

use crate::event::{Event, Handler};

/// Anything that fires named events and lets callers attach handlers to them.
///
/// This is the only capability an [`Interceptor`](crate::Interceptor) needs from a subject.
/// Firing events belongs to the subject and its framework; interceptors never raise on a
/// subject.
///
/// Attaching a handler to a name the subject never fires must be accepted; the handler simply
/// stays inert.
pub trait Subject: 'static {
    /// The payload type of every event this subject fires.
    type Event: Event;

    /// Register `handler` to be invoked whenever the event named `event_name` fires.
    fn attach_handler(&self, event_name: &str, handler: Arc<dyn Handler<Self::Event>>);
}
