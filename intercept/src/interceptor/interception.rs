use std::{any::type_name, fmt, sync::Arc};

use crate::{event::Event, interceptor::InterceptorId};

/// Parameter name under which an interception exposes the intercepted event's name.
pub const INTERCEPTED_EVENT_NAME_PARAM: &str = "interceptedEventName";

/// Parameter name under which an interception exposes the intercepted event object.
pub const INTERCEPTED_EVENT_PARAM: &str = "interceptedEvent";

/// The event an [`Interceptor`](crate::Interceptor) raises for every intercepted firing.
pub struct Interception<E: Event> {
    sender: InterceptorId,
    event_name: Arc<str>,
    event: Arc<E>,
}

/// A typed view of one of the two interception parameters.
#[derive(Debug)]
pub enum Param<'a, E: Event> {
    /// The name of the intercepted event.
    EventName(&'a str),
    /// The intercepted event object.
    Event(&'a Arc<E>),
}

impl<E: Event> Interception<E> {
    pub(crate) fn new(sender: InterceptorId, event_name: Arc<str>, event: Arc<E>) -> Self {
        Self {
            sender,
            event_name,
            event,
        }
    }

    /// The interceptor that raised this event.
    #[inline]
    pub fn sender(&self) -> InterceptorId {
        self.sender
    }

    /// Name of the event that fired on the subject.
    #[inline]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// The object that was fired on the subject.
    #[inline]
    pub fn event(&self) -> &Arc<E> {
        &self.event
    }

    /// Look a parameter up by its canonical name.
    ///
    /// Returns `None` for anything but [`INTERCEPTED_EVENT_NAME_PARAM`] and
    /// [`INTERCEPTED_EVENT_PARAM`].
    pub fn param(&self, name: &str) -> Option<Param<'_, E>> {
        match name {
            INTERCEPTED_EVENT_NAME_PARAM => Some(Param::EventName(&self.event_name)),
            INTERCEPTED_EVENT_PARAM => Some(Param::Event(&self.event)),
            _ => None,
        }
    }

    /// Take the intercepted event object out of the interception.
    pub fn into_event(self) -> Arc<E> {
        self.event
    }
}

impl<E: Event> Event for Interception<E> {}

impl<E: Event> Clone for Interception<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender,
            event_name: Arc::clone(&self.event_name),
            event: Arc::clone(&self.event),
        }
    }
}

impl<E: Event> fmt::Debug for Interception<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interception")
            .field("sender", &self.sender)
            .field("event_name", &self.event_name)
            .field("event", &type_name::<E>())
            .finish()
    }
}
