use std::{
    fmt,
    sync::{Arc, Weak},
};

use log::trace;

use crate::{
    event::{Event, Handler},
    interceptor::Shared,
};

/// Binding between one event of a subject and an interceptor.
///
/// A forwarder is attached as the subject's handler for its event name. When the event fires it
/// hands the event, together with the bound name, to the interceptor. The back-reference is weak:
/// a forwarder never keeps its interceptor alive, and once the interceptor is gone forwarding is
/// a no-op.
pub struct Forwarder<E: Event> {
    interceptor: Weak<Shared<E>>,
    event_name: Arc<str>,
}

impl<E: Event> Forwarder<E> {
    pub(crate) fn new(interceptor: Weak<Shared<E>>, event_name: Arc<str>) -> Self {
        Self {
            interceptor,
            event_name,
        }
    }

    /// The event name this forwarder is bound to.
    #[inline]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Pass `event` on to the interceptor.
    pub fn forward(&self, event: &Arc<E>) {
        match self.interceptor.upgrade() {
            Some(interceptor) => interceptor.intercept(&self.event_name, Arc::clone(event)),
            None => trace!(
                "Dropping '{}': interceptor no longer exists",
                self.event_name
            ),
        }
    }
}

impl<E: Event> Handler<E> for Forwarder<E> {
    #[inline]
    fn handle(&self, event: &Arc<E>) {
        self.forward(event);
    }
}

impl<E: Event> fmt::Debug for Forwarder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forwarder")
            .field("event_name", &self.event_name)
            .field("attached", &(self.interceptor.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::Interceptor;

    struct Tick(u32);
    impl Event for Tick {}

    #[test]
    fn forward_reaches_the_interceptor_with_the_bound_name() {
        // Given
        let interceptor = Interceptor::<Tick>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        interceptor.on_intercepted(move |interception: &Arc<crate::Interception<Tick>>| {
            sink.lock()
                .unwrap()
                .push((interception.event_name().to_owned(), interception.event().0));
        });
        let forwarder = interceptor.forwarder("onTick");

        // When
        forwarder.forward(&Arc::new(Tick(3)));

        // Then
        assert_eq!(forwarder.event_name(), "onTick");
        assert_eq!(*seen.lock().unwrap(), vec![("onTick".to_string(), 3)]);
    }

    #[test]
    fn forwarder_does_not_keep_the_interceptor_alive() {
        // Given
        let interceptor = Interceptor::<Tick>::new();
        let forwarder = interceptor.forwarder("onTick");

        // When
        drop(interceptor);

        // Then
        assert!(format!("{:?}", forwarder).contains("attached: false"));
        // Forwarding into a dropped interceptor is inert
        forwarder.handle(&Arc::new(Tick(1)));
    }
}
