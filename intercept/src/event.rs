use std::sync::Arc;

/// Marker trait for event payload types.
///
/// Events must be:
/// - `'static`: No borrowed data
/// - `Send + Sync`: Safe to share across threads
///
/// Payloads are passed around as `Arc<E>`, so a handler observes the very object that was
/// fired rather than a copy of it.
pub trait Event: 'static + Send + Sync {}

/// A callback attached to a named event of a subject.
pub trait Handler<E: Event>: Send + Sync {
    /// Called synchronously every time the event fires.
    fn handle(&self, event: &Arc<E>);
}

impl<E, F> Handler<E> for F
where
    E: Event,
    F: Fn(&Arc<E>) + Send + Sync,
{
    #[inline]
    fn handle(&self, event: &Arc<E>) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Ping;
    impl Event for Ping {}

    #[test]
    fn closures_are_handlers() {
        // Given
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler: Arc<dyn Handler<Ping>> = Arc::new(move |_: &Arc<Ping>| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        // When
        handler.handle(&Arc::new(Ping));
        handler.handle(&Arc::new(Ping));

        // Then
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }
}
