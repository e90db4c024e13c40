//! Per-type cache of discovered event names.
//!
//! Discovering a subject's events means asking its type for its [`EventSurface`]. Surfaces are
//! a property of the type, so [`DiscoveryCache`] computes each one once and hands out the shared
//! list afterwards.
//!
//! # Lifetime
//!
//! A cache lives as long as its owner. Interceptors built with
//! [`Interceptor::with_cache()`](crate::Interceptor::with_cache) share one cache; interceptors
//! built with [`Interceptor::new()`](crate::Interceptor::new) each get their own. Entries are
//! never evicted.
//!
//! # Thread Safety
//!
//! Lookups are lock-free reads on a `DashMap`. Population goes through the entry API, so two
//! threads discovering the same type at once still compute its surface only once.

use std::{
    any::{TypeId, type_name},
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use dashmap::{DashMap, mapref::entry::Entry};
use log::debug;

use crate::surface::EventSurface;

/// Cache of event names keyed by subject type.
pub struct DiscoveryCache {
    /// Discovered names per subject type.
    names: DashMap<TypeId, Arc<[String]>>,

    /// Number of surfaces computed so far.
    discoveries: AtomicUsize,
}

impl DiscoveryCache {
    /// Create a new, empty cache.
    #[inline]
    pub fn new() -> Self {
        Self {
            names: DashMap::new(),
            discoveries: AtomicUsize::new(0),
        }
    }

    /// Get the event names of subject type `S`, discovering them on first use.
    pub fn event_names<S: EventSurface>(&self) -> Arc<[String]> {
        let type_id = TypeId::of::<S>();

        // Fast path: already discovered (lock-free read)
        if let Some(names) = self.names.get(&type_id) {
            return Arc::clone(names.value());
        }

        // Slow path: the entry holds the shard lock while the surface is computed
        match self.names.entry(type_id) {
            Entry::Occupied(occupied) => Arc::clone(occupied.get()),
            Entry::Vacant(vacant) => {
                let names: Arc<[String]> = S::event_names().into();
                self.discoveries.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Discovered {} event(s) on '{}': {:?}",
                    names.len(),
                    type_name::<S>(),
                    names
                );
                vacant.insert(Arc::clone(&names));
                names
            }
        }
    }

    /// Returns `true` if the surface of `S` has been discovered.
    #[inline]
    pub fn contains<S: EventSurface>(&self) -> bool {
        self.names.contains_key(&TypeId::of::<S>())
    }

    /// Number of times a surface was actually computed.
    #[inline]
    pub fn discoveries(&self) -> usize {
        self.discoveries.load(Ordering::Relaxed)
    }

    /// Number of cached subject types.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the cache is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for DiscoveryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiscoveryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryCache")
            .field("types", &self.names.len())
            .field("discoveries", &self.discoveries())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    static SAVE_LOAD_CALLS: AtomicUsize = AtomicUsize::new(0);

    struct SaveLoad;

    impl EventSurface for SaveLoad {
        fn event_names() -> Vec<String> {
            SAVE_LOAD_CALLS.fetch_add(1, Ordering::SeqCst);
            vec!["onSave".into(), "onLoad".into()]
        }
    }

    struct Click;

    impl EventSurface for Click {
        fn event_names() -> Vec<String> {
            vec!["onClick".into()]
        }
    }

    struct Slow;

    impl EventSurface for Slow {
        fn event_names() -> Vec<String> {
            thread::sleep(std::time::Duration::from_millis(5));
            vec!["onTick".into()]
        }
    }

    // ==================== Discovery ====================

    #[test]
    fn new_cache_is_empty() {
        let cache = DiscoveryCache::new();

        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.discoveries(), 0);
        assert!(!cache.contains::<Click>());
    }

    #[test]
    fn event_names_returns_the_surface() {
        // Given
        let cache = DiscoveryCache::new();

        // When
        let names = cache.event_names::<Click>();

        // Then
        assert_eq!(&*names, &["onClick".to_string()]);
        assert!(cache.contains::<Click>());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn repeated_lookups_discover_once() {
        // Given
        let cache = DiscoveryCache::new();
        let before = SAVE_LOAD_CALLS.load(Ordering::SeqCst);

        // When
        let first = cache.event_names::<SaveLoad>();
        let second = cache.event_names::<SaveLoad>();

        // Then
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.discoveries(), 1);
        assert_eq!(SAVE_LOAD_CALLS.load(Ordering::SeqCst) - before, 1);
    }

    #[test]
    fn each_type_is_discovered_separately() {
        let cache = DiscoveryCache::new();

        cache.event_names::<Click>();
        cache.event_names::<Slow>();
        cache.event_names::<Click>();

        assert_eq!(cache.discoveries(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn separate_caches_do_not_share_entries() {
        let first = DiscoveryCache::new();
        let second = DiscoveryCache::new();

        first.event_names::<Click>();

        assert!(first.contains::<Click>());
        assert!(!second.contains::<Click>());
        assert_eq!(second.discoveries(), 0);
    }

    // ==================== Concurrent Discovery ====================

    #[test]
    fn concurrent_discovery_same_type() {
        // Given
        let cache = Arc::new(DiscoveryCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.event_names::<Slow>())
            })
            .collect();

        // When
        let results = handles
            .into_iter()
            .map(|h| h.join())
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        // Then
        assert_eq!(cache.discoveries(), 1);
        assert!(results.iter().all(|names| Arc::ptr_eq(names, &results[0])));
    }
}
