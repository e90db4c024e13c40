//! Re-raising a subject's events as a single interception event.
//!
//! An [`Interceptor`] attaches one [`Forwarder`] per event name to a subject. Whenever one of
//! those events fires, the forwarder calls [`Interceptor::intercept()`], which raises
//! [`INTERCEPTED`] on the interceptor itself with an [`Interception`] describing the firing.
//!
//! ```text
//! subject.raise("onSave", e) -> Forwarder("onSave") -> intercept("onSave", e)
//!                                                    -> raise(INTERCEPTED, Interception)
//! ```
//!
//! Everything happens synchronously on the stack of the original firing.
//!
//! # Duplicate Registration
//!
//! Initializing the same subject twice with overlapping event names attaches a second forwarder
//! for each shared name: every firing of such an event is then intercepted twice. Nothing is
//! deduplicated; a warning is logged when it happens.
//!
//! # Re-entrancy
//!
//! A listener that fires events on an intercepted subject causes nested interceptions. The
//! nesting depth per interceptor and thread is bounded by [`Config::max_depth`]; interceptions
//! beyond it are dropped with a warning instead of recursing further.

pub mod forwarder;
pub mod interception;

use std::{
    any::{TypeId, type_name},
    cell::RefCell,
    collections::HashMap,
    fmt,
    sync::{
        Arc, Mutex, PoisonError, Weak,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
};

use log::{debug, trace, warn};

pub use forwarder::Forwarder;
pub use interception::{
    INTERCEPTED_EVENT_NAME_PARAM, INTERCEPTED_EVENT_PARAM, Interception, Param,
};

use crate::{
    cache::DiscoveryCache,
    component::{Component, Subject},
    config::{Config, WILDCARD},
    error::{Error, Result},
    event::{Event, Handler},
    surface::EventSurface,
};

/// Name of the event an interceptor raises on itself.
pub const INTERCEPTED: &str = "onEventIntercepted";

/// Identifies an interceptor, e.g. as the sender of an [`Interception`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterceptorId(u64);

impl InterceptorId {
    /// Construct a new Id from a raw u64 value.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocate the next process-unique id.
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for InterceptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interceptor#{}", self.0)
    }
}

/// Which events of a subject to intercept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every event on the subject's [`EventSurface`].
    #[default]
    All,
    /// Exactly these names, used verbatim.
    Only(Vec<String>),
}

impl Selection {
    /// Build a selection from a list of names. A list consisting of exactly [`WILDCARD`]
    /// selects all events; any other list, even one containing the wildcard among other names,
    /// is taken literally.
    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().to_owned())
            .collect();
        if Self::is_wildcard(&names) {
            Selection::All
        } else {
            Selection::Only(names)
        }
    }

    fn is_wildcard(names: &[String]) -> bool {
        matches!(names, [only] if only == WILDCARD)
    }
}

impl<N: AsRef<str>> FromIterator<N> for Selection {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self::from_names(iter)
    }
}

/// Identity of one (subject type, subject address, event name) registration.
///
/// An address alone is ambiguous: a struct and its first field share one, and a dropped
/// subject's address is reused by later ones. Entries therefore also track the forwarders they
/// attached, and only count while those forwarders are still held by the subject.
type RegistrationKey = (TypeId, usize, Arc<str>);

fn registration_key<S: Subject>(subject: &S, event_name: &str) -> RegistrationKey {
    let address = (subject as *const S).cast::<()>() as usize;
    (TypeId::of::<S>(), address, Arc::from(event_name))
}

/// State shared between an interceptor and its forwarders.
pub(crate) struct Shared<E: Event> {
    id: InterceptorId,
    config: Config,
    /// Listeners of the interceptor's own [`INTERCEPTED`] event.
    component: Component<Interception<E>>,
    /// Forwarders attached per subject instance and event name.
    registrations: Mutex<HashMap<RegistrationKey, Vec<Weak<Forwarder<E>>>>>,
    attached: AtomicUsize,
}

impl<E: Event> Shared<E> {
    pub(crate) fn intercept(&self, event_name: &Arc<str>, event: Arc<E>) {
        let Some(_guard) = DepthGuard::enter(self.id, self.config.max_depth) else {
            warn!(
                "{}: dropping '{}', nesting exceeds {} interception(s)",
                self.id,
                event_name,
                self.config.max_depth.unwrap_or_default()
            );
            return;
        };

        trace!("{}: intercepted '{}'", self.id, event_name);
        let interception = Interception::new(self.id, Arc::clone(event_name), event);
        self.component.raise(INTERCEPTED, Arc::new(interception));
    }

    /// Record `forwarder` under `key`, returning how many live forwarders were there before.
    ///
    /// Entries whose forwarders were all dropped along with their subject are pruned.
    fn register(&self, key: RegistrationKey, forwarder: &Arc<Forwarder<E>>) -> usize {
        self.attached.fetch_add(1, Ordering::Relaxed);
        let mut registrations = self
            .registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        registrations.retain(|_, forwarders| {
            forwarders.retain(|forwarder| forwarder.strong_count() > 0);
            !forwarders.is_empty()
        });
        let forwarders = registrations.entry(key).or_default();
        let previous = forwarders.len();
        forwarders.push(Arc::downgrade(forwarder));
        previous
    }

    /// Number of live forwarders recorded under `key`.
    fn registered(&self, key: &RegistrationKey) -> usize {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map_or(0, |forwarders| {
                forwarders
                    .iter()
                    .filter(|forwarder| forwarder.strong_count() > 0)
                    .count()
            })
    }
}

thread_local! {
    /// Current interception depth per interceptor on this thread.
    static DEPTH: RefCell<HashMap<InterceptorId, usize>> = RefCell::new(HashMap::new());
}

/// Tracks one level of interception nesting; released on drop.
struct DepthGuard {
    id: InterceptorId,
}

impl DepthGuard {
    fn enter(id: InterceptorId, max_depth: Option<usize>) -> Option<Self> {
        DEPTH.with(|depths| {
            let mut depths = depths.borrow_mut();
            let depth = depths.entry(id).or_insert(0);
            if let Some(max_depth) = max_depth
                && *depth >= max_depth
            {
                return None;
            }
            *depth += 1;
            Some(Self { id })
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depths| {
            let mut depths = depths.borrow_mut();
            if let Some(depth) = depths.get_mut(&self.id) {
                *depth -= 1;
                if *depth == 0 {
                    depths.remove(&self.id);
                }
            }
        });
    }
}

/// Channel listener behind [`Interceptor::subscribe()`].
struct Subscription<E: Event> {
    sender: crossbeam::channel::Sender<Interception<E>>,
    /// Set once the receiver is gone; later interceptions are not cloned any more.
    disconnected: AtomicBool,
}

impl<E: Event> Subscription<E> {
    fn new(sender: crossbeam::channel::Sender<Interception<E>>) -> Self {
        Self {
            sender,
            disconnected: AtomicBool::new(false),
        }
    }

    fn is_connected(&self) -> bool {
        !self.disconnected.load(Ordering::Relaxed)
    }
}

impl<E: Event> Handler<Interception<E>> for Subscription<E> {
    fn handle(&self, interception: &Arc<Interception<E>>) {
        if !self.is_connected() {
            return;
        }
        if self.sender.send(Interception::clone(interception)).is_err() {
            trace!("Subscription receiver dropped; no longer delivering");
            self.disconnected.store(true, Ordering::Relaxed);
        }
    }
}

/// Forwards the events of any number of subjects as [`INTERCEPTED`] events.
///
/// The interceptor is itself a [`Subject`]: listeners are attached to [`INTERCEPTED`] through
/// [`on_intercepted()`](Self::on_intercepted), [`subscribe()`](Self::subscribe) or
/// [`Subject::attach_handler()`], and one interceptor can be intercepted by another.
///
/// # Discovery
///
/// Intercepting all events of a subject requires its type to implement [`EventSurface`]. Names
/// are resolved through the interceptor's [`DiscoveryCache`], so the surface of a type is
/// computed once however many instances are initialized.
pub struct Interceptor<E: Event> {
    shared: Arc<Shared<E>>,
    cache: Arc<DiscoveryCache>,
}

impl<E: Event> Interceptor<E> {
    /// Create an interceptor with its own discovery cache and the default configuration.
    pub fn new() -> Self {
        Self::build(Arc::new(DiscoveryCache::new()), Config::default())
    }

    /// Create an interceptor sharing `cache` with other interceptors.
    pub fn with_cache(cache: Arc<DiscoveryCache>) -> Self {
        Self::build(cache, Config::default())
    }

    /// Create an interceptor with its own discovery cache and the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self::build(Arc::new(DiscoveryCache::new()), config)
    }

    /// Create an interceptor from an explicit cache and configuration.
    pub fn build(cache: Arc<DiscoveryCache>, config: Config) -> Self {
        let shared = Arc::new(Shared {
            id: InterceptorId::next(),
            config,
            component: Component::new(),
            registrations: Mutex::new(HashMap::new()),
            attached: AtomicUsize::new(0),
        });
        Self { shared, cache }
    }

    /// The id carried as sender by every interception this interceptor raises.
    #[inline]
    pub fn id(&self) -> InterceptorId {
        self.shared.id
    }

    /// The configuration this interceptor was built with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// The discovery cache used for wildcard initialization.
    #[inline]
    pub fn cache(&self) -> &Arc<DiscoveryCache> {
        &self.cache
    }

    /// Intercept every event on the surface of `subject`.
    ///
    /// Returns the number of forwarders attached.
    pub fn initialize<S>(&self, subject: &S) -> Result<usize>
    where
        S: Subject<Event = E> + EventSurface,
    {
        self.initialize_with(subject, Selection::All)
    }

    /// Intercept the selected events of `subject`.
    ///
    /// Returns the number of forwarders attached.
    pub fn initialize_with<S>(&self, subject: &S, selection: Selection) -> Result<usize>
    where
        S: Subject<Event = E> + EventSurface,
    {
        match selection {
            Selection::All => {
                let names = self.cache.event_names::<S>();
                self.attach(subject, names.iter())
            }
            Selection::Only(names) => self.attach(subject, names.iter()),
        }
    }

    /// Intercept the named events of `subject`.
    ///
    /// The names are not checked against the subject: a name it never fires is attached all the
    /// same and stays inert. Since no surface is available here, a list of exactly
    /// [`WILDCARD`] is rejected.
    ///
    /// Returns the number of forwarders attached.
    pub fn initialize_events<S, I, N>(&self, subject: &S, names: I) -> Result<usize>
    where
        S: Subject<Event = E>,
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        match Selection::from_names(names) {
            Selection::All => Err(Error::UndiscoverableSubject {
                type_name: type_name::<S>(),
            }),
            Selection::Only(names) => self.attach(subject, names.iter()),
        }
    }

    /// Raise [`INTERCEPTED`] for a firing of `event_name` carrying `event`.
    ///
    /// Called by forwarders; never fails.
    pub fn intercept(&self, event_name: &str, event: Arc<E>) {
        self.shared.intercept(&Arc::from(event_name), event);
    }

    /// Build a forwarder bound to this interceptor and `event_name`.
    ///
    /// Only needed for subjects that take handlers in some other way than
    /// [`Subject::attach_handler()`].
    pub fn forwarder(&self, event_name: &str) -> Forwarder<E> {
        Forwarder::new(Arc::downgrade(&self.shared), Arc::from(event_name))
    }

    /// Attach `handler` to this interceptor's [`INTERCEPTED`] event.
    pub fn on_intercepted(&self, handler: impl Handler<Interception<E>> + 'static) {
        self.shared.component.attach(INTERCEPTED, handler);
    }

    /// Receive every interception raised from now on through a channel.
    ///
    /// Interceptions arrive in firing order. Dropping the receiver stops delivery, but the
    /// subscription stays attached (and counted by [`listeners()`](Self::listeners)) for the
    /// interceptor's lifetime.
    pub fn subscribe(&self) -> crossbeam::channel::Receiver<Interception<E>> {
        let (sender, receiver) = crossbeam::channel::unbounded();
        self.on_intercepted(Subscription::new(sender));
        receiver
    }

    /// Total number of forwarders this interceptor has attached.
    #[inline]
    pub fn registrations(&self) -> usize {
        self.shared.attached.load(Ordering::Relaxed)
    }

    /// Number of live forwarders this interceptor has attached to `event_name` on `subject`.
    pub fn attached_to<S>(&self, subject: &S, event_name: &str) -> usize
    where
        S: Subject<Event = E>,
    {
        self.shared.registered(&registration_key(subject, event_name))
    }

    /// Number of listeners attached to [`INTERCEPTED`].
    #[inline]
    pub fn listeners(&self) -> usize {
        self.shared.component.handler_count(INTERCEPTED)
    }

    fn attach<'a, S>(&self, subject: &S, names: impl Iterator<Item = &'a String>) -> Result<usize>
    where
        S: Subject<Event = E>,
    {
        let names: Vec<Arc<str>> = names
            .enumerate()
            .map(|(position, name)| {
                if name.is_empty() {
                    Err(Error::EmptyEventName { position })
                } else {
                    Ok(Arc::from(name.as_str()))
                }
            })
            .collect::<Result<_>>()?;

        for name in &names {
            let forwarder = Arc::new(Forwarder::new(
                Arc::downgrade(&self.shared),
                Arc::clone(name),
            ));
            let previous = self
                .shared
                .register(registration_key(subject, name), &forwarder);
            if previous > 0 {
                warn!(
                    "{}: '{}' on '{}' is already intercepted {} time(s); firings will be duplicated",
                    self.shared.id,
                    name,
                    type_name::<S>(),
                    previous
                );
            }

            subject.attach_handler(name, forwarder);
        }

        debug!(
            "{}: attached {} forwarder(s) to '{}'",
            self.shared.id,
            names.len(),
            type_name::<S>()
        );
        Ok(names.len())
    }
}

impl<E: Event> Default for Interceptor<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for Interceptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("id", &self.shared.id)
            .field("config", &self.shared.config)
            .field("registrations", &self.registrations())
            .field("listeners", &self.listeners())
            .finish()
    }
}

impl<E: Event> Subject for Interceptor<E> {
    type Event = Interception<E>;

    fn attach_handler(&self, event_name: &str, handler: Arc<dyn Handler<Interception<E>>>) {
        self.shared.component.attach_shared(event_name, handler);
    }
}

impl<E: Event> EventSurface for Interceptor<E> {
    fn event_names() -> Vec<String> {
        vec![INTERCEPTED.to_owned()]
    }
}
