//! Event interception for component subjects.
//!
//! An [`Interceptor`] attaches a [`Forwarder`] to every event (or a chosen subset of events)
//! of a [`Subject`] and re-raises each firing as a single `onEventIntercepted` event carrying
//! an [`Interception`]: the name of the original event and the original event object.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rusty_intercept::{Component, Interceptor};
//!
//! let subject = Component::<Payload>::new();
//! let interceptor = Interceptor::<Payload>::new();
//! interceptor.initialize_events(&subject, ["onSave"])?;
//!
//! let intercepted = interceptor.subscribe();
//! subject.raise("onSave", Arc::new(Payload::default()));
//!
//! assert_eq!(intercepted.recv()?.event_name(), "onSave");
//! ```

extern crate self as rusty_intercept;

pub mod cache;
pub mod component;
pub mod config;
pub mod error;
pub mod event;
pub mod interceptor;
pub mod surface;

pub use cache::DiscoveryCache;
pub use component::{Component, Subject};
pub use config::Config;
pub use error::{Error, Result};
pub use event::{Event, Handler};
pub use interceptor::{
    Forwarder, Interception, Interceptor, InterceptorId, Param, Selection, INTERCEPTED,
};
pub use rusty_intercept_macros::event_surface;
pub use surface::EventSurface;
