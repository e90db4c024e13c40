//! Event surfaces: the set of event names a subject type fires.
//!
//! Wildcard interception needs to know which events a subject offers. Rather than inspect a
//! type at runtime, a subject type declares its surface through [`EventSurface`], either by
//! hand or with the [`#[event_surface]`](crate::event_surface) attribute on an inherent impl
//! block. The attribute applies the handler naming convention: a method is an event when its
//! name starts with `on` (case-insensitive) and it takes at most one argument besides the
//! receiver.
//!
//! ```rust,ignore
//! struct Document {
//!     events: Component<DocumentEvent>,
//! }
//!
//! #[event_surface]
//! impl Document {
//!     pub fn on_save(&self, event: Arc<DocumentEvent>) {
//!         self.events.raise("on_save", event);
//!     }
//!
//!     pub fn path(&self) -> &str { ... } // not an event
//! }
//!
//! assert_eq!(Document::event_names(), vec!["on_save"]);
//! ```
//!
//! The attribute only accepts inherent impl blocks; on a trait impl it fails to compile:
//!
//! ```compile_fail
//! use rusty_intercept::event_surface;
//!
//! struct Document;
//!
//! trait Saving {
//!     fn on_save(&self);
//! }
//!
//! #[event_surface]
//! impl Saving for Document {
//!     fn on_save(&self) {}
//! }
//! ```

/// Type-level query for the names of the events a subject type fires.
///
/// Every instance of an implementing type must expose the same events: surfaces are cached per
/// type by [`DiscoveryCache`](crate::DiscoveryCache) and never recomputed.
pub trait EventSurface: 'static {
    /// Event names in declaration order.
    fn event_names() -> Vec<String>;
}

/// Returns `true` if `name` follows the event naming convention (`on` prefix, any case).
///
/// Only the prefix is case-insensitive; names are otherwise used exactly as declared.
#[inline]
pub fn is_event_name(name: &str) -> bool {
    name.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

/// Select the event names out of a list of member names, keeping their order.
///
/// Useful for hand-written [`EventSurface`] impls that list a type's handler methods.
pub fn discover<'a>(members: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    members
        .into_iter()
        .filter(|name| is_event_name(name))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Component, Event, event_surface};

    struct DocumentEvent;
    impl Event for DocumentEvent {}

    struct Document {
        events: Component<DocumentEvent>,
    }

    #[event_surface]
    #[allow(non_snake_case)]
    impl Document {
        fn onSave(&self, event: Arc<DocumentEvent>) {
            self.events.raise("onSave", event);
        }

        fn on_load(&self, event: Arc<DocumentEvent>) {
            self.events.raise("on_load", event);
        }

        fn OnClose(&self) {}

        fn open(&self) {}

        fn on_merge(&self, _left: Arc<DocumentEvent>, _right: Arc<DocumentEvent>) {}

        fn online() -> bool {
            true
        }
    }

    struct Empty;

    #[event_surface]
    impl Empty {
        #[allow(dead_code)]
        fn new() -> Self {
            Self
        }
    }

    struct Wrapper<T>(T);

    #[event_surface]
    impl<T: 'static> Wrapper<T> {
        #[allow(dead_code)]
        fn on_wrap(&self, _value: T) {}
    }

    /// Member names exercising every corner of the naming rule, in declaration order.
    const NAMING_TABLE: [&str; 10] = [
        "on_save", "OnLoad", "ON_CLOSE", "oN_mixed", "once", "on", "open", "o", "handle_on_save",
        "_on_private",
    ];

    #[allow(dead_code)]
    struct NamingTable;

    #[event_surface]
    #[allow(non_snake_case, dead_code)]
    impl NamingTable {
        fn on_save(&self) {}
        fn OnLoad(&self) {}
        fn ON_CLOSE(&self) {}
        fn oN_mixed(&self) {}
        fn once(&self) {}
        fn on(&self) {}
        fn open(&self) {}
        fn o(&self) {}
        fn handle_on_save(&self) {}
        fn _on_private(&self) {}
    }

    // ==================== Naming Convention ====================

    #[test]
    fn attribute_and_runtime_rule_agree() {
        // Given
        let expected = discover(NAMING_TABLE);

        // When
        let names = NamingTable::event_names();

        // Then
        assert_eq!(names, expected);
        assert_eq!(names, vec!["on_save", "OnLoad", "ON_CLOSE", "oN_mixed", "once", "on"]);
    }

    #[test]
    fn event_names_need_the_on_prefix() {
        assert!(is_event_name("onSave"));
        assert!(is_event_name("on_save"));
        assert!(is_event_name("OnSave"));
        assert!(is_event_name("ONSAVE"));
        assert!(is_event_name("on"));

        assert!(!is_event_name("save"));
        assert!(!is_event_name("o"));
        assert!(!is_event_name(""));
        assert!(!is_event_name("handle_on_save"));
    }

    #[test]
    fn prefix_check_does_not_split_multibyte_chars() {
        assert!(!is_event_name("ö"));
        assert!(!is_event_name("öffnen"));
    }

    #[test]
    fn discover_keeps_member_order() {
        let names = discover(["save", "onSave", "load", "onLoad", "OnClose"]);

        assert_eq!(names, vec!["onSave", "onLoad", "OnClose"]);
    }

    // ==================== Attribute ====================

    #[test]
    fn attribute_collects_handler_methods_in_declaration_order() {
        // Given
        let document = Document {
            events: Component::new(),
        };

        // When
        let names = Document::event_names();

        // Then
        // `on_merge` takes two arguments, `open` lacks the prefix
        assert_eq!(names, vec!["onSave", "on_load", "OnClose", "online"]);

        // The impl block itself is emitted untouched
        document.onSave(Arc::new(DocumentEvent));
        document.on_load(Arc::new(DocumentEvent));
        document.OnClose();
        document.open();
        document.on_merge(Arc::new(DocumentEvent), Arc::new(DocumentEvent));
        assert!(Document::online());
    }

    #[test]
    fn attribute_on_impl_without_events_yields_empty_surface() {
        assert!(Empty::event_names().is_empty());
    }

    #[test]
    fn attribute_supports_generic_impls() {
        assert_eq!(Wrapper::<u32>::event_names(), vec!["on_wrap"]);
        let _ = Wrapper(1u32).0;
    }
}
