use std::fmt;

/// Result alias for interceptor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up interception.
///
/// Interception itself never fails: once forwarders are attached, every firing is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An explicit event list contained an empty name.
    EmptyEventName {
        /// Index of the offending name in the list.
        position: usize,
    },
    /// The wildcard was requested for a subject type without an event surface.
    UndiscoverableSubject {
        /// Type name of the subject.
        type_name: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyEventName { position } => {
                write!(f, "empty event name at position {}", position)
            }
            Error::UndiscoverableSubject { type_name } => write!(
                f,
                "cannot intercept all events of '{}': type declares no event surface",
                type_name
            ),
        }
    }
}

impl std::error::Error for Error {}
