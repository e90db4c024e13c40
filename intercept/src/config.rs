/// The event list that selects every event of a subject.
pub const WILDCARD: &str = "*";

/// Default limit for nested interceptions on one thread.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Interceptor configuration.
///
/// ```rust,ignore
/// // Unguarded, matching a plain pass-through adapter
/// let interceptor = Interceptor::<MyEvent>::with_config(Config::default().with_max_depth(None));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of interceptions that may be nested on one thread for a single
    /// interceptor. Deeper interceptions are dropped with a warning. `None` disables the guard.
    pub max_depth: Option<usize>,
}

impl Config {
    /// Creates the default configuration.
    pub const fn new() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }

    /// Set the nesting limit; `None` disables it.
    pub const fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_guards_nesting() {
        assert_eq!(Config::default().max_depth, Some(DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn with_max_depth_overrides() {
        assert_eq!(Config::new().with_max_depth(Some(3)).max_depth, Some(3));
        assert_eq!(Config::new().with_max_depth(None).max_depth, None);
    }
}
