//! Utility macros for the sink crate.

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// It's used for state checks where violating the condition is a caller error,
/// e.g. committing a second terminal operation on an exchange.
///
/// # Example
///
/// ```ignore
/// ensure!(!self.committed, SinkError::AlreadyCommitted);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
