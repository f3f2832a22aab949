//! Domain error types.
//!
//! These errors represent contract violations in the domain layer. They are
//! distinct from provider/IO errors, which never reach this layer.

/// Domain-level errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A required assembly input was absent
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    /// Route merge was called without any routes
    #[error("cannot merge an empty list of routes")]
    EmptyMerge,
}
