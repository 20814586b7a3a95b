//! Error types for stack assembly.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// A logical or derived physical name was declared twice.
    DuplicateName(String),
    /// A binding, route or propagation referenced a resource that is not
    /// registered yet (or is of the wrong kind).
    UnresolvedReference(String),
    /// The same (path, method) pair was routed to two different targets.
    ConflictingRoute {
        path: String,
        method: String,
        existing: String,
        requested: String,
    },
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyError::DuplicateName(name) => {
                write!(f, "Duplicate resource name: {}", name)
            }
            AssemblyError::UnresolvedReference(name) => {
                write!(f, "Unresolved resource reference: {}", name)
            }
            AssemblyError::ConflictingRoute {
                path,
                method,
                existing,
                requested,
            } => write!(
                f,
                "Conflicting route {} {}: already routed to {}, requested {}",
                method, path, existing, requested
            ),
        }
    }
}

impl std::error::Error for AssemblyError {}
