//! The collaborator service container.
//!
//! Routing, dependency wiring and configuration live outside the kernel;
//! everything the kernel needs from them flows through this two-method
//! capability. String-keyed middleware entries, service controller
//! references and configuration flags (`env`, cache directories) are all
//! looked up lazily through it.

use crate::value::ArgValue;

/// Read-only lookup into the application's service container.
pub trait Container: Send + Sync {
    /// Whether the container holds an entry for `key`.
    fn has(&self, key: &str) -> bool;

    /// Fetch the entry for `key`, if present.
    fn get(&self, key: &str) -> Option<ArgValue>;
}
