use crate::key::Key;
use core::fmt;
use thiserror::Error;

/// Error raised by host code behind an [`ObjectKey`](crate::ObjectKey) capability.
///
/// Not `Send`: host errors may carry script values, including this crate's
/// own [`Error`] from a nested dictionary lookup.
pub type HostError = Box<dyn std::error::Error + 'static>;

/// The object capability that was being invoked.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Capability {
    Hash,
    Hint,
    Identify,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Hash => "hash",
            Capability::Hint => "hint",
            Capability::Identify => "identify",
        })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Lookup miss from `get`/`get_mut`; script code may catch it.
    #[error("key not found: {0}")]
    KeyNotFound(Key),
    /// An object key's capability failed in host code. The host error is
    /// kept as-is in `source`.
    #[error("object key capability `{capability}` failed: {source}")]
    HostCapabilityFailure {
        capability: Capability,
        #[source]
        source: HostError,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
