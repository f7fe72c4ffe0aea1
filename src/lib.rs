//! script-dictionary: the keying model and `Dictionary` container of an
//! embedded scripting runtime.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map keyed by heterogeneous script values whose hashes are
//!   bit-exact and observable from script code.
//! - Layers:
//!   - `hashing`: pure per-kind hash/hint functions and their constants.
//!   - `RealKey`: bit-pattern wrapper so `+0.0`/`-0.0` stay distinct and
//!     every NaN is one key.
//!   - `Key`/`ObjectKey`: closed set of primitive kinds plus host objects
//!     that supply `hash`, an optional `hint`, and `identify`.
//!   - `Dictionary<V, S>`: slot storage plus a `hashbrown::HashTable`
//!     index; `Key::equal` is the only arbiter of identity.
//!
//! Constraints
//! - Single-threaded: keys hold `Rc`, so the dictionary is `!Send`/`!Sync`.
//! - `hash` is authoritative; `hint` is a pre-filter between keys of the
//!   same kind that only ever rules a candidate out, never in.
//! - Object capabilities may fail. Failures propagate as
//!   `Error::HostCapabilityFailure` and leave the dictionary untouched.
//!
//! Reentrancy policy
//! - Object capabilities run in the middle of a probe. A debug-only guard
//!   lets them read the same dictionary during a read, and panics on any
//!   nested entry while `set`/`remove`/`clear` is in progress.
//! - Removed keys and values are dropped after the structure is
//!   consistent, so their `Drop` may reenter.
//!
//! Hashing invariants
//! - Each entry stores its hash, hint and bucket placement at insertion;
//!   growth rehashes from the stored placement and never calls into
//!   object keys. Mutating an object key's identity while it is stored
//!   is a host defect.
//!
//! Notes and non-goals
//! - Iteration order is unspecified.
//! - Re-setting an equal key replaces the value and keeps the stored key.
//! - No persistence format; no object system beyond the key capabilities.

mod dictionary;
mod dictionary_proptest;
mod error;
pub mod hashing;
mod key;
mod real;
mod reentrancy;

// Public surface
pub use dictionary::{Dictionary, IntoIter, Iter, IterMut};
pub use error::{Capability, Error, HostError, Result};
pub use key::{Key, KeyKind, ObjectKey};
pub use real::RealKey;
