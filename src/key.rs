//! Dictionary keys: primitive kinds plus host objects.

use crate::error::{Capability, Error, HostError, Result};
use crate::hashing;
use crate::real::RealKey;
use core::any::Any;
use core::fmt;
use std::rc::Rc;

/// Capabilities a host object must expose to be used as a key.
///
/// `hash` must be consistent with `identify`: keys that identify as equal
/// must return the same hash, and objects that identify as equal the same
/// hint. The dictionary snapshots both at insertion and never asks again
/// for that entry.
pub trait ObjectKey: fmt::Debug {
    fn hash(&self) -> core::result::Result<u32, HostError>;

    /// Optional cheaper digest used to skip `identify` calls between two
    /// object keys. Never consulted against keys of other kinds.
    fn hint(&self) -> core::result::Result<u32, HostError> {
        self.hash()
    }

    /// Whether `other` denotes the same key as `self`.
    ///
    /// Called only when `other` is not the very same object. Candidates of
    /// an incompatible kind should yield `Ok(false)`. The default makes
    /// objects of this type equal only to themselves.
    fn identify(&self, other: &Key) -> core::result::Result<bool, HostError> {
        let _ = other;
        Ok(false)
    }

    fn as_any(&self) -> &dyn Any;
}

/// The kind of a [`Key`], without its payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeyKind {
    Void,
    Null,
    Boolean,
    Integer,
    Real,
    String,
    Object,
}

/// A value usable as a dictionary key.
#[derive(Clone, Debug)]
pub enum Key {
    Void,
    Null,
    Boolean(bool),
    Integer(i64),
    Real(RealKey),
    String(Rc<str>),
    Object(Rc<dyn ObjectKey>),
}

impl Key {
    #[inline]
    pub fn real(v: f64) -> Self {
        Key::Real(RealKey::new(v))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Key::String(s.into())
    }

    pub fn object<T: ObjectKey + 'static>(obj: T) -> Self {
        Key::Object(Rc::new(obj))
    }

    /// Kind of this key. Hints are only compared between keys of one kind.
    pub fn kind(&self) -> KeyKind {
        match self {
            Key::Void => KeyKind::Void,
            Key::Null => KeyKind::Null,
            Key::Boolean(_) => KeyKind::Boolean,
            Key::Integer(_) => KeyKind::Integer,
            Key::Real(_) => KeyKind::Real,
            Key::String(_) => KeyKind::String,
            Key::Object(_) => KeyKind::Object,
        }
    }

    /// Borrow the host object behind an `Object` key as a concrete type.
    pub fn as_object<T: 'static>(&self) -> Option<&T> {
        match self {
            Key::Object(o) => o.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Authoritative 32-bit hash. Only object keys can fail.
    pub fn hash(&self) -> Result<u32> {
        Ok(match self {
            Key::Void => hashing::VOID_HASH,
            Key::Null => hashing::NULL_HASH,
            Key::Boolean(b) => hashing::hash_bool(*b),
            Key::Integer(n) => hashing::hash_integer(*n),
            Key::Real(r) => r.hash(),
            Key::String(s) => hashing::hash_str(s),
            Key::Object(o) => o.hash().map_err(|e| host_failure(Capability::Hash, e))?,
        })
    }

    /// Non-authoritative digest; equals `hash` for every kind but strings
    /// and objects that provide their own. Agrees for equal keys of the
    /// same kind only.
    pub fn hint(&self) -> Result<u32> {
        match self {
            Key::String(s) => Ok(hashing::hint_str(s)),
            Key::Object(o) => o.hint().map_err(|e| host_failure(Capability::Hint, e)),
            _ => self.hash(),
        }
    }

    /// Key identity. Primitive kinds never equal a different primitive kind;
    /// when an object is involved its `identify` decides.
    pub fn equal(&self, other: &Key) -> Result<bool> {
        match (self, other) {
            (Key::Object(a), Key::Object(b)) => {
                if core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)) {
                    return Ok(true);
                }
                identify(a, other)
            }
            (Key::Object(a), _) => identify(a, other),
            (_, Key::Object(b)) => identify(b, self),
            (Key::Void, Key::Void) | (Key::Null, Key::Null) => Ok(true),
            (Key::Boolean(a), Key::Boolean(b)) => Ok(a == b),
            (Key::Integer(a), Key::Integer(b)) => Ok(a == b),
            (Key::Real(a), Key::Real(b)) => Ok(a == b),
            (Key::String(a), Key::String(b)) => Ok(a == b),
            _ => Ok(false),
        }
    }
}

fn identify(obj: &Rc<dyn ObjectKey>, other: &Key) -> Result<bool> {
    obj.identify(other)
        .map_err(|e| host_failure(Capability::Identify, e))
}

fn host_failure(capability: Capability, source: HostError) -> Error {
    log::debug!("object key capability `{}` failed: {}", capability, source);
    Error::HostCapabilityFailure { capability, source }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Void => f.write_str("void"),
            Key::Null => f.write_str("null"),
            Key::Boolean(b) => write!(f, "{}", b),
            Key::Integer(n) => write!(f, "{}", n),
            Key::Real(r) => write!(f, "{}", r),
            Key::String(s) => write!(f, "{:?}", s),
            Key::Object(o) => write!(f, "{:?}", o),
        }
    }
}

impl From<()> for Key {
    fn from(_: ()) -> Self {
        Key::Void
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Boolean(b)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Integer(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Integer(n.into())
    }
}

impl From<f64> for Key {
    fn from(v: f64) -> Self {
        Key::real(v)
    }
}

impl From<RealKey> for Key {
    fn from(r: RealKey) -> Self {
        Key::Real(r)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::String(s.into())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::String(s.into())
    }
}

impl From<Rc<str>> for Key {
    fn from(s: Rc<str>) -> Self {
        Key::String(s)
    }
}
