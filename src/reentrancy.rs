//! Debug-only reentrancy guard.
//!
//! Object keys run host code in the middle of a probe. Host code may read
//! the dictionary it is being looked up in, but must not touch it while a
//! mutation is underway. In debug builds, violating that panics. In release
//! builds, this compiles to a zero-cost no-op.

use core::cell::Cell;
use core::marker::PhantomData;

// Sentinel depth marking an active writer.
#[cfg(debug_assertions)]
const WRITING: u32 = u32::MAX;

/// Per-instance reentrancy tracker. Guard public entry points with
/// `let _g = self.reentrancy.read();` or `.write()`.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    // Keep !Send + !Sync in line with single-threaded design.
    _nosend: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            _nosend: PhantomData,
        }
    }

    /// Enter a read-only section. Nested reads are fine; in debug builds,
    /// panics if a write is in progress.
    #[inline]
    pub fn read(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(
                d != WRITING,
                "reentrancy detected: read while dictionary is being mutated"
            );
            self.depth.set(d + 1);
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _z: PhantomData };
        }
    }

    /// Enter a mutating section. In debug builds, panics if any other
    /// section is active.
    #[inline]
    pub fn write(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                self.depth.get() == 0,
                "reentrancy detected: nested entry into dictionary during mutation"
            );
            self.depth.set(WRITING);
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::read`/`write`.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl<'a> Drop for ReentrancyGuard<'a> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(if d == WRITING { 0 } else { d - 1 });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn enter_and_exit_is_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.write();
        }
        let _g = r.read();
    }

    #[test]
    fn nested_reads_are_ok() {
        let r = DebugReentrancy::new();
        let _g1 = r.read();
        let _g2 = r.read();
        drop(_g2);
        drop(_g1);
        let _w = r.write();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn read_during_write_panics_in_debug() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _w = r.write();
            let _g = r.read();
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn write_during_read_panics_in_debug() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = r.read();
            let _w = r.write();
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn reentrancy_noop_in_release() {
        let r = DebugReentrancy::new();
        let _w = r.write();
        let _g = r.read();
        let (_w, _g) = (_w, _g);
    }
}
