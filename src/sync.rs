//! # Synchronization Primitives
//!
//! Interrupt-safe critical section abstractions. Every read-modify-write of
//! the task table happens inside one of these, so submissions from
//! interrupt handlers cannot interleave with the main loop's poll.

/// A scoped mutual-exclusion strategy.
///
/// `with` runs the closure with every other context that could touch the
/// same scheduler excluded (interrupts masked, a lock held, ...). The
/// scheduler keeps each section short and never calls `with` from inside
/// another `with`, so implementations need not be re-entrant.
///
/// # Safety
/// Implementors must guarantee that no two closures passed to `with` on
/// the same value (or on values guarding the same scheduler) run
/// concurrently. The scheduler relies on this for soundness of its
/// shared table.
pub unsafe trait CriticalSection {
    /// Execute `f` with all competing contexts excluded.
    fn with<R>(&self, f: impl FnOnce() -> R) -> R;
}

/// Critical section backed by the `critical-section` crate.
///
/// The acquire/release implementation is chosen at link time: on Cortex-M
/// `cortex-m`'s `critical-section-single-core` masks interrupts, on hosts
/// the `std` feature uses a global lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalSection;

// Safety: `critical_section::with` is a process-wide exclusive section.
unsafe impl CriticalSection for GlobalSection {
    #[inline]
    fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_cs| f())
    }
}

// Safety: forwards to the referenced strategy.
unsafe impl<L: CriticalSection + ?Sized> CriticalSection for &L {
    #[inline]
    fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        (**self).with(f)
    }
}
