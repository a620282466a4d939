//! # Tick Source
//!
//! Hardware-abstract tick counter consumed by the scheduler. On real
//! hardware this wraps SysTick or a HAL getter such as `HAL_GetTick`; for
//! testing, `SoftwareClock` is advanced by hand.
//!
//! All due-time arithmetic is modular. A counter that wraps from its
//! maximum back to zero needs no special handling: `now - start` computed
//! with wrapping subtraction is the true elapsed time as long as fewer
//! than `MAX + 1` ticks have passed.

use core::cell::Cell;
use core::fmt;

use critical_section::Mutex;

/// An unsigned, wrapping tick counter type.
pub trait Ticks: Copy + Eq + Ord + fmt::Debug {
    /// The zero delay / counter start value.
    const ZERO: Self;
    /// Largest representable tick before the counter wraps.
    const MAX: Self;

    /// Modular subtraction.
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Modular addition.
    fn wrapping_add(self, rhs: Self) -> Self;
}

macro_rules! impl_ticks {
    ($($t:ty),*) => {
        $(
            impl Ticks for $t {
                const ZERO: Self = 0;
                const MAX: Self = <$t>::MAX;

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$t>::wrapping_sub(self, rhs)
                }

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$t>::wrapping_add(self, rhs)
                }
            }
        )*
    };
}

impl_ticks!(u8, u16, u32, u64, usize);

/// Ticks elapsed from `start` to `now`, correct across one wraparound.
#[inline]
pub fn elapsed<T: Ticks>(start: T, now: T) -> T {
    now.wrapping_sub(start)
}

/// Due check: a zero delay is always due, otherwise at least `delay`
/// ticks must have elapsed since `start`.
#[inline]
pub fn is_due<T: Ticks>(start: T, delay: T, now: T) -> bool {
    delay == T::ZERO || elapsed(start, now) >= delay
}

/// A monotonically increasing, wrapping tick source.
pub trait Clock {
    /// Counter width of this clock.
    type Tick: Ticks;

    /// Current tick value.
    fn now(&self) -> Self::Tick;
}

impl<C: Clock + ?Sized> Clock for &C {
    type Tick = C::Tick;

    #[inline]
    fn now(&self) -> Self::Tick {
        (**self).now()
    }
}

/// Adapts a getter function (`fn() -> u32` in most HALs) into a `Clock`.
#[derive(Clone, Copy)]
pub struct FnClock<F>(pub F);

impl<T: Ticks, F: Fn() -> T> Clock for FnClock<F> {
    type Tick = T;

    #[inline]
    fn now(&self) -> T {
        (self.0)()
    }
}

/// Software tick counter for hosts and tests.
///
/// Shared by reference between the scheduler and whoever advances it; the
/// counter lives behind a `critical_section::Mutex` so it can be bumped
/// from an interrupt on targets without atomic read-modify-write.
pub struct SoftwareClock<T> {
    ticks: Mutex<Cell<T>>,
}

impl<T: Ticks> SoftwareClock<T> {
    /// Create a clock reading `start`.
    pub const fn new(start: T) -> Self {
        Self {
            ticks: Mutex::new(Cell::new(start)),
        }
    }

    /// Advance by `ticks`, wrapping past `T::MAX`.
    pub fn advance(&self, ticks: T) {
        critical_section::with(|cs| {
            let cell = self.ticks.borrow(cs);
            cell.set(cell.get().wrapping_add(ticks));
        });
    }

    /// Jump to an absolute tick value.
    pub fn set(&self, ticks: T) {
        critical_section::with(|cs| self.ticks.borrow(cs).set(ticks));
    }
}

impl<T: Ticks> Clock for SoftwareClock<T> {
    type Tick = T;

    fn now(&self) -> T {
        critical_section::with(|cs| self.ticks.borrow(cs).get())
    }
}

impl<T: Ticks> fmt::Debug for SoftwareClock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareClock")
            .field("ticks", &self.now())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_clock_advance() {
        let clock = SoftwareClock::new(0u32);
        assert_eq!(clock.now(), 0);
        clock.advance(1000);
        assert_eq!(clock.now(), 1000);
        clock.set(7);
        assert_eq!(clock.now(), 7);
    }

    #[test]
    fn test_software_clock_wraps() {
        let clock = SoftwareClock::new(u16::MAX - 1);
        clock.advance(3);
        assert_eq!(clock.now(), 1);
    }

    #[test]
    fn test_zero_delay_always_due() {
        assert!(is_due(0u32, 0, 0));
        assert!(is_due(500u32, 0, 3));
        assert!(is_due(u32::MAX, 0, u32::MAX));
    }

    #[test]
    fn test_due_without_wrap() {
        assert!(!is_due(100u32, 50, 149));
        assert!(is_due(100u32, 50, 150));
        assert!(is_due(100u32, 50, 10_000));
    }

    #[test]
    fn test_due_across_wrap() {
        let start = u32::MAX;
        assert!(!is_due(start, 5, start.wrapping_add(3)));
        assert_eq!(start.wrapping_add(3), 2);
        assert!(is_due(start, 5, start.wrapping_add(5)));
        assert_eq!(start.wrapping_add(5), 4);
    }

    #[test]
    fn test_elapsed_narrow_counter() {
        assert_eq!(elapsed(250u8, 4), 10);
        assert!(is_due(250u8, 10, 4));
        assert!(!is_due(250u8, 11, 4));
    }

    #[test]
    fn test_fn_clock() {
        fn hal_get_tick() -> u32 {
            42
        }
        let clock = FnClock(hal_get_tick);
        assert_eq!(clock.now(), 42);
    }
}
