//! # Cortex-M4 Port Layer
//!
//! Hardware-specific glue for ARM Cortex-M targets: the SysTick source
//! behind `kernel::tick()` and an interrupt-masking critical section.
//!
//! ## Interrupt Priorities
//!
//! SysTick runs at the lowest priority (0xFF). Its handler only bumps a
//! counter, and deferred calls run from the main loop, so nothing here
//! needs to preempt application ISRs.
//!
//! ## Usage
//!
//! ```ignore
//! #[exception]
//! fn SysTick() {
//!     tickpost::arch::cortex_m4::on_systick();
//! }
//!
//! #[entry]
//! fn main() -> ! {
//!     let mut cp = cortex_m::Peripherals::take().unwrap();
//!     cortex_m4::configure_systick(&mut cp.SYST);
//!     cortex_m4::set_systick_priority(&mut cp.SCB);
//!     loop {
//!         tickpost::kernel::process();
//!     }
//! }
//! ```

use cortex_m::interrupt;
use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};

use crate::config::{SYSTEM_CLOCK_HZ, TICK_HZ};
use crate::kernel;
use crate::sync::CriticalSection;

// ---------------------------------------------------------------------------
// Critical section
// ---------------------------------------------------------------------------

/// Critical section that masks interrupts with `cortex_m::interrupt::free`.
///
/// Only sound on single-core parts, where masking interrupts excludes
/// every other context.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterruptFree;

// Safety: single core; with PRIMASK set no other context runs.
unsafe impl CriticalSection for InterruptFree {
    #[inline]
    fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        interrupt::free(|_cs| f())
    }
}

// ---------------------------------------------------------------------------
// SysTick configuration
// ---------------------------------------------------------------------------

/// Configure SysTick to fire at `TICK_HZ` from the processor clock.
pub fn configure_systick(syst: &mut SYST) {
    let reload = SYSTEM_CLOCK_HZ / TICK_HZ - 1;
    syst.set_reload(reload);
    syst.clear_current();
    syst.set_clock_source(SystClkSource::Core);
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Drop SysTick to the lowest priority.
pub fn set_systick_priority(scb: &mut SCB) {
    // Safety: changing a system handler priority cannot break a
    // priority-based critical section here; none are used.
    unsafe {
        scb.set_priority(SystemHandler::SysTick, 0xFF);
    }
}

/// Body of the SysTick exception handler.
#[inline]
pub fn on_systick() {
    kernel::tick();
}
