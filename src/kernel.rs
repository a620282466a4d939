//! # Kernel
//!
//! Process-wide deferred-call API backed by one global scheduler of
//! `DEFAULT_CAPACITY` slots. Arguments are plain `usize` words, enough for
//! an index, a small id or a pointer cast by the caller.
//!
//! ## Wiring
//!
//! ```text
//! SysTick (TICK_HZ)
//!   └─► kernel::tick()           ← advances SystemTick
//!
//! main loop
//!   ├─► kernel::post(...)        ← from anywhere, ISRs included
//!   └─► kernel::process()        ← fires due handlers
//! ```
//!
//! Failures are logged at `debug` level through the `log` facade and
//! returned to the caller unchanged.

use core::cell::Cell;

use critical_section::Mutex;

use crate::clock::Clock;
use crate::config::DEFAULT_CAPACITY;
use crate::error::Result;
use crate::scheduler::{Scheduler, Stats};
use crate::sync::GlobalSection;
use crate::task::{Handler, Post};

// ---------------------------------------------------------------------------
// System tick
// ---------------------------------------------------------------------------

// cs: thumbv6m has no atomic add
static UPTIME_TICKS: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

/// Clock reading the global uptime counter advanced by `tick()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTick;

impl Clock for SystemTick {
    type Tick = u32;

    #[inline]
    fn now(&self) -> u32 {
        uptime()
    }
}

/// Advance the system tick by one. Call from the tick interrupt.
#[inline]
pub fn tick() {
    critical_section::with(|cs| {
        let ticks = UPTIME_TICKS.borrow(cs);
        ticks.set(ticks.get().wrapping_add(1));
    });
}

/// Ticks since start, wrapping at `u32::MAX`.
pub fn uptime() -> u32 {
    critical_section::with(|cs| UPTIME_TICKS.borrow(cs).get())
}

// ---------------------------------------------------------------------------
// Global scheduler instance
// ---------------------------------------------------------------------------

/// The global scheduler type.
pub type SystemScheduler = Scheduler<usize, SystemTick, GlobalSection, DEFAULT_CAPACITY>;

static SCHEDULER: SystemScheduler = Scheduler::new(SystemTick, GlobalSection);

/// The global scheduler, for callers that want the full `Scheduler` API.
pub fn scheduler() -> &'static SystemScheduler {
    &SCHEDULER
}

// ---------------------------------------------------------------------------
// Kernel API
// ---------------------------------------------------------------------------

/// Submit a deferred call to the global scheduler.
pub fn submit(post: Post<usize, u32>) -> Result<()> {
    SCHEDULER.submit(post).map_err(|err| {
        log::debug!("post: arg {:#x} delay {} rejected: {}", post.arg, post.delay, err);
        err
    })
}

/// Run `handler(arg)` on the next `process()`.
pub fn post(handler: Handler<usize>, arg: usize) -> Result<()> {
    submit(Post::new(handler, arg))
}

/// Run `handler(arg)` once `delay` ticks have elapsed.
pub fn post_delayed(handler: Handler<usize>, arg: usize, delay: u32) -> Result<()> {
    submit(Post::new(handler, arg).delay(delay))
}

/// Cancel pending calls of `handler`, optionally only those with `arg`.
pub fn cancel(handler: Handler<usize>, arg: Option<usize>) {
    SCHEDULER.cancel(handler, arg);
}

/// Cancel every pending call.
pub fn cancel_all() {
    SCHEDULER.cancel_all();
}

/// Whether a call of `handler` (with `arg`, when given) is pending.
pub fn contains(handler: Handler<usize>, arg: Option<usize>) -> bool {
    SCHEDULER.contains(handler, arg)
}

/// Fire due calls. Call from the main loop.
pub fn process() -> usize {
    let fired = SCHEDULER.poll();
    if fired > 0 {
        log::trace!("post: dispatched {} task(s) at tick {}", fired, uptime());
    }
    fired
}

/// Occupancy of the global table.
pub fn stats() -> Stats {
    SCHEDULER.stats()
}
