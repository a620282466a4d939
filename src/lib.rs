//! # tickpost — deferred calls for no_std targets
//!
//! A fixed-capacity, tick-driven scheduler that lets any part of a firmware
//! image say "call this function with this argument, later": on the next
//! poll, or once some number of ticks have passed.
//!
//! ## Overview
//!
//! - **No heap**: pending calls live in a `[TaskSlot; N]` table
//! - **One-shot**: a call fires once and frees its slot; resubmit to repeat
//! - **Wraparound-safe**: due checks use modular tick arithmetic
//! - **Interrupt-safe**: submit and cancel may run from ISRs; handlers run
//!   from `poll()` with the critical section released
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                  Application / ISRs                     │
//! ├────────────────────────────────────────────────────────┤
//! │            Global API (kernel.rs)                       │
//! │     post() · cancel() · process() · stats() · tick()    │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Scheduler   │   Tick Source      │  Sync Primitives  │
//! │  scheduler.rs│   clock.rs         │  sync.rs          │
//! │  ─ submit()  │   ─ Clock          │  ─ CriticalSection│
//! │  ─ cancel()  │   ─ is_due()       │  ─ GlobalSection  │
//! │  ─ poll()    │   ─ SoftwareClock  │                   │
//! ├──────────────┴────────────────────┴───────────────────┤
//! │          Slot Model (task.rs) · Errors (error.rs)       │
//! │       TaskSlot · Post · DuplicatePolicy · Error         │
//! ├────────────────────────────────────────────────────────┤
//! │            Arch Port (arch/cortex_m4.rs)                │
//! │         SysTick · InterruptFree critical section        │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Duplicate Handling
//!
//! A pending call is identified by its handler, and by its argument too
//! when `compare_arg` is set. Submitting a call that matches a pending one:
//!
//! | Policy            | Pending call | New call                 |
//! |-------------------|--------------|--------------------------|
//! | `ReplacePending`  | dropped      | admitted                 |
//! | `RejectIfPending` | kept         | `Err(AlreadyScheduled)`  |
//! | `AlwaysAdd`       | kept         | admitted                 |
//!
//! ## Example
//!
//! ```ignore
//! static CLOCK: SoftwareClock<u32> = SoftwareClock::new(0);
//! static POSTS: Scheduler<u32, &SoftwareClock<u32>, GlobalSection, 8> =
//!     Scheduler::new(&CLOCK, GlobalSection);
//!
//! fn blink(led: u32) { /* ... */ }
//!
//! POSTS.post_delayed(blink, 2, 500)?;
//! loop {
//!     POSTS.poll();
//! }
//! ```

#![no_std]

pub mod config;
pub mod error;
pub mod task;
pub mod clock;
pub mod scheduler;
pub mod arch;
pub mod kernel;
pub mod sync;

pub use clock::{Clock, FnClock, SoftwareClock, Ticks};
pub use error::{Error, Result};
pub use scheduler::{Scheduler, Stats};
pub use sync::{CriticalSection, GlobalSection};
pub use task::{DuplicatePolicy, Handler, Post, TaskSlot};
