//! # Scheduler
//!
//! Core scheduling logic for tickpost: a fixed table of deferred calls,
//! admission with duplicate handling, and a one-shot dispatch sweep.
//!
//! ## Dispatch Algorithm
//!
//! Each `poll()` call:
//! 1. **Visit every slot** in table order, one short critical section each
//! 2. **Read the clock** inside that section
//! 3. **Take due tasks**: a slot that is due is freed while still inside
//!    the section, so it can never fire twice
//! 4. **Invoke** the captured handler after the section is released
//!
//! Because handlers run with the section released, a handler may submit
//! or cancel tasks on the same scheduler without deadlocking. A task it
//! submits into a slot that this sweep has not reached yet can fire in the
//! same pass only if it is already due.
//!
//! ## Ordering
//!
//! Tasks due in the same pass are invoked in slot order. Slot assignment
//! depends on which slots happen to be free, so callers must not rely on
//! it as a priority or FIFO guarantee.

use core::cell::RefCell;
use core::fmt;

use crate::clock::{Clock, Ticks};
use crate::error::{Error, Result};
use crate::sync::CriticalSection;
use crate::task::{DuplicatePolicy, Handler, Post, Task, TaskSlot};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Occupancy snapshot. `active + free == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Pending tasks.
    pub active: usize,
    /// Table capacity.
    pub total: usize,
    /// Slots available for admission.
    pub free: usize,
}

// ---------------------------------------------------------------------------
// Scheduler struct
// ---------------------------------------------------------------------------

/// Fixed-capacity deferred-call scheduler.
///
/// - `A`: argument handed to each handler (`Copy`, compared with `==`)
/// - `C`: tick source
/// - `L`: critical section guarding the table
/// - `N`: number of slots
///
/// All operations take `&self`, so one scheduler can be shared between
/// the main loop and interrupt handlers, typically as a `static`.
/// Argument comparisons (`A::eq`) run inside the critical section and
/// must not call back into the same scheduler; doing so panics.
///
/// ```ignore
/// static POSTS: Scheduler<u32, FnClock<fn() -> u32>, GlobalSection, 8> =
///     Scheduler::new(FnClock(hal_get_tick as fn() -> u32), GlobalSection);
/// ```
pub struct Scheduler<A, C: Clock, L, const N: usize> {
    /// Slot table. Only borrowed inside `lock.with`.
    table: RefCell<[TaskSlot<A, C::Tick>; N]>,
    clock: C,
    lock: L,
}

// Safety: the table and its borrow flag are only touched through
// `with_table`, which holds the critical section for the whole access.
// Tasks cross contexts by value.
unsafe impl<A, C, L, const N: usize> Sync for Scheduler<A, C, L, N>
where
    A: Send,
    C: Clock + Sync,
    C::Tick: Send,
    L: CriticalSection + Sync,
{
}

impl<A, C: Clock, L, const N: usize> Scheduler<A, C, L, N> {
    /// Create a scheduler with every slot free.
    pub const fn new(clock: C, lock: L) -> Self {
        Self {
            table: RefCell::new([TaskSlot::FREE; N]),
            clock,
            lock,
        }
    }

    /// Number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The tick source this scheduler reads.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<A, C, L, const N: usize> Scheduler<A, C, L, N>
where
    A: Copy + PartialEq,
    C: Clock,
    L: CriticalSection,
{
    /// Run `f` on the table inside the critical section.
    ///
    /// # Panics
    /// If the table is already borrowed, which only happens when an
    /// argument comparison running inside `f` calls back into this
    /// scheduler.
    #[inline]
    fn with_table<R>(&self, f: impl FnOnce(&mut [TaskSlot<A, C::Tick>; N]) -> R) -> R {
        self.lock.with(|| match self.table.try_borrow_mut() {
            Ok(mut table) => f(&mut table),
            Err(_) => panic!("scheduler re-entered while its table is borrowed"),
        })
    }

    /// Admit a deferred call.
    ///
    /// # Returns
    /// - `Ok(())` — the task occupies a slot and will fire once due
    /// - `Err(Error::InvalidArgument)` — `post.handler` is `None`
    /// - `Err(Error::AlreadyScheduled)` — `RejectIfPending` found a match
    /// - `Err(Error::TableFull)` — no free slot
    ///
    /// The clock read, conflict scan, any replacement and the slot write
    /// happen in a single critical section.
    pub fn submit(&self, post: Post<A, C::Tick>) -> Result<()> {
        let handler = post.handler.ok_or(Error::InvalidArgument)?;
        let filter = post.conflict_filter();

        self.with_table(|table| {
            let start_time = self.clock.now();

            match post.policy {
                DuplicatePolicy::ReplacePending => {
                    for slot in table.iter_mut().filter(|s| s.matches(handler, filter)) {
                        slot.clear();
                    }
                }
                DuplicatePolicy::RejectIfPending => {
                    if table.iter().any(|s| s.matches(handler, filter)) {
                        return Err(Error::AlreadyScheduled);
                    }
                }
                DuplicatePolicy::AlwaysAdd => {}
            }

            let slot = table
                .iter_mut()
                .find(|s| s.is_free())
                .ok_or(Error::TableFull)?;
            slot.fill(Task {
                start_time,
                delay: post.delay,
                handler,
                arg: post.arg,
            });
            Ok(())
        })
    }

    /// Post `handler(arg)` to run on the next poll, replacing any pending
    /// call of the same handler.
    pub fn post(&self, handler: Handler<A>, arg: A) -> Result<()> {
        self.submit(Post::new(handler, arg))
    }

    /// Post `handler(arg)` to run once `delay` ticks have elapsed,
    /// replacing any pending call of the same handler.
    pub fn post_delayed(&self, handler: Handler<A>, arg: A, delay: C::Tick) -> Result<()> {
        self.submit(Post::new(handler, arg).delay(delay))
    }

    /// Cancel every pending call of `handler`, restricted to argument
    /// `arg` when given.
    ///
    /// A call already taken by a running `poll()` is past cancellation
    /// and still runs.
    pub fn cancel(&self, handler: Handler<A>, arg: Option<A>) {
        self.with_table(|table| {
            for slot in table.iter_mut().filter(|s| s.matches(handler, arg.as_ref())) {
                slot.clear();
            }
        });
    }

    /// Free every slot.
    pub fn cancel_all(&self) {
        self.with_table(|table| table.iter_mut().for_each(TaskSlot::clear));
    }

    /// Whether a call of `handler` (with argument `arg`, when given) is
    /// pending.
    pub fn contains(&self, handler: Handler<A>, arg: Option<A>) -> bool {
        self.with_table(|table| table.iter().any(|s| s.matches(handler, arg.as_ref())))
    }

    /// Fire every due task once.
    ///
    /// Never blocks. Intended to be called frequently from the main loop
    /// or a low-priority task, not from interrupt context.
    ///
    /// # Returns
    /// Number of handlers invoked.
    pub fn poll(&self) -> usize {
        let mut fired = 0;

        for index in 0..N {
            let due = self.with_table(|table| table[index].take_if_due(self.clock.now()));
            if let Some(task) = due {
                (task.handler)(task.arg);
                fired += 1;
            }
        }

        fired
    }

    /// Consistent occupancy snapshot.
    pub fn stats(&self) -> Stats {
        let active = self.with_table(|table| table.iter().filter(|s| s.is_occupied()).count());
        Stats {
            active,
            total: N,
            free: N - active,
        }
    }
}

impl<A, C, L, const N: usize> fmt::Debug for Scheduler<A, C, L, N>
where
    A: Copy + PartialEq,
    C: Clock,
    L: CriticalSection,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("stats", &self.stats())
            .field("now", &self.clock.now())
            .finish()
    }
}
