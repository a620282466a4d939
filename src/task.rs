//! # Task Slots
//!
//! Defines the deferred-call model: the handler type, the duplicate
//! handling policy, the `Post` submission request, and the `TaskSlot`
//! entries that make up the scheduler's fixed table.
//!
//! ## Slot state machine
//!
//! ```text
//!   ┌──────────┐       submit()        ┌──────────┐
//!   │   Free   │ ────────────────────► │ Occupied │
//!   └──────────┘                       └──────────┘
//!        ▲                                  │
//!        │   fired / canceled / superseded  │
//!        └──────────────────────────────────┘
//! ```
//!
//! There is no paused or retry state. A fired or removed task must be
//! submitted again to run again.

use crate::clock::{self, Ticks};

/// A deferred call: a plain function taking one argument.
///
/// Handlers are compared by address, which is what makes a pending task
/// identifiable for cancellation and duplicate detection. Two functions
/// with identical bodies may be merged by the optimizer and then compare
/// equal.
pub type Handler<A> = fn(A);

/// Address equality for handlers.
#[inline]
pub fn same_handler<A>(a: Handler<A>, b: Handler<A>) -> bool {
    a as usize == b as usize
}

// ---------------------------------------------------------------------------
// Duplicate policy
// ---------------------------------------------------------------------------

/// What `submit` does when a matching task is already pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Drop the pending match(es) and admit the new task.
    #[default]
    ReplacePending,
    /// Keep the pending task and reject the new one with
    /// `Error::AlreadyScheduled`.
    RejectIfPending,
    /// Admit regardless; duplicates coexist and each fires.
    AlwaysAdd,
}

// ---------------------------------------------------------------------------
// Submission request
// ---------------------------------------------------------------------------

/// A submission request.
///
/// Defaults: zero delay, `ReplacePending`, matching on the handler only.
///
/// ```ignore
/// scheduler.submit(
///     Post::new(blink, LED_RED)
///         .delay(500)
///         .policy(DuplicatePolicy::RejectIfPending)
///         .compare_arg(true),
/// )?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Post<A, T> {
    /// Function to call. `None` is rejected with `Error::InvalidArgument`.
    pub handler: Option<Handler<A>>,
    /// Passed to `handler` unchanged.
    pub arg: A,
    /// Ticks to wait, counted from admission. Zero fires on the next poll.
    pub delay: T,
    /// Duplicate handling.
    pub policy: DuplicatePolicy,
    /// Include `arg` when deciding whether a pending task is a duplicate.
    pub compare_arg: bool,
}

impl<A, T: Ticks> Post<A, T> {
    /// Immediate post of `handler(arg)` with default policy.
    pub fn new(handler: Handler<A>, arg: A) -> Self {
        Self {
            handler: Some(handler),
            arg,
            delay: T::ZERO,
            policy: DuplicatePolicy::default(),
            compare_arg: false,
        }
    }

    /// Set the delay in ticks.
    pub fn delay(mut self, delay: T) -> Self {
        self.delay = delay;
        self
    }

    /// Set the duplicate policy.
    pub fn policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compare arguments as well as handlers for duplicate detection.
    pub fn compare_arg(mut self, compare: bool) -> Self {
        self.compare_arg = compare;
        self
    }

    /// The filter used to look for conflicting pending tasks.
    pub(crate) fn conflict_filter(&self) -> Option<&A> {
        if self.compare_arg {
            Some(&self.arg)
        } else {
            None
        }
    }
}

impl<A: Default, T: Ticks> Default for Post<A, T> {
    fn default() -> Self {
        Self {
            handler: None,
            arg: A::default(),
            delay: T::ZERO,
            policy: DuplicatePolicy::default(),
            compare_arg: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Pending task / slot
// ---------------------------------------------------------------------------

/// An admitted deferred call.
#[derive(Debug, Clone, Copy)]
pub struct Task<A, T> {
    /// Tick captured at admission.
    pub start_time: T,
    /// Requested delay in ticks.
    pub delay: T,
    pub handler: Handler<A>,
    pub arg: A,
}

impl<A, T: Ticks> Task<A, T> {
    /// Whether this task should fire at `now`.
    #[inline]
    pub fn is_due(&self, now: T) -> bool {
        clock::is_due(self.start_time, self.delay, now)
    }

    /// Identity match: same handler, and same argument when a filter is
    /// given. `None` matches any argument.
    #[inline]
    pub fn matches(&self, handler: Handler<A>, arg: Option<&A>) -> bool
    where
        A: PartialEq,
    {
        same_handler(self.handler, handler) && arg.map_or(true, |a| *a == self.arg)
    }
}

/// One entry in the scheduler table: free, or holding a pending `Task`.
#[derive(Debug, Clone, Copy)]
pub struct TaskSlot<A, T> {
    task: Option<Task<A, T>>,
}

impl<A, T> TaskSlot<A, T> {
    /// A free slot. Used to initialize the table.
    pub const FREE: Self = Self { task: None };

    #[inline]
    pub fn is_free(&self) -> bool {
        self.task.is_none()
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.task.is_some()
    }

    /// The pending task, if any.
    #[inline]
    pub fn task(&self) -> Option<&Task<A, T>> {
        self.task.as_ref()
    }

    /// Occupy the slot.
    #[inline]
    pub fn fill(&mut self, task: Task<A, T>) {
        self.task = Some(task);
    }

    /// Free the slot.
    #[inline]
    pub fn clear(&mut self) {
        self.task = None;
    }
}

impl<A: Copy + PartialEq, T: Ticks> TaskSlot<A, T> {
    /// Whether the slot is occupied by a task matching `handler`/`arg`.
    #[inline]
    pub fn matches(&self, handler: Handler<A>, arg: Option<&A>) -> bool {
        self.task.map_or(false, |t| t.matches(handler, arg))
    }

    /// Free the slot and hand back its task if it is due at `now`.
    #[inline]
    pub fn take_if_due(&mut self, now: T) -> Option<Task<A, T>> {
        match self.task {
            Some(task) if task.is_due(now) => self.task.take(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
