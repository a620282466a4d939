//! # tickpost Configuration
//!
//! Compile-time constants for the global scheduler and the Cortex-M port.
//! All limits are fixed at compile time — no dynamic allocation.

/// Number of task slots in the global scheduler (`kernel`).
/// Each slot holds one pending deferred call. Locally owned schedulers
/// pick their own capacity through the `N` const parameter.
pub const DEFAULT_CAPACITY: usize = 16;

/// SysTick frequency in Hz. One tick is the unit of every `delay`
/// submitted to the global scheduler (1 ms at 1 kHz).
pub const TICK_HZ: u32 = 1000;

/// System clock frequency in Hz (default for STM32F4 at 16 MHz HSI).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;
