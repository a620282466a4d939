//! # Architecture Abstraction Layer
//!
//! Hardware ports supplying a tick interrupt and a critical section.
//! Currently implements the Cortex-M4 port; extensible to other
//! architectures by adding sibling modules.

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod cortex_m4;
