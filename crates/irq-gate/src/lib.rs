#![no_std]
//! Interrupt-gated wait/wake primitives for data-ready style peripherals.
//!
//! Many chips signal "data available" by asserting a GPIO line and keeping
//! it asserted until the host drains the data. The host must mask the
//! interrupt as soon as it fires (the level stays high while a slow
//! consumer catches up) and re-arm it only right before a task is about to
//! suspend. [`IrqGate`] owns that mask/unmask state machine; [`ReadyWait`]
//! carries the wake from interrupt context to the suspended task without
//! losing it to the register/check race.

mod gate;
mod wait;

pub use gate::{ArmGuard, IrqGate, IrqLine};
pub use wait::ReadyWait;
