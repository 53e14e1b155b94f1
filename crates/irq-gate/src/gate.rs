use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Mask/unmask control of one hardware interrupt.
///
/// Both methods must be callable from interrupt context: no blocking, no
/// allocation. Implementations typically wrap an interrupt controller
/// handle (`NVIC`, `enable_irq`/`disable_irq_nosync`, ...).
pub trait IrqLine {
    /// Unmask the interrupt.
    fn enable(&self);
    /// Mask the interrupt. Must not wait for an in-flight handler.
    fn disable(&self);
}

/// Tracks whether the interrupt is currently unmasked and is the only
/// writer of that state.
///
/// The flag and the hardware mask are only ever changed together, inside
/// the non-blocking lock, so they cannot diverge. `M` must be a mutex
/// valid in interrupt context (`CriticalSectionRawMutex` on real
/// hardware, `NoopRawMutex` in single-threaded tests).
pub struct IrqGate<M: RawMutex, L: IrqLine> {
    line: L,
    armed: Mutex<M, Cell<bool>>,
}

impl<M: RawMutex, L: IrqLine> IrqGate<M, L> {
    /// Create a gate in the disarmed state. The caller is responsible for
    /// the hardware starting out masked; see [`IrqGate::disarm`].
    pub const fn new(line: L) -> Self {
        Self {
            line,
            armed: Mutex::new(Cell::new(false)),
        }
    }

    /// Mask the interrupt if it is currently unmasked.
    ///
    /// Idempotent: calling on an already-disarmed gate touches neither the
    /// flag nor the hardware. Safe from interrupt and task context.
    pub fn disarm(&self) {
        self.armed.lock(|armed| {
            if armed.get() {
                self.line.disable();
                armed.set(false);
            }
        });
    }

    /// Unmask the interrupt and return a guard that disarms on drop.
    ///
    /// Call immediately before suspending on the ready condition. The
    /// guard guarantees convergence back to the disarmed baseline on every
    /// exit path, including cancellation by dropping the waiting future.
    /// The interrupt handler usually disarms first when it fires; the
    /// guard's disarm is then a no-op.
    pub fn arm(&self) -> ArmGuard<'_, M, L> {
        self.armed.lock(|armed| {
            armed.set(true);
            self.line.enable();
        });
        ArmGuard { gate: self }
    }

    /// Whether the interrupt is currently unmasked.
    pub fn is_armed(&self) -> bool {
        self.armed.lock(|armed| armed.get())
    }

    /// Tear down the gate, handing the masked interrupt line back.
    pub fn into_line(self) -> L {
        self.disarm();
        self.line
    }
}

/// Disarms the owning [`IrqGate`] when dropped.
pub struct ArmGuard<'a, M: RawMutex, L: IrqLine> {
    gate: &'a IrqGate<M, L>,
}

impl<M: RawMutex, L: IrqLine> Drop for ArmGuard<'_, M, L> {
    fn drop(&mut self) {
        self.gate.disarm();
    }
}
