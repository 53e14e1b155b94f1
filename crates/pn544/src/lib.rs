#![no_std]
#![allow(async_fn_in_trait)]
//! Driver for the NXP PN544 NFC controller.
//!
//! The PN544 is a transparent byte pipe: frames go out over the bus
//! unmodified, and the chip raises its data-ready line when a frame is
//! waiting, keeping it asserted until the host drains it. This crate owns
//! the coordination between that interrupt, blocking readers, and the
//! VEN/FIRM power sequencing. NFC protocol semantics are out of scope.
//!
//! The driver is generic over the bus ([`FrameBus`]), the two control
//! outputs (`OutputPin`), the ready line ([`ReadyLine`]) and the
//! interrupt mask (`irq_gate::IrqLine`), so it runs unchanged on any HAL
//! and on the host under test. Share one instance across tasks by
//! reference; every operation takes `&self`.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;
use irq_gate::{IrqGate, IrqLine, ReadyWait};

pub use crate::bus::{FrameBus, I2cFrameBus, PN544_I2C_ADDR};
pub use crate::errors::Error;
pub use crate::power::PowerMode;
use crate::power::ControlLines;

pub mod bus;
pub mod errors;
pub mod power;

/// Maximum bytes in one bus transaction. Longer reads are capped, longer
/// writes truncated.
pub const MAX_FRAME_LEN: usize = 512;

/// Level read of the data-ready GPIO.
///
/// Must be callable from interrupt context through a shared reference;
/// wrap your HAL's input pin accordingly. The chip holds the line high
/// until its outgoing frame has been read.
pub trait ReadyLine {
    fn is_asserted(&self) -> bool;
}

/// One attached PN544.
///
/// `M` selects the lock implementation: `CriticalSectionRawMutex` on
/// hardware (the armed flag is touched from interrupt context),
/// `NoopRawMutex` in single-threaded tests.
pub struct Pn544<M: RawMutex, B, V, F, R, L: IrqLine> {
    bus: Mutex<M, B>,
    /// Serializes the wait-plus-receive read transaction. Writers never
    /// take this; a write may interleave with a blocked read.
    read_lock: Mutex<M, ()>,
    lines: Mutex<M, ControlLines<V, F>>,
    ready: R,
    gate: IrqGate<M, L>,
    readers: ReadyWait,
    cancel: Signal<M, ()>,
}

impl<M, B, V, F, R, L> Pn544<M, B, V, F, R, L>
where
    M: RawMutex,
    B: FrameBus,
    V: OutputPin,
    F: OutputPin,
    R: ReadyLine,
    L: IrqLine,
{
    /// Bind a driver to its hardware resources.
    ///
    /// Drives both control lines to the low (chip off) baseline and masks
    /// the interrupt; a line that cannot be driven fails construction
    /// with [`Error::Config`] and no device is created.
    pub fn try_new(
        bus: B,
        mut ven: V,
        mut firm: F,
        ready: R,
        irq: L,
    ) -> Result<Self, Error<B::Error>> {
        ven.set_low().map_err(|_| Error::Config)?;
        firm.set_low().map_err(|_| Error::Config)?;
        // The interrupt may come registered in either state; converge to
        // masked before any reader can arm it.
        irq.disable();
        Ok(Self {
            bus: Mutex::new(bus),
            read_lock: Mutex::new(()),
            lines: Mutex::new(ControlLines { ven, firm }),
            ready,
            gate: IrqGate::new(irq),
            readers: ReadyWait::new(),
            cancel: Signal::new(),
        })
    }

    /// Whether the chip currently has a frame waiting.
    pub fn data_ready(&self) -> bool {
        self.ready.is_asserted()
    }

    /// Interrupt handler body. Call from the ready line's IRQ.
    ///
    /// Masks the interrupt on a genuine fire (the line stays high until
    /// the frame is drained, so leaving it unmasked would storm) and
    /// wakes the blocked reader. A spurious fire with the line low is
    /// ignored. Never blocks, never allocates.
    pub fn on_interrupt(&self) {
        if self.ready.is_asserted() {
            self.gate.disarm();
            self.readers.notify();
        }
    }

    /// Abort a blocked [`read`](Self::read) with [`Error::Interrupted`].
    ///
    /// The reader re-masks the interrupt on its way out, leaving the
    /// device ready for a fresh attempt. No effect on the data path
    /// otherwise.
    pub fn cancel_read(&self) {
        self.cancel.signal(());
    }

    /// Read one frame, waiting for the chip if none is ready.
    ///
    /// At most `buf.len()` bytes are requested, capped to
    /// [`MAX_FRAME_LEN`]. Returns the number of bytes the chip produced,
    /// which may be zero.
    pub async fn read(&self, buf: &mut [u8]) -> Result<usize, Error<B::Error>> {
        self.read_inner(buf, true).await
    }

    /// Read one frame without waiting.
    ///
    /// Fails with [`Error::WouldBlock`] when no data is ready; the bus is
    /// not touched in that case.
    pub async fn try_read(
        &self,
        buf: &mut [u8],
    ) -> Result<usize, Error<B::Error>> {
        self.read_inner(buf, false).await
    }

    /// Read one frame into an owned buffer.
    pub async fn read_frame(
        &self,
    ) -> Result<Vec<u8, MAX_FRAME_LEN>, Error<B::Error>> {
        let mut frame: Vec<u8, MAX_FRAME_LEN> = Vec::new();
        let _ = frame.resize_default(MAX_FRAME_LEN);
        let n = self.read(&mut frame).await?;
        frame.truncate(n);
        Ok(frame)
    }

    async fn read_inner(
        &self,
        buf: &mut [u8],
        block: bool,
    ) -> Result<usize, Error<B::Error>> {
        let cap = buf.len().min(MAX_FRAME_LEN);
        let _read = self.read_lock.lock().await;

        if !self.ready.is_asserted() {
            if !block {
                return Err(Error::WouldBlock);
            }

            // Drop any cancellation aimed at an earlier, already-finished
            // read.
            self.cancel.reset();
            let _armed = self.gate.arm();
            match select(
                self.readers.wait_until(|| self.ready.is_asserted()),
                self.cancel.wait(),
            )
            .await
            {
                Either::First(()) => {}
                Either::Second(()) => return Err(Error::Interrupted),
            }
            // `_armed` drops here. The handler already masked the
            // interrupt when it fired; this covers the race where the
            // line rose without an observed fire.
        }

        let count = self
            .bus
            .lock()
            .await
            .recv(&mut buf[..cap])
            .await
            .map_err(Error::Bus)?;
        if count > cap {
            return Err(Error::TooMuchData(count));
        }
        Ok(count)
    }

    /// Push one frame to the chip.
    ///
    /// Payloads longer than [`MAX_FRAME_LEN`] are silently truncated to
    /// one frame. Fails with [`Error::ShortWrite`] if the chip did not
    /// accept the whole (truncated) frame. Independent of the read path:
    /// a blocked reader does not delay writes.
    pub async fn write(&self, payload: &[u8]) -> Result<usize, Error<B::Error>> {
        let expected = payload.len().min(MAX_FRAME_LEN);
        let frame = &payload[..expected];

        let sent = self
            .bus
            .lock()
            .await
            .send(frame)
            .await
            .map_err(Error::Bus)?;
        if sent != expected {
            return Err(Error::ShortWrite { sent, expected });
        }
        Ok(sent)
    }

    /// Drive the chip into `mode` with the chip-mandated line sequence
    /// and settle times.
    ///
    /// Concurrent power commands serialize on the line lock. The power
    /// path takes no lock against an in-flight read; powering off under a
    /// blocked reader leaves it waiting on a line that will not assert —
    /// pair with [`cancel_read`](Self::cancel_read) if that matters to
    /// the caller.
    pub async fn set_power(&self, mode: PowerMode, delay: &mut impl DelayNs) {
        let mut lines = self.lines.lock().await;
        lines.apply(mode, delay).await;
    }

    /// Control-surface entry point: integer mode argument as accepted by
    /// the power command.
    ///
    /// Anything outside `{0, 1, 2}` is rejected with
    /// [`Error::InvalidPowerMode`] before any line changes.
    pub async fn set_power_arg(
        &self,
        arg: u8,
        delay: &mut impl DelayNs,
    ) -> Result<(), Error<B::Error>> {
        let mode =
            PowerMode::from_arg(arg).ok_or(Error::InvalidPowerMode(arg))?;
        self.set_power(mode, delay).await;
        Ok(())
    }

    /// Tear the driver down, returning the hardware resources.
    ///
    /// The interrupt is masked first, then the lines are handed back;
    /// reverse order of acquisition.
    pub fn into_parts(self) -> (B, V, F, R, L) {
        let irq = self.gate.into_line();
        let ControlLines { ven, firm } = self.lines.into_inner();
        (self.bus.into_inner(), ven, firm, self.ready, irq)
    }
}
