use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

// Chip-mandated settle times. Shortening or reordering these breaks mode
// latching on the chip side.
pub const T_OFF_MS: u32 = 60;
pub const T_BOOT_MS: u32 = 300;
pub const T_FW_SETTLE_MS: u32 = 20;
pub const T_RESET_LOW_MS: u32 = 60;

/// Chip power/boot modes selectable through the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Chip held in reset, VEN low.
    Off = 0,
    /// Normal operation.
    On = 1,
    /// Reset pulse with FIRM held high; the chip boots into its firmware
    /// download loader and then behaves as in normal mode.
    FirmwareDownload = 2,
}

impl PowerMode {
    /// Decode the control-surface integer argument.
    pub fn from_arg(arg: u8) -> Option<Self> {
        match arg {
            0 => Some(PowerMode::Off),
            1 => Some(PowerMode::On),
            2 => Some(PowerMode::FirmwareDownload),
            _ => None,
        }
    }
}

/// The two output lines driving chip life-cycle: VEN (enable/reset) and
/// FIRM (boot mode select). Only ever touched from task context, behind
/// the device's line lock.
pub(crate) struct ControlLines<V, F> {
    pub ven: V,
    pub firm: F,
}

impl<V: OutputPin, F: OutputPin> ControlLines<V, F> {
    pub async fn apply(&mut self, mode: PowerMode, delay: &mut impl DelayNs) {
        match mode {
            PowerMode::Off => {
                self.firm.set_low().unwrap();
                self.ven.set_low().unwrap();
                delay.delay_ms(T_OFF_MS).await;
            }
            PowerMode::On => {
                self.firm.set_low().unwrap();
                self.ven.set_high().unwrap();
                delay.delay_ms(T_BOOT_MS).await;
            }
            PowerMode::FirmwareDownload => {
                // The chip samples FIRM on the rising edge of VEN, so FIRM
                // stays high across the whole reset pulse.
                self.firm.set_high().unwrap();
                self.ven.set_high().unwrap();
                delay.delay_ms(T_FW_SETTLE_MS).await;
                self.ven.set_low().unwrap();
                delay.delay_ms(T_RESET_LOW_MS).await;
                self.ven.set_high().unwrap();
                delay.delay_ms(T_FW_SETTLE_MS).await;
            }
        }
    }
}
