use core;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusE> {
    /// A control line or the interrupt mapping was rejected at
    /// construction time. No device handle is created.
    Config,
    /// Non-blocking read with no data ready. Retry later.
    WouldBlock,
    /// Blocking read aborted by [`cancel_read`](crate::Pn544::cancel_read).
    /// The interrupt is back at the disarmed baseline.
    Interrupted,
    /// Transport failure, propagated verbatim. No internal retry.
    Bus(BusE),
    /// The transport accepted fewer bytes of a frame than it was given.
    ShortWrite { sent: usize, expected: usize },
    /// The transport claims to have produced more bytes than were asked
    /// for. The buffer contents are not to be trusted.
    TooMuchData(usize),
    /// Power command argument outside the supported modes.
    InvalidPowerMode(u8),
}

impl<E: core::fmt::Display> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config => {
                write!(f, "invalid control line or interrupt mapping")
            }
            Error::WouldBlock => write!(f, "no data ready"),
            Error::Interrupted => write!(f, "read cancelled"),
            Error::Bus(err) => {
                write!(f, "bus transfer error: {}", err)
            }
            Error::ShortWrite { sent, expected } => {
                write!(f, "chip accepted {} of {} bytes", sent, expected)
            }
            Error::TooMuchData(count) => {
                write!(f, "chip produced {} bytes, more than requested", count)
            }
            Error::InvalidPowerMode(arg) => {
                write!(f, "unsupported power mode {}", arg)
            }
        }
    }
}
