//! UART configuration surface.
//!
//! These are the types the host binding layer builds from constructor
//! arguments. All validation happens here, before the driver touches any
//! hardware: a configuration that fails to build leaves a previously
//! configured peripheral exactly as it was.

use bitflags::bitflags;

use crate::error::UartError;
use crate::id::{UART_COUNT, UartId};

/// Data bits per character frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WordLength {
    /// 5 data bits.
    Five = 5,
    /// 6 data bits.
    Six = 6,
    /// 7 data bits.
    Seven = 7,
    /// 8 data bits.
    Eight = 8,
}

impl WordLength {
    /// Returns the number of data bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for WordLength {
    type Error = UartError;

    fn try_from(bits: u8) -> Result<Self, UartError> {
        match bits {
            5 => Ok(Self::Five),
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            _ => Err(UartError::InvalidArgs),
        }
    }
}

/// Parity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    /// No parity bit.
    #[default]
    None,
    /// Even parity.
    Even,
    /// Odd parity.
    Odd,
}

/// Stop bits per character frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StopBits {
    /// One stop bit.
    One = 1,
    /// Two stop bits.
    Two = 2,
}

impl TryFrom<u8> for StopBits {
    type Error = UartError;

    fn try_from(count: u8) -> Result<Self, UartError> {
        match count {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(UartError::InvalidArgs),
        }
    }
}

/// Character frame format: word length, parity, stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    /// Data bits per frame.
    pub word_length: WordLength,
    /// Parity mode.
    pub parity: Parity,
    /// Stop bits per frame.
    pub stop_bits: StopBits,
}

impl Default for LineFormat {
    /// 8 data bits, no parity, 1 stop bit.
    fn default() -> Self {
        Self {
            word_length: WordLength::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

bitflags! {
    /// Hardware flow-control directions.
    ///
    /// Derived from the pin assignment: a present RTS pin enables receive
    /// flow control, a present CTS pin transmit flow control. `empty()`
    /// means no flow control.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FlowControl: u8 {
        /// Receive flow control (RTS asserted by this side).
        const RX = 1 << 0;
        /// Transmit flow control (CTS honored by this side).
        const TX = 1 << 1;
    }
}

/// A board pin, identified by its package number.
///
/// Pin multiplexing itself is outside this driver; pins appear here only so
/// that a pin-list combination can be validated and flow control derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin(pub u8);

/// Default (tx, rx) pin pairs per unit.
const DEFAULT_PINS: [(Pin, Pin); UART_COUNT] = [(Pin(1), Pin(2)), (Pin(3), Pin(4))];

/// How the UART's pins are assigned.
///
/// Mirrors the accepted constructor forms: the unit's default pin pair, an
/// explicit 2-element data-pin list, or a 4-element list that adds the
/// flow-control pins. Any entry may be absent for a direction that is not
/// wired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinAssignment {
    /// Use the unit's default (tx, rx) pair.
    #[default]
    Default,
    /// Explicit data pins only; flow control stays disabled.
    Data {
        /// Transmit pin.
        tx: Option<Pin>,
        /// Receive pin.
        rx: Option<Pin>,
    },
    /// Data plus flow-control pins.
    Full {
        /// Transmit pin.
        tx: Option<Pin>,
        /// Receive pin.
        rx: Option<Pin>,
        /// Request-to-send pin (requires `rx`).
        rts: Option<Pin>,
        /// Clear-to-send pin (requires `tx`).
        cts: Option<Pin>,
    },
}

impl PinAssignment {
    /// Resolves the data pins, substituting the unit defaults.
    #[must_use]
    pub fn data_pins(&self, id: UartId) -> (Option<Pin>, Option<Pin>) {
        match *self {
            Self::Default => {
                let (tx, rx) = DEFAULT_PINS[id.index()];
                (Some(tx), Some(rx))
            }
            Self::Data { tx, rx } | Self::Full { tx, rx, .. } => (tx, rx),
        }
    }

    /// Validates the combination and derives the flow-control mode.
    fn validate(&self) -> Result<FlowControl, UartError> {
        match *self {
            Self::Default | Self::Data { .. } => Ok(FlowControl::empty()),
            Self::Full { tx, rx, rts, cts } => {
                if rts.is_some() && rx.is_none() {
                    // RTS pin given in TX-only mode.
                    return Err(UartError::InvalidArgs);
                }
                if cts.is_some() && tx.is_none() {
                    // CTS pin given in RX-only mode.
                    return Err(UartError::InvalidArgs);
                }
                let mut flow = FlowControl::empty();
                if rts.is_some() {
                    flow |= FlowControl::RX;
                }
                if cts.is_some() {
                    flow |= FlowControl::TX;
                }
                Ok(flow)
            }
        }
    }
}

/// A validated UART configuration.
///
/// Construction is the validation boundary: once a `UartConfig` exists it
/// can be applied to hardware without further checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    baudrate: u32,
    format: LineFormat,
    pins: PinAssignment,
    flow: FlowControl,
}

impl UartConfig {
    /// Builds a configuration from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`UartError::InvalidArgs`] for a zero baud rate or an
    /// inconsistent pin list (RTS without RX, CTS without TX).
    pub fn new(
        baudrate: u32,
        format: LineFormat,
        pins: PinAssignment,
    ) -> Result<Self, UartError> {
        if baudrate == 0 {
            return Err(UartError::InvalidArgs);
        }
        let flow = pins.validate()?;
        Ok(Self {
            baudrate,
            format,
            pins,
            flow,
        })
    }

    /// Builds an 8N1 configuration on the default pins.
    ///
    /// # Errors
    ///
    /// Returns [`UartError::InvalidArgs`] for a zero baud rate.
    pub fn eight_n_one(baudrate: u32) -> Result<Self, UartError> {
        Self::new(baudrate, LineFormat::default(), PinAssignment::Default)
    }

    /// Returns the baud rate.
    #[must_use]
    pub const fn baudrate(&self) -> u32 {
        self.baudrate
    }

    /// Returns the frame format.
    #[must_use]
    pub const fn format(&self) -> LineFormat {
        self.format
    }

    /// Returns the pin assignment.
    #[must_use]
    pub const fn pins(&self) -> PinAssignment {
        self.pins
    }

    /// Returns the flow-control mode derived from the pin assignment.
    #[must_use]
    pub const fn flow_control(&self) -> FlowControl {
        self.flow
    }
}
