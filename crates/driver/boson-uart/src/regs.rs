//! UART register block layout.
//!
//! Offsets and bit layouts for the PL011-compatible UART block used by both
//! units, plus the encoding helpers shared by the MMIO backend.

use bitflags::bitflags;
use boson_driver_api::{FifoLevel, LineFormat, Parity, StopBits, WordLength};

/// Register offsets from the UART base address.
pub mod reg {
    /// Data register (read: receive FIFO, write: transmit FIFO).
    pub const DR: usize = 0x000;
    /// Flag register (read-only line/FIFO status).
    pub const FR: usize = 0x018;
    /// Integer baud-rate divisor.
    pub const IBRD: usize = 0x024;
    /// Fractional baud-rate divisor (1/64ths).
    pub const FBRD: usize = 0x028;
    /// Line control: frame format, FIFO enable, break.
    pub const LCRH: usize = 0x02C;
    /// Control: unit enable, direction enables, flow control.
    pub const CTL: usize = 0x030;
    /// FIFO interrupt trigger levels.
    pub const IFLS: usize = 0x034;
    /// Interrupt mask (enable) register.
    pub const IM: usize = 0x038;
    /// Masked interrupt status (pending AND enabled).
    pub const MIS: usize = 0x040;
    /// Interrupt clear register (write 1 to clear).
    pub const ICR: usize = 0x044;
}

bitflags! {
    /// Flag register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Fr: u32 {
        /// Transmitter busy shifting a character out.
        const BUSY = 1 << 3;
        /// Receive FIFO empty.
        const RXFE = 1 << 4;
        /// Transmit FIFO full.
        const TXFF = 1 << 5;
        /// Receive FIFO full.
        const RXFF = 1 << 6;
        /// Transmit FIFO empty.
        const TXFE = 1 << 7;
    }
}

bitflags! {
    /// Line control register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LcrH: u32 {
        /// Send break: hold the line low while set.
        const BRK = 1 << 0;
        /// Parity enable.
        const PEN = 1 << 1;
        /// Even parity select (with PEN).
        const EPS = 1 << 2;
        /// Two stop bits.
        const STP2 = 1 << 3;
        /// FIFO enable.
        const FEN = 1 << 4;
        /// Word length bit 0 (00 = 5 bits .. 11 = 8 bits).
        const WLEN_0 = 1 << 5;
        /// Word length bit 1.
        const WLEN_1 = 1 << 6;
    }
}

bitflags! {
    /// Control register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ctl: u32 {
        /// UART enable.
        const UARTEN = 1 << 0;
        /// Transmit path enable.
        const TXE = 1 << 8;
        /// Receive path enable.
        const RXE = 1 << 9;
        /// Hardware RTS flow control (receive side).
        const RTSEN = 1 << 14;
        /// Hardware CTS flow control (transmit side).
        const CTSEN = 1 << 15;
    }
}

bitflags! {
    /// Interrupt mask/status/clear bits (IM, MIS, ICR share the layout).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Im: u32 {
        /// Receive FIFO reached its trigger level.
        const RX = 1 << 4;
        /// Receive timeout: FIFO non-empty with no new arrivals.
        const RT = 1 << 6;
    }
}

/// Computes the integer and fractional baud divisors for the given clock.
///
/// The divisor is `clock / (16 * baud)` in units of 1/64, rounded to the
/// nearest: `IBRD` takes the integer part, `FBRD` the 6-bit fraction.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn baud_divisors(clock_hz: u32, baudrate: u32) -> (u16, u8) {
    let denom = u64::from(16 * baudrate);
    let div = (u64::from(clock_hz) * 64 + denom / 2) / denom;
    ((div >> 6) as u16, (div & 0x3F) as u8)
}

/// Encodes a frame format into line-control bits (FIFO enable not included).
#[must_use]
pub fn lcrh_format(format: LineFormat) -> LcrH {
    let mut bits = match format.word_length {
        WordLength::Five => LcrH::empty(),
        WordLength::Six => LcrH::WLEN_0,
        WordLength::Seven => LcrH::WLEN_1,
        WordLength::Eight => LcrH::WLEN_0 | LcrH::WLEN_1,
    };
    match format.parity {
        Parity::None => {}
        Parity::Even => bits |= LcrH::PEN | LcrH::EPS,
        Parity::Odd => bits |= LcrH::PEN,
    }
    if format.stop_bits == StopBits::Two {
        bits |= LcrH::STP2;
    }
    bits
}

/// Encodes FIFO trigger levels for the IFLS register.
#[must_use]
pub fn ifls_value(tx: FifoLevel, rx: FifoLevel) -> u32 {
    const fn encode(level: FifoLevel) -> u32 {
        match level {
            FifoLevel::Eighth => 0b000,
            FifoLevel::Quarter => 0b001,
            FifoLevel::Half => 0b010,
            FifoLevel::ThreeQuarters => 0b011,
            FifoLevel::SevenEighths => 0b100,
        }
    }
    encode(tx) | (encode(rx) << 3)
}
