//! Hardware-access traits.
//!
//! [`UartHw`] is the seam between the driver's logic and a physical UART
//! block: the platform crate implements it over memory-mapped registers,
//! tests implement it over plain state. Methods take `&self` only where they
//! are pure register reads; everything that changes hardware state takes
//! `&mut self` so the borrow checker documents the single-writer discipline.

use bitflags::bitflags;

use crate::config::{FlowControl, LineFormat};

bitflags! {
    /// Receive-side interrupt sources.
    ///
    /// Only the sources this driver handles are modeled; a backend maps them
    /// onto its interrupt-mask/status/clear registers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntSource: u8 {
        /// Receive FIFO reached its trigger threshold.
        const RX = 1 << 0;
        /// Receive timeout: data sat in the FIFO with no new arrivals.
        const RX_TIMEOUT = 1 << 1;
    }
}

/// Hardware FIFO trigger threshold, as a fraction of the FIFO depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FifoLevel {
    /// One eighth full.
    Eighth,
    /// One quarter full.
    Quarter,
    /// Half full.
    Half,
    /// Three quarters full.
    ThreeQuarters,
    /// Seven eighths full.
    SevenEighths,
}

/// Interrupt priority level for a unit's interrupt vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptPriority(pub u8);

impl InterruptPriority {
    /// Default priority used when a unit arms its receive interrupts.
    pub const DEFAULT: Self = Self(3);
}

/// Access to one physical UART unit.
///
/// The lifecycle controller drives `clock_enable`/`reset`/`configure`; the
/// transmit and receive engines use the non-blocking data-path methods; the
/// interrupt handler uses the `int_*` family. Implementations must keep every
/// method non-blocking — bounded waiting is the driver's job.
pub trait UartHw {
    /// Enables the peripheral clock (run and sleep modes).
    fn clock_enable(&mut self);

    /// Gates the peripheral clock off.
    fn clock_disable(&mut self);

    /// Resets the peripheral block. Any enabled interrupts are dropped.
    fn reset(&mut self);

    /// Returns the peripheral clock frequency in hertz.
    fn clock_hz(&self) -> u32;

    /// Programs baud divisors and frame format from the peripheral clock,
    /// leaving the unit enabled.
    fn configure(&mut self, baudrate: u32, format: LineFormat);

    /// Enables the hardware FIFOs.
    fn fifo_enable(&mut self);

    /// Sets the transmit and receive FIFO interrupt thresholds.
    fn set_fifo_levels(&mut self, tx: FifoLevel, rx: FifoLevel);

    /// Programs the flow-control mode.
    fn set_flow_control(&mut self, flow: FlowControl);

    /// Enables the unit (transmit and receive paths).
    fn enable(&mut self);

    /// Disables the unit after the current character drains.
    fn disable(&mut self);

    /// Queues a byte for transmission if there is FIFO room.
    ///
    /// Returns `false` (without blocking) when the transmit FIFO is full.
    fn try_put(&mut self, byte: u8) -> bool;

    /// Takes a received byte out of the FIFO, if one is available.
    fn try_get(&mut self) -> Option<u8>;

    /// Returns `true` if the receive FIFO holds at least one byte.
    fn rx_available(&self) -> bool;

    /// Returns `true` if the transmit FIFO can accept at least one byte.
    fn tx_space(&self) -> bool;

    /// Binds this unit's interrupt vector at the given priority.
    fn int_register(&mut self, priority: InterruptPriority);

    /// Enables the given interrupt sources.
    fn int_enable(&mut self, sources: IntSource);

    /// Disables the given interrupt sources.
    fn int_disable(&mut self, sources: IntSource);

    /// Clears pending status for the given interrupt sources.
    fn int_clear(&mut self, sources: IntSource);

    /// Returns the *masked* interrupt status (pending AND enabled).
    fn int_status(&self) -> IntSource;

    /// Asserts or deasserts the break condition on the transmit line.
    fn set_break(&mut self, asserted: bool);
}

/// Microsecond-granularity busy delay.
///
/// The receive wait loop and the transmit retry loop count time in units of
/// this delay; tests substitute an implementation that records instead of
/// spinning.
pub trait DelayUs {
    /// Busy-waits for (at least) `us` microseconds.
    fn delay_us(&mut self, us: u32);
}
