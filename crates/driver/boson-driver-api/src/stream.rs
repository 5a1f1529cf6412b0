//! Outward stream interface.
//!
//! The host binding layer (a scripting runtime's object system, a shell, a
//! test harness) consumes a driver through [`StreamDevice`]: byte reads with
//! an inter-byte timeout, all-or-error writes, readiness polling, and
//! callback registration. The trait is synchronous: the receive path
//! busy-waits with a bounded timeout and never yields to a scheduler.

use alloc::boxed::Box;
use bitflags::bitflags;

use crate::error::UartError;
use crate::hw::InterruptPriority;
use crate::id::UartId;

bitflags! {
    /// Readiness flags for [`StreamDevice::poll`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PollFlags: u8 {
        /// At least one byte can be read without waiting.
        const READABLE = 1 << 0;
        /// At least one byte can be written without waiting.
        const WRITABLE = 1 << 1;
    }
}

bitflags! {
    /// Conditions that invoke a registered callback.
    ///
    /// Only [`Trigger::RX_ANY`] is wired to interrupt logic in this design;
    /// the remaining bits are accepted and stored for forward compatibility
    /// with deeper FIFO threshold interrupts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Trigger: u8 {
        /// Any received data is available.
        const RX_ANY = 0x01;
        /// Receive buffer half full.
        const RX_HALF = 0x02;
        /// Receive buffer full.
        const RX_FULL = 0x04;
        /// Transmission completed.
        const TX_DONE = 0x08;

        /// All receive-related trigger bits.
        const RX_MASK = Self::RX_ANY.bits() | Self::RX_HALF.bits() | Self::RX_FULL.bits();
    }
}

/// A user callback dispatched from interrupt context.
///
/// Must be short: it runs inside the interrupt handler after the hardware
/// FIFO has been drained.
pub type Callback = Box<dyn FnMut(UartId) + Send>;

/// Byte-stream interface over a configured UART.
///
/// Every method fails with [`UartError::NotReady`] before a successful
/// initialization (and again after deinitialization).
pub trait StreamDevice {
    /// Reads up to `buf.len()` bytes, stopping early on an inter-byte gap.
    ///
    /// Waits up to two character frame times for the first byte; returns
    /// `Ok(0)` if none arrives (the binding layer treats that as
    /// end-of-stream, not an error). Each subsequent byte gets the same
    /// wait; the count read so far is returned when a wait times out.
    ///
    /// # Errors
    ///
    /// [`UartError::NotReady`] if the peripheral is not configured.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError>;

    /// Writes all of `buf`, returning its length.
    ///
    /// # Errors
    ///
    /// [`UartError::Timeout`] if a byte cannot be queued within the bounded
    /// transmit wait; bytes already sent are not rolled back.
    /// [`UartError::NotReady`] if the peripheral is not configured.
    fn write(&mut self, buf: &[u8]) -> Result<usize, UartError>;

    /// Reports which of the requested directions are ready right now.
    ///
    /// # Errors
    ///
    /// [`UartError::NotReady`] if the peripheral is not configured.
    fn poll(&mut self, flags: PollFlags) -> Result<PollFlags, UartError>;

    /// Returns the number of bytes that can be read without waiting.
    ///
    /// # Errors
    ///
    /// [`UartError::NotReady`] if the peripheral is not configured.
    fn available_count(&self) -> Result<usize, UartError>;

    /// Holds the line in the break condition for two character frame times.
    ///
    /// # Errors
    ///
    /// [`UartError::NotReady`] if the peripheral is not configured.
    fn send_break(&mut self) -> Result<(), UartError>;

    /// Replaces the registered callback.
    ///
    /// The old callback is disabled before the interrupt vector is rebound
    /// at `priority`, then dispatch is re-enabled with the new `trigger`
    /// mask, so the old and new handler never race.
    ///
    /// # Errors
    ///
    /// [`UartError::NotReady`] if the peripheral is not configured.
    fn set_callback(
        &mut self,
        handler: Option<Callback>,
        priority: InterruptPriority,
        trigger: Trigger,
    ) -> Result<(), UartError>;
}
