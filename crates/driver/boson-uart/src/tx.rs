//! Transmit engine.
//!
//! Synchronous, polling-only transmission: no interrupts, no shared buffer,
//! one writer. Each byte is offered to the hardware FIFO; on a full FIFO the
//! engine sleeps one frame time and retries, bounded by a 5 ms wall-clock
//! budget.

use boson_driver_api::{DelayUs, UartError, UartHw};

use crate::driver::UartDriver;
use crate::timing;

impl<H: UartHw, D: DelayUs> UartDriver<H, D> {
    /// Queues one byte, retrying while the transmit FIFO is full.
    ///
    /// Returns `false` — not an error — when the byte could not be queued
    /// within [`timing::TX_MAX_TIMEOUT_MS`].
    pub(crate) fn tx_byte(&mut self, byte: u8) -> bool {
        let max_retries = timing::tx_max_retries(self.baudrate);
        let mut retries = 0;
        while !self.hw.try_put(byte) {
            if retries > max_retries {
                return false;
            }
            retries += 1;
            self.delay.delay_us(timing::tx_wait_us(self.baudrate));
        }
        true
    }

    /// Writes a byte slice in text mode, inserting a carriage return before
    /// every line feed.
    ///
    /// Used by text-stream callers only; raw binary writers go through the
    /// stream interface's `write`.
    ///
    /// # Errors
    ///
    /// [`UartError::NotReady`] if unconfigured; [`UartError::Timeout`] on
    /// the first byte that cannot be queued (earlier bytes stay sent).
    pub fn write_cooked(&mut self, buf: &[u8]) -> Result<usize, UartError> {
        self.check_ready()?;
        for &byte in buf {
            if byte == b'\n' && !self.tx_byte(b'\r') {
                return Err(UartError::Timeout);
            }
            if !self.tx_byte(byte) {
                return Err(UartError::Timeout);
            }
        }
        Ok(buf.len())
    }
}
