//! Receive engine.
//!
//! Foreground consumer side of the receive pipeline: occupancy queries, the
//! frame-time-derived wait, and the byte source that prefers the ring buffer
//! and falls back to the hardware FIFO. The blocking primitive here is a
//! 1 µs-granularity spin-wait — it never yields to a scheduler, and a
//! timeout is the only way it ends early.

use boson_driver_api::{DelayUs, UartHw};

use crate::driver::UartDriver;
use crate::timing;

impl<H: UartHw, D: DelayUs> UartDriver<H, D> {
    /// Returns how many bytes can be read without waiting.
    ///
    /// With a buffering backlog this is the ring occupancy. With an empty
    /// ring the hardware FIFO is the only source of truth (interrupts may
    /// not have fired yet, or may be disarmed), so a non-empty FIFO reports
    /// as "at least one".
    pub(crate) fn rx_any(&self) -> usize {
        if let Some(rx) = self.rx.as_ref() {
            let buffered = rx.len();
            if buffered > 0 {
                return buffered;
            }
        }
        usize::from(self.hw.rx_available())
    }

    /// Takes the next byte: oldest buffered byte first, direct FIFO read as
    /// the unbuffered fallback.
    pub(crate) fn rx_byte(&mut self) -> Option<u8> {
        if let Some(byte) = self.rx.as_ref().and_then(boson_ring::SpscRing::pop) {
            return Some(byte);
        }
        self.hw.try_get()
    }

    /// Waits for at least one readable byte.
    ///
    /// Polls [`rx_any`](Self::rx_any) at 1 µs granularity for up to two
    /// character frame times at the configured baud rate. Returns `false`
    /// on timeout.
    pub(crate) fn rx_wait(&mut self) -> bool {
        let mut timeout = timing::rx_timeout_us(self.baudrate);
        loop {
            if self.rx_any() > 0 {
                return true;
            }
            if timeout > 0 {
                self.delay.delay_us(1);
                timeout -= 1;
            } else {
                return false;
            }
        }
    }
}
