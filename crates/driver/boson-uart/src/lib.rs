//! Interrupt-buffered UART driver with a scriptable stream interface.
//!
//! Two hardware units, each driven by a [`UartDriver`]: an interrupt handler
//! drains the hardware receive FIFO into a lock-free ring buffer
//! (`boson-ring`), the foreground read path consumes it with a
//! frame-time-derived timeout, and transmission is synchronous polling with
//! a bounded wait. The host binding layer talks to a driver through the
//! [`StreamDevice`] trait from `boson-driver-api`.
//!
//! Module map:
//!
//! - [`driver`] — peripheral instance and lifecycle (init/deinit/resume)
//! - `rx` / `tx` / `stream` — receive engine, transmit engine, and the
//!   [`StreamDevice`] surface over them
//! - `isr` — interrupt handler and callback adapter
//! - [`console`] — interactive-console designation and the out-of-band
//!   interrupt-character signal
//! - [`mmio`] — memory-mapped [`boson_driver_api::UartHw`] backend
//! - [`table`] — static unit table and interrupt shims
//! - [`timing`] — baud-derived frame times and timeouts

#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod driver;
mod isr;
pub mod mmio;
mod regs;
mod rx;
mod stream;
pub mod table;
#[cfg(test)]
mod testutil;
pub mod timing;
mod tx;

pub use boson_driver_api::{StreamDevice, UartConfig, UartError, UartId};
pub use driver::{RX_BUFFER_LEN, UartDriver};
