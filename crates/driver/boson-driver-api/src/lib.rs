//! Interface layer for Boson peripheral drivers.
//!
//! This crate holds the seams between a driver implementation and the rest
//! of the system: the error taxonomy, the hardware-access traits that a
//! platform backend implements (and tests mock), the stream interface the
//! host binding layer consumes, the low-power resume registry, and the
//! logging facade. Driver crates depend on this one; it depends on nothing
//! but `bitflags`.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod hw;
pub mod id;
pub mod log;
pub mod power;
pub mod stream;

pub use config::{FlowControl, LineFormat, Parity, Pin, PinAssignment, StopBits, UartConfig, WordLength};
pub use error::UartError;
pub use hw::{DelayUs, FifoLevel, IntSource, InterruptPriority, UartHw};
pub use id::{UART_COUNT, UartId};
pub use power::ResumeRegistry;
pub use stream::{Callback, PollFlags, StreamDevice, Trigger};
