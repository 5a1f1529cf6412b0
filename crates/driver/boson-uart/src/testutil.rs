//! Test doubles for the hardware seams.
//!
//! `MockUart` records every hardware interaction as plain state; `MockDelay`
//! counts microseconds instead of spinning, so timeout behavior is asserted
//! exactly rather than measured.

use std::collections::VecDeque;
use std::vec::Vec;

use boson_driver_api::power::UnitSet;
use boson_driver_api::{
    DelayUs, FifoLevel, FlowControl, IntSource, InterruptPriority, LineFormat, UartConfig, UartHw,
    UartId,
};

use crate::driver::UartDriver;

pub(crate) type TestDriver = UartDriver<MockUart, MockDelay>;

/// A UART backend made of plain state.
pub(crate) struct MockUart {
    pub clock_hz: u32,
    pub clock_enabled: bool,
    pub resets: u32,
    /// Every `(baudrate, format)` pair ever programmed, in order.
    pub configured: Vec<(u32, LineFormat)>,
    pub fifo_enabled: bool,
    pub fifo_levels: Option<(FifoLevel, FifoLevel)>,
    pub flow: Option<FlowControl>,
    pub enabled: bool,
    pub int_enabled: IntSource,
    pub int_pending: IntSource,
    pub registered_priority: Option<InterruptPriority>,
    /// Bytes waiting in the simulated receive FIFO.
    pub rx_fifo: VecDeque<u8>,
    /// Bytes accepted for transmission, in order.
    pub tx_sent: Vec<u8>,
    /// When `true`, the transmit FIFO never accepts a byte.
    pub tx_blocked: bool,
    /// When set, the transmit FIFO accepts only this many bytes total.
    pub tx_capacity: Option<usize>,
    /// Break assert/deassert transitions, in order.
    pub break_events: Vec<bool>,
}

impl Default for MockUart {
    fn default() -> Self {
        Self {
            clock_hz: 80_000_000,
            clock_enabled: false,
            resets: 0,
            configured: Vec::new(),
            fifo_enabled: false,
            fifo_levels: None,
            flow: None,
            enabled: false,
            int_enabled: IntSource::empty(),
            int_pending: IntSource::empty(),
            registered_priority: None,
            rx_fifo: VecDeque::new(),
            tx_sent: Vec::new(),
            tx_blocked: false,
            tx_capacity: None,
            break_events: Vec::new(),
        }
    }
}

impl UartHw for MockUart {
    fn clock_enable(&mut self) {
        self.clock_enabled = true;
    }

    fn clock_disable(&mut self) {
        self.clock_enabled = false;
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.int_enabled = IntSource::empty();
        self.int_pending = IntSource::empty();
    }

    fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn configure(&mut self, baudrate: u32, format: LineFormat) {
        self.configured.push((baudrate, format));
    }

    fn fifo_enable(&mut self) {
        self.fifo_enabled = true;
    }

    fn set_fifo_levels(&mut self, tx: FifoLevel, rx: FifoLevel) {
        self.fifo_levels = Some((tx, rx));
    }

    fn set_flow_control(&mut self, flow: FlowControl) {
        self.flow = Some(flow);
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn try_put(&mut self, byte: u8) -> bool {
        if self.tx_blocked {
            return false;
        }
        if let Some(capacity) = self.tx_capacity {
            if self.tx_sent.len() >= capacity {
                return false;
            }
        }
        self.tx_sent.push(byte);
        true
    }

    fn try_get(&mut self) -> Option<u8> {
        self.rx_fifo.pop_front()
    }

    fn rx_available(&self) -> bool {
        !self.rx_fifo.is_empty()
    }

    fn tx_space(&self) -> bool {
        !self.tx_blocked
    }

    fn int_register(&mut self, priority: InterruptPriority) {
        self.registered_priority = Some(priority);
    }

    fn int_enable(&mut self, sources: IntSource) {
        self.int_enabled |= sources;
    }

    fn int_disable(&mut self, sources: IntSource) {
        self.int_enabled &= !sources;
    }

    fn int_clear(&mut self, sources: IntSource) {
        self.int_pending &= !sources;
    }

    fn int_status(&self) -> IntSource {
        self.int_pending & self.int_enabled
    }

    fn set_break(&mut self, asserted: bool) {
        self.break_events.push(asserted);
    }
}

/// A delay source that records instead of waiting.
#[derive(Default)]
pub(crate) struct MockDelay {
    /// Total microseconds "slept".
    pub total_us: u64,
}

impl DelayUs for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.total_us += u64::from(us);
    }
}

/// An unconfigured driver for unit 0.
pub(crate) fn unconfigured_driver() -> TestDriver {
    UartDriver::new(UartId::Uart0, MockUart::default(), MockDelay::default())
}

/// A driver for unit 0, initialized 8N1 at `baudrate` with its delay counter
/// zeroed afterwards.
pub(crate) fn configured_driver(baudrate: u32) -> TestDriver {
    let mut uart = unconfigured_driver();
    let mut registry = UnitSet::new();
    uart.init(&UartConfig::eight_n_one(baudrate).unwrap(), &mut registry);
    uart.delay.total_us = 0;
    uart
}
