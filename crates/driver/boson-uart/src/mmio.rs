//! Memory-mapped hardware backend.
//!
//! [`MmioUart`] implements [`UartHw`] over the register block described by a
//! [`UnitDesc`]: the UART base address, the clock-gating and soft-reset
//! registers of the power/clock controller, the NVIC interrupt number, and
//! the peripheral clock frequency. The board layer owns the descriptor
//! values; only the UART block base addresses are fixed here.

use core::ptr;

use boson_driver_api::{
    DelayUs, FifoLevel, FlowControl, IntSource, InterruptPriority, LineFormat, UartHw,
};

use crate::regs::{self, Ctl, Fr, Im, LcrH, reg};

/// Base address of the first UART unit's register block.
pub const UART0_BASE: usize = 0x4000_C000;
/// Base address of the second UART unit's register block.
pub const UART1_BASE: usize = 0x4000_D000;

/// NVIC interrupt set-enable register base.
const NVIC_ISER: usize = 0xE000_E100;
/// NVIC interrupt priority register base (one byte per interrupt).
const NVIC_IPR: usize = 0xE000_E400;

/// Run-mode clock enable bit in a peripheral's clock-gating register.
const CLK_RUN: u32 = 1 << 0;
/// Sleep-mode clock enable bit in a peripheral's clock-gating register.
const CLK_SLEEP: u32 = 1 << 8;
/// Soft-reset assert bit in a peripheral's reset register.
const SOFT_RESET: u32 = 1 << 0;

/// Bounded spin while waiting for the transmitter to drain on disable.
const DISABLE_SPIN: u32 = 100_000;

/// Describes one UART unit's hardware resources.
#[derive(Debug, Clone, Copy)]
pub struct UnitDesc {
    /// UART register block base address.
    pub base: usize,
    /// Peripheral clock-gating register in the power/clock controller.
    pub clk_gate: usize,
    /// Peripheral soft-reset register in the power/clock controller.
    pub soft_reset: usize,
    /// NVIC interrupt number for this unit.
    pub irq: u8,
    /// Peripheral clock frequency in hertz.
    pub clock_hz: u32,
}

/// Maps interface-level interrupt sources onto register bits.
fn im_bits(sources: IntSource) -> Im {
    let mut bits = Im::empty();
    if sources.contains(IntSource::RX) {
        bits |= Im::RX;
    }
    if sources.contains(IntSource::RX_TIMEOUT) {
        bits |= Im::RT;
    }
    bits
}

/// A [`UartHw`] backend over memory-mapped registers.
pub struct MmioUart {
    desc: UnitDesc,
}

impl MmioUart {
    /// Creates a backend for the unit described by `desc`.
    ///
    /// # Safety
    ///
    /// `desc` must describe a real UART unit of this system, and the caller
    /// must guarantee this is the only live accessor for that unit's
    /// registers.
    #[must_use]
    pub const unsafe fn new(desc: UnitDesc) -> Self {
        Self { desc }
    }

    /// Reads a 32-bit register at `addr`.
    fn rd_abs(addr: usize) -> u32 {
        // SAFETY: Constructor contract — the descriptor addresses are valid
        // device registers, and volatile access has no aliasing requirements.
        unsafe { ptr::read_volatile(addr as *const u32) }
    }

    /// Writes a 32-bit register at `addr`.
    fn wr_abs(addr: usize, value: u32) {
        // SAFETY: See `rd_abs`.
        unsafe { ptr::write_volatile(addr as *mut u32, value) }
    }

    fn rd(&self, offset: usize) -> u32 {
        Self::rd_abs(self.desc.base + offset)
    }

    fn wr(&self, offset: usize, value: u32) {
        Self::wr_abs(self.desc.base + offset, value);
    }

    fn flags(&self) -> Fr {
        Fr::from_bits_truncate(self.rd(reg::FR))
    }
}

impl UartHw for MmioUart {
    fn clock_enable(&mut self) {
        Self::wr_abs(self.desc.clk_gate, CLK_RUN | CLK_SLEEP);
    }

    fn clock_disable(&mut self) {
        Self::wr_abs(self.desc.clk_gate, 0);
    }

    fn reset(&mut self) {
        Self::wr_abs(self.desc.soft_reset, SOFT_RESET);
        // A handful of clock cycles must pass with reset asserted.
        for _ in 0..16 {
            core::hint::spin_loop();
        }
        Self::wr_abs(self.desc.soft_reset, 0);
    }

    fn clock_hz(&self) -> u32 {
        self.desc.clock_hz
    }

    fn configure(&mut self, baudrate: u32, format: LineFormat) {
        let (ibrd, fbrd) = regs::baud_divisors(self.desc.clock_hz, baudrate);

        // The unit must be disabled while the divisors change.
        self.wr(reg::CTL, self.rd(reg::CTL) & !Ctl::UARTEN.bits());
        self.wr(reg::IBRD, u32::from(ibrd));
        self.wr(reg::FBRD, u32::from(fbrd));
        // Writing LCRH latches the divisors; FEN is restored by fifo_enable.
        self.wr(reg::LCRH, regs::lcrh_format(format).bits());
        self.wr(
            reg::CTL,
            self.rd(reg::CTL) | (Ctl::UARTEN | Ctl::TXE | Ctl::RXE).bits(),
        );
    }

    fn fifo_enable(&mut self) {
        self.wr(reg::LCRH, self.rd(reg::LCRH) | LcrH::FEN.bits());
    }

    fn set_fifo_levels(&mut self, tx: FifoLevel, rx: FifoLevel) {
        self.wr(reg::IFLS, regs::ifls_value(tx, rx));
    }

    fn set_flow_control(&mut self, flow: FlowControl) {
        let mut ctl = self.rd(reg::CTL) & !(Ctl::RTSEN | Ctl::CTSEN).bits();
        if flow.contains(FlowControl::RX) {
            ctl |= Ctl::RTSEN.bits();
        }
        if flow.contains(FlowControl::TX) {
            ctl |= Ctl::CTSEN.bits();
        }
        self.wr(reg::CTL, ctl);
    }

    fn enable(&mut self) {
        self.wr(
            reg::CTL,
            self.rd(reg::CTL) | (Ctl::UARTEN | Ctl::TXE | Ctl::RXE).bits(),
        );
    }

    fn disable(&mut self) {
        // Let the current character drain, bounded.
        for _ in 0..DISABLE_SPIN {
            if !self.flags().contains(Fr::BUSY) {
                break;
            }
            core::hint::spin_loop();
        }
        self.wr(
            reg::CTL,
            self.rd(reg::CTL) & !(Ctl::UARTEN | Ctl::TXE | Ctl::RXE).bits(),
        );
    }

    fn try_put(&mut self, byte: u8) -> bool {
        if self.flags().contains(Fr::TXFF) {
            return false;
        }
        self.wr(reg::DR, u32::from(byte));
        true
    }

    fn try_get(&mut self) -> Option<u8> {
        if self.flags().contains(Fr::RXFE) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let byte = self.rd(reg::DR) as u8;
        Some(byte)
    }

    fn rx_available(&self) -> bool {
        !self.flags().contains(Fr::RXFE)
    }

    fn tx_space(&self) -> bool {
        !self.flags().contains(Fr::TXFF)
    }

    fn int_register(&mut self, priority: InterruptPriority) {
        let irq = usize::from(self.desc.irq);
        // Cortex-M implements the top three priority bits.
        let pri_addr = NVIC_IPR + irq;
        // SAFETY: NVIC registers are architectural; byte access to IPR is
        // defined, and the constructor contract covers exclusivity.
        unsafe { ptr::write_volatile(pri_addr as *mut u8, priority.0 << 5) };
        let iser = NVIC_ISER + (irq / 32) * 4;
        Self::wr_abs(iser, 1 << (irq % 32));
    }

    fn int_enable(&mut self, sources: IntSource) {
        self.wr(reg::IM, self.rd(reg::IM) | im_bits(sources).bits());
    }

    fn int_disable(&mut self, sources: IntSource) {
        self.wr(reg::IM, self.rd(reg::IM) & !im_bits(sources).bits());
    }

    fn int_clear(&mut self, sources: IntSource) {
        self.wr(reg::ICR, im_bits(sources).bits());
    }

    fn int_status(&self) -> IntSource {
        let mis = Im::from_bits_truncate(self.rd(reg::MIS));
        let mut sources = IntSource::empty();
        if mis.contains(Im::RX) {
            sources |= IntSource::RX;
        }
        if mis.contains(Im::RT) {
            sources |= IntSource::RX_TIMEOUT;
        }
        sources
    }

    fn set_break(&mut self, asserted: bool) {
        let lcrh = self.rd(reg::LCRH);
        if asserted {
            self.wr(reg::LCRH, lcrh | LcrH::BRK.bits());
        } else {
            self.wr(reg::LCRH, lcrh & !LcrH::BRK.bits());
        }
    }
}

/// A calibrated busy-wait [`DelayUs`].
///
/// Coarse: the loop body costs roughly three cycles, which is accurate
/// enough for frame-time waits where only the order of magnitude matters.
pub struct BusyDelay {
    iterations_per_us: u32,
}

impl BusyDelay {
    /// Creates a delay source for a CPU running at `cpu_hz`.
    #[must_use]
    pub const fn new(cpu_hz: u32) -> Self {
        Self {
            iterations_per_us: cpu_hz / 1_000_000 / 3,
        }
    }
}

impl DelayUs for BusyDelay {
    fn delay_us(&mut self, us: u32) {
        for _ in 0..us.saturating_mul(self.iterations_per_us) {
            core::hint::spin_loop();
        }
    }
}
