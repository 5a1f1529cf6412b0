//! Peripheral instance and lifecycle controller.
//!
//! A [`UartDriver`] owns one hardware unit through a [`UartHw`] backend and
//! walks it through its lifecycle: unconfigured (baud rate zero) →
//! configured/active (`init`) → unconfigured again (`deinit`), with
//! `resume` re-running the hardware sequence after a low-power wakeup and
//! reconfiguration permitted at any time.

use core::fmt;

use boson_driver_api::dprintln;
use boson_driver_api::{
    DelayUs, FifoLevel, FlowControl, IntSource, InterruptPriority, LineFormat, Parity,
    ResumeRegistry, Trigger, UartConfig, UartError, UartHw, UartId, stream::Callback,
};
use boson_ring::SpscRing;

/// Receive ring buffer size in bytes.
pub const RX_BUFFER_LEN: usize = 128;

/// Driver state for one UART unit.
///
/// Statically allocated for the life of the process; only its *configured*
/// state (baud rate, formats, receive buffer) comes and goes. Generic over
/// the hardware backend and the delay source so the engines can be exercised
/// against mocks.
pub struct UartDriver<H: UartHw, D: DelayUs> {
    pub(crate) id: UartId,
    pub(crate) hw: H,
    pub(crate) delay: D,
    /// Configured baud rate; zero means unconfigured.
    pub(crate) baudrate: u32,
    pub(crate) format: LineFormat,
    pub(crate) flow: FlowControl,
    /// Receive ring, allocated on every (re)initialization.
    pub(crate) rx: Option<SpscRing>,
    /// Which conditions dispatch the registered callback.
    pub(crate) trigger: Trigger,
    pub(crate) callback_enabled: bool,
    pub(crate) callback: Option<Callback>,
}

impl<H: UartHw, D: DelayUs> UartDriver<H, D> {
    /// Creates an unconfigured driver for `id` over the given backend.
    pub fn new(id: UartId, hw: H, delay: D) -> Self {
        Self {
            id,
            hw,
            delay,
            baudrate: 0,
            format: LineFormat::default(),
            flow: FlowControl::empty(),
            rx: None,
            trigger: Trigger::empty(),
            callback_enabled: false,
            callback: None,
        }
    }

    /// Returns the unit this driver controls.
    #[must_use]
    pub fn id(&self) -> UartId {
        self.id
    }

    /// Returns the configured baud rate (zero when unconfigured).
    #[must_use]
    pub fn baudrate(&self) -> u32 {
        self.baudrate
    }

    /// Returns `true` between a successful `init` and the next `deinit`.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.baudrate != 0
    }

    /// Fails with [`UartError::NotReady`] unless the peripheral is configured.
    pub(crate) fn check_ready(&self) -> Result<(), UartError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(UartError::NotReady)
        }
    }

    /// Configures the peripheral and brings it to the active state.
    ///
    /// Enables the peripheral clock (run and sleep modes), resets the block,
    /// allocates a fresh receive ring (previous contents are discarded),
    /// programs baud/format/FIFO/flow-control, registers the unit with the
    /// resume registry, and arms the default receive callback so interrupt
    /// buffering starts immediately.
    ///
    /// Calling this on an already-configured unit reconfigures it; the
    /// config was validated at construction so nothing here can fail.
    pub fn init(&mut self, config: &UartConfig, registry: &mut impl ResumeRegistry) {
        self.baudrate = config.baudrate();
        self.format = config.format();
        self.flow = config.flow_control();

        self.hw.clock_enable();
        // Resetting the block drops any enabled interrupt sources, so the
        // ring can be swapped without racing the handler.
        self.hw.reset();
        self.rx = Some(SpscRing::with_capacity(RX_BUFFER_LEN));
        self.apply_hardware_config();

        registry.register(self.id);
        self.install_callback(None, InterruptPriority::DEFAULT, Trigger::RX_ANY);

        dprintln!(
            "uart{}: configured at {} baud",
            self.id.index(),
            self.baudrate
        );
    }

    /// Returns the peripheral to the unconfigured state.
    ///
    /// Unregisters from the resume registry, invalidates the baud rate,
    /// releases the receive ring, disables the receive interrupt sources,
    /// then disables the unit and gates its clock.
    pub fn deinit(&mut self, registry: &mut impl ResumeRegistry) {
        registry.unregister(self.id);
        self.baudrate = 0;
        self.rx = None;
        self.hw
            .int_disable(IntSource::RX | IntSource::RX_TIMEOUT);
        self.hw.disable();
        self.hw.clock_disable();

        dprintln!("uart{}: deinitialized", self.id.index());
    }

    /// Re-runs the hardware configuration after a low-power resume event.
    ///
    /// The peripheral's registers do not survive the low-power state; the
    /// receive ring is ordinary memory and is left untouched, cursors and
    /// all. Interrupt sources are re-armed per the current trigger mask.
    /// A no-op on an unconfigured unit.
    pub fn resume(&mut self) {
        if !self.is_configured() {
            return;
        }
        self.hw.clock_enable();
        self.hw.reset();
        self.apply_hardware_config();
        if self.trigger.intersects(Trigger::RX_MASK) {
            self.hw.int_clear(IntSource::RX | IntSource::RX_TIMEOUT);
            self.hw.int_enable(IntSource::RX | IntSource::RX_TIMEOUT);
        }

        dprintln!("uart{}: resumed", self.id.index());
    }

    /// Programs the hardware from the stored settings and enables the unit.
    fn apply_hardware_config(&mut self) {
        self.hw.configure(self.baudrate, self.format);
        self.hw.fifo_enable();
        self.hw.set_fifo_levels(FifoLevel::Half, FifoLevel::Half);
        self.hw.set_flow_control(self.flow);
        self.hw.enable();
    }
}

impl<H: UartHw, D: DelayUs> fmt::Display for UartDriver<H, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_configured() {
            write!(
                f,
                "UART({}, baudrate={}, bits={}, ",
                self.id.index(),
                self.baudrate,
                self.format.word_length.bits()
            )?;
            match self.format.parity {
                Parity::None => f.write_str("parity=None")?,
                Parity::Even => f.write_str("parity=0")?,
                Parity::Odd => f.write_str("parity=1")?,
            }
            write!(f, ", stop={})", self.format.stop_bits as u8)
        } else {
            write!(f, "UART({})", self.id.index())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockDelay, MockUart};
    use boson_driver_api::power::UnitSet;
    use boson_driver_api::{PinAssignment, StopBits, WordLength};

    fn driver() -> UartDriver<MockUart, MockDelay> {
        UartDriver::new(UartId::Uart0, MockUart::default(), MockDelay::default())
    }

    #[test]
    fn init_walks_the_full_sequence() {
        let mut uart = driver();
        let mut registry = UnitSet::new();
        let config = UartConfig::eight_n_one(115_200).unwrap();

        uart.init(&config, &mut registry);

        assert!(uart.is_configured());
        assert_eq!(uart.baudrate(), 115_200);
        assert!(uart.hw.clock_enabled);
        assert_eq!(uart.hw.resets, 1);
        assert_eq!(uart.hw.configured, vec![(115_200, LineFormat::default())]);
        assert!(uart.hw.fifo_enabled);
        assert_eq!(uart.hw.fifo_levels, Some((FifoLevel::Half, FifoLevel::Half)));
        assert_eq!(uart.hw.flow, Some(FlowControl::empty()));
        assert!(uart.hw.enabled);
        assert!(registry.contains(UartId::Uart0));

        // Default callback arming: RX sources cleared and enabled.
        assert_eq!(
            uart.hw.registered_priority,
            Some(InterruptPriority::DEFAULT)
        );
        assert!(
            uart.hw
                .int_enabled
                .contains(IntSource::RX | IntSource::RX_TIMEOUT)
        );
        assert!(uart.callback_enabled);
        assert_eq!(uart.trigger, Trigger::RX_ANY);
    }

    #[test]
    fn deinit_returns_to_unconfigured() {
        let mut uart = driver();
        let mut registry = UnitSet::new();
        uart.init(&UartConfig::eight_n_one(9600).unwrap(), &mut registry);

        uart.deinit(&mut registry);

        assert!(!uart.is_configured());
        assert_eq!(uart.baudrate(), 0);
        assert!(uart.rx.is_none());
        assert!(!registry.contains(UartId::Uart0));
        assert!(uart.hw.int_enabled.is_empty());
        assert!(!uart.hw.enabled);
        assert!(!uart.hw.clock_enabled);
    }

    #[test]
    fn reinit_after_deinit_starts_with_an_empty_ring() {
        let mut uart = driver();
        let mut registry = UnitSet::new();
        uart.init(&UartConfig::eight_n_one(9600).unwrap(), &mut registry);

        // Buffer some data, then tear down and bring back up.
        uart.rx.as_ref().unwrap().push(0xAA);
        uart.deinit(&mut registry);
        uart.init(&UartConfig::eight_n_one(9600).unwrap(), &mut registry);

        assert_eq!(uart.rx.as_ref().unwrap().len(), 0);
    }

    #[test]
    fn resume_reprograms_hardware_but_keeps_the_ring() {
        let mut uart = driver();
        let mut registry = UnitSet::new();
        uart.init(&UartConfig::eight_n_one(9600).unwrap(), &mut registry);

        uart.rx.as_ref().unwrap().push(b'x');
        uart.rx.as_ref().unwrap().push(b'y');
        uart.hw.int_enabled = IntSource::empty();

        uart.resume();

        // Hardware got a second full configuration pass.
        assert_eq!(uart.hw.configured.len(), 2);
        assert_eq!(uart.hw.resets, 2);
        // Buffered bytes survived.
        let rx = uart.rx.as_ref().unwrap();
        assert_eq!(rx.len(), 2);
        assert_eq!(rx.pop(), Some(b'x'));
        // Interrupt sources re-armed.
        assert!(
            uart.hw
                .int_enabled
                .contains(IntSource::RX | IntSource::RX_TIMEOUT)
        );
    }

    #[test]
    fn resume_on_unconfigured_unit_is_a_noop() {
        let mut uart = driver();
        uart.resume();
        assert!(uart.hw.configured.is_empty());
        assert_eq!(uart.hw.resets, 0);
    }

    #[test]
    fn failed_validation_leaves_prior_config_untouched() {
        let mut uart = driver();
        let mut registry = UnitSet::new();
        uart.init(&UartConfig::eight_n_one(9600).unwrap(), &mut registry);

        // word_length = 9 and stop_bits = 3 never produce a config, so the
        // driver keeps its previous settings.
        assert_eq!(WordLength::try_from(9).unwrap_err(), UartError::InvalidArgs);
        assert_eq!(StopBits::try_from(3).unwrap_err(), UartError::InvalidArgs);
        assert_eq!(uart.baudrate(), 9600);
        assert!(uart.is_configured());
    }

    #[test]
    fn display_reflects_configuration() {
        let mut uart = driver();
        assert_eq!(format!("{uart}"), "UART(0)");

        let mut registry = UnitSet::new();
        uart.init(&UartConfig::eight_n_one(9600).unwrap(), &mut registry);
        assert_eq!(
            format!("{uart}"),
            "UART(0, baudrate=9600, bits=8, parity=None, stop=1)"
        );

        let format = LineFormat {
            word_length: WordLength::Seven,
            parity: boson_driver_api::Parity::Even,
            stop_bits: StopBits::Two,
        };
        let config = UartConfig::new(19_200, format, PinAssignment::Default).unwrap();
        uart.init(&config, &mut registry);
        assert_eq!(
            format!("{uart}"),
            "UART(0, baudrate=19200, bits=7, parity=0, stop=2)"
        );
    }
}
