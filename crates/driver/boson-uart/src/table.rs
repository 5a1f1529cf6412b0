//! Static unit table and interrupt shims.
//!
//! One driver slot per hardware unit, shared between foreground code and the
//! interrupt shims behind `critical-section`. The board layer builds the
//! [`PlatformUart`] instances (it owns the unit descriptors) and installs
//! them once at startup; the shims go into the vector table.
//!
//! The serialization here is the outer guard for configuration state; the
//! receive ring inside each driver remains a lock-free hand-off in its own
//! right.

use core::cell::RefCell;

use critical_section::Mutex;

use boson_driver_api::power::UnitSet;
use boson_driver_api::{UART_COUNT, UartConfig, UartError, UartId};

use crate::console;
use crate::driver::UartDriver;
use crate::mmio::{BusyDelay, MmioUart};

/// The concrete driver type served by the table.
pub type PlatformUart = UartDriver<MmioUart, BusyDelay>;

/// Driver slots, one per unit. Empty until the board layer installs.
static UARTS: [Mutex<RefCell<Option<PlatformUart>>>; UART_COUNT] =
    [const { Mutex::new(RefCell::new(None)) }; UART_COUNT];

/// Units to reconfigure on a low-power resume event.
static RESUME_UNITS: Mutex<RefCell<UnitSet>> = Mutex::new(RefCell::new(UnitSet::new()));

/// Installs (or replaces) the driver for its unit.
pub fn install(driver: PlatformUart) {
    critical_section::with(|cs| {
        let index = driver.id().index();
        *UARTS[index].borrow_ref_mut(cs) = Some(driver);
    });
}

/// Runs `f` against the installed driver for `id`.
///
/// # Errors
///
/// [`UartError::NotReady`] if no driver has been installed for `id`.
pub fn with_uart<R>(id: UartId, f: impl FnOnce(&mut PlatformUart) -> R) -> Result<R, UartError> {
    critical_section::with(|cs| {
        UARTS[id.index()]
            .borrow_ref_mut(cs)
            .as_mut()
            .map(f)
            .ok_or(UartError::NotReady)
    })
}

/// Configures the unit and registers it for resume reconfiguration.
///
/// # Errors
///
/// [`UartError::NotReady`] if no driver has been installed for `id`.
pub fn init(id: UartId, config: &UartConfig) -> Result<(), UartError> {
    critical_section::with(|cs| {
        let mut registry = RESUME_UNITS.borrow_ref_mut(cs);
        let mut slot = UARTS[id.index()].borrow_ref_mut(cs);
        let driver = slot.as_mut().ok_or(UartError::NotReady)?;
        driver.init(config, &mut *registry);
        Ok(())
    })
}

/// Deconfigures the unit and drops its resume registration.
///
/// # Errors
///
/// [`UartError::NotReady`] if no driver has been installed for `id`.
pub fn deinit(id: UartId) -> Result<(), UartError> {
    critical_section::with(|cs| {
        let mut registry = RESUME_UNITS.borrow_ref_mut(cs);
        let mut slot = UARTS[id.index()].borrow_ref_mut(cs);
        let driver = slot.as_mut().ok_or(UartError::NotReady)?;
        driver.deinit(&mut *registry);
        Ok(())
    })
}

/// Reconfigures every registered unit after a low-power resume event.
pub fn resume_all() {
    critical_section::with(|cs| {
        let registered = *RESUME_UNITS.borrow_ref(cs);
        for id in registered.iter() {
            if let Some(driver) = UARTS[id.index()].borrow_ref_mut(cs).as_mut() {
                driver.resume();
            }
        }
    });
}

fn service_interrupt(id: UartId) {
    critical_section::with(|cs| {
        if let Some(driver) = UARTS[id.index()].borrow_ref_mut(cs).as_mut() {
            driver.handle_interrupt(console::system());
        }
    });
}

/// Interrupt shim for unit 0. Place in the vector table.
pub extern "C" fn uart0_int_handler() {
    service_interrupt(UartId::Uart0);
}

/// Interrupt shim for unit 1. Place in the vector table.
pub extern "C" fn uart1_int_handler() {
    service_interrupt(UartId::Uart1);
}
