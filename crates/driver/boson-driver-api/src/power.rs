//! Low-power resume registry interface.
//!
//! The power-management framework is outside this workspace; the driver sees
//! it only as a registry of units that need their hardware reconfigured when
//! the system comes back from a low-power state (peripheral configuration
//! registers do not survive it; ordinary memory — including the receive ring
//! buffer — does).

use crate::id::{UART_COUNT, UartId};

/// Registry of units to reconfigure on a low-power resume event.
///
/// The lifecycle controller registers a unit on successful initialization
/// and unregisters it on deinitialization. Whoever dispatches the resume
/// event walks the registered units and calls each driver's `resume`.
pub trait ResumeRegistry {
    /// Adds a unit to the resume set. Idempotent.
    fn register(&mut self, id: UartId);

    /// Removes a unit from the resume set. Idempotent.
    fn unregister(&mut self, id: UartId);
}

/// A minimal [`ResumeRegistry`]: one bit per unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitSet {
    bits: u8,
}

impl UnitSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Returns `true` if the unit is registered.
    #[must_use]
    pub const fn contains(&self, id: UartId) -> bool {
        self.bits & (1 << id.index()) != 0
    }

    /// Iterates over the registered units.
    pub fn iter(&self) -> impl Iterator<Item = UartId> + '_ {
        (0..UART_COUNT).filter_map(|index| {
            if self.bits & (1 << index) != 0 {
                UartId::from_index(index).ok()
            } else {
                None
            }
        })
    }
}

impl ResumeRegistry for UnitSet {
    fn register(&mut self, id: UartId) {
        self.bits |= 1 << id.index();
    }

    fn unregister(&mut self, id: UartId) {
        self.bits &= !(1 << id.index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_unregister() {
        let mut set = UnitSet::new();
        assert!(!set.contains(UartId::Uart0));

        set.register(UartId::Uart0);
        set.register(UartId::Uart1);
        assert!(set.contains(UartId::Uart0));
        assert!(set.contains(UartId::Uart1));

        set.unregister(UartId::Uart0);
        assert!(!set.contains(UartId::Uart0));
        assert!(set.contains(UartId::Uart1));
    }

    #[test]
    fn register_is_idempotent() {
        let mut set = UnitSet::new();
        set.register(UartId::Uart1);
        set.register(UartId::Uart1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![UartId::Uart1]);
    }
}
