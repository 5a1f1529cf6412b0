//! Hardware unit identifiers.

use crate::error::UartError;

/// Number of physical UART units in this system.
pub const UART_COUNT: usize = 2;

/// Identifies one of the physical UART units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UartId {
    /// First UART unit.
    Uart0 = 0,
    /// Second UART unit.
    Uart1 = 1,
}

impl UartId {
    /// Resolves an integer unit id.
    ///
    /// # Errors
    ///
    /// Returns [`UartError::NoSuchUnit`] for ids outside `0..UART_COUNT`.
    pub fn from_index(index: usize) -> Result<Self, UartError> {
        match index {
            0 => Ok(Self::Uart0),
            1 => Ok(Self::Uart1),
            _ => Err(UartError::NoSuchUnit),
        }
    }

    /// Returns the unit index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        assert_eq!(UartId::from_index(0), Ok(UartId::Uart0));
        assert_eq!(UartId::from_index(1), Ok(UartId::Uart1));
        assert_eq!(UartId::Uart1.index(), 1);
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert_eq!(UartId::from_index(2), Err(UartError::NoSuchUnit));
        assert_eq!(UartId::from_index(usize::MAX), Err(UartError::NoSuchUnit));
    }
}
