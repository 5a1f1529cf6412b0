//! Interactive-console designation and the out-of-band interrupt signal.
//!
//! At most one UART unit at a time hosts the interactive console. When the
//! interrupt handler of *that* unit sees the registered interrupt character,
//! the byte is diverted out of the data path and a pending-interrupt flag is
//! raised on a dedicated side channel; the host runtime polls and consumes
//! the flag at its own safe points. Nothing here unwinds or blocks —
//! everything is a handful of atomics, callable from interrupt context.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};

use boson_driver_api::UartId;

/// Sentinel for "no unit designated".
const NO_CONSOLE: u8 = u8::MAX;

/// Sentinel for "interrupt character disabled".
const CHAR_DISABLED: u16 = u16::MAX;

/// Process-wide console designation state.
///
/// A single [`system`] instance serves the real interrupt shims; tests build
/// their own instances so they stay independent of each other.
pub struct ConsoleBinding {
    /// Index of the designated unit, or [`NO_CONSOLE`].
    stream: AtomicU8,
    /// The out-of-band interrupt character, or [`CHAR_DISABLED`].
    int_char: AtomicU16,
    /// Set by the interrupt handler, consumed by the host runtime.
    pending: AtomicBool,
}

impl ConsoleBinding {
    /// Creates a binding with no console designated and no interrupt
    /// character registered.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stream: AtomicU8::new(NO_CONSOLE),
            int_char: AtomicU16::new(CHAR_DISABLED),
            pending: AtomicBool::new(false),
        }
    }

    /// Designates `id` as the interactive-console stream (or clears the
    /// designation with `None`).
    pub fn set_console(&self, id: Option<UartId>) {
        #[allow(clippy::cast_possible_truncation)]
        let raw = id.map_or(NO_CONSOLE, |id| id.index() as u8);
        self.stream.store(raw, Ordering::Release);
    }

    /// Returns the currently designated console unit, if any.
    #[must_use]
    pub fn console(&self) -> Option<UartId> {
        let raw = self.stream.load(Ordering::Acquire);
        UartId::from_index(raw as usize).ok()
    }

    /// Registers the interrupt character (or disables it with `None`).
    pub fn set_interrupt_char(&self, byte: Option<u8>) {
        let raw = byte.map_or(CHAR_DISABLED, u16::from);
        self.int_char.store(raw, Ordering::Release);
    }

    /// Returns the registered interrupt character, if enabled.
    #[must_use]
    pub fn interrupt_char(&self) -> Option<u8> {
        let raw = self.int_char.load(Ordering::Acquire);
        u8::try_from(raw).ok()
    }

    /// Returns `true` if `byte`, arriving on unit `id`, is the console
    /// interrupt character and must be diverted out of the data path.
    #[must_use]
    pub fn intercepts(&self, id: UartId, byte: u8) -> bool {
        self.console() == Some(id) && self.interrupt_char() == Some(byte)
    }

    /// Raises the pending-interrupt flag. Called from interrupt context.
    pub(crate) fn raise_interrupt(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Returns `true` if an interrupt is pending, without consuming it.
    #[must_use]
    pub fn interrupt_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Consumes the pending-interrupt flag, returning whether it was set.
    pub fn take_interrupt(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

impl Default for ConsoleBinding {
    fn default() -> Self {
        Self::new()
    }
}

static SYSTEM_CONSOLE: ConsoleBinding = ConsoleBinding::new();

/// Returns the process-wide console binding used by the interrupt shims.
#[must_use]
pub fn system() -> &'static ConsoleBinding {
    &SYSTEM_CONSOLE
}
