//! Interrupt handler and callback adapter.
//!
//! The handler is the producer side of the receive pipeline. It must stay
//! short — bounded by the hardware FIFO depth — because it runs with the
//! foreground preempted: clear the triggering status, drain the FIFO into
//! the ring, divert the console interrupt character, dispatch the user
//! callback if armed.

use boson_driver_api::{DelayUs, IntSource, InterruptPriority, Trigger, UartHw, stream::Callback};

use crate::console::ConsoleBinding;
use crate::driver::UartDriver;

impl<H: UartHw, D: DelayUs> UartDriver<H, D> {
    /// Services a receive or receive-timeout interrupt.
    ///
    /// Called by the unit's interrupt shim with the process-wide console
    /// binding. Interrupt sources other than receive/receive-timeout are
    /// ignored. A full ring drops the incoming byte silently — a documented
    /// data-loss condition under sustained overrun.
    pub fn handle_interrupt(&mut self, console: &ConsoleBinding) {
        let status = self.hw.int_status();
        if !status.intersects(IntSource::RX | IntSource::RX_TIMEOUT) {
            return;
        }
        self.hw.int_clear(IntSource::RX | IntSource::RX_TIMEOUT);

        while let Some(byte) = self.hw.try_get() {
            if console.intercepts(self.id, byte) {
                // The console break character must never sit unread in the
                // ring; it travels over the out-of-band signal channel.
                console.raise_interrupt();
            } else if let Some(rx) = self.rx.as_ref() {
                let _ = rx.push(byte);
            }
        }

        if self.trigger.contains(Trigger::RX_ANY) && self.callback_enabled {
            if let Some(callback) = self.callback.as_mut() {
                callback(self.id);
            }
        }
    }

    /// Replaces the registered callback and rebinds the interrupt vector.
    ///
    /// Dispatch is disabled before anything changes and re-enabled only
    /// after the new handler, priority, and trigger mask are in place, so
    /// the old and new handler never race.
    pub(crate) fn install_callback(
        &mut self,
        handler: Option<Callback>,
        priority: InterruptPriority,
        trigger: Trigger,
    ) {
        self.callback_disable();
        self.hw.int_register(priority);
        self.callback = handler;
        self.trigger = trigger;
        self.callback_enable();
    }

    /// Arms interrupt sources for the current trigger mask and enables
    /// callback dispatch.
    pub fn callback_enable(&mut self) {
        if self.trigger.intersects(Trigger::RX_MASK) {
            self.hw.int_clear(IntSource::RX | IntSource::RX_TIMEOUT);
            self.hw.int_enable(IntSource::RX | IntSource::RX_TIMEOUT);
        }
        self.callback_enabled = true;
    }

    /// Gates callback dispatch off.
    ///
    /// Interrupt sources stay as configured: received bytes keep
    /// accumulating in the ring while dispatch is disabled.
    pub fn callback_disable(&mut self) {
        self.callback_enabled = false;
    }
}
