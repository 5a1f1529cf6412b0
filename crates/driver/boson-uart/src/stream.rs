//! Stream interface implementation.
//!
//! Binds the receive and transmit engines to the [`StreamDevice`] trait the
//! host layer consumes. Every entry point re-checks that the peripheral is
//! configured, so a deinitialized unit fails uniformly with `NotReady`.

use boson_driver_api::{
    DelayUs, InterruptPriority, PollFlags, StreamDevice, Trigger, UartError, UartHw,
    stream::Callback,
};

use crate::driver::UartDriver;
use crate::timing;

impl<H: UartHw, D: DelayUs> StreamDevice for UartDriver<H, D> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        self.check_ready()?;
        if buf.is_empty() {
            return Ok(0);
        }
        // Wait for the first byte; nothing arriving is end-of-stream for the
        // binding layer, not an error.
        if !self.rx_wait() {
            return Ok(0);
        }
        let mut count = 0;
        loop {
            match self.rx_byte() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                // The poll raced the hardware; treat like an inter-byte gap.
                None => return Ok(count),
            }
            if count == buf.len() || !self.rx_wait() {
                return Ok(count);
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, UartError> {
        self.check_ready()?;
        for &byte in buf {
            if !self.tx_byte(byte) {
                return Err(UartError::Timeout);
            }
        }
        Ok(buf.len())
    }

    fn poll(&mut self, flags: PollFlags) -> Result<PollFlags, UartError> {
        self.check_ready()?;
        let mut ready = PollFlags::empty();
        if flags.contains(PollFlags::READABLE) && self.rx_any() > 0 {
            ready |= PollFlags::READABLE;
        }
        if flags.contains(PollFlags::WRITABLE) && self.hw.tx_space() {
            ready |= PollFlags::WRITABLE;
        }
        Ok(ready)
    }

    fn available_count(&self) -> Result<usize, UartError> {
        self.check_ready()?;
        Ok(self.rx_any())
    }

    fn send_break(&mut self) -> Result<(), UartError> {
        self.check_ready()?;
        // Hold the break condition for at least two complete frames.
        self.hw.set_break(true);
        self.delay.delay_us(timing::two_frames_time_us(self.baudrate));
        self.hw.set_break(false);
        Ok(())
    }

    fn set_callback(
        &mut self,
        handler: Option<Callback>,
        priority: InterruptPriority,
        trigger: Trigger,
    ) -> Result<(), UartError> {
        self.check_ready()?;
        self.install_callback(handler, priority, trigger);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleBinding;
    use crate::testutil::{configured_driver, unconfigured_driver};
    use boson_driver_api::IntSource;

    #[test]
    fn zero_length_read_returns_without_waiting() {
        let mut uart = configured_driver(9600);
        let mut buf = [];
        assert_eq!(uart.read(&mut buf), Ok(0));
        assert_eq!(uart.delay.total_us, 0);
    }

    #[test]
    fn read_with_no_data_times_out_to_zero() {
        let mut uart = configured_driver(9600);
        let mut buf = [0u8; 16];
        assert_eq!(uart.read(&mut buf), Ok(0));
        // Exactly one full receive wait was spent.
        assert_eq!(uart.delay.total_us, u64::from(timing::rx_timeout_us(9600)));
    }

    #[test]
    fn read_returns_interrupt_buffered_bytes() {
        let mut uart = configured_driver(115_200);
        let console = ConsoleBinding::new();
        for &byte in b"OK\r\n" {
            uart.hw.rx_fifo.push_back(byte);
            uart.hw.int_pending |= IntSource::RX;
            uart.handle_interrupt(&console);
        }

        let mut buf = [0u8; 4];
        assert_eq!(uart.read(&mut buf), Ok(4));
        assert_eq!(&buf, b"OK\r\n");
    }

    #[test]
    fn read_stops_early_on_an_inter_byte_gap() {
        let mut uart = configured_driver(115_200);
        uart.hw.rx_fifo.push_back(b'a');
        uart.hw.rx_fifo.push_back(b'b');

        let mut buf = [0u8; 8];
        // Two bytes arrive, then silence: the read returns short.
        assert_eq!(uart.read(&mut buf), Ok(2));
        assert_eq!(&buf[..2], b"ab");
    }

    #[test]
    fn write_transmits_exactly_the_given_bytes() {
        let mut uart = configured_driver(115_200);
        assert_eq!(uart.write(b"AT\r\n"), Ok(4));
        assert_eq!(uart.hw.tx_sent, b"AT\r\n");
    }

    #[test]
    fn write_surfaces_a_transmit_timeout() {
        let mut uart = configured_driver(115_200);
        uart.hw.tx_blocked = true;
        assert_eq!(uart.write(b"AT"), Err(UartError::Timeout));
    }

    #[test]
    fn partial_write_is_not_rolled_back() {
        let mut uart = configured_driver(115_200);
        uart.hw.tx_capacity = Some(1);
        assert_eq!(uart.write(b"AB"), Err(UartError::Timeout));
        assert_eq!(uart.hw.tx_sent, b"A");
    }

    #[test]
    fn poll_reports_requested_directions_only() {
        let mut uart = configured_driver(115_200);
        uart.hw.rx_fifo.push_back(b'x');

        let ready = uart.poll(PollFlags::READABLE | PollFlags::WRITABLE).unwrap();
        assert_eq!(ready, PollFlags::READABLE | PollFlags::WRITABLE);

        // Only ask about writability: readability is not reported.
        let ready = uart.poll(PollFlags::WRITABLE).unwrap();
        assert_eq!(ready, PollFlags::WRITABLE);

        uart.hw.tx_blocked = true;
        let ready = uart.poll(PollFlags::WRITABLE).unwrap();
        assert_eq!(ready, PollFlags::empty());
    }

    #[test]
    fn available_counts_buffered_bytes() {
        let mut uart = configured_driver(115_200);
        let console = ConsoleBinding::new();
        for &byte in b"abc" {
            uart.hw.rx_fifo.push_back(byte);
            uart.hw.int_pending |= IntSource::RX;
            uart.handle_interrupt(&console);
        }
        assert_eq!(uart.available_count(), Ok(3));
    }

    #[test]
    fn send_break_holds_for_two_frames() {
        let mut uart = configured_driver(9600);
        uart.send_break().unwrap();
        assert_eq!(uart.hw.break_events, vec![true, false]);
        assert_eq!(
            uart.delay.total_us,
            u64::from(timing::two_frames_time_us(9600))
        );
    }

    #[test]
    fn every_operation_requires_configuration() {
        let mut uart = unconfigured_driver();
        let mut buf = [0u8; 4];
        assert_eq!(uart.read(&mut buf), Err(UartError::NotReady));
        assert_eq!(uart.write(b"x"), Err(UartError::NotReady));
        assert_eq!(uart.poll(PollFlags::READABLE), Err(UartError::NotReady));
        assert_eq!(uart.available_count(), Err(UartError::NotReady));
        assert_eq!(uart.send_break(), Err(UartError::NotReady));
        assert_eq!(
            uart.set_callback(None, InterruptPriority::DEFAULT, Trigger::RX_ANY),
            Err(UartError::NotReady)
        );
    }

    #[test]
    fn operations_fail_after_deinit_and_recover_after_reinit() {
        use boson_driver_api::UartConfig;
        use boson_driver_api::power::UnitSet;

        let mut uart = configured_driver(115_200);
        let mut registry = UnitSet::new();
        let console = ConsoleBinding::new();

        uart.hw.rx_fifo.push_back(b'q');
        uart.hw.int_pending |= IntSource::RX;
        uart.handle_interrupt(&console);
        assert_eq!(uart.available_count(), Ok(1));

        uart.deinit(&mut registry);
        assert_eq!(uart.available_count(), Err(UartError::NotReady));
        let mut buf = [0u8; 1];
        assert_eq!(uart.read(&mut buf), Err(UartError::NotReady));

        uart.init(&UartConfig::eight_n_one(115_200).unwrap(), &mut registry);
        // Fresh, empty ring after re-init.
        assert_eq!(uart.available_count(), Ok(0));
        assert_eq!(uart.write(b"ok"), Ok(2));
    }
}
