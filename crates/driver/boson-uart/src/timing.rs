//! Baud-derived timing.
//!
//! All waits in this driver are expressed in character frame times at the
//! configured baud rate. A frame is assumed to be 11 bit times — start bit,
//! 8 data bits, parity, stop — which over-estimates slightly for shorter
//! formats and is therefore safe for timeout purposes.

/// Bit times per character frame (start + 8 data + parity + stop).
const BITS_PER_FRAME: u32 = 11;

/// Upper bound on the total transmit wait for one byte, in milliseconds.
pub const TX_MAX_TIMEOUT_MS: u32 = 5;

/// Time to transmit one character frame, in microseconds.
///
/// `baudrate` must be nonzero (callers only reach timing code on a
/// configured peripheral).
#[must_use]
pub const fn frame_time_us(baudrate: u32) -> u32 {
    (BITS_PER_FRAME * 1_000_000) / baudrate
}

/// Time to transmit two character frames, in microseconds.
#[must_use]
pub const fn two_frames_time_us(baudrate: u32) -> u32 {
    frame_time_us(baudrate) * 2
}

/// Receive wait timeout: two frame times of line silence end a read.
#[must_use]
pub const fn rx_timeout_us(baudrate: u32) -> u32 {
    two_frames_time_us(baudrate)
}

/// Delay between transmit retries: one frame time, rounded up.
#[must_use]
pub const fn tx_wait_us(baudrate: u32) -> u32 {
    frame_time_us(baudrate) + 1
}

/// Number of transmit retries within the [`TX_MAX_TIMEOUT_MS`] budget.
#[must_use]
pub const fn tx_max_retries(baudrate: u32) -> u32 {
    (TX_MAX_TIMEOUT_MS * 1000) / tx_wait_us(baudrate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_time_at_common_rates() {
        assert_eq!(frame_time_us(9600), 1145);
        assert_eq!(frame_time_us(115_200), 95);
        assert_eq!(frame_time_us(1_000_000), 11);
    }

    #[test]
    fn rx_timeout_is_two_frames() {
        assert_eq!(rx_timeout_us(9600), 2290);
        assert_eq!(rx_timeout_us(115_200), 190);
    }

    #[test]
    fn tx_wait_rounds_up_one_frame() {
        assert_eq!(tx_wait_us(9600), 1146);
        assert_eq!(tx_wait_us(115_200), 96);
    }

    #[test]
    fn tx_retries_fit_the_wall_clock_budget() {
        // 5 ms budget at 9600 baud: four ~1.1 ms retries.
        assert_eq!(tx_max_retries(9600), 4);
        assert_eq!(tx_max_retries(115_200), 52);
    }
}
