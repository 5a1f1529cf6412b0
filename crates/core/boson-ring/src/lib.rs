//! Lock-free single-producer/single-consumer byte ring buffer.
//!
//! This crate provides [`SpscRing`], a fixed-capacity circular byte buffer
//! designed for the interrupt-to-foreground hand-off pattern: an interrupt
//! handler pushes received bytes on one side while foreground code pops them
//! on the other, with no locks on either path.
//!
//! # Concurrency model
//!
//! The buffer has two cursors. The write cursor (`head`) is advanced only by
//! the producer; the read cursor (`tail`) only by the consumer. Each cursor
//! is stored with release ordering by its owner and loaded with acquire
//! ordering by the other side, so a consumer that observes an advanced head
//! also observes the byte written before it. No mutual exclusion is needed
//! because the two sides mutate disjoint cursors, and the cursor protocol
//! guarantees they never touch the same cell concurrently.
//!
//! The API takes `&self` so the producer side can be driven from interrupt
//! context through a shared reference. The single-producer/single-consumer
//! discipline is the caller's contract: at most one execution context may
//! call [`SpscRing::push`] and at most one may call [`SpscRing::pop`] at any
//! given time.
//!
//! # Overflow policy
//!
//! A push into a full buffer discards the *incoming* byte and leaves the
//! buffer untouched, so the oldest unread data is always preserved. Callers
//! that cannot tolerate silent loss must size the buffer for their worst-case
//! burst.
//!
//! # Capacity
//!
//! The backing store holds `size` bytes but at most `size - 1` are ever
//! occupied; the buffer is empty when the cursors are equal and full when
//! advancing the write cursor would make them equal.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// A lock-free single-producer/single-consumer byte ring buffer.
///
/// See the [crate-level documentation](crate) for the concurrency contract
/// and overflow policy.
///
/// # Examples
///
/// ```
/// use boson_ring::SpscRing;
///
/// let ring = SpscRing::with_capacity(8);
/// assert!(ring.push(0x41));
/// assert!(ring.push(0x42));
/// assert_eq!(ring.pop(), Some(0x41));
/// assert_eq!(ring.pop(), Some(0x42));
/// assert_eq!(ring.pop(), None);
/// ```
pub struct SpscRing {
    /// Backing store. Cells between `tail` and `head` hold unread bytes.
    buf: Box<[UnsafeCell<u8>]>,
    /// Write cursor: next empty slot. Advanced only by the producer.
    head: AtomicUsize,
    /// Read cursor: next unread slot. Advanced only by the consumer.
    tail: AtomicUsize,
}

// SAFETY: `SpscRing` may be handed between execution contexts; the atomics
// that guard access to `buf` are themselves Send.
unsafe impl Send for SpscRing {}

// SAFETY: Concurrent `push` and `pop` through a shared reference are
// data-race-free: the producer writes `buf[head]` only when the buffer is not
// full and the consumer reads `buf[tail]` only when it is not empty, which
// together imply `head != tail`, so the two sides always access disjoint
// cells. The release/acquire cursor protocol publishes each write before the
// cell becomes visible to the other side. Multiple concurrent producers (or
// consumers) are outside the contract.
unsafe impl Sync for SpscRing {}

impl SpscRing {
    /// Allocates a ring with a backing store of `size` bytes.
    ///
    /// The usable capacity is `size - 1`.
    ///
    /// # Panics
    ///
    /// Panics if `size < 2` (such a ring could never hold a byte).
    #[must_use]
    pub fn with_capacity(size: usize) -> Self {
        assert!(size >= 2, "ring size must be at least 2");
        let mut buf = Vec::with_capacity(size);
        buf.resize_with(size, || UnsafeCell::new(0));
        Self {
            buf: buf.into_boxed_slice(),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Returns the size of the backing store.
    ///
    /// At most `capacity() - 1` bytes are ever buffered.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of unread bytes.
    ///
    /// Callable from either side; the result is a snapshot and may be stale
    /// by the time it is used.
    #[must_use]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + self.buf.len() - tail) % self.buf.len()
    }

    /// Returns `true` if there are no unread bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Returns `true` if a push would be discarded.
    #[must_use]
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + 1) % self.buf.len() == tail
    }

    /// Pushes a byte. Producer side only.
    ///
    /// Returns `false` if the buffer was full, in which case `byte` is
    /// discarded and the buffer is unchanged.
    pub fn push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % self.buf.len();
        if next == self.tail.load(Ordering::Acquire) {
            // Full: drop the incoming byte, keep the oldest unread data.
            return false;
        }
        // SAFETY: `head != tail` (checked above), so the consumer cannot be
        // reading this cell; we are the only producer.
        unsafe { *self.buf[head].get() = byte };
        self.head.store(next, Ordering::Release);
        true
    }

    /// Pops the oldest unread byte. Consumer side only.
    ///
    /// Returns `None` if the buffer is empty.
    #[must_use]
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: The buffer is not empty, so the producer cannot be writing
        // this cell; we are the only consumer.
        let byte = unsafe { *self.buf[tail].get() };
        self.tail.store((tail + 1) % self.buf.len(), Ordering::Release);
        Some(byte)
    }
}
