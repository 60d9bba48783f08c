//! Lock-free single-producer/single-consumer key queue.
//!
//! The keyboard interrupt handler is the only producer and the line editor
//! the only consumer. Keys travel as their one-byte wire form so the slots
//! can be plain atomics. One slot is always left empty to tell a full ring
//! from an empty one.

use crate::key::Key;
use crate::KEY_QUEUE_CAPACITY;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use myos_hal::Idle;

/// Bounded ring of pending key events.
pub struct KeyQueue<const N: usize = KEY_QUEUE_CAPACITY> {
    slots: [AtomicU8; N],
    /// Next slot to write. Written by the producer only.
    head: AtomicUsize,
    /// Next slot to read. Written by the consumer only.
    tail: AtomicUsize,
    dropped: AtomicUsize,
}

impl<const N: usize> KeyQueue<N> {
    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY: AtomicU8 = AtomicU8::new(0);

    /// Creates an empty queue.
    pub const fn new() -> Self {
        Self {
            slots: [Self::EMPTY; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
        }
    }

    /// Number of keys the queue can hold at once.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Appends a key. Producer side.
    ///
    /// Returns false and drops the key when the queue is full.
    pub fn push(&self, key: Key) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % N;
        if next == self.tail.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.slots[head].store(key.to_byte(), Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    /// Removes the oldest key. Consumer side.
    pub fn pop(&self) -> Option<Key> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let byte = self.slots[tail].load(Ordering::Relaxed);
        self.tail.store((tail + 1) % N, Ordering::Release);
        Key::from_byte(byte)
    }

    /// Waits for a key, idling the CPU between checks.
    pub fn pop_blocking<I: Idle + ?Sized>(&self, idle: &I) -> Key {
        loop {
            if let Some(key) = self.pop() {
                return key;
            }
            idle.wait_for_interrupt();
        }
    }

    /// Returns true if at least one key is pending.
    pub fn available(&self) -> bool {
        self.tail.load(Ordering::Acquire) != self.head.load(Ordering::Acquire)
    }

    /// Number of pending keys.
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (head + N - tail) % N
    }

    /// Returns true if no key is pending.
    pub fn is_empty(&self) -> bool {
        !self.available()
    }

    /// Keys discarded because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Discards all pending keys and the drop count.
    ///
    /// Only safe to call while the producer is quiet, e.g. before its
    /// interrupt line is unmasked.
    pub fn reset(&self) {
        self.tail.store(0, Ordering::Release);
        self.head.store(0, Ordering::Release);
        self.dropped.store(0, Ordering::Relaxed);
    }
}

impl<const N: usize> Default for KeyQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
