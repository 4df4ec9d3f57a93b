//! Interrupt → main-loop hand-off primitives.
//!
//! Both devices run one cooperative main loop preempted by interrupts.
//! Every shared value has exactly one writer and one reader:
//!
//! ```text
//! ┌────────────────────┐  TickCounter   ┌──────────────────┐
//! │ Timer overflow ISR │──────────────▶│ Master main loop │
//! └────────────────────┘                └──────────────────┘
//! ┌────────────────────┐  CommandQueue  ┌──────────────────┐
//! │ I2C client ISR     │──────────────▶│ Slave main loop  │
//! │ (producer half)    │                │ (consumer half)  │
//! └────────────────────┘                └──────────────────┘
//! ```
//!
//! The values live in owned structs rather than globals.  Firmware places
//! them in a `static` (the counter) or splits them once at boot (the queue)
//! and hands each half to its single owner.

use core::sync::atomic::{AtomicU8, Ordering};

use heapless::spsc::{Consumer, Producer, Queue};

// ── Timer tick counter ────────────────────────────────────────

/// Pending timer ticks.  Incremented only from the timer ISR,
/// decremented only by the main loop.
pub struct TickCounter {
    pending: AtomicU8,
}

impl TickCounter {
    /// Counter seeded with `initial` pending ticks.
    pub const fn new(initial: u8) -> Self {
        Self {
            pending: AtomicU8::new(initial),
        }
    }

    /// Record one timer overflow.  ISR-safe (lock-free); saturates at 255.
    pub fn on_overflow(&self) {
        let _ = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1));
    }

    /// Consume one pending tick.  Returns `false` when none is pending.
    pub fn take(&self) -> bool {
        self.pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn pending(&self) -> u8 {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for TickCounter {
    /// One tick pending, so the first loop iteration refreshes the clock.
    fn default() -> Self {
        Self::new(1)
    }
}

// ── Received command queue ────────────────────────────────────

/// Queue storage size.  `heapless` keeps one slot free, so
/// `COMMAND_QUEUE_DEPTH - 1` commands can be pending at once.
pub const COMMAND_QUEUE_DEPTH: usize = 8;

/// Lock-free SPSC queue of command bytes received by the I2C client.
pub struct CommandQueue {
    inner: Queue<u8, COMMAND_QUEUE_DEPTH>,
}

impl CommandQueue {
    pub const fn new() -> Self {
        Self {
            inner: Queue::new(),
        }
    }

    /// Split into the ISR-side producer and the main-loop consumer.
    pub fn split(&mut self) -> (CommandProducer<'_>, CommandConsumer<'_>) {
        let (producer, consumer) = self.inner.split();
        (CommandProducer { inner: producer }, CommandConsumer { inner: consumer })
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side half.  Never blocks.
pub struct CommandProducer<'a> {
    inner: Producer<'a, u8, COMMAND_QUEUE_DEPTH>,
}

impl CommandProducer<'_> {
    /// Post a received byte.  Returns `false` if the queue is full
    /// (the byte is dropped).
    pub fn post(&mut self, byte: u8) -> bool {
        self.inner.enqueue(byte).is_ok()
    }

    pub fn is_full(&self) -> bool {
        !self.inner.ready()
    }
}

/// Main-loop half.
pub struct CommandConsumer<'a> {
    inner: Consumer<'a, u8, COMMAND_QUEUE_DEPTH>,
}

impl CommandConsumer<'_> {
    /// Take the oldest pending byte.
    pub fn take(&mut self) -> Option<u8> {
        self.inner.dequeue()
    }

    /// Number of bytes waiting.
    pub fn pending(&self) -> usize {
        self.inner.len()
    }
}
