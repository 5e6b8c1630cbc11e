//! Fixed-capacity single-producer / single-consumer ring buffer of
//! [`CanMessage`] values.
//!
//! Classic one-slot-wasted layout: the queue is empty when `head == tail` and
//! full when `(head + 1) % N == tail`, so it holds at most `N - 1` messages.
//!
//! # Concurrency
//!
//! [`RingBuffer::split`] hands out exactly one [`Producer`] and one [`Consumer`].
//! The producer only writes `head` and the slot at `head`; the consumer only
//! writes `tail` and reads the slot at `tail`. Each side publishes its cursor
//! with a `Release` store and observes the other side's cursor with an
//! `Acquire` load, so the producer may run in an interrupt handler while the
//! consumer runs in the polling loop. Only atomic loads and stores are used,
//! which keeps the queue usable on cores without compare-and-swap.
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{CanMessage, Direction, CANBUS_BUFFER_LEN};
use crate::error::QueueError;

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: UnsafeCell<CanMessage> = UnsafeCell::new(CanMessage::EMPTY);

//==================================================================================Enums and Structs
/// Result of a single drain attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drain {
    /// Nothing was queued.
    Empty,
    /// The head message was handed over and removed from the queue.
    Consumed,
    /// TX only: the transceiver refused the head message; it stays queued and
    /// is offered again on the next drain.
    Deferred,
}

impl Drain {
    /// Whether the read cursor moved.
    #[inline]
    pub fn advanced(self) -> bool {
        matches!(self, Drain::Consumed)
    }
}

/// Storage shared by one producer and one consumer.
pub struct RingBuffer<const N: usize = CANBUS_BUFFER_LEN> {
    direction: Direction,
    /// Write cursor, owned by the producer.
    head: AtomicUsize,
    /// Read cursor, owned by the consumer.
    tail: AtomicUsize,
    /// Messages refused because the queue was full (producer-owned).
    dropped: AtomicUsize,
    slots: [UnsafeCell<CanMessage>; N],
}

// SAFETY: slots are only reached through the unique `Producer` (slot at
// `head`, before `head` is published) and the unique `Consumer` (slot at
// `tail`, after the producer published it). `split` needs `&mut self`, so the
// halves cannot be duplicated.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty queue for `direction`. `N` must be at least 2.
    pub const fn new(direction: Direction) -> Self {
        assert!(N >= 2, "a ring buffer needs at least two slots");
        Self {
            direction,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
            slots: [EMPTY_SLOT; N],
        }
    }

    /// Split into the producer and consumer halves.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let buffer: &Self = self;
        (Producer { buffer }, Consumer { buffer })
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Usable capacity (`N - 1`).
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Number of queued, unconsumed messages.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        occupied::<N>(head, tail)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N - 1
    }

    /// Current `(head, tail)` cursors.
    pub fn cursors(&self) -> (usize, usize) {
        (
            self.head.load(Ordering::Acquire),
            self.tail.load(Ordering::Acquire),
        )
    }

    /// Messages dropped so far because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[inline]
fn occupied<const N: usize>(head: usize, tail: usize) -> usize {
    if head >= tail {
        head - tail
    } else {
        head + N - tail
    }
}

//==================================================================================Producer
/// Writing half. Safe to use from interrupt context.
pub struct Producer<'a, const N: usize> {
    buffer: &'a RingBuffer<N>,
}

impl<'a, const N: usize> Producer<'a, N> {
    /// Append `message`. A full queue drops it and reports
    /// [`QueueError::Full`]; cursors and stored messages are left untouched.
    pub fn enqueue(&mut self, message: CanMessage) -> Result<(), QueueError> {
        let buffer = self.buffer;
        let head = buffer.head.load(Ordering::Relaxed);
        let next_head = (head + 1) % N;

        if next_head == buffer.tail.load(Ordering::Acquire) {
            let dropped = buffer.dropped.load(Ordering::Relaxed);
            buffer
                .dropped
                .store(dropped.wrapping_add(1), Ordering::Relaxed);

            #[cfg(feature = "defmt")]
            defmt::warn!("{} ring buffer is full!", buffer.direction.as_str());

            return Err(QueueError::Full {
                direction: buffer.direction,
            });
        }

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "adding message to {} ring buffer, idx:{}",
            buffer.direction.as_str(),
            head
        );

        // SAFETY: the slot at `head` is outside the consumer's window until the
        // store below publishes it.
        unsafe { buffer.slots[head].get().write(message) };
        buffer.head.store(next_head, Ordering::Release);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.buffer.is_full()
    }

    #[inline]
    pub fn dropped(&self) -> usize {
        self.buffer.dropped()
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.buffer.direction
    }
}

//==================================================================================Consumer
/// Reading half, owned by the polling loop.
pub struct Consumer<'a, const N: usize> {
    buffer: &'a RingBuffer<N>,
}

impl<'a, const N: usize> Consumer<'a, N> {
    /// Copy of the head message, without consuming it.
    pub fn peek(&self) -> Option<CanMessage> {
        let buffer = self.buffer;
        let tail = buffer.tail.load(Ordering::Relaxed);
        if tail == buffer.head.load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: `tail != head`, so the producer published this slot and will
        // not write it again before `tail` moves past it.
        Some(unsafe { buffer.slots[tail].get().read() })
    }

    /// Offer the head message to `consume`, then advance according to the
    /// queue direction:
    ///
    /// * RX: the message is always consumed, whatever `consume` returns;
    /// * TX: the message is consumed only if `consume` returns `true`,
    ///   otherwise it stays at the head and [`Drain::Deferred`] is returned.
    ///
    /// `consume` is not called on an empty queue.
    pub fn drain_one<F>(&mut self, consume: F) -> Drain
    where
        F: FnOnce(&CanMessage) -> bool,
    {
        let buffer = self.buffer;
        let tail = buffer.tail.load(Ordering::Relaxed);
        if tail == buffer.head.load(Ordering::Acquire) {
            return Drain::Empty;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "getting message from {} ring buffer, idx:{}",
            buffer.direction.as_str(),
            tail
        );

        // SAFETY: see `peek`.
        let message = unsafe { buffer.slots[tail].get().read() };
        let accepted = consume(&message);

        if buffer.direction == Direction::Tx && !accepted {
            #[cfg(feature = "defmt")]
            defmt::trace!("unable to send TX message, retrying next tick");
            return Drain::Deferred;
        }

        buffer.tail.store((tail + 1) % N, Ordering::Release);
        Drain::Consumed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.buffer.direction
    }
}
