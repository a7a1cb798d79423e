//! Fixed-capacity SPSC ring channel.
//!
//! - Producer: exactly one thread calls [`RingProducer::try_write`]
//! - Consumer: exactly one thread calls [`RingConsumer::read_available`]
//!
//! Both endpoints are owned and not `Clone`, so the single-producer /
//! single-consumer rule holds by construction. Neither side blocks or allocates
//! after the channel is created.

use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapCons, HeapProd, HeapRb,
};

/// Create a channel holding at most `capacity` records (minimum 1).
pub fn ring_channel<T>(capacity: usize) -> (RingProducer<T>, RingConsumer<T>) {
    let rb = HeapRb::<T>::new(capacity.max(1));
    let (producer, consumer) = rb.split();
    (RingProducer { producer }, RingConsumer { consumer })
}

/// Write end of a [`ring_channel`].
pub struct RingProducer<T> {
    producer: HeapProd<T>,
}

impl<T> RingProducer<T> {
    /// RT-safe. Enqueues `record` if there is room, otherwise hands it back.
    ///
    /// A full channel is reported, never waited on; the caller decides whether
    /// to drop the record or retry later.
    #[inline]
    pub fn try_write(&mut self, record: T) -> Result<(), T> {
        self.producer.try_push(record)
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.producer.vacant_len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.producer.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.producer.capacity().get()
    }
}

/// Read end of a [`ring_channel`].
pub struct RingConsumer<T> {
    consumer: HeapCons<T>,
}

impl<T> RingConsumer<T> {
    /// RT-safe. Drains the records enqueued before this call.
    ///
    /// Records written while the returned iterator is alive are left for the
    /// next call. Records the iterator does not reach (because it was dropped
    /// early) also stay queued.
    #[inline]
    pub fn read_available(&mut self) -> Drain<'_, T> {
        let remaining = self.consumer.occupied_len();
        Drain {
            consumer: &mut self.consumer,
            remaining,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.consumer.occupied_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.consumer.capacity().get()
    }
}

/// Iterator returned by [`RingConsumer::read_available`].
pub struct Drain<'a, T> {
    consumer: &'a mut HeapCons<T>,
    remaining: usize,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.consumer.try_pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> std::fmt::Debug for RingProducer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingProducer")
            .field("capacity", &self.capacity())
            .field("free", &self.free_len())
            .finish()
    }
}

impl<T> std::fmt::Debug for RingConsumer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingConsumer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}
