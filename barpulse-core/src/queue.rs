//! Bounded Event Queue for Cross-Thread Hand-Off
//!
//! ## Overview
//!
//! The engine runs on the thread that receives decoded samples; rendering
//! and export run elsewhere. The hand-off between them is message passing
//! over this bounded single-producer single-consumer queue — consumers
//! receive [`EngineEvent`]s *by value* and never hold references into
//! engine-internal buffers, so torn reads are impossible by construction.
//!
//! ```text
//! Ingestion thread                     Consumer thread
//!       │                                    │
//!   drain_events() ──→ EventProducer ━━━ EventConsumer ──→ charts/export
//!       │              (never blocks)   (never blocks)
//! ```
//!
//! ## Why SPSC?
//!
//! There is exactly one producer (the ingestion loop) and one consumer (the
//! presentation side); an SPSC ring needs no locks and no compare-and-swap
//! loops, so neither side can stall the other:
//!
//! - **Producer full** → the event is dropped and counted, the ingestion
//!   path keeps its non-blocking guarantee (drop-newest: completed
//!   repetitions also travel via the `ingest` return value, so a dropped
//!   event loses diagnostics, not data).
//! - **Consumer empty** → `poll` returns `None`, no spinning.
//!
//! The queue itself comes from `heapless::spsc` — the same fixed-capacity
//! toolbox the rest of the crate is built on; this module adds the event
//! typing and the health statistics.
//!
//! [`Telemetry`](crate::events::Telemetry) snapshots are `Copy` and are
//! typically shipped through a slot the application owns; only the event
//! stream needs ordering, hence the queue.

use crate::events::EngineEvent;
use heapless::spsc::{Consumer, Producer, Queue};

/// Default queue capacity in events
///
/// Sized for a render loop polling at ~10 Hz against a 50 Hz sample stream:
/// even a marker-heavy window close (6 events) leaves ample headroom.
pub const QUEUE_CAPACITY: usize = 64;

/// Producer-side queue statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Events successfully enqueued
    pub published: u32,
    /// Events dropped because the queue was full
    pub dropped: u32,
}

/// Bounded SPSC queue for engine events
///
/// Holds `N - 1` events (ring buffer slot accounting). Split once into a
/// producer/consumer pair and move each half to its thread.
pub struct EventQueue<const N: usize = QUEUE_CAPACITY> {
    inner: Queue<EngineEvent, N>,
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue; usable in static contexts
    pub const fn new() -> Self {
        Self {
            inner: Queue::new(),
        }
    }

    /// Split into the producer and consumer endpoints
    pub fn split(&mut self) -> (EventProducer<'_, N>, EventConsumer<'_, N>) {
        let (producer, consumer) = self.inner.split();
        (
            EventProducer {
                inner: producer,
                stats: QueueStats::default(),
            },
            EventConsumer { inner: consumer },
        )
    }

    /// Usable capacity in events
    pub const fn capacity(&self) -> usize {
        N - 1
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ingestion-side endpoint
pub struct EventProducer<'a, const N: usize> {
    inner: Producer<'a, EngineEvent, N>,
    stats: QueueStats,
}

impl<const N: usize> EventProducer<'_, N> {
    /// Publish an event; returns `false` (and counts the drop) when the
    /// queue is full. Never blocks.
    pub fn publish(&mut self, event: EngineEvent) -> bool {
        match self.inner.enqueue(event) {
            Ok(()) => {
                self.stats.published = self.stats.published.saturating_add(1);
                true
            }
            Err(_) => {
                self.stats.dropped = self.stats.dropped.saturating_add(1);
                false
            }
        }
    }

    /// Publish everything an iterator yields; returns how many were dropped
    pub fn publish_all(&mut self, events: impl Iterator<Item = EngineEvent>) -> u32 {
        let before = self.stats.dropped;
        for event in events {
            self.publish(event);
        }
        self.stats.dropped - before
    }

    /// Health counters for this producer
    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}

/// Presentation-side endpoint
pub struct EventConsumer<'a, const N: usize> {
    inner: Consumer<'a, EngineEvent, N>,
}

impl<const N: usize> EventConsumer<'_, N> {
    /// Take the next event, oldest first; `None` when the queue is empty.
    /// Never blocks.
    pub fn poll(&mut self) -> Option<EngineEvent> {
        self.inner.dequeue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(ts: u64) -> EngineEvent {
        EngineEvent::WindowClosed {
            start: ts,
            samples: 0,
        }
    }

    #[test]
    fn publish_then_poll_in_order() {
        let mut queue: EventQueue<8> = EventQueue::new();
        let (mut tx, mut rx) = queue.split();

        for ts in 0..3 {
            assert!(tx.publish(event(ts)));
        }

        for ts in 0..3 {
            assert_eq!(rx.poll(), Some(event(ts)));
        }
        assert_eq!(rx.poll(), None);
    }

    #[test]
    fn full_queue_drops_and_counts() {
        let mut queue: EventQueue<4> = EventQueue::new();
        let (mut tx, mut rx) = queue.split();

        // Capacity is N - 1 = 3
        assert!(tx.publish(event(0)));
        assert!(tx.publish(event(1)));
        assert!(tx.publish(event(2)));
        assert!(!tx.publish(event(3)));

        let stats = tx.stats();
        assert_eq!(stats.published, 3);
        assert_eq!(stats.dropped, 1);

        // Draining frees space again
        assert_eq!(rx.poll(), Some(event(0)));
        assert!(tx.publish(event(4)));
    }

    #[test]
    fn publish_all_reports_drops() {
        let mut queue: EventQueue<4> = EventQueue::new();
        let (mut tx, _rx) = queue.split();

        let dropped = tx.publish_all((0..5).map(event));
        assert_eq!(dropped, 2);
    }
}
