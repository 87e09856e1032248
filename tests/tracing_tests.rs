//! Tests for tracing instrumentation.
//!
//! These tests verify that tracing spans and events are emitted correctly
//! when the tracing feature is enabled.

#![cfg(feature = "tracing")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use kmer_counter::builder::KmerCounter;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

/// A simple layer that counts events at or above a level.
struct EventCounter {
    level: Level,
    count: Arc<AtomicUsize>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if event.metadata().level() <= &self.level {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn count_events(level: Level, threads: usize, input: &'static [u8]) -> usize {
    let count = Arc::new(AtomicUsize::new(0));
    let layer = EventCounter {
        level,
        count: Arc::clone(&count),
    };
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        KmerCounter::new()
            .k(3)
            .unwrap()
            .threads(threads)
            .run_fasta(input, &mut Vec::new())
            .expect("should count k-mers");
    });

    count.load(Ordering::SeqCst)
}

#[test]
fn counting_emits_info_events() {
    assert!(
        count_events(Level::INFO, 1, b">a\nACGT\n") > 0,
        "should emit tracing events"
    );
}

#[test]
fn debug_events_are_emitted_per_record() {
    let info = count_events(Level::INFO, 1, b">a\nACGT\n>b\nACGT\n>c\nACGT\n");
    let debug = count_events(Level::DEBUG, 1, b">a\nACGT\n>b\nACGT\n>c\nACGT\n");
    assert!(debug >= info + 3, "info={info} debug={debug}");
}

#[test]
fn logging_does_not_touch_output() {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(EventCounter {
        level: Level::TRACE,
        count: Arc::clone(&count),
    });

    let mut out = Vec::new();
    tracing::subscriber::with_default(subscriber, || {
        KmerCounter::new()
            .k(2)
            .unwrap()
            .run_fasta(&b">x\nAAA\n"[..], &mut out)
            .unwrap();
    });
    assert_eq!(out, b">x\tAA:2\n");
    assert!(count.load(Ordering::SeqCst) > 0);
}
