use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the listener thread and whoever observes it
///
/// Read faults are swallowed by the framer and never reach the error
/// channel, so these counters are the only place a failing bus shows up.
#[derive(Debug, Default)]
pub struct ListenerMetrics {
    read_faults: AtomicU64,
    zero_reads: AtomicU64,
    empty_messages: AtomicU64,
    oversized: AtomicU64,
    sentences: AtomicU64,
    decode_errors: AtomicU64,
}

impl ListenerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_read_fault(&self) {
        self.read_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_zero_read(&self) {
        self.zero_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_message(&self) {
        self.empty_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_oversized(&self) {
        self.oversized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sentence(&self) {
        self.sentences.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            read_faults: self.read_faults.load(Ordering::Relaxed),
            zero_reads: self.zero_reads.load(Ordering::Relaxed),
            empty_messages: self.empty_messages.load(Ordering::Relaxed),
            oversized: self.oversized.load(Ordering::Relaxed),
            sentences: self.sentences.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Bus reads that returned an error
    pub read_faults: u64,
    /// Bus reads that returned no data
    pub zero_reads: u64,
    /// Framer runs that assembled nothing (read fault or oversized candidate)
    pub empty_messages: u64,
    /// Candidates dropped for running past the maximum sentence length
    pub oversized: u64,
    /// Sentences decoded successfully
    pub sentences: u64,
    /// Framed messages rejected by the decoder
    pub decode_errors: u64,
}

impl MetricsSnapshot {
    /// Counter increments between `earlier` and this snapshot
    pub fn since(&self, earlier: &MetricsSnapshot) -> MetricsSnapshot {
        MetricsSnapshot {
            read_faults: self.read_faults.saturating_sub(earlier.read_faults),
            zero_reads: self.zero_reads.saturating_sub(earlier.zero_reads),
            empty_messages: self.empty_messages.saturating_sub(earlier.empty_messages),
            oversized: self.oversized.saturating_sub(earlier.oversized),
            sentences: self.sentences.saturating_sub(earlier.sentences),
            decode_errors: self.decode_errors.saturating_sub(earlier.decode_errors),
        }
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Sentences: {}, Decode errors: {}, Read faults: {}, Oversized: {}, Empty messages: {}, Zero reads: {}",
            self.sentences,
            self.decode_errors,
            self.read_faults,
            self.oversized,
            self.empty_messages,
            self.zero_reads
        )
    }
}
