use std::io;
use std::sync::Arc;
use tracing::trace;

use crate::bus::ByteSource;
use crate::metrics::ListenerMetrics;

/// Start of an NMEA 0183 sentence
pub const START_MARKER: u8 = b'$';
/// End of an NMEA 0183 sentence
pub const TERMINATOR: u8 = b'\r';
/// Stray byte the GPS module injects mid-sentence; dropped wherever it appears
pub const NOISE: u8 = b'\n';
/// Longest sentence NMEA 0183 allows, `$` through `\r\n`.
/// A candidate growing past this has lost its terminator and is discarded.
pub const MAX_MESSAGE_LEN: usize = 82;

/// NMEA 0183 sentence framer
///
/// Pulls bytes one at a time from a [`ByteSource`] and assembles a single
/// candidate sentence per call:
/// - Bytes before the start marker `$` are discarded
/// - Bytes after it are accumulated until the terminator `\r`
/// - Line feeds are dropped, including those injected mid-sentence
///
/// Zero-length reads are retried immediately. A read error, or a candidate
/// longer than [`MAX_MESSAGE_LEN`], abandons the sentence being assembled and
/// the call returns an empty message; the next call starts over looking for
/// a start marker.
///
/// # Usage
///
/// ```no_run
/// use nmea0183::{Framer, ReaderSource};
///
/// let device = std::fs::File::open("/dev/ttyS0").unwrap();
/// let mut framer = Framer::new(ReaderSource::new(device));
///
/// loop {
///     let message = framer.read_message();
///     if !message.is_empty() {
///         println!("{}", String::from_utf8_lossy(&message));
///     }
/// }
/// ```
pub struct Framer<S> {
    source: S,
    metrics: Arc<ListenerMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramerState {
    SeekingStart,
    Accumulating,
}

impl<S: ByteSource> Framer<S> {
    pub fn new(source: S) -> Self {
        Self::with_metrics(source, Arc::new(ListenerMetrics::new()))
    }

    /// Create a framer that reports read faults and empty reads to shared metrics
    pub fn with_metrics(source: S, metrics: Arc<ListenerMetrics>) -> Self {
        Self { source, metrics }
    }

    pub fn metrics(&self) -> &Arc<ListenerMetrics> {
        &self.metrics
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Read bytes until one candidate sentence is complete
    ///
    /// # Returns
    /// The sentence from `$` up to (not including) `\r`, without line feeds,
    /// or an empty vector if a read error or an overlong candidate aborted the attempt
    pub fn read_message(&mut self) -> Vec<u8> {
        let mut message = Vec::new();
        let mut state = FramerState::SeekingStart;

        loop {
            let byte = match self.next_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => continue,
                Err(e) => {
                    self.metrics.record_read_fault();
                    trace!("Bus read failed, dropping {} buffered bytes: {}", message.len(), e);
                    return Vec::new();
                }
            };

            match (state, byte) {
                (FramerState::SeekingStart, START_MARKER) => {
                    message.push(byte);
                    state = FramerState::Accumulating;
                }
                (FramerState::SeekingStart, _) => {}
                (FramerState::Accumulating, TERMINATOR) => return message,
                (FramerState::Accumulating, NOISE) => {}
                (FramerState::Accumulating, _) => {
                    if message.len() >= MAX_MESSAGE_LEN {
                        self.metrics.record_oversized();
                        trace!("No terminator within {} bytes, dropping candidate", MAX_MESSAGE_LEN);
                        return Vec::new();
                    }
                    message.push(byte);
                }
            }
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.source.read_bytes(&mut buf)? {
            0 => {
                self.metrics.record_zero_read();
                Ok(None)
            }
            _ => Ok(Some(buf[0])),
        }
    }
}
