use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, warn};

use crate::bus::ByteSource;
use crate::error::ListenError;
use crate::framer::Framer;
use crate::metrics::ListenerMetrics;
use crate::sentence::{Nmea0183Decoder, SentenceDecoder};

/// Capacity of the sentence and error channels.
/// At most one sentence and one error wait ahead of the consumer.
pub const SINK_CAPACITY: usize = 1;

/// Background NMEA listener
///
/// Owns the byte source and runs the framer in an endless loop on a
/// dedicated thread. Every framed message goes through the decoder and
/// ends up either on the sentence channel or, wrapped with its raw text,
/// on the error channel. Empty messages (bare terminators, aborted reads)
/// are skipped silently.
///
/// Both channels are bounded to [`SINK_CAPACITY`]: the listener stalls
/// while a full channel is not drained, so consumers should read both
/// concurrently, e.g. with `tokio::select!`.
pub struct Listener<S, D = Nmea0183Decoder> {
    framer: Framer<S>,
    decoder: D,
}

impl<S: ByteSource> Listener<S> {
    /// Create a listener with the standard NMEA 0183 decoder
    pub fn new(source: S) -> Self {
        Self::with_decoder(source, Nmea0183Decoder)
    }
}

impl<S: ByteSource, D: SentenceDecoder> Listener<S, D> {
    pub fn with_decoder(source: S, decoder: D) -> Self {
        Self {
            framer: Framer::new(source),
            decoder,
        }
    }

    /// Counters updated by the listener thread
    pub fn metrics(&self) -> Arc<ListenerMetrics> {
        Arc::clone(self.framer.metrics())
    }

    /// Start the listener thread
    ///
    /// # Returns
    /// The sentence receiver, the error receiver and a handle to the thread
    pub fn listen(self) -> io::Result<(Receiver<D::Sentence>, Receiver<ListenError>, ListenerHandle)>
    where
        S: Send + 'static,
        D: Send + 'static,
        D::Sentence: Send + 'static,
    {
        let (sentence_tx, sentence_rx) = mpsc::channel(SINK_CAPACITY);
        let (error_tx, error_rx) = mpsc::channel(SINK_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);

        let thread = thread::Builder::new()
            .name("nmea-listener".to_string())
            .spawn(move || self.run(&sentence_tx, &error_tx, &shutdown_flag))?;

        Ok((sentence_rx, error_rx, ListenerHandle { thread, shutdown }))
    }

    fn run(mut self, sentences: &Sender<D::Sentence>, errors: &Sender<ListenError>, shutdown: &AtomicBool) {
        debug!("NMEA listener started");
        while !shutdown.load(Ordering::Relaxed) {
            if self.dispatch_once(sentences, errors).is_break() {
                break;
            }
        }
        debug!("NMEA listener stopped");
    }

    /// Frame one message and route its decode result.
    /// Breaks when the receiving side of a channel is gone.
    fn dispatch_once(&mut self, sentences: &Sender<D::Sentence>, errors: &Sender<ListenError>) -> ControlFlow<()> {
        let line = self.framer.read_message();
        let metrics = self.framer.metrics();
        if line.is_empty() {
            metrics.record_empty_message();
            return ControlFlow::Continue(());
        }

        match self.decoder.decode(&line) {
            Ok(sentence) => {
                metrics.record_sentence();
                if sentences.blocking_send(sentence).is_err() {
                    warn!("Sentence receiver dropped, stopping NMEA listener");
                    return ControlFlow::Break(());
                }
            }
            Err(e) => {
                metrics.record_decode_error();
                let line = String::from_utf8_lossy(&line).into_owned();
                debug!("Failed to decode '{}': {}", line, e);
                if errors.blocking_send(ListenError::Decode { line, source: e }).is_err() {
                    warn!("Error receiver dropped, stopping NMEA listener");
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }
}

/// Handle to a running listener thread
///
/// Dropping the handle leaves the thread running for the rest of the process.
pub struct ListenerHandle {
    thread: JoinHandle<()>,
    shutdown: Arc<AtomicBool>,
}

impl ListenerHandle {
    /// Ask the listener to stop
    ///
    /// The flag is checked once per framed message, so a thread that is
    /// waiting on a full channel or polling a silent bus does not stop
    /// until that wait ends.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    /// Wait for the listener thread to exit
    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }
}
