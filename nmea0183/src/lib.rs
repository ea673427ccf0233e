//! NMEA 0183 Bus Library
//!
//! This library extracts NMEA 0183 sentences from the raw byte stream of a
//! GPS module attached to a noisy hardware bus (I2C, SPI, UART):
//! - Byte source abstraction over the physical bus
//! - Framer that delimits sentences between `$` and `\r`, stripping stray `\n`
//! - Sentence decoder with checksum validation
//! - Listener that runs the framer on a background thread and publishes
//!   sentences and decode errors on two bounded channels
//!
//! # Example
//!
//! ```no_run
//! use nmea0183::{Listener, ReaderSource};
//!
//! let device = std::fs::File::open("/dev/ttyS0").unwrap();
//! let listener = Listener::new(ReaderSource::new(device));
//! let (mut sentences, mut errors, _handle) = listener.listen().unwrap();
//!
//! loop {
//!     if let Some(sentence) = sentences.blocking_recv() {
//!         println!("{}: {:?}", sentence.prefix(), sentence.fields);
//!     }
//!     while let Ok(error) = errors.try_recv() {
//!         eprintln!("Error: {}", error);
//!     }
//! }
//! ```

pub mod bus;
pub mod error;
pub mod framer;
pub mod listener;
pub mod metrics;
pub mod sentence;

// Re-export commonly used types
pub use bus::{ByteSource, ReaderSource};
pub use error::{DecodeError, ListenError};
pub use framer::Framer;
pub use listener::{Listener, ListenerHandle, SINK_CAPACITY};
pub use metrics::{ListenerMetrics, MetricsSnapshot};
pub use sentence::{Nmea0183Decoder, Sentence, SentenceDecoder};
