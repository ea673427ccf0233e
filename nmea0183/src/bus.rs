use std::io::{self, Read};

/// Trait for anything that can hand out raw bytes read from a hardware bus
///
/// A read may return any number of bytes, including zero without an error,
/// and may fail at any time. Failures are expected to be transient
/// (bus busy, NACK) so callers simply try again.
///
/// Implementations must be cheap to call in a tight loop: the framer
/// busy-polls on zero-length reads.
pub trait ByteSource {
    /// Attempt to read into `buf`, returning the number of bytes read
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_bytes(buf)
    }
}

/// Adapts any `std::io::Read` (device file, serial port, socket) into a ByteSource
pub struct ReaderSource<R> {
    inner: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
