//! Output destinations for committed bytes.

use std::io;

use crate::SinkError;

// -----------------------------------------------------------------------------
// ByteSink

/// Answer of a sink after accepting bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    Ready,
    /// The sink asks to be flushed before more bytes arrive.
    NeedsFlush,
}

/// Destination that receives the bytes a [`TokenWriter`](crate::TokenWriter)
/// commits.
///
/// Committed bytes are never taken back, even if writing fails later.
pub trait ByteSink {
    /// Appends `bytes`, all or nothing.
    fn commit(&mut self, bytes: &[u8]) -> Result<SinkStatus, SinkError>;

    /// Pushes buffered bytes further down, if the sink buffers at all.
    #[inline]
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn commit(&mut self, bytes: &[u8]) -> Result<SinkStatus, SinkError> {
        self.extend_from_slice(bytes);
        Ok(SinkStatus::Ready)
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    #[inline]
    fn commit(&mut self, bytes: &[u8]) -> Result<SinkStatus, SinkError> {
        (**self).commit(bytes)
    }

    #[inline]
    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

// -----------------------------------------------------------------------------
// SliceSink

/// Writes into a caller-owned, fixed-size buffer.
///
/// # Examples
///
/// ```
/// use vc_json::{ByteSink, SliceSink, SinkError};
///
/// let mut buf = [0_u8; 4];
/// let mut sink = SliceSink::new(&mut buf);
///
/// sink.commit(b"[1]").unwrap();
/// assert_eq!(sink.written(), b"[1]");
/// assert!(matches!(sink.commit(b"[]"), Err(SinkError::Full { needed: 2, available: 1 })));
/// ```
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> SliceSink<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// Returns the bytes committed so far.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }
}

impl ByteSink for SliceSink<'_> {
    fn commit(&mut self, bytes: &[u8]) -> Result<SinkStatus, SinkError> {
        let available = self.remaining();
        if bytes.len() > available {
            return Err(SinkError::Full {
                needed: bytes.len(),
                available,
            });
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(SinkStatus::Ready)
    }
}

// -----------------------------------------------------------------------------
// IoSink

/// Adapts an [`io::Write`] into a [`ByteSink`].
///
/// Asks for a flush once `flush_after` bytes went through since the last one.
pub struct IoSink<W: io::Write> {
    writer: W,
    unflushed: usize,
    flush_after: usize,
}

impl<W: io::Write> IoSink<W> {
    pub const DEFAULT_FLUSH_AFTER: usize = 64 * 1024;

    #[inline]
    pub fn new(writer: W) -> Self {
        Self::with_flush_after(writer, Self::DEFAULT_FLUSH_AFTER)
    }

    #[inline]
    pub fn with_flush_after(writer: W, flush_after: usize) -> Self {
        Self {
            writer,
            unflushed: 0,
            flush_after,
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> ByteSink for IoSink<W> {
    fn commit(&mut self, bytes: &[u8]) -> Result<SinkStatus, SinkError> {
        self.writer.write_all(bytes)?;
        self.unflushed += bytes.len();
        if self.unflushed >= self.flush_after {
            Ok(SinkStatus::NeedsFlush)
        } else {
            Ok(SinkStatus::Ready)
        }
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        self.unflushed = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{ByteSink, IoSink, SinkStatus};
    use crate::SinkError;

    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn io_sink_requests_flush() {
        let mut sink = IoSink::with_flush_after(Vec::new(), 4);
        assert_eq!(sink.commit(b"ab").unwrap(), SinkStatus::Ready);
        assert_eq!(sink.commit(b"cd").unwrap(), SinkStatus::NeedsFlush);
        sink.flush().unwrap();
        assert_eq!(sink.commit(b"e").unwrap(), SinkStatus::Ready);
        assert_eq!(sink.into_inner(), b"abcde");
    }

    #[test]
    fn io_errors_surface() {
        let mut sink = IoSink::new(Broken);
        assert!(matches!(sink.commit(b"x"), Err(SinkError::Io(_))));
    }
}
