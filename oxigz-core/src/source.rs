//! Random-access byte source with mark/reset.
//!
//! [`MarkableSource`] buffers reads from any `Read + Seek` (normally a
//! [`File`]) and implements [`BufRead`], so a decoder can consume exactly the
//! bytes it needs and leave the rest in place for the next reader. A single
//! saved offset supports returning to an earlier position.
//!
//! Re-reading after [`MarkableSource::reset`] yields the same bytes only if
//! the underlying file was not modified in the meantime.

use crate::error::{GzError, Result};
use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom};
use std::path::Path;

/// Default read-ahead buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Buffered, seekable byte source with a single mark.
///
/// # Example
///
/// ```
/// use oxigz_core::MarkableSource;
/// use std::io::Cursor;
///
/// let mut source = MarkableSource::new(Cursor::new(b"abcdef".to_vec())).unwrap();
/// source.read_byte().unwrap();
/// source.mark();
/// assert_eq!(source.read_byte().unwrap(), Some(b'b'));
/// assert_eq!(source.read_byte().unwrap(), Some(b'c'));
/// source.reset().unwrap();
/// assert_eq!(source.read_byte().unwrap(), Some(b'b'));
/// ```
#[derive(Debug)]
pub struct MarkableSource<R = File> {
    inner: R,
    buf: Box<[u8]>,
    /// Next unread byte in `buf`.
    pos: usize,
    /// Number of valid bytes in `buf`.
    filled: usize,
    /// Offset of `inner` (the byte just past `buf[..filled]`).
    inner_pos: u64,
    mark_position: Option<u64>,
}

impl MarkableSource<File> {
    /// Open a file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(file)
    }
}

impl<R: Read + Seek> MarkableSource<R> {
    /// Wrap a seekable reader, starting at its current position.
    pub fn new(inner: R) -> Result<Self> {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// Wrap a seekable reader with a specific read-ahead size.
    pub fn with_capacity(capacity: usize, mut inner: R) -> Result<Self> {
        let inner_pos = inner.stream_position()?;
        Ok(Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            filled: 0,
            inner_pos,
            mark_position: None,
        })
    }

    /// Logical read position.
    pub fn position(&self) -> u64 {
        self.inner_pos - (self.filled - self.pos) as u64
    }

    /// Position saved by the last [`mark`](Self::mark), if any.
    pub fn mark_position(&self) -> Option<u64> {
        self.mark_position
    }

    /// Read one byte, or `None` at end of stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.fill_buf()?.first().copied();
        if byte.is_some() {
            self.consume(1);
        }
        Ok(byte)
    }

    /// Read up to `len` bytes into `buf[offset..offset + len]`.
    ///
    /// Returns the number of bytes read, which may be less than `len`, or
    /// `None` at end of stream. A zero-length request returns `Some(0)`.
    pub fn read_into(&mut self, buf: &mut [u8], offset: usize, len: usize) -> Result<Option<usize>> {
        let end = offset
            .checked_add(len)
            .ok_or_else(|| GzError::buffer_too_small(usize::MAX, buf.len()))?;
        if end > buf.len() {
            return Err(GzError::buffer_too_small(end, buf.len()));
        }
        if len == 0 {
            return Ok(Some(0));
        }
        match self.read(&mut buf[offset..end])? {
            0 => Ok(None),
            n => Ok(Some(n)),
        }
    }

    /// Remember the current position for a later [`reset`](Self::reset).
    pub fn mark(&mut self) {
        self.mark_position = Some(self.position());
    }

    /// Return to the marked position.
    ///
    /// Without a prior [`mark`](Self::mark) this does nothing.
    pub fn reset(&mut self) -> Result<()> {
        let Some(target) = self.mark_position else {
            return Ok(());
        };

        // Stay inside the buffer when the mark is still in it.
        let buf_start = self.inner_pos - self.filled as u64;
        if target >= buf_start && target <= self.inner_pos {
            self.pos = (target - buf_start) as usize;
            return Ok(());
        }

        self.inner_pos = self.inner.seek(SeekFrom::Start(target))?;
        self.pos = 0;
        self.filled = 0;
        Ok(())
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap, returning the underlying reader. Buffered but unread bytes
    /// are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> Read for MarkableSource<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        // Large reads on an empty buffer skip the copy.
        if self.pos == self.filled && out.len() >= self.buf.len() {
            let n = self.inner.read(out)?;
            self.inner_pos += n as u64;
            self.pos = 0;
            self.filled = 0;
            return Ok(n);
        }

        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read + Seek> BufRead for MarkableSource<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos == self.filled {
            let n = self.inner.read(&mut self.buf)?;
            self.inner_pos += n as u64;
            self.pos = 0;
            self.filled = n;
        }
        Ok(&self.buf[self.pos..self.filled])
    }

    fn consume(&mut self, amount: usize) {
        self.pos = (self.pos + amount).min(self.filled);
    }
}
