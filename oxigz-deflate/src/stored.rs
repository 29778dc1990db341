//! DEFLATE stored-block writer.
//!
//! Every block is uncompressed (`BTYPE=00`), so the output is a valid DEFLATE
//! stream that is slightly larger than the input. Each block is written as:
//!
//! ```text
//! +--------+--------+--------+--------+--------+================+
//! | BFINAL |  LEN (LE u16)   | NLEN (LE u16)   | LEN raw bytes  |
//! +--------+--------+--------+--------+--------+================+
//! ```
//!
//! Byte 0 carries BFINAL in bit 0; the BTYPE bits are zero and the rest of the
//! byte is padding up to the byte boundary. NLEN is the one's complement of
//! LEN.

use oxigz_core::error::{GzError, Result};
use std::fmt;
use std::io::{self, Write};

/// Largest payload a stored block can carry (LEN is 16 bits).
pub const MAX_STORED_BLOCK: usize = 65535;

/// Size of the per-block header.
pub const BLOCK_HEADER_LEN: usize = 5;

/// Encode the 5-byte header of a stored block.
pub fn encode_block_header(len: u16, is_final: bool) -> [u8; BLOCK_HEADER_LEN] {
    let [len_lo, len_hi] = len.to_le_bytes();
    let [nlen_lo, nlen_hi] = (!len).to_le_bytes();
    [u8::from(is_final), len_lo, len_hi, nlen_lo, nlen_hi]
}

/// One stored block under construction.
///
/// The buffer is allocated once at its full size and never grows; the
/// header bytes at the front are patched when the block is sealed.
#[derive(Debug)]
pub struct BlockFrame {
    buf: Box<[u8]>,
    /// Write position; payload occupies `buf[BLOCK_HEADER_LEN..index]`.
    index: usize,
}

impl BlockFrame {
    /// Allocate an empty frame.
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; BLOCK_HEADER_LEN + MAX_STORED_BLOCK].into_boxed_slice(),
            index: BLOCK_HEADER_LEN,
        }
    }

    /// Payload bytes currently held.
    pub fn len(&self) -> usize {
        self.index - BLOCK_HEADER_LEN
    }

    /// Whether no payload is held.
    pub fn is_empty(&self) -> bool {
        self.index == BLOCK_HEADER_LEN
    }

    /// Whether the payload has reached [`MAX_STORED_BLOCK`].
    pub fn is_full(&self) -> bool {
        self.index == self.buf.len()
    }

    /// Copy as much of `data` as fits; returns the number of bytes taken.
    pub fn push(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.buf.len() - self.index);
        self.buf[self.index..self.index + n].copy_from_slice(&data[..n]);
        self.index += n;
        n
    }

    /// Write the header for the current payload and return the whole block.
    pub fn seal(&mut self, is_final: bool) -> &[u8] {
        // len() <= MAX_STORED_BLOCK by construction
        let header = encode_block_header(self.len() as u16, is_final);
        self.buf[..BLOCK_HEADER_LEN].copy_from_slice(&header);
        &self.buf[..self.index]
    }

    /// Drop the payload, keeping the allocation.
    pub fn clear(&mut self) {
        self.index = BLOCK_HEADER_LEN;
    }
}

impl Default for BlockFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a [`StoredWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Accepting data.
    Open,
    /// The final block has been written.
    Finished,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("writer is open"),
            Self::Finished => f.write_str("writer is finished"),
        }
    }
}

/// Streaming DEFLATE encoder that emits only stored blocks.
///
/// Input is collected in a single [`BlockFrame`]; a full frame is written
/// out as a non-final block before more input is accepted, so memory use is
/// bounded regardless of input size.
///
/// # Example
///
/// ```
/// use oxigz_deflate::StoredWriter;
/// use std::io::Write;
///
/// let mut writer = StoredWriter::new(Vec::new());
/// writer.write_all(b"abc").unwrap();
/// let out = writer.into_inner().unwrap();
/// assert_eq!(out, [0x01, 0x03, 0x00, 0xFC, 0xFF, b'a', b'b', b'c']);
/// ```
#[derive(Debug)]
pub struct StoredWriter<W: Write> {
    inner: W,
    frame: BlockFrame,
    state: WriterState,
    blocks_written: u64,
}

impl<W: Write> StoredWriter<W> {
    /// Create a writer over `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            frame: BlockFrame::new(),
            state: WriterState::Open,
            blocks_written: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Number of blocks emitted so far.
    pub fn blocks_written(&self) -> u64 {
        self.blocks_written
    }

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Append one byte.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_data(&[byte])
    }

    /// Append bytes, emitting non-final blocks whenever the frame fills.
    pub fn write_data(&mut self, mut data: &[u8]) -> Result<()> {
        self.ensure_open("write")?;
        while !data.is_empty() {
            if self.frame.is_full() {
                self.emit(false)?;
            }
            let taken = self.frame.push(data);
            data = &data[taken..];
        }
        Ok(())
    }

    /// Emit pending bytes as a non-final block (if any), then flush the sink.
    pub fn flush_pending(&mut self) -> Result<()> {
        self.ensure_open("flush")?;
        if !self.frame.is_empty() {
            self.emit(false)?;
        }
        self.inner.flush()?;
        Ok(())
    }

    /// Emit the final block, carrying whatever is pending (possibly nothing).
    ///
    /// A finished writer rejects every further write, flush or finish.
    pub fn finish(&mut self) -> Result<()> {
        self.ensure_open("finish")?;
        self.emit(true)?;
        self.state = WriterState::Finished;
        Ok(())
    }

    /// Finish if needed, flush, and release the sink.
    ///
    /// The sink is dropped whether or not finishing succeeds; the first error
    /// is returned.
    pub fn close(mut self) -> Result<()> {
        let finished = match self.state {
            WriterState::Open => self.finish(),
            WriterState::Finished => Ok(()),
        };
        let flushed = self.inner.flush().map_err(GzError::from);
        finished.and(flushed)
    }

    /// Finish if needed and return the sink.
    pub fn into_inner(mut self) -> Result<W> {
        if self.state == WriterState::Open {
            self.finish()?;
        }
        Ok(self.inner)
    }

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        match self.state {
            WriterState::Open => Ok(()),
            WriterState::Finished => Err(GzError::state(operation, self.state)),
        }
    }

    fn emit(&mut self, is_final: bool) -> Result<()> {
        let block = self.frame.seal(is_final);
        self.inner.write_all(block)?;
        self.frame.clear();
        self.blocks_written += 1;
        Ok(())
    }
}

impl<W: Write> Write for StoredWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_data(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending()?;
        Ok(())
    }
}

/// Encode `data` as a complete stored-block DEFLATE stream.
pub fn deflate_stored(data: &[u8]) -> Result<Vec<u8>> {
    let blocks = data.len().div_ceil(MAX_STORED_BLOCK).max(1);
    let mut writer = StoredWriter::new(Vec::with_capacity(data.len() + blocks * BLOCK_HEADER_LEN));
    writer.write_data(data)?;
    writer.into_inner()
}
