//! Length and CRC-32 accounting for decompressed output.
//!
//! [`CrcWriter`] sits between the decoder and the destination. It forwards
//! every byte untouched and keeps a [`Checksum`] of what the destination
//! accepted, which is what the gzip trailer is compared against.

use crate::crc::Crc32;
use std::io::{self, Write};

/// Accumulated length and CRC-32 of one decompression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checksum {
    /// Total bytes seen, modulo 2^64.
    pub length: u64,
    /// CRC-32 of those bytes.
    pub crc: u32,
}

impl Checksum {
    /// Low 32 bits of the length, the part the gzip ISIZE field records.
    pub fn length_low32(&self) -> u32 {
        self.length as u32
    }
}

/// A pass-through writer that tracks length and CRC-32.
///
/// Nothing is buffered: each call is forwarded to the inner sink and only the
/// bytes it reports as written are counted.
///
/// # Example
///
/// ```
/// use oxigz_core::CrcWriter;
/// use std::io::Write;
///
/// let mut writer = CrcWriter::new(Vec::new());
/// writer.write_all(b"123456789").unwrap();
/// assert_eq!(writer.crc(), 0xCBF43926);
/// assert_eq!(writer.length(), 9);
/// assert_eq!(writer.into_inner(), b"123456789");
/// ```
#[derive(Debug)]
pub struct CrcWriter<W> {
    inner: W,
    crc: Crc32,
    length: u64,
}

impl<W: Write> CrcWriter<W> {
    /// Wrap a sink with fresh accounting.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            crc: Crc32::new(),
            length: 0,
        }
    }

    /// Write a single byte.
    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.inner.write_all(&[byte])?;
        self.length = self.length.wrapping_add(1);
        self.crc.update_byte(byte);
        Ok(())
    }
}

impl<W> CrcWriter<W> {
    /// Number of bytes written so far, modulo 2^64.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// CRC-32 of the bytes written so far.
    pub fn crc(&self) -> u32 {
        self.crc.value()
    }

    /// Snapshot of the accumulated length and CRC.
    pub fn checksum(&self) -> Checksum {
        Checksum {
            length: self.length,
            crc: self.crc.value(),
        }
    }

    /// Get a reference to the wrapped sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap, returning the sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CrcWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.length = self.length.wrapping_add(n as u64);
        self.crc.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
