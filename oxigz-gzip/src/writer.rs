//! GZIP writer with a stored-block body.
//!
//! The member produced here is valid gzip that any decompressor accepts, but
//! it is never smaller than the input: the body is written with
//! [`StoredWriter`], so only framing is added.

use crate::header::{GzipFooter, GzipHeader};
use oxigz_core::checksum::CrcWriter;
use oxigz_core::error::Result;
use oxigz_deflate::StoredWriter;
use std::io::{self, Write};

/// Streaming gzip writer.
///
/// The header is written on construction. Uncompressed bytes go through a
/// [`CrcWriter`] into the stored-block encoder, and [`finish`](Self::finish)
/// appends the trailer from the tracked checksum.
pub struct GzipWriter<W: Write> {
    body: CrcWriter<StoredWriter<W>>,
}

impl<W: Write> GzipWriter<W> {
    /// Start a member with a default header.
    pub fn new(inner: W) -> Result<Self> {
        Self::with_header(inner, &GzipHeader::new())
    }

    /// Start a member with the given header.
    pub fn with_header(mut inner: W, header: &GzipHeader) -> Result<Self> {
        header.write(&mut inner)?;
        Ok(Self {
            body: CrcWriter::new(StoredWriter::new(inner)),
        })
    }

    /// Uncompressed bytes accepted so far.
    pub fn bytes_in(&self) -> u64 {
        self.body.length()
    }

    /// Write the final block and the trailer, returning the sink.
    pub fn finish(self) -> Result<W> {
        let checksum = self.body.checksum();
        let mut inner = self.body.into_inner().into_inner()?;
        GzipFooter {
            crc32: checksum.crc,
            isize: checksum.length_low32(),
        }
        .write(&mut inner)?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for GzipWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.body.flush()
    }
}

/// Wrap `data` in a single gzip member with stored blocks.
pub fn compress_stored(data: &[u8]) -> Result<Vec<u8>> {
    compress_stored_with_header(data, &GzipHeader::new())
}

/// Wrap `data` in a single gzip member with stored blocks and a custom header.
pub fn compress_stored_with_header(data: &[u8], header: &GzipHeader) -> Result<Vec<u8>> {
    let mut writer = GzipWriter::with_header(Vec::with_capacity(data.len() + 64), header)?;
    writer.write_all(data)?;
    writer.finish()
}
