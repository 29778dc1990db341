//! Single-member GZIP reader.
//!
//! The reader walks one member in three explicit steps, each of which is
//! only valid in its own state:
//!
//! ```text
//! ExpectHeader --read_header--> ExpectBody --decompress_to--> ExpectFooter
//!     --verify_footer--> Done
//! ```
//!
//! Any error, including calling a step out of order, moves the reader to
//! `Failed`, from which nothing further is accepted.

use crate::header::{GzipFooter, GzipHeader};
use oxigz_core::checksum::{Checksum, CrcWriter};
use oxigz_core::error::{GzError, Result};
use oxigz_core::traits::{Inflate, InflateStream};
use oxigz_deflate::Flate2Inflate;
use std::fmt;
use std::io::{self, BufRead, Read, Write};

/// Size of the buffer used to move decompressed data to the sink.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Position of a [`GzipReader`] in the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Nothing read yet.
    ExpectHeader,
    /// Header parsed; positioned at the compressed data.
    ExpectBody,
    /// Body decompressed; positioned at the trailer.
    ExpectFooter,
    /// Trailer verified.
    Done,
    /// A previous step failed.
    Failed,
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ExpectHeader => "header not read yet",
            Self::ExpectBody => "body not decompressed yet",
            Self::ExpectFooter => "footer not verified yet",
            Self::Done => "member already complete",
            Self::Failed => "reader has failed",
        };
        f.write_str(text)
    }
}

/// GZIP reader over a buffered source.
///
/// The DEFLATE body is decoded by an [`Inflate`] implementation (by default
/// [`Flate2Inflate`]) reading from the same source, which is then handed back
/// so the trailer is read from where the body ended.
///
/// # Example
///
/// ```
/// use oxigz_gzip::{GzipReader, compress_stored};
/// use std::io::Cursor;
///
/// let gz = compress_stored(b"hello").unwrap();
/// let mut reader = GzipReader::new(Cursor::new(gz));
/// reader.read_header().unwrap();
///
/// let mut out = Vec::new();
/// reader.decompress_to(&mut out).unwrap();
/// let footer = reader.verify_footer().unwrap();
/// assert_eq!(out, b"hello");
/// assert_eq!(footer.isize, 5);
/// ```
pub struct GzipReader<R, I = Flate2Inflate> {
    source: R,
    inflate: I,
    state: ReaderState,
    header: Option<GzipHeader>,
    checksum: Option<Checksum>,
    compressed_size: u64,
    decompressed_size: u64,
}

impl<R: BufRead> GzipReader<R, Flate2Inflate> {
    /// Create a reader using the default inflate backend.
    pub fn new(source: R) -> Self {
        Self::with_inflate(source, Flate2Inflate)
    }
}

impl<R: BufRead, I: Inflate> GzipReader<R, I> {
    /// Create a reader with a specific inflate backend.
    pub fn with_inflate(source: R, inflate: I) -> Self {
        Self {
            source,
            inflate,
            state: ReaderState::ExpectHeader,
            header: None,
            checksum: None,
            compressed_size: 0,
            decompressed_size: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// The parsed header, once [`read_header`](Self::read_header) succeeded.
    pub fn header(&self) -> Option<&GzipHeader> {
        self.header.as_ref()
    }

    /// Compressed bytes consumed by the body.
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// Decompressed bytes written to the sink.
    pub fn decompressed_size(&self) -> u64 {
        self.decompressed_size
    }

    /// Parse and validate the header.
    pub fn read_header(&mut self) -> Result<&GzipHeader> {
        self.expect(ReaderState::ExpectHeader, "read header")?;
        let result = GzipHeader::read(&mut self.source);
        let header = self.track(result)?;
        self.state = ReaderState::ExpectBody;
        Ok(self.header.insert(header))
    }

    /// Decompress the body into `sink`, returning the number of bytes
    /// written. The sink is flushed before returning.
    pub fn decompress_to<W: Write>(&mut self, sink: &mut W) -> Result<u64> {
        self.expect(ReaderState::ExpectBody, "decompress")?;
        let result = self.copy_body(sink);
        let checksum = self.track(result)?;
        self.checksum = Some(checksum);
        self.decompressed_size = checksum.length;
        self.state = ReaderState::ExpectFooter;
        Ok(checksum.length)
    }

    /// Read the trailer and compare it with what was decompressed.
    ///
    /// The CRC is checked first; the size is only compared when the CRC
    /// matches.
    pub fn verify_footer(&mut self) -> Result<GzipFooter> {
        self.expect(ReaderState::ExpectFooter, "verify footer")?;
        let result = self.check_footer();
        let footer = self.track(result)?;
        self.state = ReaderState::Done;
        Ok(footer)
    }

    /// Run every remaining step, returning the verified trailer.
    pub fn decompress<W: Write>(&mut self, sink: &mut W) -> Result<GzipFooter> {
        if self.state == ReaderState::ExpectHeader {
            self.read_header()?;
        }
        self.decompress_to(sink)?;
        self.verify_footer()
    }

    /// Unwrap, returning the source.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn expect(&mut self, expected: ReaderState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            return Ok(());
        }
        let err = GzError::state(operation, self.state);
        self.state = ReaderState::Failed;
        Err(err)
    }

    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.state = ReaderState::Failed;
        }
        result
    }

    fn copy_body<W: Write>(&mut self, sink: &mut W) -> Result<Checksum> {
        let mut output = CrcWriter::new(sink);
        let mut stream = self.inflate.attach(Counted::new(&mut self.source));
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];

        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            output.write_all(&buf[..n])?;
        }
        output.flush()?;

        self.compressed_size = stream.detach().consumed;
        Ok(output.checksum())
    }

    fn check_footer(&mut self) -> Result<GzipFooter> {
        let checksum = self
            .checksum
            .take()
            .ok_or_else(|| GzError::state("verify footer", "no checksum recorded"))?;
        let footer = GzipFooter::read(&mut self.source)?;

        if footer.crc32 != checksum.crc {
            return Err(GzError::crc_mismatch(footer.crc32, checksum.crc));
        }
        if footer.isize != checksum.length_low32() {
            return Err(GzError::size_mismatch(
                footer.isize,
                checksum.length_low32(),
            ));
        }
        Ok(footer)
    }
}

/// Counts the bytes a decoder consumes from the source.
struct Counted<R> {
    inner: R,
    consumed: u64,
}

impl<R> Counted<R> {
    fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }
}

impl<R: BufRead> Read for Counted<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed += n as u64;
        Ok(n)
    }
}

impl<R: BufRead> BufRead for Counted<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amount: usize) {
        self.inner.consume(amount);
        self.consumed += amount as u64;
    }
}
