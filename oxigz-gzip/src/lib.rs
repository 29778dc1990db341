//! # OxiGz Gzip
//!
//! GZIP container format support (RFC 1952).
//!
//! - [`GzipReader`]: validates the header, drives an inflate backend over the
//!   same source, and checks the trailer against the decompressed output.
//! - [`GzipWriter`]: writes a single member whose body is stored blocks.
//! - [`decompress_file`] / [`decompress_file_with`]: file-to-file gunzip.
//!
//! Only single-member files are supported; data after the first trailer is
//! left unread.
//!
//! ## Example
//!
//! ```rust
//! use oxigz_gzip::{compress_stored, decompress};
//! use std::io::Cursor;
//!
//! let gz = compress_stored(b"Hello, World!").unwrap();
//! let data = decompress(&mut Cursor::new(gz)).unwrap();
//! assert_eq!(data, b"Hello, World!");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod header;
pub mod reader;
pub mod writer;

pub use header::{
    CM_DEFLATE, ExtraFlags, GZIP_MAGIC, GzipFooter, GzipHeader, OperatingSystem, flags,
};
pub use reader::{GzipReader, ReaderState};
pub use writer::{GzipWriter, compress_stored, compress_stored_with_header};

use oxigz_core::MarkableSource;
use oxigz_core::error::Result;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Decompress a single gzip member into memory.
pub fn decompress<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    GzipReader::new(reader).decompress(&mut output)?;
    Ok(output)
}

/// Outcome of [`decompress_file`].
#[derive(Debug, Clone)]
pub struct DecompressReport {
    /// Parsed header.
    pub header: GzipHeader,
    /// Verified trailer.
    pub footer: GzipFooter,
    /// Compressed body size in bytes.
    pub compressed_size: u64,
    /// Decompressed size in bytes.
    pub decompressed_size: u64,
    /// Time spent decompressing the body.
    pub elapsed: Duration,
}

/// Decompress the gzip file at `input` into a new file at `output`.
///
/// The output file is only created once the header has been validated. It
/// is closed on every path; when verification fails it is left in place
/// and the caller decides whether to remove it.
pub fn decompress_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<DecompressReport> {
    decompress_file_with(input, |_| Ok(BufWriter::new(File::create(output)?)))
}

/// Decompress the gzip file at `input` into the sink returned by
/// `open_output`.
///
/// `open_output` runs once, after the header has been validated and before
/// any body byte is read, so callers can report the header and choose how
/// the output is opened. The sink is dropped before the trailer is checked.
pub fn decompress_file_with<P, W, F>(input: P, open_output: F) -> Result<DecompressReport>
where
    P: AsRef<Path>,
    W: Write,
    F: FnOnce(&GzipHeader) -> Result<W>,
{
    let source = MarkableSource::open(input)?;
    let mut reader = GzipReader::new(source);
    let header = reader.read_header()?.clone();

    let mut out = open_output(&header)?;
    let start = Instant::now();
    reader.decompress_to(&mut out)?;
    let elapsed = start.elapsed();
    drop(out);
    let footer = reader.verify_footer()?;

    Ok(DecompressReport {
        header,
        footer,
        compressed_size: reader.compressed_size(),
        decompressed_size: reader.decompressed_size(),
        elapsed,
    })
}
