//! # OxiGz Core
//!
//! Core components for the OxiGz gzip library.
//!
//! - [`crc`]: CRC-32 (ISO 3309)
//! - [`checksum`]: Length/CRC accounting writer for decompressed output
//! - [`source`]: Buffered seekable byte source with mark/reset
//! - [`traits`]: The contract an external DEFLATE decoder must satisfy
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ CLI          oxigz <input.gz> <output>                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Container    gzip header / trailer, GzipReader          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codec        stored-block writer, inflate backend       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Core (this)  CRC-32, CrcWriter, MarkableSource, errors  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxigz_core::crc::Crc32;
//! use oxigz_core::MarkableSource;
//! use std::io::Cursor;
//!
//! let crc = Crc32::compute(b"123456789");
//! assert_eq!(crc, 0xCBF43926);
//!
//! let mut source = MarkableSource::new(Cursor::new(vec![1, 2, 3])).unwrap();
//! source.mark();
//! assert_eq!(source.read_byte().unwrap(), Some(1));
//! source.reset().unwrap();
//! assert_eq!(source.read_byte().unwrap(), Some(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod checksum;
pub mod crc;
pub mod error;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use checksum::{Checksum, CrcWriter};
pub use crc::Crc32;
pub use error::{ErrorKind, GzError, Result};
pub use source::MarkableSource;
pub use traits::{Inflate, InflateStream};
