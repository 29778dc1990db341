//! # OxiGz Deflate
//!
//! The DEFLATE (RFC 1951) side of OxiGz.
//!
//! - **Encoding**: [`StoredWriter`] emits stored (uncompressed) blocks only.
//!   The output is a valid DEFLATE stream that any inflater accepts, at the
//!   cost of 5 bytes per 65535-byte block.
//! - **Decoding**: [`Flate2Inflate`] implements the
//!   [`Inflate`](oxigz_core::Inflate) contract on top of `flate2`, leaving
//!   the source positioned right after the compressed data.
//!
//! ## Example
//!
//! ```rust
//! use oxigz_deflate::{deflate_stored, inflate};
//!
//! let original = b"Hello, World! Hello, World!";
//! let encoded = deflate_stored(original).unwrap();
//! assert_eq!(encoded.len(), original.len() + 5);
//!
//! let decoded = inflate(&encoded).unwrap();
//! assert_eq!(&decoded, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod inflate;
pub mod stored;

// Re-exports
pub use inflate::{Flate2Inflate, Flate2Stream, inflate};
pub use stored::{
    BLOCK_HEADER_LEN, BlockFrame, MAX_STORED_BLOCK, StoredWriter, WriterState, deflate_stored,
    encode_block_header,
};
