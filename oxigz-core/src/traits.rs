//! The decompressor contract used by the container layer.
//!
//! OxiGz does not decode DEFLATE itself. A container reader hands a positioned
//! [`BufRead`] source to an [`Inflate`] implementation, reads decompressed
//! bytes from the returned [`InflateStream`], and then calls
//! [`InflateStream::detach`] to get the source back. After `detach` the
//! source must be positioned one byte past the last compressed byte, so the
//! trailer can be read from the same cursor without seeking.

use std::io::{BufRead, Read};

/// A decompressed byte stream attached to a compressed source.
pub trait InflateStream<R>: Read {
    /// Stop decoding and return the source.
    ///
    /// Once the stream has returned end-of-data, the source is positioned
    /// exactly after the compressed payload. Bytes the decoder peeked at but
    /// did not use must still be readable from the source.
    fn detach(self) -> R;
}

/// Factory for [`InflateStream`]s.
pub trait Inflate {
    /// Stream type produced for a given source.
    type Stream<R: BufRead>: InflateStream<R>;

    /// Start decoding a raw DEFLATE stream from `source`.
    fn attach<R: BufRead>(&self, source: R) -> Self::Stream<R>;
}
