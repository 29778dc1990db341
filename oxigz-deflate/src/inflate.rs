//! Inflate backend built on `flate2`.
//!
//! [`Flate2Inflate`] satisfies the [`Inflate`] contract with
//! `flate2::bufread::DeflateDecoder`, which pulls input through
//! [`BufRead::fill_buf`] and only [`consume`](BufRead::consume)s what the
//! decoder used. When the final block ends, the bytes that follow it are
//! still in the source.

use flate2::bufread::DeflateDecoder;
use oxigz_core::error::Result;
use oxigz_core::traits::{Inflate, InflateStream};
use std::io::{self, BufRead, Read};

/// The default DEFLATE decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flate2Inflate;

impl Inflate for Flate2Inflate {
    type Stream<R: BufRead> = Flate2Stream<R>;

    fn attach<R: BufRead>(&self, source: R) -> Self::Stream<R> {
        Flate2Stream {
            decoder: DeflateDecoder::new(source),
        }
    }
}

/// Decompressed view of a raw DEFLATE source.
pub struct Flate2Stream<R> {
    decoder: DeflateDecoder<R>,
}

impl<R: BufRead> Flate2Stream<R> {
    /// Compressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.decoder.total_in()
    }

    /// Decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.decoder.total_out()
    }
}

impl<R: BufRead> Read for Flate2Stream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.decoder.read(buf)
    }
}

impl<R: BufRead> InflateStream<R> for Flate2Stream<R> {
    fn detach(self) -> R {
        self.decoder.into_inner()
    }
}

/// Decompress a complete raw DEFLATE buffer.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    Flate2Inflate.attach(data).read_to_end(&mut output)?;
    Ok(output)
}
