//! File-level tests for the gzip reader.

use flate2::Compression;
use flate2::write::GzEncoder;
use oxigz_core::{ErrorKind, GzError, MarkableSource};
use oxigz_gzip::{
    GzipHeader, GzipReader, ReaderState, compress_stored, compress_stored_with_header,
    decompress_file, decompress_file_with, flags,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("oxigz_it_{}_{}", std::process::id(), name))
}

fn write_temp(name: &str, contents: &[u8]) -> PathBuf {
    let path = temp_path(name);
    let mut file = File::create(&path).expect("Failed to create temp file");
    file.write_all(contents).expect("Failed to write temp file");
    path
}

fn sample(len: usize) -> Vec<u8> {
    let mut seed: u32 = 0x9E3779B9;
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed as u8
        })
        .collect()
}

#[test]
fn test_decompress_stored_file() {
    let data = sample(300_000);
    let input = write_temp("stored.gz", &compress_stored(&data).unwrap());
    let output = temp_path("stored.out");

    let report = decompress_file(&input, &output).unwrap();
    assert_eq!(fs::read(&output).unwrap(), data);
    assert_eq!(report.decompressed_size, data.len() as u64);
    assert_eq!(report.footer.isize, data.len() as u32);
    // 5 stored blocks of framing
    assert_eq!(report.compressed_size, data.len() as u64 + 5 * 5);

    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output);
}

#[test]
fn test_decompress_huffman_file_from_flate2() {
    let text = b"It was the best of times, it was the worst of times. ".repeat(500);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&text).unwrap();
    let input = write_temp("huffman.gz", &encoder.finish().unwrap());
    let output = temp_path("huffman.out");

    let report = decompress_file(&input, &output).unwrap();
    assert_eq!(fs::read(&output).unwrap(), text);
    assert!(report.compressed_size < text.len() as u64 / 10);

    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output);
}

#[test]
fn test_header_fields_survive() {
    let header = GzipHeader {
        flags: flags::FTEXT | flags::FEXTRA | flags::FNAME | flags::FHCRC | flags::FCOMMENT,
        mtime: 1_234_567_890,
        xfl: 2,
        os: 3,
        extra: Some(b"AP\x02\x00hi".to_vec()),
        filename: Some("notes.txt".to_string()),
        comment: Some("kept for the record".to_string()),
        header_crc: Some(0xBEEF),
        ..GzipHeader::default()
    };
    let gz = compress_stored_with_header(b"body", &header).unwrap();
    let input = write_temp("fields.gz", &gz);
    let output = temp_path("fields.out");

    let report = decompress_file(&input, &output).unwrap();
    assert_eq!(report.header, header);
    assert_eq!(report.header.modification_time(), Some(1_234_567_890));
    assert_eq!(fs::read(&output).unwrap(), b"body");

    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output);
}

#[test]
fn test_crc_failure_still_closes_output() {
    let mut gz = compress_stored(b"will be corrupted").unwrap();
    let n = gz.len();
    gz[n - 8] ^= 0xFF;
    let input = write_temp("badcrc.gz", &gz);
    let output = temp_path("badcrc.out");

    let err = decompress_file(&input, &output).unwrap_err();
    assert!(matches!(err, GzError::CrcMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::Integrity);
    // output exists and is complete; removal is the caller's choice
    assert_eq!(fs::read(&output).unwrap(), b"will be corrupted");
    fs::remove_file(&output).unwrap();

    let _ = fs::remove_file(&input);
}

#[test]
fn test_bad_magic_does_not_create_output() {
    let input = write_temp("notgzip.gz", b"PK\x03\x04 definitely a zip");
    let output = temp_path("notgzip.out");
    let _ = fs::remove_file(&output);

    let err = decompress_file(&input, &output).unwrap_err();
    assert!(matches!(err, GzError::BadMagic { found: [b'P', b'K'] }));
    assert!(!output.exists());

    let _ = fs::remove_file(&input);
}

#[test]
fn test_output_opened_after_header() {
    let header = GzipHeader::with_filename("opened.txt");
    let input = write_temp("opener.gz", &compress_stored_with_header(b"payload", &header).unwrap());

    let mut seen = None;
    let report = decompress_file_with(&input, |parsed| {
        seen = Some(parsed.clone());
        Ok(Vec::<u8>::new())
    })
    .unwrap();
    assert_eq!(seen.as_ref(), Some(&header));
    assert_eq!(report.decompressed_size, 7);

    let _ = fs::remove_file(&input);
}

#[test]
fn test_output_not_opened_on_bad_header() {
    let input = write_temp("opener_bad.gz", b"\x1f\x8b\x07\x00\x00\x00\x00\x00\x00\xff");

    let mut opened = false;
    let err = decompress_file_with(&input, |_| {
        opened = true;
        Ok(Vec::<u8>::new())
    })
    .unwrap_err();
    assert!(matches!(err, GzError::UnsupportedMethod { method: 7 }));
    assert!(!opened);

    let _ = fs::remove_file(&input);
}

#[test]
fn test_missing_input_is_io_error() {
    let err = decompress_file(temp_path("does_not_exist.gz"), temp_path("never.out")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_only_first_member_is_read() {
    let mut gz = compress_stored(b"first").unwrap();
    let first_len = gz.len() as u64;
    gz.extend_from_slice(&compress_stored(b"second").unwrap());
    let input = write_temp("multi.gz", &gz);

    let mut reader = GzipReader::new(MarkableSource::open(&input).unwrap());
    let mut out = Vec::new();
    reader.decompress(&mut out).unwrap();
    assert_eq!(out, b"first");
    assert_eq!(reader.state(), ReaderState::Done);
    assert_eq!(reader.into_inner().position(), first_len);

    let _ = fs::remove_file(&input);
}

#[test]
fn test_mark_reset_rereads_header() {
    let gz = compress_stored(b"mark me").unwrap();
    let input = write_temp("mark.gz", &gz);

    let mut source = MarkableSource::open(&input).unwrap();
    source.mark();
    let first = GzipHeader::read(&mut source).unwrap();
    source.reset().unwrap();
    assert_eq!(source.position(), 0);

    let mut reader = GzipReader::new(&mut source);
    assert_eq!(reader.read_header().unwrap(), &first);
    let mut out = Vec::new();
    reader.decompress_to(&mut out).unwrap();
    reader.verify_footer().unwrap();
    assert_eq!(out, b"mark me");

    let _ = fs::remove_file(&input);
}
