//! GZIP header and trailer parsing and writing.

use oxigz_core::error::{GzError, Result};
use std::fmt;
use std::io::{Read, Write};

/// GZIP magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// GZIP compression method: DEFLATE.
pub const CM_DEFLATE: u8 = 8;

/// GZIP header flags.
pub mod flags {
    /// Text file.
    pub const FTEXT: u8 = 0x01;
    /// Header CRC present.
    pub const FHCRC: u8 = 0x02;
    /// Extra field present.
    pub const FEXTRA: u8 = 0x04;
    /// Original filename present.
    pub const FNAME: u8 = 0x08;
    /// Comment present.
    pub const FCOMMENT: u8 = 0x10;
    /// Bits that must be zero.
    pub const RESERVED: u8 = 0xE0;
}

/// Operating system that produced the file (the OS header byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
    /// FAT filesystem (MS-DOS, OS/2, NT/Win32).
    Fat,
    /// Amiga.
    Amiga,
    /// VMS.
    Vms,
    /// Unix.
    Unix,
    /// VM/CMS.
    VmCms,
    /// Atari TOS.
    AtariTos,
    /// HPFS filesystem (OS/2, NT).
    Hpfs,
    /// Macintosh.
    Macintosh,
    /// Z-System.
    ZSystem,
    /// CP/M.
    CpM,
    /// TOPS-20.
    Tops20,
    /// NTFS filesystem (NT).
    Ntfs,
    /// QDOS.
    Qdos,
    /// Acorn RISCOS.
    AcornRiscos,
    /// Explicitly unknown (255).
    Unknown,
    /// Any other value.
    Unrecognized(u8),
}

impl OperatingSystem {
    /// Map the header byte.
    pub fn from_byte(value: u8) -> Self {
        match value {
            0 => Self::Fat,
            1 => Self::Amiga,
            2 => Self::Vms,
            3 => Self::Unix,
            4 => Self::VmCms,
            5 => Self::AtariTos,
            6 => Self::Hpfs,
            7 => Self::Macintosh,
            8 => Self::ZSystem,
            9 => Self::CpM,
            10 => Self::Tops20,
            11 => Self::Ntfs,
            12 => Self::Qdos,
            13 => Self::AcornRiscos,
            255 => Self::Unknown,
            other => Self::Unrecognized(other),
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fat => "FAT",
            Self::Amiga => "Amiga",
            Self::Vms => "VMS",
            Self::Unix => "Unix",
            Self::VmCms => "VM/CMS",
            Self::AtariTos => "Atari TOS",
            Self::Hpfs => "HPFS",
            Self::Macintosh => "Macintosh",
            Self::ZSystem => "Z-System",
            Self::CpM => "CP/M",
            Self::Tops20 => "TOPS-20",
            Self::Ntfs => "NTFS",
            Self::Qdos => "QDOS",
            Self::AcornRiscos => "Acorn RISCOS",
            Self::Unknown => "Unknown",
            Self::Unrecognized(_) => "Really unknown",
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compression-effort hint from the XFL byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraFlags {
    /// XFL = 2.
    MaximumCompression,
    /// XFL = 4.
    FastestCompression,
    /// Anything else.
    Unknown(u8),
}

impl ExtraFlags {
    /// Classify the XFL byte.
    pub fn from_byte(value: u8) -> Self {
        match value {
            2 => Self::MaximumCompression,
            4 => Self::FastestCompression,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for ExtraFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaximumCompression => f.write_str("Maximum compression"),
            Self::FastestCompression => f.write_str("Fastest compression"),
            Self::Unknown(n) => write!(f, "Unknown ({})", n),
        }
    }
}

/// GZIP member header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    /// Compression method (always 8 once parsed).
    pub method: u8,
    /// Flags.
    pub flags: u8,
    /// Modification time (Unix timestamp, 0 = not available).
    pub mtime: u32,
    /// Extra flags.
    pub xfl: u8,
    /// Operating system byte.
    pub os: u8,
    /// Extra field contents (if FEXTRA flag set).
    pub extra: Option<Vec<u8>>,
    /// Original filename (if FNAME flag set).
    pub filename: Option<String>,
    /// Comment (if FCOMMENT flag set).
    pub comment: Option<String>,
    /// Header CRC-16 (if FHCRC flag set). Stored as read, never checked.
    pub header_crc: Option<u16>,
}

impl Default for GzipHeader {
    fn default() -> Self {
        Self {
            method: CM_DEFLATE,
            flags: 0,
            mtime: 0,
            xfl: 0,
            os: 255,
            extra: None,
            filename: None,
            comment: None,
            header_crc: None,
        }
    }
}

impl GzipHeader {
    /// Create a new GZIP header with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a header with filename.
    pub fn with_filename(filename: &str) -> Self {
        Self {
            flags: flags::FNAME,
            filename: Some(filename.to_string()),
            ..Self::default()
        }
    }

    /// Whether the FTEXT flag is set.
    pub fn is_text(&self) -> bool {
        self.flags & flags::FTEXT != 0
    }

    /// Whether the FEXTRA flag is set.
    pub fn has_extra(&self) -> bool {
        self.flags & flags::FEXTRA != 0
    }

    /// Whether the FHCRC flag is set.
    pub fn has_header_crc(&self) -> bool {
        self.flags & flags::FHCRC != 0
    }

    /// Modification time, or `None` when the header records 0.
    pub fn modification_time(&self) -> Option<u32> {
        (self.mtime != 0).then_some(self.mtime)
    }

    /// Decoded operating system.
    pub fn operating_system(&self) -> OperatingSystem {
        OperatingSystem::from_byte(self.os)
    }

    /// Decoded extra flags.
    pub fn extra_flags(&self) -> ExtraFlags {
        ExtraFlags::from_byte(self.xfl)
    }

    /// Read a GZIP header from a reader.
    ///
    /// Validation order is magic, method, reserved flags. Optional fields
    /// are read in wire order: extra, name, header CRC, comment.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; 10];
        reader.read_exact(&mut buf)?;

        if buf[0..2] != GZIP_MAGIC {
            return Err(GzError::bad_magic([buf[0], buf[1]]));
        }

        let method = buf[2];
        if method != CM_DEFLATE {
            return Err(GzError::unsupported_method(method));
        }

        let flags = buf[3];
        if flags & flags::RESERVED != 0 {
            return Err(GzError::reserved_flags(flags));
        }

        let mtime = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let xfl = buf[8];
        let os = buf[9];

        let mut extra = None;
        let mut filename = None;
        let mut comment = None;
        let mut header_crc = None;

        if flags & flags::FEXTRA != 0 {
            let mut xlen_buf = [0u8; 2];
            reader.read_exact(&mut xlen_buf)?;
            let xlen = u16::from_le_bytes(xlen_buf) as usize;
            let mut data = vec![0u8; xlen];
            reader.read_exact(&mut data)?;
            extra = Some(data);
        }

        if flags & flags::FNAME != 0 {
            filename = Some(read_null_terminated(reader)?);
        }

        if flags & flags::FHCRC != 0 {
            let mut crc_buf = [0u8; 2];
            reader.read_exact(&mut crc_buf)?;
            header_crc = Some(u16::from_le_bytes(crc_buf));
        }

        if flags & flags::FCOMMENT != 0 {
            comment = Some(read_null_terminated(reader)?);
        }

        Ok(Self {
            method,
            flags,
            mtime,
            xfl,
            os,
            extra,
            filename,
            comment,
            header_crc,
        })
    }

    /// Write the header, emitting each optional field whose flag is set.
    ///
    /// A flag without a matching value writes an empty field (zero-length
    /// extra, empty string, zero CRC) so the output stays parseable.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&GZIP_MAGIC)?;
        writer.write_all(&[self.method, self.flags])?;
        writer.write_all(&self.mtime.to_le_bytes())?;
        writer.write_all(&[self.xfl, self.os])?;

        if self.flags & flags::FEXTRA != 0 {
            let extra = self.extra.as_deref().unwrap_or_default();
            let xlen = u16::try_from(extra.len()).map_err(|_| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "gzip extra field exceeds 65535 bytes",
                )
            })?;
            writer.write_all(&xlen.to_le_bytes())?;
            writer.write_all(extra)?;
        }

        if self.flags & flags::FNAME != 0 {
            writer.write_all(self.filename.as_deref().unwrap_or_default().as_bytes())?;
            writer.write_all(&[0])?;
        }

        if self.flags & flags::FHCRC != 0 {
            writer.write_all(&self.header_crc.unwrap_or(0).to_le_bytes())?;
        }

        if self.flags & flags::FCOMMENT != 0 {
            writer.write_all(self.comment.as_deref().unwrap_or_default().as_bytes())?;
            writer.write_all(&[0])?;
        }

        Ok(())
    }
}

/// Read a null-terminated string, decoding it as UTF-8 (lossy).
fn read_null_terminated<R: Read>(reader: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    let mut buf = [0u8; 1];

    loop {
        reader.read_exact(&mut buf)?;
        if buf[0] == 0 {
            break;
        }
        bytes.push(buf[0]);
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// GZIP member trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GzipFooter {
    /// CRC-32 of the uncompressed data.
    pub crc32: u32,
    /// Uncompressed length modulo 2^32.
    pub isize: u32,
}

impl GzipFooter {
    /// Trailer size in bytes.
    pub const SIZE: usize = 8;

    /// Read a trailer.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;
        Ok(Self {
            crc32: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            isize: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    /// Write a trailer.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.crc32.to_le_bytes())?;
        writer.write_all(&self.isize.to_le_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigz_core::ErrorKind;
    use std::io::Cursor;

    fn fixed(flags: u8) -> Vec<u8> {
        vec![0x1F, 0x8B, 0x08, flags, 0x78, 0x56, 0x34, 0x12, 0x02, 0x03]
    }

    #[test]
    fn test_gzip_magic() {
        assert_eq!(GZIP_MAGIC, [0x1F, 0x8B]);
    }

    #[test]
    fn test_read_minimal_header() {
        let header = GzipHeader::read(&mut Cursor::new(fixed(0))).unwrap();
        assert_eq!(header.method, CM_DEFLATE);
        assert_eq!(header.mtime, 0x12345678);
        assert_eq!(header.extra_flags(), ExtraFlags::MaximumCompression);
        assert_eq!(header.operating_system(), OperatingSystem::Unix);
        assert_eq!(header.filename, None);
        assert_eq!(header.header_crc, None);
    }

    #[test]
    fn test_read_all_optional_fields_in_order() {
        let mut data = fixed(flags::FTEXT | flags::FEXTRA | flags::FNAME | flags::FHCRC | flags::FCOMMENT);
        data.extend_from_slice(&[3, 0, b'x', b'y', b'z']);
        data.extend_from_slice(b"name.txt\0");
        data.extend_from_slice(&[0xCD, 0xAB]);
        data.extend_from_slice(b"a comment\0");
        data.push(0xEE); // first body byte

        let mut cursor = Cursor::new(data);
        let header = GzipHeader::read(&mut cursor).unwrap();
        assert!(header.is_text());
        assert_eq!(header.extra.as_deref(), Some(&b"xyz"[..]));
        assert_eq!(header.filename.as_deref(), Some("name.txt"));
        assert_eq!(header.header_crc, Some(0xABCD));
        assert_eq!(header.comment.as_deref(), Some("a comment"));
        assert_eq!(cursor.position(), 10 + 5 + 9 + 2 + 10);
    }

    #[test]
    fn test_bad_magic() {
        let mut data = fixed(0);
        data[0] = 0x50;
        data[1] = 0x4B;
        let err = GzipHeader::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, GzError::BadMagic { found: [0x50, 0x4B] }));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_unsupported_method() {
        let mut data = fixed(0);
        data[2] = 7;
        let err = GzipHeader::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, GzError::UnsupportedMethod { method: 7 }));
    }

    #[test]
    fn test_magic_checked_before_method() {
        let data = vec![0x00, 0x00, 0x07, 0xFF, 0, 0, 0, 0, 0, 0];
        let err = GzipHeader::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, GzError::BadMagic { .. }));
    }

    #[test]
    fn test_reserved_flags() {
        for bit in [0x20u8, 0x40, 0x80] {
            let err = GzipHeader::read(&mut Cursor::new(fixed(bit))).unwrap_err();
            assert!(matches!(err, GzError::ReservedFlagsSet { flags } if flags == bit));
        }
    }

    #[test]
    fn test_short_reads_are_io_errors() {
        let err = GzipHeader::read(&mut Cursor::new(vec![0x1F, 0x8B, 0x08])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        let mut data = fixed(flags::FEXTRA);
        data.extend_from_slice(&[10, 0, 1, 2]);
        let err = GzipHeader::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, GzError::Io(_)));

        let mut data = fixed(flags::FNAME);
        data.extend_from_slice(b"unterminated");
        let err = GzipHeader::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, GzError::Io(_)));
    }

    #[test]
    fn test_invalid_utf8_name_is_lossy() {
        let mut data = fixed(flags::FNAME);
        data.extend_from_slice(&[b'a', 0xFF, b'b', 0]);
        let header = GzipHeader::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(header.filename.as_deref(), Some("a\u{FFFD}b"));
    }

    #[test]
    fn test_write_read_preserves_fields() {
        let header = GzipHeader {
            flags: flags::FEXTRA | flags::FNAME | flags::FHCRC | flags::FCOMMENT,
            mtime: 1_700_000_000,
            xfl: 4,
            os: 11,
            extra: Some(vec![1, 2, 3, 4]),
            filename: Some("report.csv".to_string()),
            comment: Some("nightly".to_string()),
            header_crc: Some(0x1234),
            ..GzipHeader::default()
        };

        let mut bytes = Vec::new();
        header.write(&mut bytes).unwrap();
        let parsed = GzipHeader::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_with_filename() {
        let header = GzipHeader::with_filename("test.txt");
        assert_eq!(header.flags & flags::FNAME, flags::FNAME);
        assert_eq!(header.filename, Some("test.txt".to_string()));
        assert_eq!(header.modification_time(), None);
    }

    #[test]
    fn test_operating_system_names() {
        assert_eq!(OperatingSystem::from_byte(0).name(), "FAT");
        assert_eq!(OperatingSystem::from_byte(13).name(), "Acorn RISCOS");
        assert_eq!(OperatingSystem::from_byte(255), OperatingSystem::Unknown);
        assert_eq!(OperatingSystem::from_byte(42), OperatingSystem::Unrecognized(42));
        assert_eq!(OperatingSystem::from_byte(42).to_string(), "Really unknown");
    }

    #[test]
    fn test_extra_flags_display() {
        assert_eq!(ExtraFlags::from_byte(2).to_string(), "Maximum compression");
        assert_eq!(ExtraFlags::from_byte(4).to_string(), "Fastest compression");
        assert_eq!(ExtraFlags::from_byte(0).to_string(), "Unknown (0)");
    }

    #[test]
    fn test_footer_read() {
        let data = [0x26, 0x39, 0xF4, 0xCB, 0x09, 0x00, 0x00, 0x00];
        let footer = GzipFooter::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(
            footer,
            GzipFooter {
                crc32: 0xCBF43926,
                isize: 9
            }
        );

        let mut out = Vec::new();
        footer.write(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_footer_short_read() {
        let err = GzipFooter::read(&mut Cursor::new([0u8; 5])).unwrap_err();
        assert!(matches!(err, GzError::Io(_)));
    }
}
