//! Auto-detection of NBT dialects and compression wrappers.
//!
//! Grounded in `NBTIO.cpp`'s `detectContentFormat`/`detectContentCompressionType`: dialects are
//! tried in a fixed precedence order and the first one whose bytes validate wins, and compression
//! wrappers are identified purely from their magic header bytes.
use crate::validator;
use crate::Dialect;

/// A compression wrapper recognized by [`detect_content_compression_type`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Compression {
    /// No recognized wrapper; the bytes are raw NBT (or something else entirely).
    None,
    /// gzip, magic bytes `1F 8B`.
    Gzip,
    /// zlib, magic byte `78` followed by a recognized flag byte.
    Zlib,
}

/// Detects which [`Dialect`] a byte buffer is encoded in, trying [`Dialect::PRECEDENCE`] in
/// order and returning the first dialect whose content validates.
///
/// When `strict_match_size` is set, a dialect only matches if it accounts for every byte in
/// `bytes`; this resolves most accidental collisions between dialects at the cost of rejecting
/// inputs that have trailing data the caller intends to ignore.
pub fn detect_content_format(bytes: &[u8], strict_match_size: bool) -> Option<Dialect> {
    Dialect::PRECEDENCE
        .into_iter()
        .find(|&dialect| validator::validate(bytes, dialect, strict_match_size))
}

/// Detects the compression wrapper (if any) a buffer is wrapped in, purely from its magic bytes.
pub fn detect_content_compression_type(bytes: &[u8]) -> Compression {
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        return Compression::Gzip;
    }
    if bytes.len() >= 2 && bytes[0] == 0x78 && matches!(bytes[1], 0x01 | 0x9C | 0xDA) {
        return Compression::Zlib;
    }
    Compression::None
}

/// Detects the dialect of a file on disk by reading it and delegating to
/// [`detect_content_format`], decompressing first if [`detect_file_compression_type`] recognizes
/// a wrapper.
pub fn detect_file_format(path: impl AsRef<std::path::Path>) -> std::io::Result<Option<Dialect>> {
    let bytes = std::fs::read(path)?;
    let bytes = match detect_content_compression_type(&bytes) {
        Compression::None => bytes,
        _ => crate::compression::decompress(&bytes).unwrap_or(bytes),
    };
    Ok(detect_content_format(&bytes, true))
}

/// Detects the compression wrapper of a file on disk.
pub fn detect_file_compression_type(
    path: impl AsRef<std::path::Path>,
) -> std::io::Result<Compression> {
    let bytes = std::fs::read(path)?;
    Ok(detect_content_compression_type(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;
    use crate::NBTTag;

    #[test]
    fn detects_every_dialect_in_precedence_order() {
        let nbt = NBTTag::Compound(tag::Compound::builder().with_byte("b", 1u8).build());
        for dialect in Dialect::PRECEDENCE {
            let bytes = dialect.encode(&nbt, None).unwrap();
            let detected = detect_content_format(&bytes, true).unwrap();
            assert_eq!(detected.decode(&bytes), Some(nbt.clone()));
        }
    }

    #[test]
    fn recognizes_compression_magic_bytes() {
        assert_eq!(
            detect_content_compression_type(&[0x1F, 0x8B, 0x08]),
            Compression::Gzip
        );
        assert_eq!(
            detect_content_compression_type(&[0x78, 0x9C, 0x00]),
            Compression::Zlib
        );
        assert_eq!(
            detect_content_compression_type(&[0x0A, 0x00]),
            Compression::None
        );
    }

    #[test]
    fn unrecognized_bytes_detect_nothing() {
        assert_eq!(detect_content_format(&[0xFF, 0xFF, 0xFF], true), None);
    }
}
