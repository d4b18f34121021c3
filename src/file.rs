//! File and base64 convenience wrappers around the binary codec, compression, and SNBT layers.
//!
//! Grounded in the original's `NBTIO.hpp`/`NBTIO.cpp`: these functions add no new core semantics,
//! they just compose [`Dialect`], [`crate::compression`], [`crate::detect`], and [`crate::snbt`]
//! the way a caller loading or saving a document on disk would.
use std::path::Path;

use crate::detect::Compression;
use crate::err::{NBTError, WriteError};
use crate::snbt::SnbtFormat;
use crate::{compression, detect, snbt, Dialect, NBTTag};

#[cfg(feature = "mmap")]
fn read_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = std::fs::File::open(path)?;
    // SAFETY: the mapping is read entirely and dropped before this function returns; the file is
    // not expected to be truncated by another process during that window.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    Ok(mmap.to_vec())
}

#[cfg(not(feature = "mmap"))]
fn read_file(path: &Path) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}

fn create_parent_dirs(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Decompresses (if wrapped), detects the dialect, and decodes `bytes` into a root tag.
///
/// Returns `None` if no known compression wrapper's decompression succeeds for content that
/// looked wrapped, or if no dialect in [`Dialect::PRECEDENCE`] validates the (possibly
/// decompressed) bytes.
pub fn parse_from_content(bytes: &[u8]) -> Option<NBTTag> {
    let bytes = match detect::detect_content_compression_type(bytes) {
        Compression::None => bytes.to_vec(),
        _ => compression::decompress(bytes).ok()?,
    };
    let dialect = detect::detect_content_format(&bytes, true)?;
    dialect.decode(&bytes)
}

/// Reads a file from disk and delegates to [`parse_from_content`].
pub fn parse_from_file(path: impl AsRef<Path>) -> Option<NBTTag> {
    let bytes = read_file(path.as_ref()).ok()?;
    parse_from_content(&bytes)
}

/// Encodes `tag` with `dialect`, then wraps the result with `wrapper` at the given `level`.
///
/// `storage_version` is only meaningful for the two header-bearing dialects. Passing `None`
/// there falls back to a `"StorageVersion"` Int child of `tag` if present, then to 0.
pub fn save_as_binary(
    tag: &NBTTag,
    dialect: Dialect,
    storage_version: Option<i32>,
    wrapper: Compression,
    level: i32,
) -> Result<Vec<u8>, NBTError<WriteError>> {
    let payload = dialect.encode(tag, storage_version)?;
    Ok(compression::compress(&payload, wrapper, level)
        .expect("compressing an in-memory buffer cannot fail"))
}

/// [`save_as_binary`], then creates any missing parent directories and writes the result to
/// `path`.
pub fn save_to_file(
    path: impl AsRef<Path>,
    tag: &NBTTag,
    dialect: Dialect,
    storage_version: Option<i32>,
    wrapper: Compression,
    level: i32,
) -> std::io::Result<()> {
    let bytes = save_as_binary(tag, dialect, storage_version, wrapper, level)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let path = path.as_ref();
    create_parent_dirs(path)?;
    std::fs::write(path, bytes)
}

/// Parses an SNBT document, returning `None` on any syntax error.
pub fn parse_snbt_from_content(text: &str) -> Option<NBTTag> {
    snbt::parse(text).ok()
}

/// Reads a file from disk as UTF-8 text and delegates to [`parse_snbt_from_content`].
pub fn parse_snbt_from_file(path: impl AsRef<Path>) -> Option<NBTTag> {
    let text = std::fs::read_to_string(path).ok()?;
    parse_snbt_from_content(&text)
}

/// Emits `tag` as SNBT text and writes it to `path`, creating missing parent directories first.
pub fn save_snbt_to_file(
    path: impl AsRef<Path>,
    tag: &NBTTag,
    format: SnbtFormat,
    indent: usize,
) -> std::io::Result<()> {
    let text = snbt::to_snbt(tag, format, indent);
    let path = path.as_ref();
    create_parent_dirs(path)?;
    std::fs::write(path, text)
}

/// Decodes `text` as standard base64, then delegates to [`parse_from_content`].
pub fn parse_from_base64(text: &str) -> Option<NBTTag> {
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(text.trim())
        .ok()?;
    parse_from_content(&bytes)
}

/// [`save_as_binary`], then encodes the result as standard base64.
pub fn save_as_base64(
    tag: &NBTTag,
    dialect: Dialect,
    storage_version: Option<i32>,
    wrapper: Compression,
    level: i32,
) -> Result<String, NBTError<WriteError>> {
    use base64::Engine;
    let bytes = save_as_binary(tag, dialect, storage_version, wrapper, level)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Peeks the `storage_version` header field of a header-bearing dialect without decoding the
/// payload that follows it.
///
/// Returns `None` for a dialect without a header, or if `bytes` is shorter than the header.
pub fn read_header_version(bytes: &[u8], dialect: Dialect) -> Option<i32> {
    if bytes.len() < 4 {
        return None;
    }
    let field: [u8; 4] = bytes[0..4].try_into().ok()?;
    match dialect {
        Dialect::LittleEndianWithHeader => Some(i32::from_le_bytes(field)),
        Dialect::BigEndianWithHeader => Some(i32::from_be_bytes(field)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;

    #[test]
    fn binary_round_trip_through_content() {
        let nbt = NBTTag::Compound(tag::Compound::builder().with_int("x", 258).build());
        let bytes = save_as_binary(&nbt, Dialect::BigEndian, None, Compression::None, -1).unwrap();
        assert_eq!(parse_from_content(&bytes), Some(nbt));
    }

    #[test]
    fn gzip_wrapped_content_round_trips() {
        let nbt = NBTTag::Compound(tag::Compound::builder().with_byte("b", 1u8).build());
        let bytes =
            save_as_binary(&nbt, Dialect::LittleEndian, None, Compression::Gzip, -1).unwrap();
        assert_eq!(parse_from_content(&bytes), Some(nbt));
    }

    #[test]
    fn base64_round_trip() {
        let nbt = NBTTag::Compound(tag::Compound::builder().with_byte("b", 1u8).build());
        let text =
            save_as_base64(&nbt, Dialect::LittleEndian, None, Compression::None, -1).unwrap();
        assert_eq!(parse_from_base64(&text), Some(nbt));
    }

    #[test]
    fn snbt_content_round_trip() {
        let nbt = parse_snbt_from_content("{a: 1b}").unwrap();
        assert_eq!(
            nbt,
            NBTTag::Compound(tag::Compound::builder().with_byte("a", 1u8).build())
        );
    }

    #[test]
    fn header_version_is_read_without_decoding_payload() {
        let nbt = NBTTag::Compound(tag::Compound::default());
        let bytes = Dialect::LittleEndianWithHeader.encode(&nbt, Some(7)).unwrap();
        assert_eq!(read_header_version(&bytes, Dialect::LittleEndianWithHeader), Some(7));
        assert_eq!(read_header_version(&bytes, Dialect::BigEndian), None);
    }
}
