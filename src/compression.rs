//! gzip/zlib wrapping for NBT payloads.
//!
//! Grounded in `CompressionUtils.cpp`: window bits 31 selects the gzip wrapper format, 15 selects
//! zlib, and decompression auto-detects the wrapper from the magic bytes before falling back to
//! treating the input as already-raw.
use crate::detect::Compression;

/// Compresses `bytes` with the given wrapper and level.
///
/// `level` follows zlib convention: `-1` is the implementation default, `0` is "store" (no
/// compression), and `1..=9` trade speed for ratio. [`Compression::None`] returns `bytes`
/// unchanged.
#[cfg(feature = "flate2")]
pub fn compress(bytes: &[u8], wrapper: Compression, level: i32) -> std::io::Result<Vec<u8>> {
    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression as Flate2Level;
    use std::io::Write;

    let level = if level < 0 {
        Flate2Level::default()
    } else {
        Flate2Level::new(level.clamp(0, 9) as u32)
    };

    match wrapper {
        Compression::None => Ok(bytes.to_vec()),
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), level);
            encoder.write_all(bytes)?;
            encoder.finish()
        }
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), level);
            encoder.write_all(bytes)?;
            encoder.finish()
        }
    }
}

/// Decompresses `bytes`, auto-detecting the wrapper from its magic header.
///
/// If no known wrapper is recognized, `bytes` is returned unchanged rather than treated as an
/// error, matching the reference implementation's fallback-to-original behavior.
#[cfg(feature = "flate2")]
pub fn decompress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::read::{GzDecoder, ZlibDecoder};
    use std::io::Read;

    match crate::detect::detect_content_compression_type(bytes) {
        Compression::Gzip => {
            let mut out = Vec::new();
            GzDecoder::new(bytes).read_to_end(&mut out)?;
            Ok(out)
        }
        Compression::Zlib => {
            let mut out = Vec::new();
            ZlibDecoder::new(bytes).read_to_end(&mut out)?;
            Ok(out)
        }
        Compression::None => Ok(bytes.to_vec()),
    }
}

/// Without the `flate2` feature, only [`Compression::None`] is supported; anything else fails.
#[cfg(not(feature = "flate2"))]
pub fn compress(bytes: &[u8], wrapper: Compression, _level: i32) -> std::io::Result<Vec<u8>> {
    match wrapper {
        Compression::None => Ok(bytes.to_vec()),
        _ => Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "compression support requires the `flate2` feature",
        )),
    }
}

/// Without the `flate2` feature, bytes are returned unchanged regardless of their wrapper.
#[cfg(not(feature = "flate2"))]
pub fn decompress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    Ok(bytes.to_vec())
}

#[cfg(all(test, feature = "flate2"))]
mod tests {
    use super::*;

    #[test]
    fn gzip_round_trip() {
        let data = b"hello nbt world".repeat(16);
        let compressed = compress(&data, Compression::Gzip, -1).unwrap();
        assert_eq!(
            crate::detect::detect_content_compression_type(&compressed),
            Compression::Gzip
        );
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn zlib_round_trip() {
        let data = b"hello nbt world".repeat(16);
        let compressed = compress(&data, Compression::Zlib, 6).unwrap();
        assert_eq!(
            crate::detect::detect_content_compression_type(&compressed),
            Compression::Zlib
        );
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn none_is_a_pass_through() {
        let data = b"raw".to_vec();
        assert_eq!(compress(&data, Compression::None, -1).unwrap(), data);
    }
}
