//! See [Writer].
use std::io::Write;

use crate::err::{NBTError, PathPart, WriteError};

/// A short notation for the result type used in the [Writer].
pub type Res = Result<(), NBTError<WriteError>>;

/// A trait that can be implemented to alter how basic NBT types are written.
///
/// All the implemented methods must not panic.
pub trait Writer {
    /// Writes an 8-bit unsigned integer.
    fn write_u8(buf: &mut impl Write, x: u8) -> Res;
    /// Writes a 16-bit signed integer.
    fn write_i16(buf: &mut impl Write, x: i16) -> Res;
    /// Writes a 32-bit signed integer.
    fn write_i32(buf: &mut impl Write, x: i32) -> Res;
    /// Writes a 64-bit signed integer.
    fn write_i64(buf: &mut impl Write, x: i64) -> Res;
    /// Writes a 32-bit floating point number.
    fn write_f32(buf: &mut impl Write, x: f32) -> Res;
    /// Writes a 64-bit floating point number.
    fn write_f64(buf: &mut impl Write, x: f64) -> Res;
    /// Writes the length prefix of a string, in whatever width/encoding this dialect uses.
    fn write_string_len(buf: &mut impl Write, len: usize) -> Res;
    /// Writes the length prefix of a sequence (list/array), in whatever width/encoding this
    /// dialect uses.
    fn write_seq_len(buf: &mut impl Write, len: usize) -> Res;

    /// Writes the NBT `end` tag, which indicates the end of a compound tag.
    fn write_end(buf: &mut impl Write) -> Res {
        Self::write_u8(buf, 0)
    }

    /// Writes a variable-length string.
    fn write_string(buf: &mut impl Write, x: &str) -> Res {
        Self::write_string_bytes(buf, x.as_bytes())
    }

    /// Writes a variable-length string payload from raw bytes, without requiring UTF-8 validity.
    fn write_string_bytes(buf: &mut impl Write, bytes: &[u8]) -> Res {
        Self::write_string_len(buf, bytes.len())?;
        for (i, b) in bytes.iter().enumerate() {
            Self::write_u8(buf, *b).map_err(|err| err.prepend(PathPart::Element(i)))?;
        }
        Ok(())
    }

    /// Writes variable-length array of 8-bit unsigned integers.
    fn write_u8_vec(buf: &mut impl Write, x: &[u8]) -> Res {
        Self::write_seq_len(buf, x.len())?;
        for (i, v) in x.iter().enumerate() {
            Self::write_u8(buf, *v).map_err(|err| err.prepend(PathPart::Element(i)))?;
        }
        Ok(())
    }

    /// Writes variable-length array of 32-bit signed integers.
    fn write_i32_vec(buf: &mut impl Write, x: &[i32]) -> Res {
        Self::write_seq_len(buf, x.len())?;
        for (i, v) in x.iter().enumerate() {
            Self::write_i32(buf, *v).map_err(|err| err.prepend(PathPart::Element(i)))?;
        }
        Ok(())
    }

    /// Writes variable-length array of 64-bit signed integers.
    fn write_i64_vec(buf: &mut impl Write, x: &[i64]) -> Res {
        Self::write_seq_len(buf, x.len())?;
        for (i, v) in x.iter().enumerate() {
            Self::write_i64(buf, *v).map_err(|err| err.prepend(PathPart::Element(i)))?;
        }
        Ok(())
    }
}

/// Helper shared by the write-side length checks: every fixed-width dialect caps both string and
/// sequence lengths to what an `i32` (or, for strings, `i16`) prefix can represent.
pub(crate) fn checked_len(max: usize, len: usize) -> Result<(), NBTError<WriteError>> {
    if len > max {
        return Err(NBTError::new(WriteError::SeqLengthViolation(max, len)));
    }
    Ok(())
}
