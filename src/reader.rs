//! See [Reader].
use crate::err::{NBTError, PathPart, ReadError};
use std::io::Read;

/// A short notation for the result type used in the [Reader].
pub type Res<T> = Result<T, NBTError<ReadError>>;

/// A trait that can be implemented to alter how basic NBT types are read.
///
/// All the implemented methods must not panic.
pub trait Reader {
    /// Reads an 8-bit unsigned integer.
    fn u8(buf: &mut impl Read) -> Res<u8>;
    /// Reads a 16-bit signed integer.
    fn i16(buf: &mut impl Read) -> Res<i16>;
    /// Reads a 32-bit signed integer.
    fn i32(buf: &mut impl Read) -> Res<i32>;
    /// Reads a 64-bit signed integer.
    fn i64(buf: &mut impl Read) -> Res<i64>;
    /// Reads a 32-bit floating point number.
    fn f32(buf: &mut impl Read) -> Res<f32>;
    /// Reads a 64-bit floating point number.
    fn f64(buf: &mut impl Read) -> Res<f64>;
    /// Reads the length prefix of a string, in whatever width/encoding this dialect uses.
    fn string_len(buf: &mut impl Read) -> Res<usize>;
    /// Reads the length prefix of a sequence (list/array), in whatever width/encoding this
    /// dialect uses.
    fn seq_len(buf: &mut impl Read) -> Res<usize>;

    /// Reads the NBT `end` tag, which indicates the end of a compound tag.
    fn end(buf: &mut impl Read) -> Res<()> {
        let t = Self::u8(buf)?;
        if t != 0 {
            return Err(NBTError::new(ReadError::UnexpectedTag(0, t)));
        }
        Ok(())
    }

    /// Reads a variable-length string.
    ///
    /// If the bytes are not valid UTF-8 this returns [`ReadError::InvalidString`] carrying the raw
    /// bytes, rather than lossily repairing them; callers that accept non-UTF-8 strings (such as
    /// [`crate::tag::String`]'s [`crate::TagIo`] impl) fall back to keeping the raw bytes.
    fn string(buf: &mut impl Read) -> Res<String> {
        let len = Self::string_len(buf)?;
        let mut str_buf = vec![0u8; len];
        buf.read_exact(&mut str_buf)
            .map_err(|e| NBTError::new(ReadError::Io(e)))?;
        match std::string::String::from_utf8(str_buf) {
            Ok(str) => Ok(str),
            Err(e) => Err(NBTError::new(ReadError::InvalidString(e.into_bytes()))),
        }
    }

    /// Reads variable-length array of 8-bit unsigned integers.
    fn u8_vec(buf: &mut impl Read) -> Res<Vec<u8>> {
        let len = Self::seq_len(buf)?;
        let mut vec_buf = Vec::with_capacity(len.min(1 << 20));
        for i in 0..len {
            vec_buf.push(Self::u8(buf).map_err(|err| err.prepend(PathPart::Element(i)))?);
        }
        Ok(vec_buf)
    }

    /// Reads variable-length array of 32-bit signed integers.
    fn i32_vec(buf: &mut impl Read) -> Res<Vec<i32>> {
        let len = Self::seq_len(buf)?;
        let mut vec_buf = Vec::with_capacity(len.min(1 << 20));
        for i in 0..len {
            vec_buf.push(Self::i32(buf).map_err(|err| err.prepend(PathPart::Element(i)))?);
        }
        Ok(vec_buf)
    }

    /// Reads variable-length array of 64-bit signed integers.
    fn i64_vec(buf: &mut impl Read) -> Res<Vec<i64>> {
        let len = Self::seq_len(buf)?;
        let mut vec_buf = Vec::with_capacity(len.min(1 << 20));
        for i in 0..len {
            vec_buf.push(Self::i64(buf).map_err(|err| err.prepend(PathPart::Element(i)))?);
        }
        Ok(vec_buf)
    }
}
