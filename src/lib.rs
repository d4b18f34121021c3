#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use writer::Writer;

use crate::err::{NBTError, Path, PathPart, ReadError, WriteError};
use crate::reader::Reader;

pub mod compression;
pub mod detect;
pub mod encoding;
pub mod err;
mod file;
mod hash;
mod r#impl;
mod io;
pub mod reader;
#[cfg(feature = "serde")]
pub mod serde;
pub mod snbt;
pub mod tag;
pub mod validator;
pub mod view;
pub mod writer;

pub use detect::{detect_content_compression_type, detect_content_format, Compression};
pub use file::{
    parse_from_base64, parse_from_content, parse_from_file, parse_snbt_from_content,
    parse_snbt_from_file, read_header_version, save_as_base64, save_as_binary, save_snbt_to_file,
    save_to_file,
};
pub use hash::hash_tag;
pub use view::View;

/// An enum representing all possible NBT data.
#[derive(Debug, Clone, PartialEq)]
pub enum NBTTag {
    /// An 8-bit unsigned integer.
    Byte(tag::Byte),
    /// A 16-bit signed integer.
    Short(tag::Short),
    /// A 32-bit signed integer.
    Int(tag::Int),
    /// A 64-bit signed integer.
    Long(tag::Long),
    /// A 32-bit floating point number.
    Float(tag::Float),
    /// A 64-bit floating point number.
    Double(tag::Double),
    /// A string of characters.
    ///
    /// Should never be larger than [i16::MAX].
    String(tag::String),
    /// A map containing zero or more key-value pairs.
    ///
    /// Each key maps to exactly one [NBTTag] of any type.
    Compound(tag::Compound),
    /// A variable-length list of [NBTTag]s of the same type.
    ///
    /// Lists will fail to encode/decode should it contain values of which the type does not match
    /// the type of the first element in the list.
    List(tag::List),
    /// A variable-length array containing 8-bit unsigned integers.
    ByteArray(tag::ByteArray),
    /// A variable-length array containing 32-bit signed integers.
    IntArray(tag::IntArray),
    /// A variable-length array containing 64-bit signed integers.
    LongArray(tag::LongArray),
    /// The absent/null value.
    ///
    /// Never appears as a named member of a well-formed [`tag::Compound`] on the wire (a type byte
    /// of 0 there means the compound has ended), but is a legal SNBT value (the `null` keyword)
    /// and the value [`View::is_null`] reports true for.
    End,
}

/// An enum representing all possible NBT tag types.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum NBTTagType {
    End,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Compound,
    IntArray,
    LongArray,
}

impl NBTTagType {
    /// The stable numeric wire code for this tag kind.
    pub fn id(self) -> u8 {
        match self {
            NBTTagType::End => 0,
            NBTTagType::Byte => 1,
            NBTTagType::Short => 2,
            NBTTagType::Int => 3,
            NBTTagType::Long => 4,
            NBTTagType::Float => 5,
            NBTTagType::Double => 6,
            NBTTagType::ByteArray => 7,
            NBTTagType::String => 8,
            NBTTagType::List => 9,
            NBTTagType::Compound => 10,
            NBTTagType::IntArray => 11,
            NBTTagType::LongArray => 12,
        }
    }

    /// Looks up the tag kind for a wire code, if it names one of the 13 known kinds.
    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            0 => NBTTagType::End,
            1 => NBTTagType::Byte,
            2 => NBTTagType::Short,
            3 => NBTTagType::Int,
            4 => NBTTagType::Long,
            5 => NBTTagType::Float,
            6 => NBTTagType::Double,
            7 => NBTTagType::ByteArray,
            8 => NBTTagType::String,
            9 => NBTTagType::List,
            10 => NBTTagType::Compound,
            11 => NBTTagType::IntArray,
            12 => NBTTagType::LongArray,
            _ => return None,
        })
    }
}

impl std::fmt::Display for NBTTagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NBTTagType::End => "End",
            NBTTagType::Byte => "Byte",
            NBTTagType::Short => "Short",
            NBTTagType::Int => "Int",
            NBTTagType::Long => "Long",
            NBTTagType::Float => "Float",
            NBTTagType::Double => "Double",
            NBTTagType::ByteArray => "ByteArray",
            NBTTagType::String => "String",
            NBTTagType::List => "List",
            NBTTagType::Compound => "Compound",
            NBTTagType::IntArray => "IntArray",
            NBTTagType::LongArray => "LongArray",
        };
        f.write_str(name)
    }
}

/// One of the five on-wire binary dialects.
///
/// The two header-bearing variants add an 8-byte `storage_version` + `payload_length` frame in
/// front of the same little/big-endian payload; they do not change how tag payloads are encoded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Dialect {
    /// Little-endian, no header. Used by Bedrock Edition world saves.
    LittleEndian,
    /// Little-endian, with the 8-byte `storage_version`/`payload_length` header.
    LittleEndianWithHeader,
    /// Big-endian, no header. Used by Java Edition.
    BigEndian,
    /// Big-endian, with the 8-byte header.
    BigEndianWithHeader,
    /// Varint-heavy dialect used on the Bedrock protocol wire.
    Network,
}

impl Dialect {
    /// The fixed precedence order [`crate::detect_content_format`] tries dialects in.
    pub const PRECEDENCE: [Dialect; 5] = [
        Dialect::LittleEndianWithHeader,
        Dialect::LittleEndian,
        Dialect::BigEndianWithHeader,
        Dialect::BigEndian,
        Dialect::Network,
    ];

    /// Whether this dialect places an 8-byte header before the payload.
    pub fn has_header(self) -> bool {
        matches!(
            self,
            Dialect::LittleEndianWithHeader | Dialect::BigEndianWithHeader
        )
    }

    /// Decodes a root [NBTTag] from `bytes` using this dialect, returning `None` if the top-level
    /// framing could not be read at all (unknown root type, or an `Err` partway through the
    /// header).
    ///
    /// A short read inside the payload does not itself fail here: it sets the sticky overflow
    /// flag on the underlying reader's error path and produces a best-effort (possibly
    /// incomplete) tree. Use [`crate::validator`] to confirm a byte sequence is fully
    /// well-formed before trusting the result of this call.
    pub fn decode(self, bytes: &[u8]) -> Option<NBTTag> {
        let mut cursor = Cursor::new(bytes);
        if self.has_header() {
            let mut header = [0u8; 8];
            cursor.read_exact(&mut header).ok()?;
        }
        match self {
            Dialect::LittleEndian | Dialect::LittleEndianWithHeader => {
                NBTTag::read::<encoding::LittleEndian>(&mut cursor).ok()
            }
            Dialect::BigEndian | Dialect::BigEndianWithHeader => {
                NBTTag::read::<encoding::BigEndian>(&mut cursor).ok()
            }
            Dialect::Network => NBTTag::read::<encoding::NetworkLittleEndian>(&mut cursor).ok(),
        }
    }

    /// Encodes `tag` (which must be a [`tag::Compound`]) as a root NBT tree using this dialect.
    ///
    /// `storage_version` is only meaningful for the header-bearing dialects; for the rest it is
    /// ignored. When `None`, the header-bearing dialects fall back to a child tag named
    /// `"StorageVersion"` of type Int if `tag` is a [`tag::Compound`] with one, and to 0 if there
    /// is no such child.
    pub fn encode(
        self,
        tag: &NBTTag,
        storage_version: Option<i32>,
    ) -> Result<Vec<u8>, NBTError<WriteError>> {
        let mut payload = Vec::new();
        match self {
            Dialect::LittleEndian | Dialect::LittleEndianWithHeader => {
                tag.write::<encoding::LittleEndian>(&mut payload)?;
            }
            Dialect::BigEndian | Dialect::BigEndianWithHeader => {
                tag.write::<encoding::BigEndian>(&mut payload)?;
            }
            Dialect::Network => {
                tag.write::<encoding::NetworkLittleEndian>(&mut payload)?;
            }
        }
        if !self.has_header() {
            return Ok(payload);
        }
        let storage_version = storage_version.unwrap_or_else(|| {
            match tag {
                NBTTag::Compound(compound) => compound.get_int("StorageVersion"),
                _ => None,
            }
            .map_or(0, |v| v.0)
        });
        let endian_is_little = matches!(self, Dialect::LittleEndianWithHeader);
        let mut out = Vec::with_capacity(8 + payload.len());
        let version_bytes = if endian_is_little {
            storage_version.to_le_bytes()
        } else {
            storage_version.to_be_bytes()
        };
        let len_bytes = if endian_is_little {
            (payload.len() as i32).to_le_bytes()
        } else {
            (payload.len() as i32).to_be_bytes()
        };
        out.extend_from_slice(&version_bytes);
        out.extend_from_slice(&len_bytes);
        out.extend_from_slice(&payload);
        Ok(out)
    }
}

impl NBTTag {
    /// Returns the [NBTTagType] associated with the tag variant contained in the enum.
    pub fn tag_type(&self) -> NBTTagType {
        match self {
            NBTTag::Byte(_) => NBTTagType::Byte,
            NBTTag::Short(_) => NBTTagType::Short,
            NBTTag::Int(_) => NBTTagType::Int,
            NBTTag::Long(_) => NBTTagType::Long,
            NBTTag::Float(_) => NBTTagType::Float,
            NBTTag::Double(_) => NBTTagType::Double,
            NBTTag::String(_) => NBTTagType::String,
            NBTTag::Compound(_) => NBTTagType::Compound,
            NBTTag::List(_) => NBTTagType::List,
            NBTTag::ByteArray(_) => NBTTagType::ByteArray,
            NBTTag::IntArray(_) => NBTTagType::IntArray,
            NBTTag::LongArray(_) => NBTTagType::LongArray,
            NBTTag::End => NBTTagType::End,
        }
    }

    /// Creates a [View] for the NBT tag for easy JSON-like reading and mutation.
    pub fn view(&self) -> View {
        View::borrowed(self)
    }

    /// Attempts to read the root tag from a buffer using the specified [Reader] encoding.
    ///
    /// The root frame is always a [`tag::Compound`]: a type byte, a (usually empty) name string,
    /// then the compound payload.
    pub fn read<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        let tag_id = R::u8(buf)?;
        R::string(buf)?;
        Self::read_payload::<R>(tag_id, buf)
    }

    fn read_payload<R: Reader>(tag_id: u8, buf: &mut impl Read) -> reader::Res<Self> {
        match tag_id {
            1 => Ok(NBTTag::Byte(tag::Byte::read_payload::<R>(buf)?)),
            2 => Ok(NBTTag::Short(tag::Short::read_payload::<R>(buf)?)),
            3 => Ok(NBTTag::Int(tag::Int::read_payload::<R>(buf)?)),
            4 => Ok(NBTTag::Long(tag::Long::read_payload::<R>(buf)?)),
            5 => Ok(NBTTag::Float(tag::Float::read_payload::<R>(buf)?)),
            6 => Ok(NBTTag::Double(tag::Double::read_payload::<R>(buf)?)),
            8 => Ok(NBTTag::String(tag::String::read_payload::<R>(buf)?)),
            10 => Ok(NBTTag::Compound(tag::Compound::read_payload::<R>(buf)?)),
            9 => Ok(NBTTag::List(tag::List::read_payload::<R>(buf)?)),
            7 => Ok(NBTTag::ByteArray(tag::ByteArray::read_payload::<R>(buf)?)),
            11 => Ok(NBTTag::IntArray(tag::IntArray::read_payload::<R>(buf)?)),
            12 => Ok(NBTTag::LongArray(tag::LongArray::read_payload::<R>(buf)?)),
            other => Err(NBTError::new(ReadError::UnknownTagType(other))),
        }
    }

    /// Attempts to write the NBT data into a buffer using the specified [Writer] encoding.
    pub fn write<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_u8(buf, self.tag_id())?;
        W::write_string(buf, "")?;
        self.write_payload::<W>(buf)
    }

    pub(crate) fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        match self {
            NBTTag::Byte(tag) => tag.write_payload::<W>(buf),
            NBTTag::Short(tag) => tag.write_payload::<W>(buf),
            NBTTag::Int(tag) => tag.write_payload::<W>(buf),
            NBTTag::Long(tag) => tag.write_payload::<W>(buf),
            NBTTag::Float(tag) => tag.write_payload::<W>(buf),
            NBTTag::Double(tag) => tag.write_payload::<W>(buf),
            NBTTag::String(tag) => tag.write_payload::<W>(buf),
            NBTTag::Compound(tag) => tag.write_payload::<W>(buf),
            NBTTag::List(tag) => tag.write_payload::<W>(buf),
            NBTTag::ByteArray(tag) => tag.write_payload::<W>(buf),
            NBTTag::IntArray(tag) => tag.write_payload::<W>(buf),
            NBTTag::LongArray(tag) => tag.write_payload::<W>(buf),
            // No on-wire representation; writing one into a compound/list silently truncates it,
            // which mirrors the format's own inability to name "absent" outside the terminator.
            NBTTag::End => Ok(()),
        }
    }

    /// Gets the discriminator of a [NBTTag]'s type used for encoding and decoding.
    pub(crate) fn tag_id(&self) -> u8 {
        self.tag_type().id()
    }
}

impl Default for NBTTag {
    fn default() -> Self {
        Self::Compound(BTreeMap::new().into())
    }
}

/// A trait implemented on all NBT tags to define reading/writing their payload data.
pub(crate) trait TagIo: Sized {
    /// Attempts to read the payload data from a buffer into an NBT value using the specified
    /// [Reader] encoding.
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self>;
    /// Attempts to write the NBT data into a buffer using the specified [Writer] encoding.
    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res;
}
impl TagIo for tag::Byte {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        Ok(R::u8(buf)?.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_u8(buf, self.0)
    }
}
impl TagIo for tag::Short {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        Ok(R::i16(buf)?.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_i16(buf, self.0)
    }
}
impl TagIo for tag::Int {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        Ok(R::i32(buf)?.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_i32(buf, self.0)
    }
}
impl TagIo for tag::Long {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        Ok(R::i64(buf)?.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_i64(buf, self.0)
    }
}
impl TagIo for tag::Float {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        Ok(R::f32(buf)?.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_f32(buf, self.0)
    }
}
impl TagIo for tag::Double {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        Ok(R::f64(buf)?.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_f64(buf, self.0)
    }
}
impl TagIo for tag::String {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        let string = R::string(buf);
        match string {
            Ok(string) => Ok(tag::String::Utf8(string)),
            Err(err) => {
                if let ReadError::InvalidString(bytes) = err.boxed.inner {
                    Ok(tag::String::Bytes(bytes))
                } else {
                    Err(err)
                }
            }
        }
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        match self {
            tag::String::Utf8(x) => W::write_string(buf, x.as_str()),
            tag::String::Bytes(x) => W::write_string_bytes(buf, x),
        }
    }
}
impl TagIo for tag::List {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        let content_type = R::u8(buf)?;
        let len = R::seq_len(buf)?;
        let mut vec = Vec::with_capacity(len.min(1024 / size_of::<NBTTag>().max(1)));
        for i in 0..len {
            vec.push(
                NBTTag::read_payload::<R>(content_type, buf)
                    .map_err(|err| err.prepend(PathPart::Element(i)))?,
            );
        }
        Ok(vec.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        let first_id = if self.0.is_empty() {
            0
        } else {
            self.0[0].tag_id()
        };

        W::write_u8(buf, first_id)?;
        W::write_seq_len(buf, self.len())?;
        for (i, v) in self.0.iter().enumerate() {
            if v.tag_id() != first_id {
                return Err(NBTError::new_with_path(
                    WriteError::UnexpectedTag(self[0].tag_type(), v.tag_type()),
                    Path::from_single(PathPart::Element(i)),
                ));
            }
            v.write_payload::<W>(buf)?;
        }
        Ok(())
    }
}
impl TagIo for tag::Compound {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        let mut map = BTreeMap::new();
        loop {
            let content_type = R::u8(buf)?;
            if content_type == 0 {
                break;
            }
            let name = R::string(buf)?;
            let value = NBTTag::read_payload::<R>(content_type, buf)
                .map_err(|err| err.prepend(PathPart::MapKey(name.clone())))?;
            map.insert(name, value);
        }
        Ok(map.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        for (name, val) in &self.0 {
            W::write_u8(buf, val.tag_id())?;
            W::write_string(buf, name)?;
            val.write_payload::<W>(buf)?;
        }
        W::write_end(buf)?;
        Ok(())
    }
}
impl TagIo for tag::ByteArray {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        Ok(R::u8_vec(buf)?.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_u8_vec(buf, &self.0)
    }
}
impl TagIo for tag::IntArray {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        Ok(R::i32_vec(buf)?.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_i32_vec(buf, &self.0)
    }
}
impl TagIo for tag::LongArray {
    fn read_payload<R: Reader>(buf: &mut impl Read) -> reader::Res<Self> {
        Ok(R::i64_vec(buf)?.into())
    }

    fn write_payload<W: Writer>(&self, buf: &mut impl Write) -> writer::Res {
        W::write_i64_vec(buf, &self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_compound_little_endian() {
        let nbt = NBTTag::Compound(tag::Compound::default());
        let bytes = Dialect::LittleEndian.encode(&nbt, None).unwrap();
        assert_eq!(bytes, vec![0x0A, 0x00, 0x00, 0x00]);
        assert_eq!(Dialect::LittleEndian.decode(&bytes), Some(nbt));
    }

    #[test]
    fn single_int_big_endian() {
        let nbt = NBTTag::Compound(
            tag::Compound::builder().with_int("x", 258).build(),
        );
        let bytes = Dialect::BigEndian.encode(&nbt, None).unwrap();
        assert_eq!(
            bytes,
            vec![0x0A, 0x00, 0x00, 0x03, 0x00, 0x01, 0x78, 0x00, 0x00, 0x01, 0x02, 0x00]
        );
        assert_eq!(Dialect::BigEndian.decode(&bytes), Some(nbt));
    }

    #[test]
    fn network_dialect_list_count_is_plain_not_zigzag_varint() {
        let nbt = NBTTag::Compound(
            tag::Compound::builder()
                .with_list("l", vec![tag::Byte(1), tag::Byte(2), tag::Byte(3)])
                .build(),
        );
        let bytes = Dialect::Network.encode(&nbt, None).unwrap();
        assert_eq!(
            bytes,
            vec![0x0A, 0x00, 0x09, 0x01, 0x6C, 0x01, 0x03, 0x01, 0x02, 0x03, 0x00]
        );
        assert_eq!(Dialect::Network.decode(&bytes), Some(nbt));
    }

    #[test]
    fn header_round_trip_preserves_explicit_storage_version() {
        let nbt = NBTTag::Compound(tag::Compound::default());
        let bytes = Dialect::LittleEndianWithHeader
            .encode(&nbt, Some(10))
            .unwrap();
        assert_eq!(&bytes[0..4], &10i32.to_le_bytes());
        assert_eq!(Dialect::LittleEndianWithHeader.decode(&bytes), Some(nbt));
    }

    #[test]
    fn header_falls_back_to_storage_version_child_when_unspecified() {
        let nbt = NBTTag::Compound(
            tag::Compound::builder()
                .with_int("StorageVersion", 10)
                .build(),
        );
        let bytes = Dialect::LittleEndianWithHeader.encode(&nbt, None).unwrap();
        assert_eq!(&bytes[0..4], &10i32.to_le_bytes());
    }

    #[test]
    fn header_defaults_to_zero_with_no_explicit_version_or_child() {
        let nbt = NBTTag::Compound(tag::Compound::default());
        let bytes = Dialect::LittleEndianWithHeader.encode(&nbt, None).unwrap();
        assert_eq!(&bytes[0..4], &0i32.to_le_bytes());
    }
}
