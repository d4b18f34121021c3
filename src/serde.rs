//! One-directional [`serde::Serialize`] support for [`NBTTag`] and [`View`].
//!
//! There is no [`serde::Deserialize`] impl: NBT's thirteen tag kinds don't map back onto a
//! Rust type from a serde data model alone (an incoming `0` could be a Byte, Short, Int, or
//! Long), so round-tripping through serde would require the kind of side-channel schema this
//! crate's [`crate::snbt`] and binary codecs already avoid. Serializing outward, by contrast, is
//! unambiguous: each tag kind has exactly one native serde representation, the same mapping
//! [`crate::snbt::to_json`] uses for its JSON projection.
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::{tag, NBTTag, View};

impl Serialize for NBTTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NBTTag::End => serializer.serialize_none(),
            NBTTag::Byte(v) => serializer.serialize_u8(v.0),
            NBTTag::Short(v) => serializer.serialize_i16(v.0),
            NBTTag::Int(v) => serializer.serialize_i32(v.0),
            NBTTag::Long(v) => serializer.serialize_i64(v.0),
            NBTTag::Float(v) => serializer.serialize_f32(v.0),
            NBTTag::Double(v) => serializer.serialize_f64(v.0),
            NBTTag::String(s) => serializer.serialize_str(&s.to_string_lossy()),
            NBTTag::ByteArray(arr) => serializer.serialize_bytes(&arr.0),
            NBTTag::IntArray(arr) => serialize_seq(serializer, &arr.0),
            NBTTag::LongArray(arr) => serialize_seq(serializer, &arr.0),
            NBTTag::List(list) => serialize_seq(serializer, &list.0),
            NBTTag::Compound(compound) => serialize_compound(serializer, compound),
        }
    }
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_tag().serialize(serializer)
    }
}

fn serialize_seq<S: Serializer, T: Serialize>(serializer: S, values: &[T]) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        seq.serialize_element(value)?;
    }
    seq.end()
}

fn serialize_compound<S: Serializer>(
    serializer: S,
    compound: &tag::Compound,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(compound.0.len()))?;
    for (key, value) in compound.0.iter() {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_serializes_as_a_map() {
        let tag = NBTTag::Compound(tag::Compound::builder().with_int("x", 1).build());
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, r#"{"x":1}"#);
    }

    #[test]
    fn list_serializes_as_a_sequence() {
        let tag = NBTTag::List(tag::List(vec![NBTTag::Byte(tag::Byte(1)), NBTTag::Byte(tag::Byte(2))]));
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "[1,2]");
    }

    #[test]
    fn end_serializes_as_null() {
        let json = serde_json::to_string(&NBTTag::End).unwrap();
        assert_eq!(json, "null");
    }

    #[test]
    fn view_delegates_to_its_wrapped_tag() {
        let view = View::from(tag::Int(7));
        assert_eq!(serde_json::to_string(&view).unwrap(), "7");
    }
}
