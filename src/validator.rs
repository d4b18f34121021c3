//! Non-materializing structural validation of NBT byte streams.
//!
//! [`validate`] walks a byte slice the same way the binary codec would, without constructing a
//! single [`crate::NBTTag`]. It is the authoritative check for whether a buffer is fully
//! well-formed for a given [`crate::Dialect`]; [`crate::Dialect::decode`] is deliberately lenient
//! about short reads, so callers that need a hard guarantee should validate first.
//!
//! Grounded in `Validate.cpp`'s `validateListTag`/`validateCompoundTag`, which the reference
//! implementation runs once with a fixed-width stream and once with a varint stream. Here both
//! cases are the same recursive walk over [`crate::io::ByteReader`], branching only on whether
//! lengths are read as LEB128 varints or fixed-width integers.
use crate::io::{ByteReader, Endian};
use crate::{Dialect, NBTTagType};

/// Validates that `bytes` is a fully well-formed NBT tree under `dialect`.
///
/// If `strict_match_size` is set, no trailing bytes may follow the parsed tree.
pub fn validate(bytes: &[u8], dialect: Dialect, strict_match_size: bool) -> bool {
    let endian = match dialect {
        Dialect::BigEndian | Dialect::BigEndianWithHeader => Endian::Big,
        _ => Endian::Little,
    };
    let network = matches!(dialect, Dialect::Network);
    let mut r = ByteReader::new(bytes, endian);

    if dialect.has_header() {
        r.ignore_bytes(8);
    }

    let root_type = r.get_byte();
    if r.is_overflowed() || root_type != NBTTagType::Compound.id() {
        return false;
    }
    if read_string_len(&mut r, network).map(|len| r.ignore_bytes(len)).is_none() {
        return false;
    }
    if r.is_overflowed() {
        return false;
    }
    if !validate_compound(&mut r, network) {
        return false;
    }
    if r.is_overflowed() {
        return false;
    }
    if strict_match_size && r.position() != r.size() {
        return false;
    }
    true
}

fn read_string_len(r: &mut ByteReader, network: bool) -> Option<usize> {
    let len = if network {
        r.get_unsigned_var_int() as i64
    } else {
        r.get_short() as i64
    };
    if r.is_overflowed() || len < 0 {
        return None;
    }
    Some(len as usize)
}

fn read_seq_len(r: &mut ByteReader, network: bool) -> Option<usize> {
    let len = if network {
        r.get_unsigned_var_int() as i64
    } else {
        r.get_int() as i64
    };
    if r.is_overflowed() || len < 0 {
        return None;
    }
    Some(len as usize)
}

fn validate_compound(r: &mut ByteReader, network: bool) -> bool {
    loop {
        let type_id = r.get_byte();
        if r.is_overflowed() {
            return false;
        }
        if type_id == NBTTagType::End.id() {
            return true;
        }
        let Some(len) = read_string_len(r, network) else {
            return false;
        };
        r.ignore_bytes(len);
        if r.is_overflowed() {
            return false;
        }
        if !validate_value(r, type_id, network) {
            return false;
        }
    }
}

fn validate_list(r: &mut ByteReader, network: bool) -> bool {
    let elem_type = r.get_byte();
    if r.is_overflowed() {
        return false;
    }
    let Some(count) = read_seq_len(r, network) else {
        return false;
    };
    for _ in 0..count {
        if !validate_value(r, elem_type, network) {
            return false;
        }
    }
    true
}

fn validate_value(r: &mut ByteReader, type_id: u8, network: bool) -> bool {
    let Some(kind) = NBTTagType::from_id(type_id) else {
        return false;
    };
    match kind {
        NBTTagType::End => false,
        NBTTagType::Byte => {
            r.ignore_bytes(1);
            !r.is_overflowed()
        }
        NBTTagType::Short => {
            r.get_short();
            !r.is_overflowed()
        }
        NBTTagType::Int => {
            if network {
                r.get_var_int();
            } else {
                r.get_int();
            }
            !r.is_overflowed()
        }
        NBTTagType::Long => {
            if network {
                r.get_var_int64();
            } else {
                r.get_int64();
            }
            !r.is_overflowed()
        }
        NBTTagType::Float => {
            r.get_float();
            !r.is_overflowed()
        }
        NBTTagType::Double => {
            r.get_double();
            !r.is_overflowed()
        }
        NBTTagType::ByteArray => {
            let Some(len) = read_seq_len(r, network) else {
                return false;
            };
            r.ignore_bytes(len);
            !r.is_overflowed()
        }
        NBTTagType::String => {
            let Some(len) = read_string_len(r, network) else {
                return false;
            };
            r.ignore_bytes(len);
            !r.is_overflowed()
        }
        NBTTagType::List => validate_list(r, network),
        NBTTagType::Compound => validate_compound(r, network),
        NBTTagType::IntArray => {
            let Some(len) = read_seq_len(r, network) else {
                return false;
            };
            for _ in 0..len {
                if network {
                    r.get_var_int();
                } else {
                    r.get_int();
                }
                if r.is_overflowed() {
                    return false;
                }
            }
            true
        }
        NBTTagType::LongArray => {
            let Some(len) = read_seq_len(r, network) else {
                return false;
            };
            for _ in 0..len {
                if network {
                    r.get_var_int64();
                } else {
                    r.get_int64();
                }
                if r.is_overflowed() {
                    return false;
                }
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;
    use crate::NBTTag;

    #[test]
    fn agrees_with_decoder_on_well_formed_input() {
        let nbt = NBTTag::Compound(
            tag::Compound::builder()
                .with_int("x", 1)
                .with_list("l", vec![tag::Byte(1), tag::Byte(2)])
                .build(),
        );
        for dialect in Dialect::PRECEDENCE {
            let bytes = dialect.encode(&nbt, None).unwrap();
            assert!(validate(&bytes, dialect, true), "{dialect:?}");
            assert_eq!(dialect.decode(&bytes), Some(nbt.clone()));
        }
    }

    #[test]
    fn truncated_input_fails() {
        let nbt = NBTTag::Compound(tag::Compound::builder().with_long("x", 1).build());
        let bytes = Dialect::BigEndian.encode(&nbt, None).unwrap();
        let truncated = &bytes[..bytes.len() - 1];
        assert!(!validate(truncated, Dialect::BigEndian, true));
        assert!(!validate(truncated, Dialect::BigEndian, false));
    }

    #[test]
    fn trailing_bytes_fail_strict_only() {
        let nbt = NBTTag::Compound(tag::Compound::default());
        let mut bytes = Dialect::BigEndian.encode(&nbt, None).unwrap();
        bytes.push(0xFF);
        assert!(!validate(&bytes, Dialect::BigEndian, true));
        assert!(validate(&bytes, Dialect::BigEndian, false));
    }

    #[test]
    fn unknown_type_fails() {
        let bytes = vec![0x0A, 0x00, 0x00, 0x15, 0x00, 0x01, 0x61, 0x00];
        assert!(!validate(&bytes, Dialect::BigEndian, true));
    }
}
