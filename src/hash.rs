//! Structural hashing for [`crate::NBTTag`] trees.
//!
//! The hash is defined as FNV-1a over the tag's canonical little-endian *payload* encoding (the
//! [`crate::encoding::LittleEndian`] dialect, with no type-byte/name root framing — that framing
//! is the same three bytes for every call, so hashing it would only waste cycles). Two trees that
//! are [`PartialEq`]-equal always hash equally, since the payload encoding is a pure function of
//! the tag's structure and values.
use crate::NBTTag;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Computes the FNV-1a structural hash of a tag tree's canonical payload encoding.
///
/// `tag` does not need to be a [`crate::tag::Compound`]; this is meaningful for any [NBTTag].
pub fn hash_tag(tag: &NBTTag) -> u64 {
    let mut buf = Vec::new();
    tag.write_payload::<crate::encoding::LittleEndian>(&mut buf)
        .expect("writing to a Vec<u8> cannot fail");
    fnv1a(&buf)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;

    #[test]
    fn equal_trees_hash_equally() {
        let a = NBTTag::Compound(tag::Compound::builder().with_int("x", 1).build());
        let b = NBTTag::Compound(tag::Compound::builder().with_int("x", 1).build());
        assert_eq!(hash_tag(&a), hash_tag(&b));
    }

    #[test]
    fn differing_trees_usually_hash_differently() {
        let a = NBTTag::Compound(tag::Compound::builder().with_int("x", 1).build());
        let b = NBTTag::Compound(tag::Compound::builder().with_int("x", 2).build());
        assert_ne!(hash_tag(&a), hash_tag(&b));
    }
}
