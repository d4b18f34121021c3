//! Low-level byte cursor primitives shared by the [`crate::validator`] and [`crate::detect`]
//! modules.
//!
//! These are distinct from the [`crate::reader::Reader`]/[`crate::writer::Writer`] traits used by
//! the tag codec: a [`ByteReader`] walks a borrowed byte slice directly and tracks a *sticky*
//! overflow flag instead of returning a `Result` from every call. Once a read runs past the end
//! of the slice the reader is marked overflowed, and every subsequent read keeps returning a
//! default value rather than propagating an error. This mirrors the wire reader the format was
//! originally specified against, and it is exactly the behavior the validator needs: it walks
//! untrusted bytes to the end and only checks the overflow flag (and position) once, rather than
//! threading a `Result` through every primitive read.

mod reader;
mod writer;

pub use reader::ByteReader;
pub use writer::ByteWriter;

/// Byte order used by a fixed-width dialect's primitive reads.
///
/// The varint dialect does not use this: varint byte sequences have no endianness of their own.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Endian {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}
