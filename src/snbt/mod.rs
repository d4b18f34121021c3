//! Stringified NBT (SNBT) and its JSON projection.
//!
//! This module is split the way the binary codec is: a format/flags type
//! ([`SnbtFormat`]), a parser (`parser`), and a serializer (`serializer`). [`parse`] and
//! [`parse_with_len`] turn text into a tag tree; [`to_snbt`] and [`to_json`] go the other way.
mod format;
mod parser;
mod serializer;

pub use format::SnbtFormat;
pub use parser::{parse, parse_with_len};
pub use serializer::{to_json, to_snbt};
