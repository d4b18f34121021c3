//! SNBT (and JSON projection) emission.
//!
//! Grounded in `SnbtSerializer.cpp`: one function per tag kind, a `dumpJson` switch that disables
//! type-marker suffixes and typed-array prefixes, and the indentation trick of re-prepending the
//! indent string to every newline a nested container already produced.
use crate::snbt::format::SnbtFormat;
use crate::{tag, NBTTag};

/// Renders `tag` as SNBT text using the given format flags and indent width.
///
/// `indent` is the number of spaces used for one level of nesting; line-feed formatting is
/// controlled independently by the flags in `format` (see [`SnbtFormat`]).
pub fn to_snbt(tag: &NBTTag, format: SnbtFormat, indent: usize) -> String {
    render(tag, format, indent, false)
}

/// Renders `tag` as its JSON projection.
///
/// This is exactly [`to_snbt`] with [`SnbtFormat::json`] and number/array emission switched to
/// plain JSON conventions: no type-marker suffixes, and byte/int/long arrays emit as plain `[…]`
/// rather than `[B; …]` / `[I; …]` / `[L; …]`. The distinction between the three array kinds is
/// lost in this direction.
pub fn to_json(tag: &NBTTag, indent: usize) -> String {
    render(tag, SnbtFormat::json(), indent, true)
}

fn render(tag: &NBTTag, format: SnbtFormat, indent: usize, dump_json: bool) -> String {
    match tag {
        NBTTag::End => "null".to_string(),
        NBTTag::Byte(v) => {
            if dump_json {
                v.0.to_string()
            } else {
                marked(v.0.to_string(), format, 'b', false)
            }
        }
        NBTTag::Short(v) => {
            if dump_json {
                v.0.to_string()
            } else {
                marked(v.0.to_string(), format, 's', false)
            }
        }
        NBTTag::Int(v) => {
            if dump_json {
                v.0.to_string()
            } else {
                marked(v.0.to_string(), format, 'i', true)
            }
        }
        NBTTag::Long(v) => {
            if dump_json {
                v.0.to_string()
            } else {
                marked(v.0.to_string(), format, 'l', false)
            }
        }
        NBTTag::Float(v) => {
            if dump_json {
                format_number(v.0 as f64)
            } else {
                marked(format_number(v.0 as f64), format, 'f', false)
            }
        }
        NBTTag::Double(v) => {
            if dump_json {
                format_number(v.0)
            } else {
                marked(format_number(v.0), format, 'd', true)
            }
        }
        NBTTag::String(s) => dump_string_tag(s, format),
        NBTTag::List(list) => render_list(list, format, indent, dump_json),
        NBTTag::Compound(compound) => render_compound(compound, format, indent, dump_json),
        NBTTag::ByteArray(arr) => render_typed_array(
            &arr.0,
            "B",
            'b',
            false,
            format,
            indent,
            dump_json,
            |v| v.to_string(),
        ),
        NBTTag::IntArray(arr) => render_typed_array(
            &arr.0,
            "I",
            'i',
            true,
            format,
            indent,
            dump_json,
            |v| v.to_string(),
        ),
        NBTTag::LongArray(arr) => render_typed_array(
            &arr.0,
            "L",
            'l',
            false,
            format,
            indent,
            dump_json,
            |v| v.to_string(),
        ),
    }
}

/// `marker_is_optional` selects the `MarkIntTag`/`MarkDoubleTag` family (suffix emitted only when
/// the flag is set); all other numeric kinds always carry their suffix.
fn marked(value: String, format: SnbtFormat, mark: char, marker_is_optional: bool) -> String {
    let wants_marker = if marker_is_optional {
        match mark {
            'i' => format.contains(SnbtFormat::MarkIntTag),
            'd' => format.contains(SnbtFormat::MarkDoubleTag),
            _ => true,
        }
    } else {
        true
    };
    if !wants_marker {
        return value;
    }
    let mark = if format.contains(SnbtFormat::ForceUppercase) {
        mark.to_ascii_uppercase()
    } else {
        mark
    };
    if format.contains(SnbtFormat::CommentMarks) {
        format!("{value} /*{mark}*/")
    } else {
        format!("{value}{mark}")
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn dump_string_tag(s: &tag::String, format: SnbtFormat) -> String {
    match s {
        tag::String::Utf8(str) => dump_string(str, format, false),
        tag::String::Bytes(bytes) => {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            format!("\"{encoded}\" /*BASE64*/")
        }
    }
}

fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '+' || c == '_' || c == '.'
}

fn dump_string(s: &str, format: SnbtFormat, is_key: bool) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }
    let mut trivial = !format.contains(SnbtFormat::ForceQuote);
    if trivial {
        if !is_key {
            let first = s.chars().next().unwrap();
            if first == '-' || first == '+' || first == '.' || first.is_ascii_digit() {
                trivial = false;
            }
        }
        if trivial && !s.chars().all(is_unquoted_char) {
            trivial = false;
        }
    }
    if trivial {
        return s.to_string();
    }
    format!("\"{}\"", escape_string(s, format.contains(SnbtFormat::ForceAscii)))
}

fn escape_string(s: &str, force_ascii: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if force_ascii && (c as u32) > 0x7F => {
                let cp = c as u32;
                if cp > 0xFFFF {
                    let v = cp - 0x10000;
                    let high = 0xD800 + (v >> 10);
                    let low = 0xDC00 + (v & 0x3FF);
                    out.push_str(&format!("\\u{high:04x}\\u{low:04x}"));
                } else {
                    out.push_str(&format!("\\u{cp:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}

fn render_list(list: &tag::List, format: SnbtFormat, indent: usize, dump_json: bool) -> String {
    let is_new_line = format.contains(SnbtFormat::ListArrayLineFeed)
        && (format.contains(SnbtFormat::ForceLineFeedIgnoreIndent) || indent > 0);
    let is_minimized = format.is_minimized();
    let indent_sp = " ".repeat(indent);

    let mut res = String::from("[");
    if is_new_line && !list.0.is_empty() {
        res.push('\n');
    }
    let len = list.0.len();
    for (i, value) in list.0.iter().enumerate() {
        if is_new_line {
            res.push_str(&indent_sp);
        }
        let mut child = render(value, format, indent, dump_json);
        if is_new_line {
            child = child.replace('\n', &format!("\n{indent_sp}"));
        }
        res.push_str(&child);
        if i + 1 < len {
            res.push(',');
            if !is_minimized && !is_new_line {
                res.push(' ');
            }
        }
        if is_new_line {
            res.push('\n');
        }
    }
    res.push(']');
    res
}

fn render_compound(
    compound: &tag::Compound,
    format: SnbtFormat,
    indent: usize,
    dump_json: bool,
) -> String {
    let is_new_line = format.contains(SnbtFormat::CompoundLineFeed)
        && (format.contains(SnbtFormat::ForceLineFeedIgnoreIndent) || indent > 0);
    let is_minimized = format.is_minimized();
    let indent_sp = " ".repeat(indent);

    let mut res = String::from("{");
    if is_new_line && !compound.0.is_empty() {
        res.push('\n');
    }
    let len = compound.0.len();
    for (i, (key, value)) in compound.0.iter().enumerate() {
        if is_new_line {
            res.push_str(&indent_sp);
        }
        res.push_str(&dump_string(key, format, true));
        res.push(':');
        if !is_minimized {
            res.push(' ');
        }
        let mut child = render(value, format, indent, dump_json);
        if is_new_line {
            child = child.replace('\n', &format!("\n{indent_sp}"));
        }
        res.push_str(&child);
        if i + 1 < len {
            res.push(',');
            if !is_minimized && !is_new_line {
                res.push(' ');
            }
        }
        if is_new_line {
            res.push('\n');
        }
    }
    res.push('}');
    res
}

#[allow(clippy::too_many_arguments)]
fn render_typed_array<T: Copy>(
    values: &[T],
    prefix: &str,
    mark: char,
    marker_is_optional: bool,
    format: SnbtFormat,
    indent: usize,
    dump_json: bool,
    to_plain: impl Fn(T) -> String,
) -> String {
    let is_new_line = format.contains(SnbtFormat::BinaryArrayLineFeed)
        && (format.contains(SnbtFormat::ForceLineFeedIgnoreIndent) || indent > 0);
    let is_minimized = format.is_minimized();
    let indent_sp = " ".repeat(indent);

    let mut res = if dump_json {
        "[".to_string()
    } else if format.contains(SnbtFormat::CommentMarks) {
        format!("[ /*{prefix};*/")
    } else {
        format!("[{prefix};")
    };
    if is_new_line && !values.is_empty() {
        res.push('\n');
    }
    let len = values.len();
    for (i, value) in values.iter().enumerate() {
        if is_new_line {
            res.push_str(&indent_sp);
        }
        let rendered = if dump_json {
            to_plain(*value)
        } else {
            marked(to_plain(*value), format, mark, marker_is_optional)
        };
        res.push_str(&rendered);
        if i + 1 < len {
            res.push(',');
            if !is_minimized && !is_new_line {
                res.push(' ');
            }
        }
        if is_new_line {
            res.push('\n');
        }
    }
    res.push(']');
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;

    #[test]
    fn minimized_compound_with_byte() {
        let compound = tag::Compound::builder().with_byte("a", 1u8).build();
        let rendered = to_snbt(&NBTTag::Compound(compound), SnbtFormat::empty(), 0);
        assert_eq!(rendered, "{a:1b}");
    }

    #[test]
    fn line_feed_indents_nested_compound() {
        let compound = tag::Compound::builder().with_byte("a", 1u8).build();
        let rendered = to_snbt(
            &NBTTag::Compound(compound),
            SnbtFormat::CompoundLineFeed,
            2,
        );
        assert_eq!(rendered, "{\n  a: 1b\n}");
    }

    #[test]
    fn int_array_emits_typed_prefix() {
        let arr = tag::IntArray(vec![1, 2, 3]);
        let rendered = to_snbt(&NBTTag::IntArray(arr), SnbtFormat::empty(), 0);
        assert_eq!(rendered, "[I;1,2,3]");
    }

    #[test]
    fn json_mode_drops_array_prefix_and_suffixes() {
        let compound = tag::Compound::builder()
            .with_byte("a", 1u8)
            .with_int_array("xs", vec![1, 2])
            .build();
        let rendered = to_json(&NBTTag::Compound(compound), 2);
        assert_eq!(rendered, "{\n  \"a\": 1,\n  \"xs\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn non_utf8_string_falls_back_to_base64() {
        let s = tag::String::Bytes(vec![0xff, 0xfe]);
        let rendered = to_snbt(&NBTTag::String(s), SnbtFormat::empty(), 0);
        assert!(rendered.ends_with("/*BASE64*/"));
    }
}
