//! Recursive-descent SNBT parsing.
//!
//! Grounded in `SnbtDeserializer.cpp`'s `parseSnbtValue`/`parseCompound`/`parseList`/`parseString`/
//! `parseNumber` family: one function per grammar production, operating on a shrinking string
//! slice rather than building a token stream.
//!
//! Two deliberate departures from the original, both noted because they resolve genuine
//! ambiguities rather than following a silent detail:
//! - Comments (`//`, `#`, `;` line comments and `/* … */` block comments) are always treated as
//!   transparent whitespace here. The original's `ignoreComment` returns `false` for every line
//!   comment, which its caller `skipWhitespace` treats as an outright parse failure — that would
//!   make line comments unusable rather than merely unsupported, which does not match this
//!   format's documented grammar.
//! - A leading `.` (as in `.5`) is accepted as the start of a number, matching the documented
//!   round-trip behavior for unsuffixed fractional literals.
use crate::err::{NBTError, SnbtError};
use crate::{tag, NBTTag};
use std::collections::BTreeMap;

/// Parses `input` as a single SNBT value, failing if anything but trailing whitespace/comments
/// follows it.
pub fn parse(input: &str) -> Result<NBTTag, NBTError<SnbtError>> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value().map_err(NBTError::new)?;
    if !parser.rest.is_empty() {
        return Err(NBTError::new(SnbtError::TrailingContent(parser.offset())));
    }
    Ok(value)
}

/// Parses a single SNBT value from the start of `input`, returning the value together with the
/// number of bytes consumed. Trailing content is not an error.
pub fn parse_with_len(input: &str) -> Result<(NBTTag, usize), NBTError<SnbtError>> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value().map_err(NBTError::new)?;
    Ok((value, parser.offset()))
}

struct Parser<'a> {
    total_len: usize,
    rest: &'a str,
}

fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '+' || c == '_' || c == '.'
}

fn suffix_kind(c: char) -> Option<char> {
    let lower = c.to_ascii_lowercase();
    if "bsilfd".contains(lower) {
        Some(lower)
    } else {
        None
    }
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            total_len: input.len(),
            rest: input,
        }
    }

    fn offset(&self) -> usize {
        self.total_len - self.rest.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let mut chars = self.rest.chars();
        let c = chars.next()?;
        self.rest = chars.as_str();
        Some(c)
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest.starts_with(prefix) {
            self.rest = &self.rest[prefix.len()..];
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        loop {
            let trimmed = self.rest.trim_start();
            if trimmed.len() != self.rest.len() {
                self.rest = trimmed;
                continue;
            }
            if self.rest.starts_with("//") || self.rest.starts_with('#') || self.rest.starts_with(';')
            {
                let skip = if self.rest.starts_with("//") { 2 } else { 1 };
                let after = &self.rest[skip..];
                self.rest = match after.find('\n') {
                    Some(idx) => &after[idx + 1..],
                    None => "",
                };
                continue;
            }
            if self.rest.starts_with("/*") {
                self.rest = match self.rest[2..].find("*/") {
                    Some(idx) => &self.rest[2 + idx + 2..],
                    None => "",
                };
                continue;
            }
            break;
        }
    }

    fn parse_value(&mut self) -> Result<NBTTag, SnbtError> {
        self.skip_ws();
        let value = self.parse_value_non_skip()?;
        self.skip_ws();
        Ok(value)
    }

    fn parse_value_non_skip(&mut self) -> Result<NBTTag, SnbtError> {
        match self.peek() {
            None => return Err(SnbtError::UnexpectedEof),
            Some('{') => return self.parse_compound(),
            Some('[') => return self.parse_list_or_array(),
            Some('-') | Some('.') | Some('0'..='9') => return self.parse_number(),
            Some(c @ (']' | '}')) => {
                self.bump();
                return Err(SnbtError::UnexpectedChar(c, self.offset()));
            }
            _ => {}
        }
        if self.eat("true") {
            return Ok(NBTTag::Byte(tag::Byte(1)));
        }
        if self.eat("false") {
            return Ok(NBTTag::Byte(tag::Byte(0)));
        }
        if self.eat("null") {
            return Ok(NBTTag::End);
        }
        self.parse_string_value()
    }

    fn parse_key(&mut self) -> Result<String, SnbtError> {
        let start = self.offset();
        let bytes = self.parse_string_raw()?;
        String::from_utf8(bytes).map_err(|_| SnbtError::InvalidEscape(start))
    }

    fn parse_string_value(&mut self) -> Result<NBTTag, SnbtError> {
        let bytes = self.parse_string_raw()?;
        Ok(NBTTag::String(match String::from_utf8(bytes) {
            Ok(s) => tag::String::Utf8(s),
            Err(e) => tag::String::Bytes(e.into_bytes()),
        }))
    }

    fn parse_string_raw(&mut self) -> Result<Vec<u8>, SnbtError> {
        let start = self.offset();
        let quote = match self.peek() {
            Some(c @ ('"' | '\'')) => {
                self.bump();
                Some(c)
            }
            Some(c) if is_unquoted_char(c) => None,
            other => return Err(SnbtError::UnexpectedChar(other.unwrap_or('\0'), start)),
        };

        let Some(quote) = quote else {
            let mut s = String::new();
            while let Some(c) = self.peek() {
                if is_unquoted_char(c) {
                    s.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            return Ok(s.into_bytes());
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(SnbtError::UnterminatedString(start)),
                Some(c) if c == quote => break,
                Some('\\') => match self.bump() {
                    None => return Err(SnbtError::UnterminatedString(start)),
                    Some('\n') | Some('\r') => self.skip_ws(),
                    Some('"') if quote == '"' => out.push('"'),
                    Some('\'') if quote == '\'' => out.push('\''),
                    Some('\\') => out.push('\\'),
                    Some('/') => out.push('/'),
                    Some('b') => out.push('\u{8}'),
                    Some('f') => out.push('\u{c}'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some('v') => out.push('\u{b}'),
                    Some('u') => {
                        let cp1 = self.parse_hex4(start)?;
                        let codepoint = if (0xD800..=0xDBFF).contains(&cp1) {
                            if self.bump() != Some('\\') || self.bump() != Some('u') {
                                return Err(SnbtError::InvalidEscape(start));
                            }
                            let cp2 = self.parse_hex4(start)?;
                            if !(0xDC00..=0xDFFF).contains(&cp2) {
                                return Err(SnbtError::InvalidEscape(start));
                            }
                            0x10000 + ((cp1 - 0xD800) << 10) + (cp2 - 0xDC00)
                        } else if (0xDC00..=0xDFFF).contains(&cp1) {
                            return Err(SnbtError::InvalidEscape(start));
                        } else {
                            cp1
                        };
                        out.push(char::from_u32(codepoint).ok_or(SnbtError::InvalidEscape(start))?);
                    }
                    _ => return Err(SnbtError::InvalidEscape(start)),
                },
                Some(c) => out.push(c),
            }
        }

        if quote == '"' && self.eat(" /*BASE64*/") {
            use base64::Engine;
            return base64::engine::general_purpose::STANDARD
                .decode(out.as_bytes())
                .map_err(|_| SnbtError::InvalidBase64(start));
        }
        Ok(out.into_bytes())
    }

    fn parse_hex4(&mut self, start: usize) -> Result<u32, SnbtError> {
        let mut cp = 0u32;
        for _ in 0..4 {
            let c = self.bump().ok_or(SnbtError::InvalidEscape(start))?;
            let d = c.to_digit(16).ok_or(SnbtError::InvalidEscape(start))?;
            cp = (cp << 4) | d;
        }
        Ok(cp)
    }

    fn scan_number_literal(&mut self) -> String {
        let mut s = String::new();
        if self.peek() == Some('-') {
            s.push('-');
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            s.push(self.bump().unwrap());
        }
        if self.peek() == Some('.') {
            s.push('.');
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                s.push(self.bump().unwrap());
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let save = self.rest;
            let mut tail = String::new();
            tail.push(self.bump().unwrap());
            if matches!(self.peek(), Some('+') | Some('-')) {
                tail.push(self.bump().unwrap());
            }
            let mut any_digit = false;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                tail.push(self.bump().unwrap());
                any_digit = true;
            }
            if any_digit {
                s.push_str(&tail);
            } else {
                self.rest = save;
            }
        }
        s
    }

    fn try_eat_comment_suffix(&mut self) -> Option<char> {
        let after_space = self.rest.strip_prefix(" /*")?;
        let mut chars = after_space.chars();
        let mark = chars.next()?;
        let remainder = chars.as_str();
        let kind = suffix_kind(mark)?;
        let remainder = remainder.strip_prefix("*/")?;
        self.rest = remainder;
        Some(kind)
    }

    fn parse_number(&mut self) -> Result<NBTTag, SnbtError> {
        let start = self.offset();
        let token = self.scan_number_literal();
        if token.is_empty() || token == "-" {
            return Err(SnbtError::InvalidNumber(start));
        }
        let is_plain_integer = token.bytes().all(|b| b.is_ascii_digit() || b == b'-');

        if let Some(mark) = self.peek().and_then(suffix_kind) {
            self.bump();
            return self.finish_marked_number(&token, mark, start);
        }
        if let Some(mark) = self.try_eat_comment_suffix() {
            return self.finish_marked_number(&token, mark, start);
        }

        if is_plain_integer {
            if let Ok(v) = token.parse::<i32>() {
                return Ok(NBTTag::Int(tag::Int(v)));
            }
            if let Ok(v) = token.parse::<i64>() {
                return Ok(NBTTag::Long(tag::Long(v)));
            }
            return Err(SnbtError::NumberOutOfRange(start));
        }
        token
            .parse::<f64>()
            .map(|v| NBTTag::Double(tag::Double(v)))
            .map_err(|_| SnbtError::InvalidNumber(start))
    }

    fn finish_marked_number(&self, token: &str, mark: char, start: usize) -> Result<NBTTag, SnbtError> {
        let value: f64 = token.parse().map_err(|_| SnbtError::InvalidNumber(start))?;
        let in_range = |lo: f64, hi: f64| value >= lo && value <= hi;
        match mark {
            'b' if in_range(u8::MIN as f64, u8::MAX as f64) => Ok(NBTTag::Byte(tag::Byte(value as u8))),
            's' if in_range(i16::MIN as f64, i16::MAX as f64) => {
                Ok(NBTTag::Short(tag::Short(value as i16)))
            }
            'i' if in_range(i32::MIN as f64, i32::MAX as f64) => Ok(NBTTag::Int(tag::Int(value as i32))),
            'l' if in_range(i64::MIN as f64, i64::MAX as f64) => {
                Ok(NBTTag::Long(tag::Long(value as i64)))
            }
            'f' => Ok(NBTTag::Float(tag::Float(value as f32))),
            'd' => Ok(NBTTag::Double(tag::Double(value))),
            'b' | 's' | 'i' | 'l' => Err(SnbtError::NumberOutOfRange(start)),
            _ => unreachable!("suffix_kind only returns b/s/i/l/f/d"),
        }
    }

    fn parse_compound(&mut self) -> Result<NBTTag, SnbtError> {
        self.bump();
        let mut map = BTreeMap::new();
        loop {
            self.skip_ws();
            if self.eat("}") {
                return Ok(NBTTag::Compound(tag::Compound(map)));
            }
            let key = self.parse_key()?;
            self.skip_ws();
            let sep = self.bump().ok_or(SnbtError::UnexpectedEof)?;
            if sep != ':' && sep != '=' {
                return Err(SnbtError::UnexpectedChar(sep, self.offset()));
            }
            let value = self.parse_value()?;
            map.insert(key, value);
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(NBTTag::Compound(tag::Compound(map)));
                }
                Some(',') => {
                    self.bump();
                }
                _ => {}
            }
        }
    }

    fn parse_list_or_array(&mut self) -> Result<NBTTag, SnbtError> {
        let bytes = self.rest.as_bytes();
        if self.rest.starts_with("[ /*") && bytes.len() > 7 && bytes[6] == b'*' && bytes[7] == b'/' {
            self.rest = &self.rest[4..];
        } else {
            self.rest = &self.rest[1..];
        }
        if self.eat("B;") {
            self.eat("*/");
            return self.parse_num_array('b');
        }
        if self.eat("I;") {
            self.eat("*/");
            return self.parse_num_array('i');
        }
        if self.eat("L;") {
            self.eat("*/");
            return self.parse_num_array('l');
        }
        self.parse_list_body()
    }

    fn parse_num_array(&mut self, kind: char) -> Result<NBTTag, SnbtError> {
        let mut bytes = Vec::new();
        let mut ints = Vec::new();
        let mut longs = Vec::new();
        loop {
            self.skip_ws();
            if self.eat("]") {
                break;
            }
            let start = self.offset();
            let value = self.parse_number()?;
            match (kind, value) {
                ('b', NBTTag::Byte(v)) => bytes.push(v.0),
                ('i', NBTTag::Int(v)) => ints.push(v.0),
                ('l', NBTTag::Long(v)) => longs.push(v.0),
                _ => return Err(SnbtError::ArrayElementOutOfRange(start)),
            }
            self.skip_ws();
            if self.eat("]") {
                break;
            }
            if !self.eat(",") {
                return Err(SnbtError::UnexpectedChar(
                    self.peek().unwrap_or('\0'),
                    self.offset(),
                ));
            }
        }
        Ok(match kind {
            'b' => NBTTag::ByteArray(tag::ByteArray(bytes)),
            'i' => NBTTag::IntArray(tag::IntArray(ints)),
            'l' => NBTTag::LongArray(tag::LongArray(longs)),
            _ => unreachable!("parse_num_array only called with b/i/l"),
        })
    }

    fn parse_list_body(&mut self) -> Result<NBTTag, SnbtError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat("]") {
                return Ok(NBTTag::List(tag::List(items)));
            }
            items.push(self.parse_value()?);
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(NBTTag::List(tag::List(items)));
                }
                Some(',') => {
                    self.bump();
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_compound_with_comment_and_unquoted_key() {
        let nbt = parse(r#"{a:1b, b:"héllo", c:[I;1,2,3], /*c*/d=.5}"#).unwrap();
        let expected = NBTTag::Compound(tag::Compound(BTreeMap::from([
            ("a".to_string(), NBTTag::Byte(tag::Byte(1))),
            (
                "b".to_string(),
                NBTTag::String(tag::String::Utf8("héllo".to_string())),
            ),
            (
                "c".to_string(),
                NBTTag::IntArray(tag::IntArray(vec![1, 2, 3])),
            ),
            ("d".to_string(), NBTTag::Double(tag::Double(0.5))),
        ])));
        assert_eq!(nbt, expected);
    }

    #[test]
    fn keywords_map_to_byte_and_end() {
        assert_eq!(parse("true").unwrap(), NBTTag::Byte(tag::Byte(1)));
        assert_eq!(parse("false").unwrap(), NBTTag::Byte(tag::Byte(0)));
        assert_eq!(parse("null").unwrap(), NBTTag::End);
    }

    #[test]
    fn unsuffixed_integer_picks_smallest_of_int_or_long() {
        assert_eq!(parse("258").unwrap(), NBTTag::Int(tag::Int(258)));
        assert_eq!(
            parse("5000000000").unwrap(),
            NBTTag::Long(tag::Long(5_000_000_000))
        );
    }

    #[test]
    fn byte_array_requires_per_element_suffix() {
        assert!(parse("[B;1,2,3]").is_err());
        let nbt = parse("[B;1b,2b,3b]").unwrap();
        assert_eq!(nbt, NBTTag::ByteArray(tag::ByteArray(vec![1, 2, 3])));
    }

    #[test]
    fn surrogate_pair_combines_to_one_codepoint() {
        let nbt = parse(r#""😀""#).unwrap();
        assert_eq!(
            nbt,
            NBTTag::String(tag::String::Utf8("\u{1F600}".to_string()))
        );
    }

    #[test]
    fn lone_surrogate_is_an_error() {
        assert!(parse(r#""\uD83D""#).is_err());
    }

    #[test]
    fn trailing_content_after_value_is_rejected() {
        assert!(parse("1 2").is_err());
    }

    #[test]
    fn base64_suffix_round_trips_non_utf8_bytes() {
        let original = tag::String::Bytes(vec![0xff, 0xfe]);
        let text = crate::snbt::to_snbt(
            &NBTTag::String(original.clone()),
            crate::snbt::SnbtFormat::empty(),
            0,
        );
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed, NBTTag::String(original));
    }
}
