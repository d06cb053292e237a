//! Conversion of raw literal tokens into literal values

use crate::error::{ResolveError, ResolveResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use jpql_ast::{Literal, NumericKind, NumericLiteral};
use jpql_syntax::TemporalKind;
use std::iter::Peekable;
use std::ops::Range;
use std::str::Chars;

/// Decode a raw string or character literal, delimiters included.
///
/// A doubled delimiter stands for one delimiter character. Backslash escapes
/// `\b \t \n \f \r \\ \' \" \`` and `\uXXXX` are decoded; any other
/// backslash sequence is kept as written, backslash included.
pub fn unescape_string(raw: &str) -> ResolveResult<String> {
    let mut chars = raw.chars();
    let Some(delimiter) = chars.next() else {
        return Ok(String::new());
    };
    // drop the closing delimiter
    chars.next_back();

    let mut out = String::with_capacity(raw.len());
    let mut chars = chars.peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' if c == delimiter => {
                // doubled delimiter, keep one
                chars.next();
                out.push(c);
            }
            '\\' => match chars.next() {
                None => out.push('\\'),
                Some(next) => match next {
                    'b' => out.push('\u{0008}'),
                    't' => out.push('\t'),
                    'n' => out.push('\n'),
                    'f' => out.push('\u{000C}'),
                    'r' => out.push('\r'),
                    '\\' | '\'' | '"' | '`' => out.push(next),
                    'u' => out.push(decode_unicode(&mut chars)?),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                },
            },
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Code point of a `\u` escape, the `\u` already consumed.
///
/// A high surrogate directly followed by the escape of a low surrogate
/// decodes as one code point; a lone surrogate is malformed.
fn decode_unicode(chars: &mut Peekable<Chars<'_>>) -> ResolveResult<char> {
    let high = read_unit(chars)?;
    if !HIGH_SURROGATES.contains(&high) {
        return char::from_u32(u32::from(high)).ok_or_else(|| invalid_unit(high));
    }

    let mut lookahead = chars.clone();
    let low = match (lookahead.next(), lookahead.next()) {
        (Some('\\'), Some('u')) => read_unit(&mut lookahead).ok(),
        _ => None,
    };
    match low.filter(|low| LOW_SURROGATES.contains(low)) {
        Some(low) => {
            *chars = lookahead;
            char::decode_utf16([high, low])
                .next()
                .and_then(Result::ok)
                .ok_or_else(|| invalid_unit(high))
        }
        None => Err(invalid_unit(high)),
    }
}

const HIGH_SURROGATES: Range<u16> = 0xD800..0xDC00;
const LOW_SURROGATES: Range<u16> = 0xDC00..0xE000;

/// Exactly four hex digits
fn read_unit(chars: &mut Peekable<Chars<'_>>) -> ResolveResult<u16> {
    let hex: String = chars.by_ref().take(4).collect();
    let invalid = || ResolveError::InvalidEscape {
        escape: format!("\\u{hex}"),
    };
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u16::from_str_radix(&hex, 16).map_err(|_| invalid())
}

fn invalid_unit(unit: u16) -> ResolveError {
    ResolveError::InvalidEscape {
        escape: format!("\\u{unit:04X}"),
    }
}

/// Numeric literal, with the sign folded into the text
pub fn numeric_literal(text: &str, kind: NumericKind, negative: bool) -> Literal {
    let text = if negative {
        format!("-{text}")
    } else {
        text.to_string()
    };
    Literal::Numeric(NumericLiteral::new(text, kind))
}

/// Converts the quoted body of a `{d ...}`, `{t ...}` or `{ts ...}` literal
pub trait TemporalConverter: Send + Sync {
    fn convert(&self, kind: TemporalKind, body: &str) -> ResolveResult<Literal>;
}

/// ISO formats: `yyyy-MM-dd`, `HH:mm:ss[.f]` and `yyyy-MM-dd HH:mm:ss[.f]`
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoTemporalConverter;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl TemporalConverter for IsoTemporalConverter {
    fn convert(&self, kind: TemporalKind, body: &str) -> ResolveResult<Literal> {
        let invalid = || ResolveError::InvalidTemporal {
            kind,
            text: body.to_string(),
        };
        let text = unquote(body).ok_or_else(invalid)?.trim();
        let literal = match kind {
            TemporalKind::Date => NaiveDate::parse_from_str(text, DATE_FORMAT).map(Literal::Date),
            TemporalKind::Time => NaiveTime::parse_from_str(text, TIME_FORMAT).map(Literal::Time),
            TemporalKind::Timestamp => {
                NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map(Literal::Timestamp)
            }
        };
        literal.map_err(|_| invalid())
    }
}

/// Strip the first and last character
fn unquote(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    chars.next()?;
    chars.next_back()?;
    Some(chars.as_str())
}
