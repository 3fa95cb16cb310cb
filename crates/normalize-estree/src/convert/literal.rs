//! Literals, template strings and regular expressions.

use super::{Converter, SyntaxNode, named_children};
use crate::error::Result;
use crate::estree::{LiteralValue, Node, NodeKind, RegExpValue, RegexLiteral, TemplateElementValue};
use crate::kinds::SyntaxKind;

impl Converter<'_> {
    /// Convert a literal. This is also the fallback for every expression kind
    /// without a dedicated mapping, so non-literals fail here.
    pub(super) fn convert_literal(&self, node: SyntaxNode<'_>) -> Result<Node> {
        let raw = self.text(node);
        let (value, regex) = match SyntaxKind::of(node) {
            SyntaxKind::True => (LiteralValue::Boolean(true), None),
            SyntaxKind::False => (LiteralValue::Boolean(false), None),
            SyntaxKind::Null => (LiteralValue::Null, None),
            SyntaxKind::Number => match parse_number(raw) {
                Some(value) => (LiteralValue::Number(value), None),
                None => return self.unexpected(node),
            },
            SyntaxKind::String => {
                let quoted = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
                let value = cook(quoted, Quote::String).unwrap_or_else(|| quoted.to_string());
                (LiteralValue::String(value), None)
            }
            SyntaxKind::Regex => {
                let pattern = self.text(self.field(node, "pattern")?);
                let flags = node
                    .child_by_field_name("flags")
                    .map_or("", |flags| self.text(flags));
                let compiled = compile_regex(pattern, flags);
                if compiled.is_none() {
                    tracing::debug!(pattern, flags, "regular expression not materialized");
                }
                (
                    LiteralValue::RegExp(compiled),
                    Some(RegexLiteral {
                        pattern: pattern.to_string(),
                        flags: flags.to_string(),
                    }),
                )
            }
            _ => return self.unexpected(node),
        };
        Ok(self.wrap(
            node,
            NodeKind::Literal {
                value,
                raw: raw.to_string(),
                regex,
            },
        ))
    }

    /// Convert a template string into strictly interleaved quasis and
    /// expressions; there is always one more quasi than expressions.
    pub(super) fn convert_template(&self, node: SyntaxNode<'_>) -> Result<Node> {
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        // Text starts after the opening backtick.
        let mut start = node.start_byte() + 1;
        for child in named_children(node) {
            if SyntaxKind::of(child) != SyntaxKind::TemplateSubstitution {
                continue;
            }
            quasis.push(self.template_element(start, child.start_byte(), false));
            expressions.push(self.convert_expression(self.first_named(child)?)?);
            start = child.end_byte();
        }
        let end = node.end_byte().saturating_sub(1).max(start);
        quasis.push(self.template_element(start, end, true));
        Ok(self.wrap(node, NodeKind::TemplateLiteral { quasis, expressions }))
    }

    fn template_element(&self, start: usize, end: usize, tail: bool) -> Node {
        let raw = self.source.get(start..end).unwrap_or("");
        let value = TemplateElementValue {
            cooked: cook(raw, Quote::Template),
            raw: raw.to_string(),
        };
        self.wrap_pos(start, end, NodeKind::TemplateElement { value, tail })
    }
}

/// Numeric value of a number literal's source text.
///
/// Handles decimal and exponent forms, `0x`/`0o`/`0b` prefixes, legacy octal
/// (`017`), numeric separators and BigInt suffixes.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let text: String = raw.chars().filter(|&c| c != '_').collect();
    let text = text.strip_suffix('n').unwrap_or(&text);
    let prefixed = |prefix: [&str; 2]| {
        text.strip_prefix(prefix[0])
            .or_else(|| text.strip_prefix(prefix[1]))
    };
    if let Some(digits) = prefixed(["0x", "0X"]) {
        return parse_radix(digits, 16);
    }
    if let Some(digits) = prefixed(["0o", "0O"]) {
        return parse_radix(digits, 8);
    }
    if let Some(digits) = prefixed(["0b", "0B"]) {
        return parse_radix(digits, 2);
    }
    let bytes = text.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' && bytes.iter().all(u8::is_ascii_digit) {
        // `017` is octal; `019` is decimal.
        if bytes.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return parse_radix(text, 8);
        }
        return text.parse().ok();
    }
    text.parse().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc: f64, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    String,
    Template,
}

/// Evaluate the escape sequences of string or template text.
///
/// Returns `None` when the text holds an escape that is not valid in that
/// context (templates reject legacy octal escapes).
fn cook(raw: &str, quote: Quote) -> Option<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c == '\r' {
            // CRLF and lone CR read as LF.
            if chars.get(i) == Some(&'\n') {
                i += 1;
            }
            out.push('\n');
            continue;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escape = *chars.get(i)?;
        i += 1;
        match escape {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.get(i).is_some_and(char::is_ascii_digit) => out.push('\0'),
            '0'..='7' if quote == Quote::String => {
                // At most three digits, and the value must fit in a byte.
                let mut value = escape.to_digit(8)?;
                let max_len = if escape <= '3' { 3 } else { 2 };
                let mut len = 1;
                while len < max_len {
                    match chars.get(i).and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            i += 1;
                            len += 1;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value)?);
            }
            '8' | '9' if quote == Quote::String => out.push(escape),
            '0'..='9' => return None,
            'x' => {
                let value = hex_value(chars.get(i..i + 2)?)?;
                i += 2;
                out.push(char::from_u32(value)?);
            }
            'u' => {
                let (unit, len) = unicode_escape(&chars[i..])?;
                i += len;
                if (0xD800..0xDC00).contains(&unit)
                    && chars.get(i) == Some(&'\\')
                    && chars.get(i + 1) == Some(&'u')
                    && let Some((low, low_len)) = unicode_escape(&chars[i + 2..])
                    && (0xDC00..0xE000).contains(&low)
                {
                    i += 2 + low_len;
                    let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(combined)?);
                } else {
                    out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            // Line continuations produce nothing.
            '\r' => {
                if chars.get(i) == Some(&'\n') {
                    i += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }
    Some(out)
}

/// `XXXX` or `{X...}` after `\u`: the code unit/point and the chars consumed.
fn unicode_escape(chars: &[char]) -> Option<(u32, usize)> {
    if chars.first() == Some(&'{') {
        let close = chars.iter().position(|&c| c == '}')?;
        let value = hex_value(&chars[1..close])?;
        if value > 0x10FFFF {
            return None;
        }
        return Some((value, close + 1));
    }
    Some((hex_value(chars.get(..4)?)?, 4))
}

fn hex_value(digits: &[char]) -> Option<u32> {
    if digits.is_empty() || digits.len() > 8 {
        return None;
    }
    digits
        .iter()
        .try_fold(0u32, |acc, c| Some(acc * 16 + c.to_digit(16)?))
}

/// Compile a literal's pattern and flags with ECMAScript semantics.
///
/// Flags must be drawn from `dgimsuvy` without repeats, and `u` excludes
/// `v`. `d`, `g` and `y` only affect matching state. A pattern the engine
/// rejects is malformed and yields `None`.
fn compile_regex(pattern: &str, flags: &str) -> Option<RegExpValue> {
    let mut seen = String::new();
    for flag in flags.chars() {
        if seen.contains(flag) || !"dgimsuvy".contains(flag) {
            return None;
        }
        seen.push(flag);
    }
    if seen.contains('u') && seen.contains('v') {
        return None;
    }
    let regex = regress::Regex::with_flags(pattern, flags).ok()?;
    Some(RegExpValue {
        regex,
        pattern: pattern.to_string(),
        flags: flags.to_string(),
    })
}
