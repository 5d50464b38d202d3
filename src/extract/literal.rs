//! Python literal decoding: string bodies, and `repr` of simple constants.

use crate::model::ValueType;
use tree_sitter::Node;

/// Classify a value expression as a documentable constant.
///
/// Returns the Python `repr` and type for str, int, float, bool and None
/// literals; everything else (calls, containers, names, bytes, f-strings,
/// complex numbers) yields `None`.
pub(crate) fn constant_value(node: Node, src: &str) -> Option<(String, ValueType)> {
    match node.kind() {
        "string" | "concatenated_string" => {
            let s = string_value(node, src)?;
            Some((py_str_repr(&s), ValueType::Str))
        }
        "integer" => int_repr(node_text(node, src), false).map(|r| (r, ValueType::Int)),
        "float" => float_repr(node_text(node, src), false).map(|r| (r, ValueType::Float)),
        "true" => Some(("True".to_string(), ValueType::Bool)),
        "false" => Some(("False".to_string(), ValueType::Bool)),
        "none" => Some(("None".to_string(), ValueType::None)),
        "unary_operator" => {
            let op = node_text(node.child_by_field_name("operator")?, src);
            let arg = node.child_by_field_name("argument")?;
            let negate = match op {
                "-" => true,
                "+" => false,
                _ => return None,
            };
            match arg.kind() {
                "integer" => int_repr(node_text(arg, src), negate).map(|r| (r, ValueType::Int)),
                "float" => float_repr(node_text(arg, src), negate).map(|r| (r, ValueType::Float)),
                _ => None,
            }
        }
        "parenthesized_expression" => {
            let inner = node.named_child(0)?;
            constant_value(inner, src)
        }
        _ => None,
    }
}

/// Decode a `string` or `concatenated_string` node into its value.
///
/// Bytes and formatted strings have no static `str` value and yield `None`.
pub(crate) fn string_value(node: Node, src: &str) -> Option<String> {
    match node.kind() {
        "string" => decode_string_literal(node_text(node, src)),
        "concatenated_string" => {
            let mut out = String::new();
            let mut cursor = node.walk();
            for part in node.named_children(&mut cursor) {
                if part.kind() == "comment" {
                    continue;
                }
                out.push_str(&string_value(part, src)?);
            }
            Some(out)
        }
        _ => None,
    }
}

pub(crate) fn node_text<'a>(node: Node, src: &'a str) -> &'a str {
    &src[node.byte_range()]
}

/// Decode the source text of one string literal, prefix and quotes included.
pub(crate) fn decode_string_literal(literal: &str) -> Option<String> {
    let quote_start = literal.find(['\'', '"'])?;
    let prefix = literal[..quote_start].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') || prefix.contains('t') {
        return None;
    }
    let raw = prefix.contains('r');

    let quoted = &literal[quote_start..];
    let delim = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
        &quoted[..3]
    } else {
        &quoted[..1]
    };
    let body = quoted
        .strip_prefix(delim)
        .and_then(|rest| rest.strip_suffix(delim))?;

    if raw {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let hex: String = chars.clone().take(width).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) if hex.len() == width => {
                        out.push(ch);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Python `repr()` of a `str`.
pub(crate) fn py_str_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{:02x}", code));
                } else {
                    out.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Python `repr()` of an integer literal: always decimal.
fn int_repr(text: &str, negate: bool) -> Option<String> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    if lower.ends_with('j') {
        return None;
    }
    let digits = lower.trim_end_matches('l');

    let (radix, body) = if let Some(rest) = digits.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = digits.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = digits.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, digits)
    };

    match u128::from_str_radix(body, radix) {
        Ok(0) => Some("0".to_string()),
        Ok(v) if negate => Some(format!("-{}", v)),
        Ok(v) => Some(v.to_string()),
        // Too large for u128: keep decimal text as written
        Err(_) if radix == 10 && !body.is_empty() => {
            let trimmed = body.trim_start_matches('0');
            Some(format!("{}{}", if negate { "-" } else { "" }, trimmed))
        }
        Err(_) => Some(format!("{}{}", if negate { "-" } else { "" }, cleaned)),
    }
}

fn float_repr(text: &str, negate: bool) -> Option<String> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    if cleaned.ends_with(['j', 'J']) {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    Some(py_float_repr(if negate { -value } else { value }))
}

/// Python `repr()` of a float: shortest round-trip digits, scientific
/// notation below 1e-4 and from 1e16 upwards.
pub(crate) fn py_float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` gives the shortest round-trip digits, e.g. "1.5e-7"
    let sci = format!("{:e}", v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let sign = if negative { "-" } else { "" };

    if (-4..16).contains(&exp) {
        let point = exp + 1;
        let body = if point <= 0 {
            format!("0.{}{}", "0".repeat((-point) as usize), digits)
        } else if point as usize >= digits.len() {
            format!(
                "{}{}.0",
                digits,
                "0".repeat(point as usize - digits.len())
            )
        } else {
            let (int, frac) = digits.split_at(point as usize);
            format!("{}.{}", int, frac)
        };
        format!("{}{}", sign, body)
    } else {
        let (first, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            first.to_string()
        } else {
            format!("{}.{}", first, rest)
        };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{}{}e{}{:02}", sign, mantissa, exp_sign, exp.abs())
    }
}
