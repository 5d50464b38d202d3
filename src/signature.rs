//! Tokenizing of textual signatures such as `(a: int, b: List[int, str] = None) -> bool`.
//!
//! Splitting is depth-aware: commas and colons nested inside `()`, `[]`, `{}`
//! or string literals never act as separators.

/// A signature split into parameter chunks and an optional return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParts {
    pub params: Vec<SignatureParam>,
    pub return_type: Option<String>,
}

/// One parameter chunk. `annotation` holds everything after the first
/// top-level colon, including any `= default` tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParam {
    pub name: String,
    pub annotation: Option<String>,
}

/// Split a parenthesized signature. Returns `None` if `sig` does not start
/// with a balanced parameter list.
pub fn split_signature(sig: &str) -> Option<SignatureParts> {
    let sig = sig.trim();
    if !sig.starts_with('(') {
        return None;
    }
    let close = matching_paren(sig)?;
    let inner = &sig[1..close];
    let rest = sig[close + 1..].trim();

    let return_type = rest
        .strip_prefix("->")
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let params = split_top_level(inner, ',')
        .into_iter()
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| split_param(&chunk))
        .collect();

    Some(SignatureParts {
        params,
        return_type,
    })
}

/// Split `text` on `sep` wherever bracket depth is zero and no string is open.
/// Chunks are trimmed.
pub fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    for idx in top_level_positions(text, sep) {
        out.push(text[start..idx].trim().to_string());
        start = idx + sep.len_utf8();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() || !out.is_empty() {
        out.push(tail.to_string());
    }
    out
}

/// Count separators that sit at bracket depth zero.
pub fn top_level_count(text: &str, sep: char) -> usize {
    top_level_positions(text, sep).len()
}

fn split_param(chunk: &str) -> SignatureParam {
    let colon = top_level_positions(chunk, ':').first().copied();
    let equals = top_level_positions(chunk, '=').first().copied();

    match colon {
        // `b=lambda x: x` has its colon inside the default, not an annotation
        Some(c) if equals.is_none_or(|e| c < e) => SignatureParam {
            name: chunk[..c].trim().to_string(),
            annotation: Some(chunk[c + 1..].trim().to_string()),
        },
        _ => SignatureParam {
            name: chunk.trim().to_string(),
            annotation: None,
        },
    }
}

fn matching_paren(sig: &str) -> Option<usize> {
    let mut scanner = Scanner::default();
    for (idx, c) in sig.char_indices() {
        let depth_before = scanner.depth;
        scanner.feed(c);
        if c == ')' && !scanner.in_string() && depth_before == 1 {
            return Some(idx);
        }
    }
    None
}

fn top_level_positions(text: &str, sep: char) -> Vec<usize> {
    let mut scanner = Scanner::default();
    let mut positions = Vec::new();
    for (idx, c) in text.char_indices() {
        if c == sep && scanner.depth == 0 && !scanner.in_string() {
            positions.push(idx);
            continue;
        }
        scanner.feed(c);
    }
    positions
}

/// Tracks bracket depth and string state while scanning characters.
#[derive(Default)]
struct Scanner {
    depth: i32,
    quote: Option<char>,
    escaped: bool,
}

impl Scanner {
    fn in_string(&self) -> bool {
        self.quote.is_some()
    }

    fn feed(&mut self, c: char) {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == q {
                self.quote = None;
            }
            return;
        }
        match c {
            '(' | '[' | '{' => self.depth += 1,
            ')' | ']' | '}' => self.depth -= 1,
            '\'' | '"' => self.quote = Some(c),
            _ => {}
        }
    }
}
