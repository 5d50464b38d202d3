//! Docstring cleaning, section parsing and paragraph classification.

use regex::Regex;
use std::sync::LazyLock;

/// Section titles recognized when followed by a colon on their own line.
pub const SECTION_TITLES: &[&str] = &[
    "Args",
    "Arguments",
    "Parameters",
    "Returns",
    "Return",
    "Yields",
    "Raises",
    "Note",
    "Notes",
    "Example",
    "Examples",
];

/// Sections whose body describes parameters.
pub const PARAMETER_SECTIONS: &[&str] = &["Args", "Arguments", "Parameters"];

/// Sections whose body is always shown as code.
pub const EXAMPLE_SECTIONS: &[&str] = &["Example", "Examples"];

static RE_FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w*)\n(.*?)\n[ \t]*```").unwrap());

const CODE_PREFIXES: &[&str] = &["def ", "class ", "import ", "from ", "async def "];

/// A docstring split into free text and named sections.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedDocstring {
    pub description: String,
    /// Sections in order of first appearance
    pub sections: Vec<(String, String)>,
}

impl ParsedDocstring {
    pub fn section(&self, title: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, body)| body.as_str())
    }

    fn set_section(&mut self, title: String, body: String) {
        match self.sections.iter_mut().find(|(t, _)| *t == title) {
            Some(entry) => entry.1 = body,
            None => self.sections.push((title, body)),
        }
    }
}

/// How a block of docstring text should be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphKind {
    Prose,
    CodeBlock,
    SectionHeader(String),
}

/// Normalize a raw docstring the way `inspect.cleandoc` does.
///
/// The first line loses its leading whitespace, the common indentation of
/// the remaining non-blank lines is removed, and blank lines at either end
/// are dropped. Relative indentation inside the text is preserved.
pub fn clean_docstring(raw: &str) -> String {
    let expanded = expand_tabs(raw, 8);
    let mut lines: Vec<String> = expanded.split('\n').map(str::to_string).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim_start().is_empty())
        .map(|l| indent_width(l))
        .min();

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(margin) = margin {
        for line in lines.iter_mut().skip(1) {
            *line = line.chars().skip(margin).collect();
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    lines[start..].join("\n")
}

/// Split a docstring into its description and recognized sections.
///
/// Single pass: a line reading exactly `Title:` (surrounding whitespace
/// ignored) for a known title opens a section which runs until the next
/// header. Anything else is body text of whatever is open.
pub fn parse_docstring(doc: &str) -> ParsedDocstring {
    let mut parsed = ParsedDocstring::default();
    let text = doc.trim();
    if text.is_empty() {
        return parsed;
    }

    let mut description: Vec<&str> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.split('\n') {
        if let Some(title) = section_header(line) {
            if let Some((t, body)) = current.take() {
                parsed.set_section(t, normalize_block(&body));
            }
            current = Some((title.to_string(), Vec::new()));
        } else if let Some((_, ref mut body)) = current {
            body.push(line);
        } else {
            description.push(line);
        }
    }
    if let Some((t, body)) = current {
        parsed.set_section(t, normalize_block(&body));
    }

    parsed.description = normalize_block(&description);
    parsed
}

/// Return the section title if `line` is a recognized header.
pub fn section_header(line: &str) -> Option<&'static str> {
    let title = line.trim().strip_suffix(':')?;
    SECTION_TITLES.iter().copied().find(|t| *t == title)
}

/// Decide whether a paragraph is prose, code, or a section header.
///
/// Code detection is a heuristic: fenced blocks, `>>>` prompts, indented
/// blocks and lines opening with Python keywords all count as code.
pub fn classify_paragraph(text: &str) -> ParagraphKind {
    if let Some(title) = section_header(text) {
        return ParagraphKind::SectionHeader(title.to_string());
    }
    if looks_like_code(text) {
        return ParagraphKind::CodeBlock;
    }
    ParagraphKind::Prose
}

fn looks_like_code(text: &str) -> bool {
    if text.contains("```") || text.contains(">>>") {
        return true;
    }
    let mut lines = text.lines().filter(|l| !l.trim().is_empty()).peekable();
    if lines.peek().is_none() {
        return false;
    }
    let all_indented = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .all(|l| l.starts_with("    ") || l.starts_with('\t'));
    all_indented
        || lines.any(|l| {
            let t = l.trim_start();
            CODE_PREFIXES.iter().any(|p| t.starts_with(p))
        })
}

/// Split text into paragraphs separated by blank lines.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

/// Extract the first fenced code block as `(language, code)`.
pub fn fenced_code(text: &str) -> Option<(String, String)> {
    let caps = RE_FENCED.captures(text)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// First line of a docstring, used for compact listings.
pub fn first_line(doc: &str) -> &str {
    doc.trim_start().split('\n').next().unwrap_or("").trim_end()
}

/// Drop blank lines at both ends and remove the common indentation.
fn normalize_block(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) => (s, e),
        _ => return String::new(),
    };
    let block = &lines[start..=end];
    let margin = block
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);
    block
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.chars().skip(margin).collect::<String>().trim_end().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn expand_tabs(text: &str, tab_size: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = tab_size - (column % tab_size);
                out.push_str(&" ".repeat(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_removes_common_indent_after_first_line() {
        let raw = "Summary line.\n\n    Details here.\n        indented code\n    ";
        assert_eq!(
            clean_docstring(raw),
            "Summary line.\n\nDetails here.\n    indented code"
        );
    }

    #[test]
    fn clean_strips_blank_edges() {
        assert_eq!(clean_docstring("\n\n   Only text.\n\n"), "Only text.");
    }

    #[test]
    fn clean_single_line() {
        assert_eq!(clean_docstring("   one line   "), "one line   ");
    }

    #[test]
    fn clean_is_idempotent() {
        let samples = [
            "Summary.\n\n    Body.\n      more\n",
            "\n    Starts on second line.\n    Next.\n",
            "Tabs\n\tindented\n\t\tdeeper",
            "x",
        ];
        for raw in samples {
            let once = clean_docstring(raw);
            assert_eq!(clean_docstring(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn clean_expands_tabs() {
        assert_eq!(clean_docstring("A\n\tB\n\t\tC"), "A\nB\n        C");
    }

    #[test]
    fn parse_args_and_returns() {
        let doc = "Computes X.\n\nArgs:\n    a: first value\n    b: second value\n\nReturns:\n    The sum.";
        let parsed = parse_docstring(doc);
        assert_eq!(parsed.description, "Computes X.");
        assert_eq!(parsed.section("Args"), Some("a: first value\nb: second value"));
        assert_eq!(parsed.section("Returns"), Some("The sum."));
    }

    #[test]
    fn returns_section_runs_to_end() {
        let parsed = parse_docstring("Doc.\nReturns:\n    line one\n    line two");
        assert_eq!(parsed.section("Returns"), Some("line one\nline two"));
    }

    #[test]
    fn header_match_is_exact() {
        let parsed = parse_docstring("Intro.\nReturn value:\n    nope\nreturns:\n    nope");
        assert!(parsed.sections.is_empty());
        assert!(parsed.description.contains("Return value:"));
    }

    #[test]
    fn repeated_section_keeps_last_body() {
        let parsed = parse_docstring("Note:\n  first\nReturns:\n  r\nNote:\n  second");
        assert_eq!(parsed.sections.len(), 2);
        assert_eq!(parsed.sections[0].0, "Note");
        assert_eq!(parsed.section("Note"), Some("second"));
    }

    #[test]
    fn empty_docstring() {
        let parsed = parse_docstring("   ");
        assert_eq!(parsed, ParsedDocstring::default());
    }

    #[test]
    fn example_body_keeps_relative_indent() {
        let parsed = parse_docstring("Example:\n    def f():\n        return 1");
        assert_eq!(parsed.section("Example"), Some("def f():\n    return 1"));
    }

    #[test]
    fn classify() {
        assert_eq!(
            classify_paragraph("Returns:"),
            ParagraphKind::SectionHeader("Returns".into())
        );
        assert_eq!(classify_paragraph(">>> Table()"), ParagraphKind::CodeBlock);
        assert_eq!(classify_paragraph("    x = 1\n    y = 2"), ParagraphKind::CodeBlock);
        assert_eq!(classify_paragraph("from eidos import H1"), ParagraphKind::CodeBlock);
        assert_eq!(
            classify_paragraph("Builds a table from rows."),
            ParagraphKind::Prose
        );
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        assert_eq!(paragraphs("a\nb\n\n\nc\n"), vec!["a\nb", "c"]);
    }

    #[test]
    fn fenced_code_extracted() {
        let (lang, code) = fenced_code("Use it:\n```python\nx = 1\n```").unwrap();
        assert_eq!(lang, "python");
        assert_eq!(code, "x = 1");
    }

    #[test]
    fn first_line_only() {
        assert_eq!(first_line("Short.\n\nLong text."), "Short.");
        assert_eq!(first_line(""), "");
    }
}
