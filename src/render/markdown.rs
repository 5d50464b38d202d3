//! GitHub-flavored markdown renderer.
//!
//! Same page layout as the HTML output; anchors are emitted as inline
//! `<a id>` tags so `#func-<name>` links work on any markdown host.

use crate::docstring::{
    classify_paragraph, fenced_code, first_line, paragraphs, parse_docstring, ParagraphKind,
    EXAMPLE_SECTIONS, PARAMETER_SECTIONS,
};
use crate::model::*;
use crate::render::{
    display_name, group_modules, index_link, module_page_path, navigation, relative_page_link,
    RenderOptions, Renderer,
};
use crate::toc;

pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        MarkdownRenderer { options }
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, descriptor: &ModuleDescriptor) -> String {
        let mut out = self.render_page(descriptor);
        if !self.options.navigation.is_empty() {
            out.push('\n');
            out.push_str(&self.render_nav(descriptor.module_name()));
        }
        out
    }

    fn render_index(&self, modules: &[String]) -> Option<String> {
        let groups = group_modules(modules);
        let mut lines: Vec<String> = vec![
            "# API Reference\n".to_string(),
            "Complete API documentation for EidosUI modules\n".to_string(),
        ];
        for (parent, _) in &groups {
            lines.push(format!("* [{}](#{})", parent, toc::github_slug(parent)));
        }
        lines.push(String::new());
        for (parent, members) in &groups {
            lines.push(format!("### {}\n", parent));
            for module in members {
                lines.push(format!(
                    "* [`{}`]({})",
                    display_name(module),
                    module_page_path(module, self.file_extension())
                ));
            }
            lines.push(String::new());
        }
        Some(lines.join("\n"))
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

impl MarkdownRenderer {
    fn render_page(&self, descriptor: &ModuleDescriptor) -> String {
        let api = match descriptor {
            ModuleDescriptor::Failed(err) => {
                return format!("# API Reference Error\n\n{}\n", err.error);
            }
            ModuleDescriptor::Documented(api) => api,
        };

        let mut lines: Vec<String> = Vec::new();
        lines.push(format!("# {}\n", api.module));
        lines.push("*API Reference*\n".to_string());

        if let Some(ref doc) = api.doc {
            let parsed = parse_docstring(doc);
            render_text(&mut lines, &parsed.description);
            for (title, body) in &parsed.sections {
                render_section(&mut lines, title, body);
            }
        }

        let entries = toc::contents(api);
        if !entries.is_empty() {
            lines.push("## Contents\n".to_string());
            for entry in &entries {
                lines.push(toc::render_toc_item(entry));
            }
            lines.push(String::new());
        }

        if !api.constants.is_empty() {
            lines.push("## Constants\n".to_string());
            for c in &api.constants {
                lines.push(format!(
                    "* {}  *# {}*",
                    code_span(&format!("{} = {}", c.name, c.value)),
                    c.value_type
                ));
            }
            lines.push(String::new());
        }

        if !api.functions.is_empty() {
            lines.push("## Functions\n".to_string());
            for f in &api.functions {
                self.render_function(&mut lines, f, &api.module);
            }
        }

        if !api.classes.is_empty() {
            lines.push("## Classes\n".to_string());
            for c in &api.classes {
                render_class(&mut lines, c);
            }
        }

        let mut out = lines.join("\n");
        out.truncate(out.trim_end().len());
        out.push('\n');
        out
    }

    /// Navigation list linking every module page, relative to `current`.
    fn render_nav(&self, current: &str) -> String {
        let ext = self.file_extension();
        let mut lines: Vec<String> = vec![
            "---\n".to_string(),
            format!("**[API Reference]({})**\n", index_link(current, ext)),
        ];
        for entry in navigation(&self.options.navigation) {
            let indent = "  ".repeat(entry.depth);
            let label = match entry.module {
                Some(ref module) if module == current => format!("**{}**", entry.label),
                Some(ref module) => {
                    format!("[{}]({})", entry.label, relative_page_link(current, module, ext))
                }
                None => entry.label.clone(),
            };
            lines.push(format!("{}* {}", indent, label));
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn render_function(&self, lines: &mut Vec<String>, f: &FunctionDoc, module: &str) {
        let prefix = if f.is_async { "async " } else { "" };
        lines.push(format!(
            "### <a id=\"{}\"></a>{}\n",
            toc::function_anchor(&f.name),
            code_span(&format!("{}{}{}", prefix, f.name, f.signature))
        ));

        if f.is_local {
            if let Some(href) = self.options.source_link(module, &f.name, f.line) {
                lines.push(format!("[View source]({})\n", href));
            }
        }

        if let Some(ref doc) = f.doc {
            let parsed = parse_docstring(doc);
            render_text(lines, &parsed.description);
            for (title, body) in &parsed.sections {
                if !PARAMETER_SECTIONS.contains(&title.as_str()) {
                    render_section(lines, title, body);
                }
            }
        }

        let documented: Vec<&ParameterDoc> = f
            .parameters
            .iter()
            .filter(|p| p.annotation.is_some() || p.default.is_some())
            .collect();
        if !documented.is_empty() {
            lines.push("#### Parameters\n".to_string());
            lines.push("| Name | Type | Default |".to_string());
            lines.push("| --- | --- | --- |".to_string());
            for p in documented {
                lines.push(format!(
                    "| `{}` | {} | {} |",
                    p.name,
                    table_code(p.annotation.as_deref()),
                    table_code(p.default.as_deref())
                ));
            }
            lines.push(String::new());
        }

        if let Some(ref ret) = f.return_type {
            lines.push("#### Returns\n".to_string());
            lines.push(format!("{}\n", code_span(ret)));
        }
    }
}

fn render_class(lines: &mut Vec<String>, c: &ClassDoc) {
    let bases = if c.bases.is_empty() {
        String::new()
    } else {
        format!("({})", c.bases.join(", "))
    };
    lines.push(format!(
        "### <a id=\"{}\"></a>{}\n",
        toc::class_anchor(&c.name),
        code_span(&format!("class {}{}", c.name, bases))
    ));

    if let Some(ref doc) = c.doc {
        let parsed = parse_docstring(doc);
        render_text(lines, &parsed.description);
        for (title, body) in &parsed.sections {
            render_section(lines, title, body);
        }
    }

    if !c.methods.is_empty() {
        lines.push("#### Methods\n".to_string());
        for m in &c.methods {
            let badge = if m.is_classmethod {
                "*@classmethod* "
            } else if m.is_staticmethod {
                "*@staticmethod* "
            } else {
                ""
            };
            let summary = m.function.doc.as_deref().map(first_line).unwrap_or("");
            let mut item = format!(
                "* {}{}",
                badge,
                code_span(&format!("{}{}", m.function.name, m.function.signature))
            );
            if !summary.is_empty() {
                item.push_str(": ");
                item.push_str(summary);
            }
            lines.push(item);
        }
        lines.push(String::new());
    }
}

fn render_section(lines: &mut Vec<String>, title: &str, body: &str) {
    lines.push(format!("#### {}\n", title));

    if PARAMETER_SECTIONS.contains(&title) {
        for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match line.split_once(':') {
                Some((name, desc)) => {
                    lines.push(format!("* {}: {}", code_span(name.trim()), desc.trim()))
                }
                None => lines.push(format!("* {}", line)),
            }
        }
        lines.push(String::new());
        return;
    }

    if EXAMPLE_SECTIONS.contains(&title) {
        let (lang, code) =
            fenced_code(body).unwrap_or_else(|| ("python".to_string(), body.to_string()));
        push_code(lines, &code, &lang);
        return;
    }

    render_text(lines, body);
}

fn render_text(lines: &mut Vec<String>, text: &str) {
    for para in paragraphs(text) {
        match classify_paragraph(&para) {
            ParagraphKind::CodeBlock => match fenced_code(&para) {
                Some((lang, code)) => push_code(lines, &code, &lang),
                None => push_code(lines, &para, "python"),
            },
            ParagraphKind::SectionHeader(title) => lines.push(format!("#### {}\n", title)),
            ParagraphKind::Prose => {
                lines.push(para);
                lines.push(String::new());
            }
        }
    }
}

fn push_code(lines: &mut Vec<String>, code: &str, lang: &str) {
    let lang = if lang.is_empty() { "python" } else { lang };
    lines.push(format!("```{}", lang));
    lines.push(code.to_string());
    lines.push("```".to_string());
    lines.push(String::new());
}

fn table_code(value: Option<&str>) -> String {
    match value {
        Some(v) => code_span(&v.replace('|', "\\|")),
        None => String::new(),
    }
}

/// Inline code span whose fence is longer than any backtick run in `text`.
fn code_span(text: &str) -> String {
    let longest = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest + 1);
    if longest > 0 && (text.starts_with('`') || text.ends_with('`')) {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new(RenderOptions::default())
    }

    #[test]
    fn error_page() {
        let d = ModuleDescriptor::Failed(ModuleError {
            module: "x".into(),
            error: "Could not import module x: No module named 'x'".into(),
        });
        assert_eq!(
            renderer().render(&d),
            "# API Reference Error\n\nCould not import module x: No module named 'x'\n"
        );
    }

    #[test]
    fn function_page() {
        let d = ModuleDescriptor::Documented(ModuleApi {
            module: "eidos.utils".into(),
            doc: Some("Helpers.\n\nExample:\n    stringify('a')".into()),
            functions: vec![FunctionDoc {
                name: "stringify".into(),
                doc: Some("Join.\n\nArgs:\n    a: first".into()),
                is_local: true,
                signature: "(*args: str, sep: str = ' ') -> str".into(),
                parameters: vec![
                    ParameterDoc {
                        name: "args".into(),
                        annotation: Some("str".into()),
                        default: None,
                        kind: ParamKind::VarPositional,
                    },
                    ParameterDoc {
                        name: "sep".into(),
                        annotation: Some("str".into()),
                        default: Some("' '".into()),
                        kind: ParamKind::KeywordOnly,
                    },
                ],
                return_type: Some("str".into()),
                line: 4,
                ..Default::default()
            }],
            ..Default::default()
        });
        let out = renderer().render(&d);
        assert!(out.starts_with("# eidos.utils\n\n*API Reference*\n"));
        assert!(out.contains("```python\nstringify('a')\n```"));
        assert!(out.contains("* [Functions](#functions) (1)"));
        assert!(out.contains("### <a id=\"func-stringify\"></a>`stringify(*args: str, sep: str = ' ') -> str`"));
        assert!(out.contains("[View source](#source:eidos/utils.py:stringify)"));
        assert!(!out.contains("#### Args"));
        assert!(out.contains("| `sep` | `str` | `' '` |"));
        assert!(out.contains("#### Returns\n\n`str`"));
        assert!(out.ends_with("`str`\n"));
    }

    #[test]
    fn class_methods_listed() {
        let d = ModuleDescriptor::Documented(ModuleApi {
            module: "m".into(),
            classes: vec![ClassDoc {
                name: "Table".into(),
                bases: vec!["Base".into(), "Generic".into()],
                methods: vec![MethodDoc {
                    function: FunctionDoc {
                        name: "helper".into(),
                        signature: "(x)".into(),
                        doc: Some("Help.\nMore.".into()),
                        ..Default::default()
                    },
                    is_classmethod: false,
                    is_staticmethod: true,
                }],
                ..Default::default()
            }],
            ..Default::default()
        });
        let out = renderer().render(&d);
        assert!(out.contains("`class Table(Base, Generic)`"));
        assert!(out.contains("* *@staticmethod* `helper(x)`: Help."));
        assert!(!out.contains("More."));
    }

    #[test]
    fn backticks_in_values_widen_the_fence() {
        assert_eq!(code_span("plain"), "`plain`");
        assert_eq!(code_span("X = 'a`b'"), "``X = 'a`b'``");
        assert_eq!(code_span("`edge"), "`` `edge ``");

        let d = ModuleDescriptor::Documented(ModuleApi {
            module: "m".into(),
            constants: vec![ConstantDoc {
                name: "TICK".into(),
                doc: None,
                is_local: true,
                value: "'a`b'".into(),
                value_type: ValueType::Str,
            }],
            ..Default::default()
        });
        assert!(renderer().render(&d).contains("* ``TICK = 'a`b'``  *# str*"));
    }

    #[test]
    fn navigation_appended_with_relative_links() {
        let r = MarkdownRenderer::new(RenderOptions {
            navigation: vec![
                "eidos.tags".to_string(),
                "eidos.components.table".to_string(),
            ],
            ..Default::default()
        });
        let d = ModuleDescriptor::Failed(ModuleError {
            module: "eidos.tags".into(),
            error: "boom".into(),
        });
        assert_eq!(
            r.render(&d),
            "# API Reference Error\n\nboom\n\n---\n\n**[API Reference](../index.md)**\n\n\
             * components\n  * [table](../eidos/components/table.md)\n* **tags**\n"
        );
    }

    #[test]
    fn index_groups_and_links() {
        let modules = vec![
            "eidos.tags".to_string(),
            "eidos.components.table".to_string(),
        ];
        let out = renderer().render_index(&modules).unwrap();
        assert!(out.contains("* [eidos.components](#eidoscomponents)"));
        assert!(out.contains("### eidos.components\n\n* [`table`](eidos/components/table.md)"));
        assert!(out.contains("* [`tags`](eidos/tags.md)"));
    }
}
