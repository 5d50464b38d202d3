//! HTML renderer. Builds a [`MarkupNode`] tree styled with the site's CSS
//! custom properties and wraps it in a standalone page.

use crate::docstring::{
    classify_paragraph, fenced_code, first_line, paragraphs, parse_docstring, ParagraphKind,
    EXAMPLE_SECTIONS, PARAMETER_SECTIONS,
};
use crate::markup::{Element, MarkupNode};
use crate::model::*;
use crate::render::{
    display_name, group_modules, index_link, module_page_path, navigation, relative_page_link,
    RenderOptions, Renderer,
};
use crate::signature::split_signature;
use crate::toc;

const H4_STYLE: &str =
    "font-weight: 600; font-size: 1.125rem; margin-top: 1rem; margin-bottom: 0.5rem;";
const H2_STYLE: &str = "font-size: 1.5rem; font-weight: bold; margin-bottom: 1rem; padding-bottom: 0.5rem; border-bottom: 1px solid var(--color-border);";
const CODE_STYLE: &str = "font-family: monospace; font-size: 0.875rem; background-color: var(--color-surface); padding: 0.125rem 0.25rem; border-radius: 0.25rem;";
const PRE_STYLE: &str = "background-color: var(--color-surface-elevated); color: var(--color-text); padding: 1rem; border-radius: 0.25rem; overflow-x: auto;";
const PROSE_STYLE: &str = "color: var(--color-text); line-height: 1.5;";

const STYLESHEET: &str = r#":root {
  --color-primary: #2563eb;
  --color-primary-light: #eff6ff;
  --color-accent: #7c3aed;
  --color-success: #059669;
  --color-error: #dc2626;
  --color-text: #1f2937;
  --color-text-muted: #4b5563;
  --color-text-subtle: #6b7280;
  --color-surface: #f3f4f6;
  --color-surface-elevated: #e5e7eb;
  --color-border: #d1d5db;
}
body { font-family: system-ui, sans-serif; color: var(--color-text); margin: 2rem auto; padding: 0 1rem; }
a { color: var(--color-primary); }
.docs-sidebar a.active { font-weight: 600; color: var(--color-accent); }
"#;

pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        HtmlRenderer { options }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, descriptor: &ModuleDescriptor) -> String {
        let module = descriptor.module_name();
        let title = format!("API: {}", module);
        let page = render_api_page(descriptor, &self.options);
        if self.options.navigation.is_empty() {
            return page_shell(&title, page);
        }
        let layout = Element::new("div")
            .style("display: flex; gap: 2rem; align-items: flex-start;")
            .child(render_api_nav(&self.options.navigation, module))
            .child(Element::new("main").style("flex: 1; min-width: 0;").child(page));
        page_shell(&title, layout.into())
    }

    fn render_index(&self, modules: &[String]) -> Option<String> {
        Some(page_shell("API Reference", render_api_index(modules)))
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

/// Wrap a body tree in a complete HTML document.
pub fn page_shell(title: &str, body: MarkupNode) -> String {
    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(Element::new("title").text(title))
        .child(Element::new("style").child(MarkupNode::Raw(STYLESHEET.to_string())));
    let html: MarkupNode = Element::new("html")
        .attr("lang", "en")
        .child(head)
        .child(Element::new("body").child(body))
        .into();
    format!("<!DOCTYPE html>\n{}\n", html.to_html())
}

/// Render a module's API page.
pub fn render_api_page(descriptor: &ModuleDescriptor, options: &RenderOptions) -> MarkupNode {
    let api = match descriptor {
        ModuleDescriptor::Failed(err) => {
            return Element::new("div")
                .child(
                    Element::new("h1")
                        .style("font-size: 1.875rem; font-weight: bold; margin-bottom: 1rem;")
                        .text("API Reference Error"),
                )
                .child(
                    Element::new("p")
                        .style("color: var(--color-error);")
                        .text(err.error.as_str()),
                )
                .into();
        }
        ModuleDescriptor::Documented(api) => api,
    };

    let mut page = Element::new("div").style("max-width: 80rem; margin: 0 auto;");
    page.push(
        Element::new("div")
            .child(
                Element::new("h1")
                    .style("font-size: 1.875rem; font-weight: bold; margin-bottom: 0.5rem;")
                    .text(api.module.as_str()),
            )
            .child(
                Element::new("p")
                    .style("font-size: 1.25rem; color: var(--color-text-muted); margin-bottom: 1.5rem;")
                    .text("API Reference"),
            ),
    );

    if let Some(ref doc) = api.doc {
        let parsed = parse_docstring(doc);
        let mut intro = Element::new("div").style(
            "margin-bottom: 2rem; padding: 1.5rem; background-color: var(--color-primary-light); border-radius: 0.5rem; border: 1px solid var(--color-border);",
        );
        intro = intro.children(render_text(&parsed.description));
        for (title, body) in &parsed.sections {
            intro.push(render_docstring_section(title, body));
        }
        page.push(intro);
    }

    let entries = toc::contents(api);
    if !entries.is_empty() {
        let items = entries.iter().map(|e| {
            Element::new("li")
                .child(
                    Element::new("a")
                        .attr("href", format!("#{}", e.anchor))
                        .style("color: var(--color-primary); text-decoration: none;")
                        .text(e.title),
                )
                .child(
                    Element::new("span")
                        .style("color: var(--color-text-subtle); font-size: 0.875rem; margin-left: 0.25rem;")
                        .text(format!(" ({})", e.count)),
                )
                .into()
        });
        page.push(
            Element::new("div")
                .style("margin-bottom: 2rem; padding: 1rem; background-color: var(--color-surface); border-radius: 0.5rem;")
                .child(
                    Element::new("h2")
                        .style("font-size: 1.25rem; font-weight: 600; margin-bottom: 0.75rem;")
                        .text("Contents"),
                )
                .child(
                    Element::new("ul")
                        .style("list-style: disc; list-style-position: inside;")
                        .children(items),
                ),
        );
    }

    for entry in &entries {
        let items: Vec<MarkupNode> = api
            .items()
            .filter(|item| bucket_anchor(item) == entry.anchor)
            .map(|item| render_item(&item, &api.module, options))
            .collect();
        page.push(
            Element::new("section")
                .style("margin-bottom: 3rem;")
                .child(
                    Element::new("h2")
                        .attr("id", entry.anchor)
                        .style(H2_STYLE)
                        .text(entry.title),
                )
                .children(items),
        );
    }

    page.into()
}

fn bucket_anchor(item: &ApiItem<'_>) -> &'static str {
    match item {
        ApiItem::Constant(_) => "constants",
        ApiItem::Function(_) => "functions",
        ApiItem::Class(_) => "classes",
    }
}

/// Render one item according to its kind.
pub fn render_item(item: &ApiItem<'_>, module: &str, options: &RenderOptions) -> MarkupNode {
    match item {
        ApiItem::Constant(c) => render_constant(c),
        ApiItem::Function(f) => render_function(f, module, options),
        ApiItem::Class(c) => render_class(c),
    }
}

fn render_constant(c: &ConstantDoc) -> MarkupNode {
    Element::new("div")
        .style("margin-bottom: 0.5rem;")
        .child(
            Element::new("code")
                .style("font-family: monospace; color: var(--color-primary); font-weight: 600;")
                .text(c.name.as_str()),
        )
        .child(
            Element::new("span")
                .style("color: var(--color-text);")
                .text(" = "),
        )
        .child(
            Element::new("code")
                .style("font-family: monospace; color: var(--color-success);")
                .text(c.value.as_str()),
        )
        .child(
            Element::new("span")
                .style("color: var(--color-text-subtle); font-style: italic; font-size: 0.875rem; margin-left: 0.5rem;")
                .text(format!("  # {}", c.value_type)),
        )
        .into()
}

fn render_function(f: &FunctionDoc, module: &str, options: &RenderOptions) -> MarkupNode {
    let mut header = Element::new("div").style("margin-bottom: 1rem; overflow: hidden;");
    let mut title = Element::new("h3")
        .attr("id", toc::function_anchor(&f.name))
        .style("font-size: 1.25rem; font-family: monospace; margin-bottom: 0.5rem;");
    if f.is_async {
        title.push(
            Element::new("span")
                .style("color: var(--color-text-muted);")
                .text("async "),
        );
    }
    header.push(title.children(format_signature(&f.name, &f.signature)));

    if f.is_local {
        if let Some(href) = options.source_link(module, &f.name, f.line) {
            header.push(
                Element::new("a")
                    .attr("href", href)
                    .style("color: var(--color-primary); font-size: 0.875rem; float: right; text-decoration: none;")
                    .text("View source"),
            );
        }
    }

    let mut block = Element::new("div")
        .style("border-left: 4px solid var(--color-primary); padding-left: 1.5rem; margin-bottom: 2rem;")
        .child(header);

    if let Some(ref doc) = f.doc {
        let parsed = parse_docstring(doc);
        block = block.children(render_text(&parsed.description));
        for (title, body) in &parsed.sections {
            // Parameters come from the signature
            if PARAMETER_SECTIONS.contains(&title.as_str()) {
                continue;
            }
            block.push(render_docstring_section(title, body));
        }
    }

    if let Some(table) = render_parameters(&f.parameters) {
        block.push(table);
    }

    if let Some(ref ret) = f.return_type {
        block.push(
            Element::new("div")
                .style("margin-bottom: 1rem;")
                .child(Element::new("h4").style(H4_STYLE).text("Returns"))
                .child(
                    Element::new("p")
                        .style("color: var(--color-text);")
                        .child(Element::new("code").style(CODE_STYLE).text(ret.as_str())),
                ),
        );
    }

    block.into()
}

fn render_class(c: &ClassDoc) -> MarkupNode {
    let mut title = Element::new("h3")
        .attr("id", toc::class_anchor(&c.name))
        .style("font-size: 1.25rem; font-family: monospace; margin-bottom: 0.5rem;")
        .child(
            Element::new("span")
                .style("color: var(--color-text-muted);")
                .text("class "),
        )
        .child(
            Element::new("span")
                .style("color: var(--color-primary); font-weight: 600;")
                .text(c.name.as_str()),
        );
    if !c.bases.is_empty() {
        title = title
            .child(Element::new("span").style("color: var(--color-text);").text("("))
            .child(
                Element::new("span")
                    .style("color: var(--color-text-muted); font-style: italic;")
                    .text(c.bases.join(", ")),
            )
            .child(Element::new("span").style("color: var(--color-text);").text(")"));
    }

    let mut block = Element::new("div")
        .style("border-left: 4px solid var(--color-accent); padding-left: 1.5rem; margin-bottom: 2rem;")
        .child(title);

    if let Some(ref doc) = c.doc {
        let parsed = parse_docstring(doc);
        block = block.children(render_text(&parsed.description));
        for (title, body) in &parsed.sections {
            block.push(render_docstring_section(title, body));
        }
    }

    if !c.methods.is_empty() {
        block.push(
            Element::new("h4")
                .style("font-weight: 600; font-size: 1.125rem; margin-top: 1.5rem; margin-bottom: 1rem;")
                .text("Methods"),
        );
        for method in &c.methods {
            block.push(render_method(method));
        }
    }

    block.into()
}

fn render_method(method: &MethodDoc) -> MarkupNode {
    let mut header = Element::new("div").style("margin-bottom: 0.5rem;");
    let badge = if method.is_classmethod {
        Some("@classmethod")
    } else if method.is_staticmethod {
        Some("@staticmethod")
    } else {
        None
    };
    if let Some(badge) = badge {
        header.push(
            Element::new("span")
                .style("color: var(--color-success); font-size: 0.875rem; display: block;")
                .text(badge),
        );
    }
    header.push(
        Element::new("div")
            .style("font-family: monospace;")
            .children(format_signature(&method.function.name, &method.function.signature)),
    );

    let mut block = Element::new("div")
        .style("margin-bottom: 1.5rem; background-color: var(--color-surface); padding: 1rem; border-radius: 0.25rem;")
        .child(header);
    if let Some(ref doc) = method.function.doc {
        let summary = first_line(doc);
        if !summary.is_empty() {
            block.push(
                Element::new("p")
                    .style("color: var(--color-text-muted); font-size: 0.875rem; margin-bottom: 0.5rem; margin-left: 1rem;")
                    .text(summary),
            );
        }
    }
    block.into()
}

/// Highlighted `name(params) → ret` spans. Unparseable signatures are shown
/// verbatim after the name.
pub fn format_signature(name: &str, signature: &str) -> Vec<MarkupNode> {
    let span = |style: &str, text: &str| -> MarkupNode {
        Element::new("span").style(style).text(text).into()
    };
    let plain = "color: var(--color-text);";
    let muted = "color: var(--color-text-muted); font-style: italic;";
    let accent = "color: var(--color-accent);";

    let mut out = vec![span("color: var(--color-primary); font-weight: 600;", name)];
    let Some(parts) = split_signature(signature) else {
        out.push(span(plain, signature));
        return out;
    };

    out.push(span(plain, "("));
    for (i, param) in parts.params.iter().enumerate() {
        if i > 0 {
            out.push(span(plain, ", "));
        }
        out.push(span(accent, &param.name));
        if let Some(ref ann) = param.annotation {
            out.push(span(plain, ": "));
            out.push(span(muted, ann));
        }
    }
    out.push(span(plain, ")"));

    if let Some(ref ret) = parts.return_type {
        out.push(span(plain, " → "));
        out.push(span(muted, ret));
    }
    out
}

/// Parameter table, restricted to parameters carrying a type or a default.
fn render_parameters(params: &[ParameterDoc]) -> Option<MarkupNode> {
    let cell = "padding: 0.5rem 1rem;";
    let rows: Vec<MarkupNode> = params
        .iter()
        .filter(|p| p.annotation.is_some() || p.default.is_some())
        .map(|p| {
            let type_cell = match p.annotation {
                Some(ref ann) => Element::new("td").style(cell).child(
                    Element::new("span")
                        .style("color: var(--color-text-muted); font-style: italic; font-size: 0.875rem;")
                        .text(ann.as_str()),
                ),
                None => Element::new("td").style(cell),
            };
            let default_cell = match p.default {
                Some(ref d) => Element::new("td").style(cell).child(
                    Element::new("span")
                        .style("color: var(--color-text-subtle); font-size: 0.875rem;")
                        .text(format!("default: {}", d)),
                ),
                None => Element::new("td").style(cell),
            };
            Element::new("tr")
                .style("border-bottom: 1px solid var(--color-border);")
                .child(
                    Element::new("td")
                        .style("padding: 0.5rem 1rem; vertical-align: top;")
                        .child(Element::new("code").style(CODE_STYLE).text(p.name.as_str())),
                )
                .child(type_cell)
                .child(default_cell)
                .into()
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    let th = |label: &str| -> MarkupNode {
        Element::new("th")
            .style("padding: 0.5rem 1rem; text-align: left; font-weight: 500; color: var(--color-text-muted);")
            .text(label)
            .into()
    };
    Some(
        Element::new("div")
            .style("margin-bottom: 1.5rem;")
            .child(
                Element::new("h4")
                    .style("font-weight: 600; font-size: 1.125rem; margin-top: 1.5rem; margin-bottom: 0.75rem;")
                    .text("Parameters"),
            )
            .child(
                Element::new("table")
                    .style("width: 100%; border-collapse: collapse;")
                    .child(
                        Element::new("thead").child(
                            Element::new("tr")
                                .style("border-bottom: 2px solid var(--color-border);")
                                .children([th("Name"), th("Type"), th("Default")]),
                        ),
                    )
                    .child(Element::new("tbody").children(rows)),
            )
            .into(),
    )
}

/// Render one docstring section under an `h4` heading.
pub fn render_docstring_section(title: &str, content: &str) -> MarkupNode {
    let block = Element::new("div")
        .style("margin-bottom: 1rem;")
        .child(Element::new("h4").style(H4_STYLE).text(title));

    if PARAMETER_SECTIONS.contains(&title) {
        let items = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|line| match line.split_once(':') {
                Some((name, desc)) => Element::new("li")
                    .child(Element::new("code").style(CODE_STYLE).text(name.trim()))
                    .child(
                        Element::new("span")
                            .style("margin-left: 0.5rem;")
                            .text(format!(": {}", desc.trim())),
                    )
                    .into(),
                None => Element::new("li").text(line).into(),
            });
        return block
            .child(
                Element::new("ul")
                    .style("list-style: disc; list-style-position: inside;")
                    .children(items),
            )
            .into();
    }

    if EXAMPLE_SECTIONS.contains(&title) {
        let (lang, code) = fenced_code(content)
            .unwrap_or_else(|| ("python".to_string(), content.to_string()));
        return block.child(code_block(&code, &lang)).into();
    }

    block.children(render_text(content)).into()
}

/// Prose paragraphs and code blocks, classified paragraph by paragraph.
fn render_text(text: &str) -> Vec<MarkupNode> {
    paragraphs(text)
        .into_iter()
        .map(|para| match classify_paragraph(&para) {
            ParagraphKind::CodeBlock => match fenced_code(&para) {
                Some((lang, code)) => code_block(&code, &lang),
                None => code_block(&para, "python"),
            },
            ParagraphKind::SectionHeader(title) => {
                Element::new("h4").style(H4_STYLE).text(title).into()
            }
            ParagraphKind::Prose => Element::new("p")
                .style(PROSE_STYLE)
                .text(para.replace('\n', " "))
                .into(),
        })
        .collect()
}

fn code_block(code: &str, lang: &str) -> MarkupNode {
    let lang = if lang.is_empty() { "python" } else { lang };
    Element::new("pre")
        .style(PRE_STYLE)
        .child(
            Element::new("code")
                .attr("class", format!("language-{}", lang))
                .text(code),
        )
        .into()
}

/// Sidebar linking every module page, as seen from the page of `current`.
pub fn render_api_nav(modules: &[String], current: &str) -> MarkupNode {
    let mut nav = Element::new("nav")
        .attr("class", "docs-sidebar")
        .style("width: 14rem; flex-shrink: 0; font-size: 0.875rem;")
        .child(
            Element::new("h4")
                .style("font-weight: 600; margin-bottom: 0.5rem;")
                .child(
                    Element::new("a")
                        .attr("href", index_link(current, "html"))
                        .style("color: var(--color-text); text-decoration: none;")
                        .text("API Reference"),
                ),
        );

    for entry in navigation(modules) {
        let indent = entry.depth * 2;
        let row = match entry.module {
            Some(ref module) => {
                let mut link = Element::new("a")
                    .attr("href", relative_page_link(current, module, "html"))
                    .style(&format!(
                        "display: block; padding: 0.125rem 0 0.125rem {}rem; text-decoration: none;",
                        indent as f32 + 0.75
                    ))
                    .text(entry.label);
                if module == current {
                    link = link.attr("aria-current", "page").attr("class", "active");
                }
                link
            }
            None => Element::new("span")
                .style(&format!(
                    "display: block; padding: 0.25rem 0 0.125rem {}rem; font-weight: 600; color: var(--color-text-muted);",
                    indent
                ))
                .text(entry.label),
        };
        nav.push(row);
    }
    nav.into()
}

/// Render the index of all documented modules, grouped by parent package.
pub fn render_api_index(modules: &[String]) -> MarkupNode {
    let groups = group_modules(modules).into_iter().map(|(parent, members)| {
        let links = members.iter().map(|module| {
            Element::new("li")
                .style("margin-bottom: 0.5rem;")
                .child(
                    Element::new("a")
                        .attr("href", module_page_path(module, "html"))
                        .style("color: var(--color-primary); text-decoration: none;")
                        .child(
                            Element::new("code")
                                .style("font-family: monospace;")
                                .text(display_name(module)),
                        ),
                )
                .into()
        });
        Element::new("div")
            .style("margin-bottom: 1.5rem;")
            .child(
                Element::new("h3")
                    .style("font-size: 1.125rem; font-weight: 600; margin-bottom: 0.5rem;")
                    .text(parent),
            )
            .child(
                Element::new("ul")
                    .style("list-style: disc; list-style-position: inside; margin-left: 1rem;")
                    .children(links),
            )
            .into()
    });

    Element::new("div")
        .style("max-width: 64rem; margin: 0 auto;")
        .child(
            Element::new("h1")
                .style("font-size: 1.875rem; font-weight: bold; margin-bottom: 0.5rem;")
                .text("API Reference"),
        )
        .child(
            Element::new("p")
                .style("font-size: 1.25rem; color: var(--color-text-muted); margin-bottom: 2rem;")
                .text("Complete API documentation for EidosUI modules"),
        )
        .child(Element::new("div").children(groups))
        .into()
}
