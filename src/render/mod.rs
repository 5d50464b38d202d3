//! Renderers: trait-based format dispatch.

pub mod html;
pub mod json;
pub mod markdown;

use crate::config::DEFAULT_SOURCE_URL;
use crate::model::ModuleDescriptor;
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

/// Settings shared by every output format.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Template with `{path}`, `{module}`, `{name}` and `{line}` placeholders
    pub source_url: String,
    pub source_links: bool,
    /// Modules listed in every page's navigation; empty for none
    pub navigation: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            source_links: true,
            navigation: Vec::new(),
        }
    }
}

impl RenderOptions {
    /// Source link for an item of `module`, or `None` when links are off.
    pub fn source_link(&self, module: &str, name: &str, line: usize) -> Option<String> {
        if !self.source_links {
            return None;
        }
        let path = format!("{}.py", module.replace('.', "/"));
        Some(
            self.source_url
                .replace("{path}", &path)
                .replace("{module}", module)
                .replace("{name}", name)
                .replace("{line}", &line.to_string()),
        )
    }
}

/// Trait for rendering a module descriptor into a specific output format.
pub trait Renderer {
    fn render(&self, descriptor: &ModuleDescriptor) -> String;

    /// Index page linking every module, for formats that have one.
    fn render_index(&self, _modules: &[String]) -> Option<String> {
        None
    }

    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, options: RenderOptions) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer::new(options))),
        "html" => Ok(Box::new(html::HtmlRenderer::new(options))),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use html, json, or markdown",
            format
        )),
    }
}

/// Output path of a module page relative to the output root:
/// `eidos.components.table` → `eidos/components/table.<ext>`.
pub fn module_page_path(module: &str, extension: &str) -> String {
    format!("{}.{}", module.replace('.', "/"), extension)
}

/// Link from the page of `from` to the page of `to`, both laid out by
/// [`module_page_path`] under the same output root.
pub fn relative_page_link(from: &str, to: &str, extension: &str) -> String {
    format!("{}{}", root_prefix(from), module_page_path(to, extension))
}

/// Link from the page of `from` to the index page.
pub fn index_link(from: &str, extension: &str) -> String {
    format!("{}index.{}", root_prefix(from), extension)
}

fn root_prefix(module: &str) -> String {
    "../".repeat(module.matches('.').count())
}

/// One row of the module navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct NavEntry {
    pub label: String,
    /// Page the row links to; `None` for a package heading without a page
    pub module: Option<String>,
    pub depth: usize,
}

#[derive(Default)]
struct NavNode {
    module: Option<String>,
    children: BTreeMap<String, NavNode>,
}

/// Flatten modules into a navigation tree. At each level packages with
/// listed children come first, then plain modules, each sorted by name.
/// A single shared top-level package is elided: `eidos.tags` shows as `tags`.
pub fn navigation(modules: &[String]) -> Vec<NavEntry> {
    let mut root = NavNode::default();
    for module in modules {
        let mut node = &mut root;
        for part in module.split('.') {
            node = node.children.entry(part.to_string()).or_default();
        }
        node.module = Some(module.clone());
    }

    if root.children.len() == 1 {
        if let Some((name, mut top)) = root.children.pop_first() {
            if let Some(module) = top.module.take() {
                top.children.entry(name).or_default().module = Some(module);
            }
            root = top;
        }
    }

    let mut entries = Vec::new();
    flatten_nav(&root, 0, &mut entries);
    entries
}

fn flatten_nav(node: &NavNode, depth: usize, out: &mut Vec<NavEntry>) {
    let (sections, leaves): (Vec<_>, Vec<_>) = node
        .children
        .iter()
        .partition(|(_, child)| !child.children.is_empty());
    for (name, child) in sections.into_iter().chain(leaves) {
        out.push(NavEntry {
            label: name.clone(),
            module: child.module.clone(),
            depth,
        });
        flatten_nav(child, depth + 1, out);
    }
}

/// Group modules by their first two dotted components (the first alone for
/// names with one or two parts). Groups and their members are sorted.
pub fn group_modules(modules: &[String]) -> Vec<(String, Vec<String>)> {
    let mut groups: std::collections::BTreeMap<String, Vec<String>> = Default::default();
    for module in modules {
        let parts: Vec<&str> = module.split('.').collect();
        let parent = if parts.len() > 2 {
            parts[..2].join(".")
        } else {
            parts[0].to_string()
        };
        groups.entry(parent).or_default().push(module.clone());
    }
    groups
        .into_iter()
        .map(|(parent, mut members)| {
            members.sort();
            members.dedup();
            (parent, members)
        })
        .collect()
}

/// Label of a module inside its index group.
pub fn display_name(module: &str) -> &str {
    let mut parts = module.splitn(3, '.');
    match (parts.next(), parts.next(), parts.next()) {
        (_, Some(_), Some(rest)) => rest,
        _ => module.rsplit('.').next().unwrap_or(module),
    }
}
