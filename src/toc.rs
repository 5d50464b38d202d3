//! Anchors and the per-page contents list.

use crate::model::ModuleApi;

/// One row of the "Contents" list: a non-empty bucket and its size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentsEntry {
    pub title: &'static str,
    pub anchor: &'static str,
    pub count: usize,
}

/// Buckets in rendering order, empty ones left out.
pub fn contents(api: &ModuleApi) -> Vec<ContentsEntry> {
    [
        ("Constants", "constants", api.constants.len()),
        ("Functions", "functions", api.functions.len()),
        ("Classes", "classes", api.classes.len()),
    ]
    .into_iter()
    .filter(|(_, _, count)| *count > 0)
    .map(|(title, anchor, count)| ContentsEntry {
        title,
        anchor,
        count,
    })
    .collect()
}

/// Anchor id of a function header.
pub fn function_anchor(name: &str) -> String {
    format!("func-{}", name)
}

/// Anchor id of a class header.
pub fn class_anchor(name: &str) -> String {
    format!("class-{}", name)
}

/// GitHub heading anchor slug.
///
/// - lowercase
/// - remove all chars that aren't alphanumeric, space or hyphen
/// - replace spaces with hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Markdown list item for a contents entry: `* [Functions](#functions) (3)`.
pub fn render_toc_item(entry: &ContentsEntry) -> String {
    format!("* [{}](#{}) ({})", entry.title, entry.anchor, entry.count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDoc, FunctionDoc};

    #[test]
    fn slug_simple() {
        assert_eq!(github_slug("hello world"), "hello-world");
    }

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(github_slug("eidos.components.table"), "eidoscomponentstable");
        assert_eq!(github_slug("Data Table"), "data-table");
    }

    #[test]
    fn contents_skips_empty_buckets() {
        let api = ModuleApi {
            module: "m".into(),
            functions: vec![FunctionDoc::default(), FunctionDoc::default()],
            ..Default::default()
        };
        let entries = contents(&api);
        assert_eq!(entries.len(), 1);
        assert_eq!(render_toc_item(&entries[0]), "* [Functions](#functions) (2)");
    }

    #[test]
    fn anchors_by_kind() {
        let f = FunctionDoc {
            name: "stringify".into(),
            ..Default::default()
        };
        let c = ClassDoc {
            name: "DataTable".into(),
            ..Default::default()
        };
        assert_eq!(function_anchor(&f.name), "func-stringify");
        assert_eq!(class_anchor(&c.name), "class-DataTable");
    }
}
