//! Minimal markup tree produced by the HTML renderer.

use std::fmt::Write;

/// Void elements never get a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(Element),
    Text(String),
    /// Trusted markup emitted verbatim
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn style(self, value: &str) -> Self {
        self.attr("style", value)
    }

    pub fn child(mut self, node: impl Into<MarkupNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(MarkupNode::Text(text.into()))
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = MarkupNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn push(&mut self, node: impl Into<MarkupNode>) {
        self.children.push(node.into());
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for MarkupNode {
    fn from(el: Element) -> Self {
        MarkupNode::Element(el)
    }
}

impl MarkupNode {
    /// Serialize to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            MarkupNode::Text(t) => out.push_str(&html_escape(t)),
            MarkupNode::Raw(r) => out.push_str(r),
            MarkupNode::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                for (name, value) in &el.attrs {
                    let _ = write!(out, " {}=\"{}\"", name, html_escape(value));
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag) {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }

    /// Concatenated text content of this subtree.
    pub fn text_content(&self) -> String {
        match self {
            MarkupNode::Text(t) => t.clone(),
            MarkupNode::Raw(_) => String::new(),
            MarkupNode::Element(el) => el.children.iter().map(|c| c.text_content()).collect(),
        }
    }

    /// Depth-first search for the first element with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.find_all(tag).into_iter().next()
    }

    /// All elements with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect(tag, &mut found);
        found
    }

    fn collect<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        if let MarkupNode::Element(el) = self {
            if el.tag == tag {
                found.push(el);
            }
            for child in &el.children {
                child.collect(tag, found);
            }
        }
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let node: MarkupNode = Element::new("a")
            .attr("href", "?a=1&b=\"2\"")
            .text("<List[int]>")
            .into();
        assert_eq!(
            node.to_html(),
            "<a href=\"?a=1&amp;b=&quot;2&quot;\">&lt;List[int]&gt;</a>"
        );
    }

    #[test]
    fn void_elements() {
        let node: MarkupNode = Element::new("meta").attr("charset", "utf-8").into();
        assert_eq!(node.to_html(), "<meta charset=\"utf-8\">");
    }

    #[test]
    fn raw_is_verbatim() {
        let node: MarkupNode = Element::new("style")
            .child(MarkupNode::Raw("a > b {}".into()))
            .into();
        assert_eq!(node.to_html(), "<style>a > b {}</style>");
    }

    #[test]
    fn find_and_text_content() {
        let node: MarkupNode = Element::new("div")
            .child(Element::new("h1").text("Title"))
            .child(Element::new("p").text("a").child(Element::new("code").text("b")))
            .into();
        assert_eq!(node.find("h1").map(|h| h.children.len()), Some(1));
        assert_eq!(node.text_content(), "Titleab");
        assert_eq!(node.find_all("code").len(), 1);
    }
}
