//! Minimal typed XML element builder used to render every package part.
//!
//! Parts are assembled as element trees and serialized in one place, so
//! escaping and nesting are always handled the same way.

use std::fmt::Write;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.push((name.into(), value.to_string()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Serialize as a standalone document with an XML declaration.
    pub fn to_document(&self) -> String {
        let mut out = String::from(DECLARATION);
        out.push('\n');
        self.write(&mut out, 0);
        out.push('\n');
        out
    }

    fn write(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        let text_only = self.children.iter().all(|c| matches!(c, Node::Text(_)));
        if text_only {
            for child in &self.children {
                if let Node::Text(text) = child {
                    out.push_str(&escape_text(text));
                }
            }
        } else {
            for child in &self.children {
                out.push('\n');
                match child {
                    Node::Element(element) => element.write(out, depth + 1),
                    Node::Text(text) => {
                        out.push_str(&"  ".repeat(depth + 1));
                        out.push_str(&escape_text(text));
                    }
                }
            }
            out.push('\n');
            out.push_str(&indent);
        }

        let _ = write!(out, "</{}>", self.name);
    }
}

/// Escape character data. Characters that XML 1.0 cannot carry are dropped.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
}

/// Format a coordinate with at most four decimals and no trailing zeros.
///
/// Keeps output stable across platforms and free of float noise such as
/// `0.30000000000000004`.
pub fn num(value: f64) -> String {
    let mut s = format!("{:.4}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_element_self_closes() {
        let el = Element::new("Cell").attr("N", "PinX").attr("V", 1.5);
        assert_eq!(
            el.to_document(),
            format!("{}\n<Cell N=\"PinX\" V=\"1.5\"/>\n", DECLARATION)
        );
    }

    #[test]
    fn test_nested_elements_are_indented() {
        let el = Element::new("Shapes")
            .child(Element::new("Shape").attr("ID", 1).child(Element::new("Text").text("a")));
        let doc = el.to_document();
        assert!(doc.contains("<Shapes>\n  <Shape ID=\"1\">\n    <Text>a</Text>\n  </Shape>\n</Shapes>"));
    }

    #[test]
    fn test_text_and_attributes_are_escaped() {
        let el = Element::new("Text")
            .attr("title", "\"quoted\" & 'single'")
            .text("a < b && c > d");
        let doc = el.to_document();
        assert!(doc.contains("title=\"&quot;quoted&quot; &amp; &apos;single&apos;\""));
        assert!(doc.contains(">a &lt; b &amp;&amp; c &gt; d</Text>"));
    }

    #[test]
    fn test_control_characters_are_dropped() {
        assert_eq!(escape_text("a\u{1}b\tc"), "ab\tc");
    }

    #[test]
    fn test_multibyte_text_passes_through() {
        assert_eq!(escape_text("前提 ログイン済み"), "前提 ログイン済み");
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(4.135), "4.135");
        assert_eq!(num(0.1 + 0.2), "0.3");
        assert_eq!(num(-0.00001), "0");
        assert_eq!(num(-1.25), "-1.25");
        assert_eq!(num(0.01), "0.01");
    }
}
