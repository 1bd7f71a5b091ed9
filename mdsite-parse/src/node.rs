//! HTML node tree.
//!
//! A tree is made of leaves (a value with an optional tag) and parents (a tag
//! with children). Parents own their children outright, so the tree cannot
//! contain cycles or shared nodes.
//!
//! Text is emitted verbatim. Nothing is HTML-escaped, so output built from
//! untrusted Markdown must not be served as-is.

use serde::Serialize;

use crate::error::{Error, Result};

/// Elements that never take a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Attribute list that keeps insertion order for deterministic output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render as ` key="value"` pairs; empty string when there are none.
    pub fn to_html(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!(" {k}=\"{v}\""))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// A node in the HTML tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum HtmlNode {
    Leaf {
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        value: Option<String>,
        #[serde(skip_serializing_if = "Attributes::is_empty")]
        attrs: Attributes,
    },
    Parent {
        tag: Option<String>,
        children: Vec<HtmlNode>,
        #[serde(skip_serializing_if = "Attributes::is_empty")]
        attrs: Attributes,
    },
}

impl HtmlNode {
    /// Untagged leaf that renders as its raw value.
    pub fn text(value: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: None,
            value: Some(value.into()),
            attrs: Attributes::new(),
        }
    }

    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: Some(tag.into()),
            value: Some(value.into()),
            attrs: Attributes::new(),
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Parent {
            tag: Some(tag.into()),
            children,
            attrs: Attributes::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self {
            HtmlNode::Leaf { attrs, .. } | HtmlNode::Parent { attrs, .. } => {
                attrs.insert(key, value)
            }
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf { tag, .. } | HtmlNode::Parent { tag, .. } => tag.as_deref(),
        }
    }

    pub fn children(&self) -> &[HtmlNode] {
        match self {
            HtmlNode::Leaf { .. } => &[],
            HtmlNode::Parent { children, .. } => children,
        }
    }

    /// Serialize this node and everything under it.
    pub fn to_html(&self) -> Result<String> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    fn write_html(&self, out: &mut String) -> Result<()> {
        match self {
            HtmlNode::Leaf { tag, value, attrs } => {
                let value = value.as_deref().ok_or(Error::MissingValue)?;
                match tag {
                    None => out.push_str(value),
                    Some(tag) if value.is_empty() && VOID_ELEMENTS.contains(&tag.as_str()) => {
                        out.push_str(&format!("<{tag}{}>", attrs.to_html()));
                    }
                    Some(tag) => {
                        out.push_str(&format!("<{tag}{}>{value}</{tag}>", attrs.to_html()));
                    }
                }
            }
            HtmlNode::Parent {
                tag,
                children,
                attrs,
            } => {
                let tag = tag.as_deref().ok_or(Error::MissingTag)?;
                if children.is_empty() {
                    return Err(Error::MissingChildren {
                        tag: tag.to_string(),
                    });
                }
                out.push_str(&format!("<{tag}{}>", attrs.to_html()));
                for child in children {
                    child.write_html(out)?;
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
        Ok(())
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
