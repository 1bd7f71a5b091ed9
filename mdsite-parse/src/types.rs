use std::fmt;

use serde::Serialize;

/// The kind of an inline span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    PlainText,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

impl SpanKind {
    /// The delimiter that encloses this kind in Markdown source, for the kinds
    /// that are written with a symmetric delimiter pair.
    pub fn delimiter(self) -> Option<&'static str> {
        match self {
            SpanKind::Code => Some("`"),
            SpanKind::Bold => Some("**"),
            SpanKind::Italic => Some("_"),
            SpanKind::PlainText | SpanKind::Link | SpanKind::Image => None,
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpanKind::PlainText => "text",
            SpanKind::Bold => "bold",
            SpanKind::Italic => "italic",
            SpanKind::Code => "code",
            SpanKind::Link => "link",
            SpanKind::Image => "image",
        };
        f.write_str(name)
    }
}

/// One typed, contiguous unit of inline content.
///
/// `url` is only ever set for [`SpanKind::Link`] and [`SpanKind::Image`].
/// For those two kinds `text` holds the link text or the image alt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Span {
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            url: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(SpanKind::PlainText, text)
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: SpanKind::Link,
            text: text.into(),
            url: Some(url.into()),
        }
    }

    pub fn image(alt: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: SpanKind::Image,
            text: alt.into(),
            url: Some(url.into()),
        }
    }

    /// Only plain text spans are revisited by later tokenizer passes.
    pub fn is_plain(&self) -> bool {
        self.kind == SpanKind::PlainText
    }
}

/// Structural kind of a top-level document block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BlockKind {
    /// ATX heading; `level` is always in `1..=6`.
    Heading { level: u8 },
    CodeFence,
    Quote,
    UnorderedList,
    OrderedList,
    Paragraph,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Heading { level } => write!(f, "heading{level}"),
            BlockKind::CodeFence => f.write_str("code"),
            BlockKind::Quote => f.write_str("quote"),
            BlockKind::UnorderedList => f.write_str("unordered_list"),
            BlockKind::OrderedList => f.write_str("ordered_list"),
            BlockKind::Paragraph => f.write_str("paragraph"),
        }
    }
}
