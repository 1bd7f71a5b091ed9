//! Block-to-tree compiler.
//!
//! Maps each classified block onto HTML nodes and assembles the document root.

use crate::blocks::{FENCE, block_to_block_kind, markdown_to_blocks, ordered_prefix};
use crate::error::Result;
use crate::inline::text_to_spans;
use crate::node::HtmlNode;
use crate::types::{BlockKind, Span, SpanKind};

/// Convert a whole Markdown document into a `div` rooted node tree.
pub fn markdown_to_html_node(markdown: &str) -> Result<HtmlNode> {
    let normalised = markdown.replace("\r\n", "\n");
    let blocks = markdown_to_blocks(&normalised);
    log::debug!("compiling {} blocks", blocks.len());

    let mut children = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let kind = block_to_block_kind(block);
        log::trace!(
            "{kind}: {}",
            block.lines().next().unwrap_or_default()
        );
        children.push(block_to_node(kind, block)?);
    }

    Ok(HtmlNode::parent("div", children))
}

/// Compile one classified block.
pub fn block_to_node(kind: BlockKind, block: &str) -> Result<HtmlNode> {
    match kind {
        BlockKind::Heading { level } => {
            let text = block.trim_start_matches('#').trim();
            Ok(HtmlNode::parent(format!("h{level}"), text_to_children(text)?))
        }
        BlockKind::Paragraph => {
            let text = join_lines(block.split('\n'));
            Ok(HtmlNode::parent("p", text_to_children(&text)?))
        }
        BlockKind::CodeFence => Ok(code_to_node(block)),
        BlockKind::Quote => {
            let text = join_lines(
                block
                    .split('\n')
                    .map(|line| line.strip_prefix('>').unwrap_or(line)),
            );
            Ok(HtmlNode::parent("blockquote", text_to_children(&text)?))
        }
        BlockKind::UnorderedList => {
            let items = block
                .split('\n')
                .map(|line| list_item(line.strip_prefix("- ").unwrap_or(line)))
                .collect::<Result<Vec<_>>>()?;
            Ok(HtmlNode::parent("ul", items))
        }
        BlockKind::OrderedList => {
            let items = block
                .split('\n')
                .map(|line| list_item(ordered_prefix(line).map_or(line, |(_, rest)| rest)))
                .collect::<Result<Vec<_>>>()?;
            Ok(HtmlNode::parent("ol", items))
        }
    }
}

/// Tokenize a run of text and map every span onto a leaf.
pub fn text_to_children(text: &str) -> Result<Vec<HtmlNode>> {
    Ok(text_to_spans(text)?.into_iter().map(span_to_node).collect())
}

/// Fixed span to leaf mapping.
pub fn span_to_node(span: Span) -> HtmlNode {
    let url = span.url.unwrap_or_default();
    match span.kind {
        SpanKind::PlainText => HtmlNode::text(span.text),
        SpanKind::Bold => HtmlNode::leaf("b", span.text),
        SpanKind::Italic => HtmlNode::leaf("i", span.text),
        SpanKind::Code => HtmlNode::leaf("code", span.text),
        SpanKind::Link => HtmlNode::leaf("a", span.text).with_attr("href", url),
        SpanKind::Image => HtmlNode::leaf("img", "")
            .with_attr("src", url)
            .with_attr("alt", span.text),
    }
}

/// Code fences bypass the inline tokenizer.
///
/// Single-line code becomes a bare `code` leaf; anything longer gets a
/// trailing newline and a `pre` wrapper.
fn code_to_node(block: &str) -> HtmlNode {
    let inner = block.strip_prefix(FENCE).unwrap_or(block);
    let inner = inner.strip_suffix(FENCE).unwrap_or(inner);

    let code = inner.trim();

    if code.contains('\n') {
        HtmlNode::parent("pre", vec![HtmlNode::leaf("code", format!("{code}\n"))])
    } else {
        HtmlNode::leaf("code", code)
    }
}

fn list_item(text: &str) -> Result<HtmlNode> {
    Ok(HtmlNode::parent("li", text_to_children(text.trim())?))
}

/// Trim each line and join with single spaces.
fn join_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines.map(str::trim).collect::<Vec<_>>().join(" ")
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
