//! Block segmentation and classification.
//!
//! `markdown_to_blocks` cuts a document into block strings on blank lines,
//! and `block_to_block_kind` assigns each one a [`BlockKind`].

use crate::types::BlockKind;

/// Opening and closing marker of a fenced code block.
pub const FENCE: &str = "```";

/// Split a document into trimmed, non-empty blocks.
///
/// A boundary is any run of one or more blank (whitespace-only) lines. Lines
/// inside a block are kept verbatim, joined with `\n`.
pub fn markdown_to_blocks(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in markdown.split('\n') {
        if line.trim().is_empty() {
            push_block(&mut blocks, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_block(&mut blocks, &current);

    blocks
}

fn push_block(blocks: &mut Vec<String>, lines: &[&str]) {
    let block = lines.join("\n");
    let trimmed = block.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
}

/// Classify one block. First match wins:
/// heading, code fence, quote, unordered list, ordered list, paragraph.
///
/// Quote and list checks look at every line; one non-conforming line demotes
/// the whole block to a paragraph.
pub fn block_to_block_kind(block: &str) -> BlockKind {
    if let Some(level) = heading_level(block) {
        return BlockKind::Heading { level };
    }
    if is_code_fence(block) {
        return BlockKind::CodeFence;
    }
    if block.split('\n').all(|line| line.starts_with("> ")) {
        return BlockKind::Quote;
    }
    if block.split('\n').all(|line| line.starts_with("- ")) {
        return BlockKind::UnorderedList;
    }
    if is_ordered_list(block) {
        return BlockKind::OrderedList;
    }
    BlockKind::Paragraph
}

/// Level of a single-line ATX heading (`# ` through `###### `).
fn heading_level(block: &str) -> Option<u8> {
    if block.contains('\n') {
        return None;
    }
    let hashes = block.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    if block[hashes..].starts_with(' ') {
        Some(hashes as u8)
    } else {
        None
    }
}

/// A block is a code fence when it both opens and closes with the marker.
fn is_code_fence(block: &str) -> bool {
    block.len() >= FENCE.len() * 2 && block.starts_with(FENCE) && block.ends_with(FENCE)
}

/// Every line must carry `N. ` with `N` counting 1, 2, 3, … without gaps.
fn is_ordered_list(block: &str) -> bool {
    block
        .split('\n')
        .enumerate()
        .all(|(i, line)| ordered_prefix(line).is_some_and(|(n, _)| n == i + 1))
}

/// Split an ordered list line into its ordinal and the text after `N. `.
pub(crate) fn ordered_prefix(line: &str) -> Option<(usize, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix(". ")?;
    let n = line[..digits].parse().ok()?;
    Some((n, rest))
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
