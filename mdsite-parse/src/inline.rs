//! Inline span tokenizer.
//!
//! Turns one run of text into an ordered sequence of typed [`Span`]s. Each
//! pass takes the current sequence and returns a new one; only plain text
//! spans are split further, everything else passes through untouched.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::types::{Span, SpanKind};

static IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();
static LINK_REGEX: OnceLock<Regex> = OnceLock::new();

/// `![alt](url)` with non-greedy alt and url.
fn image_regex() -> &'static Regex {
    IMAGE_REGEX.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("Failed to compile image regex"))
}

/// `[text](url)`, optionally preceded by `!`.
///
/// The regex crate has no lookbehind, so the `!` is captured and matches that
/// carry it are treated as image syntax by the callers.
fn link_regex() -> &'static Regex {
    LINK_REGEX.get_or_init(|| Regex::new(r"(!?)\[(.*?)\]\((.*?)\)").expect("Failed to compile link regex"))
}

/// Tokenize `text` into spans.
///
/// Passes run in a fixed order: code, bold, italic, images, links. Text with
/// none of these constructs yields a single plain text span equal to `text`.
pub fn text_to_spans(text: &str) -> Result<Vec<Span>> {
    let spans = vec![Span::plain(text)];
    let spans = split_delimiter(spans, "`", SpanKind::Code)?;
    let spans = split_delimiter(spans, "**", SpanKind::Bold)?;
    let spans = split_delimiter(spans, "_", SpanKind::Italic)?;
    let spans = split_images(spans);
    Ok(split_links(spans))
}

/// Split every plain text span on `delimiter`, turning each enclosed run into
/// a span of `kind`.
///
/// The segment in front of each pair is always emitted, even when empty; the
/// trailing remainder is only emitted when non-empty. An odd number of
/// delimiters in a span is an error rather than literal text.
pub fn split_delimiter(spans: Vec<Span>, delimiter: &str, kind: SpanKind) -> Result<Vec<Span>> {
    let Some(expected) = kind.delimiter() else {
        return Err(Error::UnsupportedSpanKind { kind });
    };
    if delimiter != expected {
        return Err(Error::InvalidDelimiter { kind, expected });
    }

    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        if !span.is_plain() || !span.text.contains(delimiter) {
            out.push(span);
            continue;
        }

        let pieces: Vec<&str> = span.text.split(delimiter).collect();
        // n delimiters produce n + 1 pieces; balanced pairs leave an odd count.
        if pieces.len() % 2 == 0 {
            return Err(Error::UnbalancedDelimiter {
                kind,
                delimiter: delimiter.to_string(),
            });
        }

        let last = pieces.len() - 1;
        for (i, piece) in pieces.into_iter().enumerate() {
            if i % 2 == 1 {
                out.push(Span::new(kind, piece));
            } else if i < last || !piece.is_empty() {
                out.push(Span::plain(piece));
            }
        }
    }

    Ok(out)
}

/// All `![alt](url)` occurrences in `text`, as `(alt, url)` pairs.
pub fn extract_images(text: &str) -> Vec<(String, String)> {
    image_regex()
        .captures_iter(text)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

/// All `[text](url)` occurrences in `text` that are not image syntax.
pub fn extract_links(text: &str) -> Vec<(String, String)> {
    link_regex()
        .captures_iter(text)
        .filter(|c| c[1].is_empty())
        .map(|c| (c[2].to_string(), c[3].to_string()))
        .collect()
}

/// Pull image syntax out of plain text spans.
pub fn split_images(spans: Vec<Span>) -> Vec<Span> {
    split_matches(spans, image_regex(), |caps| {
        Some(Span::image(&caps[1], &caps[2]))
    })
}

/// Pull link syntax out of plain text spans, leaving image syntax in place.
pub fn split_links(spans: Vec<Span>) -> Vec<Span> {
    split_matches(spans, link_regex(), |caps| {
        if caps[1].is_empty() {
            Some(Span::link(&caps[2], &caps[3]))
        } else {
            None
        }
    })
}

/// Shared left-to-right extraction for links and images.
///
/// `to_span` returns `None` for a match that should stay as literal text.
fn split_matches<F>(spans: Vec<Span>, re: &Regex, to_span: F) -> Vec<Span>
where
    F: Fn(&regex::Captures<'_>) -> Option<Span>,
{
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        if !span.is_plain() {
            out.push(span);
            continue;
        }

        let text = span.text.as_str();
        let mut cursor = 0;
        let mut found = false;

        for caps in re.captures_iter(text) {
            let Some(new_span) = to_span(&caps) else {
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push(Span::plain(&text[cursor..whole.start()]));
            out.push(new_span);
            cursor = whole.end();
            found = true;
        }

        if !found {
            out.push(span);
        } else if cursor < text.len() {
            out.push(Span::plain(&text[cursor..]));
        }
    }

    out
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
