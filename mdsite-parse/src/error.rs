use crate::types::SpanKind;

/// Errors raised while converting a Markdown document to HTML.
///
/// Conversion never recovers internally: the first error aborts the document
/// and no partial HTML is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unbalanced delimiter: found an odd number of `{delimiter}` for {kind}")]
    UnbalancedDelimiter { kind: SpanKind, delimiter: String },

    #[error("Invalid delimiter: delimiter for {kind} must be `{expected}`")]
    InvalidDelimiter { kind: SpanKind, expected: &'static str },

    #[error("Span kind '{kind}' cannot be split on a delimiter")]
    UnsupportedSpanKind { kind: SpanKind },

    #[error("Parent node has no tag")]
    MissingTag,

    #[error("Parent node <{tag}> has no children")]
    MissingChildren { tag: String },

    #[error("Leaf node has no value")]
    MissingValue,

    #[error("Document has no level-1 heading to use as a title")]
    MissingTitle,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
