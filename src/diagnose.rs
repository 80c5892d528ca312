//! Diagnostic JSON parser.
//!
//! Wraps grammar parsing so malformed input comes back as structured data:
//! the parser's own diagnostic text plus, when a position is attributable,
//! a 1-based line/column pair and a caret-annotated snippet of the source.
//! Success hands the parsed value through verbatim — object keys keep their
//! source order, duplicate keys resolve last-occurrence-wins.

use serde_json::Value;
use thiserror::Error;

use crate::depth::{DepthExceeded, MAX_DEPTH};

/// Characters kept on each side of the failure offset in a snippet.
const SNIPPET_RADIUS: usize = 20;

pub type ParseOutcome = Result<Value, ParseError>;

/// Where in the source a parse failed, for direct display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLocation {
    /// 1-based line of the failure offset.
    pub line: usize,
    /// 1-based column within that line.
    pub column: usize,
    /// Window of the source around the offset, then a second line with `^`
    /// aligned under the offending character.
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Raw input was not text.
    #[error("Input must be a string.")]
    InputType,
    /// The text is not valid JSON. Location is best-effort.
    #[error("{message}")]
    Syntax {
        message: String,
        location: Option<ErrorLocation>,
    },
    #[error(transparent)]
    Depth(#[from] DepthExceeded),
}

impl ParseError {
    pub fn location(&self) -> Option<&ErrorLocation> {
        match self {
            ParseError::Syntax { location, .. } => location.as_ref(),
            _ => None,
        }
    }
}

/// Parse `source` as RFC 8259 JSON.
///
/// Never panics on malformed input: syntax problems come back as
/// [`ParseError::Syntax`], nesting deeper than [`MAX_DEPTH`] as
/// [`ParseError::Depth`].
pub fn parse(source: &str) -> ParseOutcome {
    if nesting_depth(source) > MAX_DEPTH {
        return Err(DepthExceeded.into());
    }
    match serde_json::from_str::<Value>(source) {
        Ok(value) => Ok(value),
        Err(error) => Err(syntax_error(source, &error)),
    }
}

/// Defensive entry point for byte buffers: non-UTF-8 input fails with
/// [`ParseError::InputType`] before any grammar work.
pub fn parse_bytes(source: &[u8]) -> ParseOutcome {
    match std::str::from_utf8(source) {
        Ok(text) => parse(text),
        Err(_) => Err(ParseError::InputType),
    }
}

fn syntax_error(source: &str, error: &serde_json::Error) -> ParseError {
    // line 0: serde_json could not attribute a position at all.
    // column 0: EOF before any content on the line; nothing to point at.
    let location = if error.line() > 0 && error.column() > 0 {
        char_offset(source, error.line(), error.column()).map(|offset| locate(source, offset))
    } else {
        None
    };
    ParseError::Syntax {
        message: error.to_string(),
        location,
    }
}

/// Maximum bracket nesting of `source`, ignoring brackets inside string
/// literals. Runs over the raw text, so the bound holds even for input the
/// grammar parser would reject for other reasons.
fn nesting_depth(source: &str) -> usize {
    let mut max = 0usize;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in source.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Map serde_json's (1-based line, byte column within the line) back to a
/// character offset into `source`.
fn char_offset(source: &str, line: usize, column: usize) -> Option<usize> {
    let mut line_start = 0usize;
    for _ in 1..line {
        line_start += source[line_start..].find('\n')? + 1;
    }
    let mut byte = (line_start + column - 1).min(source.len());
    while byte > 0 && !source.is_char_boundary(byte) {
        byte -= 1;
    }
    Some(source[..byte].chars().count())
}

/// Line, column and caret snippet for a character offset into `source`.
fn locate(source: &str, offset: usize) -> ErrorLocation {
    let chars: Vec<char> = source.chars().collect();
    let offset = offset.min(chars.len());

    let line = 1 + chars[..offset].iter().filter(|&&c| c == '\n').count();
    let column = match chars[..offset].iter().rposition(|&c| c == '\n') {
        Some(newline) => offset - newline,
        None => offset + 1,
    };

    let start = offset.saturating_sub(SNIPPET_RADIUS);
    let end = (offset + SNIPPET_RADIUS).min(chars.len());
    let mut snippet: String = chars[start..end].iter().collect();
    snippet.push('\n');
    snippet.push_str(&" ".repeat(offset - start));
    snippet.push('^');

    ErrorLocation {
        line,
        column,
        snippet,
    }
}
