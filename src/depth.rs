//! Explicit nesting bound shared by the parser, the inference engine, and
//! the printer.

use thiserror::Error;

/// Maximum container nesting accepted anywhere in the pipeline.
///
/// Kept below serde_json's own recursion limit (128) so pathological input
/// surfaces as [`DepthExceeded`] rather than the parser's generic
/// "recursion limit exceeded" diagnostic.
pub const MAX_DEPTH: usize = 64;

/// Nesting went past [`MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("input exceeds the maximum supported nesting depth of {}", MAX_DEPTH)]
pub struct DepthExceeded;
