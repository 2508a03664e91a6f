//! External tool detection.

use crate::errors::{GifWebmError, Result};
use std::path::PathBuf;

/// Resolves `program` on `PATH` (or as a literal path), failing with
/// [`GifWebmError::ToolNotFound`] when it cannot be executed.
pub fn require_tool(program: &str) -> Result<PathBuf> {
    let resolved =
        which::which(program).map_err(|_| GifWebmError::ToolNotFound(program.to_string()))?;
    tracing::debug!(tool = program, path = %resolved.display(), "External tool located");
    Ok(resolved)
}
