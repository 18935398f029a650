//! Idempotent line append for shell profile files.
use anyhow::{Context, Result};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Some existing line already contains the text; nothing was written.
    AlreadyPresent,
    Appended,
}

impl fmt::Display for AppendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppendOutcome::AlreadyPresent => f.write_str("already present"),
            AppendOutcome::Appended => f.write_str("appended"),
        }
    }
}

/// Append `line` to the profile at `path` unless an existing line contains it.
///
/// The file is created when absent. Read-then-append is not synchronized
/// against other writers.
pub fn append_line_once(path: &Path, line: &str) -> Result<AppendOutcome> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("open profile {}", path.display()))?;
    let mut existing = String::new();
    file.read_to_string(&mut existing)
        .with_context(|| format!("read profile {}", path.display()))?;
    if existing.lines().any(|current| current.contains(line)) {
        return Ok(AppendOutcome::AlreadyPresent);
    }

    let mut text = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(line);
    text.push('\n');
    file.write_all(text.as_bytes())
        .with_context(|| format!("write profile {}", path.display()))?;
    Ok(AppendOutcome::Appended)
}
