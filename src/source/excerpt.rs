use std::fs;
use std::path::{Component, Path};

use super::SourceError;

/// A window of source lines around a symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Excerpt {
    /// 1-based number of `lines[0]`.
    pub first_line: u32,
    pub lines: Vec<String>,
    /// 1-based inclusive range of the symbol itself.
    pub symbol_lines: (u32, u32),
}

impl Excerpt {
    pub fn numbered(&self) -> impl Iterator<Item = (u32, &str, bool)> {
        let (start, end) = self.symbol_lines;
        self.lines.iter().zip(self.first_line..).map(move |(line, number)| {
            (number, line.as_str(), (start..=end).contains(&number))
        })
    }
}

/// Reads lines `start..=end` of `file_path` (relative to `root`) plus
/// `context` lines on either side. Line numbers are 1-based; a missing or
/// inverted end collapses to `start`.
pub fn read_excerpt(
    root: &Path,
    file_path: &str,
    start: u32,
    end: Option<u32>,
    context: u32,
) -> Result<Excerpt, SourceError> {
    let relative = Path::new(file_path);
    if relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir))
    {
        return Err(SourceError::OutsideRoot(relative.to_path_buf()));
    }

    let path = root.join(relative);
    let raw = fs::read_to_string(&path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let start = start.max(1);
    let end = end.filter(|end| *end >= start).unwrap_or(start);
    let first_line = start.saturating_sub(context).max(1);
    let last_line = end.saturating_add(context);

    let lines = raw
        .lines()
        .skip(first_line as usize - 1)
        .take((last_line - first_line + 1) as usize)
        .map(str::to_owned)
        .collect();

    Ok(Excerpt {
        first_line,
        lines,
        symbol_lines: (start, end),
    })
}
