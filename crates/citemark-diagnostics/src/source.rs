//! Source locations for diagnostics.
//!
//! Style files are small and never transformed before parsing, so a location
//! is simply a file id plus a byte range with precomputed row/column data.

use serde::{Deserialize, Serialize};

/// A unique identifier for a source file registered in a [`SourceContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// A location in source text (0-indexed)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

/// A range in source text from start to end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

/// Where in which file a diagnostic applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub file_id: FileId,
    pub range: Range,
}

impl SourceInfo {
    pub fn new(file_id: FileId, range: Range) -> Self {
        SourceInfo { file_id, range }
    }

    /// Build a location from byte offsets into `source`.
    ///
    /// Offsets past the end of `source` are clamped to its length.
    pub fn from_offsets(file_id: FileId, source: &str, start: usize, end: usize) -> Self {
        let end = end.min(source.len());
        let start = start.min(end);
        let start = offset_to_location(source, start).unwrap_or_default();
        let end = offset_to_location(source, end).unwrap_or(start);
        SourceInfo {
            file_id,
            range: Range { start, end },
        }
    }

    /// 1-indexed `row:column` of the start of this location.
    pub fn display_position(&self) -> String {
        format!("{}:{}", self.range.start.row + 1, self.range.start.column + 1)
    }
}

/// A source file with its path and, for in-memory sources, its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path or identifier
    pub path: String,
    /// File content. When `None`, content is read from `path` on demand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SourceFile {
    /// The file's text, reading from disk for disk-backed files.
    pub fn text(&self) -> Option<String> {
        match &self.content {
            Some(c) => Some(c.clone()),
            None => std::fs::read_to_string(&self.path).ok(),
        }
    }
}

/// Context for managing source files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

impl SourceContext {
    pub fn new() -> Self {
        SourceContext { files: Vec::new() }
    }

    /// Add a file to the context and return its ID.
    ///
    /// With `content` the file is in-memory; without it the content is read
    /// from `path` when a diagnostic needs to show a snippet.
    pub fn add_file(&mut self, path: String, content: Option<String>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile { path, content });
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }
}

/// Convert a byte offset to a Location with line and column info
///
/// Returns None if the offset is out of bounds.
pub fn offset_to_location(source: &str, offset: usize) -> Option<Location> {
    if offset > source.len() {
        return None;
    }

    let mut row = 0;
    let mut column = 0;

    for (idx, ch) in source.char_indices() {
        if idx >= offset {
            break;
        }
        if ch == '\n' {
            row += 1;
            column = 0;
        } else {
            column += 1;
        }
    }

    Some(Location {
        offset,
        row,
        column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_location() {
        let source = "NAME\nMy style\n";
        let loc = offset_to_location(source, 8).unwrap();
        assert_eq!(loc.row, 1);
        assert_eq!(loc.column, 3);
        assert!(offset_to_location(source, 100).is_none());
    }

    #[test]
    fn test_offset_to_location_multibyte() {
        let source = "ö\nx";
        let loc = offset_to_location(source, 3).unwrap();
        assert_eq!(loc.row, 1);
        assert_eq!(loc.column, 0);
    }

    #[test]
    fn test_from_offsets_clamps() {
        let info = SourceInfo::from_offsets(FileId(0), "abc", 1, 99);
        assert_eq!(info.range.start.offset, 1);
        assert_eq!(info.range.end.offset, 3);
        assert_eq!(info.display_position(), "1:2");
    }

    #[test]
    fn test_source_context_files() {
        let mut ctx = SourceContext::new();
        let id = ctx.add_file("a.jstyle".to_string(), Some("NAME".to_string()));
        assert_eq!(id, FileId(0));
        let file = ctx.get_file(id).unwrap();
        assert_eq!(file.text().as_deref(), Some("NAME"));
        assert!(ctx.get_file(FileId(1)).is_none());
    }
}
