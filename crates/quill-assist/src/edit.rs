use std::collections::BTreeMap;

use quill_types::{FileId, Span};
use thiserror::Error;

/// A single file edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub file: FileId,
    pub range: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(file: FileId, offset: usize, text: impl Into<String>) -> Self {
        Self {
            file,
            range: Span::empty(offset),
            replacement: text.into(),
        }
    }

    pub fn replace(file: FileId, range: Span, text: impl Into<String>) -> Self {
        Self {
            file,
            range,
            replacement: text.into(),
        }
    }
}

/// A set of edits across potentially multiple files.
///
/// The edits are expected to be normalized (sorted, deduplicated,
/// non-overlapping) before being applied or converted to LSP.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceEdit {
    pub edits: Vec<TextEdit>,
}

impl WorkspaceEdit {
    pub fn new(edits: Vec<TextEdit>) -> Self {
        Self { edits }
    }

    /// Returns edits grouped by file in deterministic order.
    pub fn edits_by_file(&self) -> BTreeMap<&FileId, Vec<&TextEdit>> {
        let mut map: BTreeMap<&FileId, Vec<&TextEdit>> = BTreeMap::new();
        for edit in &self.edits {
            map.entry(&edit.file).or_default().push(edit);
        }
        for edits in map.values_mut() {
            edits.sort_by(|a, b| {
                a.range
                    .start
                    .cmp(&b.range.start)
                    .then_with(|| a.range.end.cmp(&b.range.end))
            });
        }
        map
    }

    /// Normalize edits (sort, deduplicate, and validate non-overlap).
    pub fn normalize(&mut self) -> Result<(), EditError> {
        self.edits.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then_with(|| a.range.start.cmp(&b.range.start))
                .then_with(|| a.range.end.cmp(&b.range.end))
                .then_with(|| a.replacement.cmp(&b.replacement))
        });

        // Exact duplicates are redundant.
        self.edits
            .dedup_by(|a, b| a.file == b.file && a.range == b.range && a.replacement == b.replacement);

        // Merge multiple inserts at the same position so the edit set stays
        // deterministic when applied in any order.
        let mut merged: Vec<TextEdit> = Vec::with_capacity(self.edits.len());
        for edit in self.edits.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.file == edit.file && last.range == edit.range && last.range.is_empty() {
                    last.replacement.push_str(&edit.replacement);
                    continue;
                }

                if last.file == edit.file && last.range == edit.range {
                    return Err(EditError::OverlappingEdits {
                        file: edit.file,
                        first: last.range,
                        second: edit.range,
                    });
                }
            }
            merged.push(edit);
        }

        self.edits = merged;

        // Validate non-overlap per file.
        let mut current_file: Option<&FileId> = None;
        let mut prev: Option<Span> = None;
        for edit in &self.edits {
            if current_file.map(|f| f != &edit.file).unwrap_or(true) {
                current_file = Some(&edit.file);
                prev = None;
            }

            if let Some(prev_range) = prev {
                if edit.range.start < prev_range.end {
                    return Err(EditError::OverlappingEdits {
                        file: edit.file.clone(),
                        first: prev_range,
                        second: edit.range,
                    });
                }
            }

            prev = Some(edit.range);
        }

        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("overlapping edits in {file:?}: {first:?} overlaps {second:?}")]
    OverlappingEdits {
        file: FileId,
        first: Span,
        second: Span,
    },
    #[error("text edit range {range:?} is outside the file bounds (len={len}) in {file:?}")]
    OutOfBounds {
        file: FileId,
        range: Span,
        len: usize,
    },
    #[error("unknown file {0:?}")]
    UnknownFile(FileId),
}

/// Apply a set of edits to `original` and return the modified text.
///
/// The input edits must be non-overlapping and valid for the `original` text.
pub fn apply_text_edits(original: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(original.to_string());
    }

    let mut sorted = edits.to_vec();
    sorted.sort_by(|a, b| {
        b.range
            .start
            .cmp(&a.range.start)
            .then_with(|| b.range.end.cmp(&a.range.end))
    });

    let mut out = original.to_string();
    for edit in sorted {
        let len = out.len();
        if edit.range.end > len {
            return Err(EditError::OutOfBounds {
                file: edit.file,
                range: edit.range,
                len,
            });
        }

        out.replace_range(edit.range.start..edit.range.end, &edit.replacement);
    }

    Ok(out)
}

/// Apply a [`WorkspaceEdit`] to a snapshot of file contents.
pub fn apply_workspace_edit(
    files: &BTreeMap<FileId, String>,
    edit: &WorkspaceEdit,
) -> Result<BTreeMap<FileId, String>, EditError> {
    let mut out = files.clone();
    for (file, edits) in edit.edits_by_file() {
        let original = files
            .get(file)
            .ok_or_else(|| EditError::UnknownFile(file.clone()))?;
        let edits: Vec<TextEdit> = edits.into_iter().cloned().collect();
        out.insert(file.clone(), apply_text_edits(original, &edits)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file() -> FileId {
        FileId::new("A.java")
    }

    #[test]
    fn applies_edits_back_to_front() {
        let edits = vec![
            TextEdit::replace(file(), Span::new(0, 3), "left"),
            TextEdit::replace(file(), Span::new(4, 9), "right"),
        ];
        assert_eq!(apply_text_edits("abc\nvwxyz", &edits).unwrap(), "left\nright");
    }

    #[test]
    fn normalize_rejects_overlap() {
        let mut edit = WorkspaceEdit::new(vec![
            TextEdit::replace(file(), Span::new(0, 5), "x"),
            TextEdit::replace(file(), Span::new(3, 8), "y"),
        ]);
        assert!(matches!(
            edit.normalize(),
            Err(EditError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn normalize_merges_inserts_at_same_offset() {
        let mut edit = WorkspaceEdit::new(vec![
            TextEdit::insert(file(), 2, "a"),
            TextEdit::insert(file(), 2, "b"),
        ]);
        edit.normalize().unwrap();
        assert_eq!(edit.edits.len(), 1);
        assert_eq!(edit.edits[0].replacement, "ab");
    }
}
