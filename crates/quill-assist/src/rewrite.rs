//! Deferred rewrite log.
//!
//! Synthesis stages record node replacements, statement insertions, and
//! pending imports here; nothing touches source text until the log is turned
//! into a [`WorkspaceEdit`] and applied by the caller.

use std::collections::BTreeSet;

use quill_types::{FileId, Span};

use crate::edit::{TextEdit, WorkspaceEdit};
use crate::imports::ImportSite;

/// Optional grouping tag for edits, for callers that label edit previews.
///
/// The assist core always passes `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditGroup(pub String);

#[derive(Clone, Debug)]
enum RewriteOp {
    Replace { range: Span, text: String },
    Insert { offset: usize, text: String },
}

/// Accumulator of rewrite operations against a single file.
#[derive(Debug)]
pub struct RewriteLog {
    file: FileId,
    ops: Vec<(RewriteOp, Option<EditGroup>)>,
    pending_imports: BTreeSet<String>,
}

impl RewriteLog {
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            ops: Vec::new(),
            pending_imports: BTreeSet::new(),
        }
    }

    pub fn file(&self) -> &FileId {
        &self.file
    }

    /// Replace the text at `range` with `text`.
    pub fn replace(&mut self, range: Span, text: String, group: Option<EditGroup>) {
        self.ops.push((RewriteOp::Replace { range, text }, group));
    }

    /// Insert `text` immediately before the sibling starting at `offset`.
    pub fn insert_before(&mut self, offset: usize, text: String, group: Option<EditGroup>) {
        self.ops.push((RewriteOp::Insert { offset, text }, group));
    }

    /// Insert `text` as the last element of a list ending at `offset`.
    pub fn insert_last(&mut self, offset: usize, text: String, group: Option<EditGroup>) {
        self.ops.push((RewriteOp::Insert { offset, text }, group));
    }

    /// Record that `qualified` must be importable at the edit location.
    ///
    /// Duplicates collapse; the import is materialized on commit.
    pub fn add_import(&mut self, qualified: impl Into<String>) {
        self.pending_imports.insert(qualified.into());
    }

    pub fn pending_imports(&self) -> impl Iterator<Item = &str> {
        self.pending_imports.iter().map(String::as_str)
    }

    /// Turn the accumulated operations into a [`WorkspaceEdit`].
    ///
    /// Pending imports become a single insertion at the file's import site.
    pub fn into_workspace_edit(self, import_site: &ImportSite) -> WorkspaceEdit {
        let mut edits = Vec::with_capacity(self.ops.len() + 1);
        for (op, _group) in self.ops {
            match op {
                RewriteOp::Replace { range, text } => {
                    edits.push(TextEdit::replace(self.file.clone(), range, text));
                }
                RewriteOp::Insert { offset, text } => {
                    edits.push(TextEdit::insert(self.file.clone(), offset, text));
                }
            }
        }

        if !self.pending_imports.is_empty() {
            let text = import_site.render(self.pending_imports.iter().map(String::as_str));
            edits.push(TextEdit::insert(self.file.clone(), import_site.offset(), text));
        }

        WorkspaceEdit::new(edits)
    }
}
