//! Hierarchy-switch completion for Java sources.
//!
//! Given a cursor on a `switch` whose subject dispatches over a
//! `@Hierarchy`-annotated class hierarchy, `hierarchy_switch_assists`
//! offers workspace edits that regenerate the switch with one case per
//! declared kind: each case downcasts the receiver to the kind's type and
//! ends in a `return` or `break`, optionally followed by a `throw` for
//! kinds no case matched.

pub mod config;
pub mod edit;
pub mod imports;
pub mod kinds;
pub mod locate;
pub mod lsp;
pub mod plan;
pub mod proposal;
pub mod rewrite;
pub mod semantic;
pub mod synth;

pub use edit::{apply_text_edits, apply_workspace_edit, EditError, TextEdit, WorkspaceEdit};
pub use lsp::{proposal_to_code_action, workspace_edit_to_lsp, LspConversionError};
pub use proposal::Proposal;
pub use semantic::{AssistDatabase, Semantics, SourceWorkspace};
pub use quill_types::{FileId, Span};

use config::resolve_hierarchy_config;
use imports::import_site;
use kinds::enumerate_kinds;
use locate::locate_switch;
use plan::plan_insertion;
use proposal::{BREAK_LABEL, BREAK_RELEVANCE, RETURN_LABEL, RETURN_RELEVANCE};
use rewrite::RewriteLog;
use synth::{return_context, synthesize_switch, CaseTerminator};

/// Compute the hierarchy-switch proposals for a selection in `file`.
///
/// Returns an empty vector whenever the selection, the workspace, or the
/// annotations make the assist inapplicable; the reasons are logged at
/// debug level rather than surfaced to the user.
pub fn hierarchy_switch_assists(
    db: &dyn AssistDatabase,
    file: &FileId,
    selection: Span,
) -> Vec<Proposal> {
    let Some(source) = db.file_text(file) else {
        tracing::debug!(%file, "file not in workspace");
        return Vec::new();
    };
    let tree = match quill_parse::parse_java(source) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::debug!(%file, error = %err, "could not parse file");
            return Vec::new();
        }
    };
    let Some(target) = locate_switch(tree.root_node(), selection) else {
        return Vec::new();
    };

    let sema = Semantics::new(db);
    let Some(config) = resolve_hierarchy_config(&sema, file, source, &target) else {
        return Vec::new();
    };
    let Some(variants) = enumerate_kinds(&config) else {
        return Vec::new();
    };

    let returns_value = return_context(target.node, source).returns_value();
    let site = import_site(source);

    let flavors = [
        (
            RETURN_LABEL,
            RETURN_RELEVANCE,
            CaseTerminator::Return {
                with_value: returns_value,
            },
        ),
        (BREAK_LABEL, BREAK_RELEVANCE, CaseTerminator::Break),
    ];

    let mut proposals = Vec::with_capacity(flavors.len());
    for (label, relevance, terminator) in flavors {
        let with_fallback = terminator.wants_fallback() && config.unmatched.is_some();
        let plan = plan_insertion(target.node, source, with_fallback);
        let mut log = RewriteLog::new(file.clone());
        let synthesized = synthesize_switch(
            &sema,
            file,
            source,
            &config,
            &variants,
            &plan.switch_indent(),
            terminator,
            with_fallback,
            &mut log,
        );
        plan.apply(&mut log, synthesized.switch_text, synthesized.fallback_text);

        let mut edit = log.into_workspace_edit(&site);
        // All edits come from disjoint rewrite targets; overlap is a bug.
        edit.normalize().expect("synthesized edits overlap");
        proposals.push(Proposal::new(label, relevance, edit));
    }
    proposals
}
