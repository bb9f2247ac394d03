//! Hierarchy metadata resolution.
//!
//! Turns the `@Hierarchy` decorator attached to the subject's type (or to
//! the method producing the subject's enum value) into a validated,
//! immutable [`HierarchyConfig`]. Every validation failure here means "no
//! applicable proposal" and is reported only on the debug log.

use quill_parse::{node_text, ParsedAnnotation};
use quill_types::FileId;
use tree_sitter::Node;

use crate::locate::SwitchTarget;
use crate::semantic::{
    resolve_expr_type, resolve_invocation, Semantics, TypeDecl, TypeDeclKind,
};

pub const HIERARCHY_ANNOTATION: &str = "Hierarchy";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchMode {
    /// `receiver.member()`
    Method,
    /// `receiver.member`
    Field,
    /// The switch subject already is the dispatch value.
    External,
}

/// Validated hierarchy configuration for one candidate switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchyConfig {
    pub member_name: String,
    pub mode: DispatchMode,
    /// Exception type for the optional trailing `throw`.
    pub unmatched: Option<TypeDecl>,
    /// The enumeration listing the hierarchy's kinds.
    pub kind_enum: TypeDecl,
    /// Source text of the expression the downcasts apply to.
    pub receiver: String,
    /// Source text of the original switch subject.
    pub subject: String,
}

/// Resolve the hierarchy configuration for a located switch.
pub fn resolve_hierarchy_config(
    sema: &Semantics<'_>,
    file: &FileId,
    source: &str,
    target: &SwitchTarget<'_>,
) -> Option<HierarchyConfig> {
    let subject_type = resolve_expr_type(sema, file, source, target.subject)?;
    tracing::debug!(ty = %subject_type, "type of switch subject");
    let subject_decl = sema.resolve_type(&subject_type, file)?;
    let subject_text = node_text(source, target.subject).to_string();

    if subject_decl.is_enum() {
        // An enum cannot be the base of a class hierarchy, so the subject
        // has to be a call to an external dispatch method.
        resolve_external(sema, file, source, target.subject, &subject_decl, subject_text)
    } else {
        resolve_on_type(sema, file, &subject_decl, subject_text)
    }
}

fn resolve_external(
    sema: &Semantics<'_>,
    file: &FileId,
    source: &str,
    subject: Node<'_>,
    subject_decl: &TypeDecl,
    subject_text: String,
) -> Option<HierarchyConfig> {
    if subject.kind() != "method_invocation" {
        tracing::debug!("enum-typed switch subject is not a method invocation");
        return None;
    }
    let (owner, method) = resolve_invocation(sema, file, source, subject)?;
    let annotation = find_hierarchy_annotation(&method.annotations)?;

    let args = subject.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let args: Vec<Node<'_>> = args.named_children(&mut cursor).collect();
    if args.len() != 1 {
        tracing::debug!("external dispatch method must take exactly one argument");
        return None;
    }
    let receiver = node_text(source, args[0]).to_string();

    let resolved = resolve_members(sema, &owner.file, annotation)?;
    if !resolved.member_name.is_empty() {
        tracing::warn!(
            method = %method.name,
            "decorator value should be \"\" when attached to an external dispatcher"
        );
    }

    let kind_enum_ty = method.return_type.as_deref()?;
    let kind_enum = require_enum(sema, &owner.file, kind_enum_ty)?;
    if kind_enum.name != subject_decl.name {
        tracing::debug!("dispatcher return type does not match the subject's enum type");
    }

    Some(HierarchyConfig {
        member_name: resolved.member_name,
        mode: DispatchMode::External,
        unmatched: resolved.unmatched,
        kind_enum,
        receiver,
        subject: subject_text,
    })
}

fn resolve_on_type(
    sema: &Semantics<'_>,
    file: &FileId,
    subject_decl: &TypeDecl,
    subject_text: String,
) -> Option<HierarchyConfig> {
    let annotation = find_hierarchy_annotation(&subject_decl.annotations)?;
    let resolved = resolve_members(sema, file, annotation)?;

    let mode = if resolved.field {
        DispatchMode::Field
    } else {
        DispatchMode::Method
    };

    let kind_enum_ty = match mode {
        DispatchMode::Method => {
            let Some(method) = subject_decl.method_named(&resolved.member_name) else {
                tracing::debug!(member = %resolved.member_name, "specified method not found");
                return None;
            };
            method.return_type.clone()?
        }
        DispatchMode::Field => {
            let Some(field) = subject_decl.field_named(&resolved.member_name) else {
                tracing::debug!(member = %resolved.member_name, "specified field not found");
                return None;
            };
            field.ty.clone()
        }
        DispatchMode::External => unreachable!(),
    };

    let kind_enum = require_enum(sema, &subject_decl.file, &kind_enum_ty)?;

    Some(HierarchyConfig {
        member_name: resolved.member_name,
        mode,
        unmatched: resolved.unmatched,
        kind_enum,
        receiver: subject_text.clone(),
        subject: subject_text,
    })
}

/// First `@Hierarchy` wins; extra ones would be meaningless anyway.
fn find_hierarchy_annotation(annotations: &[ParsedAnnotation]) -> Option<&ParsedAnnotation> {
    let found = annotations
        .iter()
        .find(|ann| ann.simple_name == HIERARCHY_ANNOTATION);
    if found.is_none() {
        tracing::debug!("no @Hierarchy decorator on binding");
    }
    found
}

struct ResolvedMembers {
    member_name: String,
    field: bool,
    unmatched: Option<TypeDecl>,
}

/// Interpret the decorator's members, honoring defaults declared on the
/// `@interface` itself when the use site omits a member.
fn resolve_members(
    sema: &Semantics<'_>,
    file: &FileId,
    annotation: &ParsedAnnotation,
) -> Option<ResolvedMembers> {
    let annotation_decl = sema
        .resolve_type(&annotation.simple_name, file)
        .filter(|decl| decl.kind == TypeDeclKind::Annotation);
    let default_of = |member: &str| -> Option<String> {
        annotation_decl
            .as_ref()
            .and_then(|decl| decl.element_named(member))
            .and_then(|element| element.default_value.clone())
    };

    let Some(member_name) = annotation
        .arg("value")
        .map(str::to_string)
        .or_else(|| default_of("value"))
    else {
        tracing::debug!("decorator has no 'value' member");
        return None;
    };

    let field = match annotation.arg("field") {
        Some("true") => true,
        Some("false") => false,
        Some(other) => {
            tracing::warn!(value = %other, "ignored non-boolean 'field' member");
            false
        }
        None => matches!(default_of("field").as_deref(), Some("true")),
    };

    let unmatched_raw = annotation
        .arg("unmatched")
        .map(str::to_string)
        .or_else(|| default_of("unmatched"));
    let unmatched = match unmatched_raw {
        None => None,
        Some(raw) => Some(validate_unmatched(sema, file, &raw)?),
    };

    Some(ResolvedMembers {
        member_name,
        field,
        unmatched,
    })
}

/// Validate the configured fallback exception type.
///
/// An `unmatched` member that is present but unsuitable aborts the whole
/// candidate; silently dropping the fallback would generate code with a
/// different runtime behavior than configured.
fn validate_unmatched(sema: &Semantics<'_>, file: &FileId, raw: &str) -> Option<TypeDecl> {
    let Some(name) = quill_parse::parse_class_literal(raw) else {
        tracing::debug!(value = %raw, "'unmatched' member is not a class literal");
        return None;
    };
    let Some(decl) = sema.resolve_type(&name, file) else {
        tracing::debug!(ty = %name, "'unmatched' class not found in workspace");
        return None;
    };
    if !sema.is_runtime_exception(&decl) {
        tracing::debug!(
            ty = %decl.qualified_name(),
            "'unmatched' class is not a subtype of RuntimeException"
        );
        return None;
    }
    if !sema.has_enum_accepting_constructor(&decl) {
        tracing::debug!(
            ty = %decl.qualified_name(),
            "'unmatched' class has no suitable constructor"
        );
        return None;
    }
    Some(decl)
}

fn require_enum(sema: &Semantics<'_>, file: &FileId, raw: &str) -> Option<TypeDecl> {
    let decl = sema.resolve_type(raw, file)?;
    if !decl.is_enum() {
        tracing::debug!(ty = %decl.qualified_name(), "kind type is not an enum");
        return None;
    }
    Some(decl)
}
