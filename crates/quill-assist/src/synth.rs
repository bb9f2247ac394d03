//! Renders the replacement switch: one case per hierarchy kind, each
//! downcasting the receiver and ending in a terminator, plus the optional
//! trailing `throw` for configurations with an unmatched-kind exception.

use quill_parse::simple_type_name;
use quill_types::FileId;
use tree_sitter::Node;

use crate::config::{DispatchMode, HierarchyConfig};
use crate::imports::{type_reference, TypeReference};
use crate::kinds::KindVariant;
use crate::plan::INDENT_UNIT;
use crate::rewrite::RewriteLog;
use crate::semantic::Semantics;

/// How each generated case hands control back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseTerminator {
    Return { with_value: bool },
    Break,
}

impl CaseTerminator {
    /// The throw fallback only makes sense after a switch whose cases all
    /// leave the function; a break-terminated switch falls through legally.
    pub fn wants_fallback(self) -> bool {
        matches!(self, CaseTerminator::Return { .. })
    }

    fn render(self) -> &'static str {
        match self {
            CaseTerminator::Return { with_value: true } => "return null;",
            CaseTerminator::Return { with_value: false } => "return;",
            CaseTerminator::Break => "break;",
        }
    }
}

/// Result of rendering one proposal's switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesizedSwitch {
    /// Replacement text for the switch node. The first line carries no
    /// leading indentation; the insertion plan supplies it.
    pub switch_text: String,
    /// A `throw new Exc(dispatch);` statement, when requested.
    pub fallback_text: Option<String>,
}

/// The expression every case (and the fallback) switches over.
///
/// Recomputed from the configuration rather than copied from the old
/// switch, so a stale subject expression gets repaired along the way.
pub fn dispatch_expression(config: &HierarchyConfig) -> String {
    match config.mode {
        DispatchMode::Method => format!("{}.{}()", config.receiver, config.member_name),
        DispatchMode::Field => format!("{}.{}", config.receiver, config.member_name),
        DispatchMode::External => config.subject.clone(),
    }
}

/// Build the full replacement switch and queue any imports it needs.
#[allow(clippy::too_many_arguments)]
pub fn synthesize_switch(
    sema: &Semantics<'_>,
    file: &FileId,
    source: &str,
    config: &HierarchyConfig,
    variants: &[KindVariant],
    indent: &str,
    terminator: CaseTerminator,
    with_fallback: bool,
    log: &mut RewriteLog,
) -> SynthesizedSwitch {
    let case_indent = format!("{indent}{INDENT_UNIT}");
    let body_indent = format!("{case_indent}{INDENT_UNIT}");

    let mut text = format!("switch ({}) {{", dispatch_expression(config));
    for variant in variants {
        // The class literal naming the variant appears in the enum's file,
        // so resolution starts there rather than at the edited file.
        let ty = reference_for(
            sema,
            file,
            source,
            &config.kind_enum.file,
            &variant.variant_type,
            log,
        );
        let variable = case_variable(&ty.text);
        text.push_str(&format!("\n{case_indent}case {}: {{", variant.constant_name));
        text.push_str(&format!(
            "\n{body_indent}final {ty} {variable} = ({ty}) {receiver};",
            ty = ty.text,
            receiver = config.receiver,
        ));
        text.push_str(&format!("\n{body_indent}{}", terminator.render()));
        text.push_str(&format!("\n{case_indent}}}"));
    }
    text.push_str(&format!("\n{indent}}}"));

    let fallback_text = if with_fallback {
        config.unmatched.as_ref().map(|unmatched| {
            let exc = type_reference(sema, file, source, unmatched);
            if let Some(import) = &exc.import {
                log.add_import(import.clone());
            }
            format!("throw new {}({});", exc.text, dispatch_expression(config))
        })
    } else {
        None
    };

    SynthesizedSwitch {
        switch_text: text,
        fallback_text,
    }
}

/// Reference a variant type named by its class-literal text. When the name
/// does not resolve to a workspace declaration it is spliced as written.
fn reference_for(
    sema: &Semantics<'_>,
    file: &FileId,
    source: &str,
    declared_in: &FileId,
    type_name: &str,
    log: &mut RewriteLog,
) -> TypeReference {
    match sema.resolve_type(type_name, declared_in) {
        Some(decl) => {
            let reference = type_reference(sema, file, source, &decl);
            if let Some(import) = &reference.import {
                log.add_import(import.clone());
            }
            reference
        }
        None => {
            tracing::debug!(type_name, "variant type not declared in workspace");
            TypeReference {
                text: type_name.to_string(),
                import: None,
            }
        }
    }
}

/// `final Shape shape = (Shape) x;`: the local is the lowercased simple
/// type name, or `default` when no identifier can be extracted.
fn case_variable(type_text: &str) -> String {
    match simple_type_name(type_text) {
        Some(name) => name.to_lowercase(),
        None => "default".to_string(),
    }
}

/// What the function enclosing the switch does with `return`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnContext {
    Void,
    Value,
    /// Lambda bodies and detached snippets; treated as value-returning.
    Unknown,
}

impl ReturnContext {
    pub fn returns_value(self) -> bool {
        !matches!(self, ReturnContext::Void)
    }
}

/// Walk outward from the switch to the nearest function-like ancestor.
pub fn return_context(switch: Node<'_>, source: &str) -> ReturnContext {
    let mut current = switch;
    while let Some(parent) = current.parent() {
        match parent.kind() {
            "method_declaration" => {
                let is_void = parent
                    .child_by_field_name("type")
                    .map(|ty| quill_parse::node_text(source, ty) == "void")
                    .unwrap_or(false);
                return if is_void {
                    ReturnContext::Void
                } else {
                    ReturnContext::Value
                };
            }
            "constructor_declaration" | "static_initializer" => return ReturnContext::Void,
            "lambda_expression" => return ReturnContext::Unknown,
            _ => current = parent,
        }
    }
    ReturnContext::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_parse::parse_java;

    fn context_of(source: &str) -> ReturnContext {
        let tree = parse_java(source).expect("parse");
        let mut found = None;
        quill_parse::visit_nodes(tree.root_node(), &mut |node| {
            if found.is_none() && node.kind() == "switch_expression" {
                found = Some(node);
            }
        });
        return_context(found.expect("switch in fixture"), source)
    }

    #[test]
    fn void_method_context() {
        let source = "class T { void run(int k) { switch (k) {} } }";
        assert_eq!(context_of(source), ReturnContext::Void);
        assert!(!context_of(source).returns_value());
    }

    #[test]
    fn value_method_context() {
        let source = "class T { String run(int k) { switch (k) {} return null; } }";
        assert_eq!(context_of(source), ReturnContext::Value);
    }

    #[test]
    fn constructor_context_is_void() {
        let source = "class T { T(int k) { switch (k) {} } }";
        assert_eq!(context_of(source), ReturnContext::Void);
    }

    #[test]
    fn lambda_context_is_unknown() {
        let source = "class T { Runnable r = () -> { switch (this.k) {} }; int k; }";
        assert_eq!(context_of(source), ReturnContext::Unknown);
        assert!(context_of(source).returns_value());
    }

    #[test]
    fn case_variable_names() {
        assert_eq!(case_variable("Shape"), "shape");
        assert_eq!(case_variable("geo.Circle"), "circle");
        assert_eq!(case_variable("List<Shape>"), "list");
        assert_eq!(case_variable("?"), "default");
    }
}
