//! Best-effort semantic model over Java sources.
//!
//! The assist only needs a handful of semantic queries: the static type of a
//! switch subject, the annotations and declared members of a type, an enum's
//! constants in declaration order, and supertype/constructor checks for the
//! fallback exception. All of them are answered by scanning sources with
//! `tree-sitter-java`; a failed lookup means "not applicable", never an
//! error. Files other than the one being edited are parsed on demand and the
//! extracted declarations are cached only for the current invocation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use quill_parse::{
    collect_annotations, modifier_node, node_text, parse_java, ParsedAnnotation,
};
use quill_types::{FileId, Span};
use tree_sitter::Node;

/// Abstraction over the workspace the assist runs in.
///
/// Production callers back this with their virtual file system; tests use
/// [`SourceWorkspace`].
pub trait AssistDatabase {
    fn file_text(&self, file: &FileId) -> Option<&str>;

    /// Enumerate all known workspace files, in deterministic order.
    fn all_files(&self) -> Vec<FileId>;
}

/// A simple in-memory [`AssistDatabase`].
#[derive(Clone, Debug, Default)]
pub struct SourceWorkspace {
    files: std::collections::BTreeMap<FileId, String>,
}

impl SourceWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<String>, text: impl Into<String>) -> FileId {
        let file = FileId::new(path);
        self.files.insert(file.clone(), text.into());
        file
    }

    pub fn files(&self) -> &std::collections::BTreeMap<FileId, String> {
        &self.files
    }
}

impl AssistDatabase for SourceWorkspace {
    fn file_text(&self, file: &FileId) -> Option<&str> {
        self.files.get(file).map(String::as_str)
    }

    fn all_files(&self) -> Vec<FileId> {
        self.files.keys().cloned().collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A type declaration extracted from a source file.
///
/// Only declared members are recorded; inherited members are resolved by
/// walking [`TypeDecl::superclass`] through [`Semantics`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    pub file: FileId,
    pub package: Option<String>,
    /// Simple names of enclosing types, outermost first.
    pub enclosing: Vec<String>,
    pub name: String,
    pub kind: TypeDeclKind,
    pub span: Span,
    pub annotations: Vec<ParsedAnnotation>,
    /// Raw source text of the `extends` clause type, if any.
    pub superclass: Option<String>,
    pub methods: Vec<MethodDecl>,
    pub fields: Vec<FieldDecl>,
    /// Enum constants in declaration order (enums only).
    pub constants: Vec<EnumConstantDecl>,
    /// Declared elements with defaults (annotation types only).
    pub elements: Vec<AnnotationElement>,
}

impl TypeDecl {
    pub fn is_enum(&self) -> bool {
        self.kind == TypeDeclKind::Enum
    }

    /// Dotted name including package and enclosing types.
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(pkg) = &self.package {
            parts.push(pkg);
        }
        for outer in &self.enclosing {
            parts.push(outer);
        }
        parts.push(&self.name);
        parts.join(".")
    }

    pub fn method_named(&self, name: &str) -> Option<&MethodDecl> {
        self.methods
            .iter()
            .find(|m| !m.is_constructor && m.name == name)
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.is_constructor)
    }

    pub fn element_named(&self, name: &str) -> Option<&AnnotationElement> {
        self.elements.iter().find(|e| e.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub param_types: Vec<String>,
    pub annotations: Vec<ParsedAnnotation>,
    pub is_static: bool,
    pub is_constructor: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: String,
}

/// First constructor argument of an enum constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnumConstantArg {
    /// `Foo.class`, the hierarchy convention.
    ClassLiteral(String),
    /// Anything else; fails the kind-enumeration precondition.
    Other(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumConstantDecl {
    pub name: String,
    pub first_arg: Option<EnumConstantArg>,
}

/// An element of an `@interface` declaration, with its default value text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationElement {
    pub name: String,
    pub ty: String,
    pub default_value: Option<String>,
}

/// Per-invocation semantic session.
///
/// Holds a cache of per-file declarations so the same unit is parsed at most
/// once per invocation; nothing survives across invocations.
pub struct Semantics<'db> {
    db: &'db dyn AssistDatabase,
    cache: RefCell<HashMap<FileId, Rc<Vec<TypeDecl>>>>,
}

impl<'db> Semantics<'db> {
    pub fn new(db: &'db dyn AssistDatabase) -> Self {
        Self {
            db,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn db(&self) -> &'db dyn AssistDatabase {
        self.db
    }

    /// All type declarations of one file (parsed on demand).
    pub fn types_in_file(&self, file: &FileId) -> Rc<Vec<TypeDecl>> {
        if let Some(cached) = self.cache.borrow().get(file) {
            return Rc::clone(cached);
        }

        let types = match self.db.file_text(file) {
            Some(text) => scan_types(file, text),
            None => Vec::new(),
        };
        let types = Rc::new(types);
        self.cache
            .borrow_mut()
            .insert(file.clone(), Rc::clone(&types));
        types
    }

    /// Resolve a type-like name to a declaration.
    ///
    /// Qualified names must match the declaration's dotted name (a suffix
    /// match is accepted so `Test1.Base` finds `test.Test1.Base`). Simple
    /// names prefer the file the resolution starts from, then the rest of
    /// the workspace in file order. First match wins.
    pub fn resolve_type(&self, raw: &str, from: &FileId) -> Option<TypeDecl> {
        let name = quill_parse::clean_type(raw);
        let name = name.split('<').next().unwrap_or(&name).to_string();
        if name.is_empty() {
            return None;
        }

        let mut files = vec![from.clone()];
        for file in self.db.all_files() {
            if file != *from {
                files.push(file);
            }
        }

        if name.contains('.') {
            let dotted_suffix = format!(".{name}");
            for file in &files {
                for decl in self.types_in_file(file).iter() {
                    let qualified = decl.qualified_name();
                    if qualified == name || qualified.ends_with(&dotted_suffix) {
                        return Some(decl.clone());
                    }
                }
            }
            return None;
        }

        for file in &files {
            for decl in self.types_in_file(file).iter() {
                if decl.name == name {
                    return Some(decl.clone());
                }
            }
        }
        None
    }

    /// The innermost type declaration of `file` covering `offset`.
    pub fn enclosing_type_at(&self, file: &FileId, offset: usize) -> Option<TypeDecl> {
        self.types_in_file(file)
            .iter()
            .filter(|decl| decl.span.contains(offset))
            .max_by_key(|decl| decl.span.start)
            .cloned()
    }

    /// Walk `decl`'s superclass chain, including `decl` itself.
    ///
    /// The walk is capped to guard against cyclic `extends` clauses in
    /// broken sources.
    pub fn superclass_chain(&self, decl: &TypeDecl) -> Vec<TypeDecl> {
        let mut chain = vec![decl.clone()];
        let mut current = decl.clone();
        for _ in 0..16 {
            let Some(raw) = current.superclass.clone() else {
                break;
            };
            let Some(parent) = self.resolve_type(&raw, &current.file) else {
                break;
            };
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }

    /// Is `decl` a subtype of `java.lang.RuntimeException`?
    ///
    /// `RuntimeException` itself is accepted. The chain check is textual:
    /// a superclass spelled `RuntimeException` (optionally qualified) ends
    /// the search successfully even when the JDK sources are not part of
    /// the workspace.
    pub fn is_runtime_exception(&self, decl: &TypeDecl) -> bool {
        if is_runtime_exception_name(&decl.name) {
            return true;
        }
        let mut current = decl.clone();
        for _ in 0..16 {
            let Some(raw) = current.superclass.clone() else {
                return false;
            };
            if is_runtime_exception_name(raw.trim()) {
                return true;
            }
            match self.resolve_type(&raw, &current.file) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    /// Does `decl` declare a single-argument constructor whose parameter
    /// accepts an enum value (`Enum<?>` or a concrete enum type)?
    pub fn has_enum_accepting_constructor(&self, decl: &TypeDecl) -> bool {
        decl.constructors().any(|ctor| {
            if ctor.param_types.len() != 1 {
                return false;
            }
            let param = quill_parse::clean_type(&ctor.param_types[0]);
            if param == "Enum<?>" || param == "java.lang.Enum<?>" {
                return true;
            }
            self.resolve_type(&param, &decl.file)
                .map(|p| p.is_enum())
                .unwrap_or(false)
        })
    }
}

fn is_runtime_exception_name(name: &str) -> bool {
    name == "RuntimeException" || name == "java.lang.RuntimeException"
}

/// Extract every type declaration of a source file, nested ones included.
pub fn scan_types(file: &FileId, source: &str) -> Vec<TypeDecl> {
    let Ok(tree) = parse_java(source) else {
        tracing::debug!(file = %file, "failed to parse Java source");
        return Vec::new();
    };

    let package = package_of(tree.root_node(), source);
    let mut out = Vec::new();
    let mut enclosing = Vec::new();
    collect_decls(
        tree.root_node(),
        file,
        source,
        package.as_deref(),
        &mut enclosing,
        &mut out,
    );
    out
}

fn package_of(root: Node<'_>, source: &str) -> Option<String> {
    let pkg = quill_parse::find_named_child(root, "package_declaration")?;
    let mut cursor = pkg.walk();
    let name = pkg
        .named_children(&mut cursor)
        .filter(|n| matches!(n.kind(), "identifier" | "scoped_identifier"))
        .last()?;
    Some(node_text(source, name).to_string())
}

fn collect_decls(
    node: Node<'_>,
    file: &FileId,
    source: &str,
    package: Option<&str>,
    enclosing: &mut Vec<String>,
    out: &mut Vec<TypeDecl>,
) {
    let kind = match node.kind() {
        "class_declaration" => Some(TypeDeclKind::Class),
        "interface_declaration" => Some(TypeDeclKind::Interface),
        "enum_declaration" => Some(TypeDeclKind::Enum),
        "annotation_type_declaration" => Some(TypeDeclKind::Annotation),
        _ => None,
    };

    if let Some(kind) = kind {
        if let Some(decl) = extract_type_decl(node, kind, file, source, package, enclosing) {
            let name = decl.name.clone();
            out.push(decl);
            enclosing.push(name);
            recurse_children(node, file, source, package, enclosing, out);
            enclosing.pop();
            return;
        }
    }

    recurse_children(node, file, source, package, enclosing, out);
}

fn recurse_children(
    node: Node<'_>,
    file: &FileId,
    source: &str,
    package: Option<&str>,
    enclosing: &mut Vec<String>,
    out: &mut Vec<TypeDecl>,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_decls(child, file, source, package, enclosing, out);
    }
}

fn extract_type_decl(
    node: Node<'_>,
    kind: TypeDeclKind,
    file: &FileId,
    source: &str,
    package: Option<&str>,
    enclosing: &[String],
) -> Option<TypeDecl> {
    let name = node.child_by_field_name("name")?;
    let name = node_text(source, name).to_string();

    let annotations = modifier_node(node)
        .map(|m| collect_annotations(m, source))
        .unwrap_or_default();

    let superclass = node
        .child_by_field_name("superclass")
        .and_then(|sc| sc.named_child(0))
        .map(|t| node_text(source, t).to_string());

    let body = node.child_by_field_name("body");

    let mut methods = Vec::new();
    let mut fields = Vec::new();
    let mut constants = Vec::new();
    let mut elements = Vec::new();

    if let Some(body) = body {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_declaration" | "constructor_declaration" => {
                    if let Some(method) = extract_method(member, source) {
                        methods.push(method);
                    }
                }
                "field_declaration" => extract_fields(member, source, &mut fields),
                "enum_constant" => {
                    if let Some(constant) = extract_enum_constant(member, source) {
                        constants.push(constant);
                    }
                }
                // Members of an enum live behind the constant list.
                "enum_body_declarations" => {
                    let mut inner = member.walk();
                    for decl in member.named_children(&mut inner) {
                        match decl.kind() {
                            "method_declaration" | "constructor_declaration" => {
                                if let Some(method) = extract_method(decl, source) {
                                    methods.push(method);
                                }
                            }
                            "field_declaration" => extract_fields(decl, source, &mut fields),
                            _ => {}
                        }
                    }
                }
                "annotation_type_element_declaration" => {
                    if let Some(element) = extract_annotation_element(member, source) {
                        elements.push(element);
                    }
                }
                _ => {}
            }
        }
    }

    Some(TypeDecl {
        file: file.clone(),
        package: package.map(str::to_string),
        enclosing: enclosing.to_vec(),
        name,
        kind,
        span: quill_parse::node_span(node),
        annotations,
        superclass,
        methods,
        fields,
        constants,
        elements,
    })
}

fn extract_method(node: Node<'_>, source: &str) -> Option<MethodDecl> {
    let name = node.child_by_field_name("name")?;
    let is_constructor = node.kind() == "constructor_declaration";
    let return_type = if is_constructor {
        None
    } else {
        node.child_by_field_name("type")
            .map(|t| node_text(source, t).to_string())
    };

    let mut param_types = Vec::new();
    if let Some(params) = node.child_by_field_name("parameters") {
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if matches!(param.kind(), "formal_parameter" | "spread_parameter") {
                if let Some(ty) = param.child_by_field_name("type") {
                    param_types.push(node_text(source, ty).to_string());
                }
            }
        }
    }

    let annotations = modifier_node(node)
        .map(|m| collect_annotations(m, source))
        .unwrap_or_default();
    let is_static = modifier_node(node)
        .map(|m| node_text(source, m).contains("static"))
        .unwrap_or(false);

    Some(MethodDecl {
        name: node_text(source, name).to_string(),
        return_type,
        param_types,
        annotations,
        is_static,
        is_constructor,
    })
}

fn extract_fields(node: Node<'_>, source: &str, out: &mut Vec<FieldDecl>) {
    let Some(ty) = node.child_by_field_name("type") else {
        return;
    };
    let ty = node_text(source, ty).to_string();
    let mut cursor = node.walk();
    for declarator in node.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        if let Some(name) = declarator.child_by_field_name("name") {
            out.push(FieldDecl {
                name: node_text(source, name).to_string(),
                ty: ty.clone(),
            });
        }
    }
}

fn extract_enum_constant(node: Node<'_>, source: &str) -> Option<EnumConstantDecl> {
    let name = node.child_by_field_name("name")?;
    let first_arg = node
        .child_by_field_name("arguments")
        .and_then(|args| args.named_child(0))
        .map(|arg| {
            if arg.kind() == "class_literal" {
                let text = node_text(source, arg);
                match quill_parse::parse_class_literal(text) {
                    Some(ty) => EnumConstantArg::ClassLiteral(ty),
                    None => EnumConstantArg::Other(text.to_string()),
                }
            } else {
                EnumConstantArg::Other(node_text(source, arg).to_string())
            }
        });

    Some(EnumConstantDecl {
        name: node_text(source, name).to_string(),
        first_arg,
    })
}

fn extract_annotation_element(node: Node<'_>, source: &str) -> Option<AnnotationElement> {
    let name = node.child_by_field_name("name")?;
    let ty = node.child_by_field_name("type")?;
    let default_value = node
        .child_by_field_name("value")
        .map(|v| quill_parse::element_value_text(v, source));

    Some(AnnotationElement {
        name: node_text(source, name).to_string(),
        ty: node_text(source, ty).to_string(),
        default_value,
    })
}

/// Resolve the static type of an expression node, as raw type text.
///
/// Identifiers are looked up among enclosing parameters, preceding local
/// declarations, and declared fields (walking the superclass chain); calls
/// and field accesses resolve through the receiver's type. `None` means the
/// expression's type cannot be determined; the assist then simply does not
/// apply.
pub fn resolve_expr_type(
    sema: &Semantics<'_>,
    file: &FileId,
    source: &str,
    expr: Node<'_>,
) -> Option<String> {
    match expr.kind() {
        "parenthesized_expression" => {
            resolve_expr_type(sema, file, source, expr.named_child(0)?)
        }
        "cast_expression" => {
            let ty = expr.child_by_field_name("type")?;
            Some(node_text(source, ty).to_string())
        }
        "identifier" => {
            let name = node_text(source, expr);
            resolve_identifier_type(sema, file, source, expr, name)
        }
        "this" => {
            let decl = sema.enclosing_type_at(file, expr.start_byte())?;
            Some(decl.name)
        }
        "object_creation_expression" => {
            let ty = expr.child_by_field_name("type")?;
            Some(node_text(source, ty).to_string())
        }
        "method_invocation" => {
            let (_, method) = resolve_invocation(sema, file, source, expr)?;
            method.return_type
        }
        "field_access" => {
            let object = expr.child_by_field_name("object")?;
            let field = expr.child_by_field_name("field")?;
            let owner = resolve_receiver_type(sema, file, source, object)?;
            let field_name = node_text(source, field);
            sema.superclass_chain(&owner)
                .iter()
                .find_map(|decl| decl.field_named(field_name).map(|f| f.ty.clone()))
        }
        _ => None,
    }
}

/// Resolve a method invocation to its declaring type and method.
pub fn resolve_invocation(
    sema: &Semantics<'_>,
    file: &FileId,
    source: &str,
    call: Node<'_>,
) -> Option<(TypeDecl, MethodDecl)> {
    if call.kind() != "method_invocation" {
        return None;
    }
    let name = call.child_by_field_name("name")?;
    let name = node_text(source, name);

    let owner = match call.child_by_field_name("object") {
        Some(object) => resolve_receiver_type(sema, file, source, object)?,
        None => sema.enclosing_type_at(file, call.start_byte())?,
    };

    for decl in sema.superclass_chain(&owner) {
        if let Some(method) = decl.method_named(name) {
            return Some((decl.clone(), method.clone()));
        }
    }
    None
}

/// Type of the receiver of a call/field access.
///
/// A qualifier that names a type directly (a static call such as
/// `IResourceKind.of(...)`) resolves to that type; otherwise the qualifier
/// is typed as an expression first.
fn resolve_receiver_type(
    sema: &Semantics<'_>,
    file: &FileId,
    source: &str,
    object: Node<'_>,
) -> Option<TypeDecl> {
    if matches!(object.kind(), "identifier" | "scoped_identifier" | "field_access") {
        let text = node_text(source, object);
        // Prefer a local/field binding over a type of the same name.
        if object.kind() == "identifier" {
            if let Some(ty) = resolve_identifier_type(sema, file, source, object, text) {
                return sema.resolve_type(&ty, file);
            }
        }
        if let Some(decl) = sema.resolve_type(text, file) {
            return Some(decl);
        }
    }

    let ty = resolve_expr_type(sema, file, source, object)?;
    sema.resolve_type(&ty, file)
}

fn resolve_identifier_type(
    sema: &Semantics<'_>,
    file: &FileId,
    source: &str,
    usage: Node<'_>,
    name: &str,
) -> Option<String> {
    // Parameters and preceding locals of enclosing scopes.
    let mut current = usage;
    while let Some(parent) = current.parent() {
        match parent.kind() {
            "block" | "constructor_body" | "switch_block_statement_group" => {
                let mut cursor = parent.walk();
                for stmt in parent.named_children(&mut cursor) {
                    if stmt.end_byte() > usage.start_byte() {
                        break;
                    }
                    if stmt.kind() != "local_variable_declaration" {
                        continue;
                    }
                    if let Some(ty) = declarator_type(stmt, source, name) {
                        return Some(ty);
                    }
                }
            }
            "method_declaration" | "constructor_declaration" => {
                if let Some(params) = parent.child_by_field_name("parameters") {
                    let mut cursor = params.walk();
                    for param in params.named_children(&mut cursor) {
                        let Some(pname) = param.child_by_field_name("name") else {
                            continue;
                        };
                        if node_text(source, pname) == name {
                            let ty = param.child_by_field_name("type")?;
                            return Some(node_text(source, ty).to_string());
                        }
                    }
                }
                // Out of the method: fall through to field lookup below.
                break;
            }
            "enhanced_for_statement" => {
                if let Some(fname) = parent.child_by_field_name("name") {
                    if node_text(source, fname) == name {
                        let ty = parent.child_by_field_name("type")?;
                        return Some(node_text(source, ty).to_string());
                    }
                }
            }
            _ => {}
        }
        current = parent;
    }

    // Declared fields of the enclosing type and its superclasses.
    let decl = sema.enclosing_type_at(file, usage.start_byte())?;
    sema.superclass_chain(&decl)
        .iter()
        .find_map(|d| d.field_named(name).map(|f| f.ty.clone()))
}

fn declarator_type(decl: Node<'_>, source: &str, name: &str) -> Option<String> {
    let ty = decl.child_by_field_name("type")?;
    let mut cursor = decl.walk();
    for declarator in decl.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        if let Some(dname) = declarator.child_by_field_name("name") {
            if node_text(source, dname) == name {
                return Some(node_text(source, ty).to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(source: &str) -> Vec<TypeDecl> {
        scan_types(&FileId::new("T.java"), source)
    }

    #[test]
    fn scans_nested_types_with_enclosing_path() {
        let decls = scan(
            r#"
package test;

public class Outer {
    static enum Kind { A(A.class), B(B.class); private Kind(Class<?> c) {} }
    static class A {}
    static class B {}
}
"#,
        );
        let names: Vec<_> = decls.iter().map(|d| d.qualified_name()).collect();
        assert_eq!(
            names,
            vec!["test.Outer", "test.Outer.Kind", "test.Outer.A", "test.Outer.B"]
        );

        let kind = decls.iter().find(|d| d.name == "Kind").unwrap();
        assert!(kind.is_enum());
        assert_eq!(kind.constants.len(), 2);
        assert_eq!(
            kind.constants[0].first_arg,
            Some(EnumConstantArg::ClassLiteral("A".to_string()))
        );
        // The private constructor is declared behind the constant list.
        assert!(kind.constructors().next().is_some());
    }

    #[test]
    fn scans_annotations_and_members() {
        let decls = scan(
            r#"
@Hierarchy(value = "kind", field = true)
abstract class Base {
    final Kind kind;
    private Base(Kind kind) { this.kind = kind; }
    abstract Kind getKind();
}
"#,
        );
        let base = &decls[0];
        assert_eq!(base.annotations.len(), 1);
        assert_eq!(base.annotations[0].arg("value"), Some("kind"));
        assert_eq!(base.field_named("kind").unwrap().ty, "Kind");
        assert_eq!(
            base.method_named("getKind").unwrap().return_type.as_deref(),
            Some("Kind")
        );
        assert_eq!(base.constructors().count(), 1);
    }

    #[test]
    fn scans_annotation_type_defaults() {
        let decls = scan(
            r#"
public @interface Hierarchy {
    public String value();
    public boolean field() default false;
    public Class<? extends RuntimeException> unmatched() default Oops.class;
}
"#,
        );
        let ann = &decls[0];
        assert_eq!(ann.kind, TypeDeclKind::Annotation);
        assert_eq!(ann.element_named("value").unwrap().default_value, None);
        assert_eq!(
            ann.element_named("field").unwrap().default_value.as_deref(),
            Some("false")
        );
        assert_eq!(
            ann.element_named("unmatched")
                .unwrap()
                .default_value
                .as_deref(),
            Some("Oops.class")
        );
    }

    #[test]
    fn runtime_exception_chain() {
        let mut workspace = SourceWorkspace::new();
        let file = workspace.add_file(
            "E.java",
            r#"
class Mid extends RuntimeException {}
class Leaf extends Mid { Leaf(Enum<?> k) { super(); } }
class Stray extends Object {}
"#,
        );
        let sema = Semantics::new(&workspace);
        let leaf = sema.resolve_type("Leaf", &file).unwrap();
        let stray = sema.resolve_type("Stray", &file).unwrap();
        assert!(sema.is_runtime_exception(&leaf));
        assert!(!sema.is_runtime_exception(&stray));
        assert!(sema.has_enum_accepting_constructor(&leaf));
    }
}
