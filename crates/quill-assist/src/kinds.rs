//! Enumerating the kinds of a hierarchy.

use crate::config::HierarchyConfig;
use crate::semantic::EnumConstantArg;

/// One enumeration constant and the concrete subtype it designates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindVariant {
    pub constant_name: String,
    /// Type named by the constant's `Foo.class` witness argument.
    pub variant_type: String,
}

/// Derive the ordered variant list from the kind enumeration.
///
/// Each constant's first constructor argument must be a class literal; this
/// is a hard precondition of the convention, so a single violation fails the
/// whole proposal rather than skipping the constant. An enum without
/// constants is legal and yields a switch with no cases.
pub fn enumerate_kinds(config: &HierarchyConfig) -> Option<Vec<KindVariant>> {
    let mut variants = Vec::with_capacity(config.kind_enum.constants.len());
    for constant in &config.kind_enum.constants {
        match &constant.first_arg {
            Some(EnumConstantArg::ClassLiteral(ty)) => variants.push(KindVariant {
                constant_name: constant.name.clone(),
                variant_type: ty.clone(),
            }),
            Some(EnumConstantArg::Other(text)) => {
                tracing::debug!(
                    constant = %constant.name,
                    arg = %text,
                    "enum constant's first argument is not a class literal"
                );
                return None;
            }
            None => {
                tracing::debug!(
                    constant = %constant.name,
                    "enum constant has no constructor arguments"
                );
                return None;
            }
        }
    }
    Some(variants)
}
