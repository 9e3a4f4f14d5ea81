//! Typedef lookup seam.

use rustc_hash::FxHashSet;

use crate::TypeString;

/// Source of typedef expansions.
///
/// The type algebra never owns scope state. Operations that must see
/// through typedefs (`ltype`, `is_const`, `default_type`, `manglestr`, ...)
/// take a `&dyn TypedefResolver` instead.
pub trait TypedefResolver {
    /// Expand the base of `ty` by one typedef step.
    ///
    /// Returns `None` when nothing in `ty` names a typedef.
    fn typedef_resolve(&self, ty: &TypeString) -> Option<TypeString>;

    /// Expand `ty` until no typedef remains.
    ///
    /// A chain that revisits an earlier value stops at that value. A step
    /// that only wraps an earlier value in constructors is not taken.
    fn typedef_resolve_all(&self, ty: &TypeString) -> TypeString {
        let mut seen = FxHashSet::default();
        let mut current = ty.clone();
        while let Some(next) = self.typedef_resolve(&current) {
            if next.wraps(&current) || seen.iter().any(|earlier| next.wraps(earlier)) {
                return current;
            }
            seen.insert(current);
            if seen.contains(&next) {
                return next;
            }
            current = next;
        }
        current
    }
}

/// Resolver that knows no typedefs.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTypedefs;

impl TypedefResolver for NoTypedefs {
    fn typedef_resolve(&self, _ty: &TypeString) -> Option<TypeString> {
        None
    }
}
