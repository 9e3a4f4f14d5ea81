//! Runtime type registry.
//!
//! Every type a wrapper uses is "remembered" so the runtime type checker can
//! be told which mangled names denote the same C type. Two maps link mangled
//! names and canonical (resolved, qualified, unqualified-cv) types:
//!
//! ```text
//! class Base; class Derived : Base;
//! remember(p.Base); remember(p.Derived); inherit(Derived, Base)
//!
//! mangled:  _p_Base -> { p.Base }         _p_Derived -> { p.Derived }
//! resolved: p.Base  -> { _p_Base, _p_Derived }   (after inherit_equiv)
//! ```
//!
//! Viewed as a graph, the transitive closure over both maps gives the
//! equivalence classes. Inheritance adds edges from a base type to each
//! derived type, plus a pointer conversion function per pair.
//!
//! All maps are append-only and ordered, so the emitted table is
//! deterministic.

mod table;

use std::collections::{BTreeMap, BTreeSet};

use ifc_stack::ensure_sufficient_stack;
use ifc_types::TypeString;

use crate::error::RememberError;
use crate::TypeSystem;

pub use table::{Converter, Equivalent, TypeEntry, TypeTable};

/// Derived types registered for one base type, in registration order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Subtypes {
    /// `(derived, cast expression)`.
    entries: Vec<(String, String)>,
}

impl Subtypes {
    fn contains(&self, derived: &str) -> bool {
        self.entries.iter().any(|(d, _)| d == derived)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(d, c)| (d.as_str(), c.as_str()))
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Registry {
    /// Client data of every type remembered so far, as given.
    remembered: BTreeMap<TypeString, Option<String>>,
    /// Mangled name to the canonical types it denotes.
    pub(crate) mangled: BTreeMap<String, BTreeSet<TypeString>>,
    /// Canonical type to the mangled names denoting it (with the type each
    /// name stands for).
    pub(crate) resolved: BTreeMap<TypeString, BTreeMap<String, TypeString>>,
    /// Mangled name to the local type its table entry shows.
    pub(crate) ltype: BTreeMap<String, TypeString>,
    pub(crate) clientdata: BTreeMap<TypeString, String>,
    /// Base type name to its direct subtypes.
    pub(crate) subclass: BTreeMap<String, Subtypes>,
    /// `"<from>+<to>"` mangled pair to the converter function name.
    pub(crate) conversions: BTreeMap<String, String>,
    pub(crate) converters: Vec<Converter>,
}

impl TypeSystem {
    /// Record `ty` for the runtime type table.
    pub fn remember(&mut self, ty: &TypeString) -> Result<(), RememberError> {
        self.remember_with_clientdata(ty, None)
    }

    /// Record `ty` with per-type client data.
    ///
    /// Remembering a reference also remembers the pointer to the same type.
    /// When a canonical type already has different client data, the first
    /// value is kept and the conflict is reported after everything else has
    /// been recorded.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %ty))]
    pub fn remember_with_clientdata(
        &mut self,
        ty: &TypeString,
        clientdata: Option<&str>,
    ) -> Result<(), RememberError> {
        if ty.contains("<") && !ty.contains("<(") {
            return Err(RememberError::MalformedTemplate { ty: ty.clone() });
        }
        let clientdata_owned = clientdata.map(str::to_owned);
        if self.registry.remembered.get(ty) == Some(&clientdata_owned) {
            return Ok(());
        }
        self.registry
            .remembered
            .insert(ty.clone(), clientdata_owned);

        let mangled = ty.manglestr(&*self);
        tracing::trace!(%mangled, clientdata, "remember");

        let local = if self.is_typedef(ty) {
            ty.clone()
        } else {
            ty.ltype(&*self)
        };
        let canonical = self.qualify(&self.resolve_all(ty)).strip_qualifiers();

        let registry = &mut self.registry;
        registry.ltype.insert(mangled.clone(), local);
        registry
            .mangled
            .entry(mangled.clone())
            .or_default()
            .insert(canonical.clone());
        registry
            .resolved
            .entry(canonical.clone())
            .or_default()
            .insert(mangled, canonical.clone());

        let mut result = Ok(());
        if let Some(given) = clientdata {
            match registry.clientdata.get(&canonical) {
                Some(kept) if kept != given => {
                    result = Err(RememberError::InconsistentClientData {
                        ty: canonical.str(None),
                        given: given.to_owned(),
                        kept: kept.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    registry.clientdata.insert(canonical, given.to_owned());
                }
            }
        }

        if ty.is_reference() {
            let pointer = ty.del_reference().add_pointer();
            let pointer_result = self.remember_with_clientdata(&pointer, clientdata);
            result = result.and(pointer_result);
        }
        result
    }

    /// Every mangled name equivalent to `mangled`, itself included, sorted.
    pub fn equivalent_mangle(&self, mangled: &str) -> Vec<String> {
        let registry = &self.registry;
        let mut found = BTreeSet::new();
        let mut checked_mangled = BTreeSet::new();
        let mut checked_types = BTreeSet::new();
        let mut work = vec![mangled.to_owned()];

        while let Some(name) = work.pop() {
            if !checked_mangled.insert(name.clone()) {
                continue;
            }
            let Some(types) = registry.mangled.get(&name) else {
                found.insert(name);
                continue;
            };
            found.insert(name);
            for ty in types {
                if !checked_types.insert(ty.clone()) {
                    continue;
                }
                if let Some(names) = registry.resolved.get(ty) {
                    for other in names.keys() {
                        found.insert(other.clone());
                        work.push(other.clone());
                    }
                }
            }
        }
        found.into_iter().collect()
    }

    /// The first client data reachable from `mangled` through the
    /// equivalence graph.
    pub fn clientdata_collect(&self, mangled: &str) -> Option<&str> {
        let mut checked = BTreeSet::new();
        self.clientdata_walk(mangled, &mut checked)
    }

    fn clientdata_walk<'a>(
        &'a self,
        mangled: &str,
        checked: &mut BTreeSet<String>,
    ) -> Option<&'a str> {
        if !checked.insert(mangled.to_owned()) {
            return None;
        }
        let registry = &self.registry;
        for ty in registry.mangled.get(mangled)? {
            if let Some(data) = registry.clientdata.get(ty) {
                return Some(data.as_str());
            }
            for other in registry.resolved.get(ty).into_iter().flat_map(BTreeMap::keys) {
                let hit = ensure_sufficient_stack(|| self.clientdata_walk(other, checked));
                if hit.is_some() {
                    return hit;
                }
            }
        }
        None
    }

    /// Record that `derived` is a direct subtype of `base`, converted with
    /// the cast expression `cast`.
    ///
    /// Template names are canonicalised first. The first registration of a
    /// pair wins; subtyping is not transitive.
    pub fn inherit(&mut self, derived: &str, base: &str, cast: Option<&str>) {
        let canonical = |name: &str| {
            let ty = TypeString::from(name);
            if ty.is_template() {
                self.qualify(&self.resolve_all(&ty)).into_string()
            } else {
                name.to_owned()
            }
        };
        let derived = canonical(derived);
        let base = canonical(base);
        tracing::debug!(%derived, %base, "inherit");

        let subtypes = self.registry.subclass.entry(base).or_default();
        if !subtypes.contains(&derived) {
            subtypes
                .entries
                .push((derived, cast.unwrap_or_default().to_owned()));
        }
    }

    /// Whether `ty` is a registered direct subtype of `base`, comparing the
    /// bases of both canonical (resolved, qualified) types.
    pub fn is_subtype(&self, ty: &TypeString, base: &TypeString) -> bool {
        let canonical =
            |ty: &TypeString| self.qualify(&self.resolve_all(ty)).strip_qualifiers().base();
        let derived = canonical(ty);
        let base = canonical(base);
        self.registry
            .subclass
            .get(base.as_str())
            .is_some_and(|subtypes| subtypes.contains(derived.as_str()))
    }

    /// Mangled names remembered so far, in order.
    pub fn remembered_mangled(&self) -> impl Iterator<Item = &str> {
        self.registry.mangled.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests;
