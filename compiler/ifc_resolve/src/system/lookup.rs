//! Typedef lookup and resolution.

use ifc_stack::ensure_sufficient_stack;
use ifc_types::{scopename, TypeString};
use rustc_hash::FxHashSet;

use super::TypeSystem;
use crate::scope::{ScopeId, TypedefEntry};

/// One resolution step: the expansion, if any, and the scope whose table
/// satisfied the lookup of the base name.
///
/// A class name maps to itself, which is "no expansion" but still reports
/// the defining scope.
pub(super) struct Step {
    pub(super) ty: Option<TypeString>,
    pub(super) scope: Option<ScopeId>,
}

fn join(parms: &[TypeString]) -> String {
    let mut out = String::new();
    for (i, parm) in parms.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(parm.as_str());
    }
    out
}

impl TypeSystem {
    /// Search `scope`, then its inherited scopes, then its lexical parent.
    ///
    /// Scopes already on the search path are skipped, so inheritance cycles
    /// terminate.
    fn lookup_in(
        &self,
        scope: ScopeId,
        name: &str,
        in_progress: &mut FxHashSet<ScopeId>,
    ) -> Option<(&TypedefEntry, ScopeId)> {
        if !in_progress.insert(scope) {
            return None;
        }
        let data = self.scope(scope);
        let found = ensure_sufficient_stack(|| {
            if let Some(entry) = data.typedefs.get(name) {
                return Some((entry, scope));
            }
            for &inherited in &data.inherits {
                if let Some(hit) = self.lookup_in(inherited, name, in_progress) {
                    return Some(hit);
                }
            }
            data.parent
                .and_then(|parent| self.lookup_in(parent, name, in_progress))
        });
        in_progress.remove(&scope);
        found
    }

    /// Typedef entry visible from `scope` for the unqualified `name`, with
    /// the scope that defines it.
    pub fn lookup_typedef(&self, scope: ScopeId, name: &str) -> Option<(&TypedefEntry, ScopeId)> {
        self.lookup_in(scope, name, &mut FxHashSet::default())
    }

    /// Find the scope named by `prefix`, searching outward from the current
    /// scope.
    pub fn find_scope(&self, prefix: &str) -> Option<ScopeId> {
        self.find_scope_from(self.current, prefix)
    }

    pub(super) fn find_scope_from(&self, scope: ScopeId, prefix: &str) -> Option<ScopeId> {
        let as_type = TypeString::from(prefix);
        let resolved;
        let prefix = if as_type.is_template() {
            resolved = self.resolve_all(&as_type);
            resolved.as_str()
        } else {
            prefix
        };
        self.find_scope_walk(scope, prefix, true, &mut FxHashSet::default())
    }

    /// Try `<scope>::prefix` for each scope on the way out; `using` scopes
    /// are searched without climbing their parents.
    fn find_scope_walk(
        &self,
        start: ScopeId,
        prefix: &str,
        climb: bool,
        visited: &mut FxHashSet<ScopeId>,
    ) -> Option<ScopeId> {
        let mut next = Some(start);
        while let Some(scope) = next {
            let data = self.scope(scope);
            let full = if data.qname.is_empty() {
                prefix.to_owned()
            } else {
                format!("{}::{prefix}", data.qname)
            };
            if let Some(&hit) = self.by_qname.get(&full) {
                return Some(hit);
            }
            for &used in &data.usings {
                if visited.insert(used) {
                    let hit =
                        ensure_sufficient_stack(|| self.find_scope_walk(used, prefix, false, visited));
                    if hit.is_some() {
                        return hit;
                    }
                }
            }
            if !climb {
                break;
            }
            next = data.parent;
        }
        None
    }

    /// Expand `ty` by one typedef step, or `None` when nothing in it names
    /// a typedef.
    ///
    /// Works on the base of the type: a leading `::` starts at the global
    /// scope, a qualified base is looked up in the scope its prefix names,
    /// and a template base that is not itself a typedef has its first
    /// resolvable argument expanded. Function and member-pointer elements in
    /// the prefix are expanded when the base has nothing to expand.
    #[tracing::instrument(level = "trace", skip_all, fields(ty = %ty))]
    pub fn typedef_resolve(&self, ty: &TypeString) -> Option<TypeString> {
        ensure_sufficient_stack(|| self.resolve_step(ty).ty)
    }

    pub(super) fn resolve_step(&self, ty: &TypeString) -> Step {
        let base = ty.base();
        let mut scope = None;

        let expanded = if base.is_simple() {
            self.resolve_simple(base.as_str(), &mut scope)
        } else if base.is_function() {
            self.resolve_first(&base.parmlist())
                .map(|parms| format!("f({}).", join(&parms)))
        } else if base.is_memberpointer() {
            self.typedef_resolve(&TypeString::from(base.parm()))
                .map(|class| format!("m({class})."))
        } else {
            None
        };

        let prefix = ty.prefix();
        let ty = match expanded {
            Some(expanded) => Some(TypeString::new(format!("{prefix}{expanded}"))),
            None if prefix.contains("f(") || prefix.contains("m(") => self
                .typedef_resolve(&prefix)
                .map(|prefix| TypeString::new(format!("{prefix}{base}"))),
            None => None,
        };
        Step { ty, scope }
    }

    fn resolve_simple(&self, base: &str, scope: &mut Option<ScopeId>) -> Option<String> {
        let (start, name) = match base.strip_prefix("::") {
            Some(rest) => (ScopeId::GLOBAL, rest),
            None => (self.current, base),
        };

        let found = if let Some(entry) = self.scope(start).typedefs.get(name) {
            *scope = Some(start);
            Some(entry.ty.as_str().to_owned())
        } else if let (Some(prefix), last) = scopename::split(name) {
            let target = self.find_scope_from(start, prefix)?;
            self.lookup_typedef(target, last).map(|(entry, found_in)| {
                *scope = Some(found_in);
                self.qualify_from(found_in, entry.ty.as_str())
            })
        } else {
            self.lookup_typedef(start, name).map(|(entry, found_in)| {
                *scope = Some(found_in);
                entry.ty.as_str().to_owned()
            })
        };

        match found {
            Some(found) if found == name => None,
            Some(found) => Some(found),
            None if TypeString::from(name).is_template() => self.resolve_template_args(name),
            None => None,
        }
    }

    /// An unqualified expansion found through a qualified lookup is itself
    /// qualified when it names a typedef of the defining scope.
    fn qualify_from(&self, scope: ScopeId, expansion: &str) -> String {
        let qname = &self.scope(scope).qname;
        if !scopename::check(expansion)
            && !qname.is_empty()
            && self.lookup_typedef(scope, expansion).is_some()
        {
            format!("{qname}::{expansion}")
        } else {
            expansion.to_owned()
        }
    }

    fn resolve_template_args(&self, name: &str) -> Option<String> {
        let ty = TypeString::from(name);
        let args = self.resolve_first(&ty.template_arglist())?;
        Some(format!(
            "{}<({})>{}",
            ty.templateprefix(),
            join(&args),
            ty.templatesuffix()
        ))
    }

    /// Expand the first parameter that expands; `None` when none does.
    fn resolve_first(&self, parms: &[TypeString]) -> Option<Vec<TypeString>> {
        parms.iter().enumerate().find_map(|(i, parm)| {
            let expanded = self.typedef_resolve(parm)?;
            let mut out = parms.to_vec();
            out[i] = expanded;
            Some(out)
        })
    }

    /// Expand `ty` until no typedef remains.
    ///
    /// Stops at the first repeated value, and before a step that only wraps
    /// an earlier value in constructors (`typedef A *A;`), so cyclic
    /// typedef chains terminate.
    #[tracing::instrument(level = "trace", skip_all, fields(ty = %ty))]
    pub fn resolve_all(&self, ty: &TypeString) -> TypeString {
        let key = (self.current, ty.clone());
        let cached = self.resolve_memo.borrow_mut().get(self.generation, &key);
        if let Some(hit) = cached {
            return hit;
        }

        let mut seen = FxHashSet::default();
        let mut current = ty.clone();
        while let Some(next) = self.typedef_resolve(&current) {
            if next.wraps(&current) || seen.iter().any(|earlier| next.wraps(earlier)) {
                break;
            }
            seen.insert(current);
            let repeated = seen.contains(&next);
            current = next;
            if repeated {
                break;
            }
        }

        self.resolve_memo
            .borrow_mut()
            .insert(self.generation, key, current.clone());
        current
    }
}
