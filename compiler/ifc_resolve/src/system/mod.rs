//! The scoped type system.
//!
//! Scopes form a tree rooted at the global scope. Each scope owns a typedef
//! table; lookups search the scope itself, then the scopes it inherits from
//! (base classes, `using namespace`, aliases) depth-first in declaration
//! order, then its lexical parent.
//!
//! ```text
//! typedef int A;          // global: A -> int
//! namespace Foo {
//!   typedef A B;          // Foo:    B -> A
//! }
//! Foo::B                  // -> A -> int
//! ```
//!
//! Resolution results are memoized per `(scope, type)`. Every mutation bumps
//! a generation counter, which invalidates both memo tables at once.

mod lookup;
mod qualify;
mod typedefs;

use std::cell::RefCell;
use std::fmt::Write as _;

use ifc_types::{TypeString, TypedefResolver};
use rustc_hash::FxHashMap;

use crate::registry::Registry;
use crate::scope::{ScopeData, ScopeId, SymbolTable, TypedefEntry};

/// Name given to scopes opened without one.
pub const UNNAMED_SCOPE: &str = "<unnamed>";

/// Generation-tagged cache of type-to-type results.
#[derive(Debug, Default)]
struct Memo {
    generation: u64,
    entries: FxHashMap<(ScopeId, TypeString), TypeString>,
}

impl Memo {
    fn sync(&mut self, generation: u64) {
        if self.generation != generation {
            self.entries.clear();
            self.generation = generation;
        }
    }

    fn get(&mut self, generation: u64, key: &(ScopeId, TypeString)) -> Option<TypeString> {
        self.sync(generation);
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, generation: u64, key: (ScopeId, TypeString), value: TypeString) {
        self.sync(generation);
        self.entries.insert(key, value);
    }
}

/// Scope graph, typedef tables and the runtime type registry of one
/// compilation.
#[derive(Debug)]
pub struct TypeSystem {
    scopes: Vec<ScopeData>,
    /// Qualified scope name to scope, including namespace aliases.
    by_qname: FxHashMap<String, ScopeId>,
    current: ScopeId,
    generation: u64,
    resolve_memo: RefCell<Memo>,
    qualify_memo: RefCell<Memo>,
    pub(crate) registry: Registry,
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSystem {
    /// A type system holding only the empty global scope.
    pub fn new() -> Self {
        let mut by_qname = FxHashMap::default();
        by_qname.insert(String::new(), ScopeId::GLOBAL);
        TypeSystem {
            scopes: vec![ScopeData::new(String::new(), None)],
            by_qname,
            current: ScopeId::GLOBAL,
            generation: 0,
            resolve_memo: RefCell::default(),
            qualify_memo: RefCell::default(),
            registry: Registry::default(),
        }
    }

    /// Counter bumped by every mutation of the scope graph.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    fn bump(&mut self) {
        self.generation += 1;
    }

    #[inline]
    fn scope(&self, id: ScopeId) -> &ScopeData {
        &self.scopes[id.index()]
    }

    #[inline]
    fn scope_mut(&mut self, id: ScopeId) -> &mut ScopeData {
        &mut self.scopes[id.index()]
    }

    // Scope management

    #[inline]
    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    #[inline]
    pub fn global_scope(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    /// Open a scope nested in the current one and make it current.
    ///
    /// Opening a named scope that already exists under the same parent
    /// re-enters it, so a reopened namespace keeps its typedefs.
    pub fn new_scope(&mut self, name: Option<&str>) -> ScopeId {
        let name = name.unwrap_or(UNNAMED_SCOPE);
        let parent = self.current;
        let parent_qname = &self.scope(parent).qname;
        let qname = if parent_qname.is_empty() {
            name.to_owned()
        } else {
            format!("{parent_qname}::{name}")
        };

        if name != UNNAMED_SCOPE {
            if let Some(&existing) = self.by_qname.get(&qname) {
                if self.scope(existing).parent == Some(parent) {
                    tracing::debug!(scope = %qname, "re-entering scope");
                    self.current = existing;
                    self.bump();
                    return existing;
                }
            }
        }

        let id = ScopeId::new(
            u32::try_from(self.scopes.len())
                .unwrap_or_else(|_| panic!("more than {} type scopes", u32::MAX)),
        );
        tracing::debug!(scope = %qname, "new scope");
        self.scopes.push(ScopeData::new(qname.clone(), Some(parent)));
        self.by_qname.insert(qname, id);
        self.current = id;
        self.bump();
        id
    }

    /// Leave the current scope, returning it.
    ///
    /// The global scope cannot be left; popping it returns `None`.
    pub fn pop_scope(&mut self) -> Option<ScopeId> {
        let popped = self.current;
        let parent = self.scope(popped).parent?;
        self.current = parent;
        self.bump();
        Some(popped)
    }

    /// Make `scope` current (`None` selects the global scope), returning the
    /// previous one.
    pub fn set_scope(&mut self, scope: Option<ScopeId>) -> ScopeId {
        let old = self.current;
        self.current = scope.unwrap_or(ScopeId::GLOBAL);
        self.bump();
        old
    }

    /// Make the current scope search `scope` after its own table.
    ///
    /// Used for base classes, namespace imports and aliases. Inheriting a
    /// scope twice, or the current scope itself, has no effect.
    pub fn inherit_scope(&mut self, scope: ScopeId) {
        let current = self.current;
        if scope == current || self.scope(current).inherits.contains(&scope) {
            return;
        }
        tracing::debug!(
            scope = %self.scope(current).qname,
            inherits = %self.scope(scope).qname,
            "inherit scope"
        );
        self.scope_mut(current).inherits.push(scope);
        self.bump();
    }

    /// `using namespace`: inherit `scope` and search it for nested scope names.
    pub fn using_scope(&mut self, scope: ScopeId) {
        self.inherit_scope(scope);
        let current = self.current;
        if scope != current && !self.scope(current).usings.contains(&scope) {
            self.scope_mut(current).usings.push(scope);
        }
        self.bump();
    }

    /// `namespace alias = scope;` in the current scope.
    pub fn scope_alias(&mut self, alias: &str, scope: ScopeId) {
        let qname = &self.scope(self.current).qname;
        let qalias = if qname.is_empty() {
            alias.to_owned()
        } else {
            format!("{qname}::{alias}")
        };
        tracing::debug!(alias = %qalias, target = %self.scope(scope).qname, "scope alias");
        self.by_qname.insert(qalias, scope);
        self.bump();
    }

    /// Attach the symbol table of the current scope.
    pub fn attach_symtab(&mut self, symtab: SymbolTable) {
        let current = self.current;
        self.scope_mut(current).symtab = Some(symtab);
        self.bump();
    }

    /// Fully qualified name of `scope`; empty for the global scope.
    pub fn scope_name(&self, scope: ScopeId) -> &str {
        &self.scope(scope).qname
    }

    /// Lexical parent of `scope`.
    pub fn scope_parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scope(scope).parent
    }

    /// Whether `scope` was created to stand in for another scope.
    pub fn is_alias_scope(&self, scope: ScopeId) -> bool {
        self.scope(scope).alias
    }

    /// Typedef entry for `name` in exactly `scope`.
    pub fn typedef_entry(&self, scope: ScopeId, name: &str) -> Option<&TypedefEntry> {
        self.scope(scope).typedefs.get(name)
    }

    /// Human-readable listing of every scope, its inherited scopes and its
    /// typedef table, sorted by qualified name.
    pub fn dump_scopes(&self) -> String {
        let mut names: Vec<(&String, &ScopeId)> = self.by_qname.iter().collect();
        names.sort();

        let mut out = String::new();
        for (qname, &id) in names {
            let scope = self.scope(id);
            let _ = writeln!(out, "Type scope '{qname}'");
            for &inherited in &scope.inherits {
                let _ = writeln!(out, "    Inherits from '{}'", self.scope(inherited).qname);
            }
            out.push_str("-------------------------------------------------------------\n");
            let mut typedefs: Vec<_> = scope.typedefs.iter().collect();
            typedefs.sort_by(|a, b| a.0.cmp(b.0));
            for (name, entry) in typedefs {
                let _ = writeln!(out, "{name:>40} -> {}", entry.ty);
            }
        }
        out
    }
}

impl TypedefResolver for TypeSystem {
    fn typedef_resolve(&self, ty: &TypeString) -> Option<TypeString> {
        TypeSystem::typedef_resolve(self, ty)
    }

    fn typedef_resolve_all(&self, ty: &TypeString) -> TypeString {
        self.resolve_all(ty)
    }
}
