//! Type scopes and the symbol tables attached to them.

use std::fmt;

use ifc_types::TypeString;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Index of a scope in the [`TypeSystem`](crate::TypeSystem) arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The global scope is always the first one allocated.
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    pub const fn new(index: u32) -> Self {
        ScopeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// One entry of a scope's typedef table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypedefEntry {
    pub ty: TypeString,
    /// Set for class names, which map to themselves.
    pub is_class: bool,
}

/// What a symbol-table name refers to.
///
/// Only the distinctions template-argument qualification needs are kept.
/// An enumerator is qualified with the scope whose table holds it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    EnumItem,
    /// Named constant with a known value.
    Constant { value: String },
    Other,
}

/// Symbols declared in one scope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.symbols.insert(name.into(), symbol);
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, symbol: Symbol) -> Self {
        self.insert(name, symbol);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A typedef scope: the global scope, a namespace, a class, or an alias.
#[derive(Clone, Debug)]
pub(crate) struct ScopeData {
    /// Fully qualified name; empty for the global scope.
    pub(crate) qname: String,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) typedefs: FxHashMap<String, TypedefEntry>,
    pub(crate) symtab: Option<SymbolTable>,
    /// Scopes searched after this one's own table, in declaration order.
    pub(crate) inherits: SmallVec<[ScopeId; 2]>,
    /// Scopes brought in by `using namespace`; a subset of `inherits`.
    pub(crate) usings: SmallVec<[ScopeId; 2]>,
    /// Created to stand in for another scope (typedef or using of a scope).
    pub(crate) alias: bool,
}

impl ScopeData {
    pub(crate) fn new(qname: String, parent: Option<ScopeId>) -> Self {
        ScopeData {
            qname,
            parent,
            typedefs: FxHashMap::default(),
            symtab: None,
            inherits: SmallVec::new(),
            usings: SmallVec::new(),
            alias: false,
        }
    }
}
