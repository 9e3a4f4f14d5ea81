//! Parse-tree arena.

use std::fmt;
use std::ops::{Index, IndexMut};

use ifc_types::TypeString;

use crate::SourceLoc;

/// Index into a [`Tree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
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

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Declaration kinds the type core distinguishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    Class,
    Constructor,
    Destructor,
    /// Function, variable or member declaration.
    Cdecl,
    /// `using` declaration.
    Using,
    Namespace,
    Enum,
    EnumItem,
    Extend,
    /// Verbatim code block.
    Insert,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Constructor => "constructor",
            DeclKind::Destructor => "destructor",
            DeclKind::Cdecl => "cdecl",
            DeclKind::Using => "using",
            DeclKind::Namespace => "namespace",
            DeclKind::Enum => "enum",
            DeclKind::EnumItem => "enumitem",
            DeclKind::Extend => "extend",
            DeclKind::Insert => "insert",
        }
    }
}

/// Node kind: a declaration, or a template of one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Decl(DeclKind),
    Template(DeclKind),
}

impl NodeKind {
    /// The declaration kind, looking through a template wrapper.
    #[inline]
    pub fn decl_kind(self) -> DeclKind {
        match self {
            NodeKind::Decl(kind) | NodeKind::Template(kind) => kind,
        }
    }

    #[inline]
    pub fn is_template(self) -> bool {
        matches!(self, NodeKind::Template(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Decl(kind) => f.write_str(kind.as_str()),
            NodeKind::Template(kind) => write!(f, "template {}", kind.as_str()),
        }
    }
}

/// One parameter: function argument, template parameter or throw type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Parm {
    pub name: Option<String>,
    pub ty: TypeString,
    /// Default value text.
    pub value: Option<String>,
}

impl Parm {
    pub fn new(ty: impl Into<TypeString>) -> Self {
        Parm {
            name: None,
            ty: ty.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A parse-tree node and its typed attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub name: Option<String>,
    /// Name exposed to the target language.
    pub sym_name: Option<String>,
    pub ty: Option<TypeString>,
    /// Declarator applied to `ty` (`p.`, `f(int).`, ...).
    pub decl: Option<TypeString>,
    pub value: Option<String>,
    pub code: Option<String>,
    pub parms: Vec<Parm>,
    pub throws: Vec<Parm>,
    /// Typemap-style patterns.
    pub pattern: Vec<Parm>,
    /// Base classes, as type strings.
    pub baselist: Vec<String>,
    /// Parameters of a template node.
    pub template_parms: Vec<Parm>,
    /// Set on `operator T()` declarations, whose name embeds a type.
    pub conversion_operator: bool,
    /// Name brought in by a `using` declaration.
    pub uname: Option<String>,
    /// Set when the declaration failed to instantiate.
    pub error: bool,
    pub loc: SourceLoc,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            name: None,
            sym_name: None,
            ty: None,
            decl: None,
            value: None,
            code: None,
            parms: Vec::new(),
            throws: Vec::new(),
            pattern: Vec::new(),
            baselist: Vec::new(),
            template_parms: Vec::new(),
            conversion_operator: false,
            uname: None,
            error: false,
            loc: SourceLoc::synthetic(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn decl(kind: DeclKind) -> Self {
        Node::new(NodeKind::Decl(kind))
    }

    pub fn template(kind: DeclKind) -> Self {
        Node::new(NodeKind::Template(kind))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_sym_name(mut self, sym_name: impl Into<String>) -> Self {
        self.sym_name = Some(sym_name.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: impl Into<TypeString>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    #[must_use]
    pub fn with_decl(mut self, decl: impl Into<TypeString>) -> Self {
        self.decl = Some(decl.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_parms(mut self, parms: Vec<Parm>) -> Self {
        self.parms = parms;
        self
    }

    #[must_use]
    pub fn with_throws(mut self, throws: Vec<Parm>) -> Self {
        self.throws = throws;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: Vec<Parm>) -> Self {
        self.pattern = pattern;
        self
    }

    #[must_use]
    pub fn with_baselist(mut self, bases: Vec<String>) -> Self {
        self.baselist = bases;
        self
    }

    #[must_use]
    pub fn with_template_parms(mut self, parms: Vec<Parm>) -> Self {
        self.template_parms = parms;
        self
    }

    #[must_use]
    pub fn with_uname(mut self, uname: impl Into<String>) -> Self {
        self.uname = Some(uname.into());
        self
    }

    #[must_use]
    pub fn with_loc(mut self, loc: SourceLoc) -> Self {
        self.loc = loc;
        self
    }

    #[must_use]
    pub fn as_conversion_operator(mut self) -> Self {
        self.conversion_operator = true;
        self
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Copy of the attributes without tree links.
    fn detached(&self) -> Node {
        Node {
            parent: None,
            children: Vec::new(),
            ..self.clone()
        }
    }
}

/// Arena of parse-tree nodes.
///
/// Nodes are never freed; a copied or abandoned subtree simply stays
/// unreachable from the root.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a detached node.
    pub fn alloc(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(
            u32::try_from(self.nodes.len())
                .unwrap_or_else(|_| panic!("parse tree exceeds {} nodes", u32::MAX)),
        );
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        id
    }

    /// Add `node` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.alloc(node);
        self.attach(parent, id);
        id
    }

    /// Link a detached node as the last child of `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Unlink `child` from its parent, if any.
    pub fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|&c| c != child);
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Copy the subtree rooted at `id`. The copy is detached.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let root = self.alloc(self.nodes[id.index()].detached());
        let mut work = vec![(id, root)];
        while let Some((source, target)) = work.pop() {
            let children = self.nodes[source.index()].children.clone();
            for child in children {
                let copy = self.alloc(self.nodes[child.index()].detached());
                self.attach(target, copy);
                work.push((child, copy));
            }
        }
        root
    }

    /// The subtree rooted at `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.index()].children.iter().rev());
        }
        out
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.get(id)
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.get_mut(id)
    }
}
