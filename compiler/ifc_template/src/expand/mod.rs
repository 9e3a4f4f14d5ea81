//! Template body expansion.
//!
//! A copied template body is walked once to collect every attribute that
//! may mention a template parameter. Three kinds of slot are kept apart
//! because each is rewritten differently:
//!
//! - type slots (`ty`, `decl`, parameter types, base classes) get
//!   `typename_replace`
//! - value slots (initializers, names that already carry template
//!   arguments) get identifier replacement with the encoded argument
//! - code slots (bodies, default values, conversion-operator names) get
//!   `#param` stringification and the C spelling of the argument
//!
//! The node kind decides which attributes are collected:
//!
//! ```text
//! class        base list, then every child
//! constructor  name/sym_name rewritten, code, decl, parms, throws
//! destructor   name/sym_name rewritten, code
//! cdecl        ty, decl, value, code, parms, throws (+ name if operator T())
//! using        uname when it names a template instance
//! other        code, ty, decl, parms, pattern, throws, then every child
//! ```

use ifc_ir::{DeclKind, Node, NodeId, NodeKind, Tree};
use ifc_resolve::TypeSystem;
use ifc_stack::ensure_sufficient_stack;
use ifc_types::{scopename, text, TypeString};

use crate::arg::template_args;
use crate::{TemplateArg, TemplateError};

/// What a template body is being expanded into.
#[derive(Clone, Copy, Debug)]
pub struct Expansion<'a> {
    /// Name the instance is exposed under.
    pub rname: &'a str,
    /// Arguments bound to the definition's template parameters.
    pub args: &'a [TemplateArg],
    /// Arguments as written at the instantiation; they form the instance
    /// name. Differs from `args` for partial specializations.
    pub instance_args: &'a [TemplateArg],
}

impl<'a> Expansion<'a> {
    pub fn new(rname: &'a str, args: &'a [TemplateArg]) -> Self {
        Expansion {
            rname,
            args,
            instance_args: args,
        }
    }

    #[must_use]
    pub fn with_instance_args(mut self, instance_args: &'a [TemplateArg]) -> Self {
        self.instance_args = instance_args;
        self
    }
}

#[derive(Copy, Clone, Debug)]
enum TypeSlot {
    Ty,
    Decl,
    Parm(usize),
    Throw(usize),
    Pattern(usize),
    Base(usize),
}

#[derive(Copy, Clone, Debug)]
enum TextSlot {
    Name,
    SymName,
    Value,
    Code,
    Uname,
    ParmValue(usize),
    ThrowValue(usize),
    PatternValue(usize),
}

fn map_type(node: &mut Node, slot: TypeSlot, f: impl Fn(&TypeString) -> TypeString) {
    let target = match slot {
        TypeSlot::Ty => node.ty.as_mut(),
        TypeSlot::Decl => node.decl.as_mut(),
        TypeSlot::Parm(i) => node.parms.get_mut(i).map(|p| &mut p.ty),
        TypeSlot::Throw(i) => node.throws.get_mut(i).map(|p| &mut p.ty),
        TypeSlot::Pattern(i) => node.pattern.get_mut(i).map(|p| &mut p.ty),
        TypeSlot::Base(i) => {
            if let Some(base) = node.baselist.get_mut(i) {
                *base = f(&TypeString::from(base.as_str())).into_string();
            }
            return;
        }
    };
    if let Some(ty) = target {
        *ty = f(ty);
    }
}

fn text_mut(node: &mut Node, slot: TextSlot) -> Option<&mut String> {
    match slot {
        TextSlot::Name => node.name.as_mut(),
        TextSlot::SymName => node.sym_name.as_mut(),
        TextSlot::Value => node.value.as_mut(),
        TextSlot::Code => node.code.as_mut(),
        TextSlot::Uname => node.uname.as_mut(),
        TextSlot::ParmValue(i) => node.parms.get_mut(i)?.value.as_mut(),
        TextSlot::ThrowValue(i) => node.throws.get_mut(i)?.value.as_mut(),
        TextSlot::PatternValue(i) => node.pattern.get_mut(i)?.value.as_mut(),
    }
}

fn map_text(node: &mut Node, slot: TextSlot, f: impl Fn(&str) -> String) {
    if let Some(text) = text_mut(node, slot) {
        *text = f(text);
    }
}

#[derive(Default)]
struct Slots {
    types: Vec<(NodeId, TypeSlot)>,
    values: Vec<(NodeId, TextSlot)>,
    code: Vec<(NodeId, TextSlot)>,
}

impl Slots {
    fn parms(&mut self, id: NodeId, node: &Node) {
        for i in 0..node.parms.len() {
            self.code.push((id, TextSlot::ParmValue(i)));
            self.types.push((id, TypeSlot::Parm(i)));
        }
    }

    fn throws(&mut self, id: NodeId, node: &Node) {
        for i in 0..node.throws.len() {
            self.code.push((id, TextSlot::ThrowValue(i)));
            self.types.push((id, TypeSlot::Throw(i)));
        }
    }

    fn pattern(&mut self, id: NodeId, node: &Node) {
        for i in 0..node.pattern.len() {
            self.code.push((id, TextSlot::PatternValue(i)));
            self.types.push((id, TypeSlot::Pattern(i)));
        }
    }
}

struct Walk<'a> {
    /// Template name without arguments.
    tname: &'a str,
    rname: &'a str,
    /// `<(...)>` of the instance.
    instance_args: &'a str,
    slots: Slots,
}

impl Walk<'_> {
    /// `unwrapped` is set once the first template node on the way down has
    /// been turned into a plain declaration; templates below it keep their
    /// tag.
    fn node(&mut self, tree: &mut Tree, id: NodeId, unwrapped: bool) {
        if tree[id].error {
            return;
        }
        let kind = tree[id].kind;
        ensure_sufficient_stack(|| match kind {
            NodeKind::Template(kind) => {
                if !unwrapped {
                    tree[id].kind = NodeKind::Decl(kind);
                }
                self.decl(tree, id, kind, true, true);
            }
            NodeKind::Decl(kind) => self.decl(tree, id, kind, false, unwrapped),
        });
    }

    fn children(&mut self, tree: &mut Tree, id: NodeId, unwrapped: bool) {
        for child in tree.children(id).to_vec() {
            self.node(tree, child, unwrapped);
        }
    }

    fn decl(&mut self, tree: &mut Tree, id: NodeId, kind: DeclKind, templated: bool, unwrapped: bool) {
        match kind {
            DeclKind::Cdecl => {
                let node = &tree[id];
                self.slots.types.push((id, TypeSlot::Ty));
                self.slots.types.push((id, TypeSlot::Decl));
                self.slots.values.push((id, TextSlot::Value));
                self.slots.code.push((id, TextSlot::Code));
                if node.conversion_operator {
                    self.slots.code.push((id, TextSlot::Name));
                    self.slots.code.push((id, TextSlot::SymName));
                }
                self.slots.parms(id, node);
                self.slots.throws(id, node);
            }
            DeclKind::Class => {
                for i in 0..tree[id].baselist.len() {
                    self.slots.types.push((id, TypeSlot::Base(i)));
                }
                self.children(tree, id, unwrapped);
            }
            DeclKind::Constructor => {
                if !templated {
                    self.rename_constructor(tree.get_mut(id), id);
                }
                let node = &tree[id];
                self.slots.code.push((id, TextSlot::Code));
                self.slots.types.push((id, TypeSlot::Decl));
                self.slots.parms(id, node);
                self.slots.throws(id, node);
            }
            DeclKind::Destructor => {
                self.rename_destructor(tree.get_mut(id), id);
                self.slots.code.push((id, TextSlot::Code));
            }
            DeclKind::Using => {
                if tree[id].uname.as_deref().is_some_and(|u| u.contains('<')) {
                    self.slots.values.push((id, TextSlot::Uname));
                }
            }
            DeclKind::Namespace
            | DeclKind::Enum
            | DeclKind::EnumItem
            | DeclKind::Extend
            | DeclKind::Insert => {
                let node = &tree[id];
                self.slots.code.push((id, TextSlot::Code));
                self.slots.types.push((id, TypeSlot::Ty));
                self.slots.types.push((id, TypeSlot::Decl));
                self.slots.parms(id, node);
                self.slots.pattern(id, node);
                self.slots.throws(id, node);
                self.children(tree, id, unwrapped);
            }
        }
    }

    /// `Pair(...)` becomes `Pair<(int,double)>(...)`, exposed as `rname`.
    fn rename_constructor(&mut self, node: &mut Node, id: NodeId) {
        for name in [node.name.as_mut(), node.sym_name.as_mut()].into_iter().flatten() {
            let stripped = TypeString::from(name.as_str()).templateprefix().to_owned();
            if !stripped.is_empty() && self.tname.contains(stripped.as_str()) {
                *name = text::replace_id(name, &stripped, self.tname);
            }
        }
        if let Some(name) = node.name.as_mut() {
            if name.contains('<') {
                self.slots.values.push((id, TextSlot::Name));
            } else {
                name.push_str(self.instance_args);
            }
        }
        if let Some(sym_name) = node.sym_name.as_mut() {
            *sym_name = if sym_name.contains('<') {
                self.rname.to_owned()
            } else {
                sym_name.replace(self.tname, self.rname)
            };
        }
    }

    /// `~Pair` becomes `~Pair<(int,double)>`, exposed as `~rname`.
    fn rename_destructor(&mut self, node: &mut Node, id: NodeId) {
        if let Some(name) = node.name.as_mut() {
            if name.contains('<') {
                self.slots.values.push((id, TextSlot::Name));
            } else {
                name.push_str(self.instance_args);
            }
        }
        if let Some(sym_name) = node.sym_name.as_mut() {
            if sym_name.contains('<') {
                self.slots.values.push((id, TextSlot::SymName));
            } else {
                *sym_name = sym_name.replace(self.tname, self.rname);
            }
        }
    }
}

/// Default of a template parameter, as an argument of the right kind.
fn default_arg(parm: &ifc_ir::Parm, default: &str) -> TemplateArg {
    match parm.ty.as_str() {
        "typename" | "class" => TemplateArg::ty(default),
        _ => TemplateArg::value(default),
    }
}

/// Rewrite the (already copied) template body at `node` into the instance
/// described by `expansion`.
///
/// Missing trailing arguments take the parameter defaults; earlier
/// arguments are substituted into later defaults first. A definition
/// without template parameters (an explicit specialization) only has its
/// own name replaced by the instance name. Base classes are qualified in
/// the current scope of `types` afterwards.
#[tracing::instrument(level = "debug", skip_all, fields(rname = expansion.rname))]
pub fn expand(
    tree: &mut Tree,
    types: &TypeSystem,
    node: NodeId,
    expansion: &Expansion<'_>,
) -> Result<(), TemplateError> {
    let template_name = tree[node].name.clone().unwrap_or_default();
    let tname = TypeString::from(template_name.as_str())
        .templateprefix()
        .to_owned();
    let tparms = tree[node].template_parms.clone();

    let given = expansion.args.len();
    let arity_error = || TemplateError::ArityMismatch {
        name: tname.clone(),
        expected: tparms.len(),
        given,
    };
    if !tparms.is_empty() && given > tparms.len() {
        return Err(arity_error());
    }
    if tparms.iter().skip(given).any(|parm| parm.value.is_none()) {
        return Err(arity_error());
    }

    let instance_args = template_args(expansion.instance_args);
    let mut walk = Walk {
        tname: &tname,
        rname: expansion.rname,
        instance_args: &instance_args,
        slots: Slots::default(),
    };
    walk.node(tree, node, false);
    let slots = walk.slots;

    let iname = format!("{tname}{instance_args}");
    if tree[node].name.is_some() {
        tree[node].name = Some(iname.clone());
    }
    let tbase = scopename::last(&tname).to_owned();

    if tparms.is_empty() {
        for &(id, slot) in &slots.types {
            map_type(tree.get_mut(id), slot, |ty| ty.typename_replace(&tbase, &iname));
        }
    } else {
        let mut defaults: Vec<Option<String>> = tparms.iter().map(|p| p.value.clone()).collect();
        for (i, parm) in tparms.iter().enumerate() {
            let arg = match expansion.args.get(i) {
                Some(arg) => arg.clone(),
                None => match &defaults[i] {
                    Some(default) => default_arg(parm, default),
                    None => return Err(arity_error()),
                },
            };
            let Some(name) = parm.name.as_deref() else {
                continue;
            };
            let value = arg.as_str();
            let spelling = arg.spelling();
            tracing::trace!(parm = name, arg = value, "substituting template parameter");

            for later in defaults.iter_mut().skip(i + 1).flatten() {
                *later = text::replace_id(later, name, value);
            }
            for &(id, slot) in &slots.values {
                map_text(tree.get_mut(id), slot, |s| text::replace_id(s, name, value));
            }
            for &(id, slot) in &slots.types {
                map_type(tree.get_mut(id), slot, |ty| {
                    ty.typename_replace(name, value)
                        .typename_replace(&tbase, &iname)
                });
            }
            let stringified = format!("#{name}");
            let quoted = format!("\"{spelling}\"");
            for &(id, slot) in &slots.code {
                map_text(tree.get_mut(id), slot, |s| {
                    let s = text::replace_id(s, &stringified, &quoted);
                    text::replace_id(&s, name, &spelling)
                });
            }
        }
    }

    let bases = std::mem::take(&mut tree[node].baselist);
    tree[node].baselist = bases
        .into_iter()
        .map(|base| types.qualify(&TypeString::from(base)).into_string())
        .collect();
    Ok(())
}
