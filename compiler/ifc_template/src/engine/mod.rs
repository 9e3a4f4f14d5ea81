//! Template registry and instantiation.
//!
//! Definitions are registered as the parser meets them:
//!
//! - the primary definition, by bare name
//! - explicit specializations, by the full instance name `Pair<(int,double)>`
//! - partial specializations, by a pattern over the arguments where `$n`
//!   stands for the base of argument `n` (`Box<(p.$1)>`)
//!
//! [`TemplateEngine::instantiate`] locates the best definition, copies its
//! body and expands the copy in place.

mod locate;

use ifc_ir::{NodeId, Parm, SourceLoc, Tree};
use ifc_resolve::TypeSystem;
use ifc_types::{text, TypeString};
use rustc_hash::FxHashMap;

use crate::arg::template_name;
use crate::expand::{expand, Expansion};
use crate::{TemplateArg, TemplateError, TemplateWarning};

pub use locate::{Located, Match};

#[derive(Clone, Debug)]
struct Partial {
    /// `name<(...)>` with `$n` placeholders.
    pattern: String,
    node: NodeId,
}

#[derive(Clone, Debug, Default)]
struct TemplateEntry {
    primary: Option<NodeId>,
    /// In registration order.
    partials: Vec<Partial>,
}

/// Registered template definitions and the warnings found while locating
/// them.
#[derive(Debug, Default)]
pub struct TemplateEngine {
    templates: FxHashMap<String, TemplateEntry>,
    specializations: FxHashMap<String, NodeId>,
    warnings: Vec<TemplateWarning>,
    /// Trace every candidate considered by `locate`.
    debug: bool,
}

impl TemplateEngine {
    pub fn new() -> Self {
        TemplateEngine::default()
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Warnings collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<TemplateWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Register the primary definition of `name`. A later registration
    /// replaces an earlier one.
    pub fn register_template(&mut self, name: &str, node: NodeId) {
        tracing::debug!(name, "register template");
        self.templates.entry(name.to_owned()).or_default().primary = Some(node);
    }

    /// Register an explicit specialization `template<> class name<args>`.
    ///
    /// The arguments are reduced the same way `locate` reduces them, so a
    /// specialization written with a typedef name is found through the
    /// underlying type.
    pub fn register_specialization(
        &mut self,
        types: &TypeSystem,
        name: &str,
        args: &[TemplateArg],
        node: NodeId,
    ) {
        let key = template_name(name, &reduce_args(types, args));
        tracing::debug!(%key, "register specialization");
        self.specializations.insert(key, node);
    }

    /// Register a partial specialization. `pattern_args` use `$n` for the
    /// base of the `n`th (1-based) instantiation argument, and `$n` also
    /// binds the `n`th template parameter of `node`.
    pub fn register_partial(&mut self, name: &str, pattern_args: &[TemplateArg], node: NodeId) {
        let pattern = template_name(name, pattern_args);
        tracing::debug!(%pattern, "register partial specialization");
        self.templates
            .entry(name.to_owned())
            .or_default()
            .partials
            .push(Partial { pattern, node });
    }

    pub fn is_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Instantiate `name<args>` as a new detached node exposed as `rname`.
    ///
    /// The definition's body is deep-copied and expanded; the definition
    /// itself is untouched. On error the copy (if any) is marked as failed
    /// and left unreachable.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name, rname = %rname))]
    pub fn instantiate(
        &mut self,
        tree: &mut Tree,
        types: &TypeSystem,
        name: &str,
        args: &[TemplateArg],
        rname: &str,
        loc: &SourceLoc,
    ) -> Result<NodeId, TemplateError> {
        let located = self.locate(tree, types, name, args, loc)?;
        let reduced = reduce_args(types, args);
        let copy = tree.deep_copy(located.node);

        let bound = match &located.kind {
            Match::Partial { pattern } => bind_partial(pattern, &tree[copy].template_parms, &reduced),
            Match::Exact | Match::Primary => reduced.clone(),
        };
        let expansion = Expansion::new(rname, &bound).with_instance_args(&reduced);
        if let Err(err) = expand(tree, types, copy, &expansion) {
            tree[copy].error = true;
            return Err(err);
        }
        tree[copy].sym_name = Some(rname.to_owned());
        tracing::debug!(
            instance = tree[copy].name.as_deref().unwrap_or_default(),
            "instantiated"
        );
        Ok(copy)
    }
}

/// Typedef-reduce and qualify the type arguments; values stay as written.
pub(crate) fn reduce_args(types: &TypeSystem, args: &[TemplateArg]) -> Vec<TemplateArg> {
    args.iter()
        .map(|arg| match arg {
            TemplateArg::Type(ty) => TemplateArg::Type(types.qualify(&types.resolve_all(ty))),
            TemplateArg::Value(_) => arg.clone(),
        })
        .collect()
}

/// Arguments for the parameters of a partial specialization.
///
/// Parameter `n` is bound through the pattern argument holding `$n`: when
/// that pattern argument is `<prefix>$n` and the actual argument starts
/// with the same prefix, the remainder is bound (`p.$1` against `p.p.int`
/// gives `p.int`); otherwise the argument's base is. Binding stops at the
/// first parameter without a placeholder, leaving it to its default.
fn bind_partial(pattern: &str, parms: &[Parm], args: &[TemplateArg]) -> Vec<TemplateArg> {
    let pattern_args = TypeString::from(pattern).template_arglist();
    let mut bound = Vec::with_capacity(parms.len());
    for n in 1..=parms.len() {
        let placeholder = format!("${n}");
        let Some((pattern_arg, arg)) = pattern_args
            .iter()
            .zip(args)
            .find(|(p, _)| text::contains_id(p.as_str(), &placeholder))
        else {
            break;
        };
        bound.push(bind_one(pattern_arg.as_str(), &placeholder, arg));
    }
    bound
}

fn bind_one(pattern_arg: &str, placeholder: &str, arg: &TemplateArg) -> TemplateArg {
    let TemplateArg::Type(ty) = arg else {
        return arg.clone();
    };
    let stripped = pattern_arg
        .strip_suffix(placeholder)
        .and_then(|prefix| ty.as_str().strip_prefix(prefix))
        .filter(|rest| !rest.is_empty());
    match stripped {
        Some(rest) => TemplateArg::ty(rest),
        None => TemplateArg::Type(ty.base()),
    }
}
