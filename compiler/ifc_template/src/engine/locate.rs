//! Choosing the definition an instantiation uses.

use ifc_ir::{NodeId, SourceLoc, Tree};
use ifc_resolve::TypeSystem;
use ifc_types::{text, TypeString, WILDCARD};

use super::{reduce_args, TemplateEngine};
use crate::arg::template_name;
use crate::{TemplateArg, TemplateError, TemplateWarning};

/// How a definition was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Match {
    /// Explicit specialization for exactly these arguments.
    Exact,
    /// Partial specialization with the given pattern.
    Partial { pattern: String },
    Primary,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Located {
    pub node: NodeId,
    pub kind: Match,
}

/// `name<(...)>` built from each argument's degraded form with the
/// wildcard put back to the argument's base: `a(10).int` gives `a(ANY).int`.
fn reduced_name(types: &TypeSystem, name: &str, args: &[TemplateArg]) -> String {
    let reduced: Vec<TemplateArg> = args
        .iter()
        .map(|arg| match arg {
            TemplateArg::Type(ty) => {
                let base = ty.base();
                let degraded = ty.default_type(types).unwrap_or_else(|| ty.clone());
                let text = text::replace_id(degraded.as_str(), WILDCARD, base.as_str());
                TemplateArg::ty(text::replace_id(&text, "SWIGENUM", base.as_str()))
            }
            TemplateArg::Value(_) => arg.clone(),
        })
        .collect();
    template_name(name, &reduced)
}

fn check_template(tree: &Tree, name: &str, node: NodeId) -> Result<NodeId, TemplateError> {
    let kind = tree[node].kind;
    if kind.is_template() {
        Ok(node)
    } else {
        Err(TemplateError::NotATemplate {
            name: name.to_owned(),
            kind,
        })
    }
}

impl TemplateEngine {
    /// Find the definition `name<args>` instantiates.
    ///
    /// An explicit specialization for the reduced arguments wins. Otherwise
    /// each partial pattern, with `$n` replaced by the base of argument `n`,
    /// is compared against the instance name and against the reduced name;
    /// the first matching pattern in registration order is used (with an
    /// ambiguity warning when several match). Without a matching partial
    /// the primary definition is used.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn locate(
        &mut self,
        tree: &Tree,
        types: &TypeSystem,
        name: &str,
        args: &[TemplateArg],
        loc: &SourceLoc,
    ) -> Result<Located, TemplateError> {
        let args = reduce_args(types, args);
        let tname = template_name(name, &args);
        if self.debug {
            tracing::debug!(candidate = %tname, "searching exact specialization");
        }
        if let Some(&node) = self.specializations.get(&tname) {
            return Ok(Located {
                node: check_template(tree, name, node)?,
                kind: Match::Exact,
            });
        }

        let Some(entry) = self.templates.get(name) else {
            return Err(TemplateError::UndefinedTemplate {
                name: name.to_owned(),
            });
        };

        let rname = reduced_name(types, name, &args);
        let mut matched = Vec::new();
        for partial in &entry.partials {
            let mut candidate = partial.pattern.clone();
            for (i, arg) in args.iter().enumerate() {
                candidate = text::replace_id(
                    &candidate,
                    &format!("${}", i + 1),
                    &arg.placeholder_text(),
                );
            }
            if self.debug {
                tracing::debug!(%candidate, pattern = %partial.pattern, "searching partial specialization");
            }
            if candidate == tname || candidate == rname {
                matched.push(partial);
            }
        }

        if let Some(&first) = matched.first() {
            let located = Located {
                node: check_template(tree, name, first.node)?,
                kind: Match::Partial {
                    pattern: first.pattern.clone(),
                },
            };
            if matched.len() > 1 {
                let warning = TemplateWarning::Ambiguous {
                    instance: TypeString::from(tname.as_str()).namestr(),
                    chosen: TypeString::from(first.pattern.as_str()).namestr(),
                    chosen_loc: tree[first.node].loc.clone(),
                    loc: loc.clone(),
                };
                tracing::warn!("{warning}");
                self.warnings.push(warning);
            }
            return Ok(located);
        }

        match entry.primary {
            Some(node) => Ok(Located {
                node: check_template(tree, name, node)?,
                kind: Match::Primary,
            }),
            None => Err(TemplateError::UndefinedTemplate {
                name: name.to_owned(),
            }),
        }
    }
}
