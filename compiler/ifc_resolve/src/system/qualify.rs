//! Scope qualification of type names.

use ifc_stack::ensure_sufficient_stack;
use ifc_types::{scopename, TypeString};
use rustc_hash::FxHashSet;

use super::TypeSystem;
use crate::scope::{ScopeId, Symbol};

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl TypeSystem {
    /// Rewrite every name in `ty` to its fully qualified spelling.
    ///
    /// - a typedef name gets the qualified name of the scope defining it
    /// - a qualified name has its prefix qualified
    /// - a bare name naming a scope reachable outward from the current scope
    ///   gets that scope's name
    /// - template prefixes, template arguments and function parameters are
    ///   qualified recursively
    /// - an unchanged template argument naming an enumerator becomes
    ///   `Scope::item`, and one naming a constant becomes its value
    ///
    /// A leading `::` is dropped. Constructors other than functions and
    /// arrays are kept as they are.
    #[tracing::instrument(level = "trace", skip_all, fields(ty = %ty))]
    pub fn qualify(&self, ty: &TypeString) -> TypeString {
        let key = (self.current, ty.clone());
        let cached = self.qualify_memo.borrow_mut().get(self.generation, &key);
        if let Some(hit) = cached {
            return hit;
        }

        let qualified = ensure_sufficient_stack(|| self.qualify_elements(ty));
        self.qualify_memo
            .borrow_mut()
            .insert(self.generation, key, qualified.clone());
        qualified
    }

    fn qualify_elements(&self, ty: &TypeString) -> TypeString {
        let mut out = String::with_capacity(ty.as_str().len());
        for element in ty.elements() {
            let as_type = TypeString::from(element);
            if as_type.is_simple() {
                let qualified = self.qualify_simple(element);
                out.push_str(qualified.strip_prefix("::").unwrap_or(&qualified));
            } else if as_type.is_function() {
                out.push_str("f(");
                for (i, parm) in as_type.parmlist().iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(self.qualify(parm).as_str());
                }
                out.push_str(").");
            } else if as_type.is_array() {
                out.push_str("a(");
                out.push_str(&self.qualify_expr(as_type.parm()));
                out.push_str(").");
            } else {
                out.push_str(element);
            }
        }
        TypeString::new(out)
    }

    fn qualify_simple(&self, element: &str) -> String {
        let as_type = TypeString::from(element);
        if as_type.is_template() {
            return self.qualify_template(&as_type);
        }

        let (is_enum, name) = match element.strip_prefix("enum ") {
            Some(rest) => (true, rest),
            None => (false, element),
        };

        let qualified = if let Some((_, scope)) = self.lookup_typedef(self.current, name) {
            let qname = &self.scope(scope).qname;
            if qname.is_empty() {
                name.to_owned()
            } else {
                format!("{qname}::{name}")
            }
        } else if let (Some(prefix), last) = scopename::split(name) {
            format!("{}::{last}", self.qualify(&TypeString::from(prefix)))
        } else {
            self.unroll_scope_name(name)
        };

        if is_enum {
            format!("enum {qualified}")
        } else {
            qualified
        }
    }

    /// A bare name that names a scope nested somewhere on the way out of the
    /// current scope.
    fn unroll_scope_name(&self, name: &str) -> String {
        let mut next = Some(self.current);
        while let Some(scope) = next {
            let qname = &self.scope(scope).qname;
            let candidate = if qname.is_empty() {
                name.to_owned()
            } else {
                format!("{qname}::{name}")
            };
            if self.by_qname.contains_key(&candidate) {
                return candidate;
            }
            next = self.scope(scope).parent;
        }
        name.to_owned()
    }

    fn qualify_template(&self, ty: &TypeString) -> String {
        let mut out = self
            .qualify(&TypeString::from(ty.templateprefix()))
            .into_string();
        out.push_str("<(");
        for (i, arg) in ty.template_arglist().iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let qualified = self.qualify(arg);
            if qualified == *arg {
                out.push_str(&self.qualify_value(arg.as_str()));
            } else {
                out.push_str(qualified.as_str());
            }
        }
        out.push_str(")>");
        out.push_str(ty.templatesuffix());
        out
    }

    /// Follow symbol-table entries for a template value argument.
    fn qualify_value(&self, value: &str) -> String {
        let mut value = value.to_owned();
        let mut seen = FxHashSet::default();
        while seen.insert(value.clone()) {
            match self.lookup_symbol(&value) {
                Some((Symbol::EnumItem, scope)) => {
                    let qname = &self.scope(scope).qname;
                    if qname.is_empty() {
                        break;
                    }
                    value = format!("{qname}::{}", scopename::last(&value));
                }
                Some((Symbol::Constant { value: constant }, _)) => value.clone_from(constant),
                Some((Symbol::Other, _)) | None => break,
            }
        }
        value
    }

    /// Qualify the enumerators and constants named in an expression such as
    /// an array dimension.
    fn qualify_expr(&self, expr: &str) -> String {
        let mut out = String::with_capacity(expr.len());
        let mut rest = expr;
        while let Some(start) = rest.find(is_ident_start) {
            // An identifier glued to a preceding digit is a literal suffix.
            let glued = rest[..start]
                .chars()
                .next_back()
                .is_some_and(|c| is_ident_char(c) || c == ':');
            let len = rest[start..]
                .find(|c: char| !is_ident_char(c))
                .unwrap_or(rest.len() - start);
            let ident = &rest[start..start + len];
            out.push_str(&rest[..start]);
            match self.lookup_symbol(ident) {
                Some((Symbol::EnumItem | Symbol::Constant { .. }, scope))
                    if !glued && !self.scope(scope).qname.is_empty() =>
                {
                    out.push_str(&self.scope(scope).qname);
                    out.push_str("::");
                    out.push_str(ident);
                }
                _ => out.push_str(ident),
            }
            rest = &rest[start + len..];
        }
        out.push_str(rest);
        out
    }

    /// Symbol visible from the current scope, with the scope whose table
    /// holds it. A qualified name is looked up in the scope its prefix names.
    pub fn lookup_symbol(&self, name: &str) -> Option<(&Symbol, ScopeId)> {
        if let (Some(prefix), last) = scopename::split(name) {
            let scope = if prefix.is_empty() {
                ScopeId::GLOBAL
            } else {
                self.find_scope(prefix)?
            };
            let symbol = self.scope(scope).symtab.as_ref()?.get(last)?;
            return Some((symbol, scope));
        }

        let mut next = Some(self.current);
        while let Some(scope) = next {
            let data = self.scope(scope);
            if let Some(symbol) = data.symtab.as_ref().and_then(|table| table.get(name)) {
                return Some((symbol, scope));
            }
            next = data.parent;
        }
        None
    }
}
