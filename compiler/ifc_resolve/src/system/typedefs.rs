//! Typedef table management.

use ifc_types::{scopename, TypeString};

use super::TypeSystem;
use crate::error::TypedefError;
use crate::scope::{ScopeId, TypedefEntry};

impl TypeSystem {
    fn already_defined(&self, name: &str) -> Option<TypedefError> {
        let scope = self.scope(self.current);
        scope
            .typedefs
            .contains_key(name)
            .then(|| TypedefError::AlreadyDefined {
                name: name.to_owned(),
                scope: if scope.qname.is_empty() {
                    "::".to_owned()
                } else {
                    scope.qname.clone()
                },
            })
    }

    fn insert_typedef(&mut self, scope: ScopeId, name: &str, entry: TypedefEntry) {
        tracing::debug!(
            scope = %self.scope(scope).qname,
            name,
            ty = %entry.ty,
            class = entry.is_class,
            "typedef"
        );
        self.scope_mut(scope).typedefs.insert(name.to_owned(), entry);
        self.bump();
    }

    /// A scope named `name` in the current scope that stands in for `target`.
    fn alias_scope(&mut self, name: &str, target: ScopeId) {
        let alias = self.new_scope(Some(name));
        self.scope_mut(alias).alias = true;
        self.inherit_scope(target);
        self.pop_scope();
    }

    /// `typedef ty name;` in the current scope.
    ///
    /// Typedef-ing a name to itself is accepted and ignored. When `ty` names
    /// a scope, `name` also becomes a scope inheriting from it, so
    /// `name::member` resolves.
    pub fn typedef(&mut self, ty: &TypeString, name: &str) -> Result<(), TypedefError> {
        if let Some(err) = self.already_defined(name) {
            return Err(err);
        }
        if ty.as_str() == name {
            return Ok(());
        }
        if let Some(target) = self.find_scope(ty.as_str()) {
            self.alias_scope(name, target);
        }
        let current = self.current;
        self.insert_typedef(
            current,
            name,
            TypedefEntry {
                ty: ty.clone(),
                is_class: false,
            },
        );
        Ok(())
    }

    /// Declare the class `name` in the current scope.
    pub fn typedef_class(&mut self, name: &str) -> Result<(), TypedefError> {
        if let Some(err) = self.already_defined(name) {
            return Err(err);
        }
        let current = self.current;
        self.insert_typedef(
            current,
            name,
            TypedefEntry {
                ty: TypeString::from(name),
                is_class: true,
            },
        );
        Ok(())
    }

    /// `using A::B;`: make `B` in the current scope name `A::B`.
    ///
    /// The scope holding the name also learns `B` under the fully qualified
    /// name of its definition, and when `A::B` is itself a scope, `B`
    /// becomes a scope inheriting from it.
    pub fn typedef_using(&mut self, qualified: &str) -> Result<(), TypedefError> {
        let (Some(prefix), base) = scopename::split(qualified) else {
            return Err(TypedefError::NotQualified {
                name: qualified.to_owned(),
            });
        };
        if let Some(err) = self.already_defined(base) {
            return Err(err);
        }

        let current = self.current;
        self.insert_typedef(
            current,
            base,
            TypedefEntry {
                ty: TypeString::from(qualified),
                is_class: false,
            },
        );

        let defined_name = self
            .resolve_step(&TypeString::from(qualified))
            .scope
            .map(|scope| self.scope(scope).qname.clone())
            .filter(|qname| !qname.is_empty())
            .map(|qname| format!("{qname}::{base}"));

        let defined_scope = defined_name
            .as_deref()
            .and_then(|defined| self.find_scope(defined));

        if let Some(defined) = &defined_name {
            if let Some(holder) = self.find_scope(prefix) {
                if !self.scope(holder).typedefs.contains_key(base) {
                    self.insert_typedef(
                        holder,
                        base,
                        TypedefEntry {
                            ty: TypeString::from(defined.as_str()),
                            is_class: false,
                        },
                    );
                }
            }
        }

        if let Some(target) = defined_scope {
            self.alias_scope(base, target);
        }
        Ok(())
    }

    /// Remove `name` from the current scope's typedef table, exposing any
    /// definition further out. Returns whether it was present.
    pub fn remove_typedef(&mut self, name: &str) -> bool {
        let current = self.current;
        let removed = self.scope_mut(current).typedefs.remove(name).is_some();
        if removed {
            tracing::debug!(scope = %self.scope(current).qname, name, "remove typedef");
            self.bump();
        }
        removed
    }

    /// Whether the base of `ty` (or a name inside it) expands through a typedef.
    pub fn is_typedef(&self, ty: &TypeString) -> bool {
        self.typedef_resolve(ty).is_some()
    }

    /// Whether `ty` names a class, looking through typedefs and qualifiers.
    ///
    /// A pointer to a class is not a class. An uninstantiated template
    /// counts when its template name is a class.
    pub fn is_class(&self, ty: &TypeString) -> bool {
        let resolved = self.resolve_all(ty).strip_qualifiers();
        if !resolved.is_simple() {
            return false;
        }
        if self.resolve_step(&resolved).scope.is_some() {
            return true;
        }
        if resolved.is_template() {
            let prefix = resolved.templateprefix();
            return prefix != ty.as_str() && self.is_class(&TypeString::from(prefix));
        }
        false
    }
}
