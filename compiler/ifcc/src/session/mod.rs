//! Session state and directive application.

use ifc_diagnostic::queue::too_many_errors;
use ifc_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed};
use ifc_ir::{DeclKind, Node, NodeId, SourceLoc, Tree};
use ifc_resolve::{TypeSystem, TypeTable};
use ifc_template::{TemplateArg, TemplateEngine};
use ifc_types::TypeString;

use crate::{Directive, SessionConfig};

/// One compilation's type core.
pub struct Session {
    config: SessionConfig,
    types: TypeSystem,
    templates: TemplateEngine,
    tree: Tree,
    root: NodeId,
    queue: DiagnosticQueue,
    /// Location of the last applied directive.
    last_loc: SourceLoc,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let mut tree = Tree::new();
        let root = tree.alloc(Node::decl(DeclKind::Namespace));
        Session {
            templates: TemplateEngine::new().with_debug(config.template_debug),
            queue: DiagnosticQueue::with_config(config.diagnostics.clone()),
            config,
            types: TypeSystem::new(),
            tree,
            root,
            last_loc: SourceLoc::synthetic(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeSystem {
        &self.types
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Diagnostics reported so far, in report order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.queue.peek()
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        self.queue.has_errors()
    }

    /// Add a top-level declaration under the root.
    pub fn declare(&mut self, node: Node) -> NodeId {
        self.tree.append_child(self.root, node)
    }

    /// Add `node` under `parent`.
    pub fn declare_in(&mut self, parent: NodeId, node: Node) -> NodeId {
        self.tree.append_child(parent, node)
    }

    /// Apply one directive.
    ///
    /// Returns the node an instantiation created. On error the diagnostic
    /// is already queued and nothing the directive would have recorded is
    /// kept.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = directive.kind()))]
    pub fn apply(
        &mut self,
        directive: Directive,
        loc: &SourceLoc,
    ) -> Result<Option<NodeId>, ErrorGuaranteed> {
        self.last_loc = loc.clone();
        match directive {
            Directive::Typedef { ty, name } => {
                self.types
                    .typedef(&ty, &name)
                    .map_err(|err| self.queue.emit_error(err.to_diagnostic(loc.clone())))?;
            }
            Directive::Class { name, bases } => self.declare_class(&name, &bases, loc)?,
            Directive::EnterScope { name } => {
                self.types.new_scope(name.as_deref());
            }
            Directive::LeaveScope => {
                if self.types.pop_scope().is_none() {
                    tracing::warn!(%loc, "leaving the global scope");
                }
            }
            Directive::UsingNamespace { name } => match self.types.find_scope(&name) {
                Some(scope) => self.types.using_scope(scope),
                None => tracing::warn!(%loc, namespace = %name, "unknown namespace"),
            },
            Directive::UsingDecl { qualified } => {
                self.types
                    .typedef_using(&qualified)
                    .map_err(|err| self.queue.emit_error(err.to_diagnostic(loc.clone())))?;
            }
            Directive::NamespaceAlias { alias, target } => match self.types.find_scope(&target) {
                Some(scope) => self.types.scope_alias(&alias, scope),
                None => tracing::warn!(%loc, namespace = %target, "unknown namespace"),
            },
            Directive::Inherit {
                derived,
                base,
                cast,
            } => self.types.inherit(&derived, &base, cast.as_deref()),
            Directive::Remember { ty, clientdata } => {
                self.types
                    .remember_with_clientdata(&ty, clientdata.as_deref())
                    .map_err(|err| self.queue.emit_error(err.to_diagnostic(loc.clone())))?;
            }
            Directive::Template { name, node } => {
                self.check_node(node, loc)?;
                self.templates.register_template(&name, node);
            }
            Directive::Specialization { name, args, node } => {
                self.check_node(node, loc)?;
                self.templates
                    .register_specialization(&self.types, &name, &args, node);
            }
            Directive::PartialSpecialization {
                name,
                pattern,
                node,
            } => {
                self.check_node(node, loc)?;
                self.templates.register_partial(&name, &pattern, node);
            }
            Directive::Instantiate { name, args, rename } => {
                return self.instantiate(&name, &args, &rename, loc).map(Some);
            }
        }
        Ok(None)
    }

    /// Rewrite `$descriptor(type)` markers in `text`, remembering each type.
    pub fn replace_descriptors(
        &mut self,
        text: &str,
        loc: &SourceLoc,
    ) -> Result<String, ErrorGuaranteed> {
        self.last_loc = loc.clone();
        self.types
            .replace_descriptors_with_prefix(text, &self.config.descriptor_prefix)
            .map_err(|err| self.queue.emit_error(err.to_diagnostic(loc.clone())))
    }

    /// Declare a class in the current scope: its name, its member scope
    /// searching each known base, and its runtime subtype edges.
    fn declare_class(
        &mut self,
        name: &str,
        bases: &[String],
        loc: &SourceLoc,
    ) -> Result<(), ErrorGuaranteed> {
        self.types
            .typedef_class(name)
            .map_err(|err| self.queue.emit_error(err.to_diagnostic(loc.clone())))?;

        let qualified = self.types.qualify(&TypeString::from(name));
        let base_scopes: Vec<_> = bases
            .iter()
            .filter_map(|base| self.types.find_scope(base))
            .collect();
        let qualified_bases: Vec<TypeString> = bases
            .iter()
            .map(|base| self.types.qualify(&TypeString::from(base.as_str())))
            .collect();

        self.types.new_scope(Some(name));
        for scope in base_scopes {
            self.types.inherit_scope(scope);
        }
        self.types.pop_scope();

        for base in &qualified_bases {
            self.types.inherit(qualified.as_str(), base.as_str(), None);
        }
        Ok(())
    }

    fn instantiate(
        &mut self,
        name: &str,
        args: &[TemplateArg],
        rename: &str,
        loc: &SourceLoc,
    ) -> Result<NodeId, ErrorGuaranteed> {
        let result = self
            .templates
            .instantiate(&mut self.tree, &self.types, name, args, rename, loc);
        self.drain_template_warnings();
        let instance =
            result.map_err(|err| self.queue.emit_error(err.to_diagnostic(loc.clone())))?;

        if self.tree[instance].kind.decl_kind() == DeclKind::Class {
            let class_name = self.tree[instance].name.clone().unwrap_or_default();
            let bases = self.tree[instance].baselist.clone();
            if let Err(err) = self.declare_class(&class_name, &bases, loc) {
                self.tree[instance].error = true;
                return Err(err);
            }
        }
        self.tree.attach(self.root, instance);
        Ok(instance)
    }

    fn drain_template_warnings(&mut self) {
        for warning in self.templates.take_warnings() {
            self.queue.add(warning.to_diagnostic());
        }
    }

    fn check_node(&mut self, node: NodeId, loc: &SourceLoc) -> Result<(), ErrorGuaranteed> {
        if node.index() < self.tree.len() {
            return Ok(());
        }
        Err(self.queue.emit_error(
            Diagnostic::error(ErrorCode::E9001)
                .with_message(format!("unknown declaration node {}", node.raw()))
                .with_label(loc.clone(), "referenced here"),
        ))
    }

    /// End the session: emit the type table and take every diagnostic.
    pub fn finish(mut self) -> SessionOutput {
        let table = self.types.emit_type_table();
        let limit_reached = self.queue.limit_reached();
        let mut diagnostics = self.queue.flush();
        if limit_reached {
            diagnostics.push(too_many_errors(
                self.config.diagnostics.error_limit,
                self.last_loc,
            ));
        }
        SessionOutput {
            tree: self.tree,
            root: self.root,
            table,
            diagnostics,
            descriptor_prefix: self.config.descriptor_prefix,
        }
    }
}

/// Everything a finished session produced.
#[derive(Debug)]
pub struct SessionOutput {
    pub tree: Tree,
    pub root: NodeId,
    pub table: TypeTable,
    /// Sorted by location.
    pub diagnostics: Vec<Diagnostic>,
    pub descriptor_prefix: String,
}

impl SessionOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// `#define` block naming each table slot.
    pub fn render_forward(&self) -> String {
        self.table.render_forward(&self.descriptor_prefix)
    }

    pub fn render_table(&self) -> String {
        self.table.render_table()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
