//! IFC Template - Template Instantiation
//!
//! C++ templates are instantiated by copying the definition's parse
//! subtree and rewriting every attribute that mentions a template
//! parameter.
//!
//! - [`TemplateEngine`] registers primary definitions, explicit and partial
//!   specializations, and picks the definition an instance uses
//! - [`expand`] rewrites a copied body for concrete arguments
//! - [`TemplateArg`] is one argument, a type or a value
//!
//! # Locating a Definition
//!
//! ```text
//! template<class T> class Box { ... };          primary        Box
//! template<class T> class Box<T *> { ... };     partial        Box<(p.$1)>
//! template<> class Box<bool> { ... };           specialization Box<(bool)>
//!
//! Box<int>     -> primary
//! Box<int *>   -> partial, T = int
//! Box<bool>    -> specialization
//! ```
//!
//! Errors abort only the instantiation that raised them; ambiguity between
//! partial specializations is a [`TemplateWarning`] collected by the engine.

mod arg;
mod engine;
mod error;
mod expand;

pub use arg::{template_args, template_name, TemplateArg};
pub use engine::{Located, Match, TemplateEngine};
pub use error::{TemplateError, TemplateWarning};
pub use expand::{expand, Expansion};
