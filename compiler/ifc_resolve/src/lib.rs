//! Scoped typedef resolution and the runtime type registry.
//!
//! [`TypeSystem`] owns the state the rest of the compiler consults about
//! C/C++ types:
//!
//! - the scope tree (namespaces and classes) with a typedef table per scope
//! - one-step and full typedef resolution, and scope qualification
//! - the set of types remembered for the runtime type table, with their
//!   equivalences, client data and inheritance relations
//! - `$descriptor(...)` rewriting of free code text
//!
//! It implements [`TypedefResolver`](ifc_types::TypedefResolver), so the
//! typedef-aware parts of the type algebra (`ltype`, `manglestr`,
//! `default_type`, ...) run against it directly.
//!
//! ```text
//! let mut types = TypeSystem::new();
//! types.typedef(&"int".into(), "A")?;
//! types.typedef(&"p.A".into(), "C")?;
//! types.resolve_all(&"a(10).C".into())   // a(10).p.int
//! ```

mod descriptor;
mod error;
mod registry;
mod scope;
mod system;

pub use descriptor::DESCRIPTOR_PREFIX;
pub use error::{DescriptorError, RememberError, TypedefError};
pub use registry::{Converter, Equivalent, TypeEntry, TypeTable};
pub use scope::{ScopeId, Symbol, SymbolTable, TypedefEntry};
pub use system::{TypeSystem, UNNAMED_SCOPE};
