//! IFC Types - String-Encoded C/C++ Types
//!
//! Every C/C++ type the interface compiler sees is carried as a
//! [`TypeString`]: a chain of constructor elements (`p.`, `r.`, `a(N).`,
//! `f(..).`, `q(..).`, `m(..).`) followed by a base name. This crate holds
//! the algebra over that encoding:
//!
//! - splitting, pushing and popping constructors
//! - rendering to C declarator syntax (`str`, `lstr`, casts)
//! - mangling for runtime type descriptors
//! - degrading a type one step towards the `SWIGTYPE` wildcard
//! - renaming type names inside a type
//!
//! Anything that needs typedef knowledge takes a [`TypedefResolver`]; the
//! scoped implementation lives in `ifc_resolve`.
//!
//! [`scopename`] splits `A::B::C` names, and [`cdecl`] parses abstract C
//! declarations such as `const char *` into a `TypeString`.

pub mod cdecl;
mod resolver;
pub mod scopename;
pub mod text;
mod typestring;

pub use cdecl::{parse_type, CdeclError};
pub use resolver::{NoTypedefs, TypedefResolver};
pub use typestring::{Constructor, Elements, TypeCode, TypeString, WILDCARD};
