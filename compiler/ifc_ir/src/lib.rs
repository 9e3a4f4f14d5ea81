//! IFC IR - Parse Tree Types
//!
//! The parser (outside this workspace) hands the type core an attributed
//! parse tree. This crate holds that tree:
//!
//! - [`SourceLoc`] for file/line positions carried into diagnostics
//! - [`Tree`], an arena of [`Node`]s addressed by [`NodeId`]
//! - [`NodeKind`], the closed set of declaration kinds
//! - [`Parm`], one entry of a parameter list
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: nodes refer to each other by `NodeId`, never by
//!   pointer, so subtrees can be deep-copied and patched in place.
//! - **Typed Attributes**: every attribute the type core reads or writes is
//!   a named field, not a string-keyed map.

mod loc;
mod tree;

pub use loc::SourceLoc;
pub use tree::{DeclKind, Node, NodeId, NodeKind, Parm, Tree};
