//! Stack growth guard for recursive type algorithms.
//!
//! Type strings nest arbitrarily (`p.f(p.f(...).int).int`), scope chains can
//! be long, and template bodies instantiate other templates. The walkers in
//! `ifc_types`, `ifc_resolve` and `ifc_template` recurse over that structure,
//! so each recursive step goes through [`ensure_sufficient_stack`].
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: passthrough.
//!
//! # Configuration
//!
//! - **Red zone**: 100KB
//! - **Growth size**: 1MB

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// ```text
/// fn str_of(ty: &TypeString) -> String {
///     ensure_sufficient_stack(|| {
///         // recurse into function parameter types
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
