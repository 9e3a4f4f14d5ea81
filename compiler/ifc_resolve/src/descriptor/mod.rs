//! `$descriptor(TYPE)` markers in free-form code text.
//!
//! Typemap and support code refer to runtime type descriptors by writing
//! the C type inline:
//!
//! ```text
//! if (SWIG_ConvertPtr(obj, &p, $descriptor(Foo *), 0) < 0) ...
//! // becomes
//! if (SWIG_ConvertPtr(obj, &p, SWIGTYPE_p_Foo, 0) < 0) ...
//! ```
//!
//! Each rewritten type is remembered so its descriptor ends up in the
//! emitted type table.

use ifc_types::parse_type;

use crate::error::DescriptorError;
use crate::TypeSystem;

/// Prefix of every runtime type descriptor name.
pub const DESCRIPTOR_PREFIX: &str = "SWIGTYPE";

const MARKER: &str = "$descriptor(";

/// Offset of the `)` closing an already opened parenthesis.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

impl TypeSystem {
    /// Rewrite every `$descriptor(TYPE)` in `text` to the descriptor name of
    /// `TYPE`, remembering each type.
    ///
    /// Rewriting stops at the first marker that cannot be handled; types
    /// remembered before it stay remembered.
    pub fn replace_descriptors(&mut self, text: &str) -> Result<String, DescriptorError> {
        self.replace_descriptors_with_prefix(text, DESCRIPTOR_PREFIX)
    }

    /// [`TypeSystem::replace_descriptors`] with descriptor names starting
    /// with `prefix`.
    #[tracing::instrument(level = "debug", skip_all, fields(prefix = %prefix))]
    pub fn replace_descriptors_with_prefix(
        &mut self,
        text: &str,
        prefix: &str,
    ) -> Result<String, DescriptorError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(MARKER) {
            out.push_str(&rest[..start]);
            let after = &rest[start + MARKER.len()..];
            let close = closing_paren(after).ok_or(DescriptorError::Unterminated)?;
            let arg = &after[..close];

            let ty = parse_type(arg.trim()).map_err(|source| DescriptorError::BadType {
                text: arg.to_owned(),
                source,
            })?;
            let mangled = ty.manglestr(&*self);
            tracing::trace!(ty = %ty, %mangled, "descriptor");
            self.remember(&ty)?;

            out.push_str(prefix);
            out.push_str(&mangled);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
