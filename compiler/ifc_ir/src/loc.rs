//! Source locations.

use std::fmt;
use std::sync::Arc;

/// A file and 1-based line, captured when the construct was parsed.
///
/// Line 0 marks a location synthesized by the compiler itself.
#[derive(Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLoc {
    pub file: Arc<str>,
    pub line: u32,
}

impl SourceLoc {
    pub fn new(file: impl Into<Arc<str>>, line: u32) -> Self {
        SourceLoc {
            file: file.into(),
            line,
        }
    }

    /// Location for generated nodes.
    pub fn synthetic() -> Self {
        SourceLoc::default()
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl fmt::Debug for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthetic() {
            write!(f, "SourceLoc(<synthetic>)")
        } else {
            write!(f, "SourceLoc({}:{})", self.file, self.line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_is_file_colon_line() {
        assert_eq!(SourceLoc::new("example.i", 12).to_string(), "example.i:12");
    }

    #[test]
    fn ordering_is_file_then_line() {
        let a = SourceLoc::new("a.i", 30);
        let b = SourceLoc::new("b.i", 1);
        assert!(a < b);
        assert!(SourceLoc::new("a.i", 2) < a);
    }

    #[test]
    fn synthetic_has_no_line() {
        assert!(SourceLoc::synthetic().is_synthetic());
        assert!(!SourceLoc::new("a.i", 1).is_synthetic());
    }
}
