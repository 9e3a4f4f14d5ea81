//! Splitting of `::`-qualified names.
//!
//! Separators nested inside template arguments or parentheses do not count,
//! so `Foo<(A::B)>::Inner` splits into `Foo<(A::B)>` and `Inner`.

use smallvec::SmallVec;

/// Byte offsets of the depth-zero `::` separators in `name`.
fn separators(name: &str) -> SmallVec<[usize; 4]> {
    let bytes = name.as_bytes();
    let mut out = SmallVec::new();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' => depth += 1,
            b'>' | b')' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                out.push(i);
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    out
}

/// True when `name` is qualified.
pub fn check(name: &str) -> bool {
    !separators(name).is_empty()
}

/// Everything before the last separator: `A::B` for `A::B::C`.
pub fn prefix(name: &str) -> Option<&str> {
    separators(name).last().map(|&i| &name[..i])
}

/// The unqualified tail: `C` for `A::B::C`, or `name` itself.
pub fn last(name: &str) -> &str {
    match separators(name).last() {
        Some(&i) => &name[i + 2..],
        None => name,
    }
}

/// The outermost component: `A` for `A::B::C`.
pub fn first(name: &str) -> Option<&str> {
    separators(name).first().map(|&i| &name[..i])
}

/// Everything after the first separator: `B::C` for `A::B::C`.
pub fn suffix(name: &str) -> Option<&str> {
    separators(name).first().map(|&i| &name[i + 2..])
}

/// `(prefix, last)` in one pass.
pub fn split(name: &str) -> (Option<&str>, &str) {
    match separators(name).last() {
        Some(&i) => (Some(&name[..i]), &name[i + 2..]),
        None => (None, name),
    }
}

#[cfg(test)]
mod tests;
