//! Identifier-aware text replacement.
//!
//! Template expansion rewrites parameter names inside type strings, values
//! and code. A plain substring replace would turn `T` inside `Tree` into the
//! argument, so matches must sit on identifier boundaries.

#[inline]
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Replace every occurrence of `pat` that is not part of a longer identifier.
///
/// `$1` does not match inside `$10`, and `T` does not match inside `Tree`.
pub fn replace_id(s: &str, pat: &str, rep: &str) -> String {
    replace_id_limited(s, pat, rep, usize::MAX)
}

/// Like [`replace_id`], but only the first boundary match is replaced.
pub fn replace_id_first(s: &str, pat: &str, rep: &str) -> String {
    replace_id_limited(s, pat, rep, 1)
}

/// True when `pat` occurs in `s` on identifier boundaries.
pub fn contains_id(s: &str, pat: &str) -> bool {
    find_id(s, pat, 0).is_some()
}

fn find_id(s: &str, pat: &str, mut from: usize) -> Option<usize> {
    if pat.is_empty() {
        return None;
    }
    let bytes = s.as_bytes();
    while let Some(offset) = s[from..].find(pat) {
        let start = from + offset;
        let end = start + pat.len();
        let before_ok = start == 0 || !is_ident_byte(bytes[start - 1]);
        let after_ok = end == bytes.len() || !is_ident_byte(bytes[end]);
        if before_ok && after_ok {
            return Some(start);
        }
        from = start + s[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

fn replace_id_limited(s: &str, pat: &str, rep: &str, limit: usize) -> String {
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;
    let mut replaced = 0;
    while replaced < limit {
        let Some(start) = find_id(s, pat, copied) else {
            break;
        };
        out.push_str(&s[copied..start]);
        out.push_str(rep);
        copied = start + pat.len();
        replaced += 1;
    }
    out.push_str(&s[copied..]);
    out
}

#[cfg(test)]
mod tests;
