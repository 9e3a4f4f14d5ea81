//! The `TypeString` encoding.
//!
//! A type is written outermost constructor first, base last:
//!
//! | C declaration          | TypeString              |
//! |------------------------|-------------------------|
//! | `int *`                | `p.int`                 |
//! | `const char *`         | `p.q(const).char`       |
//! | `int (*)[200]`         | `p.a(200).int`          |
//! | `void (*)(int,double)` | `p.f(int,double).void`  |
//! | `int Foo::*`           | `m(Foo).int`            |
//! | `Pair<int,double> &`   | `r.Pair<(int,double)>`  |
//! | `...`                  | `v(...)`                |
//!
//! Element boundaries are `.` characters outside parentheses and template
//! angle brackets. A type consisting only of declarator elements (the
//! `decl` attribute of a function, `f(int).`) has that last element as its
//! base.

mod code;
mod constructor;
mod degrade;
mod mangle;
mod render;
mod replace;

#[cfg(test)]
mod tests;

use std::borrow::Borrow;
use std::fmt;

use smallvec::SmallVec;

use crate::TypedefResolver;

pub use code::TypeCode;
pub use constructor::Constructor;

/// Base name every type eventually degrades to.
pub const WILDCARD: &str = "SWIGTYPE";

/// Abort on a structurally invalid type string.
///
/// Malformed encodings come from internal bugs, never from user input.
#[cold]
#[track_caller]
pub(crate) fn malformed(ty: &str, what: &str) -> ! {
    panic!("malformed type string `{ty}`: {what}")
}

/// Byte length of the element at the start of `s`, trailing `.` included.
pub(crate) fn element_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut parens = 0usize;
    let mut angles = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => parens += 1,
            b')' => {
                if parens == 0 {
                    malformed(s, "unbalanced `)`");
                }
                parens -= 1;
            }
            b'<' if parens == 0 => angles += 1,
            b'>' if parens == 0 && angles > 0 => angles -= 1,
            b'.' if parens == 0 && angles == 0 => return i + 1,
            _ => {}
        }
    }
    if parens != 0 {
        malformed(s, "unbalanced `(`");
    }
    bytes.len()
}

/// Shape of a single element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ElementKind {
    Pointer,
    Reference,
    Array,
    Function,
    Qualifier,
    MemberPointer,
    Base,
}

pub(crate) fn classify(element: &str) -> ElementKind {
    let constructor = |head: &str| element.starts_with(head) && element.ends_with(").");
    match element {
        "p." => ElementKind::Pointer,
        "r." => ElementKind::Reference,
        _ if constructor("a(") => ElementKind::Array,
        _ if constructor("f(") => ElementKind::Function,
        _ if constructor("q(") => ElementKind::Qualifier,
        _ if constructor("m(") => ElementKind::MemberPointer,
        _ => ElementKind::Base,
    }
}

/// Byte range of the first parenthesised group in `s`, parens excluded.
fn paren_group(s: &str) -> Option<(usize, usize)> {
    let open = s.find('(')?;
    let mut depth = 0usize;
    for (i, b) in s.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open + 1, i));
                }
            }
            _ => {}
        }
    }
    malformed(s, "unbalanced `(`")
}

/// Text inside the first parenthesised group of an element.
pub(crate) fn element_parm(element: &str) -> &str {
    match paren_group(element) {
        Some((start, end)) => &element[start..end],
        None => malformed(element, "element has no parenthesised argument"),
    }
}

/// Split the first parenthesised group of `s` at depth-zero commas.
pub(crate) fn parm_list(s: &str) -> Vec<TypeString> {
    let Some((start, end)) = paren_group(s) else {
        malformed(s, "no argument list");
    };
    let inner = &s[start..end];
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut item_start = 0;
    for (i, b) in inner.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => {
                out.push(TypeString::new(&inner[item_start..i]));
                item_start = i + 1;
            }
            _ => {}
        }
    }
    if item_start < inner.len() || !out.is_empty() {
        out.push(TypeString::new(&inner[item_start..]));
    }
    out
}

/// Byte offsets of the `<(` and the end of the matching `)>` in `s`.
fn template_bounds(s: &str) -> Option<(usize, usize)> {
    let open = s.find("<(")?;
    let mut depth = 0usize;
    for (i, b) in s.bytes().enumerate().skip(open + 1) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    if s.as_bytes().get(i + 1) != Some(&b'>') {
                        malformed(s, "template arguments not closed by `)>`");
                    }
                    return Some((open, i + 2));
                }
            }
            _ => {}
        }
    }
    malformed(s, "unterminated template arguments")
}

/// Iterator over the elements of a [`TypeString`].
#[derive(Clone, Debug)]
pub struct Elements<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let (element, rest) = self.rest.split_at(element_len(self.rest));
        self.rest = rest;
        Some(element)
    }
}

/// A C/C++ type in constructor-chain encoding.
///
/// Values are immutable; every operation returns a new `TypeString`.
/// Equality, hashing and ordering are those of the underlying text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeString(String);

impl TypeString {
    /// Wrap already-encoded text.
    pub fn new(encoded: impl Into<String>) -> Self {
        TypeString(encoded.into())
    }

    /// The `SWIGTYPE` wildcard.
    pub fn wildcard() -> Self {
        TypeString(WILDCARD.to_owned())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring test on the encoded text.
    #[inline]
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    // Structure

    pub fn elements(&self) -> Elements<'_> {
        Elements { rest: &self.0 }
    }

    /// Elements in order, constructors first and base last.
    pub fn split(&self) -> SmallVec<[&str; 4]> {
        self.elements().collect()
    }

    /// The outermost element, or `""` for the empty type.
    pub fn first_element(&self) -> &str {
        &self.0[..element_len(&self.0)]
    }

    fn base_offset(&self) -> usize {
        let mut offset = 0;
        let mut position = 0;
        for element in self.elements() {
            offset = position;
            position += element.len();
        }
        offset
    }

    /// The last element.
    pub fn base(&self) -> TypeString {
        TypeString(self.0[self.base_offset()..].to_owned())
    }

    /// Every element except the last.
    pub fn prefix(&self) -> TypeString {
        TypeString(self.0[..self.base_offset()].to_owned())
    }

    /// Replace the base, keeping the prefix.
    pub fn with_base(&self, base: &str) -> TypeString {
        let mut s = self.0[..self.base_offset()].to_owned();
        s.push_str(base);
        TypeString(s)
    }

    /// True when `self` has the base of `inner` under more constructors.
    ///
    /// A typedef expanding to such a type (`typedef A *A;`) grows forever.
    pub fn wraps(&self, inner: &TypeString) -> bool {
        self.elements().count() > inner.elements().count() && self.base() == inner.base()
    }

    /// Argument text of the outermost element: array dimension, qualifier,
    /// member-pointer class or function parameter text.
    pub fn parm(&self) -> &str {
        element_parm(self.first_element())
    }

    /// Comma-separated arguments of the first parenthesised group, split
    /// only at depth zero. Works on function elements and template bases.
    pub fn parmlist(&self) -> Vec<TypeString> {
        parm_list(&self.0)
    }

    /// Prepend a raw element, inserting a separating `.` when needed.
    pub fn push(&self, element: &str) -> TypeString {
        if element.is_empty() {
            return self.clone();
        }
        let mut s = String::with_capacity(element.len() + self.0.len() + 1);
        s.push_str(element);
        if !self.0.is_empty() && !element.ends_with('.') {
            s.push('.');
        }
        s.push_str(&self.0);
        TypeString(s)
    }

    pub fn push_constructor(&self, constructor: &Constructor) -> TypeString {
        self.push(&constructor.to_string())
    }

    /// Remove the outermost constructor.
    ///
    /// Returns `None` when the outermost element is a base.
    pub fn pop(&self) -> Option<(Constructor, TypeString)> {
        let first = self.first_element();
        let constructor = Constructor::parse(first)?;
        Some((constructor, TypeString(self.0[first.len()..].to_owned())))
    }

    /// Remove the outermost element, whatever it is.
    pub fn pop_element(&self) -> Option<(&str, TypeString)> {
        if self.0.is_empty() {
            return None;
        }
        let first = self.first_element();
        Some((first, TypeString(self.0[first.len()..].to_owned())))
    }

    // Builders

    pub fn add_pointer(&self) -> TypeString {
        self.push("p.")
    }

    pub fn add_reference(&self) -> TypeString {
        self.push("r.")
    }

    pub fn add_array(&self, dim: &str) -> TypeString {
        self.push_constructor(&Constructor::Array(dim.to_owned()))
    }

    pub fn add_qualifier(&self, qualifier: &str) -> TypeString {
        self.push_constructor(&Constructor::Qualifier(qualifier.to_owned()))
    }

    pub fn add_function(&self, parms: &[TypeString]) -> TypeString {
        self.push_constructor(&Constructor::Function(parms.to_vec()))
    }

    pub fn add_memberpointer(&self, class: &str) -> TypeString {
        self.push_constructor(&Constructor::MemberPointer(TypeString::new(class)))
    }

    /// Append `<(args)>` to the name.
    pub fn add_template(&self, args: &[TypeString]) -> TypeString {
        let mut s = self.0.clone();
        s.push_str("<(");
        join_into(&mut s, args.iter().map(TypeString::as_str));
        s.push_str(")>");
        TypeString(s)
    }

    /// Remove the outermost pointer (and a qualifier applied to it).
    pub fn del_pointer(&self) -> TypeString {
        let mut rest = self.0.as_str();
        if rest.starts_with("q(") {
            rest = &rest[element_len(rest)..];
        }
        match rest.strip_prefix("p.") {
            Some(rest) => TypeString(rest.to_owned()),
            None => malformed(&self.0, "del_pointer applied to a non-pointer"),
        }
    }

    pub fn del_reference(&self) -> TypeString {
        match self.0.strip_prefix("r.") {
            Some(rest) => TypeString(rest.to_owned()),
            None => malformed(&self.0, "del_reference applied to a non-reference"),
        }
    }

    /// Remove the outermost array dimension.
    pub fn del_array(&self) -> TypeString {
        if !self.is_array() {
            malformed(&self.0, "del_array applied to a non-array");
        }
        TypeString(self.0[self.first_element().len()..].to_owned())
    }

    /// Split off all leading array dimensions: `(arrays, element type)`.
    pub fn pop_arrays(&self) -> (TypeString, TypeString) {
        let cut: usize = self
            .elements()
            .take_while(|e| classify(e) == ElementKind::Array)
            .map(str::len)
            .sum();
        (
            TypeString(self.0[..cut].to_owned()),
            TypeString(self.0[cut..].to_owned()),
        )
    }

    /// Split off the outermost function element: `(function, return type)`.
    ///
    /// A qualifier in front of the function (a const member function) is
    /// moved behind it, so `q(const).f(int).int` yields
    /// `(f(int).q(const)., int)`.
    pub fn pop_function(&self) -> (TypeString, TypeString) {
        let (qualifier, rest) = if self.is_qualifier() {
            let q = self.first_element();
            (q, &self.0[q.len()..])
        } else {
            ("", self.0.as_str())
        };
        if !rest.starts_with("f(") {
            malformed(&self.0, "pop_function applied to a non-function");
        }
        let f = &rest[..element_len(rest)];
        let mut function = f.to_owned();
        function.push_str(qualifier);
        (TypeString(function), TypeString(rest[f.len()..].to_owned()))
    }

    /// Parameter types of the outermost function element.
    pub fn function_parms(&self) -> Vec<TypeString> {
        parm_list(self.first_element())
    }

    /// Drop every qualifier element.
    pub fn strip_qualifiers(&self) -> TypeString {
        let s: String = self
            .elements()
            .filter(|e| classify(e) != ElementKind::Qualifier)
            .collect();
        TypeString(s)
    }

    // Arrays

    /// Number of leading array dimensions.
    pub fn array_ndim(&self) -> usize {
        self.elements()
            .take_while(|e| classify(e) == ElementKind::Array)
            .count()
    }

    /// Dimension text of leading array `n`.
    pub fn array_getdim(&self, n: usize) -> Option<&str> {
        self.elements()
            .take_while(|e| classify(e) == ElementKind::Array)
            .nth(n)
            .map(element_parm)
    }

    /// Replace the dimension of leading array `n`.
    pub fn array_setdim(&self, n: usize, dim: &str) -> TypeString {
        let mut out = String::with_capacity(self.0.len() + dim.len());
        for (i, element) in self.elements().enumerate() {
            if i == n && classify(element) == ElementKind::Array {
                out.push_str("a(");
                out.push_str(dim);
                out.push_str(").");
            } else {
                out.push_str(element);
            }
        }
        TypeString(out)
    }

    /// Element type of an array.
    pub fn array_type(&self) -> TypeString {
        self.pop_arrays().1
    }

    // Templates

    /// Text before the template arguments: `Foo` in `Foo<(int)>::Bar`.
    pub fn templateprefix(&self) -> &str {
        match template_bounds(&self.0) {
            Some((open, _)) => &self.0[..open],
            None => &self.0,
        }
    }

    /// Text after the template arguments: `::Bar` in `Foo<(int)>::Bar`.
    pub fn templatesuffix(&self) -> &str {
        match template_bounds(&self.0) {
            Some((_, close)) => &self.0[close..],
            None => "",
        }
    }

    /// The argument block itself: `<(int)>` in `Foo<(int)>::Bar`.
    pub fn templateargs(&self) -> &str {
        match template_bounds(&self.0) {
            Some((open, close)) => &self.0[open..close],
            None => "",
        }
    }

    /// Template arguments as individual types.
    pub fn template_arglist(&self) -> Vec<TypeString> {
        match template_bounds(&self.0) {
            Some((open, close)) => parm_list(&self.0[open..close]),
            None => Vec::new(),
        }
    }

    // Classification

    pub fn is_pointer(&self) -> bool {
        self.0.starts_with("p.")
    }

    pub fn is_reference(&self) -> bool {
        self.0.starts_with("r.")
    }

    pub fn is_array(&self) -> bool {
        self.0.starts_with("a(")
    }

    pub fn is_function(&self) -> bool {
        self.0.starts_with("f(")
    }

    pub fn is_qualifier(&self) -> bool {
        self.0.starts_with("q(")
    }

    pub fn is_memberpointer(&self) -> bool {
        self.0.starts_with("m(")
    }

    pub fn is_enum(&self) -> bool {
        self.0.starts_with("enum ")
    }

    pub fn is_template(&self) -> bool {
        self.0.contains("<(")
    }

    pub fn is_varargs(&self) -> bool {
        self.0 == "v(...)"
    }

    /// True when the type has no constructor outside template arguments.
    pub fn is_simple(&self) -> bool {
        let mut angles = 0usize;
        for b in self.0.bytes() {
            match b {
                b'<' => angles += 1,
                b'>' => angles = angles.saturating_sub(1),
                b'.' if angles == 0 => return false,
                _ => {}
            }
        }
        true
    }

    /// True when the outermost qualifier contains `const`, directly or
    /// through a typedef of a simple type.
    pub fn is_const(&self, resolver: &dyn TypedefResolver) -> bool {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut current = self.clone();
        loop {
            if current.is_qualifier() && current.parm().contains("const") {
                return true;
            }
            if !current.is_simple() || !seen.insert(current.clone()) {
                return false;
            }
            match resolver.typedef_resolve(&current) {
                Some(next) => current = next,
                None => return false,
            }
        }
    }

    /// True when a value of this type can be assigned to.
    pub fn is_mutable(&self, resolver: &dyn TypedefResolver) -> bool {
        let mut resolved = resolver.typedef_resolve_all(self);
        if resolved.is_reference() || resolved.is_array() {
            if let Some((_, rest)) = resolved.pop_element() {
                resolved = rest;
            }
        }
        !resolved.is_const(resolver)
    }

    /// True when the fully resolved, unqualified prefix equals `decl`.
    pub fn check_decl(&self, decl: &str, resolver: &dyn TypedefResolver) -> bool {
        resolver
            .typedef_resolve_all(self)
            .strip_qualifiers()
            .prefix()
            .as_str()
            == decl
    }
}

/// Push `items` into `out` separated by commas.
pub(crate) fn join_into<'a>(out: &mut String, items: impl IntoIterator<Item = &'a str>) {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(item);
    }
}

impl fmt::Display for TypeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeString({:?})", self.0)
    }
}

impl From<&str> for TypeString {
    fn from(s: &str) -> Self {
        TypeString(s.to_owned())
    }
}

impl From<String> for TypeString {
    fn from(s: String) -> Self {
        TypeString(s)
    }
}

impl AsRef<str> for TypeString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TypeString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
