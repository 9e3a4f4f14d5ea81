use super::render::namestr;
use super::TypeString;
use crate::TypedefResolver;

fn mangle_base_char(c: char) -> char {
    match c {
        '<' => 'T',
        '>' => 't',
        '*' => 'p',
        '[' => 'a',
        ']' => 'A',
        '&' => 'R',
        '(' => 'f',
        ')' => 'F',
        c if c.is_ascii_alphanumeric() => c,
        _ => '_',
    }
}

impl TypeString {
    /// Identifier-safe name for the runtime descriptor of this type.
    ///
    /// The type is fully typedef-resolved and reduced to its `ltype` first,
    /// so `const Foo &` and `Foo *` share `_p_Foo`. Templates go through
    /// their C++ spelling: `Pair<(int,double)>` mangles to
    /// `_PairTint_double_t`.
    pub fn manglestr(&self, resolver: &dyn TypedefResolver) -> String {
        let local = resolver.typedef_resolve_all(self).ltype(resolver);
        let prefix = local.prefix();
        let base = local.base();

        let mut base = if base.is_template() {
            namestr(base.as_str())
        } else {
            base.into_string()
        };
        for keyword in ["struct ", "class ", "union ", "enum "] {
            if base.contains(keyword) {
                base = base.replace(keyword, "");
            }
        }

        let mut out = String::with_capacity(1 + prefix.as_str().len() + base.len());
        out.push('_');
        out.extend(prefix.as_str().chars().map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else {
                '_'
            }
        }));
        out.extend(base.chars().map(mangle_base_char));
        out
    }
}
