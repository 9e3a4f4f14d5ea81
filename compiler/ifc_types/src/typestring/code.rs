use std::fmt;

use rustc_hash::FxHashSet;

use super::TypeString;
use crate::TypedefResolver;

/// Coarse classification of a type, as used by older target emitters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Bool,
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    Void,
    /// `char *`
    String,
    Pointer,
    Reference,
    Array,
    MemberPointer,
    Function,
    Varargs,
    /// Class, struct or otherwise unknown name.
    User,
    /// A qualifier with nothing behind it.
    Error,
}

impl TypeCode {
    fn primitive(name: &str) -> Option<TypeCode> {
        Some(match name {
            "int" => TypeCode::Int,
            "long" => TypeCode::Long,
            "short" => TypeCode::Short,
            "unsigned" | "unsigned int" => TypeCode::UInt,
            "unsigned short" => TypeCode::UShort,
            "unsigned long" => TypeCode::ULong,
            "char" => TypeCode::Char,
            "signed char" => TypeCode::SChar,
            "unsigned char" => TypeCode::UChar,
            "float" => TypeCode::Float,
            "double" => TypeCode::Double,
            "void" => TypeCode::Void,
            "bool" => TypeCode::Bool,
            "long long" => TypeCode::LongLong,
            "unsigned long long" => TypeCode::ULongLong,
            "v(...)" => TypeCode::Varargs,
            _ if name.starts_with("enum ") => TypeCode::Int,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeCode::Bool => "bool",
            TypeCode::Char => "char",
            TypeCode::SChar => "schar",
            TypeCode::UChar => "uchar",
            TypeCode::Short => "short",
            TypeCode::UShort => "ushort",
            TypeCode::Int => "int",
            TypeCode::UInt => "uint",
            TypeCode::Long => "long",
            TypeCode::ULong => "ulong",
            TypeCode::LongLong => "longlong",
            TypeCode::ULongLong => "ulonglong",
            TypeCode::Float => "float",
            TypeCode::Double => "double",
            TypeCode::Void => "void",
            TypeCode::String => "string",
            TypeCode::Pointer => "pointer",
            TypeCode::Reference => "reference",
            TypeCode::Array => "array",
            TypeCode::MemberPointer => "mpointer",
            TypeCode::Function => "function",
            TypeCode::Varargs => "varargs",
            TypeCode::User => "user",
            TypeCode::Error => "error",
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TypeString {
    /// Classify this type, following typedefs of unknown names.
    pub fn type_code(&self, resolver: &dyn TypedefResolver) -> TypeCode {
        let mut seen = FxHashSet::default();
        self.type_code_inner(resolver, &mut seen)
    }

    fn type_code_inner(
        &self,
        resolver: &dyn TypedefResolver,
        seen: &mut FxHashSet<TypeString>,
    ) -> TypeCode {
        let s = self.as_str();
        if let Some(rest) = s.strip_prefix("p.") {
            return match TypeString::new(rest).type_code_inner(resolver, seen) {
                TypeCode::Char => TypeCode::String,
                _ => TypeCode::Pointer,
            };
        }
        if s.starts_with("a(") {
            return TypeCode::Array;
        }
        if s.starts_with("r.") {
            return TypeCode::Reference;
        }
        if s.starts_with("m(") {
            return TypeCode::MemberPointer;
        }
        if self.is_qualifier() {
            let rest = &s[self.first_element().len()..];
            if rest.is_empty() {
                return TypeCode::Error;
            }
            return TypeString::new(rest).type_code_inner(resolver, seen);
        }
        if s.starts_with("f(") {
            return TypeCode::Function;
        }
        if let Some(code) = TypeCode::primitive(s) {
            return code;
        }
        if !seen.insert(self.clone()) {
            return TypeCode::User;
        }
        match resolver.typedef_resolve(self) {
            Some(resolved) => resolved.type_code_inner(resolver, seen),
            None => TypeCode::User,
        }
    }
}
