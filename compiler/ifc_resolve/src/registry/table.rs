//! Inheritance folding and the emitted type table.

use std::fmt::Write as _;

use ifc_types::TypeString;

use crate::TypeSystem;

/// A generated function converting a derived-type pointer to a base-type
/// pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Converter {
    /// `<derived mangled>To<base mangled>`.
    pub name: String,
    /// Local declarator of the base side.
    pub to: String,
    /// Cast expression applied between the two, usually empty.
    pub cast: String,
    /// Local declarator of the derived side.
    pub from: String,
}

impl Converter {
    pub fn render_c(&self) -> String {
        format!(
            "static void *{}(void *x) {{\n    return (void *)(({}) {} (({}) x));\n}}\n",
            self.name, self.to, self.cast, self.from
        )
    }
}

/// A mangled name accepted where the entry's type is expected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equivalent {
    pub mangled: String,
    /// Converter to apply, for subtypes.
    pub converter: Option<String>,
}

/// One row of the type table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEntry {
    pub mangled: String,
    /// C spelling of the local type.
    pub ltype: String,
    pub clientdata: Option<String>,
    /// Equivalent names, the entry itself included, sorted.
    pub equivalents: Vec<Equivalent>,
}

/// The runtime type table: entries in mangled-name order (the position of
/// an entry is its forward index) and the generated converters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeTable {
    pub entries: Vec<TypeEntry>,
    pub converters: Vec<Converter>,
}

impl TypeTable {
    /// Forward index of `mangled`.
    pub fn index_of(&self, mangled: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|entry| entry.mangled.as_str().cmp(mangled))
            .ok()
    }

    pub fn entry(&self, mangled: &str) -> Option<&TypeEntry> {
        self.index_of(mangled).map(|i| &self.entries[i])
    }

    /// `#define` block mapping each descriptor name to its table slot.
    pub fn render_forward(&self, descriptor_prefix: &str) -> String {
        let mut out = String::from("\n/* -------- TYPES TABLE (BEGIN) -------- */\n\n");
        for (i, entry) in self.entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "#define  {descriptor_prefix}{} swig_types[{i}] ",
                entry.mangled
            );
        }
        let _ = writeln!(
            out,
            "static swig_type_info *swig_types[{}];",
            self.entries.len() + 1
        );
        out.push_str("\n/* -------- TYPES TABLE (END) -------- */\n\n");
        out
    }

    /// Converter functions, per-type equivalence records and the initial
    /// table.
    pub fn render_table(&self) -> String {
        let mut out =
            String::from("\n/* -------- TYPE CONVERSION AND EQUIVALENCE RULES (BEGIN) -------- */\n\n");
        for converter in &self.converters {
            out.push_str(&converter.render_c());
        }

        let mut types = String::new();
        let mut initial = String::from("static swig_type_info *swig_types_initial[] = {\n");
        for entry in &self.entries {
            let _ = write!(
                types,
                "static swig_type_info _swigt_{m}[] = {{{{\"{m}\", 0, \"{l}\", {cd}}},",
                m = entry.mangled,
                l = entry.ltype,
                cd = entry.clientdata.as_deref().unwrap_or("0"),
            );
            for equivalent in &entry.equivalents {
                match &equivalent.converter {
                    Some(conv) => {
                        let _ = write!(types, "{{\"{}\", {conv}}},", equivalent.mangled);
                    }
                    None => {
                        let _ = write!(types, "{{\"{}\"}},", equivalent.mangled);
                    }
                }
            }
            types.push_str("{0}};\n");
            let _ = writeln!(initial, "_swigt_{}, ", entry.mangled);
        }
        initial.push_str("0\n};\n");

        let _ = writeln!(out, "{types}");
        let _ = writeln!(out, "{initial}");
        out.push_str("\n/* -------- TYPE CONVERSION AND EQUIVALENCE RULES (END) -------- */\n\n");
        out
    }
}

impl TypeSystem {
    /// Fold registered inheritance into the registry.
    ///
    /// For every remembered canonical type whose base has subtypes, each
    /// derived type (with the same constructors) becomes an equivalent name,
    /// and one converter is generated per (derived, base) pair. Typedef
    /// aliases of the derived type share that converter. Running it again
    /// adds nothing new.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn inherit_equiv(&mut self) {
        let canonical_types: Vec<TypeString> = self.registry.resolved.keys().cloned().collect();
        for resolved in canonical_types {
            let base = resolved.base();
            let Some(subtypes) = self.registry.subclass.get(base.as_str()) else {
                continue;
            };
            let subtypes: Vec<(String, String)> = subtypes
                .iter()
                .map(|(derived, cast)| (derived.to_owned(), cast.to_owned()))
                .collect();
            let known_names: Vec<String> = self
                .registry
                .resolved
                .get(&resolved)
                .map(|names| names.keys().cloned().collect())
                .unwrap_or_default();
            let target = resolved.manglestr(&*self);

            for (derived, cast) in subtypes {
                let derived_ty = TypeString::new(format!("{}{derived}", resolved.prefix()));
                let source = derived_ty.manglestr(&*self);
                self.registry
                    .resolved
                    .entry(resolved.clone())
                    .or_default()
                    .insert(source.clone(), derived_ty.clone());

                let key = format!("{source}+{target}");
                if self.registry.conversions.contains_key(&key) {
                    continue;
                }
                let name = format!("{source}To{target}");
                tracing::debug!(converter = %name, "generated pointer conversion");
                let converter = Converter {
                    name: name.clone(),
                    to: resolved.lstr(None, &*self),
                    cast,
                    from: derived_ty.lstr(None, &*self),
                };
                self.registry.converters.push(converter);
                self.registry.conversions.insert(key, name.clone());

                let aliases: Vec<(String, TypeString)> = self
                    .registry
                    .resolved
                    .get(&derived_ty)
                    .map(|names| {
                        names
                            .iter()
                            .filter(|(_, ty)| **ty == derived_ty)
                            .map(|(mangled, ty)| (mangled.clone(), ty.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                for (alias, alias_ty) in aliases {
                    let registry = &mut self.registry;
                    registry
                        .conversions
                        .entry(format!("{alias}+{target}"))
                        .or_insert_with(|| name.clone());
                    for known in &known_names {
                        registry
                            .conversions
                            .insert(format!("{alias}+{known}"), name.clone());
                    }
                    registry
                        .resolved
                        .entry(resolved.clone())
                        .or_default()
                        .insert(alias, alias_ty);
                }
            }
        }
    }

    /// Fold inheritance, then build the type table from everything
    /// remembered.
    pub fn emit_type_table(&mut self) -> TypeTable {
        self.inherit_equiv();
        let entries = self
            .registry
            .mangled
            .keys()
            .map(|mangled| TypeEntry {
                mangled: mangled.clone(),
                ltype: self
                    .registry
                    .ltype
                    .get(mangled)
                    .map(|ty| ty.str(None))
                    .unwrap_or_default(),
                clientdata: self.clientdata_collect(mangled).map(str::to_owned),
                equivalents: self
                    .equivalent_mangle(mangled)
                    .into_iter()
                    .map(|equivalent| Equivalent {
                        converter: self
                            .registry
                            .conversions
                            .get(&format!("{equivalent}+{mangled}"))
                            .cloned(),
                        mangled: equivalent,
                    })
                    .collect(),
            })
            .collect();
        TypeTable {
            entries,
            converters: self.registry.converters.clone(),
        }
    }
}
