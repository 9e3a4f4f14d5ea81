//! Abstract C declaration parser.
//!
//! Turns declaration text such as `const char *`, `int (*)[10]` or
//! `std::vector<int> &` into a [`TypeString`]. This is what lets free text
//! refer to types, e.g. the `$descriptor(Foo *)` markers in code blocks.
//!
//! Grammar (informal):
//!
//! ```text
//! declaration := "..." | specifiers declarator
//! specifiers  := ( cv | builtin-word | [struct|class|union|enum|typename] name )+
//! declarator  := ( "*" | "&" | cv | Class "::" "*" )* direct
//! direct      := [ "(" declarator ")" | ident ] ( "[" dim "]" | "(" params ")" cv* )*
//! ```

use thiserror::Error;

use crate::TypeString;

/// Reasons a declaration could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CdeclError {
    #[error("empty type declaration")]
    Empty,
    #[error("unexpected `{found}` at offset {offset} in `{text}`")]
    Unexpected {
        found: String,
        offset: usize,
        text: String,
    },
    #[error("unexpected end of `{text}`")]
    UnexpectedEnd { text: String },
    #[error("no base type in `{text}`")]
    MissingBase { text: String },
}

const BUILTIN_WORDS: &[&str] = &[
    "signed", "unsigned", "short", "long", "int", "char", "float", "double", "void", "bool",
    "wchar_t",
];

const TAG_KEYWORDS: &[&str] = &["struct", "class", "union", "enum", "typename"];

/// Parse an abstract C declaration into a type string.
pub fn parse_type(text: &str) -> Result<TypeString, CdeclError> {
    let mut parser = Parser::new(text);
    if parser.tokens.is_empty() {
        return Err(CdeclError::Empty);
    }
    let ty = parser.declaration()?;
    match parser.peek_token() {
        None => Ok(ty),
        Some(tok) => Err(parser.unexpected(tok)),
    }
}

#[derive(Copy, Clone, Debug)]
struct Token<'a> {
    text: &'a str,
    offset: usize,
}

fn is_ident_start(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

fn tokenize(src: &str) -> Vec<Token<'_>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        if b.is_ascii_alphanumeric() || b == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
        } else if src[i..].starts_with("::") {
            i += 2;
        } else if src[i..].starts_with("...") {
            i += 3;
        } else {
            i += src[i..].chars().next().map_or(1, char::len_utf8);
        }
        tokens.push(Token {
            text: &src[start..i],
            offset: start,
        });
    }
    tokens
}

/// Collapse builtin type words to their canonical spelling.
fn canonical_builtin(words: &[&str]) -> String {
    let mut sign = None;
    let mut longs = 0;
    let mut short = false;
    let mut core = None;
    for &word in words {
        match word {
            "signed" | "unsigned" => sign = Some(word),
            "long" => longs += 1,
            "short" => short = true,
            _ => core = Some(word),
        }
    }
    let sized = short || longs > 0;
    let mut parts: Vec<&str> = Vec::new();
    match (sign, core) {
        (Some("unsigned"), _) => parts.push("unsigned"),
        (Some("signed"), Some("char")) => parts.push("signed"),
        _ => {}
    }
    if short {
        parts.push("short");
    }
    for _ in 0..longs {
        parts.push("long");
    }
    match core {
        Some("int") if sized => {}
        Some(core) => parts.push(core),
        None if !sized => parts.push("int"),
        None => {}
    }
    parts.join(" ")
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser {
            text,
            tokens: tokenize(text),
            pos: 0,
        }
    }

    fn peek_token(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek(&self) -> Option<&'a str> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<&'a str> {
        self.tokens.get(self.pos + n).map(|t| t.text)
    }

    fn bump(&mut self) -> Result<&'a str, CdeclError> {
        let tok = self.peek_token().ok_or_else(|| self.end())?;
        self.pos += 1;
        Ok(tok.text)
    }

    fn expect(&mut self, want: &str) -> Result<(), CdeclError> {
        match self.peek_token() {
            Some(tok) if tok.text == want => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => Err(self.unexpected(tok)),
            None => Err(self.end()),
        }
    }

    fn unexpected(&self, tok: Token<'_>) -> CdeclError {
        CdeclError::Unexpected {
            found: tok.text.to_owned(),
            offset: tok.offset,
            text: self.text.to_owned(),
        }
    }

    fn end(&self) -> CdeclError {
        CdeclError::UnexpectedEnd {
            text: self.text.to_owned(),
        }
    }

    fn declaration(&mut self) -> Result<TypeString, CdeclError> {
        if self.peek() == Some("...") {
            self.pos += 1;
            return Ok(TypeString::new("v(...)"));
        }
        let base = self.specifiers()?;
        let decl = self.declarator()?;
        Ok(base.push(&decl))
    }

    fn specifiers(&mut self) -> Result<TypeString, CdeclError> {
        let mut qualifiers = Vec::new();
        let mut builtin = Vec::new();
        let mut name: Option<String> = None;
        while let Some(tok) = self.peek() {
            let open = name.is_none() && builtin.is_empty();
            match tok {
                "const" | "volatile" => {
                    qualifiers.push(tok);
                    self.pos += 1;
                }
                _ if name.is_none() && BUILTIN_WORDS.contains(&tok) => {
                    builtin.push(tok);
                    self.pos += 1;
                }
                _ if open && TAG_KEYWORDS.contains(&tok) => {
                    self.pos += 1;
                    let tagged = self.qualified_name()?;
                    name = Some(if tok == "typename" {
                        tagged
                    } else {
                        format!("{tok} {tagged}")
                    });
                }
                _ if open && (is_ident_start(tok) || tok == "::") => {
                    name = Some(self.qualified_name()?);
                }
                _ => break,
            }
        }
        let base = if builtin.is_empty() {
            name.ok_or_else(|| CdeclError::MissingBase {
                text: self.text.to_owned(),
            })?
        } else {
            canonical_builtin(&builtin)
        };
        let mut ty = TypeString::new(base);
        for q in qualifiers.iter().rev() {
            ty = ty.add_qualifier(q);
        }
        Ok(ty)
    }

    fn qualified_name(&mut self) -> Result<String, CdeclError> {
        let mut out = String::new();
        if self.peek() == Some("::") {
            self.pos += 1;
            out.push_str("::");
        }
        loop {
            let tok = self.peek_token().ok_or_else(|| self.end())?;
            if !is_ident_start(tok.text) {
                return Err(self.unexpected(tok));
            }
            self.pos += 1;
            out.push_str(tok.text);
            if self.peek() == Some("<") {
                self.pos += 1;
                let args = self.template_args()?;
                out.push_str(TypeString::new("").add_template(&args).as_str());
            }
            if self.peek() == Some("::") && self.peek_at(1).is_some_and(is_ident_start) {
                self.pos += 1;
                out.push_str("::");
                continue;
            }
            return Ok(out);
        }
    }

    fn template_args(&mut self) -> Result<Vec<TypeString>, CdeclError> {
        let mut args = Vec::new();
        if self.peek() == Some(">") {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            let start = self.pos;
            let arg = match self.declaration() {
                Ok(ty) if matches!(self.peek(), Some("," | ">")) => ty,
                _ => {
                    self.pos = start;
                    let raw = self.raw_until(&[",", ">"])?;
                    // An empty argument, or one that swallowed the closing `>`.
                    if raw.is_empty() || raw.matches('<').count() > raw.matches('>').count() {
                        let tok = self.peek_token().ok_or_else(|| self.end())?;
                        return Err(self.unexpected(tok));
                    }
                    TypeString::new(raw)
                }
            };
            args.push(arg);
            match self.bump()? {
                "," => {}
                ">" => return Ok(args),
                _ => return Err(self.unexpected(self.tokens[self.pos - 1])),
            }
        }
    }

    /// Source text up to (not including) a depth-zero stop token.
    fn raw_until(&mut self, stops: &[&str]) -> Result<String, CdeclError> {
        let mut out = String::new();
        let mut depth = 0usize;
        let mut last_word = false;
        loop {
            let tok = self.peek_token().ok_or_else(|| self.end())?;
            if depth == 0 && stops.contains(&tok.text) {
                return Ok(out);
            }
            match tok.text {
                "(" | "[" => depth += 1,
                ")" | "]" => {
                    if depth == 0 {
                        return Err(self.unexpected(tok));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            let word = tok.text.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_');
            if word && last_word {
                out.push(' ');
            }
            out.push_str(tok.text);
            last_word = word;
            self.pos += 1;
        }
    }

    /// Number of tokens in a `Class::*` member-pointer operator at the
    /// cursor, `*` included.
    fn member_pointer_len(&self, from: usize) -> Option<usize> {
        let mut n = from;
        if self.peek_at(n) == Some("::") {
            n += 1;
        }
        loop {
            if !self.peek_at(n).is_some_and(is_ident_start) || self.peek_at(n + 1) != Some("::") {
                return None;
            }
            n += 2;
            if self.peek_at(n) == Some("*") {
                return Some(n + 1 - from);
            }
        }
    }

    /// Declarator elements in outer-to-inner order.
    fn declarator(&mut self) -> Result<String, CdeclError> {
        let mut ptrs = String::new();
        while let Some(tok) = self.peek() {
            match tok {
                "*" => ptrs.insert_str(0, "p."),
                "&" => ptrs.insert_str(0, "r."),
                "const" | "volatile" => ptrs.insert_str(0, &format!("q({tok}).")),
                _ => match self.member_pointer_len(0) {
                    Some(len) => {
                        let class: String = self.tokens[self.pos..self.pos + len - 2]
                            .iter()
                            .map(|t| t.text)
                            .collect();
                        ptrs.insert_str(0, &format!("m({class})."));
                        self.pos += len;
                        continue;
                    }
                    None => break,
                },
            }
            self.pos += 1;
        }

        let mut inner = String::new();
        let grouped = self.peek() == Some("(")
            && (matches!(self.peek_at(1), Some("*" | "&")) || self.member_pointer_len(1).is_some());
        if grouped {
            self.pos += 1;
            inner = self.declarator()?;
            self.expect(")")?;
        } else if self.peek().is_some_and(|t| is_ident_start(t) && !BUILTIN_WORDS.contains(&t)) {
            // declarator name, not part of the type
            self.pos += 1;
        }

        let mut suffixes = String::new();
        loop {
            match self.peek() {
                Some("[") => {
                    self.pos += 1;
                    let dim = self.raw_until(&["]"])?;
                    self.expect("]")?;
                    suffixes.push_str(&format!("a({dim})."));
                }
                Some("(") => {
                    self.pos += 1;
                    let parms = self.parameters()?;
                    while let Some(q @ ("const" | "volatile")) = self.peek() {
                        suffixes.push_str(&format!("q({q})."));
                        self.pos += 1;
                    }
                    suffixes.push_str(TypeString::new("").add_function(&parms).as_str());
                }
                _ => break,
            }
        }

        inner.push_str(&suffixes);
        inner.push_str(&ptrs);
        Ok(inner)
    }

    /// Parameter list after `(`, consuming the closing `)`.
    fn parameters(&mut self) -> Result<Vec<TypeString>, CdeclError> {
        let mut parms = Vec::new();
        if self.peek() == Some(")") {
            self.pos += 1;
            return Ok(parms);
        }
        loop {
            parms.push(self.declaration()?);
            if self.peek() == Some("=") {
                self.pos += 1;
                self.raw_until(&[",", ")"])?;
            }
            match self.bump()? {
                "," => {}
                ")" => break,
                _ => return Err(self.unexpected(self.tokens[self.pos - 1])),
            }
        }
        if parms.len() == 1 && parms[0].as_str() == "void" {
            parms.clear();
        }
        Ok(parms)
    }
}
