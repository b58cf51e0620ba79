//! String interner for token text deduplication.
//!
//! Keywords, punctuators and a handful of very common identifiers resolve to a
//! process-wide canonical `Atom`, so two atoms for `"function"` share one
//! allocation and compare by pointer. Everything else is pooled per parse in an
//! [`Interner`], which is dropped (or cleared) with the parse that owns it.
//!
//! The canonical table is built once on first use and never mutated afterwards,
//! so lookups on the read path take no lock.

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// An interned string.
///
/// Atoms are cheap to clone (a reference count bump) and are `Send + Sync`, so
/// trees holding them can be shared across threads once parsing is done.
/// Equality first checks pointer identity and falls back to comparing content,
/// so atoms from different pools still compare correctly.
#[derive(Clone)]
pub struct Atom(Arc<str>);

impl Atom {
    /// Create an atom that is not pooled anywhere.
    pub fn new(s: &str) -> Atom {
        Atom(Arc::from(s))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pointer identity. Canonical atoms for the same text are always `ptr_eq`.
    #[inline]
    pub fn ptr_eq(a: &Atom, b: &Atom) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Whether this atom is the process-wide canonical instance for its text.
    pub fn is_canonical(&self) -> bool {
        canonical(&self.0).is_some_and(|c| Atom::ptr_eq(c, self))
    }
}

impl Default for Atom {
    fn default() -> Self {
        canonical("").cloned().unwrap_or_else(|| Atom::new(""))
    }
}

impl Deref for Atom {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Atom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Atom {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Atom {
    #[inline]
    fn eq(&self, other: &Atom) -> bool {
        Atom::ptr_eq(self, other) || *self.0 == *other.0
    }
}

impl Eq for Atom {}

impl PartialEq<str> for Atom {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Atom {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with `str`'s Hash for the `Borrow<str>` lookups below.
        self.0.hash(state);
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Atom) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Atom) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Atom {
        Atom::new(s)
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Atom {
        Atom(Arc::from(s.into_boxed_str()))
    }
}

const COMMON_STRINGS: &[&str] = &[
    "",
    // Reserved words
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
    // Strict mode reserved words and contextual keywords
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "as",
    "async",
    "from",
    "get",
    "meta",
    "of",
    "set",
    "target",
    "constructor",
    "prototype",
    "__proto__",
    "arguments",
    "eval",
    "undefined",
    "use strict",
    // Punctuators
    "{",
    "}",
    "(",
    ")",
    "[",
    "]",
    ".",
    "...",
    ";",
    ",",
    "<",
    ">",
    "<=",
    ">=",
    "==",
    "!=",
    "===",
    "!==",
    "+",
    "-",
    "*",
    "**",
    "/",
    "%",
    "++",
    "--",
    "<<",
    ">>",
    ">>>",
    "&",
    "|",
    "^",
    "!",
    "~",
    "&&",
    "||",
    "??",
    "?",
    "?.",
    ":",
    "=",
    "+=",
    "-=",
    "*=",
    "**=",
    "/=",
    "%=",
    "<<=",
    ">>=",
    ">>>=",
    "&=",
    "|=",
    "^=",
    "&&=",
    "||=",
    "??=",
    "=>",
    "#",
    "@",
    // Common identifiers
    "a",
    "b",
    "c",
    "e",
    "i",
    "j",
    "n",
    "x",
    "y",
    "id",
    "name",
    "value",
    "length",
    "key",
    "index",
    "data",
    "error",
    "result",
    "options",
    "Array",
    "Object",
    "String",
    "Number",
    "Boolean",
    "Function",
    "Promise",
    "Symbol",
    "Error",
    "RegExp",
    "Math",
    "JSON",
    "console",
    "log",
    "window",
    "document",
    "module",
    "exports",
    "require",
    "push",
    "call",
    "apply",
    "bind",
    "then",
    "toString",
    "hasOwnProperty",
];

static CANONICAL: Lazy<FxHashMap<&'static str, Atom>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    map.reserve(COMMON_STRINGS.len());
    for &s in COMMON_STRINGS {
        map.entry(s).or_insert_with(|| Atom::new(s));
    }
    map
});

/// Look up the process-wide canonical atom for `s`, if `s` is one of the
/// well-known strings.
#[inline]
pub fn canonical(s: &str) -> Option<&'static Atom> {
    CANONICAL.get(s)
}

/// Per-parse string pool.
///
/// # Example
/// ```
/// use esz_common::interner::Interner;
/// let mut interner = Interner::new();
/// let a1 = interner.intern("hello");
/// let a2 = interner.intern("hello");
/// assert!(esz_common::Atom::ptr_eq(&a1, &a2));
/// assert_eq!(a1.as_str(), "hello");
/// ```
#[derive(Default)]
pub struct Interner {
    pool: FxHashSet<Atom>,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            pool: FxHashSet::default(),
        }
    }

    /// Intern a string, returning the canonical atom for well-known text and
    /// the pooled atom otherwise.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(atom) = canonical(s) {
            return atom.clone();
        }
        if let Some(atom) = self.pool.get(s) {
            return atom.clone();
        }
        let atom = Atom::new(s);
        self.pool.insert(atom.clone());
        atom
    }

    /// Intern an owned String, reusing its buffer when the text is new.
    #[inline]
    pub fn intern_owned(&mut self, s: String) -> Atom {
        if let Some(atom) = canonical(&s) {
            return atom.clone();
        }
        if let Some(atom) = self.pool.get(s.as_str()) {
            return atom.clone();
        }
        let atom = Atom::from(s);
        self.pool.insert(atom.clone());
        atom
    }

    /// Number of strings pooled by this interner (canonical atoms excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Drop every pooled string. Atoms already handed out stay valid.
    pub fn clear(&mut self) {
        self.pool.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_resolve_to_canonical_instances() {
        let mut first = Interner::new();
        let mut second = Interner::new();
        let a = first.intern("function");
        let b = second.intern("function");
        assert!(Atom::ptr_eq(&a, &b));
        assert!(a.is_canonical());
        assert_eq!(first.len(), 0);
    }

    #[test]
    fn other_strings_are_pooled_per_interner() {
        let mut first = Interner::new();
        let mut second = Interner::new();
        let a1 = first.intern("myIdentifier");
        let a2 = first.intern_owned("myIdentifier".to_string());
        let b = second.intern("myIdentifier");
        assert!(Atom::ptr_eq(&a1, &a2));
        assert!(!Atom::ptr_eq(&a1, &b));
        assert_eq!(a1, b);
        assert!(!a1.is_canonical());
    }

    #[test]
    fn distinct_content_never_aliases() {
        let mut interner = Interner::new();
        let a = interner.intern("ab");
        let b = interner.intern("ba");
        assert_ne!(a, b);
        assert_eq!(interner.len(), 2);
        interner.clear();
        assert!(interner.is_empty());
        assert_eq!(a.as_str(), "ab");
    }

    #[test]
    fn empty_string_is_canonical() {
        let mut interner = Interner::new();
        assert!(Atom::ptr_eq(&interner.intern(""), &Atom::default()));
    }
}
