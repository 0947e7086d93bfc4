/// Toolchain Symbol Model
/// Holds the predefined identifiers a compiler front-end exposes for a target.
use std::collections::BTreeMap;
use thiserror::Error;

/// Hard cap on symbol name length. The baked on-disk record stores names in a
/// fixed 40-byte field, so the in-memory model enforces the same bound.
pub const MAX_SYMBOL_LEN: usize = 40;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SymbolError {
    #[error("empty symbol name")]
    EmptyName,
    #[error("symbol name too long: {0}")]
    NameTooLong(String),
    #[error("invalid symbol value in '{0}' (expected integer)")]
    InvalidValue(String),
}

// Recognition tables. Order matters: resolution walks each table front to back
// and the first defined identifier wins.
pub const LINUX_FAMILY: &[&str] = &["__linux", "__unix", "__posix", "__LINUX__", "__linux__"];
pub const WINDOWS_FAMILY: &[&str] = &["_WIN64", "_WIN32", "__CYGWIN32__", "__MINGW32__"];
pub const DARWIN_FAMILY: &[&str] = &["MACOSX", "__DARWIN__", "__APPLE__"];

pub const X86_32_ARCH: &[&str] = &["WIN_32", "__i386__", "i386", "__x86__"];
pub const X86_64_ARCH: &[&str] = &[
    "__amd64",
    "__amd64__",
    "__x86_64",
    "__x86_64__",
    "_M_X64",
    "__ia64__",
    "_M_IA64",
];

pub const CLANG_IDENT: &[&str] = &["__clang__"];
pub const GCC_IDENT: &[&str] = &["__GNUC__"];
pub const MSVC_IDENT: &[&str] = &["_MSC_VER"];

// SIMD-related identifiers. SSE2_LEVEL is a valued symbol (/arch:SSE2 sets it to
// 2); the rest participate by definedness or truthiness.
pub const SSE2_PASSTHROUGH: &str = "__SSE2__";
pub const SSE2_LEVEL: &str = "_M_IX86_FP";
pub const AMD64_MARKER: &str = "_M_AMD64";
pub const X64_MARKER: &str = "_M_X64";
pub const NEON_IDENT: &str = "__ARM_NEON__";

/// An unordered set of predefined symbols with optional integer values.
/// Defining a symbol without a value records 1, matching preprocessor
/// convention (`-DFOO` is `FOO=1`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet {
    defs: BTreeMap<String, i64>,
}

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str) {
        self.defs.insert(name.to_string(), 1);
    }

    pub fn define_valued(&mut self, name: &str, value: i64) {
        self.defs.insert(name.to_string(), value);
    }

    /// Parse a `NAME` or `NAME=VALUE` definition (the `-D` CLI form) and add it.
    pub fn parse_define(&mut self, def: &str) -> Result<(), SymbolError> {
        let (name, value) = match def.split_once('=') {
            Some((name, raw)) => {
                let value = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| SymbolError::InvalidValue(def.to_string()))?;
                (name.trim(), value)
            }
            None => (def.trim(), 1),
        };

        if name.is_empty() {
            return Err(SymbolError::EmptyName);
        }
        if name.len() > MAX_SYMBOL_LEN {
            return Err(SymbolError::NameTooLong(name.to_string()));
        }

        self.defs.insert(name.to_string(), value);
        Ok(())
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<i64> {
        self.defs.get(name).copied()
    }

    /// True if the symbol is defined with a nonzero value. Models an `#if SYM`
    /// truthiness test, where an undefined symbol evaluates to 0.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.value(name).unwrap_or(0) != 0
    }

    /// First identifier from `table` that is defined here, if any.
    pub fn first_defined<'t>(&self, table: &[&'t str]) -> Option<&'t str> {
        table.iter().find(|name| self.is_defined(name)).copied()
    }

    pub fn any_defined(&self, table: &[&str]) -> bool {
        self.first_defined(table).is_some()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Deterministic (name-ordered) iteration, so baked output is stable.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.defs.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define_forms() {
        let mut set = SymbolSet::new();
        set.parse_define("__linux__").unwrap();
        set.parse_define("_M_IX86_FP=2").unwrap();
        set.parse_define(" _MSC_VER = 1939 ").unwrap();

        assert!(set.is_defined("__linux__"));
        assert_eq!(set.value("__linux__"), Some(1));
        assert_eq!(set.value("_M_IX86_FP"), Some(2));
        assert_eq!(set.value("_MSC_VER"), Some(1939));
    }

    #[test]
    fn test_parse_define_rejects_garbage() {
        let mut set = SymbolSet::new();
        assert_eq!(set.parse_define(""), Err(SymbolError::EmptyName));
        assert_eq!(set.parse_define("=3"), Err(SymbolError::EmptyName));
        assert!(matches!(
            set.parse_define("FOO=bar"),
            Err(SymbolError::InvalidValue(_))
        ));

        let long = "X".repeat(MAX_SYMBOL_LEN + 1);
        assert!(matches!(
            set.parse_define(&long),
            Err(SymbolError::NameTooLong(_))
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn test_truthiness_matches_preprocessor() {
        let mut set = SymbolSet::new();
        set.define_valued("ZERO", 0);
        set.define("ONE");

        assert!(set.is_defined("ZERO"));
        assert!(!set.is_truthy("ZERO"));
        assert!(set.is_truthy("ONE"));
        assert!(!set.is_truthy("MISSING"));
    }

    #[test]
    fn test_first_defined_respects_table_order() {
        let mut set = SymbolSet::new();
        set.define("__linux__");
        set.define("__unix");

        // __unix comes before __linux__ in the Linux table.
        assert_eq!(set.first_defined(LINUX_FAMILY), Some("__unix"));
        assert_eq!(set.first_defined(WINDOWS_FAMILY), None);
    }
}
