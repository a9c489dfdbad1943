use internment::ArcIntern;
use std::cmp::Ordering;
use std::fmt;

/// An interned identifier. Equality and hashing are pointer-based; ordering
/// falls back to string comparison so symbols can key `BTreeMap`s
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(ArcIntern<String>);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Symbol(ArcIntern::new(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
