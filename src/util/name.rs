//! Case-insensitive identifiers.
//!
//! Package ids and project names compare ordinally ignoring case, so
//! `Newtonsoft.Json` and `newtonsoft.json` name the same package. The original
//! spelling is kept for display and for writing back to host files.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Compare two strings ignoring case.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Order two strings ignoring case.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// A name whose equality, ordering and hash ignore case.
#[derive(Clone, Default)]
pub struct Name {
    inner: String,
}

impl Name {
    /// Create a new name, keeping its spelling.
    pub fn new(s: impl Into<String>) -> Self {
        Name { inner: s.into() }
    }

    /// Get the name as originally spelled.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Check whether `other` names the same thing.
    pub fn matches(&self, other: &str) -> bool {
        eq_ignore_case(&self.inner, other)
    }

    /// Lower-cased form, used where a stable normalized key is needed.
    pub fn normalized(&self) -> String {
        self.inner.to_lowercase()
    }
}

impl Deref for Name {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        eq_ignore_case(&self.inner, &other.inner)
    }
}

impl Eq for Name {}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_ignore_case(&self.inner, &other.inner)
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.inner.chars().flat_map(char::to_lowercase) {
            c.hash(state);
        }
        state.write_u8(0xff);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name::new(s)
    }
}

impl From<&String> for Name {
    fn from(s: &String) -> Self {
        Name::new(s.as_str())
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Name::new)
    }
}

/// An insertion-ordered set of names, de-duplicated ignoring case.
///
/// The first spelling inserted wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet {
    order: Vec<Name>,
    seen: HashSet<Name>,
}

impl NameSet {
    pub fn new() -> Self {
        NameSet::default()
    }

    /// Insert a name. Returns false if an equal name was already present.
    pub fn insert(&mut self, name: impl Into<Name>) -> bool {
        let name = name.into();
        if self.seen.contains(&name) {
            return false;
        }
        self.seen.insert(name.clone());
        self.order.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(&Name::new(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Name> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<N: Into<Name>> FromIterator<N> for NameSet {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut set = NameSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

impl IntoIterator for NameSet {
    type Item = Name;
    type IntoIter = std::vec::IntoIter<Name>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

impl<'a> IntoIterator for &'a NameSet {
    type Item = &'a Name;
    type IntoIter = std::slice::Iter<'a, Name>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

impl Serialize for NameSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.order.iter())
    }
}
