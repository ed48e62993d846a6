use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Newtype wrapper for a named player flag ("has_key", "injured").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flag(pub String);

impl Flag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Flag {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl Borrow<str> for Flag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The boolean flags accumulated during one playthrough.
///
/// A flag that is absent is false. The engine never shares a state
/// between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    flags: FxHashSet<Flag>,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Set a flag. Returns true if it was previously unset.
    pub fn set(&mut self, flag: Flag) -> bool {
        self.flags.insert(flag)
    }

    /// Clear a flag. Returns true if it was previously set.
    pub fn clear(&mut self, flag: &str) -> bool {
        self.flags.remove(flag)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// All set flags, sorted by name.
    pub fn flags(&self) -> Vec<&Flag> {
        let mut flags: Vec<&Flag> = self.flags.iter().collect();
        flags.sort();
        flags
    }
}

impl<F: Into<Flag>> FromIterator<F> for PlayerState {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().map(Into::into).collect(),
        }
    }
}
