//! Update scopes and the one-slot-per-scope container.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Constraint under which the "latest applicable version" is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateScope {
    /// Any newer version
    Major,
    /// Newer versions sharing the used major
    Minor,
    /// Newer versions sharing the used major and minor
    Patch,
}

impl UpdateScope {
    /// Returns all scopes in a consistent order
    pub fn all() -> &'static [UpdateScope] {
        &[UpdateScope::Major, UpdateScope::Minor, UpdateScope::Patch]
    }

    /// Returns the lowercase name used in CLI flags and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateScope::Major => "major",
            UpdateScope::Minor => "minor",
            UpdateScope::Patch => "patch",
        }
    }
}

impl fmt::Display for UpdateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown update scope '{}' (expected major, minor or patch)", s))
    }
}

/// A value for every [`UpdateScope`].
///
/// Lookups are exhaustive matches, so a missing scope cannot happen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeMap<T> {
    /// Slot for [`UpdateScope::Major`]
    pub major: T,
    /// Slot for [`UpdateScope::Minor`]
    pub minor: T,
    /// Slot for [`UpdateScope::Patch`]
    pub patch: T,
}

impl<T> ScopeMap<T> {
    /// Build a map by evaluating `f` once per scope
    pub fn from_fn(mut f: impl FnMut(UpdateScope) -> T) -> Self {
        Self {
            major: f(UpdateScope::Major),
            minor: f(UpdateScope::Minor),
            patch: f(UpdateScope::Patch),
        }
    }

    /// Value for `scope`
    pub fn get(&self, scope: UpdateScope) -> &T {
        match scope {
            UpdateScope::Major => &self.major,
            UpdateScope::Minor => &self.minor,
            UpdateScope::Patch => &self.patch,
        }
    }

    /// Mutable value for `scope`
    pub fn get_mut(&mut self, scope: UpdateScope) -> &mut T {
        match scope {
            UpdateScope::Major => &mut self.major,
            UpdateScope::Minor => &mut self.minor,
            UpdateScope::Patch => &mut self.patch,
        }
    }

    /// Iterate `(scope, value)` pairs in [`UpdateScope::all`] order
    pub fn iter(&self) -> impl Iterator<Item = (UpdateScope, &T)> {
        UpdateScope::all()
            .iter()
            .map(move |&scope| (scope, self.get(scope)))
    }

    /// Transform every slot
    pub fn map<U>(&self, mut f: impl FnMut(UpdateScope, &T) -> U) -> ScopeMap<U> {
        ScopeMap::from_fn(|scope| f(scope, self.get(scope)))
    }
}
