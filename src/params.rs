//! Path parameters extracted by a successful match.
//!
//! Named captures (`:user`) are addressable by name. Unnamed captures
//! (wildcards, parenthesized groups, raw-regex groups) are kept in an
//! ordered positional list that handlers can index or consume with
//! [`Params::shift`]. A route that mixes both produces both: names stay
//! addressable and the unnamed captures fill the positional list.

use smallvec::SmallVec;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Maximum number of named parameters before heap allocation.
/// Most routes have ≤4 named captures (e.g. `/user/:user/:op?`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// One captured value; `None` when the group did not participate
/// (an optional capture that was absent)
pub type Capture = Option<String>;

/// Stack-allocated named parameter storage for the hot path.
///
/// Param names use `Arc<str>` because they come from the compiled route
/// and are shared by every match of it.
pub type ParamVec = SmallVec<[(Arc<str>, Capture); MAX_INLINE_PARAMS]>;

/// Parameters produced by one match attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    named: ParamVec,
    positional: VecDeque<Capture>,
    sequence: bool,
}

impl Params {
    /// Empty parameter bag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: Arc<str>, value: Capture) {
        self.named.push((name, value));
    }

    pub(crate) fn push(&mut self, value: Capture) {
        self.sequence = true;
        self.positional.push_back(value);
    }

    /// Get a named parameter
    ///
    /// Uses "last write wins" semantics when a template repeats a name.
    /// Returns `None` both for unknown names and for optional captures that
    /// were absent; use [`Params::contains`] to tell them apart.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Whether the route declares a capture with this name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.named.iter().any(|(k, _)| k.as_ref() == name)
    }

    /// Get a positional capture by index
    #[inline]
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).and_then(|v| v.as_deref())
    }

    /// Remove and return the first remaining positional capture
    ///
    /// The outer `Option` is `None` once the list is exhausted; the inner
    /// one is `None` for a group that did not participate in the match.
    pub fn shift(&mut self) -> Option<Capture> {
        self.positional.pop_front()
    }

    /// Iterate named parameters in capture order
    pub fn named(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.named.iter().map(|(k, v)| (k.as_ref(), v.as_deref()))
    }

    /// Iterate remaining positional captures in order
    pub fn positionals(&self) -> impl Iterator<Item = Option<&str>> {
        self.positional.iter().map(|v| v.as_deref())
    }

    /// Whether the matched route had unnamed captures (sequence-shaped bag)
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.sequence
    }

    /// Number of named plus remaining positional captures
    #[must_use]
    pub fn len(&self) -> usize {
        self.named.len() + self.positional.len()
    }

    /// `true` when nothing was captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert present named params to a HashMap
    /// Note: This allocates - use get() in hot paths instead
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.named
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.to_string(), v.clone())))
            .collect()
    }
}

/// Percent-decode a captured path component, keeping the raw text when the
/// decoded bytes are not valid UTF-8
pub(crate) fn decode_component(raw: &str) -> String {
    if !raw.contains('%') {
        return raw.to_string();
    }
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
