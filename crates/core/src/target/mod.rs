use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SequencerError;

const ELEMENT_PREFIX: &str = "ring";

/// Identifier of one physical fixture. Serialized as `ring<N>`, which is the
/// key the rendering service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl ElementId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ElementId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ELEMENT_PREFIX}{}", self.0)
    }
}

impl FromStr for ElementId {
    type Err = SequencerError;

    /// Accepts both `ring7` and a bare `7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(ELEMENT_PREFIX).unwrap_or(s);
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| SequencerError::msg(format!("`{s}` is not an element name")))
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordered, duplicate-free set of target elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSet(Vec<ElementId>);

impl ElementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(id: impl Into<ElementId>) -> Self {
        Self(vec![id.into()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.0.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[ElementId] {
        &self.0
    }
}

impl<T: Into<ElementId>> FromIterator<T> for ElementSet {
    /// Keeps the first occurrence of every element.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ids: Vec<ElementId> = Vec::new();
        for id in iter {
            let id = id.into();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self(ids)
    }
}

impl From<u32> for ElementSet {
    fn from(value: u32) -> Self {
        Self::single(value)
    }
}

impl From<ElementId> for ElementSet {
    fn from(value: ElementId) -> Self {
        Self::single(value)
    }
}

impl From<&[u32]> for ElementSet {
    fn from(value: &[u32]) -> Self {
        value.iter().copied().collect()
    }
}

/// Named spatial subset of a ring's pixels. The engine never interprets the
/// name; the renderer resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Segment(String);

impl Segment {
    pub const ALL: &'static str = "all";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn all() -> Self {
        Self::new(Self::ALL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Self(value)
    }
}
