use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

/// Position of a node in the category tree: an ordered list of numeric
/// segments, rendered as a dotted string (`1.2.3`) on the wire.
///
/// Keeping the segments as integers makes ordering numeric by construction;
/// `1.10` sorts after `1.2`, which string comparison gets wrong.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<u32>);

impl Code {
    /// Builds a code from raw segments. Returns `None` for an empty list.
    pub fn new(segments: Vec<u32>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments))
        }
    }

    /// A single-segment root code.
    pub fn root(segment: u32) -> Self {
        Self(vec![segment])
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    /// Depth in the tree; equals the segment count.
    pub fn level(&self) -> u32 {
        self.0.len() as u32
    }

    /// The code with its last segment removed, or `None` at the root.
    pub fn parent(&self) -> Option<Code> {
        if self.0.len() <= 1 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn last_segment(&self) -> u32 {
        *self.0.last().unwrap_or(&0)
    }

    /// Appends one segment, producing a direct child code.
    pub fn child(&self, segment: u32) -> Code {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    pub fn starts_with(&self, prefix: &Code) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    /// `true` when `self` is exactly one segment below `parent`.
    pub fn is_child_of(&self, parent: &Code) -> bool {
        self.0.len() == parent.0.len() + 1 && self.starts_with(parent)
    }

    /// The segments of `self` past `prefix`, or `None` when `self` does not
    /// sit under `prefix`.
    pub fn suffix_after(&self, prefix: &Code) -> Option<&[u32]> {
        if self.starts_with(prefix) {
            Some(&self.0[prefix.0.len()..])
        } else {
            None
        }
    }

    /// Appends a suffix of segments, transposing a relative offset onto
    /// another branch.
    pub fn join(&self, suffix: &[u32]) -> Code {
        let mut segments = self.0.clone();
        segments.extend_from_slice(suffix);
        Self(segments)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidCode(s.to_string()));
        }
        let segments = trimmed
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| CoreError::InvalidCode(s.to_string()))?;
        Code::new(segments).ok_or_else(|| CoreError::InvalidCode(s.to_string()))
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
