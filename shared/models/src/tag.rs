//! Tag Vocabulary Types
//!
//! Tags exist in two lifecycle states: persisted (the server assigned an id)
//! and pending (synthesized client-side during metadata extraction, resolved
//! by name when the item is submitted).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum tags attachable to a single upload draft.
pub const MAX_SELECTED_TAGS: usize = 4;

/// Maximum entries returned by a tag suggestion query.
pub const MAX_TAG_SUGGESTIONS: usize = 10;

/// A vocabulary tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    /// A tag already known to the server.
    pub fn persisted(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: TagId::Persisted(id),
            name: name.into(),
        }
    }

    /// A client-synthesized tag awaiting server-side resolution by name.
    pub fn pending(id: PendingTagId, name: impl Into<String>) -> Self {
        Self {
            id: TagId::Pending(id),
            name: name.into(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.id, TagId::Pending(_))
    }

    /// Case-insensitive name comparison, the equality the vocabulary uses.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

/// Tag identity across both lifecycle states.
///
/// On the wire a persisted id is a JSON number and a pending id is its
/// `temp-<seq>-<label>` string form, hence the untagged representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagId {
    Persisted(i64),
    Pending(PendingTagId),
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persisted(id) => write!(f, "{}", id),
            Self::Pending(id) => write!(f, "{}", id),
        }
    }
}

/// Identifier of a tag that only exists client-side.
///
/// Issued by [`PendingTagAllocator`]; the sequence number makes ids unique
/// within one reconciliation pass without consulting the wall clock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingTagId {
    seq: u64,
    label: String,
}

impl PendingTagId {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for PendingTagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "temp-{}-{}", self.seq, self.label)
    }
}

impl FromStr for PendingTagId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("temp-")
            .ok_or_else(|| format!("not a pending tag id: {}", s))?;
        let (seq, label) = rest
            .split_once('-')
            .ok_or_else(|| format!("malformed pending tag id: {}", s))?;
        let seq = seq
            .parse::<u64>()
            .map_err(|_| format!("malformed pending tag id: {}", s))?;
        Ok(Self {
            seq,
            label: label.to_string(),
        })
    }
}

impl Serialize for PendingTagId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PendingTagId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Issues pending tag ids with a locally incrementing sequence.
///
/// One allocator per extraction pass; ids it hands out never collide within
/// that pass.
#[derive(Debug)]
pub struct PendingTagAllocator {
    next_seq: u64,
}

impl PendingTagAllocator {
    pub fn new() -> Self {
        Self { next_seq: 1 }
    }

    pub fn allocate(&mut self, label: impl Into<String>) -> PendingTagId {
        let seq = self.next_seq;
        self.next_seq += 1;
        PendingTagId {
            seq,
            label: label.into(),
        }
    }
}

impl Default for PendingTagAllocator {
    fn default() -> Self {
        Self::new()
    }
}
