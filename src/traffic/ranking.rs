// Top-talker ranking: sorted once at construction, read-only afterwards.

use std::cmp::Ordering;

use serde::{Serialize, Serializer};

/// Number of entries exposed by default (logs, JSON snapshot).
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub bytes: u64,
    pub identifier: String,
}

impl RankingEntry {
    pub fn new(bytes: u64, identifier: impl Into<String>) -> Self {
        Self {
            bytes,
            identifier: identifier.into(),
        }
    }
}

/// Larger byte counts first; equal counts by identifier ascending.
impl Ord for RankingEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .bytes
            .cmp(&self.bytes)
            .then_with(|| self.identifier.cmp(&other.identifier))
    }
}

impl PartialOrd for RankingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    entries: Vec<RankingEntry>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` largest entries. Never mutates the ranking; repeated calls agree.
    pub fn top(&self, n: usize) -> &[RankingEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

impl FromIterator<RankingEntry> for Ranking {
    fn from_iter<I: IntoIterator<Item = RankingEntry>>(iter: I) -> Self {
        let mut entries: Vec<RankingEntry> = iter.into_iter().collect();
        entries.sort();
        Self { entries }
    }
}

impl Serialize for Ranking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.top(TOP_N).serialize(serializer)
    }
}
