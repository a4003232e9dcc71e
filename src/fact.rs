use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::pair::PairKey;

/// One user's full friend list, tagged with a pair key it contributes to.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PartialFact {
    pub key: PairKey,
    pub friend_ids: Vec<String>,
}

impl PartialFact {
    pub fn new(key: PairKey, friend_ids: Vec<String>) -> Self {
        PartialFact { key, friend_ids }
    }
}

/// All partial facts collected for one pair key, fully materialized.
///
/// The reducer may legitimately see more than two facts for a key (noisy or
/// duplicated input), so facts are buffered in a plain `Vec` rather than
/// handed over as a single-pass cursor.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FactGroup {
    pub key: PairKey,
    pub facts: Vec<PartialFact>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MutualFriendsResult {
    pub key: PairKey,
    pub mutual_friends: BTreeSet<String>,
}

impl MutualFriendsResult {
    /// Boundary form: `<a>,<b><tab><m1>,<m2>,...`. The mutual list is empty
    /// but the line is still produced when the intersection is empty.
    pub fn to_output_line(&self) -> String {
        let joined: Vec<&str> = self.mutual_friends.iter().map(String::as_str).collect();
        format!("{}\t{}", self.key, joined.join(","))
    }
}
