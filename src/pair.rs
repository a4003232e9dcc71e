use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier for an unordered pair of user ids.
///
/// Invariant: `a < b` lexicographically, so `PairKey::new(x, y)` and
/// `PairKey::new(y, x)` are equal. Self-pairs are rejected.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PairKey {
    a: String,
    b: String,
}

impl PairKey {
    pub fn new(x: &str, y: &str) -> Option<Self> {
        match x.cmp(y) {
            std::cmp::Ordering::Less => Some(PairKey {
                a: x.to_string(),
                b: y.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(PairKey {
                a: y.to_string(),
                b: x.to_string(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &str {
        &self.a
    }

    pub fn second(&self) -> &str {
        &self.b
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.a, self.b)
    }
}
