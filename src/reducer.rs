use std::collections::BTreeSet;

use crate::fact::{FactGroup, MutualFriendsResult};

/// Reduce phase: intersect the friend sets of the first two facts in the
/// group.
///
/// Fewer than two facts means the pair has only one-sided attestation and no
/// result is produced. When more than two facts are present, the first two
/// observed win; that inherited policy is the documented contract, and the
/// pipeline counts such groups rather than changing the semantics here.
pub fn reduce_group(group: &FactGroup) -> Option<MutualFriendsResult> {
    let [first, second, ..] = group.facts.as_slice() else {
        return None;
    };

    let set1: BTreeSet<&str> = first.friend_ids.iter().map(String::as_str).collect();
    let set2: BTreeSet<&str> = second.friend_ids.iter().map(String::as_str).collect();
    let mutual_friends = set1.intersection(&set2).map(|s| s.to_string()).collect();

    Some(MutualFriendsResult {
        key: group.key.clone(),
        mutual_friends,
    })
}
