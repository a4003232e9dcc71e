use crate::fact::PartialFact;
use crate::pair::PairKey;
use crate::record::UserRecord;

/// Map phase: one fact per listed friend, each carrying the record's full
/// friend list.
///
/// A user with N friends emits N facts that differ only in key. This
/// multiplicity is deliberate: it guarantees every pair `(user, friend)` the
/// user participates in receives a fact bearing the user's full list. Do not
/// collapse it to one emission per record.
pub fn emit_pair_facts(record: &UserRecord) -> Vec<PartialFact> {
    record
        .friend_ids
        .iter()
        .filter_map(|friend| PairKey::new(&record.user_id, friend))
        .map(|key| PartialFact::new(key, record.friend_ids.clone()))
        .collect()
}
