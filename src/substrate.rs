use std::collections::BTreeMap;

use crate::fact::{FactGroup, PartialFact};
use crate::pair::PairKey;

/// The seam between the core and whatever executes it.
///
/// A substrate collects every fact the map phase emits and, once emission is
/// complete, delivers one fully materialized [`FactGroup`] per distinct key.
/// `for_each_group` is the map/reduce barrier: implementations must not
/// deliver a group before all facts for its key have been observed.
pub trait ExecutionSubstrate {
    fn emit(&mut self, fact: PartialFact);

    /// Delivers every group exactly once, consuming the collected facts.
    fn for_each_group(&mut self, visit: &mut dyn FnMut(FactGroup));
}

/// Reference grouping adapter: a single-pass fold into a `BTreeMap`, keeping
/// every fact in emission order under its key. No deduplication.
#[derive(Debug, Default)]
pub struct LocalShuffle {
    groups: BTreeMap<PairKey, Vec<PartialFact>>,
}

impl LocalShuffle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExecutionSubstrate for LocalShuffle {
    fn emit(&mut self, fact: PartialFact) {
        self.groups.entry(fact.key.clone()).or_default().push(fact);
    }

    fn for_each_group(&mut self, visit: &mut dyn FnMut(FactGroup)) {
        for (key, facts) in std::mem::take(&mut self.groups) {
            visit(FactGroup { key, facts });
        }
    }
}
