//! Mutual-friends MapReduce: for every pair of users that list each other as
//! friends, compute the friends they have in common.
//!
//! The map phase emits one `(PairKey, friend list)` fact per listed friend,
//! the shuffle groups facts by pair key, and the reduce phase intersects the
//! friend sets of the first two facts in each group. Grouping is done by a
//! pluggable [`substrate::ExecutionSubstrate`]; [`substrate::LocalShuffle`]
//! is the in-memory reference, [`parallel`] a partitioned tokio runner.

pub mod fact;
pub mod mapper;
pub mod pair;
pub mod parallel;
pub mod pipeline;
pub mod record;
pub mod reducer;
pub mod substrate;

pub use fact::{FactGroup, MutualFriendsResult, PartialFact};
pub use pair::PairKey;
pub use pipeline::{run, RunOutput, RunStats};
pub use record::{RecordError, UserRecord};
