use thiserror::Error;
use tracing::debug;

use crate::fact::{FactGroup, MutualFriendsResult};
use crate::mapper::emit_pair_facts;
use crate::record::UserRecord;
use crate::reducer::reduce_group;
use crate::substrate::ExecutionSubstrate;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("spill I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spill serialization error: {0}")]
    Spill(#[from] serde_json::Error),

    #[error("task panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Soft-condition counters. None of these is an error; the worst outcome of
/// any of them is fewer output lines than a naive count would predict.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct RunStats {
    /// Lines with fewer than two whitespace-separated fields, dropped.
    pub malformed_lines: usize,
    /// Keys that received a single fact; no output for them.
    pub insufficient_keys: usize,
    /// Keys that received more than two facts; the first two won.
    pub ambiguous_keys: usize,
}

#[derive(Debug)]
pub struct RunOutput {
    pub results: Vec<MutualFriendsResult>,
    pub stats: RunStats,
}

pub(crate) fn reduce_counted(
    group: &FactGroup,
    stats: &mut RunStats,
) -> Option<MutualFriendsResult> {
    if group.facts.len() > 2 {
        stats.ambiguous_keys += 1;
        debug!(key = %group.key, facts = group.facts.len(), "ambiguous group, first two facts win");
    }
    let result = reduce_group(group);
    if result.is_none() {
        stats.insufficient_keys += 1;
    }
    result
}

/// Runs the full pipeline over a stream of input lines: parse each line, emit
/// pair facts into the substrate, then reduce every group the substrate
/// delivers. Malformed lines are dropped and counted.
pub fn run<S, I, L>(substrate: &mut S, lines: I) -> RunOutput
where
    S: ExecutionSubstrate,
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    let mut stats = RunStats::default();

    for line in lines {
        match UserRecord::parse(line.as_ref()) {
            Ok(record) => {
                for fact in emit_pair_facts(&record) {
                    substrate.emit(fact);
                }
            }
            Err(err) => {
                stats.malformed_lines += 1;
                debug!(%err, "dropping malformed line");
            }
        }
    }

    let mut results = vec![];
    substrate.for_each_group(&mut |group| {
        if let Some(result) = reduce_counted(&group, &mut stats) {
            results.push(result);
        }
    });

    RunOutput { results, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::LocalShuffle;

    fn run_lines(lines: &[&str]) -> RunOutput {
        let mut shuffle = LocalShuffle::new();
        run(&mut shuffle, lines)
    }

    fn output_lines(out: &RunOutput) -> Vec<String> {
        out.results.iter().map(|r| r.to_output_line()).collect()
    }

    #[test]
    fn disjoint_lists_emit_an_empty_mutual_set() {
        let out = run_lines(&["A B,C", "B A,D"]);
        assert_eq!(output_lines(&out), vec!["A,B\t"]);
    }

    #[test]
    fn common_friend_is_reported() {
        let out = run_lines(&["A B,C,D", "B A,C,E"]);
        assert!(output_lines(&out).contains(&"A,B\tC".to_string()));
    }

    #[test]
    fn one_sided_attestation_produces_no_output() {
        let out = run_lines(&["A B,C"]);
        assert!(out.results.is_empty());
        // Keys (A,B) and (A,C) each got a single fact.
        assert_eq!(out.stats.insufficient_keys, 2);
    }

    #[test]
    fn trailing_commas_create_no_phantom_pairs() {
        let out = run_lines(&["A B,", "B A,"]);
        // No ("",A) / ("",B) groups: the only key is (A,B), attested twice.
        assert_eq!(out.stats.insufficient_keys, 0);
        assert_eq!(output_lines(&out), vec!["A,B\t"]);
    }

    #[test]
    fn malformed_line_is_dropped_without_output() {
        let out = run_lines(&["A"]);
        assert!(out.results.is_empty());
        assert_eq!(out.stats.malformed_lines, 1);
    }

    #[test]
    fn duplicate_input_line_makes_a_key_ambiguous() {
        let out = run_lines(&["A B", "A B", "B A,C"]);
        assert_eq!(out.stats.ambiguous_keys, 1);
        // The first two facts for (A,B) both carry A's list {B}, so B's
        // contribution {A,C} never enters the intersection.
        assert_eq!(output_lines(&out), vec!["A,B\tB"]);
    }

    #[test]
    fn small_graph_end_to_end() {
        let out = run_lines(&[
            "A B,C,D",
            "B A,C,D,E",
            "C A,B",
            "D A,B",
            "E B",
        ]);
        let lines = output_lines(&out);
        assert_eq!(
            lines,
            vec![
                "A,B\tC,D",
                "A,C\tB",
                "A,D\tB",
                "B,C\tA",
                "B,D\tA",
                "B,E\t",
            ]
        );
        assert_eq!(out.stats.malformed_lines, 0);
    }
}
