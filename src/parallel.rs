//! In-process partitioned runner: map tasks hash-partition their facts into
//! JSON spill files, a join barrier separates the phases, and one reduce task
//! per partition groups and reduces its share. Facts carry their source
//! record ordinal so every reduce task restores the global emission order,
//! which makes the merged output identical to the sequential fold.

use std::collections::{hash_map::DefaultHasher, BTreeMap};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use tokio::task::JoinSet;
use tracing::info;

use crate::fact::{FactGroup, PartialFact};
use crate::mapper::emit_pair_facts;
use crate::pair::PairKey;
use crate::pipeline::{reduce_counted, PipelineError, RunOutput, RunStats};
use crate::record::UserRecord;

#[derive(Debug, Clone, Copy)]
pub struct PartitionOpts {
    /// Number of map tasks the input lines are chunked across.
    pub n_map: usize,
    /// Number of partitions, and therefore reduce tasks.
    pub n_partitions: usize,
}

impl Default for PartitionOpts {
    fn default() -> Self {
        PartitionOpts {
            n_map: 4,
            n_partitions: 4,
        }
    }
}

fn ihash(key: &PairKey) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish() as usize
}

fn spill_path(scratch: &Path, map_task: usize, partition: usize) -> PathBuf {
    scratch.join(format!("mr-spill-{}-{}", map_task, partition))
}

/// One map task: parse a chunk of (ordinal, line) pairs, emit facts, and
/// spill each partition as JSON. Returns the count of malformed lines.
fn run_map_task(
    chunk: Vec<(usize, String)>,
    task_num: usize,
    n_partitions: usize,
    scratch: &Path,
) -> Result<usize, PipelineError> {
    let mut parts: Vec<Vec<(usize, PartialFact)>> = vec![vec![]; n_partitions];
    let mut malformed = 0;

    for (ordinal, line) in chunk {
        let Ok(record) = UserRecord::parse(&line) else {
            malformed += 1;
            continue;
        };
        for fact in emit_pair_facts(&record) {
            parts[ihash(&fact.key) % n_partitions].push((ordinal, fact));
        }
    }

    for (p, part) in parts.iter().enumerate() {
        std::fs::write(spill_path(scratch, task_num, p), serde_json::to_string(part)?)?;
    }
    Ok(malformed)
}

/// One reduce task: read every map task's spill for this partition, restore
/// global order, group, reduce, and clean up the spills.
fn run_reduce_task(
    partition: usize,
    n_map: usize,
    scratch: &Path,
) -> Result<RunOutput, PipelineError> {
    let mut tagged: Vec<(usize, PartialFact)> = vec![];
    for t in 0..n_map {
        let contents = std::fs::read_to_string(spill_path(scratch, t, partition))?;
        tagged.extend(serde_json::from_str::<Vec<(usize, PartialFact)>>(&contents)?);
    }
    tagged.sort_by_key(|(ordinal, _)| *ordinal);

    let mut groups: BTreeMap<PairKey, Vec<PartialFact>> = BTreeMap::new();
    for (_, fact) in tagged {
        groups.entry(fact.key.clone()).or_default().push(fact);
    }

    let mut stats = RunStats::default();
    let mut results = vec![];
    for (key, facts) in groups {
        if let Some(result) = reduce_counted(&FactGroup { key, facts }, &mut stats) {
            results.push(result);
        }
    }

    for t in 0..n_map {
        std::fs::remove_file(spill_path(scratch, t, partition))?;
    }
    Ok(RunOutput { results, stats })
}

/// Runs the pipeline with parallel map and reduce phases. `scratch` holds the
/// intermediate spill files; it must exist and be writable.
pub async fn run_partitioned(
    lines: Vec<String>,
    opts: PartitionOpts,
    scratch: &Path,
) -> Result<RunOutput, PipelineError> {
    let n_partitions = opts.n_partitions.max(1);
    let chunk_size = lines.len().div_ceil(opts.n_map.max(1)).max(1);

    let tagged: Vec<(usize, String)> = lines.into_iter().enumerate().collect();
    let chunks: Vec<Vec<(usize, String)>> = tagged
        .chunks(chunk_size)
        .map(|c| c.to_vec())
        .collect();
    let n_map = chunks.len();
    info!(n_map, n_partitions, "starting map phase");

    let mut map_tasks = JoinSet::new();
    for (t, chunk) in chunks.into_iter().enumerate() {
        let scratch = scratch.to_path_buf();
        map_tasks.spawn_blocking(move || run_map_task(chunk, t, n_partitions, &scratch));
    }

    // Full barrier: no reduce task may start until every map task is done.
    let mut stats = RunStats::default();
    while let Some(joined) = map_tasks.join_next().await {
        stats.malformed_lines += joined??;
    }
    info!("map phase done, starting reduce phase");

    let mut reduce_tasks = JoinSet::new();
    for p in 0..n_partitions {
        let scratch = scratch.to_path_buf();
        reduce_tasks.spawn_blocking(move || run_reduce_task(p, n_map, &scratch));
    }

    let mut results = vec![];
    while let Some(joined) = reduce_tasks.join_next().await {
        let part = joined??;
        results.extend(part.results);
        stats.malformed_lines += part.stats.malformed_lines;
        stats.insufficient_keys += part.stats.insufficient_keys;
        stats.ambiguous_keys += part.stats.ambiguous_keys;
    }
    results.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(RunOutput { results, stats })
}
