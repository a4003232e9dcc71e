use std::fs::File;
use std::io::Read;
use std::io::Write;

use tracing_subscriber::EnvFilter;

use mutualfriends::parallel::{run_partitioned, PartitionOpts};
use mutualfriends::pipeline::run;
use mutualfriends::substrate::LocalShuffle;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if std::env::args().len() < 3 {
        eprintln!("Usage: mrmutual <seq|par> inputfiles...");
        return Err("1".into());
    }

    let mode = std::env::args().nth(1).unwrap();
    let files: Vec<_> = std::env::args().skip(2).collect();

    // read each input file into a flat list of lines
    let mut lines = vec![];
    for filename in files {
        let mut file = File::open(&filename).map_err(|e| {
            eprintln!("cannot open {}", filename);
            e
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            eprintln!("cannot read {}", filename);
            e
        })?;
        lines.extend(contents.lines().map(str::to_string));
    }

    let output = match mode.as_str() {
        "seq" => {
            let mut shuffle = LocalShuffle::new();
            run(&mut shuffle, lines)
        }
        "par" => {
            let scratch = tempfile::tempdir()?;
            run_partitioned(lines, PartitionOpts::default(), scratch.path()).await?
        }
        other => {
            eprintln!("Invalid mode {}, expected seq or par.", other);
            return Err("1".into());
        }
    };

    let mut outf = File::create("mr-out-0").map_err(|e| {
        eprintln!("cannot create mr-out-0");
        e
    })?;
    for result in &output.results {
        writeln!(outf, "{}", result.to_output_line())?;
    }

    tracing::info!(
        results = output.results.len(),
        malformed_lines = output.stats.malformed_lines,
        insufficient_keys = output.stats.insufficient_keys,
        ambiguous_keys = output.stats.ambiguous_keys,
        "run complete"
    );

    Ok(())
}
