use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use partfuse::partfuse_job::{Disposition, InProcessGenerator, JobRunner};
use partfuse::partfuse_mesh::MeshCodec;
use partfuse::partfuse_union::ConcatUnion;
use partfuse::Partfuse;

mod callback;
mod codec;
mod sandbox;
mod store;

use callback::LogCallback;
use codec::StlCodec;
use sandbox::SandboxedGenerator;
use store::FsStore;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory that stands in for the part/object store
    #[arg(long, default_value = "models")]
    store_root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one merged mesh from a graph description
    Generate {
        /// Inline JSON, or a path to a .json file
        metadata: String,
        /// Output STL path
        output: PathBuf,
    },
    /// Sandbox entry point: `generate` under an optional virtual-memory ceiling
    Unify {
        metadata: PathBuf,
        output: PathBuf,
        #[arg(long)]
        memory_limit_mb: Option<u64>,
    },
    /// Process newline-delimited job messages from a file, or stdin
    Consume {
        #[arg(long)]
        jobs: Option<PathBuf>,
        /// Ceiling for each job's unify subprocess
        #[arg(long)]
        memory_limit_mb: Option<u64>,
        /// Run generation inside this process instead of a subprocess
        #[arg(long, default_value_t = false)]
        in_process: bool,
    },
}

pub fn internal_main() -> Result<()> {
    let _partfuse = Partfuse::new("Partfuse Worker");
    let args = Args::parse();

    match args.command {
        Command::Generate { metadata, output } => {
            let metadata = load_metadata(&metadata)?;
            generate_to_file(&args.store_root, &metadata, &output)
        }
        Command::Unify {
            metadata,
            output,
            memory_limit_mb,
        } => {
            if let Some(limit) = memory_limit_mb {
                sandbox::install_memory_ceiling(limit)?;
            }
            let metadata = serde_json::from_slice(
                &fs::read(&metadata).with_context(|| format!("reading {}", metadata.display()))?,
            )?;
            generate_to_file(&args.store_root, &metadata, &output)
        }
        Command::Consume {
            jobs,
            memory_limit_mb,
            in_process,
        } => consume(&args.store_root, jobs, memory_limit_mb, in_process),
    }
}

/// First argument of `generate`, like the queue-free entry point of the
/// original service: a path when it ends in `.json`, inline JSON otherwise.
fn load_metadata(arg: &str) -> Result<serde_json::Value> {
    if arg.ends_with(".json") {
        let data = fs::read(arg).with_context(|| format!("reading {arg}"))?;
        Ok(serde_json::from_slice(&data)?)
    } else {
        Ok(serde_json::from_str(arg)?)
    }
}

fn generate_to_file(store_root: &Path, metadata: &serde_json::Value, output: &Path) -> Result<()> {
    use partfuse::partfuse_job::Generator;

    let mut generator =
        InProcessGenerator::new(FsStore::new(store_root), StlCodec, ConcatUnion::default());
    let mesh = generator.generate(metadata)?;

    let data = StlCodec.encode(&mesh)?;
    fs::write(output, data).with_context(|| format!("writing {}", output.display()))?;
    log::info!("mesh generated successfully: {}", output.display());
    Ok(())
}

fn consume(
    store_root: &Path,
    jobs: Option<PathBuf>,
    memory_limit_mb: Option<u64>,
    in_process: bool,
) -> Result<()> {
    let store = FsStore::new(store_root);
    let secret = std::env::var("PARTFUSE_SECRET").unwrap_or_default();

    let payloads: Vec<String> = match jobs {
        Some(path) => {
            let file = fs::File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            std::io::BufReader::new(file)
                .lines()
                .collect::<std::io::Result<_>>()?
        }
        None => std::io::stdin().lock().lines().collect::<std::io::Result<_>>()?,
    };

    let mut dispositions = Vec::new();
    if in_process {
        let generator = InProcessGenerator::new(store.clone(), StlCodec, ConcatUnion::default());
        let mut runner = JobRunner::new(generator, store, StlCodec, LogCallback, secret);
        run_all(&mut runner, &payloads, &mut dispositions);
    } else {
        let exe = std::env::current_exe().context("resolving worker executable")?;
        let generator =
            SandboxedGenerator::new(exe, store_root.to_path_buf(), memory_limit_mb);
        let mut runner = JobRunner::new(generator, store, StlCodec, LogCallback, secret);
        run_all(&mut runner, &payloads, &mut dispositions);
    }

    let acked = dispositions
        .iter()
        .filter(|disposition| **disposition == Disposition::Ack)
        .count();
    log::info!("processed {} jobs, {acked} acknowledged", dispositions.len());
    Ok(())
}

fn run_all<G, S, X, C>(
    runner: &mut JobRunner<G, S, X, C>,
    payloads: &[String],
    dispositions: &mut Vec<Disposition>,
) where
    G: partfuse::partfuse_job::Generator,
    S: partfuse::partfuse_job::ObjectStore,
    X: MeshCodec,
    C: partfuse::partfuse_job::CallbackClient,
{
    // One job at a time; each invocation owns all of its state.
    for payload in payloads {
        if payload.trim().is_empty() {
            continue;
        }
        dispositions.push(runner.process(payload.as_bytes()));
    }
}
