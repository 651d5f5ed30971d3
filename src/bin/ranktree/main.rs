#![warn(missing_docs)]
//! The `ranktree` binary is a command line tool, using the [`ranktree`] crate.
//! It ranks, unranks, enumerates and samples unordered leaf-labelled trees.

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::{ProgressBar, ProgressIterator};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::{rngs::StdRng, thread_rng, RngCore, SeedableRng};
use ranktree::{num_shapes, random_tree, Rank, RankTree};
use std::{
    error::Error,
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// contains the struct representing the command line arguments
/// parsed by [`clap`] and used to execute this binary
pub mod cli;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ranktree={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn writer(output: Option<PathBuf>) -> Result<BufWriter<Box<dyn Write>>> {
    Ok(BufWriter::new(match output {
        Some(path) => Box::new(File::create(path)?) as Box<dyn Write>,
        None => Box::new(io::stdout()) as Box<dyn Write>,
    }))
}

/// Progress bar over `total` items, hidden if the total doesn't fit in a `u64`
fn progress_bar(total: &BigUint) -> ProgressBar {
    match total.to_u64() {
        Some(len) => ProgressBar::new(len),
        None => ProgressBar::hidden(),
    }
}

fn run(command: cli::Commands) -> Result<()> {
    match command {
        cli::Commands::Count { leaves, labelled } => {
            if labelled {
                println!("leaves\tshapes\tlabelled");
            } else {
                println!("leaves\tshapes");
            }
            for n in (1..leaves + 1).progress() {
                let shapes = num_shapes(n);
                if labelled {
                    let total: BigUint = RankTree::all_shapes(n).map(|t| t.num_labellings()).sum();
                    println!("{n}\t{shapes}\t{total}");
                } else {
                    println!("{n}\t{shapes}");
                }
            }
        }
        cli::Commands::Rank { newick } => {
            let tree: RankTree = newick.parse()?;
            let rank = ranktree::rank(&tree.to_tree()?)?;
            println!("{}\t{}", rank.shape, rank.label);
        }
        cli::Commands::Unrank {
            shape,
            label,
            leaves,
            draw,
        } => {
            let tree = ranktree::unrank(&Rank { shape, label }, leaves)?;
            if draw {
                tree.print()?;
            } else {
                println!("{}", tree.to_newick()?);
            }
        }
        cli::Commands::Enumerate {
            leaves,
            shapes,
            output,
        } => {
            let mut writer = writer(output)?;
            let count = num_shapes(leaves);
            if shapes {
                for tree in RankTree::all_shapes(leaves).progress_with(progress_bar(&count)) {
                    writeln!(writer, "{}\t0\t{tree};", tree.shape_rank())?;
                }
            } else {
                let total: BigUint = RankTree::all_shapes(leaves)
                    .map(|t| t.num_labellings())
                    .sum();
                debug!(shapes = %count, trees = %total, "Enumerating labelled trees");
                for tree in RankTree::all_labelled_trees(leaves).progress_with(progress_bar(&total)) {
                    let rank = tree.rank()?;
                    writeln!(writer, "{}\t{}\t{tree};", rank.shape, rank.label)?;
                }
            }
            writer.flush()?;
        }
        cli::Commands::Sample {
            leaves,
            trees,
            seed,
            output,
        } => {
            let mut rng: Box<dyn RngCore> = match seed {
                Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
                None => Box::new(thread_rng()),
            };
            let mut writer = writer(output)?;
            for _ in (0..trees).progress() {
                let tree = random_tree(leaves, &mut *rng)?;
                let rank = tree.rank()?;
                writeln!(writer, "{}\t{}\t{tree};", rank.shape, rank.label)?;
            }
            writer.flush()?;
        }
        cli::Commands::Completion { shell } => {
            let mut cmd = cli::Args::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = cli::Args::parse();
    init_logging(args.verbose);

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
