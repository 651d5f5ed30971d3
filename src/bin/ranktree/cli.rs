use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use num_bigint::BigUint;
use std::path::PathBuf;

/// A command line tool to rank, unrank, enumerate and sample unordered leaf-labelled trees
#[derive(Parser, Debug)]
#[command(name = "ranktree", version)]
pub struct Args {
    /// Increase logging verbosity (-v: debug, -vv: trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    /// The command to execute
    pub command: Commands,
}

/// The available commands in the `ranktree` tool
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count tree shapes and labelled trees up to a number of leaves
    Count {
        /// Largest number of leaves
        leaves: usize,
        /// Also count the labelled trees by summing the labellings of every shape
        #[arg(short, long)]
        labelled: bool,
    },

    /// Print the shape rank and label rank of a tree
    Rank {
        /// Newick string of the tree, leaves must be labelled 0..n
        newick: String,
    },

    /// Print the tree with a given rank
    Unrank {
        /// Shape rank of the tree
        shape: BigUint,
        /// Label rank of the tree
        label: BigUint,
        /// Number of leaves of the tree
        #[arg(short = 'n', long)]
        leaves: usize,
        /// Draw the tree in the terminal instead of printing a newick string
        #[arg(short, long)]
        draw: bool,
    },

    /// Output every tree with a given number of leaves, in rank order
    ///
    /// Each line holds the shape rank, the label rank and the newick
    /// string of a tree, separated by tabs.
    #[clap(verbatim_doc_comment)]
    Enumerate {
        /// Number of leaves
        leaves: usize,
        /// Only output unlabelled shapes
        #[arg(short, long)]
        shapes: bool,
        /// File to save the trees to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sample random trees, uniformly over shapes then over labellings
    Sample {
        /// Number of leaves
        leaves: usize,
        /// Number of trees to sample
        #[arg(short = 'n', long, default_value_t = 1)]
        trees: usize,
        /// Seed of the random number generator
        #[arg(short, long)]
        seed: Option<u64>,
        /// File to save the trees to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate the completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
