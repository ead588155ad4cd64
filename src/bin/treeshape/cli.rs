use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use num_rational::BigRational;

use treeshape::extremal::BalanceIndex;

/// A simple command line tool to enumerate and study unlabeled tree shapes
#[derive(Parser, Debug)]
pub struct Args {
    #[command(subcommand)]
    /// The command to execute
    pub command: Commands,
}

/// Stochastic models that can be simulated
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Model {
    /// Every leaf is equally likely to split
    Yule,
    /// Leaves, edges and nodes are chosen according to the α and γ parameters
    AlphaGamma,
}

/// The available commands in the `treeshape` tool
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every shape with a given number of leaves
    Enumerate {
        /// Number of leaves
        leaves: usize,
        /// Only list binary shapes
        #[arg(short, long)]
        binary: bool,
        /// Only print the number of shapes
        #[arg(short, long)]
        count: bool,
    },

    /// Compute balance indices for every shape with a given number of leaves
    ///
    /// This will output, for each shape:
    ///  - the Sackin index
    ///  - the Colless and quadratic Colless indices (binary shapes only)
    ///  - the total cophenetic index
    ///  - the rooted quartet index and the binary quartet index (binary shapes only)
    ///  - the number of automorphisms and of symmetry vertices
    ///  - the variance of leaf depths
    ///  - the number of monomials of the Liu polynomial
    #[clap(verbatim_doc_comment)]
    Indices {
        /// Number of leaves
        leaves: usize,
        /// Only consider binary shapes
        #[arg(short, long)]
        binary: bool,
    },

    /// Find the shapes minimizing and maximizing a balance index
    Extremal {
        /// The balance index
        #[arg(value_enum)]
        index: BalanceIndex,
        /// Largest number of leaves
        leaves: usize,
        /// Smallest number of leaves
        #[arg(short, long, default_value_t = 1)]
        from: usize,
        /// Only output the minimal shapes
        #[arg(long, conflicts_with = "max_only")]
        min_only: bool,
        /// Only output the maximal shapes
        #[arg(long)]
        max_only: bool,
    },

    /// Exact probabilities of every shape under the Yule model
    Yule {
        /// Number of leaves
        leaves: usize,
    },

    /// Exact probabilities of every shape under the Alpha-Gamma model
    AlphaGamma {
        /// Number of leaves
        leaves: usize,
        /// Evaluate the probabilities at this value of α (e.g. 1/2)
        #[arg(short, long, requires = "gamma")]
        alpha: Option<BigRational>,
        /// Evaluate the probabilities at this value of γ (e.g. 1/4)
        #[arg(short, long, requires = "alpha")]
        gamma: Option<BigRational>,
    },

    /// Simulate random shapes
    Sample {
        /// Number of leaves
        leaves: usize,
        /// The stochastic model to simulate
        #[arg(value_enum, short, long, default_value_t = Model::Yule)]
        model: Model,
        /// Value of α for the Alpha-Gamma model
        #[arg(short, long, default_value_t = 0.5)]
        alpha: f64,
        /// Value of γ for the Alpha-Gamma model
        #[arg(short, long, default_value_t = 0.0)]
        gamma: f64,
        /// Number of shapes to sample
        #[arg(short = 'n', long, default_value_t = 1)]
        shapes: usize,
        /// Seed of the random number generator
        #[arg(short, long)]
        seed: Option<u64>,
        /// Draw the sampled trees instead of printing their shape
        /// (only for trees at most 1000 edges deep)
        #[arg(short, long)]
        print: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
