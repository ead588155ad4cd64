#![warn(missing_docs)]
//! The `treeshape` binary is a command line tool, using the `[treeshape]` crate.
//! It is made to enumerate tree shapes and compute their balance indices and
//! probabilities directly in the terminal.

use std::{fmt::Display, io, process};

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::ProgressIterator;
use itertools::Itertools;
use rand::{rngs::StdRng, SeedableRng};
use treeshape::{
    default_generator,
    extremal::BalanceIndex,
    models::{
        alpha_gamma::{alpha_gamma, sample_alpha_gamma},
        evaluate, total_probability,
        yule::{sample_yule, yule},
    },
    Shape, Tree,
};

/// contains the struct representing the command line arguments
/// parsed by [`clap`] and used to execute this binary
pub mod cli;

type Error = Box<dyn std::error::Error>;
type Result<T> = std::result::Result<T, Error>;

fn to_repr<T, E>(res: std::result::Result<T, E>) -> String
where
    T: Display,
{
    res.map_or_else(|_| "-".into(), |v| format!("{v}"))
}

fn shapes(leaves: usize, binary: bool) -> Vec<Shape> {
    if binary {
        default_generator().all_binary_shapes(leaves).to_vec()
    } else {
        default_generator().all_shapes(leaves).to_vec()
    }
}

fn print_indices_header() {
    println!(
        "shape\tsackin\tcolless\tqcolless\tcophenetic\tquartet\tbquartet\tautomorphisms\tsymmetries\tdepth_variance\tliu"
    )
}

fn print_indices(shape: &Shape) {
    println!(
        "{shape}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        shape.sackin(),
        to_repr(shape.colless()),
        to_repr(shape.quadratic_colless()),
        shape.cophenetic(),
        shape.quartet_index(),
        to_repr(shape.binary_quartet_index()),
        shape.automorphisms(),
        shape.symmetries(),
        to_repr(shape.leaf_depth_variance().ok_or(())),
        shape.liu_balance(),
    )
}

fn extremal(index: BalanceIndex, from: usize, to: usize, min: bool, max: bool) -> Result<()> {
    if from > to {
        return Err(format!("The leaf range {from}..={to} is empty").into());
    }

    let lines = (from..to + 1)
        .progress()
        .map(|n| {
            let mut lines = vec![];
            let mut push = |kind: &str, shapes: Vec<Shape>| {
                for shape in shapes {
                    let value = to_repr(index.value(&shape));
                    lines.push(format!("{n}\t{kind}\t{value}\t{shape}"));
                }
            };
            if min {
                push("min", index.minimal_shapes(n));
            }
            if max {
                push("max", index.maximal_shapes(n));
            }
            lines
        })
        .collect_vec();

    println!("leaves\textremum\tvalue\tshape");
    for line in lines.into_iter().flatten() {
        println!("{line}");
    }

    Ok(())
}

fn run(command: cli::Commands) -> Result<()> {
    match command {
        cli::Commands::Enumerate {
            leaves,
            binary,
            count,
        } => {
            let shapes = shapes(leaves, binary);
            if count {
                println!("{}", shapes.len());
            } else {
                for shape in shapes {
                    println!("{shape}");
                }
            }
        }
        cli::Commands::Indices { leaves, binary } => {
            print_indices_header();
            for shape in shapes(leaves, binary) {
                print_indices(&shape);
            }
        }
        cli::Commands::Extremal {
            index,
            leaves,
            from,
            min_only,
            max_only,
        } => extremal(index, from, leaves, !max_only, !min_only)?,
        cli::Commands::Yule { leaves } => {
            for (shape, probability) in yule(leaves).iter() {
                println!("{shape}\t{probability}");
            }
        }
        cli::Commands::AlphaGamma {
            leaves,
            alpha,
            gamma,
        } => {
            let outcomes = alpha_gamma(leaves);
            match (alpha, gamma) {
                (Some(alpha), Some(gamma)) => {
                    for (shape, value) in evaluate(&outcomes, &alpha, &gamma)? {
                        println!("{shape}\t{value}");
                    }
                }
                _ => {
                    for (shape, probability) in outcomes.iter() {
                        println!("{shape}\t{probability}");
                    }
                    eprintln!("Total probability: {}", total_probability(&outcomes));
                }
            }
        }
        cli::Commands::Sample {
            leaves,
            model,
            alpha,
            gamma,
            shapes,
            seed,
            print,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            for _ in 0..shapes {
                let shape = match model {
                    cli::Model::Yule => sample_yule(leaves, &mut rng)?,
                    cli::Model::AlphaGamma => sample_alpha_gamma(leaves, alpha, gamma, &mut rng)?,
                };
                if print {
                    Tree::from_shape(&shape).print()?;
                } else {
                    println!("{shape}");
                }
            }
        }
        cli::Commands::Completion { shell } => {
            let mut cmd = cli::Args::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run(cli::Args::parse().command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
