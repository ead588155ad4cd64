#![warn(missing_docs)]
//! Unlabeled rooted tree shapes, as used to study the topology of phylogenetic trees.
//!
//! The crate provides:
//!  - A canonical [`Shape`](shape::Shape) type, totally ordered so that isomorphic
//!    shapes have equal canonical forms.
//!  - Generation of every shape with a given number of leaves ([`shape::generator`]).
//!  - Exact balance indices ([`balance`]) and the shapes that minimize or maximize
//!    them ([`extremal`]).
//!  - The Yule and Alpha-Gamma growth models ([`models`]) with the exact probability
//!    of every shape, symbolic in the model parameters ([`symbolic`]).
//!  - A labeled [`Tree`](tree::Tree) that converts to and from shapes ([`tree`]).
//!
//! ```
//! use treeshape::models::yule::yule;
//! use treeshape::shape::generator::comb;
//!
//! let outcomes = yule(4);
//! let (shape, probability) = &outcomes[0];
//!
//! assert_eq!(*shape, comb(4).unwrap());
//! assert_eq!(probability.to_string(), "2/3");
//! ```
//!
//! Enumerations, extremal solvers and models are memoized by leaf count. Each component
//! owns its cache and can be built with `new()` for an independent cache, the free
//! functions use the process-wide instances returned by the `default_*` functions.

use std::sync::OnceLock;

pub mod balance;
pub mod cache;
pub mod extremal;
pub mod models;
pub mod shape;
pub mod symbolic;
pub mod tree;

use extremal::{MinimumColless, MinimumSackin};
use models::{alpha_gamma::AlphaGammaModel, yule::YuleModel};
use shape::generator::ShapeGenerator;

pub use shape::{Count, Shape, ShapeError};
pub use tree::{Node, Tree, TreeError};

/// The process-wide shape generator
pub fn default_generator() -> &'static ShapeGenerator {
    static GENERATOR: OnceLock<ShapeGenerator> = OnceLock::new();
    GENERATOR.get_or_init(ShapeGenerator::new)
}

/// The process-wide minimum Colless solver
pub fn default_min_colless() -> &'static MinimumColless {
    static SOLVER: OnceLock<MinimumColless> = OnceLock::new();
    SOLVER.get_or_init(MinimumColless::new)
}

/// The process-wide minimum Sackin solver
pub fn default_min_sackin() -> &'static MinimumSackin {
    static SOLVER: OnceLock<MinimumSackin> = OnceLock::new();
    SOLVER.get_or_init(MinimumSackin::new)
}

/// The process-wide Yule model
pub fn default_yule() -> &'static YuleModel {
    static MODEL: OnceLock<YuleModel> = OnceLock::new();
    MODEL.get_or_init(YuleModel::new)
}

/// The process-wide Alpha-Gamma model
pub fn default_alpha_gamma() -> &'static AlphaGammaModel {
    static MODEL: OnceLock<AlphaGammaModel> = OnceLock::new();
    MODEL.get_or_init(AlphaGammaModel::new)
}
