//! Problem assembly with a canonical LP text writer and a pluggable solver
//! seam.
//!
//! - [`problem`]: the [`Problem`] container (objective, constraint registry,
//!   derived variable registry)
//! - [`writer`]: the fixed-width line-wrapping LP serializer
//! - [`solver`]: solver trait, status, error, config, and the default stub
//! - [`types`]: optimization sense and solution status

pub mod problem;
pub mod solver;
pub mod types;
pub mod writer;

pub use problem::Problem;
pub use solver::{DefaultSolver, Solver, SolverConfig, SolverError, SolverStatus};
pub use types::{EPS, Sense, SolutionStatus};
pub use writer::{
    LP_LINE_WIDTH, render_constraint, render_constraint_expression, render_expression,
};
