//! Solver abstraction and the default stub backend.
//!
//! This module defines the seam between problem assembly and the actual
//! optimization algorithm: the [`Solver`] trait, solver-agnostic status and
//! error types, and a [`DefaultSolver`] stub that stands in for a real
//! backend by assigning zero to every unassigned variable.

use crate::problem::Problem;
use crate::types::SolutionStatus;

/// Status of a problem after a solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    /// No solve has been attempted.
    NotSolved,
    /// Optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Solver finished without a usable classification.
    Undefined,
}

impl SolverStatus {
    /// Check if the status indicates an optimal solution.
    pub fn is_optimal(self) -> bool {
        matches!(self, SolverStatus::Optimal)
    }

    /// Check if the status indicates infeasibility.
    pub fn is_infeasible(self) -> bool {
        matches!(self, SolverStatus::Infeasible)
    }

    /// Check if the status indicates unboundedness.
    pub fn is_unbounded(self) -> bool {
        matches!(self, SolverStatus::Unbounded)
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::NotSolved => "Not Solved",
            SolverStatus::Optimal => "Optimal",
            SolverStatus::Infeasible => "Infeasible",
            SolverStatus::Unbounded => "Unbounded",
            SolverStatus::Undefined => "Undefined",
        }
    }

    /// The solution-level status a problem status maps to.
    pub fn to_solution(self) -> SolutionStatus {
        match self {
            SolverStatus::Optimal => SolutionStatus::Optimal,
            SolverStatus::Unbounded => SolutionStatus::Unbounded,
            SolverStatus::NotSolved | SolverStatus::Infeasible | SolverStatus::Undefined => {
                SolutionStatus::Infeasible
            }
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for solver operations.
#[derive(Debug, Clone)]
pub enum SolverError {
    /// Solver is not available (e.g., library not installed).
    NotAvailable(String),
    /// Solver failed to produce a solution.
    SolveFailure {
        /// The status that caused the failure.
        status: SolverStatus,
    },
    /// Backend-specific error not covered by other variants.
    Backend(String),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::NotAvailable(_) => "SOLVER_NOT_AVAILABLE",
            SolverError::SolveFailure { .. } => "SOLVER_SOLVE_FAILURE",
            SolverError::Backend(_) => "SOLVER_BACKEND",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::NotAvailable(name) => {
                write!(f, "[{}] Solver not available: {}", self.code(), name)
            }
            SolverError::SolveFailure { status } => {
                write!(f, "[{}] Solve failed with status: {}", self.code(), status)
            }
            SolverError::Backend(msg) => {
                write!(f, "[{}] Solver error: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for SolverError {}

/// Configuration options for solver behavior.
///
/// A unified way to pass parameters across backends; `None` leaves the
/// backend default in place.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Time limit in seconds.
    pub time_limit: Option<f64>,
    /// Relative MIP gap tolerance.
    pub mip_gap: Option<f64>,
    /// Feasibility tolerance.
    pub tolerance: Option<f64>,
    /// Verbosity level.
    pub verbosity: Option<u32>,
    /// Log solver output to console.
    pub log_to_console: Option<bool>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the relative MIP gap tolerance.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    /// Set the feasibility tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = Some(tol);
        self
    }

    /// Set the verbosity level.
    pub fn with_verbosity(mut self, level: u32) -> Self {
        self.verbosity = Some(level);
        self
    }

    /// Enable or disable console logging.
    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.mip_gap.is_none()
            && self.tolerance.is_none()
            && self.verbosity.is_none()
            && self.log_to_console.is_none()
    }
}

/// Trait that all solver backends must implement.
///
/// A backend reads the problem's variable registry, assigns each variable's
/// value (and, when it can, duals and slacks), and returns the resulting
/// status.
pub trait Solver {
    fn actual_solve(&mut self, problem: &mut Problem) -> Result<SolverStatus, SolverError>;
}

/// Stub backend: assigns zero to every unassigned variable and reports
/// success. Stands in for a real LP/MIP backend.
#[derive(Debug, Clone, Default)]
pub struct DefaultSolver {
    config: SolverConfig,
}

impl DefaultSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl Solver for DefaultSolver {
    fn actual_solve(&mut self, problem: &mut Problem) -> Result<SolverStatus, SolverError> {
        let variables = problem.variables();
        for var in &variables {
            if var.value().is_none() {
                var.set_value(0.0);
            }
        }
        tracing::debug!(
            component = "solver",
            operation = "actual_solve",
            status = "success",
            backend = "default",
            variables = variables.len(),
            "Assigned stub solution"
        );
        Ok(SolverStatus::Optimal)
    }
}
