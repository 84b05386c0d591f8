//! Problem assembly: objective, constraint registry, variable registry.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use alp_expr::{Constraint, LinearExpr, Variable, VariableId};

use crate::solver::{DefaultSolver, Solver, SolverError, SolverStatus};
use crate::types::{Sense, SolutionStatus};

/// A linear or mixed-integer program under assembly.
///
/// Holds an optional objective, a name-keyed constraint registry (insertion
/// order preserved, names unique), and solve-status fields. The variable
/// registry is derived on demand from the objective and constraints, never
/// maintained incrementally.
#[derive(Debug, Clone)]
pub struct Problem {
    name: String,
    sense: Sense,
    objective: Option<LinearExpr>,
    constraints: Vec<(String, Constraint)>,
    status: SolverStatus,
    solution_status: SolutionStatus,
    last_unused: u64,
}

impl Problem {
    /// Create an empty problem. Spaces in the name become underscores so
    /// the name is usable as an LP file header.
    pub fn new(name: &str, sense: Sense) -> Self {
        Self {
            name: name.replace(' ', "_"),
            sense,
            objective: None,
            constraints: Vec::new(),
            status: SolverStatus::NotSolved,
            solution_status: SolutionStatus::NoSolutionFound,
            last_unused: 0,
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn objective(&self) -> Option<&LinearExpr> {
        self.objective.as_ref()
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    pub fn solution_status(&self) -> SolutionStatus {
        self.solution_status
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Registered constraints in insertion order.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints
            .iter()
            .map(|(name, constraint)| (name.as_str(), constraint))
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find_map(|(cname, constraint)| (cname == name).then_some(constraint))
    }

    // ── Assembly ────────────────────────────────────────────

    /// Set the objective expression. A bare variable registers as a unit
    /// expression.
    pub fn set_objective(&mut self, objective: impl Into<LinearExpr>) {
        let objective = objective.into();
        tracing::debug!(
            component = "problem",
            operation = "set_objective",
            status = "success",
            terms = objective.num_terms(),
            "Set objective expression"
        );
        self.objective = Some(objective);
    }

    /// Register a constraint under `name`, the constraint's own name, or an
    /// auto-generated `_C<n>`, replacing any prior constraint with the same
    /// name in place.
    pub fn add_constraint(&mut self, mut constraint: Constraint, name: Option<&str>) {
        if let Some(name) = name {
            constraint.set_name(name);
        }
        let cname = match constraint.name() {
            Some(existing) => existing.to_string(),
            None => self.unused_constraint_name(),
        };
        tracing::debug!(
            component = "problem",
            operation = "add_constraint",
            status = "success",
            name = %cname,
            terms = constraint.expr().num_terms(),
            "Registered constraint"
        );
        match self.constraints.iter_mut().find(|(n, _)| *n == cname) {
            Some(slot) => slot.1 = constraint,
            None => self.constraints.push((cname, constraint)),
        }
    }

    /// Remove and return the constraint registered under `name`. Auto-name
    /// counters are never rewound by removal.
    pub fn remove_constraint(&mut self, name: &str) -> Option<Constraint> {
        let index = self.constraints.iter().position(|(n, _)| n == name)?;
        Some(self.constraints.remove(index).1)
    }

    /// Smallest unused `_C<n>` name, scanning up from the last counter
    /// value. Once issued, an `n` is never reused.
    fn unused_constraint_name(&mut self) -> String {
        self.last_unused += 1;
        loop {
            let candidate = format!("_C{}", self.last_unused);
            if self.constraints.iter().all(|(n, _)| *n != candidate) {
                return candidate;
            }
            self.last_unused += 1;
        }
    }

    // ── Derived state ───────────────────────────────────────

    /// The deduplicated variable registry: every distinct variable identity
    /// from the objective and all constraints, sorted by display name
    /// (first-seen order on ties). Recomputed from scratch each call.
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen: HashSet<VariableId> = HashSet::new();
        let mut variables = Vec::new();
        if let Some(objective) = &self.objective {
            for term in objective.terms() {
                if seen.insert(term.var.id()) {
                    variables.push(term.var.clone());
                }
            }
        }
        for (_, constraint) in &self.constraints {
            for term in constraint.expr().terms() {
                if seen.insert(term.var.id()) {
                    variables.push(term.var.clone());
                }
            }
        }
        variables.sort_by(|a, b| a.name().cmp(&b.name()));
        variables
    }

    /// Whether any referenced variable has integer category.
    pub fn is_mip(&self) -> bool {
        self.variables().iter().any(Variable::is_integer)
    }

    // ── Solving ─────────────────────────────────────────────

    /// Solve with the given backend. The backend assigns variable values
    /// and solver-output fields; the resulting status is stored on the
    /// problem and returned.
    pub fn solve(&mut self, solver: &mut dyn Solver) -> Result<SolverStatus, SolverError> {
        let status = solver.actual_solve(self)?;
        self.status = status;
        self.solution_status = status.to_solution();
        tracing::debug!(
            component = "problem",
            operation = "solve",
            status = "success",
            result = status.as_str(),
            "Solve finished"
        );
        Ok(status)
    }

    /// Solve with the stub [`DefaultSolver`].
    pub fn solve_default(&mut self) -> Result<SolverStatus, SolverError> {
        let mut solver = DefaultSolver::new();
        self.solve(&mut solver)
    }

    // ── Output ──────────────────────────────────────────────

    /// Write the canonical LP dump to a file.
    pub fn write_lp(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string())?;
        tracing::debug!(
            component = "problem",
            operation = "write_lp",
            status = "success",
            path = %path.display(),
            "Wrote LP file"
        );
        Ok(())
    }
}
