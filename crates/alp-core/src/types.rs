//! Core model types shared across the problem and solver layers.

/// Default feasibility tolerance.
pub const EPS: f64 = 1e-7;

/// Optimization sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "Minimize",
            Sense::Maximize => "Maximize",
        }
    }
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Solution-level status, finer-grained than the problem status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionStatus {
    /// No solution has been produced yet.
    NoSolutionFound,
    /// An optimal solution was found.
    Optimal,
    /// An integer-feasible (not proven optimal) solution was found.
    IntegerFeasible,
    /// No solution exists.
    Infeasible,
    /// The solution is unbounded.
    Unbounded,
}

impl SolutionStatus {
    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::NoSolutionFound => "No Solution Found",
            SolutionStatus::Optimal => "Optimal Solution Found",
            SolutionStatus::IntegerFeasible => "Solution Found",
            SolutionStatus::Infeasible => "No Solution Exists",
            SolutionStatus::Unbounded => "Solution is Unbounded",
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Sense, SolutionStatus};

    #[test]
    fn sense_labels() {
        assert_eq!(Sense::Minimize.as_str(), "Minimize");
        assert_eq!(Sense::Maximize.as_str(), "Maximize");
    }

    #[test]
    fn solution_status_labels() {
        assert_eq!(SolutionStatus::NoSolutionFound.as_str(), "No Solution Found");
        assert_eq!(SolutionStatus::Optimal.as_str(), "Optimal Solution Found");
        assert_eq!(SolutionStatus::IntegerFeasible.as_str(), "Solution Found");
        assert_eq!(SolutionStatus::Infeasible.as_str(), "No Solution Exists");
        assert_eq!(SolutionStatus::Unbounded.as_str(), "Solution is Unbounded");
    }

    #[test]
    fn solution_status_display() {
        assert_eq!(
            format!("{}", SolutionStatus::Optimal),
            "Optimal Solution Found"
        );
    }
}
