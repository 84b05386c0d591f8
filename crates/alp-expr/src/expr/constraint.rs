//! Constraints: a linear expression held in `expr (<=|=|>=) 0` form.

use std::fmt;

use crate::expr::core::LinearExpr;
use crate::expr::format::format_number;
use crate::variable::Variable;

/// Relational sense, encoded as a signed code so that senses can be
/// multiplied for compatibility checks and merged by bitwise union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum ConstraintSense {
    Le = -1,
    Eq = 0,
    Ge = 1,
}

impl ConstraintSense {
    /// The signed code: -1, 0, or 1.
    pub fn code(self) -> i8 {
        self as i8
    }

    /// Sense for a merged code. Merging ORs the signed codes, so any
    /// negative result reads as `<=`.
    pub fn from_code(code: i8) -> Self {
        match code {
            c if c < 0 => ConstraintSense::Le,
            0 => ConstraintSense::Eq,
            _ => ConstraintSense::Ge,
        }
    }

    /// The relational symbol used in LP output.
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintSense::Le => "<=",
            ConstraintSense::Eq => "=",
            ConstraintSense::Ge => ">=",
        }
    }
}

/// A linear relation normalized against zero.
///
/// Built from `expression OP rhs`, the right-hand side is folded into the
/// stored constant so the relation is always `expr (<=|=|>=) 0`. The
/// constant lives on the constraint itself; bound accessors derive from it
/// and the sense rather than being stored.
#[derive(Debug, Clone)]
pub struct Constraint {
    expr: LinearExpr,
    constant: f64,
    sense: ConstraintSense,
    name: Option<String>,
    dual: Option<f64>,
    slack: Option<f64>,
    modified: bool,
}

impl Constraint {
    /// Constraint `expr (<=|=|>=) 0` with no separate right-hand side.
    pub fn new(expr: impl Into<LinearExpr>, sense: ConstraintSense) -> Self {
        Self::from_parts(expr.into(), sense, None)
    }

    /// Constraint `expr (<=|=|>=) rhs`: the right-hand side is subtracted
    /// into the stored constant.
    pub fn with_rhs(expr: impl Into<LinearExpr>, sense: ConstraintSense, rhs: f64) -> Self {
        Self::from_parts(expr.into(), sense, Some(rhs))
    }

    fn from_parts(expr: LinearExpr, sense: ConstraintSense, rhs: Option<f64>) -> Self {
        let mut constant = expr.constant();
        if let Some(rhs) = rhs {
            constant -= rhs;
        }
        Self {
            expr,
            constant,
            sense,
            name: None,
            dual: None,
            slack: None,
            modified: true,
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    /// The relation constant: `expr + constant (<=|=|>=) 0`.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn set_constant(&mut self, constant: f64) {
        self.constant = constant;
    }

    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Shadow price reported by a solver backend.
    pub fn dual(&self) -> Option<f64> {
        self.dual
    }

    pub fn set_dual(&mut self, dual: f64) {
        self.dual = Some(dual);
    }

    /// Slack reported by a solver backend.
    pub fn slack(&self) -> Option<f64> {
        self.slack
    }

    pub fn set_slack(&mut self, slack: f64) {
        self.slack = Some(slack);
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Derived lower bound: set for `>=` and `=` senses.
    pub fn lower_bound(&self) -> Option<f64> {
        match self.sense {
            ConstraintSense::Ge | ConstraintSense::Eq => Some(-self.constant),
            ConstraintSense::Le => None,
        }
    }

    /// Derived upper bound: set for `<=` and `=` senses.
    pub fn upper_bound(&self) -> Option<f64> {
        match self.sense {
            ConstraintSense::Le | ConstraintSense::Eq => Some(-self.constant),
            ConstraintSense::Ge => None,
        }
    }

    // ── Mutation ────────────────────────────────────────────

    /// Accumulate a term into the underlying expression.
    pub fn add_term(&mut self, var: &Variable, coeff: f64) {
        self.expr.add_term(var, coeff);
    }

    /// Fold another constraint in. Requires compatible senses (signed
    /// product non-negative); otherwise the operand's sign flips. The
    /// resulting sense is the bitwise union of both signed codes.
    pub fn add_constraint(&mut self, other: &Constraint, sign: f64) {
        let mut sign = sign;
        if i32::from(self.sense.code()) * i32::from(other.sense.code()) < 0 {
            sign = -sign;
        }
        self.constant += other.constant * sign;
        self.expr.add_expr(&other.expr, sign);
        let sense_sign: i8 = if sign < 0.0 { -1 } else { 1 };
        self.sense = ConstraintSense::from_code(self.sense.code() | (other.sense.code() * sense_sign));
    }

    /// Fold an expression in: constant and terms, scaled by `sign`.
    pub fn add_expr(&mut self, other: &LinearExpr, sign: f64) {
        self.constant += other.constant() * sign;
        self.expr.add_expr(other, sign);
    }

    /// Fold a variable in as a unit term, scaled by `sign`.
    pub fn add_variable(&mut self, var: &Variable, sign: f64) {
        self.expr.add_variable(var, sign);
    }

    /// Fold a scalar into the relation constant, scaled by `sign`.
    pub fn add_scalar(&mut self, value: f64, sign: f64) {
        self.constant += value * sign;
    }

    /// Replace the right-hand side: the constant becomes `-rhs` and the
    /// constraint is marked modified for solver re-use.
    pub fn change_rhs(&mut self, rhs: f64) {
        self.constant = -rhs;
        self.modified = true;
    }

    // ── Evaluation ──────────────────────────────────────────

    /// Relation constant plus the expression's term evaluation, or `None`
    /// when any referenced variable has no assigned value.
    pub fn value(&self) -> Option<f64> {
        let mut total = self.constant;
        for term in self.expr.terms() {
            total += term.var.value()? * term.coeff;
        }
        Some(total)
    }

    /// Whether the relation holds at the current assignment, within
    /// tolerance. Unknown values are never satisfied.
    pub fn is_satisfied(&self, tolerance: f64) -> bool {
        let Some(value) = self.value() else {
            return false;
        };
        match self.sense {
            ConstraintSense::Eq => value.abs() <= tolerance,
            _ => value * f64::from(self.sense.code()) >= -tolerance,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.expr.format_terms(false, None),
            self.sense.symbol(),
            format_number(-self.constant)
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::{Constraint, ConstraintSense};
    use crate::expr::core::LinearExpr;
    use crate::variable::Variable;

    fn x() -> Variable {
        Variable::continuous("x", Some(0.0), Some(4.0))
    }

    fn y() -> Variable {
        Variable::continuous("y", Some(-1.0), Some(1.0))
    }

    #[test]
    fn rhs_folds_into_the_constant() {
        let x = x();
        let y = y();
        let c = (&x + &y).le_scalar(5.0);
        assert_eq!(c.sense(), ConstraintSense::Le);
        assert_eq!(c.constant(), -5.0);
    }

    #[test]
    fn bounds_derive_from_sense_and_constant() {
        let x = x();
        let y = y();

        let le = (&x + &y).le_scalar(5.0);
        assert_eq!(le.upper_bound(), Some(5.0));
        assert_eq!(le.lower_bound(), None);

        let ge = (&x + &y).ge_scalar(10.0);
        assert_eq!(ge.lower_bound(), Some(10.0));
        assert_eq!(ge.upper_bound(), None);

        let eq = (&x - &y).eq_scalar(7.0);
        assert_eq!(eq.lower_bound(), Some(7.0));
        assert_eq!(eq.upper_bound(), Some(7.0));
    }

    #[test]
    fn comparison_against_expression_subtracts_sides() {
        let x = x();
        let y = y();
        let lhs = LinearExpr::term(&x, 1.0) + 3.0;
        let rhs = LinearExpr::term(&y, 1.0) + 7.0;
        let c = lhs.ge_expr(&rhs);
        assert_eq!(c.sense(), ConstraintSense::Ge);
        assert_eq!(c.constant(), -4.0);
        assert_eq!(c.expr().num_terms(), 2);
        assert_eq!(c.expr().coefficient(&y), Some(-1.0));
    }

    #[test]
    fn add_term_delegates_to_the_expression() {
        let x = x();
        let y = y();
        let mut c = Constraint::new(LinearExpr::new(), ConstraintSense::Le);
        c.add_term(&x, 1.0);
        c.add_term(&y, 1.0);
        c.set_constant(-2.0);
        assert_eq!(c.expr().num_terms(), 2);
        assert_eq!(c.upper_bound(), Some(2.0));
    }

    #[test]
    fn zero_coefficient_survives_add_then_subtract() {
        let x = x();
        let y = y();
        let z = Variable::continuous("z", Some(0.0), None);
        let base = (&x + &y).le_scalar(5.0);
        let mut c = base.clone();
        c.add_variable(&z, 1.0);
        c.add_variable(&z, -1.0);
        assert_eq!(c.expr().coefficient(&z), Some(0.0));
        assert!(!c.to_string().is_empty());
    }

    #[test]
    fn incompatible_senses_flip_the_operand() {
        let x = x();
        let le = LinearExpr::term(&x, 1.0).le_scalar(5.0);
        let ge = LinearExpr::term(&x, 1.0).ge_scalar(2.0);

        let mut merged = le.clone();
        merged.add_constraint(&ge, 1.0);
        // ge flips to -x <= -2; codes -1 | -1 stay <=.
        assert_eq!(merged.sense(), ConstraintSense::Le);
        assert_eq!(merged.constant(), -5.0 + 2.0);
        assert_eq!(merged.expr().coefficient(&x), Some(0.0));
    }

    #[test]
    fn equal_sense_merge_keeps_the_stronger_code() {
        let x = x();
        let eq = LinearExpr::term(&x, 1.0).eq_scalar(3.0);
        let ge = LinearExpr::term(&x, 2.0).ge_scalar(1.0);

        let mut merged = eq.clone();
        merged.add_constraint(&ge, 1.0);
        assert_eq!(merged.sense(), ConstraintSense::Ge);
        assert_eq!(merged.expr().coefficient(&x), Some(3.0));
        assert_eq!(merged.constant(), -4.0);
    }

    #[test]
    fn change_rhs_resets_the_constant() {
        let x = x();
        let mut c = LinearExpr::term(&x, 1.0).le_scalar(5.0);
        assert_eq!(c.constant(), -5.0);
        c.set_modified(false);
        c.change_rhs(10.0);
        assert_eq!(c.constant(), -10.0);
        assert_eq!(c.upper_bound(), Some(10.0));
        assert!(c.modified());
    }

    #[test]
    fn satisfaction_respects_sense_and_tolerance() {
        let x = x();
        let y = y();
        let c = (&x + &y).le_scalar(5.0);

        x.set_value(3.0);
        y.set_value(1.0);
        assert!(c.is_satisfied(0.0));

        x.set_value(4.0);
        y.set_value(2.0);
        assert!(!c.is_satisfied(0.0));

        let z = Variable::continuous("z", Some(0.0), None);
        let eq = (LinearExpr::term(&y, -1.0) + &z).eq_scalar(7.0);
        y.set_value(-1.0);
        z.set_value(6.0);
        assert!(eq.is_satisfied(1e-7));
    }

    #[test]
    fn unknown_value_is_never_satisfied() {
        let v = Variable::continuous("v", Some(0.0), None);
        let c = LinearExpr::term(&v, 1.0).le_scalar(5.0);
        assert_eq!(c.value(), None);
        assert!(!c.is_satisfied(1e-7));
    }

    #[test]
    fn display_moves_the_constant_to_the_right_hand_side() {
        let x = x();
        let y = y();
        let c = (&x + &y).le_scalar(10.0);
        assert_eq!(c.to_string(), "x + y <= 10");
    }

    #[test]
    fn display_of_empty_constraint_uses_zero() {
        let c = Constraint::with_rhs(LinearExpr::new(), ConstraintSense::Ge, 2.0);
        assert_eq!(c.to_string(), "0 >= 2");
    }
}
