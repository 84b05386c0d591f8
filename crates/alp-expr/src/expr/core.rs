//! Linear expressions: identity-keyed term algebra over shared variables.

use std::collections::BTreeMap;
use std::fmt;
use std::ops;

use crate::expr::constraint::{Constraint, ConstraintSense};
use crate::expr::format::format_number;
use crate::ids::VariableId;
use crate::variable::Variable;

/// A single (variable, coefficient) pair inside a [`LinearExpr`].
#[derive(Debug, Clone)]
pub struct Term {
    pub var: Variable,
    pub coeff: f64,
}

/// A constant plus coefficient-weighted variables.
///
/// Terms are keyed by variable identity, never by display name: adding a
/// term for an already-present variable accumulates its coefficient, and a
/// term whose coefficient nets to zero stays in the map with coefficient 0.
/// Cloning is shallow: the term map is duplicated, the variables it points
/// at are shared.
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    constant: f64,
    name: Option<String>,
    terms: BTreeMap<VariableId, Term>,
}

impl LinearExpr {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression: no terms, constant zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Self::default()
        }
    }

    /// A single variable with coefficient 1.
    pub fn from_variable(var: &Variable) -> Self {
        Self::term(var, 1.0)
    }

    /// A single term: `coeff * var`. Kept even when `coeff` is zero.
    pub fn term(var: &Variable, coeff: f64) -> Self {
        let mut expr = Self::default();
        expr.add_term(var, coeff);
        expr
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn set_constant(&mut self, constant: f64) {
        self.constant = constant;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The accumulated coefficient for a variable, if it has a term.
    pub fn coefficient(&self, var: &Variable) -> Option<f64> {
        self.terms.get(&var.id()).map(|term| term.coeff)
    }

    /// No variable terms at all.
    pub fn is_numeric_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Exactly one term, zero constant, coefficient 1.
    pub fn is_atomic(&self) -> bool {
        self.terms.len() == 1
            && self.constant == 0.0
            && self
                .terms
                .values()
                .next()
                .is_some_and(|term| (term.coeff - 1.0).abs() < 1e-10)
    }

    /// The variable of the single term, when one exists.
    pub fn atom(&self) -> Option<Variable> {
        self.terms.values().next().map(|term| term.var.clone())
    }

    // ── Term algebra ────────────────────────────────────────

    /// Accumulate `coeff` onto the term for `var`, inserting it if absent.
    pub fn add_term(&mut self, var: &Variable, coeff: f64) {
        self.terms
            .entry(var.id())
            .and_modify(|term| term.coeff += coeff)
            .or_insert_with(|| Term {
                var: var.clone(),
                coeff,
            });
    }

    /// Fold a scalar into the constant, scaled by `sign`.
    pub fn add_scalar(&mut self, value: f64, sign: f64) {
        self.constant += value * sign;
    }

    /// Fold a variable in as a unit term, scaled by `sign`.
    pub fn add_variable(&mut self, var: &Variable, sign: f64) {
        self.add_term(var, sign);
    }

    /// Fold another expression in, every term and the constant scaled by
    /// `sign`. Subtraction is `sign = -1.0`.
    pub fn add_expr(&mut self, other: &LinearExpr, sign: f64) {
        self.constant += other.constant * sign;
        for term in other.terms.values() {
            self.add_term(&term.var, term.coeff * sign);
        }
    }

    /// Every coefficient and the constant scaled by `by`. Terms are kept
    /// even when scaling lands them on zero.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            constant: self.constant * by,
            name: None,
            terms: self
                .terms
                .iter()
                .map(|(id, term)| {
                    (
                        *id,
                        Term {
                            var: term.var.clone(),
                            coeff: term.coeff * by,
                        },
                    )
                })
                .collect(),
        }
    }

    // ── Comparison builders ─────────────────────────────────

    pub fn le_scalar(&self, rhs: f64) -> Constraint {
        Constraint::with_rhs(self.clone(), ConstraintSense::Le, rhs)
    }

    pub fn ge_scalar(&self, rhs: f64) -> Constraint {
        Constraint::with_rhs(self.clone(), ConstraintSense::Ge, rhs)
    }

    pub fn eq_scalar(&self, rhs: f64) -> Constraint {
        Constraint::with_rhs(self.clone(), ConstraintSense::Eq, rhs)
    }

    pub fn le_expr(&self, other: impl Into<LinearExpr>) -> Constraint {
        Constraint::new(self.difference(other), ConstraintSense::Le)
    }

    pub fn ge_expr(&self, other: impl Into<LinearExpr>) -> Constraint {
        Constraint::new(self.difference(other), ConstraintSense::Ge)
    }

    pub fn eq_expr(&self, other: impl Into<LinearExpr>) -> Constraint {
        Constraint::new(self.difference(other), ConstraintSense::Eq)
    }

    fn difference(&self, other: impl Into<LinearExpr>) -> LinearExpr {
        let mut diff = self.clone();
        diff.add_expr(&other.into(), -1.0);
        diff
    }

    // ── Evaluation ──────────────────────────────────────────

    /// Constant plus `coeff * value` over all terms, or `None` when any
    /// referenced variable has no assigned value.
    pub fn value(&self) -> Option<f64> {
        let mut total = self.constant;
        for term in self.terms.values() {
            total += term.var.value()? * term.coeff;
        }
        Some(total)
    }

    /// Like [`LinearExpr::value`], substituting each unassigned variable's
    /// bound-derived default.
    pub fn value_or_default(&self) -> f64 {
        let mut total = self.constant;
        for term in self.terms.values() {
            total += term.var.value_or_default() * term.coeff;
        }
        total
    }

    // ── Rendering ───────────────────────────────────────────

    /// Terms ordered by variable display name (identity order on ties).
    pub fn sorted_terms(&self) -> Vec<&Term> {
        let mut terms: Vec<&Term> = self.terms.values().collect();
        terms.sort_by(|a, b| a.var.name().cmp(&b.var.name()));
        terms
    }

    /// Canonical single-line rendering.
    ///
    /// Terms sort by variable name; the leading term carries no separator
    /// and later terms embed `" + "`/`" - "` with a negative coefficient's
    /// sign folded into the separator. A coefficient of exactly 1 prints as
    /// the bare variable name, anything else as `<coeff>*<name>`. When
    /// requested, the constant (or `override_constant` in its place) is
    /// appended under the same sign rule; with no terms the rendering is the
    /// constant alone, or `"0"` when the constant is suppressed.
    pub fn format_terms(&self, include_constant: bool, override_constant: Option<f64>) -> String {
        let mut rendered = String::new();
        for term in self.sorted_terms() {
            let mut coeff = term.coeff;
            if coeff < 0.0 {
                rendered.push_str(if rendered.is_empty() { "-" } else { " - " });
                coeff = -coeff;
            } else if !rendered.is_empty() {
                rendered.push_str(" + ");
            }
            if coeff == 1.0 {
                rendered.push_str(&term.var.name());
            } else {
                rendered.push_str(&format!("{}*{}", format_number(coeff), term.var.name()));
            }
        }
        if include_constant {
            let constant = override_constant.unwrap_or(self.constant);
            if rendered.is_empty() {
                return format_number(constant);
            }
            if constant < 0.0 {
                rendered.push_str(&format!(" - {}", format_number(-constant)));
            } else if constant > 0.0 {
                rendered.push_str(&format!(" + {}", format_number(constant)));
            }
        } else if rendered.is_empty() {
            rendered.push('0');
        }
        rendered
    }
}

impl fmt::Display for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_terms(true, None))
    }
}

// ── Conversions ─────────────────────────────────────────────

impl From<&Variable> for LinearExpr {
    fn from(var: &Variable) -> Self {
        LinearExpr::from_variable(var)
    }
}

impl From<Variable> for LinearExpr {
    fn from(var: Variable) -> Self {
        LinearExpr::from_variable(&var)
    }
}

impl From<f64> for LinearExpr {
    fn from(constant: f64) -> Self {
        LinearExpr::from_constant(constant)
    }
}

impl From<&LinearExpr> for LinearExpr {
    fn from(expr: &LinearExpr) -> Self {
        expr.clone()
    }
}

// ── Operator overloads ──────────────────────────────────────

impl ops::Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> Self::Output {
        self.add_expr(&rhs, 1.0);
        self
    }
}

impl ops::Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: LinearExpr) -> Self::Output {
        self.add_expr(&rhs, -1.0);
        self
    }
}

impl ops::Add<&Variable> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: &Variable) -> Self::Output {
        self.add_variable(rhs, 1.0);
        self
    }
}

impl ops::Sub<&Variable> for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: &Variable) -> Self::Output {
        self.add_variable(rhs, -1.0);
        self
    }
}

impl ops::Add<f64> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: f64) -> Self::Output {
        self.add_scalar(rhs, 1.0);
        self
    }
}

impl ops::Sub<f64> for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: f64) -> Self::Output {
        self.add_scalar(rhs, -1.0);
        self
    }
}

impl ops::Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl ops::Div<f64> for LinearExpr {
    type Output = LinearExpr;

    fn div(self, rhs: f64) -> Self::Output {
        self.scale(1.0 / rhs)
    }
}

impl ops::Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

impl ops::Add<&Variable> for &Variable {
    type Output = LinearExpr;

    fn add(self, rhs: &Variable) -> Self::Output {
        LinearExpr::from_variable(self) + rhs
    }
}

impl ops::Sub<&Variable> for &Variable {
    type Output = LinearExpr;

    fn sub(self, rhs: &Variable) -> Self::Output {
        LinearExpr::from_variable(self) - rhs
    }
}

impl ops::Mul<&Variable> for f64 {
    type Output = LinearExpr;

    fn mul(self, rhs: &Variable) -> Self::Output {
        LinearExpr::term(rhs, self)
    }
}
