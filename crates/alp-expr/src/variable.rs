//! Decision variables held behind shared-ownership handles.
//!
//! A variable may be referenced by the objective, by many constraints, and
//! by several problems at once. Assigning its value or narrowing its bounds
//! must be visible through every holder, so the handle wraps shared interior
//! state and cloning never duplicates that state.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::expr::format::format_number;
use crate::ids::VariableId;

/// Name of the internal bookkeeping variable that is exempt from the
/// assigned-value feasibility rule.
pub const DUMMY_VARIABLE_NAME: &str = "__dummy";

/// Variable category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarCategory {
    Continuous,
    Integer,
    Binary,
}

impl VarCategory {
    /// Get the category label used in the variable section of LP output.
    pub fn as_str(self) -> &'static str {
        match self {
            VarCategory::Continuous => "Continuous",
            VarCategory::Integer => "Integer",
            VarCategory::Binary => "Binary",
        }
    }
}

impl fmt::Display for VarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug)]
struct VarInner {
    name: String,
    low_bound: Option<f64>,
    up_bound: Option<f64>,
    category: VarCategory,
    value: Option<f64>,
    dual: Option<f64>,
    low_original: Option<f64>,
    up_original: Option<f64>,
    modified: bool,
}

/// A named, bounded, categorized unknown.
///
/// `Variable` is a handle: cloning it yields another reference to the same
/// underlying state, so a value assigned after a solve is observable through
/// every expression and constraint that mentions the variable. Identity (the
/// [`VariableId`]) is allocated at construction and survives renames and
/// bound changes.
///
/// Constructing with [`VarCategory::Binary`] forces bounds to `[0, 1]` and
/// stores the category as `Integer`; binariness stays derivable through
/// [`Variable::is_binary`].
#[derive(Debug, Clone)]
pub struct Variable {
    id: VariableId,
    inner: Rc<RefCell<VarInner>>,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        low_bound: Option<f64>,
        up_bound: Option<f64>,
        category: VarCategory,
    ) -> Self {
        let (low_bound, up_bound, category) = match category {
            VarCategory::Binary => (Some(0.0), Some(1.0), VarCategory::Integer),
            _ => (low_bound, up_bound, category),
        };
        Self {
            id: VariableId::fresh(),
            inner: Rc::new(RefCell::new(VarInner {
                name: name.into(),
                low_bound,
                up_bound,
                category,
                value: None,
                dual: None,
                low_original: low_bound,
                up_original: up_bound,
                modified: true,
            })),
        }
    }

    /// Create a continuous variable with the given bounds.
    pub fn continuous(
        name: impl Into<String>,
        low_bound: Option<f64>,
        up_bound: Option<f64>,
    ) -> Self {
        Self::new(name, low_bound, up_bound, VarCategory::Continuous)
    }

    /// Create an integer variable with the given bounds.
    pub fn integer(
        name: impl Into<String>,
        low_bound: Option<f64>,
        up_bound: Option<f64>,
    ) -> Self {
        Self::new(name, low_bound, up_bound, VarCategory::Integer)
    }

    /// Create a binary variable: bounds `[0, 1]`, integer category.
    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, None, None, VarCategory::Binary)
    }

    /// Batch constructor: one variable per index, named `"{prefix}_{index}"`,
    /// keyed by the index rendering.
    pub fn dicts<I>(
        prefix: &str,
        indices: I,
        low_bound: Option<f64>,
        up_bound: Option<f64>,
        category: VarCategory,
    ) -> BTreeMap<String, Variable>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        indices
            .into_iter()
            .map(|index| {
                let key = index.to_string();
                let var = Variable::new(format!("{prefix}_{key}"), low_bound, up_bound, category);
                (key, var)
            })
            .collect()
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    pub fn category(&self) -> VarCategory {
        self.inner.borrow().category
    }

    pub fn lower_bound(&self) -> Option<f64> {
        self.inner.borrow().low_bound
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.inner.borrow().up_bound
    }

    /// The assigned value, if a solve (or the caller) has set one.
    pub fn value(&self) -> Option<f64> {
        self.inner.borrow().value
    }

    pub fn set_value(&self, value: f64) {
        self.inner.borrow_mut().value = Some(value);
    }

    pub fn clear_value(&self) {
        self.inner.borrow_mut().value = None;
    }

    /// Reduced cost reported by a solver backend.
    pub fn dual(&self) -> Option<f64> {
        self.inner.borrow().dual
    }

    pub fn set_dual(&self, dual: f64) {
        self.inner.borrow_mut().dual = Some(dual);
    }

    /// Whether bounds changed since the flag was last cleared. Backends use
    /// this to decide what to re-send on a warm re-solve.
    pub fn modified(&self) -> bool {
        self.inner.borrow().modified
    }

    pub fn set_modified(&self, modified: bool) {
        self.inner.borrow_mut().modified = modified;
    }

    // ── Predicates ──────────────────────────────────────────

    pub fn is_integer(&self) -> bool {
        self.category() == VarCategory::Integer
    }

    /// Integer category with bounds exactly `[0, 1]`.
    pub fn is_binary(&self) -> bool {
        let inner = self.inner.borrow();
        inner.category == VarCategory::Integer
            && inner.low_bound == Some(0.0)
            && inner.up_bound == Some(1.0)
    }

    pub fn is_free(&self) -> bool {
        let inner = self.inner.borrow();
        inner.low_bound.is_none() && inner.up_bound.is_none()
    }

    /// Both bounds set and equal.
    pub fn is_constant(&self) -> bool {
        let inner = self.inner.borrow();
        match (inner.low_bound, inner.up_bound) {
            (Some(low), Some(up)) => low == up,
            _ => false,
        }
    }

    // ── Bounds lifecycle ────────────────────────────────────

    /// Set both bounds and capture them as the restore point for
    /// [`Variable::unfix`].
    pub fn set_bounds(&self, low_bound: Option<f64>, up_bound: Option<f64>) {
        let mut inner = self.inner.borrow_mut();
        inner.low_bound = low_bound;
        inner.up_bound = up_bound;
        inner.low_original = low_bound;
        inner.up_original = up_bound;
        inner.modified = true;
    }

    /// Narrow both bounds to the assigned value, turning the variable into a
    /// constant. No-op when no value is assigned.
    pub fn fix(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(value) = inner.value {
            inner.low_bound = Some(value);
            inner.up_bound = Some(value);
            inner.modified = true;
        }
    }

    /// Restore the bounds captured at construction or at the last
    /// [`Variable::set_bounds`] call.
    pub fn unfix(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.low_bound = inner.low_original;
        inner.up_bound = inner.up_original;
        inner.modified = true;
    }

    // ── Evaluation ──────────────────────────────────────────

    /// The assigned value, or the feasible value closest to zero derived
    /// from the bounds.
    pub fn value_or_default(&self) -> f64 {
        let inner = self.inner.borrow();
        if let Some(value) = inner.value {
            return value;
        }
        match (inner.low_bound, inner.up_bound) {
            (Some(low), Some(up)) => {
                if low <= 0.0 && 0.0 <= up {
                    0.0
                } else if low >= 0.0 {
                    low
                } else {
                    up
                }
            }
            (Some(low), None) => {
                if low <= 0.0 {
                    0.0
                } else {
                    low
                }
            }
            (None, Some(up)) => {
                if 0.0 <= up {
                    0.0
                } else {
                    up
                }
            }
            (None, None) => 0.0,
        }
    }

    /// Whether the assigned value respects the bounds (and integrality, for
    /// integer variables) beyond the given tolerance.
    ///
    /// An unassigned variable is infeasible, except the `"__dummy"`
    /// bookkeeping variable, which is feasible even without a value.
    pub fn is_feasible(&self, tolerance: f64) -> bool {
        let inner = self.inner.borrow();
        let Some(value) = inner.value else {
            return inner.name == DUMMY_VARIABLE_NAME;
        };
        if let Some(up) = inner.up_bound {
            if value > up + tolerance {
                return false;
            }
        }
        if let Some(low) = inner.low_bound {
            if value < low - tolerance {
                return false;
            }
        }
        if inner.category == VarCategory::Integer && (value.round() - value).abs() > tolerance {
            return false;
        }
        true
    }

    /// For integer variables, the nearest integer when the assigned value is
    /// within tolerance of it; otherwise the raw value unchanged. Lossy by
    /// design: a fractional integer variable passes through as-is.
    pub fn rounded_value(&self, tolerance: f64) -> Option<f64> {
        let inner = self.inner.borrow();
        match inner.value {
            Some(value)
                if inner.category == VarCategory::Integer
                    && (value - value.round()).abs() <= tolerance =>
            {
                Some(value.round())
            }
            other => other,
        }
    }

    // ── Rendering ───────────────────────────────────────────

    /// The bound line for the `VARIABLES` section of LP output.
    pub fn render_bounds(&self) -> String {
        let inner = self.inner.borrow();
        if inner.low_bound.is_none() && inner.up_bound.is_none() {
            return format!("{} free", inner.name);
        }
        if let (Some(low), Some(up)) = (inner.low_bound, inner.up_bound) {
            if low == up {
                return format!("{} = {}", inner.name, format_number(low));
            }
        }
        let mut rendered = match inner.low_bound {
            None => "-inf <= ".to_string(),
            Some(low) if low == 0.0 && inner.category == VarCategory::Continuous => String::new(),
            Some(low) => format!("{} <= ", format_number(low)),
        };
        rendered.push_str(&inner.name);
        if let Some(up) = inner.up_bound {
            rendered.push_str(&format!(" <= {}", format_number(up)));
        }
        rendered
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.borrow().name)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::{DUMMY_VARIABLE_NAME, VarCategory, Variable};

    #[test]
    fn construction_stores_bounds_and_category() {
        let x = Variable::new("x", Some(0.0), Some(4.0), VarCategory::Continuous);
        assert_eq!(x.name(), "x");
        assert_eq!(x.lower_bound(), Some(0.0));
        assert_eq!(x.upper_bound(), Some(4.0));
        assert_eq!(x.category(), VarCategory::Continuous);
        assert_eq!(x.value(), None);
    }

    #[test]
    fn binary_becomes_bounded_integer() {
        let b = Variable::binary("b");
        assert_eq!(b.category(), VarCategory::Integer);
        assert_eq!(b.lower_bound(), Some(0.0));
        assert_eq!(b.upper_bound(), Some(1.0));
        assert!(b.is_binary());
    }

    #[test]
    fn binary_ignores_explicit_bounds() {
        let b = Variable::new("b", Some(-3.0), Some(7.0), VarCategory::Binary);
        assert_eq!(b.lower_bound(), Some(0.0));
        assert_eq!(b.upper_bound(), Some(1.0));
    }

    #[test]
    fn free_and_constant_predicates() {
        let free = Variable::continuous("free", None, None);
        assert!(free.is_free());
        assert!(!free.is_constant());

        let fixed = Variable::continuous("fixed", Some(3.0), Some(3.0));
        assert!(fixed.is_constant());
        assert!(!fixed.is_free());

        let half = Variable::continuous("half", Some(0.0), None);
        assert!(!half.is_free());
        assert!(!half.is_constant());
    }

    #[test]
    fn clone_shares_state() {
        let x = Variable::continuous("x", Some(0.0), Some(4.0));
        let alias = x.clone();
        alias.set_value(2.5);
        assert_eq!(x.value(), Some(2.5));
        assert_eq!(x.id(), alias.id());
        assert_eq!(x, alias);
    }

    #[test]
    fn distinct_variables_may_share_a_name() {
        let a = Variable::continuous("x", None, None);
        let b = Variable::continuous("x", None, None);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn dicts_builds_suffixed_names() {
        let vars = Variable::dicts("x", [1, 2, 3], Some(0.0), None, VarCategory::Continuous);
        assert_eq!(vars.len(), 3);
        assert_eq!(vars["1"].name(), "x_1");
        assert_eq!(vars["3"].name(), "x_3");
    }

    #[test]
    fn value_or_default_prefers_zero_inside_bounds() {
        let v = Variable::continuous("v", Some(-1.0), Some(1.0));
        assert_eq!(v.value_or_default(), 0.0);
    }

    #[test]
    fn value_or_default_picks_nearer_bound() {
        assert_eq!(
            Variable::continuous("lo", Some(2.0), Some(5.0)).value_or_default(),
            2.0
        );
        assert_eq!(
            Variable::continuous("hi", Some(-5.0), Some(-2.0)).value_or_default(),
            -2.0
        );
        assert_eq!(
            Variable::continuous("onelow", Some(3.0), None).value_or_default(),
            3.0
        );
        assert_eq!(
            Variable::continuous("oneup", None, Some(-4.0)).value_or_default(),
            -4.0
        );
        assert_eq!(
            Variable::continuous("none", None, None).value_or_default(),
            0.0
        );
    }

    #[test]
    fn value_or_default_returns_assigned_value() {
        let v = Variable::continuous("v", Some(2.0), Some(5.0));
        v.set_value(4.5);
        assert_eq!(v.value_or_default(), 4.5);
    }

    #[test]
    fn fix_and_unfix_round_trip() {
        let v = Variable::continuous("v", Some(0.0), Some(10.0));
        v.set_value(5.0);
        v.fix();
        assert_eq!(v.lower_bound(), Some(5.0));
        assert_eq!(v.upper_bound(), Some(5.0));
        assert!(v.is_constant());
        v.unfix();
        assert_eq!(v.lower_bound(), Some(0.0));
        assert_eq!(v.upper_bound(), Some(10.0));
    }

    #[test]
    fn unfix_restores_last_explicit_bounds() {
        let v = Variable::continuous("v", Some(0.0), Some(10.0));
        v.set_bounds(Some(1.0), Some(9.0));
        v.set_value(4.0);
        v.fix();
        v.unfix();
        assert_eq!(v.lower_bound(), Some(1.0));
        assert_eq!(v.upper_bound(), Some(9.0));
    }

    #[test]
    fn feasibility_checks_bounds_and_integrality() {
        let v = Variable::continuous("v", Some(0.0), Some(4.0));
        assert!(!v.is_feasible(1e-7));
        v.set_value(3.0);
        assert!(v.is_feasible(1e-7));
        v.set_value(4.1);
        assert!(!v.is_feasible(1e-7));
        v.set_value(-0.1);
        assert!(!v.is_feasible(1e-7));

        let i = Variable::integer("i", Some(0.0), Some(10.0));
        i.set_value(3.5);
        assert!(!i.is_feasible(1e-7));
        i.set_value(3.0000000001);
        assert!(i.is_feasible(1e-7));
    }

    #[test]
    fn dummy_variable_is_feasible_unassigned() {
        let dummy = Variable::continuous(DUMMY_VARIABLE_NAME, None, None);
        assert!(dummy.is_feasible(1e-7));

        let plain = Variable::continuous("plain", None, None);
        assert!(!plain.is_feasible(1e-7));
    }

    #[test]
    fn rounded_value_snaps_near_integers_only() {
        let i = Variable::integer("i", Some(0.0), Some(10.0));
        i.set_value(4.9999999);
        assert_eq!(i.rounded_value(1e-5), Some(5.0));
        i.set_value(4.5);
        assert_eq!(i.rounded_value(1e-5), Some(4.5));

        let c = Variable::continuous("c", Some(0.0), Some(10.0));
        c.set_value(4.9999999);
        assert_eq!(c.rounded_value(1e-5), Some(4.9999999));
    }

    #[test]
    fn render_bounds_variants() {
        assert_eq!(
            Variable::continuous("xfr", None, None).render_bounds(),
            "xfr free"
        );
        assert_eq!(
            Variable::continuous("xcx", Some(3.0), Some(3.0)).render_bounds(),
            "xcx = 3"
        );
        assert_eq!(
            Variable::continuous("xf", Some(0.0), Some(4.0)).render_bounds(),
            "xf <= 4"
        );
        assert_eq!(
            Variable::continuous("xlo", Some(-5.0), None).render_bounds(),
            "-5 <= xlo"
        );
        assert_eq!(
            Variable::continuous("xup", None, Some(2.0)).render_bounds(),
            "-inf <= xup <= 2"
        );
        assert_eq!(
            Variable::integer("xi", Some(0.0), Some(4.0)).render_bounds(),
            "0 <= xi <= 4"
        );
    }
}
