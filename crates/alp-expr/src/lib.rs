pub mod expr;
pub mod ids;
pub mod variable;

pub use expr::{
    Constraint, ConstraintSense, ExprError, LinearExpr, Term, format_number, lp_dot, lp_sum,
};
pub use ids::VariableId;
pub use variable::{DUMMY_VARIABLE_NAME, VarCategory, Variable};
