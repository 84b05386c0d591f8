//! Builder helpers for folding collections into a single expression.

use crate::expr::core::LinearExpr;
use crate::expr::error::ExprError;

/// Sum linear operands (variables, expressions, constants) into one
/// expression.
pub fn lp_sum<I>(items: I) -> LinearExpr
where
    I: IntoIterator,
    I::Item: Into<LinearExpr>,
{
    let mut total = LinearExpr::new();
    for item in items {
        total.add_expr(&item.into(), 1.0);
    }
    total
}

/// Elementwise dot product of linear operands with numeric weights.
///
/// Each operand is scaled by its paired weight and folded into the result;
/// a constant operand contributes `constant * weight` to the constant.
pub fn lp_dot<L, W>(operands: L, weights: W) -> Result<LinearExpr, ExprError>
where
    L: IntoIterator,
    L::Item: Into<LinearExpr>,
    W: IntoIterator<Item = f64>,
{
    let mut operands = operands.into_iter();
    let mut weights = weights.into_iter();
    let mut total = LinearExpr::new();
    loop {
        match (operands.next(), weights.next()) {
            (Some(operand), Some(weight)) => {
                total.add_expr(&(operand.into() * weight), 1.0);
            }
            (None, None) => return Ok(total),
            _ => return Err(ExprError::MismatchedLengths),
        }
    }
}
