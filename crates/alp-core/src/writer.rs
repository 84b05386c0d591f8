//! Canonical fixed-width LP text rendering.
//!
//! Tokens arrive pre-formatted with their sign separators embedded, and a
//! greedy packer lays them onto lines under a fixed column budget. A single
//! token longer than the budget still goes out alone on its own line; the
//! guarantee is that no line exceeds the budget unless one token already
//! does.

use std::fmt;

use alp_expr::{Constraint, LinearExpr, format_number};

use crate::problem::Problem;
use crate::types::Sense;

/// Column budget for a rendered line.
pub const LP_LINE_WIDTH: usize = 78;

/// Greedy token packer. `push` appends a token to the current line unless
/// that would push the concatenated length past the budget, in which case
/// the line is flushed and the token starts a new one. The final line is
/// always flushed, even under budget.
#[derive(Debug)]
struct LineBuffer {
    lines: Vec<String>,
    current: String,
}

impl LineBuffer {
    fn new(head: String) -> Self {
        Self {
            lines: Vec::new(),
            current: head,
        }
    }

    fn push(&mut self, token: &str) {
        if self.current.len() + token.len() > LP_LINE_WIDTH {
            self.lines.push(std::mem::take(&mut self.current));
        }
        self.current.push_str(token);
    }

    fn finish(mut self) -> String {
        self.lines.push(self.current);
        let mut rendered = self.lines.join("\n");
        rendered.push('\n');
        rendered
    }
}

/// Pack an expression's term tokens under an entity name.
///
/// Each token's sign is computed independently: a negative coefficient gets
/// a leading `" -"` with its absolute value, a non-first positive term gets
/// `" +"`, the first term nothing. A coefficient of exactly 1 omits the
/// coefficient text; any other prints with fixed 12-decimal precision.
fn wrapped_terms(expr: &LinearExpr, name: &str) -> LineBuffer {
    let mut buffer = LineBuffer::new(format!("{name}:"));
    let mut first = true;
    for term in expr.sorted_terms() {
        let mut coeff = term.coeff;
        let sign = if coeff < 0.0 {
            coeff = -coeff;
            " -"
        } else if !first {
            " +"
        } else {
            ""
        };
        first = false;
        let token = if coeff == 1.0 {
            format!("{sign} {}", term.var.name())
        } else {
            format!("{sign} {coeff:.12} {}", term.var.name())
        };
        buffer.push(&token);
    }
    buffer
}

/// Render an expression as wrapped lines under `name`, optionally followed
/// by its constant (or `override_constant` in its place).
pub fn render_expression(
    expr: &LinearExpr,
    name: &str,
    include_constant: bool,
    override_constant: Option<f64>,
) -> String {
    let mut buffer = wrapped_terms(expr, name);
    if expr.num_terms() == 0 {
        buffer.push(" 0");
    } else if include_constant {
        let constant = override_constant.unwrap_or(expr.constant());
        if constant < 0.0 {
            buffer.push(&format!(" - {}", format_number(-constant)));
        } else if constant > 0.0 {
            buffer.push(&format!(" + {}", format_number(constant)));
        }
    }
    buffer.finish()
}

/// Render a constraint as wrapped lines under `name`: the expression's
/// terms, the sense symbol, and the negated constant as right-hand side.
pub fn render_constraint(constraint: &Constraint, name: &str) -> String {
    let mut buffer = wrapped_terms(constraint.expr(), name);
    if constraint.expr().num_terms() == 0 {
        buffer.push("0");
    }
    let rhs = -constraint.constant();
    buffer.push(&format!(
        " {} {}",
        constraint.sense().symbol(),
        format_number(rhs)
    ));
    buffer.finish()
}

/// Render a constraint's left-hand side as a plain wrapped expression,
/// using the relation constant in place of the expression's own.
pub fn render_constraint_expression(
    constraint: &Constraint,
    name: &str,
    include_constant: bool,
) -> String {
    render_expression(
        constraint.expr(),
        name,
        include_constant,
        Some(constraint.constant()),
    )
}

impl fmt::Display for Problem {
    /// The full canonical dump: name header, sense keyword, objective,
    /// constraint section, variable section.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name())?;
        writeln!(
            f,
            "{}",
            match self.sense() {
                Sense::Minimize => "MINIMIZE",
                Sense::Maximize => "MAXIMIZE",
            }
        )?;
        match self.objective() {
            Some(objective) => writeln!(f, "{objective}")?,
            None => writeln!(f, "0")?,
        }
        if self.num_constraints() > 0 {
            writeln!(f, "SUBJECT TO")?;
            for (name, constraint) in self.constraints() {
                write!(f, "{}", render_constraint(constraint, name))?;
            }
        }
        writeln!(f, "VARIABLES")?;
        for variable in self.variables() {
            writeln!(
                f,
                "{} {}",
                variable.render_bounds(),
                variable.category().as_str()
            )?;
        }
        Ok(())
    }
}
