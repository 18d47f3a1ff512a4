use crate::mip::expr::LinearExpr;
use crate::mip::solver::Assignment;

/// Slack used when comparing the two sides of a constraint. Assignments are
/// integral, but coefficients are not, so exact comparisons would trip over
/// floating point rounding.
pub const TOLERANCE: f64 = 1e-9;

/// The relation between the two sides of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    Equal,
    LessOrEqual,
}

/// A named linear constraint, `lhs == rhs` or `lhs <= rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Diagnostic name of the constraint
    name: String,
    /// The variable side of the constraint
    lhs: LinearExpr,
    /// How the two sides relate
    sense: ConstraintSense,
    /// The constant side of the constraint
    rhs: f64,
}

impl Constraint {
    /// The constraint `lhs == rhs`.
    pub fn eq(name: &str, lhs: LinearExpr, rhs: f64) -> Constraint {
        Constraint {
            name: name.to_string(),
            lhs,
            sense: ConstraintSense::Equal,
            rhs,
        }
    }

    /// The constraint `lhs <= rhs`.
    pub fn le(name: &str, lhs: LinearExpr, rhs: f64) -> Constraint {
        Constraint {
            name: name.to_string(),
            lhs,
            sense: ConstraintSense::LessOrEqual,
            rhs,
        }
    }

    /// Diagnostic name of the constraint
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The variable side of the constraint
    pub fn lhs(&self) -> &LinearExpr {
        &self.lhs
    }

    /// How the two sides relate
    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    /// The constant side of the constraint
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Whether `assignment` satisfies this constraint.
    pub fn satisfied_by(&self, assignment: &Assignment) -> bool {
        let lhs = self.lhs.value(assignment);
        match self.sense {
            ConstraintSense::Equal => (lhs - self.rhs).abs() <= TOLERANCE,
            ConstraintSense::LessOrEqual => lhs <= self.rhs + TOLERANCE,
        }
    }
}
