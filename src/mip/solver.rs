use std::time::Duration;

use typed_index_collections::TiVec;

use crate::mip::expr::Var;
use crate::mip::model::Model;

/// A value for every variable of a model, indexed by [`Var`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: TiVec<Var, i64>,
}

impl Assignment {
    /// The assignment where the `i`'th variable of the model takes
    /// `values[i]`.
    pub fn new(values: Vec<i64>) -> Assignment {
        Assignment {
            values: values.into(),
        }
    }

    /// The value assigned to `var`.
    pub fn value(&self, var: Var) -> i64 {
        self.values[var]
    }

    /// The number of variables covered by the assignment.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The assigned values, paired with their variables.
    pub fn iter(&self) -> impl Iterator<Item = (Var, i64)> + '_ {
        self.values.iter_enumerated().map(|(var, &value)| (var, value))
    }
}

/// Errors surfaced by a [`Solver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The model admits no feasible assignment.
    Infeasible,
    /// The time budget ran out before the search finished. If a feasible
    /// assignment was found along the way, the best one is carried along.
    Timeout { incumbent: Option<Assignment> },
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::Infeasible => write!(f, "the model is infeasible"),
            SolveError::Timeout {
                incumbent: Some(_),
            } => write!(f, "time limit reached before optimality, best incumbent attached"),
            SolveError::Timeout { incumbent: None } => {
                write!(f, "time limit reached without finding a feasible assignment")
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// Something that can minimize a [`Model`]: find an assignment of integer
/// values to its variables that satisfies every constraint and minimizes the
/// objective.
///
/// Implementations are handed the full model and a time budget, and are
/// expected to give up with [`SolveError::Timeout`] instead of overrunning
/// the budget.
pub trait Solver {
    fn solve(&mut self, model: &Model, time_limit: Duration) -> Result<Assignment, SolveError>;
}
