use std::collections::BTreeMap;
use std::ops::{Add, Mul, Sub};

use derive_more::{Deref, From, Into};

use crate::mip::solver::Assignment;

/// Handle to a decision variable of a [`Model`](crate::mip::Model).
///
/// A handle is nothing but the position of the variable in the model that
/// created it, so it is cheap to copy and may be used freely in expressions.
#[derive(Deref, Debug, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash)]
pub struct Var(usize);

/// A linear expression over decision variables: a sum of `coefficient * var`
/// terms, kept sparse and ordered by variable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearExpr {
    terms: BTreeMap<Var, f64>,
}

impl LinearExpr {
    /// The empty expression, equal to zero.
    pub fn new() -> LinearExpr {
        LinearExpr::default()
    }

    /// Add `coefficient * var` to the expression, merging with any existing
    /// term for the same variable.
    pub fn add_term(&mut self, var: Var, coefficient: f64) {
        *self.terms.entry(var).or_insert(0.0) += coefficient;
    }

    /// The coefficient of `var`, or zero if the expression does not mention
    /// it.
    pub fn coefficient(&self, var: Var) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    /// The terms of the expression, in increasing variable order.
    pub fn terms(&self) -> impl Iterator<Item = (Var, f64)> + '_ {
        self.terms.iter().map(|(&var, &coefficient)| (var, coefficient))
    }

    /// The value of the expression under `assignment`.
    pub fn value(&self, assignment: &Assignment) -> f64 {
        self.terms
            .iter()
            .map(|(&var, &coefficient)| coefficient * assignment.value(var) as f64)
            .sum()
    }
}

impl From<Var> for LinearExpr {
    fn from(var: Var) -> LinearExpr {
        let mut expr = LinearExpr::new();
        expr.add_term(var, 1.0);
        expr
    }
}

impl Mul<Var> for f64 {
    type Output = LinearExpr;

    fn mul(self, var: Var) -> LinearExpr {
        let mut expr = LinearExpr::new();
        expr.add_term(var, self);
        expr
    }
}

impl Mul<f64> for Var {
    type Output = LinearExpr;

    fn mul(self, coefficient: f64) -> LinearExpr {
        coefficient * self
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, scale: f64) -> LinearExpr {
        for coefficient in self.terms.values_mut() {
            *coefficient *= scale;
        }
        self
    }
}

impl Mul<LinearExpr> for f64 {
    type Output = LinearExpr;

    fn mul(self, expr: LinearExpr) -> LinearExpr {
        expr * self
    }
}

impl<E: Into<LinearExpr>> Add<E> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: E) -> LinearExpr {
        for (var, coefficient) in rhs.into().terms {
            self.add_term(var, coefficient);
        }
        self
    }
}

impl<E: Into<LinearExpr>> Sub<E> for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: E) -> LinearExpr {
        for (var, coefficient) in rhs.into().terms {
            self.add_term(var, -coefficient);
        }
        self
    }
}

/// Summation of variables and expressions into a single [`LinearExpr`],
/// mirroring the sum notation of the mathematical model.
pub trait LinearSum {
    fn lin_sum(self) -> LinearExpr;
}

impl<I> LinearSum for I
where
    I: IntoIterator,
    I::Item: Into<LinearExpr>,
{
    fn lin_sum(self) -> LinearExpr {
        let mut sum = LinearExpr::new();
        for item in self {
            for (var, coefficient) in item.into().terms {
                sum.add_term(var, coefficient);
            }
        }
        sum
    }
}
