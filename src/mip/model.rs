use std::time::Duration;

use log::info;
use typed_index_collections::TiVec;

use crate::mip::constraint::Constraint;
use crate::mip::expr::{LinearExpr, Var};
use crate::mip::solver::{Assignment, SolveError, Solver};

/// The time budget to hand to [`Model::solve`] when nothing else is called
/// for.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(120);

/// A single integer decision variable of a [`Model`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    /// Diagnostic name of the variable
    name: String,
    /// The smallest value the variable may take
    lower: i64,
    /// The largest value the variable may take, unbounded if absent
    upper: Option<i64>,
}

impl VariableInfo {
    /// Diagnostic name of the variable
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The smallest value the variable may take
    pub fn lower(&self) -> i64 {
        self.lower
    }

    /// The largest value the variable may take, unbounded if absent
    pub fn upper(&self) -> Option<i64> {
        self.upper
    }
}

/// An integer linear program: integer variables, a linear objective that is
/// always minimized, and a set of linear constraints.
///
/// Models are write once. The builders add variables and constraints, and a
/// finished model is only read, so solving never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Diagnostic name of the model
    name: String,
    /// The variables of the model, indexed by [`Var`]
    variables: TiVec<Var, VariableInfo>,
    /// The objective to minimize
    objective: LinearExpr,
    /// The constraints, in insertion order
    constraints: Vec<Constraint>,
}

impl Model {
    /// An empty model with no variables and a zero objective.
    pub fn new(name: &str) -> Model {
        Model {
            name: name.to_string(),
            variables: TiVec::new(),
            objective: LinearExpr::new(),
            constraints: Vec::new(),
        }
    }

    /// Add an integer variable ranging over `[lower, upper]`, where an
    /// absent upper bound means unbounded, and return its handle.
    pub fn add_var(&mut self, name: &str, lower: i64, upper: Option<i64>) -> Var {
        let var = Var::from(self.variables.len());
        self.variables.push(VariableInfo {
            name: name.to_string(),
            lower,
            upper,
        });
        var
    }

    /// Add a constraint to the model.
    pub fn add_constr(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Set the objective to minimize.
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// Diagnostic name of the model
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The variables of the model, indexed by their handles
    pub fn variables(&self) -> &TiVec<Var, VariableInfo> {
        &self.variables
    }

    /// The handles of all variables of the model
    pub fn vars(&self) -> impl Iterator<Item = Var> {
        (0..self.variables.len()).map(Var::from)
    }

    /// The constraints of the model, in insertion order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The objective to minimize
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// The objective value of `assignment`.
    pub fn objective_value(&self, assignment: &Assignment) -> f64 {
        self.objective.value(assignment)
    }

    /// Whether `assignment` covers every variable, respects every bound and
    /// satisfies every constraint.
    pub fn feasible(&self, assignment: &Assignment) -> bool {
        assignment.len() == self.variables.len()
            && self.variables.iter_enumerated().all(|(var, info)| {
                let value = assignment.value(var);
                value >= info.lower && info.upper.map_or(true, |upper| value <= upper)
            })
            && self.constraints.iter().all(|c| c.satisfied_by(assignment))
    }

    /// Minimize the model with `solver` within `time_limit`.
    pub fn solve<S: Solver>(
        &self,
        solver: &mut S,
        time_limit: Duration,
    ) -> Result<Assignment, SolveError> {
        info!(
            "solving model {} with {} variables and {} constraints, budget {:?}",
            self.name,
            self.variables.len(),
            self.constraints.len(),
            time_limit
        );

        let result = solver.solve(self, time_limit);

        match &result {
            Ok(assignment) => info!(
                "model {} solved, objective {}",
                self.name,
                self.objective_value(assignment)
            ),
            Err(error) => info!("model {} not solved: {}", self.name, error),
        }

        result
    }
}
