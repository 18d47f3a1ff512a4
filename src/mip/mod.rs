pub mod constraint;
pub mod expr;
pub mod model;
pub mod solver;

pub use constraint::{Constraint, ConstraintSense, TOLERANCE};
pub use expr::{LinearExpr, LinearSum, Var};
pub use model::{Model, VariableInfo, DEFAULT_TIME_BUDGET};
pub use solver::{Assignment, SolveError, Solver};
