use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use float_ord::FloatOrd;

use crate::environment::Environment;
use crate::mip::{
    Assignment, ConstraintSense, LinearExpr, Model, SolveError, Solver, TOLERANCE,
};
use crate::problem::{Customer, Distance, Hub, Location, Problem, Product, ProductIndex, Quantity};

/// Route `log` output into the test harness. Safe to call from every test.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shorthand for a [`Location`].
pub fn loc(x: i64, y: i64) -> Location {
    Location { x, y }
}

/// A quantity-per-product map from `(product, quantity)` pairs.
pub fn quantities(entries: &[(usize, Quantity)]) -> BTreeMap<ProductIndex, Quantity> {
    entries
        .iter()
        .map(|&(product, quantity)| (ProductIndex::from(product), quantity))
        .collect()
}

/// Assemble a valid problem from compact literals. Customers and hubs are
/// given as `(location, [(product, quantity)])` pairs, and products are
/// named after their index.
pub fn instance(
    customers: &[(Location, &[(usize, Quantity)])],
    hubs: &[(Location, &[(usize, Quantity)])],
    products: usize,
    max_flight_capacity: Quantity,
) -> Problem {
    let customers = customers
        .iter()
        .map(|&(location, demand)| Customer::new(location, quantities(demand)))
        .collect();
    let hubs = hubs
        .iter()
        .map(|&(location, stock)| Hub::new(location, quantities(stock)))
        .collect();
    let products = (0..products)
        .map(|product| Product::new(&format!("product_{}", product)))
        .collect();

    Problem::new(customers, hubs, products, max_flight_capacity).unwrap()
}

/// An environment with distances looked up from an explicit table. Unlike a
/// grid, the table may be asymmetric. Panics on pairs it has no entry for.
pub struct TableEnvironment {
    distances: BTreeMap<(Location, Location), Distance>,
}

impl TableEnvironment {
    pub fn new(entries: &[(Location, Location, Distance)]) -> TableEnvironment {
        TableEnvironment {
            distances: entries
                .iter()
                .map(|&(from, to, distance)| ((from, to), distance))
                .collect(),
        }
    }
}

impl Environment for TableEnvironment {
    fn distance(&self, from: Location, to: Location) -> Distance {
        self.distances[&(from, to)]
    }
}

/// A solver that exhaustively enumerates every assignment within the
/// variable bounds, with interval based pruning. Variables without an upper
/// bound are clamped to `fallback_bound`. Only suitable for tiny models.
pub struct EnumerationSolver {
    fallback_bound: i64,
}

impl EnumerationSolver {
    pub fn new(fallback_bound: i64) -> EnumerationSolver {
        EnumerationSolver { fallback_bound }
    }
}

impl Solver for EnumerationSolver {
    fn solve(&mut self, model: &Model, time_limit: Duration) -> Result<Assignment, SolveError> {
        let domains: Vec<(i64, i64)> = model
            .variables()
            .iter()
            .map(|info| {
                let upper = info
                    .upper()
                    .unwrap_or_else(|| info.lower().max(self.fallback_bound));
                (info.lower(), upper)
            })
            .collect();

        let mut search = Search {
            model,
            domains,
            deadline: Instant::now() + time_limit,
            best: None,
        };
        let finished = search.run(&mut Vec::new());

        match (finished, search.best) {
            (true, Some((_, values))) => Ok(Assignment::new(values)),
            (true, None) => Err(SolveError::Infeasible),
            (false, best) => Err(SolveError::Timeout {
                incumbent: best.map(|(_, values)| Assignment::new(values)),
            }),
        }
    }
}

struct Search<'a> {
    model: &'a Model,
    domains: Vec<(i64, i64)>,
    deadline: Instant,
    best: Option<(f64, Vec<i64>)>,
}

impl Search<'_> {
    /// Depth first enumeration over the remaining variables. Returns `false`
    /// once the deadline has passed.
    fn run(&mut self, values: &mut Vec<i64>) -> bool {
        if Instant::now() >= self.deadline {
            return false;
        }
        if self.pruned(values) {
            return true;
        }
        if values.len() == self.domains.len() {
            self.record(values);
            return true;
        }

        let (lower, upper) = self.domains[values.len()];
        for value in lower..=upper {
            values.push(value);
            let on_time = self.run(values);
            values.pop();

            if !on_time {
                return false;
            }
        }
        true
    }

    /// Whether the subtree under the fixed `prefix` can be discarded, either
    /// because a constraint has become unsatisfiable or because the
    /// objective can no longer beat the incumbent.
    fn pruned(&self, prefix: &[i64]) -> bool {
        for constraint in self.model.constraints() {
            let (min, max) = self.range(constraint.lhs(), prefix);
            let hopeless = match constraint.sense() {
                ConstraintSense::LessOrEqual => min > constraint.rhs() + TOLERANCE,
                ConstraintSense::Equal => {
                    min > constraint.rhs() + TOLERANCE || max < constraint.rhs() - TOLERANCE
                }
            };
            if hopeless {
                return true;
            }
        }

        match &self.best {
            Some((incumbent, _)) => {
                let (min, _) = self.range(self.model.objective(), prefix);
                FloatOrd(min) >= FloatOrd(*incumbent)
            }
            None => false,
        }
    }

    /// The smallest and largest value `expr` can take when the first
    /// `prefix.len()` variables are fixed and the rest roam their domains.
    fn range(&self, expr: &LinearExpr, prefix: &[i64]) -> (f64, f64) {
        let mut min = 0.0;
        let mut max = 0.0;
        for (var, coefficient) in expr.terms() {
            let (low, high) = match prefix.get(usize::from(var)) {
                Some(&fixed) => (fixed, fixed),
                None => self.domains[usize::from(var)],
            };
            if coefficient >= 0.0 {
                min += coefficient * low as f64;
                max += coefficient * high as f64;
            } else {
                min += coefficient * high as f64;
                max += coefficient * low as f64;
            }
        }
        (min, max)
    }

    fn record(&mut self, values: &[i64]) {
        let assignment = Assignment::new(values.to_vec());
        if !self.model.feasible(&assignment) {
            return;
        }

        let objective = self.model.objective_value(&assignment);
        let improved = match &self.best {
            Some((incumbent, _)) => FloatOrd(objective) < FloatOrd(*incumbent),
            None => true,
        };
        if improved {
            self.best = Some((objective, values.to_vec()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mip::{Constraint, DEFAULT_TIME_BUDGET};

    #[test]
    fn enumeration_finds_the_cheapest_feasible_point() {
        let mut model = Model::new("toy");
        let x = model.add_var("x", 0, Some(4));
        let y = model.add_var("y", 0, Some(4));
        model.add_constr(Constraint::eq("sum", LinearExpr::from(x) + y, 4.0));
        model.set_objective(3.0 * x + 1.0 * y);

        let assignment = EnumerationSolver::new(0)
            .solve(&model, DEFAULT_TIME_BUDGET)
            .unwrap();

        assert_eq!(assignment.value(x), 0);
        assert_eq!(assignment.value(y), 4);
    }

    #[test]
    fn unbounded_variables_roam_up_to_the_fallback_bound() {
        let mut model = Model::new("toy");
        let x = model.add_var("x", 0, None);
        model.add_constr(Constraint::eq("pin", 1.0 * x, 3.0));

        let cramped = EnumerationSolver::new(2).solve(&model, DEFAULT_TIME_BUDGET);
        assert_eq!(cramped, Err(SolveError::Infeasible));

        let roomy = EnumerationSolver::new(5)
            .solve(&model, DEFAULT_TIME_BUDGET)
            .unwrap();
        assert_eq!(roomy.value(x), 3);
    }

    #[test]
    fn table_distances_depend_on_the_direction() {
        let a = loc(0, 0);
        let b = loc(1, 1);
        let environment = TableEnvironment::new(&[(a, b, 2.0), (b, a, 9.0)]);

        assert_eq!(environment.distance(a, b), 2.0);
        assert_eq!(environment.distance(b, a), 9.0);
    }
}
