use std::time::Duration;

use itertools::iproduct;
use log::info;
use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::mip::{Assignment, Constraint, LinearExpr, LinearSum, Model, SolveError, Solver};
use crate::problem::{CustomerIndex, HubIndex, Problem, ProductIndex, Quantity};

use super::variables::{TripVariables, VariableKind};

pub struct ProductTripsSolver {}

impl ProductTripsSolver {
    /// Build the trip model for `problem`: the full variable catalog, the
    /// distance objective, and all four constraint families.
    pub fn build<E: Environment>(problem: &Problem, environment: &E) -> (Model, TripVariables) {
        info!(
            "building trip model for {} customers, {} hubs and {} products",
            problem.customers().len(),
            problem.hubs().len(),
            problem.products().len()
        );

        let mut model = Model::new("product_trips");
        let variables = TripVariables::create(&mut model, problem);

        Self::demand_constraints(&mut model, &variables, problem);
        Self::supply_constraints(&mut model, &variables, problem);
        Self::customer_capacity_constraints(&mut model, &variables, problem);
        Self::transfer_capacity_constraints(&mut model, &variables, problem);

        let objective = Self::objective(&variables, problem, environment);
        model.set_objective(objective);

        info!(
            "built trip model with {} variables and {} constraints",
            model.variables().len(),
            model.constraints().len()
        );

        (model, variables)
    }

    /// Build the trip model, minimize it with `solver` and map the
    /// assignment back into trips.
    pub fn solve<E: Environment, S: Solver>(
        problem: &Problem,
        environment: &E,
        solver: &mut S,
        time_limit: Duration,
    ) -> Result<TripPlan, SolveError> {
        let (model, variables) = Self::build(problem, environment);
        let assignment = model.solve(solver, time_limit)?;

        Ok(TripPlan::from_assignment(&variables, &assignment))
    }

    /// Total distance flown: delivery flights weighted by the hub to
    /// customer distance, transfer flights by the hub to hub distance.
    /// Distances are queried in the direction of travel, once per pair.
    fn objective<E: Environment>(
        variables: &TripVariables,
        problem: &Problem,
        environment: &E,
    ) -> LinearExpr {
        let deliveries = iproduct!(problem.customer_indices(), problem.hub_indices())
            .map(|(customer, hub)| {
                let from = problem.hub(hub).location();
                let to = problem.customer(customer).location();
                environment.distance(from, to) * variables.flights(customer, hub)
            })
            .lin_sum();

        let transfers = iproduct!(problem.hub_indices(), problem.hub_indices())
            .filter(|(from, to)| from != to)
            .map(|(from, to)| {
                let a = problem.hub(from).location();
                let b = problem.hub(to).location();
                environment.distance(a, b) * variables.transfer_flights(from, to)
            })
            .lin_sum();

        deliveries + transfers
    }

    /// Every customer receives exactly its demand of every demanded
    /// product, summed over all hubs.
    fn demand_constraints(model: &mut Model, variables: &TripVariables, problem: &Problem) {
        for (customer, product) in iproduct!(problem.customer_indices(), problem.product_indices())
        {
            let demand = problem.customer(customer).demand_of(product);
            if demand == 0 {
                continue;
            }

            let received = problem
                .hub_indices()
                .map(|hub| variables.moves(customer, hub, product))
                .lin_sum();

            model.add_constr(Constraint::eq(
                &format!("demand_{}_{}", customer, product),
                received,
                demand as f64,
            ));
        }
    }

    /// No hub releases more of a product than it holds. Transfers received
    /// from sibling hubs raise the limit, transfers sent away lower it, so
    /// a hub can never be drained twice.
    fn supply_constraints(model: &mut Model, variables: &TripVariables, problem: &Problem) {
        for (hub, product) in iproduct!(problem.hub_indices(), problem.product_indices()) {
            let shipped = problem
                .customer_indices()
                .map(|customer| variables.moves(customer, hub, product))
                .lin_sum();
            let inflow = problem
                .hub_indices()
                .filter(|&other| other != hub)
                .map(|other| variables.transfer_moves(other, hub, product))
                .lin_sum();
            let outflow = problem
                .hub_indices()
                .filter(|&other| other != hub)
                .map(|other| variables.transfer_moves(hub, other, product))
                .lin_sum();

            let available = problem.hub(hub).available_items(product);
            model.add_constr(Constraint::le(
                &format!("supply_{}_{}", hub, product),
                shipped - inflow + outflow,
                available as f64,
            ));
        }
    }

    /// Delivery flights on a route must provide enough capacity for every
    /// item moved on it.
    fn customer_capacity_constraints(
        model: &mut Model,
        variables: &TripVariables,
        problem: &Problem,
    ) {
        let capacity = problem.max_flight_capacity() as f64;

        for (customer, hub) in iproduct!(problem.customer_indices(), problem.hub_indices()) {
            let moved = problem
                .product_indices()
                .map(|product| variables.moves(customer, hub, product))
                .lin_sum();

            model.add_constr(Constraint::le(
                &format!("flight_cap_{}_{}", customer, hub),
                moved - capacity * variables.flights(customer, hub),
                0.0,
            ));
        }
    }

    /// The same capacity coupling for transfers between hubs.
    fn transfer_capacity_constraints(
        model: &mut Model,
        variables: &TripVariables,
        problem: &Problem,
    ) {
        let capacity = problem.max_flight_capacity() as f64;

        for (from, to) in iproduct!(problem.hub_indices(), problem.hub_indices()) {
            if from == to {
                continue;
            }

            let moved = problem
                .product_indices()
                .map(|product| variables.transfer_moves(from, to, product))
                .lin_sum();

            model.add_constr(Constraint::le(
                &format!("hub_flight_cap_{}_{}", from, to),
                moved - capacity * variables.transfer_flights(from, to),
                0.0,
            ));
        }
    }
}

/// One end of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Site {
    Hub(HubIndex),
    Customer(CustomerIndex),
}

/// A shipment of one product between two sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Where the items leave from
    pub origin: Site,
    /// Where the items arrive
    pub destination: Site,
    /// The product being shipped
    pub product: ProductIndex,
    /// The number of items shipped
    pub quantity: Quantity,
}

/// Every shipment of a solved trip model, split by route type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TripPlan {
    /// Deliveries from hubs to customers
    pub hub_to_customer: Vec<Trip>,
    /// Transfers between hubs
    pub hub_to_hub: Vec<Trip>,
}

impl TripPlan {
    /// Read the nonzero product moves of `assignment` back into trips, in
    /// variable creation order.
    ///
    /// Flight count variables never become trips. They only pay for the
    /// capacity that the moved items consume.
    pub fn from_assignment(variables: &TripVariables, assignment: &Assignment) -> TripPlan {
        let mut plan = TripPlan::default();

        for (var, kind) in variables.iter() {
            let quantity = assignment.value(var);
            if quantity == 0 {
                continue;
            }

            match kind {
                VariableKind::ProductsMoveCustomerHub(flow) => plan.hub_to_customer.push(Trip {
                    origin: Site::Hub(flow.hub),
                    destination: Site::Customer(flow.customer),
                    product: flow.product,
                    quantity,
                }),
                VariableKind::ProductsMoveHubHub(flow) => plan.hub_to_hub.push(Trip {
                    origin: Site::Hub(flow.from),
                    destination: Site::Hub(flow.to),
                    product: flow.product,
                    quantity,
                }),
                VariableKind::FlightsCustomerHub(_) | VariableKind::FlightsHubHub(_) => {}
            }
        }

        plan
    }

    /// The total number of items delivered to `customer` of `product`,
    /// summed over all hubs.
    pub fn delivered(&self, customer: CustomerIndex, product: ProductIndex) -> Quantity {
        self.hub_to_customer
            .iter()
            .filter(|trip| trip.destination == Site::Customer(customer) && trip.product == product)
            .map(|trip| trip.quantity)
            .sum()
    }
}
