use std::collections::BTreeMap;

use itertools::iproduct;
use typed_index_collections::TiVec;

use crate::mip::{Model, Var};
use crate::problem::{CustomerIndex, HubIndex, Problem, ProductIndex};

/// A delivery route: flights go from `hub` to `customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerRoute {
    pub customer: CustomerIndex,
    pub hub: HubIndex,
}

/// A product flow on a delivery route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerFlow {
    pub customer: CustomerIndex,
    pub hub: HubIndex,
    pub product: ProductIndex,
}

/// A transfer route: flights go from hub `from` to hub `to`, always between
/// two distinct hubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransferRoute {
    pub from: HubIndex,
    pub to: HubIndex,
}

/// A product flow on a transfer route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransferFlow {
    pub from: HubIndex,
    pub to: HubIndex,
    pub product: ProductIndex,
}

/// What a decision variable of the trip model decides.
///
/// Every variable carries the full index tuple that created it, so a solved
/// value can be mapped back to its route and product without re-deriving
/// anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// The number of delivery flights on a customer route
    FlightsCustomerHub(CustomerRoute),
    /// The number of items of one product moved on a customer route
    ProductsMoveCustomerHub(CustomerFlow),
    /// The number of transfer flights on a transfer route
    FlightsHubHub(TransferRoute),
    /// The number of items of one product moved on a transfer route
    ProductsMoveHubHub(TransferFlow),
}

/// The decision variables of the trip model, grouped by family.
///
/// Exactly one variable exists per valid index combination: every
/// (customer, hub) pair, every (customer, hub, product) triple, and every
/// ordered pair of distinct hubs, with and without a product dimension.
#[derive(Debug)]
pub struct TripVariables {
    /// Delivery flights, per (customer, hub)
    flights: BTreeMap<CustomerRoute, Var>,
    /// Delivered items, per (customer, hub, product)
    moves: BTreeMap<CustomerFlow, Var>,
    /// Transfer flights, per ordered pair of distinct hubs
    transfer_flights: BTreeMap<TransferRoute, Var>,
    /// Transferred items, per ordered pair of distinct hubs and product
    transfer_moves: BTreeMap<TransferFlow, Var>,
    /// What each variable of the model decides
    kinds: TiVec<Var, VariableKind>,
}

impl TripVariables {
    /// Create every decision variable of the trip model in `model`, which
    /// must be empty.
    ///
    /// All variables are non-negative. Delivered items are additionally
    /// bounded above by the customer's demand for the product in question,
    /// which pins the variable to zero when there is no demand.
    pub fn create(model: &mut Model, problem: &Problem) -> TripVariables {
        let mut flights = BTreeMap::new();
        let mut moves = BTreeMap::new();
        let mut transfer_flights = BTreeMap::new();
        let mut transfer_moves = BTreeMap::new();
        let mut kinds = TiVec::new();

        for (customer, hub) in iproduct!(problem.customer_indices(), problem.hub_indices()) {
            let route = CustomerRoute { customer, hub };
            let var = model.add_var(&format!("flights_{}_{}", customer, hub), 0, None);
            kinds.push(VariableKind::FlightsCustomerHub(route));
            flights.insert(route, var);
        }

        for (customer, hub, product) in iproduct!(
            problem.customer_indices(),
            problem.hub_indices(),
            problem.product_indices()
        ) {
            let flow = CustomerFlow {
                customer,
                hub,
                product,
            };
            let demand = problem.customer(customer).demand_of(product);
            let var = model.add_var(
                &format!("move_{}_{}_{}", customer, hub, product),
                0,
                Some(demand),
            );
            kinds.push(VariableKind::ProductsMoveCustomerHub(flow));
            moves.insert(flow, var);
        }

        for (from, to) in iproduct!(problem.hub_indices(), problem.hub_indices()) {
            if from == to {
                continue;
            }
            let route = TransferRoute { from, to };
            let var = model.add_var(&format!("hub_flights_{}_{}", from, to), 0, None);
            kinds.push(VariableKind::FlightsHubHub(route));
            transfer_flights.insert(route, var);
        }

        for (from, to, product) in iproduct!(
            problem.hub_indices(),
            problem.hub_indices(),
            problem.product_indices()
        ) {
            if from == to {
                continue;
            }
            let flow = TransferFlow { from, to, product };
            let var = model.add_var(&format!("hub_move_{}_{}_{}", from, to, product), 0, None);
            kinds.push(VariableKind::ProductsMoveHubHub(flow));
            transfer_moves.insert(flow, var);
        }

        TripVariables {
            flights,
            moves,
            transfer_flights,
            transfer_moves,
            kinds,
        }
    }

    /// The delivery flight count variable of a (customer, hub) pair.
    pub fn flights(&self, customer: CustomerIndex, hub: HubIndex) -> Var {
        self.flights[&CustomerRoute { customer, hub }]
    }

    /// The delivered item variable of a (customer, hub, product) triple.
    pub fn moves(&self, customer: CustomerIndex, hub: HubIndex, product: ProductIndex) -> Var {
        self.moves[&CustomerFlow {
            customer,
            hub,
            product,
        }]
    }

    /// The transfer flight count variable of an ordered pair of distinct
    /// hubs.
    pub fn transfer_flights(&self, from: HubIndex, to: HubIndex) -> Var {
        self.transfer_flights[&TransferRoute { from, to }]
    }

    /// The transferred item variable of an ordered pair of distinct hubs
    /// and a product.
    pub fn transfer_moves(&self, from: HubIndex, to: HubIndex, product: ProductIndex) -> Var {
        self.transfer_moves[&TransferFlow { from, to, product }]
    }

    /// What `var` decides. The variable must stem from the model these
    /// variables were created in.
    pub fn kind(&self, var: Var) -> VariableKind {
        self.kinds[var]
    }

    /// All variables with their kinds, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (Var, VariableKind)> + '_ {
        self.kinds.iter_enumerated().map(|(var, &kind)| (var, kind))
    }

    /// The total number of decision variables.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{instance, loc};

    fn catalog(problem: &Problem) -> (Model, TripVariables) {
        let mut model = Model::new("catalog");
        let variables = TripVariables::create(&mut model, problem);
        (model, variables)
    }

    #[test]
    fn one_variable_per_valid_index_combination() {
        let problem = instance(
            &[(loc(0, 0), &[(0, 1)]), (loc(0, 1), &[])],
            &[(loc(1, 0), &[(0, 1)]), (loc(1, 1), &[]), (loc(2, 2), &[])],
            2,
            1,
        );
        let (model, variables) = catalog(&problem);

        // 2 customers x 3 hubs, plus the product dimension, plus 3 * 2
        // ordered distinct hub pairs with and without products.
        assert_eq!(variables.len(), 6 + 12 + 6 + 12);
        assert_eq!(model.variables().len(), variables.len());
    }

    #[test]
    fn delivered_items_are_capped_by_demand() {
        let problem = instance(
            &[(loc(0, 0), &[(0, 4)])],
            &[(loc(1, 0), &[(0, 9)])],
            2,
            3,
        );
        let (model, variables) = catalog(&problem);

        let demanded = variables.moves(0.into(), 0.into(), 0.into());
        let undemanded = variables.moves(0.into(), 0.into(), 1.into());

        assert_eq!(model.variables()[demanded].upper(), Some(4));
        assert_eq!(model.variables()[undemanded].upper(), Some(0));
        assert_eq!(model.variables()[variables.flights(0.into(), 0.into())].upper(), None);
    }

    #[test]
    fn transfers_never_pair_a_hub_with_itself() {
        let problem = instance(
            &[],
            &[(loc(0, 0), &[]), (loc(1, 0), &[]), (loc(2, 0), &[])],
            1,
            1,
        );
        let (_, variables) = catalog(&problem);

        for (_, kind) in variables.iter() {
            match kind {
                VariableKind::FlightsHubHub(route) => assert_ne!(route.from, route.to),
                VariableKind::ProductsMoveHubHub(flow) => assert_ne!(flow.from, flow.to),
                _ => {}
            }
        }
    }

    #[test]
    fn kinds_carry_the_index_tuples_verbatim() {
        let problem = instance(
            &[(loc(0, 0), &[(0, 1)])],
            &[(loc(1, 0), &[(0, 1)]), (loc(2, 0), &[])],
            1,
            1,
        );
        let (_, variables) = catalog(&problem);

        let var = variables.moves(0.into(), 1.into(), 0.into());
        assert_eq!(
            variables.kind(var),
            VariableKind::ProductsMoveCustomerHub(CustomerFlow {
                customer: 0.into(),
                hub: 1.into(),
                product: 0.into(),
            })
        );

        let var = variables.transfer_flights(1.into(), 0.into());
        assert_eq!(
            variables.kind(var),
            VariableKind::FlightsHubHub(TransferRoute {
                from: 1.into(),
                to: 0.into(),
            })
        );
    }

    #[test]
    fn variable_names_follow_the_indices() {
        let problem = instance(
            &[(loc(0, 0), &[(0, 1)])],
            &[(loc(1, 0), &[(0, 1)]), (loc(2, 0), &[])],
            1,
            1,
        );
        let (model, variables) = catalog(&problem);

        let flights = variables.flights(0.into(), 1.into());
        let moves = variables.moves(0.into(), 0.into(), 0.into());
        let transfer = variables.transfer_moves(0.into(), 1.into(), 0.into());

        assert_eq!(model.variables()[flights].name(), "flights_0_1");
        assert_eq!(model.variables()[moves].name(), "move_0_0_0");
        assert_eq!(model.variables()[transfer].name(), "hub_move_0_1_0");
    }
}
