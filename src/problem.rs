use std::collections::BTreeMap;

use derive_more::{Deref, Display, From, Into};
use log::debug;
use serde::{Deserialize, Serialize};

/// The type used for item quantities
pub type Quantity = i64;
/// The type used for distance
pub type Distance = f64;

#[derive(
    Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash, Serialize, Deserialize,
)]
pub struct CustomerIndex(usize);

#[derive(
    Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash, Serialize, Deserialize,
)]
pub struct HubIndex(usize);

#[derive(
    Deref, Debug, Display, PartialEq, Eq, PartialOrd, Ord, From, Into, Clone, Copy, Hash, Serialize, Deserialize,
)]
pub struct ProductIndex(usize);

/// A point on the integer grid that the network lives on.
///
/// Coordinates are never interpreted by the model itself. All geometry goes
/// through an [`Environment`](crate::environment::Environment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// The x-coordinate
    pub x: i64,
    /// The y-coordinate
    pub y: i64,
}

/// A product type that can be stocked by hubs and demanded by customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Human readable label of the product type
    name: String,
}

impl Product {
    pub fn new(name: &str) -> Product {
        Product {
            name: name.to_string(),
        }
    }

    /// Human readable label of the product type
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// A customer that demands products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Where the customer is located
    location: Location,
    /// The number of items demanded, per product
    demand: BTreeMap<ProductIndex, Quantity>,
}

impl Customer {
    pub fn new(location: Location, demand: BTreeMap<ProductIndex, Quantity>) -> Customer {
        Customer { location, demand }
    }

    /// Where the customer is located
    pub fn location(&self) -> Location {
        self.location
    }

    /// The number of items of `product` the customer demands, or zero if it
    /// does not ask for it.
    pub fn demand_of(&self, product: ProductIndex) -> Quantity {
        self.demand.get(&product).copied().unwrap_or(0)
    }

    /// The demanded quantities, per product. Products without an entry are
    /// not demanded.
    pub fn demand(&self) -> &BTreeMap<ProductIndex, Quantity> {
        &self.demand
    }
}

/// A hub that stocks products and launches flights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hub {
    /// Where the hub is located
    location: Location,
    /// The number of items in stock, per product
    stock: BTreeMap<ProductIndex, Quantity>,
}

impl Hub {
    pub fn new(location: Location, stock: BTreeMap<ProductIndex, Quantity>) -> Hub {
        Hub { location, stock }
    }

    /// Where the hub is located
    pub fn location(&self) -> Location {
        self.location
    }

    /// The number of items of `product` the hub holds, or zero if it stocks
    /// none of it.
    pub fn available_items(&self, product: ProductIndex) -> Quantity {
        self.stock.get(&product).copied().unwrap_or(0)
    }

    /// The stocked quantities, per product. Products without an entry are
    /// not stocked.
    pub fn stock(&self) -> &BTreeMap<ProductIndex, Quantity> {
        &self.stock
    }
}

/// A full problem instance of the drone delivery network.
///
/// Instances are validated on construction. A value of this type always has
/// a strictly positive flight capacity, non-negative demands and stocks that
/// only refer to products of the catalog, and enough total stock to cover
/// the total demand of every product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProblemData")]
pub struct Problem {
    /// The customers of the network. Assumed to be ordered by index
    customers: Vec<Customer>,
    /// The hubs of the network. Assumed to be ordered by index
    hubs: Vec<Hub>,
    /// The product types occurring in the network
    products: Vec<Product>,
    /// The maximum number of items a single flight can carry
    max_flight_capacity: Quantity,
}

impl Problem {
    pub fn new(
        customers: Vec<Customer>,
        hubs: Vec<Hub>,
        products: Vec<Product>,
        max_flight_capacity: Quantity,
    ) -> Result<Problem, ProblemConstructionError> {
        use ProblemConstructionError::*;

        if max_flight_capacity <= 0 {
            return Err(NonPositiveFlightCapacity {
                capacity: max_flight_capacity,
            });
        }

        for (c, customer) in customers.iter().enumerate() {
            for (&product, &quantity) in customer.demand() {
                if *product >= products.len() {
                    return Err(UnknownProduct {
                        product,
                        count: products.len(),
                    });
                }
                if quantity < 0 {
                    return Err(NegativeDemand {
                        customer: CustomerIndex(c),
                        product,
                    });
                }
            }
        }

        for (h, hub) in hubs.iter().enumerate() {
            for (&product, &quantity) in hub.stock() {
                if *product >= products.len() {
                    return Err(UnknownProduct {
                        product,
                        count: products.len(),
                    });
                }
                if quantity < 0 {
                    return Err(NegativeAvailability {
                        hub: HubIndex(h),
                        product,
                    });
                }
            }
        }

        for product in (0..products.len()).map(ProductIndex) {
            let demanded: Quantity = customers.iter().map(|c| c.demand_of(product)).sum();
            let available: Quantity = hubs.iter().map(|h| h.available_items(product)).sum();
            if demanded > available {
                return Err(UnsuppliableDemand {
                    product,
                    demanded,
                    available,
                });
            }
        }

        debug!(
            "constructed problem with {} customers, {} hubs and {} products",
            customers.len(),
            hubs.len(),
            products.len()
        );

        Ok(Problem {
            customers,
            hubs,
            products,
            max_flight_capacity,
        })
    }

    /// The customers of the network. Ordered by index (continuous, starting at 0)
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// The hubs of the network. Ordered by index (continuous, starting at 0)
    pub fn hubs(&self) -> &[Hub] {
        &self.hubs
    }

    /// The product types occurring in the network
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The maximum number of items a single flight can carry
    pub fn max_flight_capacity(&self) -> Quantity {
        self.max_flight_capacity
    }

    /// The customer with the given index
    pub fn customer(&self, index: CustomerIndex) -> &Customer {
        &self.customers[*index]
    }

    /// The hub with the given index
    pub fn hub(&self, index: HubIndex) -> &Hub {
        &self.hubs[*index]
    }

    /// The product with the given index
    pub fn product(&self, index: ProductIndex) -> &Product {
        &self.products[*index]
    }

    /// The indices of all customers
    pub fn customer_indices(&self) -> impl Iterator<Item = CustomerIndex> + Clone {
        (0..self.customers.len()).map(CustomerIndex)
    }

    /// The indices of all hubs
    pub fn hub_indices(&self) -> impl Iterator<Item = HubIndex> + Clone {
        (0..self.hubs.len()).map(HubIndex)
    }

    /// The indices of all products
    pub fn product_indices(&self) -> impl Iterator<Item = ProductIndex> + Clone {
        (0..self.products.len()).map(ProductIndex)
    }
}

/// The raw fields of a [`Problem`], as they appear on disk. Deserialization
/// funnels through [`Problem::new`] so that no unvalidated instance escapes.
#[derive(Deserialize)]
struct ProblemData {
    customers: Vec<Customer>,
    hubs: Vec<Hub>,
    products: Vec<Product>,
    max_flight_capacity: Quantity,
}

impl TryFrom<ProblemData> for Problem {
    type Error = ProblemConstructionError;

    fn try_from(data: ProblemData) -> Result<Problem, Self::Error> {
        Problem::new(
            data.customers,
            data.hubs,
            data.products,
            data.max_flight_capacity,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemConstructionError {
    /// The flight capacity must be strictly positive
    NonPositiveFlightCapacity { capacity: Quantity },
    /// Customer `customer` demands a negative amount of `product`
    NegativeDemand {
        customer: CustomerIndex,
        product: ProductIndex,
    },
    /// Hub `hub` holds a negative amount of `product`
    NegativeAvailability { hub: HubIndex, product: ProductIndex },
    /// A demand or stock entry refers to a product outside the catalog
    UnknownProduct { product: ProductIndex, count: usize },
    /// The customers demand more of `product` than all hubs hold together
    UnsuppliableDemand {
        product: ProductIndex,
        demanded: Quantity,
        available: Quantity,
    },
}

impl std::fmt::Display for ProblemConstructionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ProblemConstructionError::*;

        match self {
            NonPositiveFlightCapacity { capacity } => {
                write!(f, "max flight capacity must be strictly positive, got {capacity}")
            }
            NegativeDemand { customer, product } => {
                write!(f, "customer {customer} has a negative demand for product {product}")
            }
            NegativeAvailability { hub, product } => {
                write!(f, "hub {hub} has a negative stock of product {product}")
            }
            UnknownProduct { product, count } => {
                write!(f, "product {product} does not exist, the problem has {count} products")
            }
            UnsuppliableDemand {
                product,
                demanded,
                available,
            } => {
                write!(
                    f,
                    "total demand for product {product} is {demanded}, but only {available} items are available"
                )
            }
        }
    }
}

impl std::error::Error for ProblemConstructionError {}
