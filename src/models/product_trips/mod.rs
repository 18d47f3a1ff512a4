pub mod model;
pub mod variables;

pub use model::{ProductTripsSolver, Site, Trip, TripPlan};
pub use variables::{TripVariables, VariableKind};
