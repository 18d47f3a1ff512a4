pub mod product_trips;

pub use product_trips::ProductTripsSolver;
