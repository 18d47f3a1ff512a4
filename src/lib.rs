pub mod environment;
pub mod mip;
pub mod models;
pub mod problem;

#[cfg(test)]
mod testing;
