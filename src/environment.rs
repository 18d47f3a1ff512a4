use float_ord::FloatOrd;
use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::problem::{Distance, HubIndex, Location, Problem};

/// Distance oracle for the locations of a problem.
///
/// All geometry goes through this trait, and distances are always queried in
/// the direction of travel. Implementations are free to be asymmetric.
pub trait Environment {
    /// The travel distance from `from` to `to`.
    fn distance(&self, from: Location, to: Location) -> Distance;
}

/// A rectangular grid of locations with Euclidean distances, rounded up to
/// whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridEnvironment {
    /// The number of grid cells along the x-axis
    n_x: i64,
    /// The number of grid cells along the y-axis
    n_y: i64,
}

impl GridEnvironment {
    pub fn new(n_x: i64, n_y: i64) -> GridEnvironment {
        GridEnvironment { n_x, n_y }
    }

    /// Whether `location` lies on the grid.
    pub fn contains(&self, location: Location) -> bool {
        (0..self.n_x).contains(&location.x) && (0..self.n_y).contains(&location.y)
    }

    /// All locations of the grid, in lexicographic order.
    pub fn locations(&self) -> impl Iterator<Item = Location> {
        iproduct!(0..self.n_x, 0..self.n_y).map(|(x, y)| Location { x, y })
    }

    /// The hub of `problem` closest to `location`, by travel distance from
    /// the location. Ties resolve to the lowest hub index. `None` if and
    /// only if the problem has no hubs.
    pub fn nearest_hub(&self, problem: &Problem, location: Location) -> Option<HubIndex> {
        problem
            .hub_indices()
            .min_by_key(|&hub| FloatOrd(self.distance(location, problem.hub(hub).location())))
    }
}

impl Environment for GridEnvironment {
    fn distance(&self, from: Location, to: Location) -> Distance {
        let dx = (from.x - to.x) as f64;
        let dy = (from.y - to.y) as f64;
        (dx * dx + dy * dy).sqrt().ceil()
    }
}
