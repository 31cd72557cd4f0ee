//! # grid_astar
//!
//! An incremental grid-based pathfinding system. Implements
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) over a uniform
//! 2D grid with an 8-connected neighbourhood, exposed as a steppable state
//! machine rather than a single blocking call: a driver advances the search
//! one node expansion at a time with [AstarSearch::step], runs it to the end
//! with [AstarSearch::run_to_completion], or abandons it by calling
//! [AstarSearch::reset] again. Every visited cell reports its
//! open/closed/path classification as the search evolves, which makes the
//! engine suitable for visualisers and turn-paced games.
//!
//! The grid is allocated once; obstacles are toggled in place and search
//! bookkeeping is cleared between runs without reallocating.

pub mod error;
pub mod grid;
pub mod node;
pub mod search;

use grid_util::point::Point;
use itertools::Itertools;

pub use crate::error::{Result, SearchError};
pub use crate::grid::SearchGrid;
pub use crate::node::{Node, NodeStatus, WorldPos, UNREACHABLE};
pub use crate::search::{AstarSearch, SearchPhase, StepEvent};

/// Cost of a cardinal (straight) move between adjacent cells.
pub const DIRECT_COST: i32 = 10;
/// Cost of a diagonal move, an integer approximation of `10 * sqrt(2)`.
pub const DIAGONAL_COST: i32 = 14;

/// Octile distance between two cells in integer movement-cost units.
///
/// Taking as many diagonal steps as the smaller axis delta allows and going
/// straight for the remainder gives the cheapest 8-connected route on an
/// open grid, so this doubles as the edge cost between adjacent cells and
/// as an admissible, consistent heuristic.
pub fn octile_distance(a: Point, b: Point) -> i32 {
    let dist_x = (a.x - b.x).abs();
    let dist_z = (a.y - b.y).abs();
    if dist_x < dist_z {
        DIAGONAL_COST * dist_x + DIRECT_COST * (dist_z - dist_x)
    } else {
        DIAGONAL_COST * dist_z + DIRECT_COST * (dist_x - dist_z)
    }
}

/// Total octile cost of a cell sequence, summed over consecutive pairs.
pub fn path_cost(points: &[Point]) -> i32 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| octile_distance(*a, *b))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octile_distance_diagonal() {
        assert_eq!(octile_distance(Point::new(0, 0), Point::new(2, 2)), 28);
    }

    #[test]
    fn octile_distance_mixed() {
        // Two straight steps and one diagonal step across either axis order.
        assert_eq!(octile_distance(Point::new(0, 0), Point::new(3, 1)), 34);
        assert_eq!(octile_distance(Point::new(0, 0), Point::new(1, 3)), 34);
    }

    #[test]
    fn octile_distance_symmetric() {
        let a = Point::new(1, 4);
        let b = Point::new(6, 2);
        assert_eq!(octile_distance(a, b), octile_distance(b, a));
        assert_eq!(octile_distance(a, a), 0);
    }

    #[test]
    fn path_cost_sums_pairs() {
        let points = [Point::new(0, 0), Point::new(1, 1), Point::new(2, 1)];
        assert_eq!(path_cost(&points), 24);
        assert_eq!(path_cost(&points[..1]), 0);
        assert_eq!(path_cost(&[]), 0);
    }
}
