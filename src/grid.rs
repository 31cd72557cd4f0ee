//! Dense grid storage: obstacle flags, the node arena and cached
//! neighbour lists.

use core::fmt;

use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use log::info;

use crate::error::{Result, SearchError};
use crate::node::{Node, NodeStatus, WorldPos};

/// [SearchGrid] owns a fixed-size arena of [Node] search state together
/// with a [BoolGrid] of blocked flags ([true] meaning an obstacle occupies
/// the cell) and the 8-connected neighbour list of every cell. Dimensions
/// are fixed at construction; obstacle flags are toggled many times and the
/// per-node search state is cleared between runs, but the grid itself is
/// never resized or reallocated.
#[derive(Clone, Debug)]
pub struct SearchGrid {
    width: usize,
    height: usize,
    blocked: BoolGrid,
    pub(crate) nodes: Vec<Node>,
    pub(crate) neighbours: Vec<Vec<usize>>,
}

impl SearchGrid {
    /// Allocates a `width * height` grid of walkable cells at integer
    /// coordinates, each anchored at world position `(x, 0, z)`.
    pub fn new(width: usize, height: usize) -> Result<SearchGrid> {
        if width == 0 || height == 0 {
            return Err(SearchError::InvalidDimension { width, height });
        }
        let mut nodes = Vec::with_capacity(width * height);
        for z in 0..height as i32 {
            for x in 0..width as i32 {
                nodes.push(Node::new(Point::new(x, z)));
            }
        }
        info!("allocated {}x{} search grid", width, height);
        Ok(SearchGrid {
            width,
            height,
            blocked: BoolGrid::new(width, height, false),
            nodes,
            neighbours: vec![Vec::new(); width * height],
        })
    }

    /// Caches the 8-connected neighbourhood of every cell, scanning the
    /// offsets `{-1,0,1}^2` minus the cell itself and keeping in-bounds
    /// coordinates. Border cells end up with fewer than 8 neighbours.
    ///
    /// Run this once after construction. The lists depend only on grid
    /// geometry: toggling obstacles later does not change them, obstacle
    /// cells are skipped at expansion time instead.
    pub fn cache_neighbours(&mut self) {
        for ix in 0..self.nodes.len() {
            let pos = self.nodes[ix].pos;
            let mut list = Vec::new();
            for dx in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dz == 0 {
                        continue;
                    }
                    let neighbour = Point::new(pos.x + dx, pos.y + dz);
                    if self.in_bounds(neighbour.x, neighbour.y) {
                        list.push(self.ix(neighbour));
                    }
                }
            }
            self.neighbours[ix] = list;
        }
    }

    /// Converts a world position to grid coordinates by flooring its X and
    /// Z components.
    pub fn grid_pos(&self, pos: WorldPos) -> Result<Point> {
        let x = pos.x.floor() as i32;
        let z = pos.z.floor() as i32;
        if !self.in_bounds(x, z) {
            return Err(SearchError::OutOfBounds { x, z });
        }
        Ok(Point::new(x, z))
    }

    /// Read access to the cell at the given grid coordinates.
    pub fn node_at(&self, pos: Point) -> Result<&Node> {
        if !self.in_bounds(pos.x, pos.y) {
            return Err(SearchError::OutOfBounds { x: pos.x, z: pos.y });
        }
        Ok(&self.nodes[self.ix(pos)])
    }

    /// Read access to the cell containing the given world position.
    pub fn node_at_world(&self, pos: WorldPos) -> Result<&Node> {
        let grid_pos = self.grid_pos(pos)?;
        self.node_at(grid_pos)
    }

    /// The cached neighbours of a cell, in the fixed caching order.
    pub fn neighbours(&self, pos: Point) -> Result<Vec<Point>> {
        if !self.in_bounds(pos.x, pos.y) {
            return Err(SearchError::OutOfBounds { x: pos.x, z: pos.y });
        }
        Ok(self.neighbours[self.ix(pos)]
            .iter()
            .map(|&ix| self.nodes[ix].pos)
            .collect())
    }

    /// Whether the cell exists and is free of obstacles.
    pub fn is_walkable(&self, pos: Point) -> bool {
        self.in_bounds(pos.x, pos.y) && !self.blocked.get(pos.x as usize, pos.y as usize)
    }

    /// Marks or clears an obstacle. This flips the blocked flag and nothing
    /// else: neighbour caches stay as they are, and a search in flight will
    /// observe the new value the next time it examines the cell.
    pub fn set_obstacle(&mut self, pos: Point, is_obstacle: bool) -> Result<()> {
        if !self.in_bounds(pos.x, pos.y) {
            return Err(SearchError::OutOfBounds { x: pos.x, z: pos.y });
        }
        self.blocked
            .set(pos.x as usize, pos.y as usize, is_obstacle);
        Ok(())
    }

    /// Marks or clears an obstacle on the cell containing a world position.
    pub fn set_obstacle_at_world(&mut self, pos: WorldPos, is_obstacle: bool) -> Result<()> {
        let grid_pos = self.grid_pos(pos)?;
        self.set_obstacle(grid_pos, is_obstacle)
    }

    /// Returns every node to its pristine pre-search state: cost sentinel,
    /// no parent, [NodeStatus::Unvisited]. Obstacle flags are untouched.
    /// Call before reusing the grid for a new search.
    pub fn reset_search_state(&mut self) {
        for node in &mut self.nodes {
            node.clear_search_state();
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn in_bounds(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && self.blocked.index_in_bounds(x as usize, z as usize)
    }

    pub(crate) fn ix(&self, pos: Point) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }
}

impl fmt::Display for SearchGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for z in (0..self.height as i32).rev() {
            for x in 0..self.width as i32 {
                let pos = Point::new(x, z);
                let glyph = if self.blocked.get(x as usize, z as usize) {
                    '#'
                } else {
                    match self.nodes[self.ix(pos)].status {
                        NodeStatus::Unvisited => '.',
                        NodeStatus::Open => 'o',
                        NodeStatus::Closed => 'x',
                        NodeStatus::Path => '*',
                    }
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            SearchGrid::new(0, 4).unwrap_err(),
            SearchError::InvalidDimension {
                width: 0,
                height: 4
            }
        );
        assert!(SearchGrid::new(4, 0).is_err());
    }

    #[test]
    fn neighbour_counts_by_position() {
        let mut grid = SearchGrid::new(4, 3).unwrap();
        grid.cache_neighbours();
        // Corner, edge and interior cells.
        assert_eq!(grid.neighbours(Point::new(0, 0)).unwrap().len(), 3);
        assert_eq!(grid.neighbours(Point::new(1, 0)).unwrap().len(), 5);
        assert_eq!(grid.neighbours(Point::new(1, 1)).unwrap().len(), 8);
    }

    #[test]
    fn neighbour_lists_survive_obstacle_toggles() {
        let mut grid = SearchGrid::new(3, 3).unwrap();
        grid.cache_neighbours();
        let before = grid.neighbours(Point::new(0, 0)).unwrap();
        grid.set_obstacle(Point::new(1, 1), true).unwrap();
        assert_eq!(grid.neighbours(Point::new(0, 0)).unwrap(), before);
        assert!(!grid.is_walkable(Point::new(1, 1)));
    }

    #[test]
    fn world_lookup_floors_components() {
        let grid = SearchGrid::new(4, 4).unwrap();
        let node = grid.node_at_world(WorldPos::new(2.7, 0.0, 1.2)).unwrap();
        assert_eq!(node.pos, Point::new(2, 1));
        assert!(grid.grid_pos(WorldPos::new(-0.1, 0.0, 0.0)).is_err());
        assert!(grid.grid_pos(WorldPos::new(0.0, 0.0, 4.0)).is_err());
    }

    #[test]
    fn reset_is_idempotent_and_keeps_obstacles() {
        let mut grid = SearchGrid::new(3, 3).unwrap();
        grid.cache_neighbours();
        grid.set_obstacle(Point::new(2, 2), true).unwrap();
        let target = grid.ix(Point::new(1, 1));
        grid.nodes[target].g_cost = 42;
        grid.nodes[target].status = NodeStatus::Closed;
        grid.nodes[target].parent = Some(0);

        grid.reset_search_state();
        let once = grid.nodes.clone();
        grid.reset_search_state();
        for (a, b) in once.iter().zip(grid.nodes.iter()) {
            assert_eq!(a.g_cost, b.g_cost);
            assert_eq!(a.h_cost, b.h_cost);
            assert_eq!(a.parent, b.parent);
            assert_eq!(a.status, b.status);
        }
        assert!(!grid.is_walkable(Point::new(2, 2)));
    }
}
