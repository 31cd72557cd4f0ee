use grid_astar::{AstarSearch, SearchGrid, WorldPos};
use grid_util::point::Point;

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Cells have an 8-neighbourhood

fn main() {
    let mut grid = SearchGrid::new(3, 3).unwrap();
    grid.cache_neighbours();
    grid.set_obstacle(Point::new(1, 1), true).unwrap();

    let mut search = AstarSearch::new();
    search
        .reset(
            &mut grid,
            WorldPos::new(0.0, 0.0, 0.0),
            WorldPos::new(2.0, 0.0, 2.0),
        )
        .unwrap();
    search.run_to_completion(&mut grid);

    let path = search.retrace_path(&mut grid).unwrap();
    println!("Path:");
    for p in path {
        println!("{:?}", p);
    }
    println!("{}", grid);
}
