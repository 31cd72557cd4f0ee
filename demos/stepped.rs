use grid_astar::{AstarSearch, SearchGrid, WorldPos};
use grid_util::point::Point;

// In this example the search is driven one expansion per "tick", the way a
// visualiser or turn-paced game would pace it, printing the classification
// events of every tick and the evolving grid at the end.

fn main() {
    let mut grid = SearchGrid::new(6, 6).unwrap();
    grid.cache_neighbours();
    for p in [
        Point::new(2, 1),
        Point::new(2, 2),
        Point::new(2, 3),
        Point::new(2, 4),
        Point::new(4, 4),
    ] {
        grid.set_obstacle(p, true).unwrap();
    }

    let mut search = AstarSearch::new();
    search
        .reset(
            &mut grid,
            WorldPos::new(0.0, 0.0, 0.0),
            WorldPos::new(5.0, 0.0, 5.0),
        )
        .unwrap();

    let mut tick = 0;
    while !search.is_complete() {
        tick += 1;
        println!("tick {}:", tick);
        for event in search.step(&mut grid) {
            println!("  {:?} -> {:?}", event.pos, event.status);
        }
    }
    println!("finished in {} ticks: {:?}", tick, search.phase());

    if !search.has_failed() {
        let path = search.retrace_path(&mut grid).unwrap();
        println!("path (intermediate cells): {:?}", path);
    }
    println!("{}", grid);
}
