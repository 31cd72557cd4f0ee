//! The incremental search engine: A* advanced one node expansion per call.

use fxhash::{FxBuildHasher, FxHashSet};
use grid_util::point::Point;
use indexmap::IndexSet;
use log::{info, warn};

use crate::error::{Result, SearchError};
use crate::grid::SearchGrid;
use crate::node::{NodeStatus, WorldPos};
use crate::octile_distance;

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Lifecycle of a search run. `Succeeded` and `Failed` are terminal until
/// the next [AstarSearch::reset]; a `Failed` run is a normal outcome (the
/// goal was unreachable), not an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Succeeded,
    Failed,
}

/// A cell-classification event produced while stepping or retracing, in the
/// order the classifications happened. Drivers forward these to whatever
/// presentation layer colours the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepEvent {
    pub pos: Point,
    pub status: NodeStatus,
}

/// A steppable A* search over a [SearchGrid].
///
/// The driver controls pacing entirely: call [step](Self::step) once per
/// tick for an animated search, or [run_to_completion](Self::run_to_completion)
/// for the whole answer at once. Both advance through the identical
/// single-expansion transition, so the results are the same state-for-state
/// however the search is driven. Abandoning a run is simply a matter of not
/// stepping any further, or of calling [reset](Self::reset) again.
///
/// The frontier is an insertion-ordered set scanned linearly for the
/// minimum `(f_cost, h_cost)` pair, ties going to the cell queued first.
/// Preferring the lower heuristic among equal f costs biases expansion
/// toward the straight line to the goal; the fixed scan order keeps
/// repeated runs bit-for-bit identical.
#[derive(Clone, Debug, Default)]
pub struct AstarSearch {
    phase: SearchPhase,
    start: usize,
    goal: usize,
    frontier: FxIndexSet<usize>,
    visited: FxHashSet<usize>,
    events: Vec<StepEvent>,
}

impl AstarSearch {
    pub fn new() -> AstarSearch {
        AstarSearch::default()
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Whether the search has reached a terminal phase.
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, SearchPhase::Succeeded | SearchPhase::Failed)
    }

    pub fn has_failed(&self) -> bool {
        self.phase == SearchPhase::Failed
    }

    /// The classification events emitted by the most recent call to
    /// [step](Self::step), [run_to_completion](Self::run_to_completion) or
    /// [retrace_path](Self::retrace_path).
    pub fn events(&self) -> &[StepEvent] {
        &self.events
    }

    /// Discards any in-flight state and seeds a new run from `start` to
    /// `goal`, both given as world positions and resolved by flooring.
    ///
    /// Endpoints must be distinct walkable cells. On error the engine is
    /// left [SearchPhase::Idle]; on success the start cell is queued with
    /// `g_cost = 0` (no event is emitted for the seed) and the phase is
    /// [SearchPhase::Searching].
    pub fn reset(&mut self, grid: &mut SearchGrid, start: WorldPos, goal: WorldPos) -> Result<()> {
        self.phase = SearchPhase::Idle;
        self.frontier.clear();
        self.visited.clear();
        self.events.clear();
        grid.reset_search_state();

        let start_pos = grid.grid_pos(start)?;
        let goal_pos = grid.grid_pos(goal)?;
        if !grid.is_walkable(start_pos) || !grid.is_walkable(goal_pos) || start_pos == goal_pos {
            return Err(SearchError::InvalidEndpoint {
                start: start_pos,
                goal: goal_pos,
            });
        }

        self.start = grid.ix(start_pos);
        self.goal = grid.ix(goal_pos);
        let start_node = &mut grid.nodes[self.start];
        start_node.g_cost = 0;
        start_node.status = NodeStatus::Open;
        self.frontier.insert(self.start);
        self.phase = SearchPhase::Searching;
        info!("searching from {} to {}", start_pos, goal_pos);
        Ok(())
    }

    /// Advances the search by exactly one node expansion and returns the
    /// classification events it produced. A no-op outside
    /// [SearchPhase::Searching].
    pub fn step(&mut self, grid: &mut SearchGrid) -> &[StepEvent] {
        self.events.clear();
        self.advance(grid);
        &self.events
    }

    /// Steps until the search reaches a terminal phase, returning every
    /// event produced along the way. Equivalent to calling
    /// [step](Self::step) externally the same number of times.
    pub fn run_to_completion(&mut self, grid: &mut SearchGrid) -> &[StepEvent] {
        self.events.clear();
        while self.phase == SearchPhase::Searching {
            self.advance(grid);
        }
        &self.events
    }

    /// Reconstructs the path by following parent links from the goal back
    /// to the start. The returned cells run start-adjacent-first to
    /// goal-adjacent-last and exclude both endpoints, which also never get
    /// the [NodeStatus::Path] classification the intermediate cells do.
    pub fn retrace_path(&mut self, grid: &mut SearchGrid) -> Result<Vec<Point>> {
        if self.phase != SearchPhase::Succeeded {
            return Err(SearchError::NoPathAvailable);
        }
        self.events.clear();
        let start = self.start;
        let nodes = &grid.nodes;
        let mut chain: Vec<usize> =
            itertools::unfold(nodes[self.goal].parent, |cursor| match *cursor {
                Some(ix) if ix != start => {
                    *cursor = nodes[ix].parent;
                    Some(ix)
                }
                _ => None,
            })
            .collect();
        for &ix in &chain {
            grid.nodes[ix].status = NodeStatus::Path;
            self.events.push(StepEvent {
                pos: grid.nodes[ix].pos,
                status: NodeStatus::Path,
            });
        }
        chain.reverse();
        Ok(chain.into_iter().map(|ix| grid.nodes[ix].pos).collect())
    }

    /// The single-expansion transition shared by [step](Self::step) and
    /// [run_to_completion](Self::run_to_completion).
    fn advance(&mut self, grid: &mut SearchGrid) {
        if self.phase != SearchPhase::Searching {
            return;
        }
        let Some(current) = self.select_next(grid) else {
            self.phase = SearchPhase::Failed;
            return;
        };
        self.frontier.shift_remove(&current);
        self.visited.insert(current);
        let current_pos = grid.nodes[current].pos;
        grid.nodes[current].status = NodeStatus::Closed;
        self.events.push(StepEvent {
            pos: current_pos,
            status: NodeStatus::Closed,
        });

        if current == self.goal {
            info!(
                "goal {} reached with cost {}",
                current_pos, grid.nodes[current].g_cost
            );
            self.phase = SearchPhase::Succeeded;
            return;
        }

        let current_g = grid.nodes[current].g_cost;
        let goal_pos = grid.nodes[self.goal].pos;
        for i in 0..grid.neighbours[current].len() {
            let neighbour = grid.neighbours[current][i];
            let neighbour_pos = grid.nodes[neighbour].pos;
            if !grid.is_walkable(neighbour_pos) || self.visited.contains(&neighbour) {
                continue;
            }
            let tentative = current_g + octile_distance(current_pos, neighbour_pos);
            let queued = self.frontier.contains(&neighbour);
            // A neighbour that has never been queued is relaxed even on a
            // cost tie, so its heuristic and parent are seeded on first
            // discovery; it is only inserted once either way.
            if tentative < grid.nodes[neighbour].g_cost || !queued {
                let node = &mut grid.nodes[neighbour];
                node.g_cost = tentative;
                node.h_cost = octile_distance(neighbour_pos, goal_pos);
                node.parent = Some(current);
                if !queued {
                    node.status = NodeStatus::Open;
                    self.frontier.insert(neighbour);
                    self.events.push(StepEvent {
                        pos: neighbour_pos,
                        status: NodeStatus::Open,
                    });
                }
            }
        }

        if self.frontier.is_empty() {
            warn!("frontier exhausted before reaching {}", goal_pos);
            self.phase = SearchPhase::Failed;
        }
    }

    /// Scans the frontier in insertion order for the cell with the lowest
    /// f cost, breaking ties by the lowest h cost. Strict comparisons keep
    /// the first-encountered cell on full ties.
    fn select_next(&self, grid: &SearchGrid) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &ix in &self.frontier {
            match best {
                None => best = Some(ix),
                Some(b) => {
                    let node = &grid.nodes[ix];
                    let best_node = &grid.nodes[b];
                    if node.f_cost() < best_node.f_cost()
                        || (node.f_cost() == best_node.f_cost() && node.h_cost < best_node.h_cost)
                    {
                        best = Some(ix);
                    }
                }
            }
        }
        best
    }
}
