//! Choosing which of the physical connections between cells become passages.
//!
//! [`MazeCarver`] implements recursive backtracking with an explicit stack, producing a
//! spanning tree of the horizontal connections among a set of cells.
//! [`open_plan()`] is the alternative which keeps every connection.

use alloc::vec::Vec;

use arrayvec::ArrayVec;
use hashbrown::HashSet;
use rand::Rng;
use rand::seq::IndexedRandom as _;

use crate::grid::{CellId, Grid};
use crate::math::Direction;

/// What happened when the carver took a cell off its stack.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CarveOutcome {
    /// A passage was opened from the cell to an unvisited neighbor, and both were put
    /// back on the stack.
    Extended {
        /// Direction of the passage, from the popped cell.
        direction: Direction,
        /// The neighbor the passage leads to.
        to: CellId,
    },
    /// The cell had no unvisited neighbors left and is now finished.
    DeadEnd,
    /// The cell was already finished; nothing changed.
    AlreadyDeadEnd,
}

/// One step of a [`MazeCarver`]: a cell taken off the stack, and what was done with it.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CarveStep {
    /// The cell taken off the stack.
    pub cell: CellId,
    /// What happened to it.
    pub outcome: CarveOutcome,
}

impl CarveStep {
    /// Returns whether this step is the one after which the cell's used paths will not
    /// change again during this carve.
    pub fn finalizes(&self) -> bool {
        self.outcome == CarveOutcome::DeadEnd
    }
}

/// Recursive-backtracking maze carver over the horizontal connections of a set of cells.
///
/// Each cell passes through three states: unvisited, visited, and dead end. Carving
/// from a start cell visits every cell reachable from it through horizontal neighbors
/// in the carver's member set, and the passages it opens form a spanning tree of them.
///
/// The carver is a state machine; call [`MazeCarver::step()`] until
/// [`MazeCarver::is_finished()`], or use [`MazeCarver::run()`].
#[derive(Clone, Debug)]
pub struct MazeCarver {
    members: HashSet<CellId>,
    stack: Vec<CellId>,
}

impl MazeCarver {
    /// Creates a carver which may only connect cells in `members`.
    ///
    /// Typically the members are the non-isolated cells of one floor.
    pub fn new(members: impl IntoIterator<Item = CellId>) -> Self {
        Self {
            members: members.into_iter().collect(),
            stack: Vec::new(),
        }
    }

    /// Begins carving from `start`.
    ///
    /// If a previous carve is still in progress, it continues after this one finishes.
    pub fn start(&mut self, start: CellId) {
        self.stack.push(start);
    }

    /// Returns whether there is nothing left to carve.
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    /// Takes one cell off the stack and carves from it.
    ///
    /// Returns [`None`] when the stack is empty, or if the popped cell no longer exists
    /// in `grid`.
    pub fn step<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R) -> Option<CarveStep> {
        let cell_id = self.stack.pop()?;
        let cell = grid.get(cell_id)?;

        if cell.is_dead_end() {
            return Some(CarveStep {
                cell: cell_id,
                outcome: CarveOutcome::AlreadyDeadEnd,
            });
        }

        let viable: ArrayVec<(Direction, CellId), 4> = Direction::HORIZONTAL_CLOCKWISE
            .into_iter()
            .filter_map(|direction| {
                let neighbor_id = cell.neighbor(direction)?;
                let neighbor = grid.get(neighbor_id)?;
                (self.members.contains(&neighbor_id)
                    && !neighbor.is_visited()
                    && !neighbor.is_dead_end())
                .then_some((direction, neighbor_id))
            })
            .collect();
        let choice = viable.choose(rng).copied();

        let cell = grid.get_mut(cell_id)?;
        cell.mark_visited();
        let outcome = match choice {
            Some((direction, neighbor_id)) => {
                cell.open_path(direction);
                if let Some(neighbor) = grid.get_mut(neighbor_id) {
                    neighbor.open_path(direction.opposite());
                }
                self.stack.push(cell_id);
                self.stack.push(neighbor_id);
                CarveOutcome::Extended {
                    direction,
                    to: neighbor_id,
                }
            }
            None => {
                cell.mark_dead_end();
                CarveOutcome::DeadEnd
            }
        };
        Some(CarveStep {
            cell: cell_id,
            outcome,
        })
    }

    /// Runs [`MazeCarver::step()`] until finished, passing every step to `on_step`.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        mut on_step: impl FnMut(&Grid, CarveStep),
    ) {
        while !self.is_finished() {
            if let Some(step) = self.step(grid, rng) {
                on_step(grid, step);
            }
        }
    }
}

/// Marks every connection of the given cells as used, without carving.
pub fn open_plan(grid: &mut Grid, cells: impl IntoIterator<Item = CellId>) {
    for id in cells {
        if let Some(cell) = grid.get_mut(id) {
            let adjacency = cell.adjacency();
            cell.set_used_paths(adjacency);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{LatticeProbe, LayerMask};
    use crate::math::{DirectionMask, GridPoint};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng as _;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn square_grid(width: i32, depth: i32) -> Grid {
        let mut grid = Grid::new();
        for x in 0..width {
            for z in 0..depth {
                grid.add_cell(GridPoint::new(x * 10, 0, z * 10));
            }
        }
        let probe = LatticeProbe::new(&grid, 10);
        grid.compute_all_adjacency(&probe, 5.0, LayerMask::ALL);
        grid
    }

    fn carve_all(grid: &mut Grid, seed: u64) -> Vec<CarveStep> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut carver = MazeCarver::new(grid.ids().collect::<Vec<_>>());
        if let Some(start) = grid.ids().next() {
            carver.start(start);
        }
        let mut steps = Vec::new();
        carver.run(grid, &mut rng, |_, step| steps.push(step));
        steps
    }

    /// Counts passages, each of which is recorded on both of its cells.
    fn edge_count(grid: &Grid) -> u32 {
        grid.iter()
            .map(|(_, cell)| cell.used_paths().opening_count())
            .sum::<u32>()
            / 2
    }

    #[test]
    fn carves_spanning_tree() {
        for seed in 0..20 {
            let mut grid = square_grid(3, 3);
            carve_all(&mut grid, seed);
            assert_eq!(edge_count(&grid), 8, "seed {seed}");
            for (id, cell) in grid.iter() {
                assert!(cell.is_dead_end(), "{id}");
                assert!(!cell.used_paths().is_empty(), "{id}");
                assert!(cell.adjacency().contains(cell.used_paths()), "{id}");
            }
        }
    }

    #[test]
    fn passages_are_recorded_on_both_sides() {
        let mut grid = square_grid(4, 2);
        carve_all(&mut grid, 7);
        for (_, cell) in grid.iter() {
            for direction in cell.used_paths().directions() {
                let neighbor = grid.get(cell.neighbor(direction).unwrap()).unwrap();
                assert!(neighbor.used_paths().has(direction.opposite()));
            }
        }
    }

    #[test]
    fn each_cell_finalized_once() {
        let mut grid = square_grid(3, 3);
        let steps = carve_all(&mut grid, 3);
        let mut finalized: Vec<CellId> =
            steps.iter().filter(|s| s.finalizes()).map(|s| s.cell).collect();
        finalized.sort();
        assert_eq!(finalized, grid.ids().collect::<Vec<_>>());
        // Every passage is opened by exactly one step.
        let extensions = steps
            .iter()
            .filter(|s| matches!(s.outcome, CarveOutcome::Extended { .. }))
            .count();
        assert_eq!(extensions, 8);
    }

    #[test]
    fn only_members_are_carved() {
        let mut grid = square_grid(3, 1);
        let ids: Vec<CellId> = grid.ids().collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let mut carver = MazeCarver::new([ids[0], ids[1]]);
        carver.start(ids[0]);
        carver.run(&mut grid, &mut rng, |_, _| {});
        assert_eq!(grid.get(ids[0]).unwrap().used_paths(), DirectionMask::RIGHT);
        assert_eq!(grid.get(ids[1]).unwrap().used_paths(), DirectionMask::LEFT);
        assert!(!grid.get(ids[2]).unwrap().is_visited());
    }

    #[test]
    fn same_seed_same_maze() {
        let mut a = square_grid(5, 5);
        let mut b = square_grid(5, 5);
        let steps_a = carve_all(&mut a, 99);
        let steps_b = carve_all(&mut b, 99);
        assert_eq!(steps_a, steps_b);
        let paths = |g: &Grid| g.iter().map(|(_, c)| c.used_paths()).collect::<Vec<_>>();
        assert_eq!(paths(&a), paths(&b));
    }

    #[test]
    fn open_plan_uses_all_adjacency() {
        let mut grid = square_grid(3, 3);
        let ids: Vec<CellId> = grid.ids().collect();
        open_plan(&mut grid, ids);
        for (_, cell) in grid.iter() {
            assert_eq!(cell.used_paths(), cell.adjacency());
        }
        assert_eq!(edge_count(&grid), 12);
    }
}
