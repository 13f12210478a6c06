//! Running a whole generation: configuration, the [`FloorOrchestrator`], and what it
//! reports.

use alloc::vec::Vec;

use rand::{Rng, SeedableRng as _};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::carve::{MazeCarver, open_plan};
use crate::content::{ContentLibrary, ElevationRole, TemplateId};
use crate::grid::{Cell, CellId, GeometryProbe, Grid, LayerMask};
use crate::math::{
    Direction, DirectionMask, FreeCoordinate, FreePoint, GridCoordinate, GridPoint, Rotation,
    snap_to_grid,
};
use crate::resolve::RoomResolver;

/// How the connections between cells are chosen.
#[expect(clippy::exhaustive_enums)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum GenerationMode {
    /// Carve a maze: each floor's cells are connected by a spanning tree of passages.
    #[default]
    Maze,
    /// Connect every pair of neighboring cells.
    OpenPlan,
}

/// When the [`FloorOrchestrator`] emits a placement for a cell during maze carving.
#[expect(clippy::exhaustive_enums)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PlacementTiming {
    /// Every time the carver takes the cell off its stack, using the passages carved so
    /// far. A cell may therefore be placed several times, and all but the last
    /// placement may not match its final passages.
    EveryVisit,
    /// Once, when the carver is finished with the cell.
    #[default]
    Final,
}

/// Parameters of a generation run.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
pub struct GenerationConfig {
    /// Spacing of the grid, in world units. Cell positions are snapped to multiples of
    /// this, and neighbors are probed for up to half of it away.
    pub grid_size: GridCoordinate,
    /// Size of each cell, and the height of each floor, in world units.
    pub block_size: GridCoordinate,
    /// How many cells the operator intends to provide stairs.
    ///
    /// This is reported but not enforced; stairs are placed where cells request them.
    pub stair_count: u32,
    /// Maze or open plan.
    pub mode: GenerationMode,
    /// Seed for [`FloorOrchestrator::generate()`]. If [`None`], a fresh seed is drawn
    /// and reported.
    pub seed: Option<u64>,
    /// Layers passed to the [`GeometryProbe`].
    pub layers: LayerMask,
    /// When placements are emitted in maze mode.
    pub placement_timing: PlacementTiming,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            block_size: 10,
            stair_count: 0,
            mode: GenerationMode::Maze,
            seed: None,
            layers: LayerMask::ALL,
            placement_timing: PlacementTiming::Final,
        }
    }
}

impl GenerationConfig {
    /// Constructs the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that the sizes are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if self.block_size <= 0 {
            return Err(ConfigError::BlockSize(self.block_size));
        }
        Ok(())
    }

    /// Returns how far from a cell's center to look for its neighbors.
    pub fn probe_distance(&self) -> FreeCoordinate {
        FreeCoordinate::from(self.grid_size) / 2.0
    }
}

/// Problems with the configuration or content which prevent generation from starting.
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The grid size is not positive.
    #[error("grid size must be positive, not {0}")]
    GridSize(GridCoordinate),
    /// The block size is not positive.
    #[error("block size must be positive, not {0}")]
    BlockSize(GridCoordinate),
    /// The content library has no templates at all.
    #[error("content library is empty")]
    EmptyLibrary,
    /// A cell needs a template from a pool that has none.
    #[error("cell {cell} needs a template with elevation role {role}, but there are none")]
    EmptyPool {
        /// The role whose pool is empty.
        role: ElevationRole,
        /// The first cell that needs it.
        cell: CellId,
    },
}

/// Errors from [`FloorOrchestrator`] operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// Generation could not start.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A position given to [`FloorOrchestrator::add_cell()`] cannot be snapped to the
    /// grid.
    #[error("position {position:?} cannot be placed on the grid")]
    InvalidPosition {
        /// The position as given.
        position: FreePoint,
    },
}

/// An instruction to the host to fill a cell with a template.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct Placement {
    /// The cell to fill.
    pub cell: CellId,
    /// The cell's position.
    pub position: GridPoint,
    /// The cell's floor.
    pub floor: GridCoordinate,
    /// The template to fill it with.
    pub template: TemplateId,
    /// How to turn the template about the vertical axis.
    pub rotation: Rotation,
    /// The connections the template was chosen for.
    pub connections: DirectionMask,
}

/// Receives the results of generation.
///
/// This is where the host instantiates (and removes) the content of cells.
pub trait PlacementSink {
    /// Fills a cell. The same cell may be placed more than once in a run if
    /// [`PlacementTiming::EveryVisit`] is configured.
    fn place(&mut self, placement: Placement);

    /// Removes whatever was previously placed in a cell.
    fn clear(&mut self, cell: CellId);
}

impl PlacementSink for Vec<Placement> {
    fn place(&mut self, placement: Placement) {
        self.push(placement);
    }

    fn clear(&mut self, cell: CellId) {
        self.retain(|placement| placement.cell != cell);
    }
}

impl<S: PlacementSink + ?Sized> PlacementSink for &mut S {
    fn place(&mut self, placement: Placement) {
        (**self).place(placement);
    }

    fn clear(&mut self, cell: CellId) {
        (**self).clear(cell);
    }
}

/// What happened during a generation run, other than the placements themselves.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct GenerationReport {
    /// The seed the random number generator was created from, if it was created by
    /// [`FloorOrchestrator::generate()`].
    pub seed: Option<u64>,
    /// The number of floors: the highest floor level plus one.
    pub floor_count: usize,
    /// The number of placements emitted.
    pub placements: usize,
    /// Cells for which no template fit, and which were left empty.
    pub unmatched: Vec<CellId>,
    /// Cells with no neighbors, which were skipped.
    pub isolated: Vec<CellId>,
    /// Cells removed because an earlier cell had the same position.
    pub duplicates_removed: Vec<CellId>,
    /// Locked cells, whose contents were left alone.
    pub locked: Vec<CellId>,
    /// The configured [`GenerationConfig::stair_count`].
    pub stairs_requested: u32,
    /// The number of cells that asked for stairs.
    pub stairs_flagged: usize,
}

/// Returns which pool a cell's template must come from.
///
/// Only cells flagged for stairs need vertical access: toward the floor above if there
/// is a cell there, otherwise toward the floor below if there is a cell there.
pub fn required_role(cell: &Cell) -> ElevationRole {
    if !cell.has_stairs() {
        ElevationRole::None
    } else if cell.neighbor(Direction::Up).is_some() {
        ElevationRole::Up
    } else if cell.neighbor(Direction::Down).is_some() {
        ElevationRole::Down
    } else {
        ElevationRole::None
    }
}

/// Drives generation over a [`Grid`]: finds neighbors, carves each floor, resolves a
/// template for every cell and hands the results to a [`PlacementSink`].
///
/// The orchestrator holds no state between runs; all of it lives in the grid.
#[derive(Clone, Debug)]
pub struct FloorOrchestrator<'a> {
    config: GenerationConfig,
    library: &'a ContentLibrary,
}

impl<'a> FloorOrchestrator<'a> {
    /// Checks the configuration and library, and constructs an orchestrator.
    pub fn new(config: GenerationConfig, library: &'a ContentLibrary) -> Result<Self, ConfigError> {
        config.validate()?;
        if library.is_empty() {
            return Err(ConfigError::EmptyLibrary);
        }
        Ok(Self { config, library })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Adds a cell at `position`, snapped to the grid.
    pub fn add_cell(&self, grid: &mut Grid, position: FreePoint) -> Result<CellId, GenerateError> {
        let snapped = snap_to_grid(position, self.config.grid_size)
            .ok_or(GenerateError::InvalidPosition { position })?;
        Ok(grid.add_cell(snapped))
    }

    /// Removes every cell, locked or not, along with its contents.
    pub fn clear_all<S: PlacementSink + ?Sized>(&self, grid: &mut Grid, sink: &mut S) {
        for id in grid.ids() {
            sink.clear(id);
        }
        grid.clear();
    }

    /// Removes the contents of every cell that is not locked, and returns how many
    /// cells were cleared.
    pub fn clear_terrain<S: PlacementSink + ?Sized>(&self, grid: &Grid, sink: &mut S) -> usize {
        let mut cleared = 0;
        for (id, cell) in grid.iter() {
            if !cell.is_locked() {
                sink.clear(id);
                cleared += 1;
            }
        }
        cleared
    }

    /// Runs generation with a random number generator seeded from
    /// [`GenerationConfig::seed`], or from a fresh seed which is logged and reported.
    pub fn generate<P, S>(
        &self,
        grid: &mut Grid,
        probe: &P,
        sink: &mut S,
    ) -> Result<GenerationReport, GenerateError>
    where
        P: GeometryProbe + ?Sized,
        S: PlacementSink + ?Sized,
    {
        let seed = match self.config.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::rng().random();
                log::info!("no seed configured; using seed {seed}");
                seed
            }
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut report = self.generate_with_rng(grid, probe, sink, &mut rng)?;
        report.seed = Some(seed);
        Ok(report)
    }

    /// Runs generation, drawing every random choice from `rng`.
    ///
    /// Nothing is placed or cleared if this returns an error.
    pub fn generate_with_rng<P, S, R>(
        &self,
        grid: &mut Grid,
        probe: &P,
        sink: &mut S,
        rng: &mut R,
    ) -> Result<GenerationReport, GenerateError>
    where
        P: GeometryProbe + ?Sized,
        S: PlacementSink + ?Sized,
        R: Rng + ?Sized,
    {
        let config = &self.config;

        // Prepared on a copy, so that a configuration error leaves the grid as it was.
        let mut staged = grid.clone();
        let duplicates_removed = staged.deduplicate();
        staged.reset_carve_state();
        staged.compute_all_adjacency(probe, config.probe_distance(), config.layers);
        let floor_count = staged.assign_floor_levels(config.block_size);
        self.check_pools(&staged)?;
        *grid = staged;

        let mut report = GenerationReport {
            floor_count,
            duplicates_removed,
            stairs_requested: config.stair_count,
            ..GenerationReport::default()
        };

        for &id in &report.duplicates_removed {
            sink.clear(id);
        }
        for (id, cell) in grid.iter() {
            if cell.is_locked() {
                report.locked.push(id);
            } else {
                sink.clear(id);
            }
            if cell.is_isolated() {
                report.isolated.push(id);
            }
            if cell.has_stairs() {
                report.stairs_flagged += 1;
            }
        }
        if usize::try_from(config.stair_count).is_ok_and(|n| n != report.stairs_flagged) {
            log::info!(
                "{flagged} cells are flagged for stairs; the configured stair count of \
                {requested} is not enforced",
                flagged = report.stairs_flagged,
                requested = config.stair_count,
            );
        }

        let resolver = RoomResolver::new(self.library);
        for (floor, ids) in grid.floor_groups() {
            let mut members: Vec<CellId> = ids
                .into_iter()
                .filter(|&id| grid.get(id).is_some_and(|cell| !cell.is_isolated()))
                .collect();
            // Lowest first, then insertion order.
            members.sort_by_key(|&id| (grid.get(id).map(|cell| cell.position().y), id));
            log::debug!("floor {floor}: carving {} cells", members.len());

            match config.mode {
                GenerationMode::OpenPlan => {
                    open_plan(grid, members.iter().copied());
                    for &id in &members {
                        self.place_cell(grid, id, true, &resolver, sink, rng, &mut report);
                    }
                }
                GenerationMode::Maze => {
                    grant_vertical_access(grid, &members);
                    let mut carver = MazeCarver::new(members.iter().copied());
                    for &start in &members {
                        if grid.get(start).is_none_or(Cell::is_visited) {
                            continue;
                        }
                        carver.start(start);
                        while !carver.is_finished() {
                            let Some(step) = carver.step(grid, rng) else {
                                continue;
                            };
                            let last = step.finalizes();
                            if last || config.placement_timing == PlacementTiming::EveryVisit {
                                self.place_cell(
                                    grid,
                                    step.cell,
                                    last,
                                    &resolver,
                                    sink,
                                    rng,
                                    &mut report,
                                );
                            }
                        }
                    }
                }
            }
        }

        log::info!(
            "generated {} placements on {} floors; {} unmatched, {} isolated, {} duplicates removed",
            report.placements,
            report.floor_count,
            report.unmatched.len(),
            report.isolated.len(),
            report.duplicates_removed.len(),
        );
        Ok(report)
    }

    /// Checks that every cell that will be placed has a nonempty pool to draw from.
    fn check_pools(&self, grid: &Grid) -> Result<(), ConfigError> {
        for (id, cell) in grid.iter() {
            if cell.is_isolated() || cell.is_locked() {
                continue;
            }
            let role = required_role(cell);
            if self.library.pool(role).is_empty() {
                return Err(ConfigError::EmptyPool { role, cell: id });
            }
        }
        Ok(())
    }

    /// Resolves and places one cell. `last` is whether the cell's connections are final;
    /// only then does a failure to match count as unmatched.
    #[expect(clippy::too_many_arguments)]
    fn place_cell<S, R>(
        &self,
        grid: &Grid,
        id: CellId,
        last: bool,
        resolver: &RoomResolver<'_>,
        sink: &mut S,
        rng: &mut R,
        report: &mut GenerationReport,
    ) where
        S: PlacementSink + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(cell) = grid.get(id) else {
            return;
        };
        if cell.is_locked() {
            return;
        }
        let role = required_role(cell);
        let connections = cell.used_paths();
        match resolver.pick_random(connections, role, cell.floor_level(), rng) {
            Some(choice) => {
                sink.place(Placement {
                    cell: id,
                    position: cell.position(),
                    floor: cell.floor_level(),
                    template: choice.template,
                    rotation: choice.rotation,
                    connections,
                });
                report.placements += 1;
            }
            None if last => {
                log::warn!("no {role} template fits cell {id} with connections {connections}");
                // Drop anything placed for this cell on an earlier visit.
                sink.clear(id);
                if !report.unmatched.contains(&id) {
                    report.unmatched.push(id);
                }
            }
            None => {
                log::trace!("no {role} template fits cell {id} with connections {connections} yet");
            }
        }
    }
}

/// Opens the vertical connections of cells flagged for stairs. Carving only considers
/// horizontal connections, so these are kept.
fn grant_vertical_access(grid: &mut Grid, members: &[CellId]) {
    for &id in members {
        if let Some(cell) = grid.get_mut(id) {
            if cell.has_stairs() {
                let vertical = cell.adjacency().vertical();
                cell.set_used_paths(vertical);
            }
        }
    }
}
