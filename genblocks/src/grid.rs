//! The [`Grid`] of cells to be generated, and how cells discover their neighbors.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::math::{
    Direction, DirectionMap, DirectionMask, FreeCoordinate, FreePoint, GridCoordinate, GridPoint,
};

/// Identifies a [`Cell`] within its [`Grid`].
///
/// Identifiers are assigned in increasing order as cells are added, and are never
/// reused by the same grid (until [`Grid::clear()`]), so comparing them compares
/// insertion order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CellId(u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One placeable block of the generation grid.
///
/// Cells are owned by a [`Grid`] and refer to each other only by [`CellId`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cell {
    position: GridPoint,
    locked: bool,
    stairs: bool,
    floor_level: GridCoordinate,

    /// Directions in which the geometry probe found a neighbor.
    adjacency: DirectionMask,
    neighbors: DirectionMap<Option<CellId>>,

    // Carve state. Reset at the start of each generation run.
    used_paths: DirectionMask,
    visited: bool,
    dead_end: bool,
}

impl Cell {
    fn new(position: GridPoint) -> Self {
        Self {
            position,
            locked: false,
            stairs: false,
            floor_level: 0,
            adjacency: DirectionMask::empty(),
            neighbors: DirectionMap::default(),
            used_paths: DirectionMask::empty(),
            visited: false,
            dead_end: false,
        }
    }

    /// Returns the cell's position in world units.
    pub fn position(&self) -> GridPoint {
        self.position
    }

    /// Returns the cell's position as a free point, for probing.
    pub fn center(&self) -> FreePoint {
        self.position.to_f64()
    }

    /// Returns whether the operator has protected this cell from regeneration.
    ///
    /// Locked cells still take part in adjacency and carving, so that their neighbors
    /// connect to them, but their contents are never cleared or replaced.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns whether the operator has asked for this cell to provide vertical access.
    pub fn has_stairs(&self) -> bool {
        self.stairs
    }

    /// Returns the floor this cell was assigned to by [`Grid::assign_floor_levels()`].
    pub fn floor_level(&self) -> GridCoordinate {
        self.floor_level
    }

    /// Returns the directions in which this cell has a neighbor.
    pub fn adjacency(&self) -> DirectionMask {
        self.adjacency
    }

    /// Returns the neighbor in the given direction, if any.
    pub fn neighbor(&self, direction: Direction) -> Option<CellId> {
        self.neighbors[direction]
    }

    /// Returns the neighbors in all directions.
    pub fn neighbors(&self) -> &DirectionMap<Option<CellId>> {
        &self.neighbors
    }

    /// Returns the subset of [`Self::adjacency()`] that generation chose to connect.
    pub fn used_paths(&self) -> DirectionMask {
        self.used_paths
    }

    /// Returns whether this cell has no neighbors, and therefore takes no part in
    /// generation.
    pub fn is_isolated(&self) -> bool {
        self.adjacency.is_isolated()
    }

    /// Returns whether the carver has visited this cell.
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Returns whether the carver has finished with this cell.
    pub fn is_dead_end(&self) -> bool {
        self.dead_end
    }

    pub(crate) fn set_used_paths(&mut self, mask: DirectionMask) {
        self.used_paths = mask;
    }

    pub(crate) fn open_path(&mut self, direction: Direction) {
        self.used_paths |= direction.mask();
    }

    pub(crate) fn mark_visited(&mut self) {
        self.visited = true;
    }

    pub(crate) fn mark_dead_end(&mut self) {
        self.dead_end = true;
    }

    fn forget_neighbor(&mut self, direction: Direction) {
        self.neighbors[direction] = None;
        self.adjacency.remove(direction.mask());
        self.used_paths.remove(direction.mask());
    }
}

/// A set of physics layers that a [`GeometryProbe`] should consider.
///
/// Hosts with a physics engine map these onto their own collision layers; the
/// built-in [`LatticeProbe`] places every cell on a single layer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LayerMask(u32);

impl LayerMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// No layers; probes with this mask never hit anything.
    pub const NONE: Self = Self(0);

    /// Constructs a mask containing exactly the given layer, or [`Self::NONE`] if the
    /// layer number is 32 or more.
    pub fn layer(layer: u8) -> Self {
        match 1u32.checked_shl(u32::from(layer)) {
            Some(bit) => Self(bit),
            None => Self::NONE,
        }
    }

    /// Returns whether the given layer is in this mask.
    pub fn includes(self, layer: u8) -> bool {
        Self::layer(layer).0 & self.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Finds the cell, if any, that lies next to a point in some direction.
///
/// This is how cells learn about their neighbors: a host that keeps cells in a physics
/// scene implements this as a raycast against the cells' colliders.
pub trait GeometryProbe {
    /// Returns the nearest cell hit by a ray of length `max_distance` from `origin`
    /// toward `direction`, considering only cells on the given `layers`.
    ///
    /// A cell whose volume contains `origin` must not be reported.
    fn probe(
        &self,
        origin: FreePoint,
        direction: Direction,
        max_distance: FreeCoordinate,
        layers: LayerMask,
    ) -> Option<CellId>;
}

impl<P: GeometryProbe + ?Sized> GeometryProbe for &P {
    fn probe(
        &self,
        origin: FreePoint,
        direction: Direction,
        max_distance: FreeCoordinate,
        layers: LayerMask,
    ) -> Option<CellId> {
        (**self).probe(origin, direction, max_distance, layers)
    }
}

/// A [`GeometryProbe`] for hosts without a physics engine, which treats each cell of a
/// [`Grid`] as an axis-aligned cube centered on the cell's position.
///
/// The probe keeps its own copy of the cell positions, so it does not borrow the grid
/// and must be rebuilt if cells are added or moved.
#[derive(Clone, Debug)]
pub struct LatticeProbe {
    cells: Vec<(CellId, FreePoint)>,
    half_extent: FreeCoordinate,
    layer: u8,
}

impl LatticeProbe {
    /// Builds a probe over the current cells of `grid`, each of which is a cube whose
    /// edges are `block_size` long.
    pub fn new(grid: &Grid, block_size: GridCoordinate) -> Self {
        Self {
            cells: grid.iter().map(|(id, cell)| (id, cell.center())).collect(),
            half_extent: FreeCoordinate::from(block_size) / 2.0,
            layer: 0,
        }
    }

    /// Places every cell on the given layer instead of layer 0.
    #[must_use]
    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    /// Returns the distance along the ray at which it enters the cube centered on
    /// `center`, or [`None`] if the ray's line misses the cube.
    fn entry_distance(
        &self,
        origin: FreePoint,
        direction: Direction,
        center: FreePoint,
    ) -> Option<FreeCoordinate> {
        let offset = center - origin;
        let unit = direction.offset().to_f64();
        let along = offset.dot(unit);
        let across = offset - unit * along;
        // Grazing an edge does not count as a hit.
        if across.x.abs() >= self.half_extent
            || across.y.abs() >= self.half_extent
            || across.z.abs() >= self.half_extent
        {
            return None;
        }
        Some(along - self.half_extent)
    }
}

impl GeometryProbe for LatticeProbe {
    fn probe(
        &self,
        origin: FreePoint,
        direction: Direction,
        max_distance: FreeCoordinate,
        layers: LayerMask,
    ) -> Option<CellId> {
        if !layers.includes(self.layer) {
            return None;
        }
        self.cells
            .iter()
            .filter_map(|&(id, center)| {
                let distance = self.entry_distance(origin, direction, center)?;
                // A negative entry distance means the origin is inside the cube.
                (0.0..=max_distance)
                    .contains(&distance)
                    .then_some((distance, id))
            })
            // Ties go to the earliest cell, which is the one deduplication keeps.
            .min_by(|(d1, id1), (d2, id2)| d1.total_cmp(d2).then(id1.cmp(id2)))
            .map(|(_, id)| id)
    }
}

/// All the cells taking part in generation.
///
/// Cells are kept in insertion order; iteration and every tie-break within generation
/// follow that order, which keeps runs deterministic.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    cells: BTreeMap<CellId, Cell>,
    next_id: u32,
}

impl Grid {
    /// Constructs an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell at the given position and returns its identifier.
    ///
    /// This does not check for an existing cell at the same position;
    /// see [`Grid::deduplicate()`].
    pub fn add_cell(&mut self, position: GridPoint) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;
        self.cells.insert(id, Cell::new(position));
        id
    }

    /// Removes a cell, and any other cell's record of it as a neighbor.
    pub fn remove_cell(&mut self, id: CellId) -> Option<Cell> {
        let removed = self.cells.remove(&id)?;
        for cell in self.cells.values_mut() {
            for direction in Direction::ALL {
                if cell.neighbors[direction] == Some(id) {
                    cell.forget_neighbor(direction);
                }
            }
        }
        Some(removed)
    }

    /// Removes all cells.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.next_id = 0;
    }

    /// Returns the cell with the given identifier.
    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(&id)
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns whether there are no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over all cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.cells.iter().map(|(&id, cell)| (id, cell))
    }

    /// Iterates over all cell identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.keys().copied()
    }

    /// Returns the earliest-added cell at the given position.
    pub fn find_at(&self, position: GridPoint) -> Option<CellId> {
        self.iter()
            .find(|(_, cell)| cell.position == position)
            .map(|(id, _)| id)
    }

    /// Sets whether a cell is locked. Returns false if there is no such cell.
    pub fn set_locked(&mut self, id: CellId, locked: bool) -> bool {
        let Some(cell) = self.get_mut(id) else {
            return false;
        };
        cell.locked = locked;
        true
    }

    /// Sets whether a cell should provide vertical access. Returns false if there is no
    /// such cell.
    pub fn set_stairs(&mut self, id: CellId, stairs: bool) -> bool {
        let Some(cell) = self.get_mut(id) else {
            return false;
        };
        cell.stairs = stairs;
        true
    }

    /// Removes every cell that shares its position with an earlier-added cell, and returns
    /// the identifiers of the removed cells in insertion order.
    pub fn deduplicate(&mut self) -> Vec<CellId> {
        let mut first_at: HashMap<GridPoint, CellId> = HashMap::new();
        let mut duplicates = Vec::new();
        for (id, cell) in self.iter() {
            if let Some(&original) = first_at.get(&cell.position) {
                log::warn!(
                    "removing cell {id} at {:?}, which duplicates cell {original}",
                    cell.position.to_array()
                );
                duplicates.push(id);
            } else {
                first_at.insert(cell.position, id);
            }
        }
        for &id in &duplicates {
            self.remove_cell(id);
        }
        duplicates
    }

    /// Asks `probe` for the neighbors of one cell, replacing its previous adjacency.
    ///
    /// Afterward, the cell's adjacency has exactly the directions in which it has a
    /// neighbor. Probe results naming the cell itself or a cell not in this grid are
    /// ignored.
    pub fn compute_adjacency<P: GeometryProbe + ?Sized>(
        &mut self,
        id: CellId,
        probe: &P,
        max_distance: FreeCoordinate,
        layers: LayerMask,
    ) -> Option<DirectionMask> {
        let origin = self.get(id)?.center();
        let neighbors = DirectionMap::from_fn(|direction| {
            probe
                .probe(origin, direction, max_distance, layers)
                .filter(|&hit| hit != id && self.cells.contains_key(&hit))
        });
        let cell = self.get_mut(id)?;
        cell.adjacency = neighbors.present();
        cell.neighbors = neighbors;
        Some(cell.adjacency)
    }

    /// [`Grid::compute_adjacency()`] for every cell.
    pub fn compute_all_adjacency<P: GeometryProbe + ?Sized>(
        &mut self,
        probe: &P,
        max_distance: FreeCoordinate,
        layers: LayerMask,
    ) {
        let ids: Vec<CellId> = self.ids().collect();
        for id in ids {
            self.compute_adjacency(id, probe, max_distance, layers);
        }
    }

    /// Sets every cell's floor level to its height divided by `block_size`, and returns
    /// the number of floors (the highest level plus one, or zero if there are no cells).
    ///
    /// `block_size` must be positive.
    pub fn assign_floor_levels(&mut self, block_size: GridCoordinate) -> usize {
        let mut floor_count = 0;
        for cell in self.cells.values_mut() {
            cell.floor_level = cell.position.y.div_euclid(block_size);
            let level = usize::try_from(cell.floor_level).unwrap_or(0);
            floor_count = floor_count.max(level + 1);
        }
        floor_count
    }

    /// Returns the cells on each floor, in insertion order, as last assigned by
    /// [`Grid::assign_floor_levels()`].
    pub fn floor_groups(&self) -> BTreeMap<GridCoordinate, Vec<CellId>> {
        let mut groups: BTreeMap<GridCoordinate, Vec<CellId>> = BTreeMap::new();
        for (id, cell) in self.iter() {
            groups.entry(cell.floor_level).or_default().push(id);
        }
        groups
    }

    /// Clears every cell's carve state: used paths, visited, and dead end.
    pub fn reset_carve_state(&mut self) {
        for cell in self.cells.values_mut() {
            cell.used_paths = DirectionMask::empty();
            cell.visited = false;
            cell.dead_end = false;
        }
    }
}
