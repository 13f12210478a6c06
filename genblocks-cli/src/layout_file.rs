//! Reading the JSON file that lists cells and templates.

use std::fs;
use std::path::Path;

use anyhow::Context as _;

use genblocks::content::{ContentLibrary, RoomTemplate};
use genblocks::generate::{FloorOrchestrator, GenerateError};
use genblocks::grid::{CellId, Grid};
use genblocks::math::{FreeCoordinate, FreePoint};

/// Contents of a layout file.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LayoutFile {
    #[serde(default)]
    pub(crate) cells: Vec<CellEntry>,
    #[serde(default)]
    pub(crate) templates: Vec<RoomTemplate>,
}

/// One cell of a layout file. The position is in world units and is snapped to the grid.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CellEntry {
    pub(crate) position: [FreeCoordinate; 3],
    #[serde(default)]
    pub(crate) locked: bool,
    #[serde(default)]
    pub(crate) stairs: bool,
}

impl LayoutFile {
    pub(crate) fn read(path: &Path) -> Result<Self, anyhow::Error> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse layout file {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub(crate) fn library(&self) -> ContentLibrary {
        self.templates.iter().cloned().collect()
    }

    /// Adds every cell to `grid`, in file order, with its flags.
    pub(crate) fn populate(
        &self,
        orchestrator: &FloorOrchestrator<'_>,
        grid: &mut Grid,
    ) -> Result<Vec<CellId>, GenerateError> {
        self.cells
            .iter()
            .map(|entry| {
                let id = orchestrator.add_cell(grid, FreePoint::from(entry.position))?;
                grid.set_locked(id, entry.locked);
                grid.set_stairs(id, entry.stairs);
                Ok(id)
            })
            .collect()
    }
}
