//! Binary which runs generation on a layout file and prints the placements.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use clap::Parser as _;

use genblocks::generate::FloorOrchestrator;
use genblocks::grid::{Grid, LatticeProbe};

mod command_options;
use command_options::GenblocksArgs;
mod layout_file;
use layout_file::LayoutFile;
mod logging;
mod output;

fn main() -> Result<(), anyhow::Error> {
    let options = GenblocksArgs::parse();
    logging::install(&options.logging)?;

    let layout = LayoutFile::read(&options.layout)?;
    let library = layout.library();
    let orchestrator = FloorOrchestrator::new(options.generation_config(), &library)?;
    log::debug!(
        "{} cells, {} templates, {} mode",
        layout.cells.len(),
        library.len(),
        orchestrator.config().mode
    );

    let mut grid = Grid::new();
    layout.populate(&orchestrator, &mut grid)?;
    let probe = LatticeProbe::new(&grid, orchestrator.config().block_size);
    let mut placements = Vec::new();
    let report = orchestrator.generate(&mut grid, &probe, &mut placements)?;

    output::write(
        options.format,
        &mut std::io::stdout().lock(),
        &library,
        &placements,
        &report,
    )
}
