//! Command line option parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use genblocks::generate::{GenerationConfig, GenerationMode, PlacementTiming};
use genblocks::math::GridCoordinate;

use crate::logging::LoggingArgs;

#[derive(Clone, Debug, Parser)]
#[command(
    name = "genblocks", author, about, version,
    help_template = "\
{name} {version}
{about-with-newline}
{usage-heading}
    {usage}

{all-args}{after-help}",
)]
pub(crate) struct GenblocksArgs {
    /// JSON file listing the cells to generate and the room templates to fill them with.
    #[arg(value_name = "LAYOUT")]
    pub(crate) layout: PathBuf,

    /// Spacing of the grid. Cell positions are snapped to multiples of this.
    #[arg(
        long = "grid-size",
        value_name = "UNITS",
        default_value_t = 10,
        allow_negative_numbers = true
    )]
    pub(crate) grid_size: GridCoordinate,

    /// Size of each cell, and the height of each floor.
    #[arg(
        long = "block-size",
        value_name = "UNITS",
        default_value_t = 10,
        allow_negative_numbers = true
    )]
    pub(crate) block_size: GridCoordinate,

    /// How cells are connected: a maze of passages, or every neighbor connected.
    #[arg(long = "mode", value_enum, default_value = "maze")]
    pub(crate) mode: ModeArg,

    /// Seed value for the random choices.
    ///
    /// May be an integer between 0 and 18446744073709551615 (2⁶⁴ - 1).
    ///
    /// If not specified, a randomly chosen seed will be used and reported.
    #[arg(long = "seed")]
    pub(crate) seed: Option<u64>,

    /// How many stairs are intended. Reported, not enforced.
    #[arg(long = "stair-count", value_name = "N", default_value_t = 0)]
    pub(crate) stair_count: u32,

    /// Emit a placement every time the maze carver visits a cell, rather than once
    /// per cell when it is finished.
    #[arg(long = "every-visit")]
    pub(crate) every_visit: bool,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "text")]
    pub(crate) format: OutputFormat,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
}

impl GenblocksArgs {
    /// Construct the [`GenerationConfig`] these options describe. It is not validated.
    pub(crate) fn generation_config(&self) -> GenerationConfig {
        let mut config = GenerationConfig::new();
        config.grid_size = self.grid_size;
        config.block_size = self.block_size;
        config.mode = match self.mode {
            ModeArg::Maze => GenerationMode::Maze,
            ModeArg::OpenPlan => GenerationMode::OpenPlan,
        };
        config.seed = self.seed;
        config.stair_count = self.stair_count;
        config.placement_timing = if self.every_visit {
            PlacementTiming::EveryVisit
        } else {
            PlacementTiming::Final
        };
        config
    }
}

/// Command-line names for [`GenerationMode`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ModeArg {
    /// Carve a maze on each floor.
    Maze,
    /// Connect every pair of neighboring cells.
    OpenPlan,
}

/// How the result is written to stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One line per placement, then a summary line.
    Text,
    /// A JSON document with the placements and the report.
    Json,
}
