//! Writing placements and the report to stdout.

use std::io;

use genblocks::content::{ContentLibrary, ElevationRole};
use genblocks::generate::{GenerationReport, Placement};
use genblocks::grid::CellId;
use genblocks::math::{DirectionMask, GridCoordinate};

use crate::command_options::OutputFormat;

/// A [`Placement`] with the template named, as written in JSON output.
#[derive(Debug, serde::Serialize)]
struct PlacedRoom<'a> {
    cell: CellId,
    position: [GridCoordinate; 3],
    floor: GridCoordinate,
    template: &'a str,
    elevation: ElevationRole,
    rotation: i32,
    connections: DirectionMask,
}

#[derive(Debug, serde::Serialize)]
struct JsonOutput<'a> {
    placements: Vec<PlacedRoom<'a>>,
    report: &'a GenerationReport,
}

fn template_name<'a>(library: &'a ContentLibrary, placement: &Placement) -> &'a str {
    library
        .get(placement.template)
        .map_or("?", |template| template.name.as_str())
}

pub(crate) fn write(
    format: OutputFormat,
    out: &mut dyn io::Write,
    library: &ContentLibrary,
    placements: &[Placement],
    report: &GenerationReport,
) -> Result<(), anyhow::Error> {
    match format {
        OutputFormat::Text => write_text(out, library, placements, report)?,
        OutputFormat::Json => {
            let document = JsonOutput {
                placements: placements
                    .iter()
                    .map(|placement| PlacedRoom {
                        cell: placement.cell,
                        position: placement.position.to_array(),
                        floor: placement.floor,
                        template: template_name(library, placement),
                        elevation: placement.template.role,
                        rotation: placement.rotation.degrees(),
                        connections: placement.connections,
                    })
                    .collect(),
                report,
            };
            serde_json::to_writer_pretty(&mut *out, &document)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text(
    out: &mut dyn io::Write,
    library: &ContentLibrary,
    placements: &[Placement],
    report: &GenerationReport,
) -> io::Result<()> {
    for placement in placements {
        let [x, y, z] = placement.position.to_array();
        writeln!(
            out,
            "{cell} ({x}, {y}, {z}) floor {floor}: {name:?} rotated {rotation} for {connections}",
            cell = placement.cell,
            floor = placement.floor,
            name = template_name(library, placement),
            rotation = placement.rotation,
            connections = placement.connections,
        )?;
    }
    let GenerationReport {
        seed,
        floor_count,
        placements: placement_count,
        ref unmatched,
        ref isolated,
        ref duplicates_removed,
        ref locked,
        ..
    } = *report;
    match seed {
        Some(seed) => write!(out, "seed {seed}: ")?,
        None => write!(out, "unseeded: ")?,
    }
    writeln!(
        out,
        "{placement_count} placements on {floor_count} floors; {} unmatched, {} isolated, \
        {} duplicates removed, {} locked",
        unmatched.len(),
        isolated.len(),
        duplicates_removed.len(),
        locked.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use genblocks::content::RoomTemplate;
    use genblocks::generate::{FloorOrchestrator, GenerationConfig};
    use genblocks::grid::{Grid, LatticeProbe};
    use genblocks::math::GridPoint;
    use pretty_assertions::assert_eq;

    fn two_cells(format: OutputFormat) -> String {
        let library: ContentLibrary = [RoomTemplate::new("dead end", DirectionMask::FORWARD)]
            .into_iter()
            .collect();
        let mut config = GenerationConfig::new();
        config.seed = Some(3);
        let orchestrator = FloorOrchestrator::new(config, &library).unwrap();
        let mut grid = Grid::new();
        grid.add_cell(GridPoint::new(0, 0, 0));
        grid.add_cell(GridPoint::new(10, 0, 0));
        let probe = LatticeProbe::new(&grid, 10);
        let mut placements = Vec::new();
        let report = orchestrator
            .generate(&mut grid, &probe, &mut placements)
            .unwrap();

        let mut out = Vec::new();
        write(format, &mut out, &library, &placements, &report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text() {
        assert_eq!(
            two_cells(OutputFormat::Text),
            "#1 (10, 0, 0) floor 0: \"dead end\" rotated 270° for LEFT\n\
            #0 (0, 0, 0) floor 0: \"dead end\" rotated 90° for RIGHT\n\
            seed 3: 2 placements on 1 floors; 0 unmatched, 0 isolated, \
            0 duplicates removed, 0 locked\n"
        );
    }

    #[test]
    fn json() {
        let value: serde_json::Value = serde_json::from_str(&two_cells(OutputFormat::Json)).unwrap();
        assert_eq!(value["report"]["seed"], 3);
        assert_eq!(value["report"]["placements"], 2);
        let first = &value["placements"][0];
        assert_eq!(first["cell"], 1);
        assert_eq!(first["position"], serde_json::json!([10, 0, 0]));
        assert_eq!(first["template"], "dead end");
        assert_eq!(first["elevation"], "none");
        assert_eq!(first["rotation"], 270);
        assert_eq!(first["connections"], "LEFT");
    }
}
