use crate::cli::NeighborsArgs;
use crate::error::{CliError, Result};
use atomdesc::core::geometry::cell_list::{CellList, Cutoff};
use atomdesc::core::io::{traits::StructureFile, xyz::XyzFile};
use std::io::Write;
use tracing::{debug, info};

/// One `(atom, neighbor, distance)` entry of the neighbor table.
pub type NeighborRow = (usize, usize, f64);

pub fn run(args: NeighborsArgs) -> Result<()> {
    info!("Loading input structures from {:?}", &args.input);
    let structures =
        XyzFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;
    let structure = structures.get(args.frame).ok_or_else(|| {
        CliError::Argument(format!(
            "Frame {} requested, but '{}' holds {} frame(s)",
            args.frame,
            args.input.display(),
            structures.len()
        ))
    })?;

    let cutoff = Cutoff::try_from(args.cutoff)?;
    let cell_list = CellList::new(structure.positions(), cutoff);
    info!(
        n_atoms = cell_list.len(),
        cutoff = cutoff.radius(),
        grid = ?cell_list.grid_shape(),
        "Built neighbor index."
    );

    let atoms: Vec<usize> = match args.atom {
        Some(atom) => vec![atom],
        None => (0..cell_list.len()).collect(),
    };
    let rows = neighbor_rows(&cell_list, &atoms)?;
    debug!("Found {} neighbor pair(s).", rows.len());

    match &args.output {
        Some(path) => {
            write_rows(std::fs::File::create(path)?, &rows)?;
            println!("✓ Wrote {} neighbor pair(s) to: {}", rows.len(), path.display());
        }
        None => write_rows(std::io::stdout().lock(), &rows)?,
    }
    Ok(())
}

/// Neighbor table for `atoms`, grouped by query atom and sorted by neighbor
/// index within each group.
pub fn neighbor_rows(cell_list: &CellList<'_>, atoms: &[usize]) -> Result<Vec<NeighborRow>> {
    let mut rows = Vec::new();
    for &atom in atoms {
        let mut group: Vec<NeighborRow> = cell_list
            .neighbours_for_index(atom)?
            .into_iter()
            .map(|(neighbor, n)| (atom, neighbor, n.distance))
            .collect();
        group.sort_unstable_by_key(|&(_, neighbor, _)| neighbor);
        rows.extend(group);
    }
    Ok(rows)
}

pub fn write_rows<W: Write>(writer: W, rows: &[NeighborRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["atom", "neighbor", "distance"])?;
    for (atom, neighbor, distance) in rows {
        csv_writer.write_record([atom.to_string(), neighbor.to_string(), distance.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}
