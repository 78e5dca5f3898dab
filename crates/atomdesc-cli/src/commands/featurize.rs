use crate::cli::FeaturizeArgs;
use crate::config::PartialFeaturizeConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::structure_progress_bar;
use atomdesc::core::io::{traits::StructureFile, xyz::XyzFile};
use atomdesc::core::models::structure::Structure;
use atomdesc::descriptors::{Descriptor, coulomb_matrix::CoulombMatrix};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::io::Write;
use tracing::{debug, info};

pub fn run(args: FeaturizeArgs, quiet: bool) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialFeaturizeConfig::from_file(path)?,
        None => PartialFeaturizeConfig::default(),
    };

    info!("Loading input structures from {:?}", &args.input);
    let structures =
        XyzFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;
    if structures.is_empty() {
        return Err(CliError::Argument(format!(
            "No structures found in '{}'",
            args.input.display()
        )));
    }

    let largest = structures.iter().map(Structure::len).max().unwrap_or(0);
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args, largest)?;
    let descriptor = CoulombMatrix::new(config);

    info!(
        n_structures = structures.len(),
        n_features = descriptor.number_of_features(),
        "Featurizing structures."
    );
    let pb = structure_progress_bar(structures.len(), quiet);
    let features = featurize_all(&descriptor, &structures, &pb);
    match &features {
        Ok(_) => pb.finish_with_message("✓ Done"),
        Err(_) => pb.abandon_with_message("✗ Failed"),
    }
    let features = features?;

    let file = std::fs::File::create(&args.output)?;
    write_features(file, descriptor.number_of_features(), &features)?;

    println!(
        "✓ Wrote {} feature vector(s) of length {} to: {}",
        features.len(),
        descriptor.number_of_features(),
        args.output.display()
    );
    Ok(())
}

/// Featurizes every structure, in parallel across structures.
///
/// Results keep the input order. If any structure fails, the error for the
/// lowest failing index is returned, independent of thread scheduling.
pub fn featurize_all<D>(
    descriptor: &D,
    structures: &[Structure],
    pb: &ProgressBar,
) -> Result<Vec<Vec<f64>>>
where
    D: Descriptor + Sync,
{
    let results: Vec<_> = structures
        .par_iter()
        .map(|structure| {
            let result = descriptor.create(structure);
            pb.inc(1);
            result
        })
        .collect();

    results
        .into_iter()
        .enumerate()
        .map(|(index, result)| result.map_err(|source| CliError::Featurization { index, source }))
        .collect()
}

pub fn write_features<W: Write>(writer: W, n_features: usize, rows: &[Vec<f64>]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let header = std::iter::once("structure".to_string())
        .chain((0..n_features).map(|i| format!("f{}", i)));
    csv_writer.write_record(header)?;

    for (index, row) in rows.iter().enumerate() {
        let record = std::iter::once(index.to_string()).chain(row.iter().map(f64::to_string));
        csv_writer.write_record(record)?;
    }
    csv_writer.flush()?;
    debug!("Wrote {} CSV rows.", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use atomdesc::descriptors::config::{CoulombMatrixConfigBuilder, Permutation};
    use clap::Parser;
    use std::fs;

    const TWO_FRAMES: &str = "2\nH2\nH 0.0 0.0 0.0\nH 0.74 0.0 0.0\n3\nwater\nO 0.0 0.0 0.1173\nH 0.0 0.7572 -0.4692\nH 0.0 -0.7572 -0.4692\n";

    fn read_structures(content: &str) -> Vec<Structure> {
        XyzFile::read_from(&mut std::io::Cursor::new(content)).unwrap()
    }

    fn descriptor(n_atoms_max: usize, permutation: Permutation) -> CoulombMatrix {
        CoulombMatrix::new(
            CoulombMatrixConfigBuilder::new()
                .n_atoms_max(n_atoms_max)
                .permutation(permutation)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn featurize_all_preserves_input_order() {
        let structures = read_structures(TWO_FRAMES);
        let d = descriptor(3, Permutation::Eigenspectrum);
        let pb = ProgressBar::hidden();

        let features = featurize_all(&d, &structures, &pb).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0], d.create(&structures[0]).unwrap());
        assert_eq!(features[1], d.create(&structures[1]).unwrap());
        assert_eq!(pb.position(), 2);
    }

    #[test]
    fn featurize_all_reports_index_of_failing_structure() {
        let structures = read_structures(TWO_FRAMES);
        let d = descriptor(2, Permutation::None);
        let result = featurize_all(&d, &structures, &ProgressBar::hidden());
        assert!(matches!(result, Err(CliError::Featurization { index: 1, .. })));
    }

    #[test]
    fn featurize_all_reports_lowest_failing_index() {
        let content = format!(
            "{}4\nbig\nC 0 0 0\nC 1 0 0\nC 0 1 0\nC 0 0 1\n1\nsmall\nH 0 0 0\n",
            TWO_FRAMES
        );
        let structures = read_structures(&content);
        let d = descriptor(2, Permutation::SortedL2);
        for _ in 0..20 {
            let result = featurize_all(&d, &structures, &ProgressBar::hidden());
            assert!(matches!(result, Err(CliError::Featurization { index: 1, .. })));
        }
    }

    #[test]
    fn write_features_emits_header_and_rows() {
        let mut buffer = Vec::new();
        write_features(&mut buffer, 2, &[vec![1.5, -0.25], vec![f64::INFINITY, 0.0]]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["structure,f0,f1", "0,1.5,-0.25", "1,inf,0"]);
    }

    #[test]
    fn run_writes_csv_for_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("frames.xyz");
        let output = dir.path().join("features.csv");
        fs::write(&input, TWO_FRAMES).unwrap();

        let cli = Cli::parse_from([
            "atomdesc",
            "featurize",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--permutation",
            "none",
        ]);
        let Commands::Featurize(args) = cli.command else {
            panic!("Expected 'featurize' subcommand");
        };
        run(args, true).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        // Largest structure has 3 atoms, so each row holds 9 features.
        assert_eq!(lines[0].split(',').count(), 10);
        assert!(lines[1].starts_with("0,0.5,"));
    }

    #[test]
    fn run_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.xyz");
        fs::write(&input, "\n").unwrap();

        let cli = Cli::parse_from([
            "atomdesc",
            "featurize",
            "-i",
            input.to_str().unwrap(),
            "-o",
            dir.path().join("out.csv").to_str().unwrap(),
        ]);
        let Commands::Featurize(args) = cli.command else {
            panic!("Expected 'featurize' subcommand");
        };
        assert!(matches!(run(args, true), Err(CliError::Argument(_))));
    }
}
