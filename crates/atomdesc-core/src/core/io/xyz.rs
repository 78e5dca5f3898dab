use super::traits::StructureFile;
use crate::core::models::element::{atomic_number_from_symbol, symbol_for};
use crate::core::models::structure::{Structure, StructureError};
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Invalid structure in frame starting on line {line}: {source}")]
    Structure {
        line: usize,
        #[source]
        source: StructureError,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidAtomCount(String),
    #[error("Unknown element '{0}'")]
    UnknownElement(String),
    #[error("Invalid coordinate '{0}'")]
    InvalidFloat(String),
    #[error("Atom line must have an element followed by three coordinates")]
    TooFewColumns,
    #[error("File ended after {found} of {expected} atom lines")]
    UnexpectedEof { expected: usize, found: usize },
}

/// Reader for the plain XYZ format, including multi-frame files.
///
/// Each frame is an atom count line, a free-form comment line, and one line per
/// atom holding an element symbol (or bare atomic number from 1 to 118) and x, y, z in
/// Angstroms. Extra columns after the coordinates are ignored.
pub struct XyzFile;

type NumberedLine = io::Result<(usize, String)>;

fn next_non_blank(
    lines: &mut impl Iterator<Item = NumberedLine>,
) -> io::Result<Option<(usize, String)>> {
    for item in lines {
        let (line_num, content) = item?;
        if !content.trim().is_empty() {
            return Ok(Some((line_num, content)));
        }
    }
    Ok(None)
}

fn parse_atom_line(line_num: usize, content: &str) -> Result<(u32, Point3<f64>), XyzError> {
    let parse_err = |kind| XyzError::Parse {
        line: line_num,
        kind,
    };

    let columns: Vec<&str> = content.split_whitespace().collect();
    if columns.len() < 4 {
        return Err(parse_err(XyzParseErrorKind::TooFewColumns));
    }

    let element = columns[0];
    let atomic_number = match element.parse::<u32>() {
        Ok(z) => symbol_for(z).map(|_| z),
        Err(_) => atomic_number_from_symbol(element),
    }
    .ok_or_else(|| parse_err(XyzParseErrorKind::UnknownElement(element.to_string())))?;

    let mut coords = [0.0; 3];
    for (slot, raw) in coords.iter_mut().zip(&columns[1..4]) {
        *slot = raw
            .parse()
            .map_err(|_| parse_err(XyzParseErrorKind::InvalidFloat(raw.to_string())))?;
    }

    Ok((atomic_number, Point3::from(coords)))
}

impl StructureFile for XyzFile {
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Structure>, Self::Error> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, line)| line.map(|content| (i + 1, content)));
        let mut structures = Vec::new();

        while let Some((count_line, content)) = next_non_blank(&mut lines)? {
            let count_str = content.trim();
            let expected: usize = count_str.parse().map_err(|_| XyzError::Parse {
                line: count_line,
                kind: XyzParseErrorKind::InvalidAtomCount(count_str.to_string()),
            })?;

            let eof = |found| XyzError::Parse {
                line: count_line,
                kind: XyzParseErrorKind::UnexpectedEof { expected, found },
            };

            // Comment line.
            lines.next().transpose()?.ok_or_else(|| eof(0))?;

            // The count line is untrusted, so nothing is reserved up front.
            let mut positions = Vec::new();
            let mut atomic_numbers = Vec::new();
            for found in 0..expected {
                let (line_num, atom_line) = lines.next().transpose()?.ok_or_else(|| eof(found))?;
                let (z, position) = parse_atom_line(line_num, &atom_line)?;
                atomic_numbers.push(z);
                positions.push(position);
            }

            let structure = Structure::new(positions, atomic_numbers).map_err(|source| {
                XyzError::Structure {
                    line: count_line,
                    source,
                }
            })?;
            structures.push(structure);
        }

        debug!("Read {} structure(s) from XYZ input.", structures.len());
        Ok(structures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn read(content: &str) -> Result<Vec<Structure>, XyzError> {
        XyzFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_single_frame() {
        let content = "3\nwater\nO 0.0 0.0 0.1173\nH 0.0 0.7572 -0.4692\nH 0.0 -0.7572 -0.4692\n";
        let structures = read(content).unwrap();
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].atomic_numbers(), &[8, 1, 1]);
        assert_eq!(structures[0].positions()[1], Point3::new(0.0, 0.7572, -0.4692));
    }

    #[test]
    fn reads_multiple_frames_separated_by_blank_lines() {
        let content = "2\nH2\nH 0 0 0\nH 0.74 0 0\n\n1\n\n6 1.0 2.0 3.0 extra columns\n";
        let structures = read(content).unwrap();
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[0].len(), 2);
        assert_eq!(structures[1].atomic_numbers(), &[6]);
        assert_eq!(structures[1].positions()[0], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn empty_input_yields_no_structures() {
        assert!(read("").unwrap().is_empty());
        assert!(read("\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn invalid_atom_count_reports_line() {
        let err = read("two\ncomment\n").unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::InvalidAtomCount(_)
            }
        ));
    }

    #[test]
    fn unknown_element_reports_line() {
        let err = read("1\ncomment\nQq 0 0 0\n").unwrap_err();
        match err {
            XyzError::Parse { line, kind } => {
                assert_eq!(line, 3);
                assert_eq!(kind, XyzParseErrorKind::UnknownElement("Qq".to_string()));
            }
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_coordinate_is_rejected() {
        let err = read("1\ncomment\nC 0.0 abc 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 3,
                kind: XyzParseErrorKind::InvalidFloat(_)
            }
        ));
    }

    #[test]
    fn short_atom_line_is_rejected() {
        let err = read("1\ncomment\nC 0.0 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                kind: XyzParseErrorKind::TooFewColumns,
                ..
            }
        ));
    }

    #[test]
    fn truncated_frame_reports_unexpected_eof() {
        let err = read("3\ncomment\nC 0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::UnexpectedEof {
                    expected: 3,
                    found: 1
                }
            }
        ));
    }

    #[test]
    fn zero_atom_frame_is_an_invalid_structure() {
        let err = read("0\nempty\n").unwrap_err();
        assert!(matches!(
            err,
            XyzError::Structure {
                line: 1,
                source: StructureError::Empty
            }
        ));
    }

    #[test]
    fn oversized_atom_count_reports_unexpected_eof() {
        let err = read("1000000000000000000\ncomment\nH 0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::UnexpectedEof {
                    expected: 1_000_000_000_000_000_000,
                    found: 1
                }
            }
        ));
    }

    #[test]
    fn numeric_atomic_numbers_must_name_an_element() {
        let structures = read("2\nnumeric\n118 0 0 0\n1 1 0 0\n").unwrap();
        assert_eq!(structures[0].atomic_numbers(), &[118, 1]);

        for z in ["0", "119"] {
            let err = read(&format!("1\ncomment\n{z} 0 0 0\n")).unwrap_err();
            match err {
                XyzError::Parse { line, kind } => {
                    assert_eq!(line, 3);
                    assert_eq!(kind, XyzParseErrorKind::UnknownElement(z.to_string()));
                }
                other => panic!("Unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn read_from_path_reads_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1\nsingle\nNe 1.5 -2.5 0.0\n").unwrap();
        let structures = XyzFile::read_from_path(file.path()).unwrap();
        assert_eq!(structures[0].atomic_numbers(), &[10]);
    }
}
