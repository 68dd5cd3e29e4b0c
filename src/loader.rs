//! Tabular waypoint loader.
//!
//! Reads comma-separated `(name, x, y)` rows, one waypoint per row, below a
//! single header row. Malformed rows are reported with their 1-based row
//! number (the header is row 1).

use crate::route::Waypoint;
use std::fs;
use std::path::{Path, PathBuf};

/// A rejected waypoint file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file must contain a header row and at least one data row")]
    TooFewRows,
    #[error("row {row}: expected at least 3 fields (name, x, y), got {found}")]
    MissingFields { row: usize, found: usize },
    #[error("row {row}: waypoint name cannot be empty")]
    EmptyName { row: usize },
    #[error("row {row}: invalid {axis} coordinate {value:?}")]
    InvalidCoordinate {
        row: usize,
        axis: char,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Loads waypoints from a file at `path`.
pub fn load_waypoints(path: impl AsRef<Path>) -> Result<Vec<Waypoint>, LoadError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_waypoints(&contents)
}

/// Parses waypoints from file contents already in memory.
pub fn parse_waypoints(contents: &str) -> Result<Vec<Waypoint>, LoadError> {
    let rows: Vec<&str> = contents.lines().filter(|line| !line.trim().is_empty()).collect();
    if rows.len() < 2 {
        return Err(LoadError::TooFewRows);
    }

    let mut waypoints = Vec::with_capacity(rows.len() - 1);
    for (index, line) in rows.iter().enumerate().skip(1) {
        let row = index + 1;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(LoadError::MissingFields {
                row,
                found: fields.len(),
            });
        }

        let name = fields[0];
        if name.is_empty() {
            return Err(LoadError::EmptyName { row });
        }

        let x = parse_coordinate(fields[1], 'x', row)?;
        let y = parse_coordinate(fields[2], 'y', row)?;
        waypoints.push(Waypoint::new(name, x, y));
    }

    Ok(waypoints)
}

fn parse_coordinate(value: &str, axis: char, row: usize) -> Result<f64, LoadError> {
    value.parse().map_err(|source| LoadError::InvalidCoordinate {
        row,
        axis,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parses_header_and_rows() {
        let contents = "name,x,y\nalpha,0.0,0.0\nbeta,3.5,-4.25\n";
        let waypoints = parse_waypoints(contents).expect("well-formed input");
        assert_eq!(
            waypoints,
            vec![
                Waypoint::new("alpha", 0.0, 0.0),
                Waypoint::new("beta", 3.5, -4.25),
            ]
        );
    }

    #[test]
    fn test_tolerates_padding_and_blank_lines() {
        let contents = "name,x,y\n\n  alpha , 1.0 , 2.0 \n\n";
        let waypoints = parse_waypoints(contents).expect("well-formed input");
        assert_eq!(waypoints, vec![Waypoint::new("alpha", 1.0, 2.0)]);
    }

    #[test]
    fn test_header_only_is_rejected() {
        assert!(matches!(
            parse_waypoints("name,x,y\n"),
            Err(LoadError::TooFewRows)
        ));
        assert!(matches!(parse_waypoints(""), Err(LoadError::TooFewRows)));
    }

    #[test]
    fn test_short_row_reports_row_number() {
        let contents = "name,x,y\nalpha,1.0,2.0\nbeta,3.0\n";
        match parse_waypoints(contents) {
            Err(LoadError::MissingFields { row, found }) => {
                assert_eq!(row, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_name_reports_row_number() {
        let contents = "name,x,y\n,1.0,2.0\n";
        match parse_waypoints(contents) {
            Err(LoadError::EmptyName { row }) => assert_eq!(row, 2),
            other => panic!("expected EmptyName, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_coordinate_reports_axis_and_row() {
        let contents = "name,x,y\nalpha,1.0,north\n";
        match parse_waypoints(contents) {
            Err(LoadError::InvalidCoordinate { row, axis, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(axis, 'y');
                assert_eq!(value, "north");
            }
            other => panic!("expected InvalidCoordinate, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "name,x,y\nalpha,1.0,2.0\nbeta,4.0,6.0\n").expect("write temp file");

        let waypoints = load_waypoints(file.path()).expect("well-formed file");
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[1], Waypoint::new("beta", 4.0, 6.0));
    }

    #[test]
    fn test_missing_file_surfaces_io_error() {
        let err = load_waypoints("/nonexistent/waypoints.csv").expect_err("missing file");
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
