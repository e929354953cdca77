//! CSV reader - one sensor recording file to readings
//!
//! Files come from several recording apps, so the delimiter is sniffed from
//! the header line and the axis columns are resolved by name.

use std::fs;
use std::path::Path;

use crate::logic::features::Reading;
use super::columns::{normalize_column, resolve_axis_columns};
use super::DatasetError;

/// Delimiters considered by [`sniff_delimiter`], in tie-break order
const DELIMITERS: &[u8] = b",;\t|";

/// Most frequent candidate delimiter in the header line; `,` when none occur.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    DELIMITERS
        .iter()
        .map(|&d| (d, header_line.bytes().filter(|&b| b == d).count()))
        .fold((b',', 0), |best, (d, count)| if count > best.1 { (d, count) } else { best })
        .0
}

/// Read every row whose three axis cells are finite numbers.
///
/// Rows with missing or non-numeric axis cells are dropped. A file whose
/// header has no recognizable axis columns is an error.
pub fn read_readings(path: &Path) -> Result<Vec<Reading>, DatasetError> {
    let bytes = fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    parse_readings(&content).ok_or_else(|| DatasetError::UnresolvedColumns(path.to_path_buf()))
}

/// `None` when the header cannot be resolved
pub fn parse_readings(content: &str) -> Option<Vec<Reading>> {
    let header_line = content.lines().find(|l| !l.trim().is_empty())?;
    let delimiter = sniff_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.trim_start().as_bytes());

    let headers: Vec<String> = reader.headers().ok()?.iter().map(normalize_column).collect();
    let axes = resolve_axis_columns(&headers)?;
    let [xi, yi, zi] = axes.indices;

    let cell = |record: &csv::StringRecord, idx: usize| -> Option<f64> {
        record
            .get(idx)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    };

    let readings = reader
        .records()
        .filter_map(Result::ok)
        .filter_map(|record| {
            Some(Reading::new(
                cell(&record, xi)?,
                cell(&record, yi)?,
                cell(&record, zi)?,
            ))
        })
        .collect();

    Some(readings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("time,ax,ay,az"), b',');
        assert_eq!(sniff_delimiter("time;accelerationX;accelerationY;accelerationZ"), b';');
        assert_eq!(sniff_delimiter("x\ty\tz"), b'\t');
        assert_eq!(sniff_delimiter("x|y|z"), b'|');
        assert_eq!(sniff_delimiter("single"), b',');
    }

    #[test]
    fn test_semicolon_ios_export() {
        let content = "\
loggingTime;accelerationX;accelerationY;accelerationZ
2024-01-01 10:00:00;0.01;-0.02;0.98
2024-01-01 10:00:01;1.5;2.5;-3.0
";
        let readings = parse_readings(content).unwrap();

        assert_eq!(readings, vec![Reading::new(0.01, -0.02, 0.98), Reading::new(1.5, 2.5, -3.0)]);
    }

    #[test]
    fn test_bad_rows_are_dropped() {
        let content = "\
Acc X,Acc-Y,acc_z
1.0,2.0,3.0
oops,2.0,3.0
4.0,,6.0
7.0,8.0
nan,1.0,1.0
9.0,10.0,11.0,extra
";
        let readings = parse_readings(content).unwrap();

        assert_eq!(readings, vec![Reading::new(1.0, 2.0, 3.0), Reading::new(9.0, 10.0, 11.0)]);
    }

    #[test]
    fn test_unresolved_header() {
        assert_eq!(parse_readings("gyro_x,gyro_y,gyro_z\n1,2,3\n"), None);
        assert_eq!(parse_readings(""), None);
        assert_eq!(parse_readings("\n\n"), None);
    }

    #[test]
    fn test_leading_blank_lines() {
        let readings = parse_readings("\n\nx,y,z\n1,2,3\n").unwrap();
        assert_eq!(readings, vec![Reading::new(1.0, 2.0, 3.0)]);
    }
}
