//! Flat dumps of a trajectory.
//!
//! Two formats are supported:
//!
//! | Format | Header | Row |
//! |--------|--------|-----|
//! | [`ExportFormat::Csv`] | `x,y,z` | `x,y,z` |
//! | [`ExportFormat::Text`] | none | `x, y, z` |
//!
//! Values are written with the shortest decimal form that parses back to the
//! same `f64`, so a dump re-read with [`read_points`] matches the in-memory
//! trajectory exactly.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Read, Write};
use std::path::Path;

use glam::DVec3;

use crate::error::{ExportError, ImportError};

const CSV_HEADER: [&str; 3] = ["x", "y", "z"];

/// Layout of an exported point file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Comma-separated values with an `x,y,z` header row.
    Csv,
    /// `x, y, z` lines with no header.
    #[default]
    Text,
}

impl ExportFormat {
    /// Pick a format from the file extension. Anything but `.csv` is text.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => ExportFormat::Csv,
            _ => ExportFormat::Text,
        }
    }
}

/// Write `points` to `writer` in the given format.
pub fn write_points<W: Write>(writer: W, points: &[DVec3], format: ExportFormat) -> io::Result<()> {
    match format {
        ExportFormat::Csv => write_csv(writer, points),
        ExportFormat::Text => write_text(writer, points),
    }
}

fn write_csv<W: Write>(writer: W, points: &[DVec3]) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADER)?;
    for p in points {
        writer.write_record([p.x.to_string(), p.y.to_string(), p.z.to_string()])?;
    }
    writer.flush()
}

fn write_text<W: Write>(mut writer: W, points: &[DVec3]) -> io::Result<()> {
    for p in points {
        writeln!(writer, "{}, {}, {}", p.x, p.y, p.z)?;
    }
    writer.flush()
}

/// Create or truncate `path` and write `points` to it.
pub fn export_points(path: impl AsRef<Path>, points: &[DVec3], format: ExportFormat) -> Result<(), ExportError> {
    let path = path.as_ref();
    let wrap = |source| ExportError {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(wrap)?;
    write_points(BufWriter::new(file), points, format).map_err(wrap)
}

/// Parse a dump written by [`write_points`].
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn read_points<R: BufRead>(reader: R, format: ExportFormat) -> Result<Vec<DVec3>, ImportError> {
    match format {
        ExportFormat::Csv => read_csv(reader),
        ExportFormat::Text => read_text(reader),
    }
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<DVec3>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    if !reader.headers()?.iter().eq(CSV_HEADER) {
        return Err(ImportError::MissingHeader);
    }

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        let point = parse_fields(record.iter()).ok_or_else(|| ImportError::Parse {
            line: record.position().map_or(0, |pos| pos.line() as usize),
            content: record.iter().collect::<Vec<_>>().join(","),
        })?;
        points.push(point);
    }

    Ok(points)
}

fn read_text<R: BufRead>(reader: R) -> Result<Vec<DVec3>, ImportError> {
    let mut points = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let point = parse_fields(line.split(',')).ok_or_else(|| ImportError::Parse {
            line: index + 1,
            content: line.clone(),
        })?;
        points.push(point);
    }

    Ok(points)
}

fn parse_fields<'a>(fields: impl Iterator<Item = &'a str>) -> Option<DVec3> {
    let mut fields = fields.map(|s| s.trim().parse::<f64>());
    let x = fields.next()?.ok()?;
    let y = fields.next()?.ok()?;
    let z = fields.next()?.ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(DVec3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 1.0, 1.05),
            DVec3::new(0.1, 0.99, 1.022),
            DVec3::new(-3.5, 1e-7, 123456.789),
        ]
    }

    fn render(points: &[DVec3], format: ExportFormat) -> String {
        let mut buf = Vec::new();
        write_points(&mut buf, points, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_layout() {
        let out = render(&sample()[..2], ExportFormat::Csv);
        assert_eq!(out, "x,y,z\n0,1,1.05\n0.1,0.99,1.022\n");
    }

    #[test]
    fn test_text_layout() {
        let out = render(&sample()[..2], ExportFormat::Text);
        assert_eq!(out, "0, 1, 1.05\n0.1, 0.99, 1.022\n");
    }

    #[test]
    fn test_values_are_plain_decimal() {
        let out = render(&sample()[2..], ExportFormat::Text);
        assert_eq!(out, "-3.5, 0.0000001, 123456.789\n");
    }

    #[test]
    fn test_empty_csv_has_header_only() {
        assert_eq!(render(&[], ExportFormat::Csv), "x,y,z\n");
        assert_eq!(render(&[], ExportFormat::Text), "");
    }

    #[test]
    fn test_read_back_both_formats() {
        for format in [ExportFormat::Csv, ExportFormat::Text] {
            let out = render(&sample(), format);
            let parsed = read_points(Cursor::new(out), format).unwrap();
            assert_eq!(parsed, sample());
        }
    }

    #[test]
    fn test_read_rejects_missing_header() {
        let err = read_points(Cursor::new("1,2,3\n"), ExportFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::MissingHeader));

        let err = read_points(Cursor::new(""), ExportFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::MissingHeader));
    }

    #[test]
    fn test_read_reports_bad_line() {
        let err = read_points(Cursor::new("1, 2, 3\n4, five, 6\n"), ExportFormat::Text).unwrap_err();
        match err {
            ImportError::Parse { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "4, five, 6");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_reports_bad_csv_row() {
        let input = "x,y,z\n1,2,3\n4, five ,6\n";
        match read_points(Cursor::new(input), ExportFormat::Csv).unwrap_err() {
            ImportError::Parse { line, content } => {
                assert_eq!(line, 3);
                assert_eq!(content, "4,five,6");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_rejects_ragged_csv() {
        let err = read_points(Cursor::new("x,y,z\n1,2\n"), ExportFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::Csv(_)));
    }

    #[test]
    fn test_read_csv_skips_blank_lines() {
        let parsed = read_points(Cursor::new("x,y,z\n\n1,2,3\n\n"), ExportFormat::Csv).unwrap();
        assert_eq!(parsed, vec![DVec3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_read_rejects_extra_fields() {
        let err = read_points(Cursor::new("1, 2, 3, 4\n"), ExportFormat::Text).unwrap_err();
        assert!(matches!(err, ImportError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path("points.csv"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path("POINTS.CSV"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path("points.txt"), ExportFormat::Text);
        assert_eq!(ExportFormat::from_path("points"), ExportFormat::Text);
    }

    #[test]
    fn test_export_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.txt");

        export_points(&path, &sample(), ExportFormat::Text).unwrap();
        export_points(&path, &sample()[..1], ExportFormat::Text).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0, 1, 1.05\n");
    }

    #[test]
    fn test_export_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("points.csv");

        let err = export_points(&path, &sample(), ExportFormat::Csv).unwrap_err();
        assert_eq!(err.path, path);
    }
}
