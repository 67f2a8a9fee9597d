//! Delimited metadata files (LJSpeech layout).
//!
//! Input files have no header and a fixed column list, e.g.
//! `LJ001-0024|raw text|normalized text`. Output files gain a header row, a
//! leading row-index column and one extra column with the phonemes.

use crate::defaults::{DEFAULT_COLUMNS, DEFAULT_SEPARATOR};
use crate::error::{PhonoshardError, Result};
use crate::pipeline::TransformResult;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// How to split a metadata file into columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFormat {
    pub separator: char,
    pub columns: Vec<String>,
}

impl Default for DatasetFormat {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// An in-memory table with named columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    format: DatasetFormat,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Read and parse a metadata file.
    pub fn read(path: &Path, format: DatasetFormat) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes, &path.display().to_string(), format)
    }

    /// Parse metadata from raw bytes. `source` names the input in errors.
    ///
    /// Blank lines are skipped. Short lines are padded with empty fields;
    /// extra separators end up inside the last column.
    pub fn parse(bytes: &[u8], source: &str, format: DatasetFormat) -> Result<Self> {
        if format.columns.is_empty() {
            return Err(PhonoshardError::InvalidArgument {
                message: "dataset format needs at least one column".to_string(),
            });
        }
        let width = format.columns.len();

        let mut rows = Vec::new();
        for (index, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
            let line = std::str::from_utf8(raw_line).map_err(|e| PhonoshardError::DatasetParse {
                path: source.to_string(),
                line: index + 1,
                message: e.to_string(),
            })?;
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }

            let mut fields: Vec<String> = line
                .splitn(width, format.separator)
                .map(str::to_string)
                .collect();
            fields.resize(width, String::new());
            rows.push(fields);
        }

        Ok(Self { format, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.format.columns
    }

    pub fn column_count(&self) -> usize {
        self.format.columns.len()
    }

    /// Values of the named column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<String>> {
        let index = self
            .format
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PhonoshardError::DatasetColumnNotFound {
                column: name.to_string(),
            })?;
        Ok(self.rows.iter().map(|row| row[index].clone()).collect())
    }

    /// Write the table plus a `column_name` column built from `results`.
    ///
    /// `results` must hold one entry per row; missing markers become empty
    /// fields.
    pub fn write_with_column(
        &self,
        path: &Path,
        column_name: &str,
        results: &[TransformResult],
    ) -> Result<()> {
        if results.len() != self.rows.len() {
            return Err(PhonoshardError::InvalidArgument {
                message: format!(
                    "{} results for {} dataset rows",
                    results.len(),
                    self.rows.len()
                ),
            });
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut out = BufWriter::new(fs::File::create(path)?);
        self.write_to(&mut out, column_name, results)?;
        out.flush()?;
        Ok(())
    }

    fn write_to<W: Write>(
        &self,
        out: &mut W,
        column_name: &str,
        results: &[TransformResult],
    ) -> Result<()> {
        let sep = self.format.separator;

        let mut header = vec![String::new()];
        header.extend(self.format.columns.iter().map(|c| quote_field(c, sep)));
        header.push(quote_field(column_name, sep));
        writeln!(out, "{}", header.join(&sep.to_string()))?;

        for (index, (row, result)) in self.rows.iter().zip(results).enumerate() {
            let mut fields = vec![index.to_string()];
            fields.extend(row.iter().map(|f| quote_field(f, sep)));
            fields.push(quote_field(result.phonemes().unwrap_or_default(), sep));
            writeln!(out, "{}", fields.join(&sep.to_string()))?;
        }
        Ok(())
    }
}

/// Quote a field if it contains the separator, a quote or a line break.
fn quote_field(field: &str, separator: char) -> String {
    if field.contains(separator) || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "LJ001-0001|Printing, in 1462|Printing, in fourteen sixty-two\n\
                          LJ001-0002|in being comparatively modern.|in being comparatively modern.\n";

    fn sample() -> Dataset {
        Dataset::parse(SAMPLE.as_bytes(), "sample", DatasetFormat::default()).unwrap()
    }

    #[test]
    fn test_parse_rows_and_columns() {
        let dataset = sample();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.column_count(), 3);
        assert_eq!(
            dataset.column("text2").unwrap(),
            vec![
                "Printing, in fourteen sixty-two",
                "in being comparatively modern."
            ]
        );
        assert_eq!(dataset.column("id").unwrap(), vec!["LJ001-0001", "LJ001-0002"]);
    }

    #[test]
    fn test_unknown_column() {
        let err = sample().column("text3").unwrap_err();
        assert!(matches!(err, PhonoshardError::DatasetColumnNotFound { ref column } if column == "text3"));
    }

    #[test]
    fn test_short_lines_are_padded() {
        let dataset =
            Dataset::parse(b"LJ1|only one text\n", "short", DatasetFormat::default()).unwrap();
        assert_eq!(dataset.column("text2").unwrap(), vec![""]);
    }

    #[test]
    fn test_extra_separators_stay_in_last_column() {
        let dataset = Dataset::parse(b"LJ1|a|b|c\n", "long", DatasetFormat::default()).unwrap();
        assert_eq!(dataset.column("text2").unwrap(), vec!["b|c"]);
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let dataset =
            Dataset::parse(b"LJ1|a|b\r\n\r\n\nLJ2|c|d\r\n", "crlf", DatasetFormat::default())
                .unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.column("text2").unwrap(), vec!["b", "d"]);
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let bytes = b"LJ1|a|b\nLJ2|\xff|c\n";
        let err = Dataset::parse(bytes, "bad.csv", DatasetFormat::default()).unwrap_err();
        match err {
            PhonoshardError::DatasetParse { path, line, .. } => {
                assert_eq!(path, "bad.csv");
                assert_eq!(line, 2);
            }
            other => panic!("expected DatasetParse, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_separator_and_columns() {
        let format = DatasetFormat {
            separator: '\t',
            columns: vec!["name".to_string(), "text".to_string()],
        };
        let dataset = Dataset::parse(b"a\thello\nb\tworld\n", "tsv", format).unwrap();
        assert_eq!(dataset.column("text").unwrap(), vec!["hello", "world"]);
    }

    #[test]
    fn test_write_with_column() {
        let dataset = sample();
        let results = vec![
            TransformResult::Produced {
                position: 0,
                phonemes: "pɹˈɪntɪŋ".to_string(),
            },
            TransformResult::Missing { position: 1 },
        ];

        let mut out = Vec::new();
        dataset.write_to(&mut out, "phonemes", &results).unwrap();
        let written = String::from_utf8(out).unwrap();
        let lines: Vec<_> = written.lines().collect();

        assert_eq!(lines[0], "|id|text1|text2|phonemes");
        assert_eq!(
            lines[1],
            "0|LJ001-0001|Printing, in 1462|Printing, in fourteen sixty-two|pɹˈɪntɪŋ"
        );
        assert_eq!(
            lines[2],
            "1|LJ001-0002|in being comparatively modern.|in being comparatively modern.|"
        );
    }

    #[test]
    fn test_write_rejects_length_mismatch() {
        let dir = TempDir::new().unwrap();
        let err = sample()
            .write_with_column(&dir.path().join("out.csv"), "phonemes", &[])
            .unwrap_err();
        assert!(matches!(err, PhonoshardError::InvalidArgument { .. }));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed").join("raw_phonemes.csv");
        let results = vec![
            TransformResult::Missing { position: 0 },
            TransformResult::Missing { position: 1 },
        ];
        sample().write_with_column(&path, "phonemes", &results).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.csv");
        fs::write(&path, SAMPLE).unwrap();
        let dataset = Dataset::read(&path, DatasetFormat::default()).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field("plain", '|'), "plain");
        assert_eq!(quote_field("a|b", '|'), "\"a|b\"");
        assert_eq!(quote_field("say \"hi\"", '|'), "\"say \"\"hi\"\"\"");
    }
}
