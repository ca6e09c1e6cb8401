//! CSV loading into all-string DataFrames.

use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Check a file's size against `max_size`, returning the size.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<u64> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(metadata.len())
}

/// Reject content with a UTF-16 byte order mark.
pub fn validate_encoding(name: &str, bytes: &[u8]) -> Result<()> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            name: name.to_string(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            name: name.to_string(),
            encoding: "UTF-16 BE",
        });
    }
    Ok(())
}

/// Parse CSV content with a header row. Every column is read as a string.
///
/// Returns `None` for blank content.
pub fn read_csv_bytes(name: &str, mut bytes: Vec<u8>) -> Result<Option<DataFrame>> {
    validate_encoding(name, &bytes)?;
    if bytes.starts_with(&UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    if df
        .get_column_names()
        .iter()
        .any(|column| column.trim().is_empty())
    {
        return Err(IngestError::EmptyColumnName {
            name: name.to_string(),
        });
    }
    if df.width() > 500 {
        tracing::warn!(
            name,
            columns = df.width(),
            "Dataset has more than 500 columns - may impact performance"
        );
    }
    Ok(Some(df))
}

/// Read a CSV file after checking its size against `max_size`.
pub fn read_csv_file(path: &Path, max_size: u64) -> Result<Option<DataFrame>> {
    let size = check_file_size_with_limit(path, max_size)?;
    let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), size, "read CSV file");
    read_csv_bytes(&path.display().to_string(), bytes)
}

/// Read only the header row of a CSV file.
///
/// Returns an empty list for blank files. Rows after the header are not
/// parsed.
pub fn read_csv_headers(path: &Path, max_size: u64) -> Result<Vec<String>> {
    check_file_size_with_limit(path, max_size)?;
    let name = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate_encoding(&name, &bytes)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(&bytes));
    let header = reader.headers().map_err(|e| IngestError::CsvParse {
        name: name.clone(),
        message: e.to_string(),
    })?;

    let names: Vec<String> = header.iter().map(str::to_string).collect();
    if names.iter().all(|column| column.trim().is_empty()) {
        return Ok(Vec::new());
    }
    if names.iter().any(|column| column.trim().is_empty()) {
        return Err(IngestError::EmptyColumnName { name });
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_strings() {
        let df = read_csv_bytes("t", b"Age,Name\n42,Ada\n".to_vec())
            .unwrap()
            .unwrap();
        assert_eq!(df.column("Age").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Age").unwrap().str().unwrap().get(0), Some("42"));
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"Email\na@b.c\n");
        let df = read_csv_bytes("t", bytes).unwrap().unwrap();
        assert_eq!(df.get_column_names()[0].as_str(), "Email");
    }

    #[test]
    fn utf16_is_rejected() {
        let err = read_csv_bytes("t", vec![0xFF, 0xFE, b'A', 0]).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedEncoding { encoding: "UTF-16 LE", .. }));
    }

    #[test]
    fn header_row_is_read_alone() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("contacts.csv");
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"first name,e-mail\nAda,ada@example.com,extra\n");
        std::fs::write(&path, bytes).unwrap();

        let names = read_csv_headers(&path, MAX_CSV_FILE_SIZE).unwrap();
        assert_eq!(names, ["first name", "e-mail"]);
    }

    #[test]
    fn blank_header_file_has_no_names() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("blank.csv");
        std::fs::write(&path, "").unwrap();
        assert!(read_csv_headers(&path, MAX_CSV_FILE_SIZE).unwrap().is_empty());
    }

    #[test]
    fn blank_content_has_no_frame() {
        assert!(read_csv_bytes("t", b"  \n".to_vec()).unwrap().is_none());
    }
}
