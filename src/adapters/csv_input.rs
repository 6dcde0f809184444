use crate::utils::error::Result;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

/// Reads a CSV with a header row (`sgpa,credits`) into one JSON object per
/// row, keyed by lower-cased header. Cells stay strings and empty cells are
/// left out, so the regular request validation reports them per row.
pub fn read_semesters<R: Read>(reader: R) -> Result<Vec<Value>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(Value::Object(row));
    }

    tracing::debug!("Read {} semester row(s) from CSV", rows.len());
    Ok(rows)
}

pub fn load_semesters<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_semesters(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_become_objects() {
        let data = "SGPA, Credits\n8.0, 20\n# retake below\n9,10\n";
        let rows = read_semesters(data.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                json!({"sgpa": "8.0", "credits": "20"}),
                json!({"sgpa": "9", "credits": "10"})
            ]
        );
    }

    #[test]
    fn test_empty_cells_are_omitted() {
        let rows = read_semesters("sgpa,credits\n,20\n".as_bytes()).unwrap();
        assert_eq!(rows, vec![json!({"credits": "20"})]);
    }

    #[test]
    fn test_ragged_rows_are_csv_errors() {
        let result = read_semesters("sgpa,credits\n8,20,extra\n".as_bytes());
        assert!(matches!(result, Err(crate::utils::error::GpaError::CsvError(_))));
    }
}
