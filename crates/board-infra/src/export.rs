//! CSV export for the admin dashboard.
//!
//! Rows are any `Serialize` type that maps to a JSON object; headers
//! come from the first row's keys. Quoting follows the usual rules:
//! a cell is quoted when it contains a comma, quote or newline, with
//! embedded quotes doubled. Nulls become empty cells.

use serde::Serialize;
use serde_json::Value;

/// CSV export errors.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("rows must serialize to JSON objects")]
    NotAnObject,

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Render a row set to CSV. An empty row set yields an empty string.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<String, ExportError> {
    let mut objects = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::to_value(row)? {
            Value::Object(map) => objects.push(map),
            _ => return Err(ExportError::NotAnObject),
        }
    }
    let Some(first) = objects.first() else {
        return Ok(String::new());
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut lines = vec![headers.join(",")];
    for object in &objects {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| escape_cell(object.get(header)))
            .collect();
        lines.push(cells.join(","));
    }
    Ok(lines.join("\n"))
}

fn escape_cell(value: Option<&Value>) -> String {
    let raw = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        nickname: String,
        phone: Option<String>,
        verified: bool,
    }

    #[test]
    fn renders_headers_and_rows() {
        let rows = vec![
            Row {
                nickname: "kenji".to_string(),
                phone: Some("090-1111-2222".to_string()),
                verified: true,
            },
            Row {
                nickname: "acme".to_string(),
                phone: None,
                verified: false,
            },
        ];
        let csv = to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("nickname,phone,verified"));
        assert_eq!(lines.next(), Some("kenji,090-1111-2222,true"));
        assert_eq!(lines.next(), Some("acme,,false"));
    }

    #[test]
    fn quotes_cells_with_separators() {
        let rows = vec![Row {
            nickname: "say \"hi\", please\nnow".to_string(),
            phone: None,
            verified: false,
        }];
        let csv = to_csv(&rows).unwrap();
        assert!(csv.contains("\"say \"\"hi\"\", please\nnow\""));
    }

    #[test]
    fn empty_rowset_is_empty() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(to_csv(&rows).unwrap(), "");
    }

    #[test]
    fn scalar_rows_are_rejected() {
        let rows = vec![1, 2, 3];
        assert!(matches!(to_csv(&rows), Err(ExportError::NotAnObject)));
    }
}
