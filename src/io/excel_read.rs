use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::Result;
use crate::model::Table;

/// Reads every sheet of an `.xlsx` workbook into text-typed tables.
///
/// All cells are coerced to text here; interpretation (numeric collapsing,
/// sentinel handling) belongs to the normalizer. Sheets without even a header
/// row are dropped. Any parse failure is reported for the workbook as a
/// whole; the caller decides whether that aborts anything.
pub fn read_workbook(path: &Path, workbook: &str) -> Result<Vec<Table>> {
    let mut reader: Xlsx<_> = open_workbook(path)?;
    let sheet_names = reader.sheet_names().to_vec();

    let mut tables = Vec::new();
    for sheet in sheet_names {
        let Some(range) = reader.worksheet_range(&sheet) else {
            continue;
        };
        let range = range?;

        let mut grid = range.rows();
        let Some(header) = grid.next() else {
            continue;
        };
        let columns: Vec<String> = header.iter().map(cell_to_string).collect();
        let rows: Vec<Vec<String>> = grid
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        tables.push(Table {
            workbook: workbook.to_string(),
            sheet,
            columns,
            rows,
        });
    }

    Ok(tables)
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}
