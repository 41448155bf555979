use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::report::{CellValue, ReportSheet};

/// Writes the report sheets to the given path, one worksheet per sheet with
/// an autofiltered Excel table spanning the data.
pub fn write_report(path: &Path, sheets: &[ReportSheet]) -> Result<()> {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col_idx, header) in sheet.columns.iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, header)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = col_idx as u16;
                match cell {
                    CellValue::Text(value) => {
                        worksheet.write_string(row_num, col_num, value)?;
                    }
                    CellValue::Number(value) => {
                        worksheet.write_number(row_num, col_num, *value)?;
                    }
                    CellValue::Bool(value) => {
                        worksheet.write_boolean(row_num, col_num, *value)?;
                    }
                    CellValue::Empty => {}
                }
            }
        }

        let mut excel_table = rust_xlsxwriter::Table::new();
        excel_table.set_autofilter(true);

        let col_end = (sheet.columns.len() as u16).saturating_sub(1);
        let row_end = if sheet.rows.is_empty() {
            0
        } else {
            sheet.rows.len() as u32
        };
        worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
    }

    workbook.save(path)?;
    Ok(())
}
