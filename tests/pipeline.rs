use std::fs;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;
use sku_dupe_finder::ToolError;
use sku_dupe_finder::run::{RunOptions, run_analysis};
use tempfile::tempdir;

fn write_input(path: &Path, sheet: &str, header: &str, values: &[&str]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).expect("sheet name");
    worksheet.write_string(0, 0, header).expect("header written");
    for (index, value) in values.iter().enumerate() {
        worksheet
            .write_string((index + 1) as u32, 0, *value)
            .expect("value written");
    }
    workbook.save(path).expect("input workbook saved");
}

fn sheet_names(path: &Path) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook(path).expect("report opens");
    workbook.sheet_names().to_vec()
}

fn sheet_cell(path: &Path, sheet: &str, row: u32, col: u32) -> DataType {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("report opens");
    let range = workbook
        .worksheet_range(sheet)
        .expect("sheet exists")
        .expect("sheet readable");
    range
        .get_value((row, col))
        .cloned()
        .unwrap_or(DataType::Empty)
}

#[test]
fn end_to_end_cross_workbook_report() {
    let dir = tempdir().expect("temporary directory");
    write_input(&dir.path().join("W1.xlsx"), "sheet1", "SKU", &["A1", "A2", "A1"]);
    write_input(&dir.path().join("W2.xlsx"), "sheet1", "Item Code", &["A1", "B1"]);
    let out = dir.path().join("report.xlsx");

    let analysis = run_analysis(
        &[dir.path().to_path_buf()],
        &RunOptions::default(),
        &out,
    )
    .expect("analysis run");

    assert!(analysis.read_errors.is_empty());
    assert_eq!(analysis.records.len(), 5);
    assert_eq!(
        sheet_names(&out),
        vec![
            "Counts_by_File",
            "Presence_by_File",
            "Details",
            "Detected_Columns",
        ]
    );

    // Counts: one qualifying SKU, dense counts per workbook.
    assert_eq!(
        sheet_cell(&out, "Counts_by_File", 1, 0),
        DataType::String("A1".to_string())
    );
    assert_eq!(sheet_cell(&out, "Counts_by_File", 1, 1), DataType::Float(2.0));
    assert_eq!(sheet_cell(&out, "Counts_by_File", 1, 2), DataType::Float(1.0));
    // No second data row.
    assert_eq!(sheet_cell(&out, "Counts_by_File", 2, 0), DataType::Empty);

    // Presence: booleans plus the distinct-workbook count.
    assert_eq!(sheet_cell(&out, "Presence_by_File", 1, 1), DataType::Bool(true));
    assert_eq!(sheet_cell(&out, "Presence_by_File", 1, 2), DataType::Bool(true));
    assert_eq!(sheet_cell(&out, "Presence_by_File", 1, 3), DataType::Float(2.0));

    // Details: three rows for "A1", sorted by workbook then row number.
    assert_eq!(
        sheet_cell(&out, "Details", 1, 1),
        DataType::String("W1.xlsx".to_string())
    );
    assert_eq!(sheet_cell(&out, "Details", 1, 4), DataType::Float(2.0));
    assert_eq!(sheet_cell(&out, "Details", 2, 4), DataType::Float(4.0));
    assert_eq!(
        sheet_cell(&out, "Details", 3, 1),
        DataType::String("W2.xlsx".to_string())
    );
    assert_eq!(sheet_cell(&out, "Details", 4, 0), DataType::Empty);

    // Detected columns: one row per scanned table.
    assert_eq!(
        sheet_cell(&out, "Detected_Columns", 1, 2),
        DataType::String("SKU".to_string())
    );
    assert_eq!(
        sheet_cell(&out, "Detected_Columns", 2, 2),
        DataType::String("Item Code".to_string())
    );
}

#[test]
fn widened_run_reports_all_detected_skus() {
    let dir = tempdir().expect("temporary directory");
    write_input(&dir.path().join("W1.xlsx"), "sheet1", "SKU", &["A1", "A2", "A1"]);
    write_input(&dir.path().join("W2.xlsx"), "sheet1", "Item Code", &["A1", "B1"]);
    let out = dir.path().join("report.xlsx");

    let options = RunOptions {
        include_within_workbook: true,
        ..RunOptions::default()
    };
    run_analysis(&[dir.path().to_path_buf()], &options, &out).expect("analysis run");

    // A1, A2, and B1 all qualify under the widened policy.
    assert_eq!(
        sheet_cell(&out, "Counts_by_File", 1, 0),
        DataType::String("A1".to_string())
    );
    assert_eq!(
        sheet_cell(&out, "Counts_by_File", 2, 0),
        DataType::String("A2".to_string())
    );
    assert_eq!(
        sheet_cell(&out, "Counts_by_File", 3, 0),
        DataType::String("B1".to_string())
    );
}

#[test]
fn unreadable_workbook_degrades_to_read_issue() {
    let dir = tempdir().expect("temporary directory");
    write_input(&dir.path().join("good.xlsx"), "sheet1", "SKU", &["A1"]);
    write_input(&dir.path().join("also_good.xlsx"), "sheet1", "SKU", &["A1"]);
    fs::write(dir.path().join("broken.xlsx"), b"not a workbook").expect("broken file");
    let out = dir.path().join("report.xlsx");

    let analysis = run_analysis(
        &[dir.path().to_path_buf()],
        &RunOptions::default(),
        &out,
    )
    .expect("analysis run");

    assert_eq!(analysis.read_errors.len(), 1);
    assert_eq!(analysis.read_errors[0].workbook, "broken.xlsx");
    assert!(analysis.read_errors[0].reason.starts_with("Failed to read:"));

    let names = sheet_names(&out);
    assert!(names.contains(&"Read_Issues".to_string()));
    assert_eq!(
        sheet_cell(&out, "Read_Issues", 1, 0),
        DataType::String("broken.xlsx".to_string())
    );
}

#[test]
fn no_sku_data_yields_summary_sheet() {
    let dir = tempdir().expect("temporary directory");
    write_input(&dir.path().join("noise.xlsx"), "sheet1", "Notes", &["---", "***"]);
    let out = dir.path().join("report.xlsx");

    let analysis = run_analysis(
        &[dir.path().to_path_buf()],
        &RunOptions::default(),
        &out,
    )
    .expect("analysis run");

    assert!(analysis.is_empty());
    assert_eq!(sheet_names(&out), vec!["Summary"]);
    assert_eq!(
        sheet_cell(&out, "Summary", 1, 0),
        DataType::String("No SKU-like data found in the provided files.".to_string())
    );
}

#[test]
fn no_input_files_is_a_hard_failure() {
    let dir = tempdir().expect("temporary directory");
    let out = dir.path().join("report.xlsx");

    let result = run_analysis(&[dir.path().to_path_buf()], &RunOptions::default(), &out);
    assert!(matches!(result, Err(ToolError::NoInputFiles)));
    assert!(!out.exists());
}

#[test]
fn invalid_pattern_is_a_hard_failure() {
    let dir = tempdir().expect("temporary directory");
    write_input(&dir.path().join("W1.xlsx"), "sheet1", "SKU", &["A1"]);
    let out = dir.path().join("report.xlsx");

    let options = RunOptions {
        sku_col_patterns: Some(vec!["[".to_string()]),
        ..RunOptions::default()
    };
    let result = run_analysis(&[dir.path().to_path_buf()], &options, &out);
    assert!(matches!(result, Err(ToolError::InvalidPattern { .. })));
}

#[test]
fn directory_discovery_is_ordered_and_depth_limited() {
    let dir = tempdir().expect("temporary directory");
    write_input(&dir.path().join("b.xlsx"), "s", "SKU", &["X1"]);
    write_input(&dir.path().join("a.xlsx"), "s", "SKU", &["X1"]);
    fs::create_dir(dir.path().join("sub")).expect("subdirectory");
    write_input(&dir.path().join("sub/c.xlsx"), "s", "SKU", &["X1"]);

    let shallow =
        sku_dupe_finder::io::discover::find_excel_files(&[dir.path().to_path_buf()], false);
    let shallow_names: Vec<String> = shallow
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(shallow_names, vec!["a.xlsx", "b.xlsx"]);

    let deep = sku_dupe_finder::io::discover::find_excel_files(&[dir.path().to_path_buf()], true);
    let deep_names: Vec<String> = deep
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(deep_names, vec!["a.xlsx", "b.xlsx", "c.xlsx"]);
}
