//! Tests for incremental recalculation on large and deep sheets

use sheetcalc::prelude::*;
use std::time::{Duration, Instant};

/// Test that a deep chain recomputes exactly the cells downstream of an edit
#[test]
fn test_deep_chain_recalculates_only_dependents() {
    const DEPTH: usize = 200;

    let mut sheet = Spreadsheet::new();
    sheet.set_contents_of_cell("A1", "1").unwrap();
    for i in 2..=DEPTH {
        sheet
            .set_contents_of_cell(&format!("A{}", i), &format!("=A{} + 1", i - 1))
            .unwrap();
    }
    assert_eq!(
        sheet.cell_value(&format!("A{}", DEPTH)).unwrap(),
        &CellValue::Number(DEPTH as f64)
    );

    let start = Instant::now();

    let order = sheet.set_contents_of_cell("A1", "10").unwrap();
    assert_eq!(order.len(), DEPTH);
    assert_eq!(sheet.last_recalc().cells_recalculated, DEPTH);

    let mid = DEPTH / 2;
    let order = sheet
        .set_contents_of_cell(&format!("A{}", mid), "0")
        .unwrap();
    assert_eq!(order.len(), DEPTH - mid + 1);
    assert_eq!(order[0], format!("A{}", mid));
    assert_eq!(sheet.last_recalc().cells_recalculated, DEPTH - mid + 1);

    // Cells upstream of the edit keep their values
    assert_eq!(
        sheet.cell_value(&format!("A{}", mid - 1)).unwrap(),
        &CellValue::Number((mid + 8) as f64)
    );
    assert_eq!(
        sheet.cell_value(&format!("A{}", DEPTH)).unwrap(),
        &CellValue::Number((DEPTH - mid) as f64)
    );

    // Editing the last cell touches nothing else
    let order = sheet
        .set_contents_of_cell(&format!("A{}", DEPTH), "7")
        .unwrap();
    assert_eq!(order.len(), 1);

    assert!(start.elapsed() < Duration::from_secs(2));
}

/// Test that unrelated cells are never recomputed
#[test]
fn test_unrelated_cells_are_not_recalculated() {
    let mut sheet = Spreadsheet::new();
    for i in 1..=100 {
        sheet
            .set_contents_of_cell(&format!("B{}", i), &format!("={} * 2", i))
            .unwrap();
    }
    sheet.set_contents_of_cell("C1", "=B1 + B2").unwrap();

    sheet.set_contents_of_cell("B1", "5").unwrap();
    assert_eq!(sheet.last_recalc().cells_recalculated, 2);
    assert_eq!(sheet.cell_value("C1").unwrap(), &CellValue::Number(9.0));
}

/// Test a doubling tree: each level sums two cells of the next level
#[test]
fn test_long_formula_tree() {
    let mut sheet = Spreadsheet::new();
    sheet.set_contents_of_cell("sum1", "= a1 + a2").unwrap();

    let depth = 100;
    let mut i = 1;
    while i <= depth * 2 {
        sheet
            .set_contents_of_cell(&format!("a{}", i), &format!("= a{} + a{}", i + 2, i + 3))
            .unwrap();
        sheet
            .set_contents_of_cell(&format!("a{}", i + 1), &format!("= a{}+ a{}", i + 2, i + 3))
            .unwrap();
        i += 2;
    }

    let start = Instant::now();

    sheet.set_contents_of_cell(&format!("a{}", i), "1").unwrap();
    sheet.set_contents_of_cell(&format!("a{}", i + 1), "1").unwrap();
    let value = sheet.cell_value("sum1").unwrap().as_number().unwrap();
    assert!((value - 2f64.powi(depth as i32 + 1)).abs() < 1.0);

    sheet.set_contents_of_cell(&format!("a{}", i), "0").unwrap();
    let value = sheet.cell_value("sum1").unwrap().as_number().unwrap();
    assert!((value - 2f64.powi(depth as i32)).abs() < 1.0);

    sheet.set_contents_of_cell(&format!("a{}", i + 1), "0").unwrap();
    let value = sheet.cell_value("sum1").unwrap().as_number().unwrap();
    assert!(value.abs() < 0.1);

    assert!(start.elapsed() < Duration::from_secs(2));
}

/// Test a long cycle through many cells is detected and rolled back
#[test]
fn test_long_cycle_rejected() {
    let mut sheet = Spreadsheet::new();
    for i in 1..500 {
        sheet
            .set_contents_of_cell(&format!("A{}", i + 1), &format!("=A{}", i))
            .unwrap();
    }
    sheet.set_contents_of_cell("A1", "3").unwrap();
    assert_eq!(sheet.cell_value("A500").unwrap(), &CellValue::Number(3.0));

    let err = sheet.set_contents_of_cell("A1", "=A500").unwrap_err();
    assert!(err.is_circular());
    assert_eq!(sheet.cell_contents("A1").unwrap(), &CellContents::Number(3.0));
    assert_eq!(sheet.cell_value("A500").unwrap(), &CellValue::Number(3.0));
}
