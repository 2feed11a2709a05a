//! Workbook fixtures written with rust_xlsxwriter at test time

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Model!A1:A3 = Sales, Model!B1 = Revenue (=SUM(Sales)),
/// Model!B2 = Bonus (=IF(Revenue>100,Revenue*Rate,0)),
/// Inputs!B2 = Rate (0.07), TaxRate = constant 0.0725
pub fn sales_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();

    let model = workbook.add_worksheet();
    model.set_name("Model").unwrap();
    for row in 0..3u32 {
        model.write_number(row, 0, f64::from(row + 1) * 50.0).unwrap();
    }
    model.write_formula(0, 1, "=SUM(Sales)").unwrap();
    model
        .write_formula(1, 1, "=IF(Revenue>100,Revenue*Rate,0)")
        .unwrap();

    let inputs = workbook.add_worksheet();
    inputs.set_name("Inputs").unwrap();
    inputs.write_string(1, 0, "Rate").unwrap();
    inputs.write_number(1, 1, 0.07).unwrap();

    workbook.define_name("Sales", "=Model!$A$1:$A$3").unwrap();
    workbook.define_name("Revenue", "=Model!$B$1").unwrap();
    workbook.define_name("Bonus", "=Model!$B$2").unwrap();
    workbook.define_name("Rate", "=Inputs!$B$2").unwrap();
    workbook.define_name("TaxRate", "=0.0725").unwrap();

    workbook.save_to_buffer().unwrap()
}

/// Pair points at Model!C1 (a formula) and then Inputs!B2 (a value)
pub fn multi_destination_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();

    let model = workbook.add_worksheet();
    model.set_name("Model").unwrap();
    model.write_formula(0, 2, "=1+1").unwrap();

    let inputs = workbook.add_worksheet();
    inputs.set_name("Inputs").unwrap();
    inputs.write_number(1, 1, 5).unwrap();

    workbook
        .define_name("Pair", "=Model!$C$1,Inputs!$B$2")
        .unwrap();

    workbook.save_to_buffer().unwrap()
}

/// Alpha and Beta reference each other
pub fn cyclic_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.write_formula(0, 0, "=Beta+1").unwrap();
    sheet.write_formula(0, 1, "=Alpha-1").unwrap();

    workbook.define_name("Alpha", "=Sheet1!$A$1").unwrap();
    workbook.define_name("Beta", "=Sheet1!$B$1").unwrap();

    workbook.save_to_buffer().unwrap()
}

/// A print area and an autofilter on Sheet1, which make Excel store
/// `_xlnm.Print_Area` and `_xlnm._FilterDatabase`, plus the user name Total
pub fn builtin_names_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Amount").unwrap();
    for row in 1..4u32 {
        sheet.write_number(row, 0, f64::from(row)).unwrap();
    }
    sheet.write_formula(4, 0, "=SUM(A2:A4)").unwrap();
    sheet.set_print_area(0, 0, 4, 0).unwrap();
    sheet.autofilter(0, 0, 3, 0).unwrap();

    workbook.define_name("Total", "=Sheet1!$A$5").unwrap();

    workbook.save_to_buffer().unwrap()
}

/// Write `bytes` into `dir` and return the path
pub fn write_fixture(dir: &Path, file_name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).unwrap();
    path
}
