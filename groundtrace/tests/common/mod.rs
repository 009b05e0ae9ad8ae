//! Shared fixtures: small harness workbooks written at test time.

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Cell value for a fixture row.
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

pub fn write_workbook(path: &Path, headers: &[&str], rows: &[Vec<Cell<'_>>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(r as u32 + 1, col as u16, *text).unwrap();
                }
                Cell::Number(n) => {
                    sheet.write_number(r as u32 + 1, col as u16, *n).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save(path).unwrap();
}

pub fn text_rows<'a>(rows: &[&[&'a str]]) -> Vec<Vec<Cell<'a>>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|c| if c.is_empty() { Cell::Blank } else { Cell::Text(c) })
                .collect()
        })
        .collect()
}

pub struct HarnessFixture {
    pub dir: tempfile::TempDir,
    pub wirelist: PathBuf,
    pub connlist: PathBuf,
    pub inline: PathBuf,
}

/// Body harness with:
/// - G101: single ground for the headlamp X10
/// - G201/G202: bussed through weld SP1 (tail lamp X20, door module X30)
/// - G301: listed in the connector list but never wired
/// - IL1/IL2: inline pair carrying X30's return to SP1
/// - wire W9 without a to code (sheet row 10)
pub fn body_harness() -> HarnessFixture {
    let dir = tempfile::tempdir().unwrap();
    let wirelist = dir.path().join("wirelist.xlsx");
    let connlist = dir.path().join("connlist.xlsx");
    let inline = dir.path().join("inline.xlsx");

    write_workbook(
        &wirelist,
        &["Wire No", "From Code", "From Pin", "To Code", "To Pin", "Wire Size", "Option", "Color"],
        &[
            vec![Cell::Text("W1"), Cell::Text("X10"), Cell::Number(1.0), Cell::Text("G101"), Cell::Number(1.0), Cell::Number(0.5), Cell::Text("STD"), Cell::Text("B")],
            vec![Cell::Text("W2"), Cell::Text("X10"), Cell::Number(4.0), Cell::Text("G101"), Cell::Number(1.0), Cell::Number(0.35), Cell::Text("LED"), Cell::Text("B")],
            vec![Cell::Text("W3"), Cell::Text("X20"), Cell::Number(2.0), Cell::Text("SP1"), Cell::Text("X"), Cell::Number(0.5), Cell::Text("STD"), Cell::Text("B")],
            vec![Cell::Text("W4"), Cell::Text("SP1"), Cell::Text("X"), Cell::Text("G201"), Cell::Number(1.0), Cell::Number(2.5), Cell::Text("STD"), Cell::Text("B")],
            vec![Cell::Text("W5"), Cell::Text("SP1"), Cell::Text("X"), Cell::Text("G202"), Cell::Number(1.0), Cell::Number(2.5), Cell::Text("STD"), Cell::Text("B")],
            vec![Cell::Text("W6"), Cell::Text("X30"), Cell::Number(7.0), Cell::Text("IL1"), Cell::Number(3.0), Cell::Number(0.5), Cell::Text("HIGH"), Cell::Text("B")],
            vec![Cell::Text("W7"), Cell::Text("IL1"), Cell::Number(3.0), Cell::Text("IL2"), Cell::Number(3.0), Cell::Number(0.5), Cell::Text("HIGH"), Cell::Text("B")],
            vec![Cell::Text("W8"), Cell::Text("IL2"), Cell::Number(3.0), Cell::Text("SP1"), Cell::Text("X"), Cell::Number(0.5), Cell::Text("HIGH"), Cell::Text("B")],
            vec![Cell::Text("W9"), Cell::Text("X40"), Cell::Number(1.0), Cell::Blank, Cell::Blank, Cell::Number(0.5), Cell::Blank, Cell::Text("B")],
        ],
    );

    write_workbook(
        &connlist,
        &["短号", "中文描述", "English Description", "Part Number"],
        &text_rows(&[
            &["G101", "发动机舱接地点", "Engine bay ground", "EY-01"],
            &["G201", "车身接地点", "Body GND", "EY-02"],
            &["G202", "车身接地点", "Body GND", "EY-02"],
            &["G301", "备用接地", "Spare ground", "EY-03"],
            &["X10", "左前大灯", "LH headlamp", "C-1001"],
            &["X20", "左尾灯", "LH tail lamp", "C-2001"],
            &["X30", "", "Door module", "C-3001"],
            &["IL1", "车身-门对接", "Body to door inline", "C-9001"],
            &["IL2", "门-车身对接", "Door to body inline", "C-9002"],
        ]),
    );

    write_workbook(&inline, &["Inline 短号", "Remark"], &text_rows(&[&["IL1", "door"], &["IL2", "door"]]));

    HarnessFixture {
        dir,
        wirelist,
        connlist,
        inline,
    }
}
