/// Spreadsheet fixtures written to disk for the reader and the importer
///
/// XLSX files are the smallest package calamine accepts: workbook, one
/// worksheet, relationships, and inline strings instead of a shared string table.
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

pub fn number(value: f64) -> CellValue {
    CellValue::Number(value)
}

/// Standard three-column layout, everything as text
pub fn text_row(id: &str, name: &str, date: &str) -> Vec<CellValue> {
    vec![text(id), text(name), text(date)]
}

pub fn header() -> Vec<CellValue> {
    text_row("id", "name", "date")
}

pub fn write_csv(dir: &Path, file_name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(file_name);
    let mut contents = lines.join("\n");
    contents.push('\n');
    std::fs::write(&path, contents).expect("Failed to write csv fixture");
    path
}

/// `rows[0]` lands on sheet row 1. An empty row vector leaves a gap in the sheet.
pub fn write_xlsx(dir: &Path, file_name: &str, rows: &[Vec<CellValue>]) -> PathBuf {
    let path = dir.join(file_name);
    let file = std::fs::File::create(&path).expect("Failed to create xlsx fixture");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", worksheet(rows)),
    ];

    for (name, body) in parts {
        zip.start_file(name, options)
            .expect("Failed to start xlsx part");
        zip.write_all(body.as_bytes())
            .expect("Failed to write xlsx part");
    }
    zip.finish().expect("Failed to finish xlsx fixture");

    path
}

fn column_name(index: usize) -> String {
    let mut name = String::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    name
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn worksheet(rows: &[Vec<CellValue>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str(&format!(
        r#"<dimension ref="A1:{}{}"/><sheetData>"#,
        column_name(width - 1),
        rows.len().max(1)
    ));

    for (row_index, cells) in rows.iter().enumerate() {
        if cells.is_empty() {
            continue;
        }
        let row_number = row_index + 1;
        xml.push_str(&format!(r#"<row r="{}">"#, row_number));
        for (column, cell) in cells.iter().enumerate() {
            let reference = format!("{}{}", column_name(column), row_number);
            match cell {
                CellValue::Text(value) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    reference,
                    escape(value)
                )),
                CellValue::Number(value) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value))
                }
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;
