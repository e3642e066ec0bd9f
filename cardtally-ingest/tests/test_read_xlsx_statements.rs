use std::io::{Cursor, Write};

use cardtally_core::Issuer;
use cardtally_ingest::{normalize, read_workbook, Detection, Detector};
use rust_decimal::Decimal;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

enum X<'a> {
    S(&'a str),
    N(f64),
}

fn column_letter(col: usize) -> char {
    (b'A' + col as u8) as char
}

fn sheet_xml(rows: &[(usize, Vec<X<'_>>)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row_index, cells) in rows {
        let r = row_index + 1;
        xml.push_str(&format!(r#"<row r="{r}">"#));
        for (c, cell) in cells.iter().enumerate() {
            let reference = format!("{}{r}", column_letter(c));
            match cell {
                X::S(s) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{s}</t></is></c>"#
                )),
                X::N(n) => xml.push_str(&format!(r#"<c r="{reference}"><v>{n}</v></c>"#)),
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Minimal xlsx package: one worksheet part per entry, inline strings only.
fn build_xlsx(sheets: &[(&str, Vec<(usize, Vec<X<'_>>)>)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut overrides = String::new();
    let mut sheet_entries = String::new();
    let mut rels = String::new();
    for (i, (name, _)) in sheets.iter().enumerate() {
        let n = i + 1;
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
        sheet_entries.push_str(&format!(r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
    }

    let parts = [
        (
            "[Content_Types].xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
            ),
        ),
        (
            "_rels/.rels".to_string(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
                .to_string(),
        ),
        (
            "xl/workbook.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheet_entries}</sheets></workbook>"#
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
            ),
        ),
    ];

    for (name, body) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    for (i, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
            .unwrap();
        zip.write_all(sheet_xml(rows).as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

#[test]
fn test_kb_statement_from_xlsx() {
    // Preamble only in A1; rows 2..6 are absent from the file.
    let bytes = build_xlsx(&[(
        "이용내역",
        vec![
            (0, vec![X::S("KB국민카드 이용내역 조회")]),
            (
                6,
                vec![
                    X::S("이용일"),
                    X::S("이용카드명"),
                    X::S("이용하신곳"),
                    X::S("국내이용금액 (원)"),
                    X::S("결제방법"),
                    X::S("상태"),
                ],
            ),
            (
                7,
                vec![
                    X::S("2024.03.02"),
                    X::S("KB국민 노리2 체크"),
                    X::S("이디야커피"),
                    X::N(3200.0),
                    X::S("일시불"),
                    X::S("전표매입"),
                ],
            ),
            (
                8,
                vec![
                    X::S("2024.03.04"),
                    X::S("KB국민 노리2 체크"),
                    X::S("쿠팡"),
                    X::N(300000.0),
                    X::S("할부(3개월)"),
                    X::S("전표매입"),
                ],
            ),
        ],
    )]);

    let workbook = read_workbook(&bytes).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["이용내역"]);

    let detection = Detector::default().detect_named(&workbook, Some("kb_202403.xlsx"));
    assert_eq!(detection, Detection::Issuer(Issuer::Kb));

    let records = normalize(&workbook, Issuer::Kb).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].merchant, "이디야커피");
    assert_eq!(records[0].amount, Decimal::from(3200));
    assert_eq!(records[1].amount, Decimal::from(100_000));
}

#[test]
fn test_samsung_statement_on_second_sheet() {
    let header = || {
        vec![
            X::S("승인일자"),
            X::S("승인시각"),
            X::S("가맹점명"),
            X::S("승인금액(원)"),
        ]
    };
    let bytes = build_xlsx(&[
        ("요약", vec![(0, vec![X::S("삼성카드")])]),
        (
            "승인내역",
            vec![
                (0, header()),
                (1, vec![X::S("2024.06.01"), X::S("12:30:11"), X::S("스타벅스"), X::N(5000.0)]),
                (2, vec![X::S("2024.06.01"), X::S("12:30:11"), X::S("스타벅스"), X::N(-5000.0)]),
                (3, vec![X::S("2024.06.02"), X::S("08:05:00"), X::S("교보문고"), X::N(21000.0)]),
            ],
        ),
    ]);

    let workbook = read_workbook(&bytes).unwrap();
    let detection = Detector::default().detect(&workbook);
    assert_eq!(detection.issuer(), Some(Issuer::Samsung));

    let records = normalize(&workbook, Issuer::Samsung).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].merchant, "교보문고");
}

#[test]
fn test_unknown_layout_is_unrecognized() {
    let bytes = build_xlsx(&[(
        "Sheet1",
        vec![
            (0, vec![X::S("date"), X::S("payee"), X::S("amount")]),
            (1, vec![X::S("2024-01-01"), X::S("coffee"), X::N(4.5)]),
        ],
    )]);
    let detection = Detector::default().detect_bytes(&bytes, Some("statement.xlsx"));
    assert_eq!(detection, Detection::Unrecognized);
}
