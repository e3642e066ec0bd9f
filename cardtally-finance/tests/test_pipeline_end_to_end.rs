use cardtally_core::{Cell, Issuer, Sheet, Workbook};
use cardtally_finance::category_rules::{FOOD, SHOPPING, TRANSPORT};
use cardtally_finance::{write_records_csv, AggregateOptions, FileOutcome, Pipeline, RuleSet};
use cardtally_ingest::Detector;
use rust_decimal::Decimal;

fn row(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|v| Cell::text_of(*v)).collect()
}

fn preamble(n: usize) -> Vec<Vec<Cell>> {
    (0..n).map(|i| vec![Cell::text_of(format!("조회기간 안내 {i}"))]).collect()
}

/// Lotte: three purchases and one cancelled row.
fn lotte_statement() -> Workbook {
    let mut rows = preamble(3);
    rows.push(row(&["이용일자", "이용카드", "이용가맹점", "업종", "이용금액", "취소여부"]));
    rows.push(row(&["2024.01.05", "본인", "강남역 공영주차장", "", "3,000", "N"]));
    rows.push(row(&["2024.01.06", "본인", "쿠팡", "", "25,000", "N"]));
    rows.push(row(&["2024.01.07", "본인", "스타벅스 역삼점", "", "4,500", "N"]));
    rows.push(row(&["2024.01.08", "본인", "스타벅스 역삼점", "", "4,500", "Y"]));
    Workbook::new(vec![Sheet::new("이용내역", rows)])
}

/// KB: one lump-sum purchase and one two-month installment.
fn kb_statement() -> Workbook {
    let mut rows = preamble(6);
    rows.push(row(&["이용일", "이용카드명", "이용하신곳", "국내이용금액\n(원)", "결제방법", "상태"]));
    rows.push(row(&["2024.01.10", "KB국민 노리2", "이디야커피", "10,000", "일시불", "전표매입"]));
    rows.push(row(&["2024.01.11", "KB국민 노리2", "11번가", "20,000", "할부(2개월)", "전표매입"]));
    Workbook::new(vec![Sheet::new("Sheet1", rows)])
}

fn pipeline() -> Pipeline {
    Pipeline::new(Detector::default(), RuleSet::builtin().unwrap())
}

#[test]
fn test_two_issuer_batch() {
    let report = pipeline().run_workbooks(&[("lotte.xlsx", lotte_statement()), ("kb.xlsx", kb_statement())]);

    assert_eq!(
        report.files[0].outcome,
        FileOutcome::Parsed {
            issuer: Issuer::Lotte,
            rows: 3
        }
    );
    assert_eq!(
        report.files[1].outcome,
        FileOutcome::Parsed {
            issuer: Issuer::Kb,
            rows: 2
        }
    );

    assert_eq!(report.records.len(), 5);
    assert_eq!(report.summary.issuer_total(Issuer::Kb), Some(Decimal::from(20_000)));
    assert_eq!(report.summary.issuer_total(Issuer::Lotte), Some(Decimal::from(32_500)));
    assert_eq!(report.summary.total, Decimal::from(52_500));

    // 국민카드 sorts before 롯데카드
    assert!(report.records[..2].iter().all(|r| r.issuer == Issuer::Kb));
    let lotte: Vec<_> = report.records[2..].iter().map(|r| r.category.as_str()).collect();
    assert_eq!(lotte, vec![TRANSPORT, FOOD, SHOPPING]);
}

#[test]
fn test_unrecognized_file_is_reported_and_skipped() {
    let unknown = Workbook::new(vec![Sheet::new("Sheet1", vec![row(&["date", "payee", "amount"])])]);
    let report = pipeline().run_workbooks(&[("unknown.xlsx", unknown), ("kb.xlsx", kb_statement())]);

    assert_eq!(report.files[0].outcome, FileOutcome::Unrecognized);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.unrecognized(), 1);
    assert_eq!(report.parsed(), 1);
}

#[test]
fn test_recategorize_all_overrides_vendor_category() {
    let mut rows = vec![row(&["이용일자", "이용가맹점", "업종", "이용금액"])];
    rows.push(row(&["2024.01.05", "스타벅스 역삼점", "커피전문점", "4,500"]));
    let lotte = Workbook::new(vec![Sheet::new("Sheet1", rows)]);

    let kept = pipeline().run_workbooks(&[("a.xlsx", lotte.clone())]);
    assert_eq!(kept.records[0].category, "커피전문점");

    let redone = pipeline()
        .with_options(AggregateOptions { recategorize_all: true })
        .run_workbooks(&[("a.xlsx", lotte)]);
    assert_eq!(redone.records[0].category, FOOD);
}

#[test]
fn test_export_after_batch() {
    let report = pipeline().run_workbooks(&[("kb.xlsx", kb_statement())]);
    let mut out = Vec::new();
    write_records_csv(&mut out, &report.records).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "date,issuer,category,merchant,amount\n\
         2024.01.10,국민카드,음식점/카페/편의점,이디야커피,10000\n\
         2024.01.11,국민카드,취미/쇼핑,11번가,10000\n"
    );
}
