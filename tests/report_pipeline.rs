//! End-to-end pipeline tests over synthesized brokerage exports.

use folio_statement::compose::{self, OUTPUT_FILE};
use folio_statement::ingest::UploadSelection;
use folio_statement::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn write_fixture_exports(dir: &Path) -> Vec<PathBuf> {
    let holding = "\
Category,Col1,Col2,Col3,Invested,Col5,Value
Client Equity Code/UCID/Name,AB12/90011/Asha Rao
Equity,,,,400000,,460000
Debt,,,,100000,,110000
Equity:-
Scrip Level Holdings
Scrip,Qty,Rate,,,,,,,,Gain
INFY,10,1000,,,,,,,,5000
Total:,,,,,,,,,,2500.5
Mutual Fund:-
Scheme Level Holdings
Scheme,Units,NAV,,,,,,,,Gain
Total:,,,,,,,,,,500.25
";
    let portfolio_value = "\
Particulars,Portfolio Value
Equity,700000
Available Cash,100000
Debt,200000
";
    let xirr = "\
Scheme,XIRR
Since Inception,12.5
";
    let equity = "\
Instrument Name,Category,Quantity,Buy Price,CMP,PandL,Market Value
INFY,Direct Equity,10,1000,1500,5000,15000
TCS,Direct Equity,5,2000,1800,-1000,9000
NIFTYBEES,Equity ETF,50,180,200,1000,10000
";
    let debt = "\
Instrument Name,Category,Quantity,Buy Price,CMP,PandL,Market Value
GILT2030,Debt ETF,100,98,101,300,10100
LIQUIDFUND,Debt Mutual Fund,40,240,250,400,10000
";
    let fno = "\
Month,Order,FNO Profits,FNO Profits Till Date
Feb,2,200,300
Jan,1,100,100
";
    let profits = "\
Scrip,Gain
INFY,1200
TCS,-150
Total,1050
";

    vec![
        write_csv(dir, "Portfolio Value.csv", portfolio_value),
        write_csv(dir, "Holding.csv", holding),
        write_csv(dir, "XIRR.csv", xirr),
        write_csv(dir, "Equity.csv", equity),
        write_csv(dir, "Debt.csv", debt),
        write_csv(dir, "FNO.csv", fno),
        write_csv(dir, "Profits.csv", profits),
    ]
}

#[test]
fn generates_statement_from_csv_exports() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_fixture_exports(dir.path());
    let selection = UploadSelection::from_paths(&paths).unwrap();

    let out_dir = dir.path().join("reports");
    let report = compose::generate_report(
        &selection,
        &dir.path().join("converted"),
        dir.path(),
        &out_dir,
    )
    .unwrap();

    assert_eq!(report, out_dir.join(OUTPUT_FILE));
    let bytes = fs::read(&report).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    // Eight pages: cover, summary, equity, debt, FNO, realized,
    // unrealized, notes.
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Count 8"));
}

#[test]
fn missing_documents_abort_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    // Only two of the seven documents present.
    let paths = vec![
        write_csv(dir.path(), "Holding.csv", "A\n1\n"),
        write_csv(dir.path(), "XIRR.csv", "A\n1\n"),
    ];
    let selection = UploadSelection::from_paths(&paths).unwrap();

    let out_dir = dir.path().join("reports");
    let err = compose::generate_report(
        &selection,
        &dir.path().join("converted"),
        dir.path(),
        &out_dir,
    )
    .unwrap_err();

    match err {
        Error::MissingInput(names) => {
            assert_eq!(names.len(), 5);
            assert!(names.contains(&"Equity.csv".to_string()));
            assert!(!names.contains(&"Holding.csv".to_string()));
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out_dir.join(OUTPUT_FILE).exists());
}

#[test]
fn malformed_client_identity_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = write_fixture_exports(dir.path());
    // Rewrite the Holding export with a two-part identity cell.
    paths[1] = write_csv(
        dir.path(),
        "Holding.csv",
        "Category,Value\nClient Equity Code/UCID/Name,AB12/90011\n",
    );
    let selection = UploadSelection::from_paths(&paths).unwrap();

    let err = compose::generate_report(
        &selection,
        &dir.path().join("converted"),
        dir.path(),
        &dir.path().join("reports"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MalformedClientInfo(_)));
}

#[test]
fn client_identity_outside_holding_is_not_used() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = write_fixture_exports(dir.path());
    // Strip the identity row from Holding and park it in Portfolio
    // Value instead; only the Holding export is an identity source.
    paths[1] = write_csv(
        dir.path(),
        "Holding.csv",
        "\
Category,Col1,Col2,Col3,Invested,Col5,Value
Equity,,,,400000,,460000
Equity:-
Scrip Level Holdings
Scrip,Qty,Rate,,,,,,,,Gain
Total:,,,,,,,,,,100
Mutual Fund:-
Scheme Level Holdings
Scheme,Units,NAV,,,,,,,,Gain
Total:,,,,,,,,,,50
",
    );
    paths[0] = write_csv(
        dir.path(),
        "Portfolio Value.csv",
        "\
Particulars,Portfolio Value
Client Equity Code/UCID/Name,AB12/90011/Asha Rao
Equity,700000
Available Cash,100000
",
    );
    let selection = UploadSelection::from_paths(&paths).unwrap();

    let err = compose::generate_report(
        &selection,
        &dir.path().join("converted"),
        dir.path(),
        &dir.path().join("reports"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::ClientInfoNotFound));
}

#[test]
fn branding_images_are_optional_and_non_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_fixture_exports(dir.path());
    // A corrupt logo must not block the statement.
    fs::write(dir.path().join("logo.png"), b"definitely not a png").unwrap();
    let selection = UploadSelection::from_paths(&paths).unwrap();

    let report = compose::generate_report(
        &selection,
        &dir.path().join("converted"),
        dir.path(),
        &dir.path().join("reports"),
    )
    .unwrap();
    assert!(report.exists());
}
