//! Binary-level tests: exit codes, stdout and files written.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

const LISTING: &str = include_str!("../../tsxquote-core/tests/fixtures/interlisted-companies.txt");
const CEU: &str = include_str!("../../tsxquote-core/tests/fixtures/ceu_quote_summary.json");
const XIU: &str = include_str!("../../tsxquote-core/tests/fixtures/xiu_quote_summary.json");
const NOT_FOUND: &str = include_str!("../../tsxquote-core/tests/fixtures/not_found.json");

fn tsxquote() -> Command {
    let mut cmd = Command::cargo_bin("tsxquote").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a config whose endpoints all point at `base`.
fn write_config(dir: &Path, base: &str) -> PathBuf {
    write_config_with_watchlist(dir, base, &["CEU.TO"])
}

fn write_config_with_watchlist(dir: &Path, base: &str, watchlist: &[&str]) -> PathBuf {
    let path = dir.join("tsxquote.toml");
    let watchlist = watchlist
        .iter()
        .map(|s| format!("{s:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    let toml = format!(
        r#"watchlist = [{watchlist}]

[symbols]
url = "{base}/interlisted-companies.txt"

[provider]
base_url = "{base}"
cookie_url = "{base}/consent"

[http]
timeout_secs = 5

[export]
path = "{export}"
"#,
        export = dir.join("out.csv").display()
    );
    std::fs::write(&path, toml).unwrap();
    path
}

/// Symbol list, handshake, and quote data for CEU.TO and XIU.TO. Any other
/// symbol answers 404.
fn mock_market(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/interlisted-companies.txt");
        then.status(200).body(LISTING);
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/test/getcrumb");
        then.status(200).body("crumb123");
    });
    for (symbol, status, body) in [
        ("CEU.TO", 200u16, CEU),
        ("XIU.TO", 200, XIU),
        ("ABC.TO", 404, NOT_FOUND),
    ] {
        server.mock(move |when, then| {
            when.method(GET)
                .path(format!("/v10/finance/quoteSummary/{symbol}"));
            then.status(status)
                .header("content-type", "application/json")
                .body(body);
        });
    }
}

#[test]
fn help_lists_subcommands() {
    tsxquote()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("symbols"))
        .stdout(predicate::str::contains("watchlist"));
}

#[test]
fn unreachable_symbol_list_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:1");

    tsxquote()
        .arg("--config")
        .arg(&config)
        .arg("symbols")
        .assert()
        .failure()
        .stderr(predicate::str::contains("fetching the TSX symbol list"));
}

#[test]
fn default_run_fails_when_network_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:1");

    tsxquote().arg("--config").arg(&config).assert().failure();
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn missing_config_file_is_an_error() {
    tsxquote()
        .args(["--config", "/nonexistent/tsxquote.toml", "symbols"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading config"));
}

#[test]
fn malformed_symbol_argument_is_an_error() {
    tsxquote()
        .args(["info", "NOT A SYMBOL"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad symbol argument"));
}

#[test]
fn symbols_prints_one_per_line() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/interlisted-companies.txt");
        then.status(200).body(LISTING);
    });
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());

    tsxquote()
        .arg("--config")
        .arg(&config)
        .arg("symbols")
        .assert()
        .success()
        .stdout("CEU.TO\nABX.TO\nBBD-B.TO\nCCO.TO\nTSAT.TO\n");
}

#[test]
fn symbols_only_export_writes_the_listing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/interlisted-companies.txt");
        then.status(200).body(LISTING);
    });
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());
    let output = dir.path().join("symbols.csv");

    tsxquote()
        .arg("--config")
        .arg(&config)
        .args(["export", "--symbols-only", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 5 rows"));

    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text, "Symbol\nCEU.TO\nABX.TO\nBBD-B.TO\nCCO.TO\nTSAT.TO\n");
}

#[test]
fn info_for_unknown_symbol_exits_non_zero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/test/getcrumb");
        then.status(200).body("crumb123");
    });
    server.mock(|when, then| {
        when.method(GET).path("/v10/finance/quoteSummary/INVALID.TO");
        then.status(404).body(
            r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: INVALID.TO"}}}"#,
        );
    });
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());

    tsxquote()
        .arg("--config")
        .arg(&config)
        .args(["info", "INVALID.TO"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("symbol not found: INVALID.TO"));
}

#[test]
fn default_run_exports_every_listed_symbol() {
    let server = MockServer::start();
    mock_market(&server);
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());

    tsxquote()
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 5 rows"));

    let mut rdr = csv::Reader::from_path(dir.path().join("out.csv")).unwrap();
    assert_eq!(&rdr.headers().unwrap()[0], "Symbol");
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    let symbols: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(symbols, ["CEU.TO", "ABX.TO", "BBD-B.TO", "CCO.TO", "TSAT.TO"]);
    assert_eq!(&rows[0][1], "CES Energy Solutions Corp.");
    assert!(!rows[1][rows[1].len() - 1].is_empty());
}

#[test]
fn info_prints_company_report() {
    let server = MockServer::start();
    mock_market(&server);
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());

    tsxquote()
        .arg("--config")
        .arg(&config)
        .args(["info", "ceu.to"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CES Energy Solutions Corp. (CEU.TO)"))
        .stdout(predicate::str::contains("$1.85B"));
}

#[test]
fn info_json_prints_symbol_and_fields() {
    let server = MockServer::start();
    mock_market(&server);
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());

    let output = tsxquote()
        .arg("--config")
        .arg(&config)
        .args(["info", "CEU.TO", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["symbol"], "CEU.TO");
    assert_eq!(json["info"]["sector"], "Energy");
    assert_eq!(json["info"]["trailingPE"], 9.874);
}

#[test]
fn etf_prints_fund_report_and_verdict() {
    let server = MockServer::start();
    mock_market(&server);
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());

    tsxquote()
        .arg("--config")
        .arg(&config)
        .args(["etf", "XIU.TO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("iShares S&P/TSX 60 Index ETF (XIU.TO)"))
        .stdout(predicate::str::contains("0.18%"))
        .stdout(predicate::str::contains("This ETF looks strong"));
}

#[test]
fn watchlist_succeeds_when_some_symbols_report() {
    let server = MockServer::start();
    mock_market(&server);
    let dir = tempfile::tempdir().unwrap();
    let config = write_config_with_watchlist(dir.path(), &server.base_url(), &["CEU.TO", "ABC.TO"]);

    tsxquote()
        .arg("--config")
        .arg(&config)
        .arg("watchlist")
        .assert()
        .success()
        .stdout(predicate::str::contains("(CEU.TO)"))
        .stdout(predicate::str::contains("ABC.TO: no data"));
}

#[test]
fn watchlist_fails_when_every_symbol_fails() {
    let server = MockServer::start();
    mock_market(&server);
    let dir = tempfile::tempdir().unwrap();
    let config = write_config_with_watchlist(dir.path(), &server.base_url(), &["ABC.TO", "GONE.TO"]);

    tsxquote()
        .arg("--config")
        .arg(&config)
        .arg("watchlist")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no watchlist symbol could be reported"));
}
