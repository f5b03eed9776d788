use assert_cmd::Command;
use predicates::prelude::*;

fn birzha() -> Command {
    Command::cargo_bin("birzha").unwrap()
}

#[test]
fn list_prints_both_catalogs() {
    birzha()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("USD").and(predicate::str::contains("CNY/RUB")));
}

#[test]
fn list_can_be_narrowed_to_pairs() {
    birzha()
        .args(["list", "pairs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CNY/RUB").and(predicate::str::contains("USD").not()));
}

#[test]
fn bad_date_fails_before_any_network_call() {
    birzha()
        .args([
            "rates", "--symbols", "USD", "--from", "2024-01-01", "--till", "31/12/2024",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn unknown_symbol_is_rejected() {
    birzha()
        .args([
            "rates", "--symbols", "ZZZ", "--from", "01/01/2024", "--till", "31/12/2024",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown symbol 'ZZZ'"));
}

#[test]
fn unsupported_timeframe_is_rejected() {
    birzha()
        .args([
            "candles",
            "--symbols",
            "CNY/RUB",
            "--timeframe",
            "45m",
            "--from",
            "01/01/2024",
            "--till",
            "31/12/2024",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unsupported timeframe '45m'"));
}

#[test]
fn empty_symbol_list_is_a_usage_error() {
    birzha()
        .args(["rates", "--from", "01/01/2024", "--till", "31/12/2024"])
        .assert()
        .failure();
}
