//! バイナリを実際に起動して、終了コードと出力先 (stdout / stderr) を確かめる

mod common;

use common::Fixture;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn lint(project_root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_angular-slice-lint"))
        .arg("--project-root")
        .arg(project_root)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run angular-slice-lint")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// 2 つの feature が登録済みで、全チェックに通るワークスペース
fn clean_workspace() -> Fixture {
    let fixture = Fixture::new();
    fixture.scaffold_feature("home");
    fixture.scaffold_feature("orders");
    fixture.register(&["home", "orders"]);
    fixture
}

#[test]
fn passing_check_prints_one_summary_line_and_exits_zero() {
    let fixture = clean_workspace();
    let output = lint(fixture.root(), &["structure"]);

    let stdout = stdout_of(&output);
    assert_eq!(output.status.code(), Some(0), "stderr={}", stderr_of(&output));
    assert_eq!(stdout.lines().count(), 1, "stdout={stdout}");
    assert!(stdout.contains("src/app/features"));
    assert!(stdout.contains("2 features"));
    assert!(output.stderr.is_empty(), "stderr={}", stderr_of(&output));
}

#[test]
fn violations_go_to_stderr_with_count_header_and_exit_one() {
    let fixture = clean_workspace();
    fs::remove_file(fixture.app().join("features/home/home.data.ts")).unwrap();
    fs::remove_file(fixture.app().join("features/orders/orders.state.ts")).unwrap();

    let output = lint(fixture.root(), &["structure"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "stdout={}", stdout_of(&output));
    let stderr = stderr_of(&output);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 3, "stderr={stderr}");
    assert!(lines[0].contains("2 件の違反"));
    assert!(lines[1..].iter().all(|line| line.starts_with("  - src/app/features/")));
}

#[test]
fn missing_manifest_is_fatal() {
    let dir = TempDir::new().unwrap();
    let output = lint(dir.path(), &["structure"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr_of(&output).starts_with("Error: "));
}

#[test]
fn all_passes_when_every_checker_passes() {
    let fixture = clean_workspace();
    let output = lint(fixture.root(), &["all"]);

    assert_eq!(output.status.code(), Some(0), "stderr={}", stderr_of(&output));
    assert_eq!(stdout_of(&output).lines().count(), 4);
}

#[test]
fn all_fails_when_any_single_checker_fails() {
    let fixture = clean_workspace();
    fixture.write("src/app/features/home/home.widget.ts", "import { OrdersData } from '../orders/orders.data';");

    let output = lint(fixture.root(), &["all"]);

    assert_eq!(output.status.code(), Some(1));
    // structure / app-routes / feature-routes は合格のまま
    assert_eq!(stdout_of(&output).lines().count(), 3);
    let stderr = stderr_of(&output);
    assert!(stderr.contains("1 件の違反"), "stderr={stderr}");
    assert!(stderr.contains("../orders/orders.data"));
}

#[test]
fn all_keeps_running_after_a_fatal_checker() {
    let fixture = clean_workspace();
    fs::remove_file(fixture.app().join("app.routes.ts")).unwrap();

    let output = lint(fixture.root(), &["all"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Error: "));
    assert_eq!(stdout_of(&output).lines().count(), 3);
}

#[test]
fn verbose_enables_debug_logging() {
    let fixture = clean_workspace();
    let quiet = lint(fixture.root(), &["app-routes"]);
    let verbose = lint(fixture.root(), &["--verbose", "app-routes"]);

    assert_eq!(quiet.status.code(), Some(0));
    assert!(quiet.stderr.is_empty());
    assert_eq!(verbose.status.code(), Some(0));
    assert!(stderr_of(&verbose).contains("DEBUG"));
    assert_eq!(stdout_of(&quiet), stdout_of(&verbose));
}
