// src/report.rs
use std::io::{self, Write};
use std::path::Path;

use crate::model::CheckReport;

/// レポートを書き出し、合格なら true を返す
///
/// 違反があれば件数付きの見出しと箇条書きを `err` に、無ければ 1 行の要約を `out` に書く。
/// パスはすべて `root` からの相対で表示する。
pub fn write_report(
    report: &CheckReport,
    root: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    let target = report.target_relative_to(root).display();

    if report.passed() {
        writeln!(
            out,
            "✓ [{}] {}: {} {} を検査、違反はありません",
            report.checker,
            target,
            report.checked,
            report.checker.unit()
        )?;
        return Ok(true);
    }

    writeln!(
        err,
        "✗ {} 件の違反が見つかりました [{}] {}",
        report.violations.len(),
        report.checker,
        target
    )?;
    for violation in &report.violations {
        writeln!(
            err,
            "  - {}: {}",
            violation.file_relative_to(root).display(),
            violation.message
        )?;
    }
    Ok(false)
}

/// 標準出力 / 標準エラーに書き出す
pub fn emit(report: &CheckReport, root: &Path) -> io::Result<bool> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    write_report(report, root, &mut stdout.lock(), &mut stderr.lock())
}
