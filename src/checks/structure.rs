use crate::checks::feature_dirs;
use crate::error::Result;
use crate::model::{CheckReport, Checker};
use crate::workspace::WorkspaceContext;

/// feature ごとに必須のファイル (`<name>.<suffix>.ts`)
pub const REQUIRED_SUFFIXES: [&str; 4] = ["routes", "page", "data", "state"];

pub fn required_files(feature: &str) -> [String; 4] {
    REQUIRED_SUFFIXES.map(|suffix| format!("{feature}.{suffix}.ts"))
}

/// features 直下の各ディレクトリに必須ファイルが揃っているか確認する
///
/// features ディレクトリ自体が無い場合は違反 1 件として報告する
/// (他のチェッカーはこの場合を合格扱いにする)。
pub fn check(ws: &WorkspaceContext) -> Result<CheckReport> {
    let mut report = CheckReport::new(Checker::Structure, &ws.features_dir);

    if !ws.features_dir.is_dir() {
        report.push(&ws.features_dir, "features ディレクトリがありません");
        return Ok(report);
    }

    for (name, dir) in feature_dirs(&ws.features_dir)? {
        report.checked += 1;
        for file_name in required_files(&name) {
            let path = dir.join(&file_name);
            if !path.is_file() {
                tracing::debug!(feature = %name, file = %file_name, "必須ファイルが不足");
                report.push(path, format!("feature '{name}' に必須ファイル {file_name} がありません"));
            }
        }
    }

    tracing::info!(features = report.checked, violations = report.violations.len(), "structure チェック完了");
    Ok(report)
}
