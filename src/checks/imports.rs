use std::path::{Path, PathBuf};

use crate::checks::source_files;
use crate::error::Result;
use crate::model::{CheckReport, Checker, Violation};
use crate::parser::{SourceParser, SyntaxTree};
use crate::resolver::{owning_feature, resolve_relative_import};
use crate::workspace::WorkspaceContext;

/// ある feature から別の feature の内部への相対 import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossFeatureImport {
    pub file: PathBuf,
    pub from_feature: String,
    pub to_feature: String,
    pub specifier: String,
}

impl From<CrossFeatureImport> for Violation {
    fn from(import: CrossFeatureImport) -> Self {
        let message = format!(
            "feature '{}' が feature '{}' を直接 import しています ('{}')",
            import.from_feature, import.to_feature, import.specifier
        );
        Violation::new(import.file, message)
    }
}

/// features 配下の全 .ts ファイルについて、他の feature への相対 import が無いか調べる
///
/// パッケージ名やパスエイリアスによる import は解決できないので対象外。
/// features ディレクトリが無ければ 0 件チェックの合格。
pub fn check(ws: &WorkspaceContext, parser: &impl SourceParser) -> Result<CheckReport> {
    let mut report = CheckReport::new(Checker::Imports, &ws.features_dir);

    if !ws.features_dir.is_dir() {
        tracing::info!(dir = %ws.features_dir.display(), "features ディレクトリが無いのでスキップ");
        return Ok(report);
    }

    for file in source_files(&ws.features_dir, |_| true)? {
        report.checked += 1;
        let tree = match parser.parse_file(&file) {
            Ok(tree) => tree,
            Err(e) => {
                report.push(&file, e.to_string());
                continue;
            }
        };
        for import in cross_feature_imports(&tree, &ws.features_dir)? {
            report.violations.push(import.into());
        }
    }

    tracing::info!(files = report.checked, violations = report.violations.len(), "imports チェック完了");
    Ok(report)
}

/// 1 ファイル分の import から feature 境界を越えるものを抜き出す
pub fn cross_feature_imports(tree: &SyntaxTree, features_dir: &Path) -> Result<Vec<CrossFeatureImport>> {
    let Some(from_feature) = owning_feature(&tree.path, features_dir) else {
        return Ok(Vec::new());
    };

    let mut found = Vec::new();
    for specifier in &tree.imports {
        let Some(resolved) = resolve_relative_import(specifier, &tree.path)? else {
            continue;
        };
        let Some(to_feature) = owning_feature(&resolved, features_dir) else {
            continue;
        };
        if to_feature != from_feature {
            tracing::debug!(file = %tree.path.display(), %specifier, "feature 境界を越える import");
            found.push(CrossFeatureImport {
                file: tree.path.clone(),
                from_feature: from_feature.clone(),
                to_feature,
                specifier: specifier.clone(),
            });
        }
    }
    Ok(found)
}
