use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::checks::{feature_dirs, source_files};
use crate::error::Result;
use crate::model::{CheckReport, Checker};
use crate::parser::{Node, SourceParser, SyntaxTree};
use crate::workspace::WorkspaceContext;

const PAGE_SUFFIX: &str = ".page";

/// 各 feature の `<name>.routes.ts` の先頭ルートが providers と遅延ローダーを持つか検証し、
/// 続けてアプリ全体の `*.routes.ts` で loadComponent の import 先が `.page` か確認する
///
/// features ディレクトリが無ければ 0 件チェックの合格として扱う。
pub fn check(ws: &WorkspaceContext, parser: &impl SourceParser) -> Result<CheckReport> {
    let mut report = CheckReport::new(Checker::FeatureRoutes, &ws.features_dir);

    if !ws.features_dir.is_dir() {
        tracing::info!(dir = %ws.features_dir.display(), "features ディレクトリが無いのでスキップ");
        return Ok(report);
    }

    // 2 回目の走査で同じファイルを読み直さないためのキャッシュ。
    // None はパースに失敗して報告済みのファイル
    let mut parsed: HashMap<PathBuf, Option<SyntaxTree>> = HashMap::new();

    for (name, dir) in feature_dirs(&ws.features_dir)? {
        report.checked += 1;
        let routes_file = dir.join(format!("{name}.routes.ts"));
        if !routes_file.is_file() {
            report.push(&routes_file, format!("feature '{name}' のルートファイルがありません"));
            continue;
        }

        if let Some(tree) = parse_cached(&routes_file, parser, &mut parsed, &mut report) {
            for message in first_route_findings(tree) {
                report.push(&routes_file, message);
            }
        }
    }

    // アプリ全体の loadComponent
    for file in source_files(&ws.app_root, |name| name.ends_with(".routes.ts"))? {
        if let Some(tree) = parse_cached(&file, parser, &mut parsed, &mut report) {
            for message in page_loader_findings(tree) {
                report.push(&file, message);
            }
        }
    }

    tracing::info!(features = report.checked, violations = report.violations.len(), "feature-routes チェック完了");
    Ok(report)
}

fn parse_cached<'a>(
    path: &Path,
    parser: &impl SourceParser,
    parsed: &'a mut HashMap<PathBuf, Option<SyntaxTree>>,
    report: &mut CheckReport,
) -> Option<&'a SyntaxTree> {
    parsed
        .entry(path.to_path_buf())
        .or_insert_with(|| match parser.parse_file(path) {
            Ok(tree) => Some(tree),
            Err(e) => {
                report.push(path, e.to_string());
                None
            }
        })
        .as_ref()
}

/// export された各ルート配列の先頭要素を調べる
pub fn first_route_findings(tree: &SyntaxTree) -> Vec<String> {
    let arrays: Vec<(&str, &[Node])> = tree.exported_arrays().collect();
    if arrays.iter().all(|(_, items)| items.is_empty()) {
        return vec!["空でないルート配列が export されていません".to_string()];
    }

    let mut messages = Vec::new();
    for (name, items) in arrays {
        let Some(first) = items.first() else {
            messages.push(format!("{name}: ルート配列が空です"));
            continue;
        };
        if !first.is_object() {
            messages.push(format!("{name}[0]: 先頭のルートはオブジェクトリテラルである必要があります"));
            continue;
        }

        match first.get("providers") {
            None => messages.push(format!("{name}[0]: providers が宣言されていません")),
            Some(Node::Array(providers)) if providers.is_empty() => {
                messages.push(format!("{name}[0]: providers が空です"))
            }
            Some(_) => {}
        }

        let component = first.get("loadComponent").and_then(Node::deferred_import);
        let children = first.get("loadChildren").and_then(Node::deferred_import);
        if component.is_none() && children.is_none() {
            messages.push(format!(
                "{name}[0]: loadComponent または loadChildren を () => import('…') で指定してください"
            ));
        }
    }
    messages
}

/// ファイル中のすべてのオブジェクトのうち loadComponent を持つものの import 先を調べる
pub fn page_loader_findings(tree: &SyntaxTree) -> Vec<String> {
    tree.bindings
        .iter()
        .flat_map(|binding| binding.value.objects())
        .filter_map(|object| object.get("loadComponent"))
        .filter_map(|loader| match loader.deferred_import() {
            Some(target) if target.ends_with(PAGE_SUFFIX) => None,
            Some(target) => Some(format!(
                "loadComponent の import 先 '{target}' は *{PAGE_SUFFIX} ファイルではありません"
            )),
            None => Some("loadComponent が () => import('….page') の形になっていません".to_string()),
        })
        .collect()
}
