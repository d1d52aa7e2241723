use crate::error::{LintError, Result};
use crate::model::{CheckReport, Checker};
use crate::parser::{Node, SourceParser, SyntaxTree};
use crate::workspace::WorkspaceContext;

/// app.routes.ts が export するルート配列の変数名
pub const ROUTES_EXPORT: &str = "routes";

/// ワイルドカードルートが遅延ロードするページ
pub const NOT_FOUND_PAGE: &str = "./shared/pages/not-found.page";

pub const WILDCARD: &str = "**";

/// ルート 1 件を調べた結果
#[derive(Debug, Default)]
struct RouteFindings {
    messages: Vec<String>,
    is_wildcard: bool,
}

/// アプリケーション直下のルート配列の構成を検証する
///
/// `routes` の export が無ければ検証しようがないので致命的エラー。
pub fn check(ws: &WorkspaceContext, parser: &impl SourceParser) -> Result<CheckReport> {
    let tree = parser.parse_file(&ws.app_routes_file)?;
    check_tree(&tree)
}

pub fn check_tree(tree: &SyntaxTree) -> Result<CheckReport> {
    let routes = tree
        .export(ROUTES_EXPORT)
        .and_then(Node::as_array)
        .ok_or_else(|| LintError::MissingRoutesExport {
            path: tree.path.clone(),
            name: ROUTES_EXPORT,
        })?;

    let mut report = CheckReport::new(Checker::AppRoutes, &tree.path);
    let mut wildcards = 0usize;

    for (index, route) in routes.iter().enumerate() {
        report.checked += 1;
        let findings = inspect_route(route);
        if findings.is_wildcard {
            wildcards += 1;
        }
        let label = route_label(index, route);
        for message in findings.messages {
            report.push(&tree.path, format!("{label}: {message}"));
        }
    }

    if wildcards != 1 {
        report.push(
            &tree.path,
            format!("ワイルドカード ('{WILDCARD}') ルートはちょうど 1 件必要ですが {wildcards} 件見つかりました"),
        );
    }

    tracing::info!(routes = report.checked, wildcards, "app-routes チェック完了");
    Ok(report)
}

fn route_label(index: usize, route: &Node) -> String {
    match route.get("path").and_then(Node::as_str) {
        Some(path) => format!("routes[{index}] (path: '{path}')"),
        None => format!("routes[{index}]"),
    }
}

fn inspect_route(route: &Node) -> RouteFindings {
    let mut findings = RouteFindings::default();
    if !route.is_object() {
        findings.messages.push("ルート定義はオブジェクトリテラルで書いてください".to_string());
        return findings;
    }

    if route.has("component") {
        findings
            .messages
            .push("component の直接指定は禁止です。loadComponent / loadChildren を使ってください".to_string());
    }

    let Some(path) = route.get("path").and_then(Node::as_str) else {
        findings.messages.push("path が文字列リテラルで指定されていません".to_string());
        return findings;
    };

    match path {
        "" => {
            if !(route.has("redirectTo") && route.has("pathMatch")) {
                findings
                    .messages
                    .push("空パスのルートには redirectTo と pathMatch の両方が必要です".to_string());
            }
            if route.has("loadComponent") || route.has("loadChildren") {
                findings
                    .messages
                    .push("空パスのルートはリダイレクト専用です。ローダーを持たせないでください".to_string());
            }
        }
        WILDCARD => {
            findings.is_wildcard = true;
            let target = route.get("loadComponent").and_then(Node::deferred_import);
            if target != Some(NOT_FOUND_PAGE) {
                findings.messages.push(format!(
                    "ワイルドカードルートは loadComponent: () => import('{NOT_FOUND_PAGE}') である必要があります"
                ));
            }
        }
        _ => match route.get("loadChildren").and_then(Node::deferred_import) {
            None => findings
                .messages
                .push("loadChildren: () => import('./features/<name>/<name>.routes') がありません".to_string()),
            Some(target) if !(target.starts_with("./features/") && target.ends_with(".routes")) => {
                findings.messages.push(format!(
                    "loadChildren の import 先 '{target}' は ./features/ 配下の .routes ファイルではありません"
                ));
            }
            Some(target) if feature_routes_stem(target).is_none() => {
                findings.messages.push(format!(
                    "loadChildren の import 先 '{target}' は ./features/<name>/<name>.routes の形になっていません"
                ));
            }
            Some(_) => {}
        },
    }

    findings
}

/// `./features/<x>/<x>.routes` なら `<x>` を返す
pub fn feature_routes_stem(target: &str) -> Option<&str> {
    let rest = target.strip_prefix("./features/")?.strip_suffix(".routes")?;
    let (dir, file) = rest.split_once('/')?;
    (!dir.is_empty() && dir == file).then_some(dir)
}
