//! Angular の vertical slice 構成を静的に検証するチェッカー群
//!
//! - `structure`      : feature ごとの必須ファイル
//! - `app-routes`     : app.routes.ts の構成 (遅延ロードのみ、ワイルドカードは 1 件)
//! - `feature-routes` : feature ルートの providers と遅延ローダー
//! - `imports`        : feature 間の相対 import 禁止

pub mod checks;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod resolver;
pub mod workspace;

pub use error::{LintError, Result};
pub use model::{CheckReport, Checker, Violation};
pub use parser::{SourceParser, TypescriptParser};
pub use workspace::WorkspaceContext;

/// チェッカーを 1 つ実行する
pub fn run(checker: Checker, ws: &WorkspaceContext, parser: &impl SourceParser) -> Result<CheckReport> {
    tracing::debug!(%checker, project = %ws.project_name, "チェック開始");
    match checker {
        Checker::Structure => checks::structure::check(ws),
        Checker::AppRoutes => checks::app_routes::check(ws, parser),
        Checker::FeatureRoutes => checks::feature_routes::check(ws, parser),
        Checker::Imports => checks::imports::check(ws, parser),
    }
}
