// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// チェックを続行できない致命的なエラー
///
/// ルール違反 (`Violation`) とは別物で、これが返った時点でチェッカーは中断する。
#[derive(Debug, Error)]
pub enum LintError {
    #[error("angular.json が見つかりません ({start} から親ディレクトリを遡りました)")]
    ManifestNotFound { start: PathBuf },

    #[error("angular.json を読み込めません: {path}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("angular.json の JSON が不正です: {path}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("projectType が \"application\" のプロジェクトが angular.json にありません")]
    NoApplicationProject,

    #[error("ファイルを読み込めません: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{path} に `export const {name}` の配列がありません")]
    MissingRoutesExport { path: PathBuf, name: &'static str },

    #[error("ディレクトリ探索に失敗しました")]
    Walk(#[from] walkdir::Error),

    #[error("パスを絶対パスに変換できません: {path}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LintError>;
