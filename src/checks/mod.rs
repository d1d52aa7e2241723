//! 4 種類のルールチェッカー
//!
//! どれも `WorkspaceContext` を受け取り、違反を発見順に積んだ `CheckReport` を返す。
//! 続行不能な場合だけ `Err` を返す。

pub mod app_routes;
pub mod feature_routes;
pub mod imports;
pub mod structure;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;

/// ビルド成果物・依存パッケージのディレクトリ。再帰探索では中に入らない
const SKIPPED_DIRS: [&str; 4] = ["node_modules", "dist", ".angular", "coverage"];

/// features 直下のディレクトリを (feature 名, パス) で列挙する
///
/// 並びはファイルシステムの列挙順のまま。隠しディレクトリやビルド成果物は
/// `source_files` と同じく feature とみなさない。
pub(crate) fn feature_dirs(features_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(features_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_skipped_dir(&name) {
            tracing::debug!(dir = %name, "feature 以外のディレクトリを読み飛ばします");
            continue;
        }
        dirs.push((name, entry.into_path()));
    }
    Ok(dirs)
}

/// `root` 配下の `.ts` ファイルのうち `keep` を満たすものを再帰的に列挙する
pub(crate) fn source_files(root: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        // ルート自身は名前に関係なく入る
        e.depth() == 0 || !e.file_type().is_dir() || !is_skipped_dir(&e.file_name().to_string_lossy())
    });
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let keep_it = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(".ts") && keep(name));
        if keep_it {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIRS.contains(&name)
}
