use path_absolutize::Absolutize;
use std::path::{Component, Path, PathBuf};

use crate::error::{LintError, Result};

/// `./` や `../` で始まる (または `.` / `..` そのものの) import 指定子か
///
/// パッケージ名や `@app/...` のようなエイリアスは対象外。
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// 相対 import 指定子を、import している側のファイル (`importer`) のディレクトリを基準に
/// 絶対パスへ解決する。
///
/// - 拡張子の補完やファイルの存在確認はしない (字句的な解決のみ)
/// - 相対指定子でなければ `Ok(None)`
///
/// 例: importer = /proj/src/app/features/a/a.page.ts, specifier = "../b/b.data"
///   → /proj/src/app/features/b/b.data
pub fn resolve_relative_import(specifier: &str, importer: &Path) -> Result<Option<PathBuf>> {
    if !is_relative_specifier(specifier) {
        return Ok(None);
    }

    let parent_dir = importer.parent().unwrap_or(Path::new(""));
    let candidate = parent_dir.join(specifier);
    let resolved = candidate
        .absolutize()
        .map_err(|source| LintError::Path {
            path: candidate.clone(),
            source,
        })?
        .to_path_buf();
    Ok(Some(resolved))
}

/// `features_dir` 配下のパスから、それが属する feature 名 (features 直下のディレクトリ名) を取り出す
///
/// features_dir の外、または features_dir そのものなら `None`。
pub fn owning_feature(path: &Path, features_dir: &Path) -> Option<String> {
    let rest = path.strip_prefix(features_dir).ok()?;
    match rest.components().next()? {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}
