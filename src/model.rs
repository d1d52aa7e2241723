// src/model.rs
use std::fmt;
use std::path::{Path, PathBuf};

/// ルール違反 1 件分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// 違反が見つかったファイル (またはディレクトリ) の絶対パス
    pub file: PathBuf,

    /// 人間向けのメッセージ
    pub message: String,
}

impl Violation {
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Violation {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn file_relative_to<'a>(&'a self, root: &Path) -> &'a Path {
        relative_to(&self.file, root)
    }
}

/// 表示用に `root` からの相対パスにする。`root` の外ならそのまま
pub fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// チェッカーの種類。サブコマンド名と 1 対 1 に対応する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checker {
    Structure,
    AppRoutes,
    FeatureRoutes,
    Imports,
}

impl Checker {
    pub const ALL: [Checker; 4] = [
        Checker::Structure,
        Checker::AppRoutes,
        Checker::FeatureRoutes,
        Checker::Imports,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Checker::Structure => "feature structure",
            Checker::AppRoutes => "app routes",
            Checker::FeatureRoutes => "feature routes",
            Checker::Imports => "cross-feature imports",
        }
    }

    /// `checked` が何を数えているか
    pub fn unit(self) -> &'static str {
        match self {
            Checker::Structure | Checker::FeatureRoutes => "features",
            Checker::AppRoutes => "routes",
            Checker::Imports => "files",
        }
    }
}

impl fmt::Display for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 1 回のチェック実行の結果
#[derive(Debug)]
pub struct CheckReport {
    pub checker: Checker,

    /// チェック対象 (features ディレクトリや app.routes.ts)
    pub target: PathBuf,

    /// 検査した feature / ルート / ファイルの数
    pub checked: usize,

    /// 発見順に並んだ違反。ソートはしない
    pub violations: Vec<Violation>,
}

impl CheckReport {
    pub fn new(checker: Checker, target: impl Into<PathBuf>) -> Self {
        CheckReport {
            checker,
            target: target.into(),
            checked: 0,
            violations: Vec::new(),
        }
    }

    pub fn push(&mut self, file: impl Into<PathBuf>, message: impl Into<String>) {
        self.violations.push(Violation::new(file, message));
    }

    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn target_relative_to<'a>(&'a self, root: &Path) -> &'a Path {
        relative_to(&self.target, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_passes_only_without_violations() {
        let mut report = CheckReport::new(Checker::Structure, "/proj/src/app/features");
        assert!(report.passed());

        report.push("/proj/src/app/features/a", "missing");
        assert!(!report.passed());
        assert_eq!(report.violations[0].message, "missing");
    }

    #[test]
    fn violation_file_is_shown_relative_to_root() {
        let violation = Violation::new("/proj/src/app/features/a/a.data.ts", "missing");
        assert_eq!(
            violation.file_relative_to(Path::new("/proj")),
            Path::new("src/app/features/a/a.data.ts")
        );
    }

    #[test]
    fn target_is_shown_relative_to_root() {
        let report = CheckReport::new(Checker::AppRoutes, "/proj/src/app/app.routes.ts");
        assert_eq!(
            report.target_relative_to(Path::new("/proj")),
            Path::new("src/app/app.routes.ts")
        );
        assert_eq!(
            report.target_relative_to(Path::new("/elsewhere")),
            Path::new("/proj/src/app/app.routes.ts")
        );
    }
}
