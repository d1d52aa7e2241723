// src/workspace.rs
use path_absolutize::Absolutize;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LintError, Result};

pub const MANIFEST_FILE: &str = "angular.json";

/// angular.json のうち、このツールが読む部分だけ
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub default_project: Option<String>,

    /// preserve_order を有効にしているので宣言順のまま並ぶ
    #[serde(default)]
    pub projects: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub project_type: String,
    pub root: Option<String>,
    pub source_root: Option<String>,
}

impl ProjectConfig {
    fn is_application(&self) -> bool {
        self.project_type == "application"
    }

    /// `sourceRoot` が無ければ `<root>/src`
    fn source_root(&self) -> PathBuf {
        match (&self.source_root, self.root.as_deref()) {
            (Some(src), _) => PathBuf::from(src),
            (None, Some(root)) if !root.is_empty() => Path::new(root).join("src"),
            (None, _) => PathBuf::from("src"),
        }
    }
}

impl Manifest {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// 宣言順にプロジェクトを読む。`projectType` の無いエントリは読み飛ばす
    fn projects(&self) -> impl Iterator<Item = (&str, ProjectConfig)> {
        self.projects.iter().filter_map(|(name, value)| {
            match ProjectConfig::deserialize(value) {
                Ok(project) => Some((name.as_str(), project)),
                Err(e) => {
                    tracing::warn!(project = %name, error = %e, "プロジェクト定義を読み飛ばします");
                    None
                }
            }
        })
    }

    /// デフォルトのアプリケーションプロジェクトを選ぶ
    ///
    /// `defaultProject` がアプリケーションならそれを、そうでなければ
    /// 宣言順で最初のアプリケーションを返す。
    pub fn default_application(&self) -> Option<(&str, ProjectConfig)> {
        let mut applications = self.projects().filter(|(_, project)| project.is_application());
        match self.default_project.as_deref() {
            Some(preferred) => {
                let mut first = None;
                for (name, project) in applications {
                    if name == preferred {
                        return Some((name, project));
                    }
                    first.get_or_insert((name, project));
                }
                first
            }
            None => applications.next(),
        }
    }
}

/// 1 回の実行中に使う正規パス一式
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    /// angular.json があるディレクトリ
    pub root: PathBuf,
    pub project_name: String,
    pub source_root: PathBuf,
    pub app_root: PathBuf,
    pub features_dir: PathBuf,
    pub app_routes_file: PathBuf,
}

impl WorkspaceContext {
    /// `start` から親ディレクトリを遡って angular.json を探し、コンテキストを組み立てる
    pub fn discover(start: &Path) -> Result<Self> {
        // import の解決結果と比較できるよう、以降のパスはすべて絶対パスにしておく
        let start = start
            .absolutize()
            .map_err(|source| LintError::Path {
                path: start.to_path_buf(),
                source,
            })?;
        let manifest_path = find_manifest(&start).ok_or_else(|| LintError::ManifestNotFound {
            start: start.to_path_buf(),
        })?;
        Self::from_manifest(&manifest_path)
    }

    pub fn from_manifest(manifest_path: &Path) -> Result<Self> {
        let text = fs::read_to_string(manifest_path).map_err(|source| LintError::ManifestRead {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        let manifest = Manifest::parse(&text).map_err(|source| LintError::ManifestParse {
            path: manifest_path.to_path_buf(),
            source,
        })?;

        let (name, project) = manifest
            .default_application()
            .ok_or(LintError::NoApplicationProject)?;

        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let source_root = root.join(project.source_root());
        let app_root = source_root.join("app");

        tracing::debug!(project = name, root = %root.display(), "ワークスペースを解決");

        Ok(WorkspaceContext {
            project_name: name.to_string(),
            features_dir: app_root.join("features"),
            app_routes_file: app_root.join("app.routes.ts"),
            root,
            source_root,
            app_root,
        })
    }
}

fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE))
        .find(|candidate| candidate.is_file())
}
