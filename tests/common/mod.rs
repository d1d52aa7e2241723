//! 結合テスト共通: 一時ディレクトリに Angular ワークスペースを組み立てる

#![allow(dead_code)]

use angular_slice_lint::{run, CheckReport, Checker, TypescriptParser, WorkspaceContext};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MANIFEST: &str = r#"{
  "$schema": "./node_modules/@angular/cli/lib/config/schema.json",
  "version": 1,
  "projects": {
    "shell": { "projectType": "application", "root": "", "sourceRoot": "src", "prefix": "app" }
  }
}"#;

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// angular.json と not-found ページだけがあるワークスペース
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("angular.json"), MANIFEST).unwrap();
        let fixture = Fixture { dir };
        fixture.write(
            "src/app/shared/pages/not-found.page.ts",
            "import { Component } from '@angular/core';\n\
             @Component({ selector: 'app-not-found', template: '<p>404</p>' })\n\
             export class NotFoundPage {}\n",
        );
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn app(&self) -> PathBuf {
        self.dir.path().join("src/app")
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// 機能ジェネレータが出力するのと同じ形の feature 一式
    pub fn scaffold_feature(&self, name: &str) {
        let class = pascal_case(name);
        let constant = name.to_uppercase().replace('-', "_");
        let base = format!("src/app/features/{name}/{name}");

        self.write(
            &format!("{base}.routes.ts"),
            &format!(
                "import {{ Routes }} from '@angular/router';\n\
                 import {{ {class}Data }} from './{name}.data';\n\
                 import {{ {class}State }} from './{name}.state';\n\n\
                 export const {constant}_ROUTES: Routes = [\n\
                 \x20 {{\n\
                 \x20   path: '',\n\
                 \x20   providers: [{class}Data, {class}State],\n\
                 \x20   loadComponent: () => import('./{name}.page').then((m) => m.{class}Page),\n\
                 \x20 }},\n\
                 ];\n"
            ),
        );
        self.write(
            &format!("{base}.page.ts"),
            &format!(
                "import {{ Component, inject }} from '@angular/core';\n\
                 import {{ {class}State }} from './{name}.state';\n\n\
                 @Component({{ selector: 'app-{name}-page', standalone: true, template: '' }})\n\
                 export class {class}Page {{\n  readonly state = inject({class}State);\n}}\n"
            ),
        );
        self.write(
            &format!("{base}.data.ts"),
            &format!(
                "import {{ Injectable }} from '@angular/core';\n\n\
                 @Injectable()\nexport class {class}Data {{}}\n"
            ),
        );
        self.write(
            &format!("{base}.state.ts"),
            &format!(
                "import {{ Injectable, signal }} from '@angular/core';\n\n\
                 @Injectable()\nexport class {class}State {{\n  readonly loading = signal(false);\n}}\n"
            ),
        );
    }

    /// app.routes.ts を feature 一覧から組み立てる
    pub fn register(&self, features: &[&str]) {
        let mut routes = String::from(
            "import { Routes } from '@angular/router';\n\n\
             export const routes: Routes = [\n",
        );
        if let Some(first) = features.first() {
            routes.push_str(&format!("  {{ path: '', redirectTo: '{first}', pathMatch: 'full' }},\n"));
        }
        for name in features {
            let constant = name.to_uppercase().replace('-', "_");
            routes.push_str(&format!(
                "  {{ path: '{name}', loadChildren: () => import('./features/{name}/{name}.routes').then((m) => m.{constant}_ROUTES) }},\n"
            ));
        }
        routes.push_str(
            "  { path: '**', loadComponent: () => import('./shared/pages/not-found.page').then((m) => m.NotFoundPage) },\n];\n",
        );
        self.write("src/app/app.routes.ts", &routes);
    }

    pub fn workspace(&self) -> WorkspaceContext {
        WorkspaceContext::discover(&self.app().join("features")).unwrap()
    }

    pub fn run(&self, checker: Checker) -> CheckReport {
        run(checker, &self.workspace(), &TypescriptParser).unwrap()
    }
}

pub fn pascal_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn messages(report: &CheckReport) -> Vec<String> {
    report
        .violations
        .iter()
        .map(|v| format!("{}: {}", v.file.display(), v.message))
        .collect()
}
