// src/main.rs

use clap::{Parser, Subcommand};
use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use angular_slice_lint::{report, run, Checker, LintError, TypescriptParser, WorkspaceContext};

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "angular-slice-lint",
    version,
    about = "Angular プロジェクトの vertical slice 構成 (feature フォルダ・遅延ロード・feature 間 import) を検証する CLI ツール"
)]
struct Cli {
    /// angular.json を探し始めるディレクトリ (省略時はカレントディレクトリ)
    #[arg(short = 'r', long = "project-root", value_name = "DIR", global = true)]
    project_root: Option<PathBuf>,

    /// デバッグログを出す (RUST_LOG が設定されていればそちらが優先)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// feature ごとの必須ファイル (routes / page / data / state) を確認する
    Structure,
    /// app.routes.ts のルート構成を確認する
    AppRoutes,
    /// feature ルートの providers と遅延ローダーを確認する
    FeatureRoutes,
    /// feature 間の相対 import が無いか確認する
    Imports,
    /// 4 つのチェックをすべて実行する
    All,
}

impl Command {
    fn checkers(self) -> &'static [Checker] {
        match self {
            Command::Structure => &[Checker::Structure],
            Command::AppRoutes => &[Checker::AppRoutes],
            Command::FeatureRoutes => &[Checker::FeatureRoutes],
            Command::Imports => &[Checker::Imports],
            Command::All => &Checker::ALL,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 1) 起点ディレクトリを決めてワークスペースを解決
    let start = match cli.project_root.clone() {
        Some(dir) => dir,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("Error: カレントディレクトリを取得できません: {e}");
                return ExitCode::FAILURE;
            }
        },
    };
    let ws = match WorkspaceContext::discover(&start) {
        Ok(ws) => ws,
        Err(e) => {
            print_fatal(&e);
            return ExitCode::FAILURE;
        }
    };

    // 2) チェッカーを順に実行。1 つが致命的エラーでも残りは実行する
    let mut all_passed = true;
    for &checker in cli.command.checkers() {
        let passed = match run(checker, &ws, &TypescriptParser) {
            Ok(result) => report::emit(&result, &ws.root).unwrap_or(false),
            Err(e) => {
                print_fatal(&e);
                false
            }
        };
        all_passed &= passed;
    }

    if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_fatal(error: &LintError) {
    eprintln!("Error: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
