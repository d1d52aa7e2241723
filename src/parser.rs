use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser as SwcParser, StringInput, Syntax, TsConfig};
use swc_ecma_visit::{Visit, VisitWith};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LintError, Result};

/// チェッカーが参照するノードだけに絞った構文木
///
/// swc の AST をそのまま渡すのではなく、ルート定義の検査に必要な形
/// (文字列・配列・オブジェクト・遅延 import) に落としてから扱う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// 文字列リテラル (式を含まないテンプレートリテラルも含む)
    Str(String),
    /// 配列リテラル。穴 (`[a, , b]`) やスプレッドは `Other` になる
    Array(Vec<Node>),
    /// オブジェクトリテラル。プロパティはソース上の順番を保つ
    Object(Vec<(String, Node)>),
    /// 関数・アロー関数。本体で最初に見つかった `import('…')` の引数を持つ
    Lazy(Option<String>),
    /// 識別子の参照 (例: `providers: PROVIDERS`)
    Ident(String),
    Other,
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    /// オブジェクトのプロパティを名前で引く。同名が複数あれば最後のものが勝つ (JS と同じ)
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Object(props) => props.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 遅延ローダー (`() => import('…')`) の import 先
    pub fn deferred_import(&self) -> Option<&str> {
        match self {
            Node::Lazy(Some(specifier)) => Some(specifier),
            _ => None,
        }
    }

    /// 自分自身を含め、配下にあるオブジェクトリテラルを深さ優先で列挙する
    pub fn objects(&self) -> Vec<&Node> {
        match self {
            Node::Object(props) => std::iter::once(self)
                .chain(props.iter().flat_map(|(_, v)| v.objects()))
                .collect(),
            Node::Array(items) => items.iter().flat_map(Node::objects).collect(),
            _ => Vec::new(),
        }
    }
}

/// トップレベルの変数宣言 1 つ分
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    /// 外から見える名前。`export const` なら自分の名前、
    /// `export { name as alias }` なら alias。export されていなければ空
    pub exported_as: Vec<String>,
    pub value: Node,
}

impl Binding {
    pub fn is_exported(&self) -> bool {
        !self.exported_as.is_empty()
    }
}

/// 1 ファイル分の解析結果。チェッカーごとに作って使い捨てる
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub path: PathBuf,

    /// ソースに現れた順の import 先文字列
    pub imports: Vec<String>,

    /// ソースに現れた順のトップレベル変数
    pub bindings: Vec<Binding>,
}

impl SyntaxTree {
    /// `<name>` という名前で export されている変数の初期化式
    pub fn export(&self, name: &str) -> Option<&Node> {
        self.bindings
            .iter()
            .find(|b| b.exported_as.iter().any(|n| n == name))
            .map(|b| &b.value)
    }

    /// export されている配列リテラルを (export 名, 要素) で列挙する
    pub fn exported_arrays(&self) -> impl Iterator<Item = (&str, &[Node])> {
        self.bindings.iter().flat_map(|b| {
            let items = b.value.as_array();
            b.exported_as
                .iter()
                .filter_map(move |name| items.map(|items| (name.as_str(), items)))
        })
    }
}

/// ソースコードを `SyntaxTree` に変換する部品
///
/// チェッカーはこの trait 越しにしかパーサを触らない。
pub trait SourceParser {
    fn parse(&self, path: &Path, source: String) -> Result<SyntaxTree>;

    fn parse_file(&self, path: &Path) -> Result<SyntaxTree> {
        let source = fs::read_to_string(path).map_err(|source| LintError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(file = %path.display(), bytes = source.len(), "ファイル解析開始");
        self.parse(path, source)
    }
}

/// swc による TypeScript パーサ
#[derive(Debug, Default, Clone, Copy)]
pub struct TypescriptParser;

impl SourceParser for TypescriptParser {
    fn parse(&self, path: &Path, source: String) -> Result<SyntaxTree> {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(FileName::Real(path.to_path_buf()), source);

        // Angular のソースはデコレータを使うので有効にしておく
        let syntax = Syntax::Typescript(TsConfig {
            tsx: false,
            decorators: true,
            dts: false,
            no_early_errors: true,
            disallow_ambiguous_jsx_like: true,
        });

        let lexer = Lexer::new(syntax, Default::default(), StringInput::from(&*fm), None);
        let mut parser = SwcParser::new_from(lexer);

        let module = parser.parse_module().map_err(|e| LintError::Parse {
            path: path.to_path_buf(),
            message: format!("{:?}", e.kind()),
        })?;

        Ok(lower_module(path, &module))
    }
}

fn lower_module(path: &Path, module: &Module) -> SyntaxTree {
    let mut imports = ImportCollector::default();
    module.visit_with(&mut imports);

    let mut bindings: Vec<Binding> = Vec::new();
    // `export { a, b as c }` (from 無し) の (ローカル名, export 名)
    let mut local_exports: Vec<(String, String)> = Vec::new();
    for item in &module.body {
        if let ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(NamedExport {
            src: None,
            specifiers,
            ..
        })) = item
        {
            local_exports.extend(specifiers.iter().filter_map(local_export_names));
            continue;
        }

        let (var_decl, exported) = match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                decl: Decl::Var(var_decl),
                ..
            })) => (var_decl, true),
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var_decl))) => (var_decl, false),
            _ => continue,
        };

        for declarator in &var_decl.decls {
            if let Pat::Ident(BindingIdent { id, .. }) = &declarator.name {
                let value = declarator
                    .init
                    .as_deref()
                    .map(lower_expr)
                    .unwrap_or(Node::Other);
                let name = id.sym.to_string();
                bindings.push(Binding {
                    exported_as: if exported { vec![name.clone()] } else { Vec::new() },
                    name,
                    value,
                });
            }
        }
    }

    // export 文は宣言より前に書けるので、全部集めてから結び付ける
    for (local, exported) in local_exports {
        match bindings.iter_mut().find(|b| b.name == local) {
            Some(binding) => binding.exported_as.push(exported),
            None => tracing::debug!(file = %path.display(), %local, "export 対象の変数宣言が見つかりません"),
        }
    }

    tracing::debug!(
        file = %path.display(),
        imports = imports.specifiers.len(),
        bindings = bindings.len(),
        "解析完了"
    );

    SyntaxTree {
        path: path.to_path_buf(),
        imports: imports.specifiers,
        bindings,
    }
}

fn lower_expr(expr: &Expr) -> Node {
    match expr {
        Expr::Lit(Lit::Str(Str { value, .. })) => Node::Str(value.to_string()),
        Expr::Tpl(tpl) => match (tpl.exprs.is_empty(), tpl.quasis.as_slice()) {
            (true, [quasi]) => Node::Str(
                quasi
                    .cooked
                    .as_ref()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| quasi.raw.to_string()),
            ),
            _ => Node::Other,
        },
        Expr::Array(ArrayLit { elems, .. }) => Node::Array(
            elems
                .iter()
                .map(|elem| match elem {
                    Some(ExprOrSpread { spread: None, expr }) => lower_expr(expr),
                    _ => Node::Other,
                })
                .collect(),
        ),
        Expr::Object(ObjectLit { props, .. }) => Node::Object(props.iter().filter_map(lower_prop).collect()),
        Expr::Arrow(arrow) => Node::Lazy(first_deferred_import(arrow)),
        Expr::Fn(func) => Node::Lazy(first_deferred_import(&*func.function)),
        Expr::Ident(ident) => Node::Ident(ident.sym.to_string()),
        // `[...] as Routes` / `[...] satisfies Routes` / `([...])`
        Expr::Paren(ParenExpr { expr, .. })
        | Expr::TsAs(TsAsExpr { expr, .. })
        | Expr::TsSatisfies(TsSatisfiesExpr { expr, .. })
        | Expr::TsConstAssertion(TsConstAssertion { expr, .. })
        | Expr::TsNonNull(TsNonNullExpr { expr, .. }) => lower_expr(expr),
        _ => Node::Other,
    }
}

fn lower_prop(prop: &PropOrSpread) -> Option<(String, Node)> {
    let PropOrSpread::Prop(prop) = prop else {
        return None;
    };
    match &**prop {
        Prop::KeyValue(KeyValueProp { key, value }) => Some((prop_name(key)?, lower_expr(value))),
        Prop::Shorthand(ident) => Some((ident.sym.to_string(), Node::Ident(ident.sym.to_string()))),
        // loadComponent() { return import('./x.page'); }
        Prop::Method(MethodProp { key, function }) => {
            Some((prop_name(key)?, Node::Lazy(first_deferred_import(&**function))))
        }
        _ => None,
    }
}

/// `export { orig as exported }` の 1 項目から (ローカル名, export 名) を取り出す
fn local_export_names(specifier: &ExportSpecifier) -> Option<(String, String)> {
    let ExportSpecifier::Named(ExportNamedSpecifier { orig, exported, .. }) = specifier else {
        return None;
    };
    let local = module_export_name(orig);
    let exported = exported.as_ref().map_or_else(|| local.clone(), module_export_name);
    Some((local, exported))
}

fn module_export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(Str { value, .. }) => value.to_string(),
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(Str { value, .. }) => Some(value.to_string()),
        _ => None,
    }
}

/// `import('…')` の第一引数が文字列リテラルならそれを返す
fn dynamic_import_target(call: &CallExpr) -> Option<String> {
    if !matches!(call.callee, Callee::Import(_)) {
        return None;
    }
    match call.args.first().map(|arg| &*arg.expr) {
        Some(Expr::Lit(Lit::Str(Str { value, .. }))) => Some(value.to_string()),
        _ => None,
    }
}

/// ノード配下で最初に現れる `import('…')` を探す
fn first_deferred_import<N: VisitWith<DeferredImportFinder>>(node: &N) -> Option<String> {
    let mut finder = DeferredImportFinder::default();
    node.visit_with(&mut finder);
    finder.found
}

#[derive(Default)]
struct DeferredImportFinder {
    found: Option<String>,
}

impl Visit for DeferredImportFinder {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if self.found.is_some() {
            return;
        }
        // `import('./a').then(...)` では外側の then 呼び出しより先に
        // callee 側の import が評価されるので、子から先に見る
        call.visit_children_with(self);
        if self.found.is_none() {
            self.found = dynamic_import_target(call);
        }
    }
}

/// 静的 import / re-export / 動的 import の対象文字列を集める Visitor
#[derive(Default)]
struct ImportCollector {
    specifiers: Vec<String>,
}

impl Visit for ImportCollector {
    fn visit_import_decl(&mut self, decl: &ImportDecl) {
        self.specifiers.push(decl.src.value.to_string());
    }

    fn visit_export_all(&mut self, export: &ExportAll) {
        self.specifiers.push(export.src.value.to_string());
    }

    fn visit_named_export(&mut self, export: &NamedExport) {
        if let Some(src) = &export.src {
            self.specifiers.push(src.value.to_string());
        }
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Some(target) = dynamic_import_target(call) {
            self.specifiers.push(target);
        }
        call.visit_children_with(self);
    }
}
