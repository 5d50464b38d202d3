//! Static scan of a parsed Python module: top-level bindings, `__all__`,
//! star imports and the module docstring.

use super::literal::{constant_value, node_text, string_value};
use super::resolve::LoadedModule;
use crate::docstring::clean_docstring;
use crate::model::*;
use std::collections::BTreeMap;
use tree_sitter::Node;

/// What a top-level name is bound to after the whole module has run.
#[derive(Debug, Clone)]
pub(crate) enum Binding {
    Item(ScannedItem),
    /// `from module import name [as alias]`
    Import { module: String, name: String },
    /// `import a.b [as c]`: a module object, never documented
    ModuleRef,
    /// Any other value (calls, containers, aliases of other names)
    Other,
}

#[derive(Debug, Clone)]
pub(crate) enum ScannedItem {
    Function(FunctionDoc),
    Class(ClassDoc),
    Constant(ConstantDoc),
}

impl ScannedItem {
    /// Re-bind under `name` with the given locality.
    pub(crate) fn rebind(mut self, name: &str, is_local: bool) -> Self {
        match &mut self {
            ScannedItem::Function(f) => {
                f.name = name.to_string();
                f.is_local = is_local;
            }
            ScannedItem::Class(c) => {
                c.name = name.to_string();
                c.is_local = is_local;
            }
            ScannedItem::Constant(c) => {
                c.name = name.to_string();
                c.is_local = is_local;
            }
        }
        self
    }

    pub(crate) fn push_into(self, api: &mut ModuleApi) {
        match self {
            ScannedItem::Function(f) => api.functions.push(f),
            ScannedItem::Class(c) => api.classes.push(c),
            ScannedItem::Constant(c) => api.constants.push(c),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ModuleScan {
    pub doc: Option<String>,
    /// Last binding of every top-level name
    pub bindings: BTreeMap<String, Binding>,
    /// Contents of `__all__`, if the module declares it
    pub all: Option<Vec<String>>,
    /// Absolute names of `from m import *` sources, in order
    pub star_imports: Vec<String>,
}

impl ModuleScan {
    /// Whether `from this_module import *` would bring `name` in.
    pub(crate) fn star_exports(&self, name: &str) -> bool {
        match self.all {
            Some(ref all) => all.iter().any(|n| n == name),
            None => !name.starts_with('_'),
        }
    }
}

struct Scanner<'a> {
    src: &'a str,
    package: &'a str,
    scan: ModuleScan,
}

/// Scan the top level of a loaded module.
pub(crate) fn scan_module(module: &LoadedModule) -> ModuleScan {
    let root = module.tree.root_node();
    let mut scanner = Scanner {
        src: &module.source,
        package: module.package(),
        scan: ModuleScan::default(),
    };
    scanner.scan.doc = block_docstring(root, &module.source);
    scanner.visit_block(root);
    scanner.scan
}

impl<'a> Scanner<'a> {
    fn text(&self, node: Node) -> &'a str {
        node_text(node, self.src)
    }

    fn bind(&mut self, name: &str, binding: Binding) {
        self.scan.bindings.insert(name.to_string(), binding);
    }

    fn visit_block(&mut self, block: Node) {
        let mut cursor = block.walk();
        for stmt in block.named_children(&mut cursor) {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: Node) {
        match stmt.kind() {
            "function_definition" => {
                let func = extract_function(stmt, self.src, Vec::new());
                self.bind(&func.name.clone(), Binding::Item(ScannedItem::Function(func)));
            }
            "class_definition" => {
                let class = extract_class(stmt, self.src, Vec::new());
                self.bind(&class.name.clone(), Binding::Item(ScannedItem::Class(class)));
            }
            "decorated_definition" => self.visit_decorated(stmt),
            "expression_statement" => self.visit_expression_statement(stmt),
            "import_statement" => self.visit_import(stmt),
            "import_from_statement" => self.visit_import_from(stmt),
            "future_import_statement" => {}
            "try_statement" => {
                // The `try:` body is the path taken when nothing fails
                if let Some(body) = stmt.child_by_field_name("body") {
                    self.visit_block(body);
                }
            }
            _ => {}
        }
    }

    fn visit_decorated(&mut self, stmt: Node) {
        let decorators = decorators_of(stmt, self.src);
        let Some(def) = stmt.child_by_field_name("definition") else {
            return;
        };
        match def.kind() {
            "function_definition" => {
                let func = extract_function(def, self.src, decorators);
                self.bind(&func.name.clone(), Binding::Item(ScannedItem::Function(func)));
            }
            "class_definition" => {
                let class = extract_class(def, self.src, decorators);
                self.bind(&class.name.clone(), Binding::Item(ScannedItem::Class(class)));
            }
            _ => {}
        }
    }

    fn visit_expression_statement(&mut self, stmt: Node) {
        let Some(expr) = stmt.named_child(0) else {
            return;
        };
        match expr.kind() {
            "assignment" => self.visit_assignment(expr),
            "augmented_assignment" => self.visit_augmented(expr),
            "call" => self.visit_all_mutation(expr),
            _ => {}
        }
    }

    fn visit_assignment(&mut self, assign: Node) {
        // `a = b = 1` nests: the innermost right-hand side is the value
        let mut targets: Vec<Node> = Vec::new();
        let mut current = assign;
        let value = loop {
            if let Some(left) = current.child_by_field_name("left") {
                targets.push(left);
            }
            match current.child_by_field_name("right") {
                Some(right) if right.kind() == "assignment" => current = right,
                other => break other,
            }
        };
        // Bare annotation (`x: int`) binds nothing
        let Some(value) = value else {
            return;
        };

        for target in targets {
            match target.kind() {
                "identifier" => self.bind_value(self.text(target), value),
                "pattern_list" | "tuple_pattern" => self.bind_unpacked(target, value),
                _ => {}
            }
        }
    }

    fn bind_unpacked(&mut self, target: Node, value: Node) {
        let names: Vec<Node> = {
            let mut cursor = target.walk();
            target.named_children(&mut cursor).collect()
        };
        let values: Vec<Node> = if matches!(value.kind(), "expression_list" | "tuple") {
            let mut cursor = value.walk();
            value
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .collect()
        } else {
            Vec::new()
        };

        for (i, name) in names.iter().enumerate() {
            if name.kind() != "identifier" {
                continue;
            }
            match values.get(i) {
                Some(v) if values.len() == names.len() => self.bind_value(self.text(*name), *v),
                _ => self.bind(self.text(*name), Binding::Other),
            }
        }
    }

    fn bind_value(&mut self, name: &str, value: Node) {
        if name == "__all__" {
            self.scan.all = Some(string_list(value, self.src).unwrap_or_default());
            return;
        }
        let binding = match constant_value(value, self.src) {
            Some((repr, value_type)) => Binding::Item(ScannedItem::Constant(ConstantDoc {
                name: name.to_string(),
                doc: None,
                is_local: true,
                value: repr,
                value_type,
            })),
            None => Binding::Other,
        };
        self.bind(name, binding);
    }

    /// `__all__ += [...]`
    fn visit_augmented(&mut self, aug: Node) {
        let (Some(left), Some(right)) = (
            aug.child_by_field_name("left"),
            aug.child_by_field_name("right"),
        ) else {
            return;
        };
        let name = self.text(left);
        if name == "__all__" {
            if let Some(extra) = string_list(right, self.src) {
                self.scan.all.get_or_insert_with(Vec::new).extend(extra);
            }
        } else if left.kind() == "identifier" {
            self.bind(name, Binding::Other);
        }
    }

    /// `__all__.extend([...])` and `__all__.append("x")`
    fn visit_all_mutation(&mut self, call: Node) {
        let Some(func) = call.child_by_field_name("function") else {
            return;
        };
        if func.kind() != "attribute" {
            return;
        }
        let object = func.child_by_field_name("object").map(|n| self.text(n));
        let method = func.child_by_field_name("attribute").map(|n| self.text(n));
        if object != Some("__all__") {
            return;
        }
        let Some(arg) = call
            .child_by_field_name("arguments")
            .and_then(|args| args.named_child(0))
        else {
            return;
        };
        let all = self.scan.all.get_or_insert_with(Vec::new);
        match method {
            Some("extend") => all.extend(string_list(arg, self.src).unwrap_or_default()),
            Some("append") => all.extend(string_value(arg, self.src)),
            _ => {}
        }
    }

    fn visit_import(&mut self, stmt: Node) {
        let mut cursor = stmt.walk();
        for name_node in stmt.children_by_field_name("name", &mut cursor) {
            let bound = match name_node.kind() {
                "aliased_import" => name_node
                    .child_by_field_name("alias")
                    .map(|a| self.text(a).to_string()),
                // `import a.b` binds `a`
                _ => self.text(name_node).split('.').next().map(str::to_string),
            };
            if let Some(bound) = bound {
                self.bind(&bound, Binding::ModuleRef);
            }
        }
    }

    fn visit_import_from(&mut self, stmt: Node) {
        let Some(module_node) = stmt.child_by_field_name("module_name") else {
            return;
        };
        let Some(module) = self.absolute_module(module_node) else {
            tracing::debug!(
                import = self.text(module_node),
                "relative import beyond top-level package"
            );
            return;
        };

        let mut has_wildcard = false;
        let mut cursor = stmt.walk();
        for child in stmt.named_children(&mut cursor) {
            if child.kind() == "wildcard_import" {
                has_wildcard = true;
            }
        }
        if has_wildcard {
            self.scan.star_imports.push(module);
            return;
        }

        let mut cursor = stmt.walk();
        for name_node in stmt.children_by_field_name("name", &mut cursor) {
            let (original, bound) = match name_node.kind() {
                "aliased_import" => {
                    let (Some(n), Some(a)) = (
                        name_node.child_by_field_name("name"),
                        name_node.child_by_field_name("alias"),
                    ) else {
                        continue;
                    };
                    (self.text(n).to_string(), self.text(a).to_string())
                }
                _ => {
                    let n = self.text(name_node).to_string();
                    (n.clone(), n)
                }
            };
            self.bind(
                &bound,
                Binding::Import {
                    module: module.clone(),
                    name: original,
                },
            );
        }
    }

    /// Turn the `module_name` of a from-import into an absolute dotted name.
    fn absolute_module(&self, node: Node) -> Option<String> {
        if node.kind() != "relative_import" {
            return Some(self.text(node).to_string());
        }
        let text = self.text(node);
        let dots = text.chars().take_while(|c| *c == '.').count();
        let rest = text[dots..].trim();

        let mut base: Vec<&str> = if self.package.is_empty() {
            Vec::new()
        } else {
            self.package.split('.').collect()
        };
        for _ in 1..dots {
            base.pop()?;
        }
        if base.is_empty() && rest.is_empty() {
            return None;
        }
        if !rest.is_empty() {
            base.push(rest);
        }
        Some(base.join("."))
    }
}

/// Extract a function definition. `decorators` come from an enclosing
/// `decorated_definition`.
pub(crate) fn extract_function(node: Node, src: &str, decorators: Vec<String>) -> FunctionDoc {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, src).to_string())
        .unwrap_or_default();
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| extract_parameters(p, src))
        .unwrap_or_default();
    let return_type = node
        .child_by_field_name("return_type")
        .map(|n| node_text(n, src).to_string());

    let mut cursor = node.walk();
    let is_async = node.children(&mut cursor).any(|c| c.kind() == "async");

    let signature = format_signature_text(&parameters, return_type.as_deref());

    FunctionDoc {
        name,
        doc: node
            .child_by_field_name("body")
            .and_then(|body| block_docstring(body, src)),
        is_local: true,
        signature,
        parameters,
        return_type,
        is_async,
        decorators,
        line: node.start_position().row + 1,
    }
}

/// Parameters in declaration order, with their kinds.
pub(crate) fn extract_parameters(params: Node, src: &str) -> Vec<ParameterDoc> {
    let mut out: Vec<ParameterDoc> = Vec::new();
    let mut keyword_only = false;

    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        let (target, annotation, default) = match child.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                (child, None, None)
            }
            "typed_parameter" => {
                let Some(target) = child.named_child(0) else {
                    continue;
                };
                let ann = child.child_by_field_name("type");
                (target, ann, None)
            }
            "default_parameter" => {
                let Some(target) = child.child_by_field_name("name") else {
                    continue;
                };
                (target, None, child.child_by_field_name("value"))
            }
            "typed_default_parameter" => {
                let Some(target) = child.child_by_field_name("name") else {
                    continue;
                };
                (
                    target,
                    child.child_by_field_name("type"),
                    child.child_by_field_name("value"),
                )
            }
            "keyword_separator" => {
                keyword_only = true;
                continue;
            }
            "positional_separator" => {
                for p in out.iter_mut() {
                    if p.kind == ParamKind::PositionalOrKeyword {
                        p.kind = ParamKind::PositionalOnly;
                    }
                }
                continue;
            }
            _ => continue,
        };

        let kind = match target.kind() {
            "list_splat_pattern" => {
                keyword_only = true;
                ParamKind::VarPositional
            }
            "dictionary_splat_pattern" => ParamKind::VarKeyword,
            _ if keyword_only => ParamKind::KeywordOnly,
            _ => ParamKind::PositionalOrKeyword,
        };
        let name = node_text(target, src).trim_start_matches('*').trim().to_string();

        out.push(ParameterDoc {
            name,
            annotation: annotation.map(|n| node_text(n, src).to_string()),
            default: default.map(|n| node_text(n, src).to_string()),
            kind,
        });
    }
    out
}

/// Extract a class definition with its documented methods.
pub(crate) fn extract_class(node: Node, src: &str, decorators: Vec<String>) -> ClassDoc {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, src).to_string())
        .unwrap_or_default();

    let bases = node
        .child_by_field_name("superclasses")
        .map(|args| base_names(args, src))
        .unwrap_or_default();

    let body = node.child_by_field_name("body");
    let doc = body.and_then(|b| block_docstring(b, src));
    let methods = body.map(|b| extract_methods(b, src)).unwrap_or_default();

    ClassDoc {
        name,
        doc,
        is_local: true,
        bases,
        methods,
        decorators,
        line: node.start_position().row + 1,
    }
}

/// Base type names as `__name__` would report them, `object` excluded.
fn base_names(args: Node, src: &str) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = args.walk();
    for arg in args.named_children(&mut cursor) {
        let name = match arg.kind() {
            "keyword_argument" | "comment" | "list_splat" | "dictionary_splat" => continue,
            _ => type_name(arg, src),
        };
        if let Some(name) = name {
            if name != "object" {
                bases.push(name);
            }
        }
    }
    bases
}

/// `typing.Generic[T]` → `Generic`, `mod.Base` → `Base`.
fn type_name(node: Node, src: &str) -> Option<String> {
    match node.kind() {
        "identifier" => Some(node_text(node, src).to_string()),
        "attribute" => node
            .child_by_field_name("attribute")
            .map(|a| node_text(a, src).to_string()),
        "subscript" => node
            .child_by_field_name("value")
            .and_then(|v| type_name(v, src)),
        "call" => node
            .child_by_field_name("function")
            .and_then(|f| type_name(f, src)),
        _ => Some(node_text(node, src).to_string()),
    }
}

/// Public methods plus `__init__`, sorted by name. Properties are skipped.
fn extract_methods(body: Node, src: &str) -> Vec<MethodDoc> {
    let mut methods: BTreeMap<String, MethodDoc> = BTreeMap::new();

    let mut cursor = body.walk();
    for stmt in body.named_children(&mut cursor) {
        let (def, decorators) = match stmt.kind() {
            "function_definition" => (stmt, Vec::new()),
            "decorated_definition" => match stmt.child_by_field_name("definition") {
                Some(def) if def.kind() == "function_definition" => {
                    (def, decorators_of(stmt, src))
                }
                _ => continue,
            },
            _ => continue,
        };

        let name = def
            .child_by_field_name("name")
            .map(|n| node_text(n, src))
            .unwrap_or_default();
        if name.starts_with('_') && name != "__init__" {
            continue;
        }
        if decorators.iter().any(|d| is_property_decorator(d)) {
            methods.remove(name);
            continue;
        }

        let is_classmethod = decorators.iter().any(|d| decorator_base(d) == "classmethod");
        let is_staticmethod = decorators.iter().any(|d| decorator_base(d) == "staticmethod");
        let mut function = extract_function(def, src, decorators);

        if is_classmethod && !function.parameters.is_empty() {
            // Bound to the class: `cls` is not part of the visible signature
            function.parameters.remove(0);
            function.signature =
                format_signature_text(&function.parameters, function.return_type.as_deref());
        }

        methods.insert(
            function.name.clone(),
            MethodDoc {
                function,
                is_classmethod,
                is_staticmethod,
            },
        );
    }

    methods.into_values().collect()
}

fn decorator_base(decorator: &str) -> &str {
    let head = decorator.split('(').next().unwrap_or(decorator).trim();
    head.rsplit('.').next().unwrap_or(head)
}

fn is_property_decorator(decorator: &str) -> bool {
    let head = decorator.split('(').next().unwrap_or(decorator).trim();
    matches!(decorator_base(decorator), "property" | "cached_property")
        || head.ends_with(".setter")
        || head.ends_with(".getter")
        || head.ends_with(".deleter")
}

fn decorators_of(decorated: Node, src: &str) -> Vec<String> {
    let mut cursor = decorated.walk();
    decorated
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .map(|d| {
            node_text(d, src)
                .trim()
                .trim_start_matches('@')
                .trim()
                .to_string()
        })
        .collect()
}

/// Cleaned docstring: the first statement of a block when it is a string.
pub(crate) fn block_docstring(block: Node, src: &str) -> Option<String> {
    let mut cursor = block.walk();
    let first = block
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    let raw = string_value(expr, src)?;
    let cleaned = clean_docstring(&raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// A list or tuple of string literals, e.g. the value of `__all__`.
fn string_list(node: Node, src: &str) -> Option<Vec<String>> {
    if !matches!(node.kind(), "list" | "tuple" | "parenthesized_expression") {
        return None;
    }
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for item in node.named_children(&mut cursor) {
        if item.kind() == "comment" {
            continue;
        }
        out.push(string_value(item, src)?);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::resolve::parse_python;
    use std::path::PathBuf;

    fn scan(name: &str, is_package: bool, source: &str) -> ModuleScan {
        let module = LoadedModule {
            name: name.to_string(),
            path: PathBuf::from("mem.py"),
            is_package,
            source: source.to_string(),
            tree: parse_python(source).unwrap(),
        };
        scan_module(&module)
    }

    fn function<'a>(scan: &'a ModuleScan, name: &str) -> &'a FunctionDoc {
        match scan.bindings.get(name) {
            Some(Binding::Item(ScannedItem::Function(f))) => f,
            other => panic!("{} is not a function: {:?}", name, other),
        }
    }

    fn class<'a>(scan: &'a ModuleScan, name: &str) -> &'a ClassDoc {
        match scan.bindings.get(name) {
            Some(Binding::Item(ScannedItem::Class(c))) => c,
            other => panic!("{} is not a class: {:?}", name, other),
        }
    }

    #[test]
    fn module_docstring() {
        let s = scan("m", false, "# comment\n\"\"\"Module doc.\n\n    More.\n\"\"\"\nX = 1\n");
        assert_eq!(s.doc.as_deref(), Some("Module doc.\n\nMore."));
    }

    #[test]
    fn parameters_in_declaration_order() {
        let src = "def f(a, b: int, c=1, d: str = 'x', *args, e, f: bool = False, **kw) -> None:\n    pass\n";
        let s = scan("m", false, src);
        let f = function(&s, "f");
        let names: Vec<_> = f.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "args", "e", "f", "kw"]);
        assert_eq!(f.parameters[0].annotation, None);
        assert_eq!(f.parameters[0].default, None);
        assert_eq!(f.parameters[1].annotation.as_deref(), Some("int"));
        assert_eq!(f.parameters[2].default.as_deref(), Some("1"));
        assert_eq!(f.parameters[4].kind, ParamKind::VarPositional);
        assert_eq!(f.parameters[5].kind, ParamKind::KeywordOnly);
        assert_eq!(f.parameters[7].kind, ParamKind::VarKeyword);
        assert_eq!(f.return_type.as_deref(), Some("None"));
        assert_eq!(
            f.signature,
            "(a, b: int, c=1, d: str = 'x', *args, e, f: bool = False, **kw) -> None"
        );
    }

    #[test]
    fn parameter_count_matches_top_level_commas() {
        let src = "def g(a: Dict[str, int], b: Callable[[int, int], str] = None, c=(1, 2)):\n    pass\n";
        let s = scan("m", false, src);
        let g = function(&s, "g");
        assert_eq!(g.parameters.len(), 3);
        let inner = &g.signature[1..g.signature.len() - 1];
        assert_eq!(crate::signature::top_level_count(inner, ','), 2);
    }

    #[test]
    fn positional_only_and_keyword_separator() {
        let s = scan("m", false, "def h(a, /, b, *, c):\n    pass\n");
        let h = function(&s, "h");
        let kinds: Vec<_> = h.parameters.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParamKind::PositionalOnly,
                ParamKind::PositionalOrKeyword,
                ParamKind::KeywordOnly
            ]
        );
        assert_eq!(h.signature, "(a, /, b, *, c)");
        // the separators are commas too: one per marker on top of N-1
        let inner = &h.signature[1..h.signature.len() - 1];
        assert_eq!(crate::signature::top_level_count(inner, ','), 4);
    }

    #[test]
    fn async_and_decorated_functions() {
        let src = "import functools\n\n@functools.lru_cache(maxsize=2)\nasync def fetch(url: str):\n    \"\"\"Fetch it.\"\"\"\n";
        let s = scan("m", false, src);
        let f = function(&s, "fetch");
        assert!(f.is_async);
        assert_eq!(f.decorators, vec!["functools.lru_cache(maxsize=2)"]);
        assert_eq!(f.doc.as_deref(), Some("Fetch it."));
        assert_eq!(f.line, 4);
    }

    #[test]
    fn class_bases_and_methods() {
        let src = r#"
class Table(Base, mod.Mixin, Generic[T], object, metaclass=Meta):
    """A table."""

    def __init__(self, rows):
        """Create.

        Longer text.
        """

    def render(self) -> str:
        pass

    def _private(self):
        pass

    @classmethod
    def from_lists(cls, rows, headers=None):
        """Build from lists."""

    @staticmethod
    def helper(x):
        pass

    @property
    def size(self):
        return 1
"#;
        let s = scan("m", false, src);
        let c = class(&s, "Table");
        assert_eq!(c.bases, vec!["Base", "Mixin", "Generic"]);
        assert_eq!(c.doc.as_deref(), Some("A table."));
        let names: Vec<_> = c.methods.iter().map(|m| m.function.name.as_str()).collect();
        assert_eq!(names, vec!["__init__", "from_lists", "helper", "render"]);

        let from_lists = &c.methods[1];
        assert!(from_lists.is_classmethod);
        assert_eq!(from_lists.function.signature, "(rows, headers=None)");
        assert!(c.methods[2].is_staticmethod);
        assert_eq!(
            c.methods[0].function.doc.as_deref(),
            Some("Create.\n\nLonger text.")
        );
    }

    #[test]
    fn class_inheriting_only_object_has_no_bases() {
        let s = scan("m", false, "class A(object):\n    pass\nclass B:\n    pass\n");
        assert!(class(&s, "A").bases.is_empty());
        assert!(class(&s, "B").bases.is_empty());
    }

    #[test]
    fn constants_and_other_values() {
        let src = "VERSION = '1.0'\nCOUNT: int = 42\nbuttons = Buttons()\nA = B = 3\nx, y = 1, 'two'\nANN: str\n";
        let s = scan("m", false, src);
        match s.bindings.get("COUNT") {
            Some(Binding::Item(ScannedItem::Constant(c))) => {
                assert_eq!(c.value, "42");
                assert_eq!(c.value_type, ValueType::Int);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(s.bindings.get("buttons"), Some(Binding::Other)));
        assert!(matches!(
            s.bindings.get("A"),
            Some(Binding::Item(ScannedItem::Constant(_)))
        ));
        assert!(matches!(
            s.bindings.get("B"),
            Some(Binding::Item(ScannedItem::Constant(_)))
        ));
        assert!(matches!(
            s.bindings.get("y"),
            Some(Binding::Item(ScannedItem::Constant(_)))
        ));
        assert!(!s.bindings.contains_key("ANN"));
    }

    #[test]
    fn later_binding_shadows_earlier() {
        let s = scan("m", false, "def thing():\n    pass\nthing = 5\n");
        assert!(matches!(
            s.bindings.get("thing"),
            Some(Binding::Item(ScannedItem::Constant(_)))
        ));
    }

    #[test]
    fn all_forms() {
        let s = scan(
            "m",
            false,
            "__all__ = ['a', \"b\"]\n__all__ += ('c',)\n__all__.extend(['d'])\n__all__.append('e')\n",
        );
        assert_eq!(
            s.all,
            Some(vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()])
        );
    }

    #[test]
    fn imports_resolve_relative_names() {
        let src = "import os.path\nimport json as j\nfrom .tags import H1, Div as D\nfrom ..core import styles\nfrom eidos.utils import stringify\nfrom .chat import *\n";
        let s = scan("eidos.components.table", false, src);
        assert!(matches!(s.bindings.get("os"), Some(Binding::ModuleRef)));
        assert!(matches!(s.bindings.get("j"), Some(Binding::ModuleRef)));
        match s.bindings.get("D") {
            Some(Binding::Import { module, name }) => {
                assert_eq!(module, "eidos.components.tags");
                assert_eq!(name, "Div");
            }
            other => panic!("unexpected {:?}", other),
        }
        match s.bindings.get("styles") {
            Some(Binding::Import { module, .. }) => assert_eq!(module, "eidos.core"),
            other => panic!("unexpected {:?}", other),
        }
        match s.bindings.get("stringify") {
            Some(Binding::Import { module, .. }) => assert_eq!(module, "eidos.utils"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(s.star_imports, vec!["eidos.components.chat"]);
    }

    #[test]
    fn relative_import_from_package_init() {
        let s = scan("eidos", true, "from .tags import H1\nfrom . import styles\n");
        match s.bindings.get("H1") {
            Some(Binding::Import { module, .. }) => assert_eq!(module, "eidos.tags"),
            other => panic!("unexpected {:?}", other),
        }
        match s.bindings.get("styles") {
            Some(Binding::Import { module, name }) => {
                assert_eq!(module, "eidos");
                assert_eq!(name, "styles");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn try_body_is_scanned() {
        let s = scan(
            "m",
            false,
            "try:\n    from fast import speedup\nexcept ImportError:\n    speedup = None\n",
        );
        assert!(matches!(s.bindings.get("speedup"), Some(Binding::Import { .. })));
    }
}
