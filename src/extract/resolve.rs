//! Module resolution: dotted names to parsed source files under the source roots.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No module named '{0}'")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid syntax ({path}, line {line})")]
    Syntax { path: PathBuf, line: usize },

    #[error("failed to initialize Python parser: {0}")]
    Parser(String),
}

/// A module's source file, read and parsed.
pub struct LoadedModule {
    pub name: String,
    pub path: PathBuf,
    /// True for `pkg/__init__.py`
    pub is_package: bool,
    pub source: String,
    pub tree: Tree,
}

impl LoadedModule {
    /// Package that relative imports in this module are resolved against.
    pub fn package(&self) -> &str {
        if self.is_package {
            &self.name
        } else {
            self.name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
        }
    }
}

/// Resolves dotted module names against an ordered list of source roots.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    roots: Vec<PathBuf>,
}

impl ModuleResolver {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        ModuleResolver { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Find the file backing `name`: `a/b/c/__init__.py` first, then `a/b/c.py`.
    /// A package directory shadows a module file of the same name.
    pub fn locate(&self, name: &str) -> Option<(PathBuf, bool)> {
        if !is_valid_module_name(name) {
            return None;
        }
        let rel: PathBuf = name.split('.').collect();
        for root in &self.roots {
            let init = root.join(&rel).join("__init__.py");
            if init.is_file() {
                return Some((init, true));
            }
            let module_file = root.join(&rel).with_extension("py");
            if module_file.is_file() {
                return Some((module_file, false));
            }
        }
        None
    }

    /// Read and parse the module. Sources with syntax errors fail to load,
    /// and so does a module whose parent package `__init__.py` does not parse.
    pub fn load(&self, name: &str) -> Result<LoadedModule, ResolveError> {
        let (path, is_package) = self
            .locate(name)
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;
        tracing::debug!(module = name, path = %path.display(), "resolved module");

        for parent in parent_packages(name) {
            if let Some((init, true)) = self.locate(parent) {
                read_and_parse(&init)?;
            }
        }

        let (source, tree) = read_and_parse(&path)?;

        Ok(LoadedModule {
            name: name.to_string(),
            path,
            is_package,
            source,
            tree,
        })
    }

    /// Submodule names of a package, sorted: `*.py` files other than
    /// `__init__.py` and subdirectories carrying an `__init__.py`.
    ///
    /// Only the first root holding the package is scanned.
    pub fn submodules(&self, package: &str) -> Vec<String> {
        let dir = match self.locate(package) {
            Some((path, true)) => match path.parent() {
                Some(dir) => dir.to_path_buf(),
                None => return Vec::new(),
            },
            _ => {
                tracing::debug!(package, "package not found");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = Vec::new();
        for pattern in [
            escaped_pattern(&dir, "*.py"),
            escaped_pattern(&dir, "*/__init__.py"),
        ] {
            let Ok(paths) = glob::glob(&pattern) else {
                continue;
            };
            for path in paths.filter_map(|p| p.ok()) {
                if let Some(stem) = submodule_stem(&path) {
                    if stem != "__init__" && is_identifier(&stem) {
                        names.push(format!("{}.{}", package, stem));
                    }
                }
            }
        }
        names.sort();
        names.dedup();
        names
    }
}

fn escaped_pattern(dir: &Path, tail: &str) -> String {
    format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        tail
    )
}

/// `pkg/mod.py` → `mod`, `pkg/sub/__init__.py` → `sub`.
fn submodule_stem(path: &Path) -> Option<String> {
    let file_stem = path.file_stem()?.to_string_lossy();
    if file_stem == "__init__" {
        let dir = path.parent()?.file_name()?;
        Some(dir.to_string_lossy().to_string())
    } else {
        Some(file_stem.to_string())
    }
}

/// `a.b.c` → `a`, `a.b`.
fn parent_packages(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices('.').map(move |(i, _)| &name[..i])
}

fn read_and_parse(path: &Path) -> Result<(String, Tree), ResolveError> {
    let source = std::fs::read_to_string(path).map_err(|source| ResolveError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = parse_python(&source)?;
    if let Some(line) = first_error_line(tree.root_node()) {
        return Err(ResolveError::Syntax {
            path: path.to_path_buf(),
            line,
        });
    }
    Ok((source, tree))
}

pub(crate) fn parse_python(source: &str) -> Result<Tree, ResolveError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ResolveError::Parser(e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or_else(|| ResolveError::Parser("parser returned no tree".to_string()))
}

/// 1-based line of the first error or missing node, if any.
fn first_error_line(node: Node) -> Option<usize> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(line) = first_error_line(child) {
            return Some(line);
        }
    }
    Some(node.start_position().row + 1)
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Dotted identifiers only, so a name always maps to a path under its root.
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}
