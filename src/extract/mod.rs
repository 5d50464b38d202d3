//! Extractor: dotted module name → [`ModuleDescriptor`].
//!
//! Modules are never imported. Each one is located under the source roots,
//! parsed with tree-sitter and its top-level bindings are classified into
//! constants, functions and classes.

pub mod literal;
pub mod python;
pub mod resolve;

use crate::config::Config;
use crate::model::{ModuleApi, ModuleDescriptor, ModuleError};
use python::{scan_module, Binding, ModuleScan, ScannedItem};
use resolve::{LoadedModule, ModuleResolver};
use std::collections::HashSet;

/// Re-export chains longer than this are abandoned.
const MAX_REEXPORT_DEPTH: usize = 16;

pub struct Extractor {
    resolver: ModuleResolver,
    modules: Vec<String>,
    packages: Vec<String>,
}

impl Extractor {
    pub fn new(resolver: ModuleResolver, modules: Vec<String>, packages: Vec<String>) -> Self {
        Extractor {
            resolver,
            modules,
            packages,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Extractor::new(
            ModuleResolver::new(config.roots.clone()),
            config.modules.clone(),
            config.packages.clone(),
        )
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Document one module. Resolution failures become
    /// [`ModuleDescriptor::Failed`]; this never errors.
    pub fn extract_module_api(&self, module_name: &str) -> ModuleDescriptor {
        match self.resolver.load(module_name) {
            Ok(loaded) => ModuleDescriptor::Documented(self.document(&loaded)),
            Err(e) => {
                tracing::debug!(module = module_name, error = %e, "module failed to resolve");
                ModuleDescriptor::Failed(ModuleError {
                    module: module_name.to_string(),
                    error: format!("Could not import module {}: {}", module_name, e),
                })
            }
        }
    }

    /// Configured modules followed by the submodules of configured packages,
    /// keeping only those that load right now.
    pub fn list_available_modules(&self) -> Vec<String> {
        let mut candidates: Vec<String> = self.modules.clone();
        for package in &self.packages {
            candidates.extend(self.resolver.submodules(package));
        }

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .filter(|name| match self.resolver.load(name) {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!(module = %name, error = %e, "dropping unavailable module");
                    false
                }
            })
            .collect()
    }

    fn document(&self, loaded: &LoadedModule) -> ModuleApi {
        let scan = scan_module(loaded);
        let exported = |name: &str| {
            scan.all
                .as_ref()
                .is_some_and(|all| all.iter().any(|n| n == name))
        };

        let mut api = ModuleApi {
            module: loaded.name.clone(),
            doc: scan.doc.clone(),
            ..Default::default()
        };

        for (name, binding) in &scan.bindings {
            if name.starts_with('_') {
                continue;
            }
            match binding {
                Binding::Item(item) => item.clone().push_into(&mut api),
                Binding::Import { module, name: original } => {
                    if !exported(name) {
                        tracing::debug!(name = %name, "skipping re-export not listed in __all__");
                        continue;
                    }
                    let mut visited = HashSet::new();
                    match self.resolve_export(module, original, &mut visited) {
                        Some(item) => item.rebind(name, false).push_into(&mut api),
                        None => tracing::debug!(name = %name, from = %module, "unresolved re-export"),
                    }
                }
                Binding::ModuleRef | Binding::Other => {
                    tracing::debug!(name = %name, "skipping non-literal member");
                }
            }
        }

        // Names in __all__ only reachable through `from x import *`
        if let Some(ref all) = scan.all {
            for name in all {
                if name.starts_with('_') || scan.bindings.contains_key(name) {
                    continue;
                }
                let mut visited = HashSet::new();
                if let Some(item) = self.resolve_star(&scan, name, &mut visited) {
                    item.rebind(name, false).push_into(&mut api);
                }
            }
        }

        api.sort_items();
        api
    }

    /// Follow `from module import name` to the defining item.
    fn resolve_export(
        &self,
        module: &str,
        name: &str,
        visited: &mut HashSet<(String, String)>,
    ) -> Option<ScannedItem> {
        if visited.len() >= MAX_REEXPORT_DEPTH
            || !visited.insert((module.to_string(), name.to_string()))
        {
            return None;
        }
        let loaded = match self.resolver.load(module) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::debug!(module, error = %e, "re-export source failed to load");
                return None;
            }
        };
        let scan = scan_module(&loaded);
        match scan.bindings.get(name) {
            Some(Binding::Item(item)) => Some(item.clone()),
            Some(Binding::Import { module, name }) => {
                let (module, name) = (module.clone(), name.clone());
                self.resolve_export(&module, &name, visited)
            }
            Some(Binding::ModuleRef) | Some(Binding::Other) => None,
            None => self.resolve_star(&scan, name, visited),
        }
    }

    /// Look `name` up through the star imports of `scan`, last one first.
    fn resolve_star(
        &self,
        scan: &ModuleScan,
        name: &str,
        visited: &mut HashSet<(String, String)>,
    ) -> Option<ScannedItem> {
        for source in scan.star_imports.iter().rev() {
            let Ok(loaded) = self.resolver.load(source) else {
                continue;
            };
            let source_scan = scan_module(&loaded);
            if !source_scan.star_exports(name) {
                continue;
            }
            if let Some(item) = self.resolve_export(source, name, visited) {
                return Some(item);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueType;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn extractor(root: &Path, modules: &[&str], packages: &[&str]) -> Extractor {
        Extractor::new(
            ModuleResolver::new(vec![root.to_path_buf()]),
            modules.iter().map(|s| s.to_string()).collect(),
            packages.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn documented(d: ModuleDescriptor) -> ModuleApi {
        match d {
            ModuleDescriptor::Documented(api) => api,
            ModuleDescriptor::Failed(e) => panic!("unexpected failure: {}", e.error),
        }
    }

    #[test]
    fn unresolvable_module_fails() {
        let dir = TempDir::new().unwrap();
        let ex = extractor(dir.path(), &[], &[]);
        let d = ex.extract_module_api("nonexistent.module.xyz");
        let err = d.error().unwrap();
        assert!(err.starts_with("Could not import module nonexistent.module.xyz:"));
        assert!(d.api().is_none());
    }

    #[test]
    fn syntax_error_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.py", "class (:\n");
        let ex = extractor(dir.path(), &[], &[]);
        assert!(ex.extract_module_api("bad").error().is_some());
    }

    #[test]
    fn empty_module_is_documented() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "empty.py", "");
        let ex = extractor(dir.path(), &[], &[]);
        let api = documented(ex.extract_module_api("empty"));
        assert!(api.is_empty());
        assert_eq!(api.doc, None);
    }

    #[test]
    fn classifies_and_sorts_members() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "pkg/mod.py",
            r#""""Things."""
import os
from typing import List

MAX = 42
NAME = "x"
RATIO = -0.5
ENABLED = True
NOTHING = None
buttons = Buttons()
_hidden = 1

def zeta(a, b: int = 2) -> List[int]:
    """Last."""

def alpha():
    pass

class Widget(object):
    """A widget."""
"#,
        );
        let ex = extractor(dir.path(), &[], &[]);
        let api = documented(ex.extract_module_api("pkg.mod"));

        assert_eq!(api.doc.as_deref(), Some("Things."));
        let consts: Vec<_> = api.constants.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(consts, vec!["ENABLED", "MAX", "NAME", "NOTHING", "RATIO"]);
        let max = &api.constants[1];
        assert_eq!(max.value, "42");
        assert_eq!(max.value_type, ValueType::Int);
        assert_eq!(api.constants[2].value, "'x'");
        assert_eq!(api.constants[3].value_type, ValueType::None);

        let funcs: Vec<_> = api.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(funcs, vec!["alpha", "zeta"]);
        assert_eq!(api.functions[1].signature, "(a, b: int = 2) -> List[int]");

        assert_eq!(api.classes.len(), 1);
        assert!(api.classes[0].bases.is_empty());
        assert!(api.items().all(|i| i.is_local()));
        // `List` is an import not listed in __all__
        assert!(!api.items().any(|i| i.name() == "List" || i.name() == "os"));
    }

    #[test]
    fn reexports_require_all() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "lib/__init__.py", "");
        write(
            dir.path(),
            "lib/core.py",
            "def helper():\n    \"\"\"Help.\"\"\"\n\nclass Base:\n    pass\n\nLIMIT = 10\n",
        );
        write(
            dir.path(),
            "lib/api.py",
            "from .core import helper, Base as Root, LIMIT\n__all__ = ['helper', 'LIMIT']\n",
        );
        let ex = extractor(dir.path(), &[], &[]);
        let api = documented(ex.extract_module_api("lib.api"));

        assert_eq!(api.functions.len(), 1);
        assert_eq!(api.functions[0].name, "helper");
        assert!(!api.functions[0].is_local);
        assert_eq!(api.functions[0].doc.as_deref(), Some("Help."));
        assert_eq!(api.constants.len(), 1);
        assert!(!api.constants[0].is_local);
        // Root is imported but not in __all__
        assert!(api.classes.is_empty());
    }

    #[test]
    fn reexport_chain_and_alias() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", "class Thing:\n    pass\n");
        write(dir.path(), "b.py", "from a import Thing\n");
        write(
            dir.path(),
            "c.py",
            "from b import Thing as Renamed\n__all__ = ['Renamed']\n",
        );
        let ex = extractor(dir.path(), &[], &[]);
        let api = documented(ex.extract_module_api("c"));
        assert_eq!(api.classes.len(), 1);
        assert_eq!(api.classes[0].name, "Renamed");
        assert!(!api.classes[0].is_local);
    }

    #[test]
    fn cyclic_reexports_terminate() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "x.py", "from y import loop\n__all__ = ['loop']\n");
        write(dir.path(), "y.py", "from x import loop\n");
        let ex = extractor(dir.path(), &[], &[]);
        let api = documented(ex.extract_module_api("x"));
        assert!(api.is_empty());
    }

    #[test]
    fn star_import_names_from_all() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "pkg/__init__.py", "from .impl import *\n__all__ = ['build', 'VERSION']\n");
        write(dir.path(), "pkg/impl.py", "VERSION = '1.2'\n\ndef build():\n    pass\n\ndef other():\n    pass\n");
        let ex = extractor(dir.path(), &[], &[]);
        let api = documented(ex.extract_module_api("pkg"));
        assert_eq!(api.functions.len(), 1);
        assert_eq!(api.functions[0].name, "build");
        assert_eq!(api.constants[0].value, "'1.2'");
    }

    #[test]
    fn module_reexport_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "pkg/__init__.py", "from . import sub\n__all__ = ['sub']\n");
        write(dir.path(), "pkg/sub.py", "X = 1\n");
        let ex = extractor(dir.path(), &[], &[]);
        let api = documented(ex.extract_module_api("pkg"));
        assert!(api.is_empty());
    }

    #[test]
    fn lists_only_resolvable_modules() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "eidos/__init__.py", "");
        write(dir.path(), "eidos/tags.py", "");
        write(dir.path(), "eidos/components/__init__.py", "");
        write(dir.path(), "eidos/components/table.py", "");
        write(dir.path(), "eidos/components/navigation.py", "");
        write(dir.path(), "eidos/components/broken.py", "def (:\n");
        let ex = extractor(
            dir.path(),
            &["eidos.tags", "eidos.styles", "eidos.tags"],
            &["eidos.components", "eidos.plugins"],
        );
        assert_eq!(
            ex.list_available_modules(),
            vec![
                "eidos.tags",
                "eidos.components.navigation",
                "eidos.components.table"
            ]
        );
        for name in ex.list_available_modules() {
            assert!(ex.extract_module_api(&name).api().is_some());
        }
    }
}
