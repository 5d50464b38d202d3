//! Data model for extracted API documentation. Format-agnostic and serializable.

use serde::Serialize;
use std::fmt;

/// Result of documenting a single module.
///
/// A module either resolved and was documented, or failed to resolve. There is
/// no partial state in between.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleDescriptor {
    Documented(ModuleApi),
    Failed(ModuleError),
}

impl ModuleDescriptor {
    pub fn module_name(&self) -> &str {
        match self {
            ModuleDescriptor::Documented(api) => &api.module,
            ModuleDescriptor::Failed(err) => &err.module,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModuleDescriptor::Documented(_) => None,
            ModuleDescriptor::Failed(err) => Some(&err.error),
        }
    }

    pub fn api(&self) -> Option<&ModuleApi> {
        match self {
            ModuleDescriptor::Documented(api) => Some(api),
            ModuleDescriptor::Failed(_) => None,
        }
    }
}

/// Public surface of a module that resolved.
///
/// Each bucket is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleApi {
    pub module: String,
    pub doc: Option<String>,
    pub constants: Vec<ConstantDoc>,
    pub functions: Vec<FunctionDoc>,
    pub classes: Vec<ClassDoc>,
}

impl ModuleApi {
    /// All items in rendering order: constants, functions, classes.
    pub fn items(&self) -> impl Iterator<Item = ApiItem<'_>> {
        self.constants
            .iter()
            .map(ApiItem::Constant)
            .chain(self.functions.iter().map(ApiItem::Function))
            .chain(self.classes.iter().map(ApiItem::Class))
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty() && self.functions.is_empty() && self.classes.is_empty()
    }

    pub(crate) fn sort_items(&mut self) {
        self.constants.sort_by(|a, b| a.name.cmp(&b.name));
        self.functions.sort_by(|a, b| a.name.cmp(&b.name));
        self.classes.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleError {
    pub module: String,
    pub error: String,
}

/// Borrowed view over one documented item.
#[derive(Debug, Clone, Copy)]
pub enum ApiItem<'a> {
    Function(&'a FunctionDoc),
    Class(&'a ClassDoc),
    Constant(&'a ConstantDoc),
}

impl ApiItem<'_> {
    pub fn name(&self) -> &str {
        match self {
            ApiItem::Function(f) => &f.name,
            ApiItem::Class(c) => &c.name,
            ApiItem::Constant(c) => &c.name,
        }
    }

    /// False when the item is re-exported from another module.
    pub fn is_local(&self) -> bool {
        match self {
            ApiItem::Function(f) => f.is_local,
            ApiItem::Class(c) => c.is_local,
            ApiItem::Constant(c) => c.is_local,
        }
    }
}

/// A documented function or method.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunctionDoc {
    pub name: String,
    pub doc: Option<String>,
    pub is_local: bool,
    /// Parameter list and return clause, e.g. `(a: int, b=1) -> str`
    pub signature: String,
    pub parameters: Vec<ParameterDoc>,
    pub return_type: Option<String>,
    pub is_async: bool,
    /// Decorator expressions without the leading `@`
    pub decorators: Vec<String>,
    /// 1-based line of the `def` keyword
    pub line: usize,
}

/// A method inside a class body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MethodDoc {
    #[serde(flatten)]
    pub function: FunctionDoc,
    pub is_classmethod: bool,
    pub is_staticmethod: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassDoc {
    pub name: String,
    pub doc: Option<String>,
    pub is_local: bool,
    /// Base type names, `object` excluded
    pub bases: Vec<String>,
    pub methods: Vec<MethodDoc>,
    pub decorators: Vec<String>,
    pub line: usize,
}

/// A module-level constant of a simple literal type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstantDoc {
    pub name: String,
    pub doc: Option<String>,
    pub is_local: bool,
    /// Python `repr` of the value
    pub value: String,
    pub value_type: ValueType,
}

/// The closed set of value types a constant may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueType {
    #[serde(rename = "str")]
    Str,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "NoneType")]
    None,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Str => "str",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::None => "NoneType",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDoc {
    pub name: String,
    /// Declared type as written, `None` when untyped
    pub annotation: Option<String>,
    /// Default expression as written, `None` when required
    pub default: Option<String>,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

impl ParameterDoc {
    /// Render the parameter the way `inspect.Parameter.__str__` does.
    pub fn display(&self) -> String {
        let mut out = match self.kind {
            ParamKind::VarPositional => format!("*{}", self.name),
            ParamKind::VarKeyword => format!("**{}", self.name),
            _ => self.name.clone(),
        };
        if let Some(ref ann) = self.annotation {
            out.push_str(": ");
            out.push_str(ann);
        }
        if let Some(ref default) = self.default {
            if self.annotation.is_some() {
                out.push_str(" = ");
            } else {
                out.push('=');
            }
            out.push_str(default);
        }
        out
    }
}

/// Build a signature string from parameters, inserting the `/` and `*`
/// markers that `inspect.Signature.__str__` prints.
pub fn format_signature_text(params: &[ParameterDoc], return_type: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(params.len() + 2);
    let mut saw_var_positional = false;

    for (i, param) in params.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| params[j].kind);
        if prev == Some(ParamKind::PositionalOnly) && param.kind != ParamKind::PositionalOnly {
            parts.push("/".to_string());
        }
        if param.kind == ParamKind::VarPositional {
            saw_var_positional = true;
        }
        if param.kind == ParamKind::KeywordOnly && !saw_var_positional {
            parts.push("*".to_string());
            saw_var_positional = true;
        }
        parts.push(param.display());
    }
    if params.last().map(|p| p.kind) == Some(ParamKind::PositionalOnly) {
        parts.push("/".to_string());
    }

    let mut sig = format!("({})", parts.join(", "));
    if let Some(ret) = return_type {
        sig.push_str(" -> ");
        sig.push_str(ret);
    }
    sig
}
