//! eidos-apidoc: API reference generation for the EidosUI Python package.
//!
//! Python modules are located under configured source roots and parsed
//! statically; the resulting [`model::ModuleDescriptor`] is rendered as
//! HTML, Markdown or JSON.

pub mod config;
pub mod docstring;
pub mod extract;
pub mod markup;
pub mod model;
pub mod render;
pub mod signature;
pub mod toc;
