//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the descriptor directly; a failed module becomes
//! `{"module": ..., "error": ...}`.

use crate::model::ModuleDescriptor;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, descriptor: &ModuleDescriptor) -> String {
        match serde_json::to_string_pretty(descriptor) {
            Ok(mut out) => {
                out.push('\n');
                out
            }
            Err(e) => {
                tracing::error!(module = descriptor.module_name(), error = %e, "failed to serialize descriptor");
                String::new()
            }
        }
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
