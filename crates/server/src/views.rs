use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::Context;
use dispatcher::{RenderError, TemplateEngine};
use serde_json::Value;
use shared::protocol::RenderContext;

const EXTENSION: &str = "html";

/// `views/<controller>/<action>.html` files with `{{ name }}` placeholders.
///
/// Placeholders resolve dotted paths through the render context. Strings are
/// HTML-escaped, other values are written as escaped JSON, missing values and
/// `null` render as nothing.
#[derive(Debug, Clone)]
pub struct FileViews {
    root: PathBuf,
}

impl FileViews {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, template: &str) -> Option<PathBuf> {
        let relative = Path::new(template);
        let plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        plain.then(|| self.root.join(format!("{template}.{EXTENSION}")))
    }
}

impl TemplateEngine for FileViews {
    fn exists(&self, template: &str) -> bool {
        self.path_for(template).is_some_and(|path| path.is_file())
    }

    fn render(&self, template: &str, context: &RenderContext) -> Result<Vec<u8>, RenderError> {
        let path = self
            .path_for(template)
            .filter(|path| path.is_file())
            .ok_or_else(|| RenderError::NotFound(template.to_string()))?;
        let source = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))
            .map_err(|source| RenderError::Engine {
                template: template.to_string(),
                source,
            })?;
        Ok(substitute(&source, context).into_bytes())
    }
}

pub fn substitute(source: &str, context: &RenderContext) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after[..end].trim();
        if let Some(value) = context.lookup(name) {
            out.push_str(&escape(&display(value)));
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
