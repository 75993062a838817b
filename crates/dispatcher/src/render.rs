use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use shared::{domain::ActionName, protocol::RenderContext};
use tracing::debug;

use crate::error::RenderError;

/// A template engine: looks templates up by `controller/action` id.
pub trait TemplateEngine: Send + Sync {
    fn exists(&self, template: &str) -> bool;

    fn render(&self, template: &str, context: &RenderContext) -> Result<Vec<u8>, RenderError>;
}

/// Whether `new`/`create` borrow the `edit`/`update` templates when their own is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateFallback {
    #[default]
    Enabled,
    Disabled,
}

impl From<bool> for TemplateFallback {
    fn from(enabled: bool) -> Self {
        if enabled {
            TemplateFallback::Enabled
        } else {
            TemplateFallback::Disabled
        }
    }
}

pub fn template_id(controller: &str, action: ActionName) -> String {
    format!("{controller}/{}", action.as_str())
}

fn fallback_action(action: ActionName) -> Option<ActionName> {
    match action {
        ActionName::New => Some(ActionName::Edit),
        ActionName::Create => Some(ActionName::Update),
        _ => None,
    }
}

#[derive(Clone)]
pub struct Renderer {
    engine: Arc<dyn TemplateEngine>,
    fallback: TemplateFallback,
}

impl Renderer {
    pub fn new(engine: Arc<dyn TemplateEngine>) -> Self {
        Self {
            engine,
            fallback: TemplateFallback::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: TemplateFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> TemplateFallback {
        self.fallback
    }

    /// The template that would be rendered for `controller`/`action`.
    pub fn select_template(&self, controller: &str, action: ActionName) -> String {
        let exact = template_id(controller, action);
        if self.fallback == TemplateFallback::Disabled || self.engine.exists(&exact) {
            return exact;
        }
        match fallback_action(action) {
            Some(substitute) => {
                let candidate = template_id(controller, substitute);
                if self.engine.exists(&candidate) {
                    debug!(missing = %exact, using = %candidate, "template fallback");
                    candidate
                } else {
                    exact
                }
            }
            None => exact,
        }
    }

    pub fn render(
        &self,
        controller: &str,
        action: ActionName,
        context: &RenderContext,
    ) -> Result<Vec<u8>, RenderError> {
        let template = self.select_template(controller, action);
        self.engine.render(&template, context)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
