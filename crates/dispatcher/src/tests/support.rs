use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use shared::{domain::Principal, protocol::RenderContext};

use crate::{
    auth::IdentityProvider, error::RenderError, render::TemplateEngine, request::RequestContext,
};

/// Templates held in memory; every render call is recorded.
#[derive(Default)]
pub struct MemoryEngine {
    templates: HashMap<String, String>,
    pub calls: Mutex<Vec<(String, RenderContext)>>,
}

impl MemoryEngine {
    pub fn with_templates(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            templates: ids
                .iter()
                .map(|id| (id.to_string(), format!("<{id}>")))
                .collect(),
            calls: Mutex::default(),
        })
    }

    pub fn rendered(&self) -> Vec<(String, RenderContext)> {
        self.calls.lock().expect("calls").clone()
    }
}

impl TemplateEngine for MemoryEngine {
    fn exists(&self, template: &str) -> bool {
        self.templates.contains_key(template)
    }

    fn render(&self, template: &str, context: &RenderContext) -> Result<Vec<u8>, RenderError> {
        let source = self
            .templates
            .get(template)
            .ok_or_else(|| RenderError::NotFound(template.to_string()))?;
        self.calls
            .lock()
            .expect("calls")
            .push((template.to_string(), context.clone()));
        Ok(source.clone().into_bytes())
    }
}

pub struct StaticIdentity {
    pub principal: Option<Principal>,
}

impl StaticIdentity {
    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self { principal: None })
    }

    pub fn signed_in(principal: Principal) -> Arc<Self> {
        Arc::new(Self {
            principal: Some(principal),
        })
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_principal(&self, _request: &RequestContext) -> Option<Principal> {
        self.principal.clone()
    }

    fn login_url(&self, return_to: &str) -> String {
        format!("/login?continue={return_to}")
    }

    fn logout_url(&self, return_to: &str) -> String {
        format!("/logout?continue={return_to}")
    }
}
