use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use shared::{
    domain::ActionName,
    error::{ActionResult, Interrupt},
    protocol::{Outcome, RenderContext},
};
use tracing::debug;

use crate::{
    auth::{self, IdentityProvider, DEFAULT_LOGOUT_TARGET},
    error::{DispatchError, RegistryError},
    request::RequestContext,
};

/// Per-request state every controller is built from.
pub struct ControllerBase {
    request: RequestContext,
    identity: Option<Arc<dyn IdentityProvider>>,
    context: RenderContext,
}

impl ControllerBase {
    pub fn new(request: RequestContext) -> Self {
        Self {
            request,
            identity: None,
            context: RenderContext::new(),
        }
    }

    pub fn with_identity(mut self, identity: Option<Arc<dyn IdentityProvider>>) -> Self {
        self.identity = identity;
        self
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn identity(&self) -> Option<&Arc<dyn IdentityProvider>> {
        self.identity.as_ref()
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.context
    }

    pub fn take_context(&mut self) -> RenderContext {
        std::mem::take(&mut self.context)
    }

    /// See [`auth::authorize`]; logs out to `/`.
    pub fn authorize<S: AsRef<str>>(&mut self, authorized: &[S]) -> Result<bool, Interrupt> {
        auth::authorize(self, authorized, DEFAULT_LOGOUT_TARGET)
    }

    pub fn authorize_with_logout<S: AsRef<str>>(
        &mut self,
        authorized: &[S],
        logout_target: &str,
    ) -> Result<bool, Interrupt> {
        auth::authorize(self, authorized, logout_target)
    }
}

impl fmt::Debug for ControllerBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerBase")
            .field("request", &self.request)
            .field("identity", &self.identity.is_some())
            .field("context", &self.context)
            .finish()
    }
}

/// A resource controller. Every action defaults to a no-op that renders its
/// template with whatever the context holds.
#[async_trait]
pub trait Controller: Send {
    fn base(&self) -> &ControllerBase;

    fn base_mut(&mut self) -> &mut ControllerBase;

    async fn index(&mut self) -> ActionResult {
        Ok(())
    }

    async fn show(&mut self, _key: &str) -> ActionResult {
        Ok(())
    }

    async fn new(&mut self) -> ActionResult {
        Ok(())
    }

    async fn create(&mut self) -> ActionResult {
        Ok(())
    }

    async fn edit(&mut self, _key: &str) -> ActionResult {
        Ok(())
    }

    async fn update(&mut self, _key: &str) -> ActionResult {
        Ok(())
    }

    async fn destroy(&mut self, _key: &str) -> ActionResult {
        Ok(())
    }
}

pub type ControllerFactory = Arc<dyn Fn(ControllerBase) -> Box<dyn Controller> + Send + Sync>;

/// Lower-cases a controller name into its registry key.
///
/// Only ASCII alphanumerics, `_` and `-` survive; anything else (separators,
/// dots, percent escapes) is rejected outright.
pub fn normalize_controller_name(name: &str) -> Option<String> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then(|| name.to_ascii_lowercase())
}

#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(ControllerBase) -> Box<dyn Controller> + Send + Sync + 'static,
    {
        let key = normalize_controller_name(name)
            .ok_or_else(|| RegistryError::InvalidName(name.to_string()))?;
        if self.factories.contains_key(&key) {
            return Err(RegistryError::Duplicate(key));
        }
        self.factories.insert(key, Arc::new(factory));
        Ok(())
    }

    pub fn with<F>(mut self, name: &str, factory: F) -> Result<Self, RegistryError>
    where
        F: Fn(ControllerBase) -> Box<dyn Controller> + Send + Sync + 'static,
    {
        self.register(name, factory)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        normalize_controller_name(name).is_some_and(|key| self.factories.contains_key(&key))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn load(&self, name: &str, base: ControllerBase) -> Result<Box<dyn Controller>, DispatchError> {
        let key = normalize_controller_name(name)
            .ok_or_else(|| DispatchError::not_found(format!("invalid controller name '{name}'")))?;
        let factory = self
            .factories
            .get(&key)
            .ok_or_else(|| DispatchError::not_found(format!("no controller registered as '{key}'")))?;
        Ok(factory(base))
    }

    /// Builds the controller for `name`, runs `action` on it and reports how it ended.
    pub async fn load_and_invoke(
        &self,
        name: &str,
        action: ActionName,
        key: Option<&str>,
        base: ControllerBase,
    ) -> Result<Outcome, DispatchError> {
        let mut controller = self.load(name, base)?;
        debug!(controller = %name, %action, "invoking action");
        let result = invoke(controller.as_mut(), action, key).await?;

        match result {
            Ok(()) => Ok(Outcome::Rendered(controller.base_mut().take_context())),
            Err(Interrupt::Redirect(redirect)) => Ok(Outcome::Redirected {
                url: redirect.url,
                permanent: redirect.permanent,
            }),
            Err(Interrupt::Http(error)) => Ok(Outcome::Failed {
                code: error.code,
                detail: error.detail,
            }),
            Err(Interrupt::Internal(error)) => Err(DispatchError::Internal(error)),
        }
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.names())
            .finish()
    }
}

async fn invoke(
    controller: &mut dyn Controller,
    action: ActionName,
    key: Option<&str>,
) -> Result<ActionResult, DispatchError> {
    let result = match (action, key) {
        (ActionName::Index, None) => controller.index().await,
        (ActionName::New, None) => controller.new().await,
        (ActionName::Create, None) => controller.create().await,
        (ActionName::Show, Some(key)) => controller.show(key).await,
        (ActionName::Edit, Some(key)) => controller.edit(key).await,
        (ActionName::Update, Some(key)) => controller.update(key).await,
        (ActionName::Destroy, Some(key)) => controller.destroy(key).await,
        (action, key) => {
            return Err(DispatchError::not_found(format!(
                "action '{action}' cannot run {} a resource key",
                if key.is_some() { "with" } else { "without" }
            )))
        }
    };
    Ok(result)
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
