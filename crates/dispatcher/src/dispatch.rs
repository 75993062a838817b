use std::{fmt, sync::Arc};

use shared::{
    domain::ActionName,
    error::{ApiError, HttpError},
    protocol::Outcome,
};
use tracing::{error, info, warn};

use crate::{
    auth::IdentityProvider,
    controller::{ControllerBase, ControllerRegistry},
    error::DispatchError,
    render::Renderer,
    request::RequestContext,
    resolve::resolve_action,
    route::RouteTable,
};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Status codes used for redirects signalled by actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectPolicy {
    pub permanent: u16,
    pub temporary: u16,
}

impl RedirectPolicy {
    pub fn status_for(&self, permanent: bool) -> u16 {
        if permanent {
            self.permanent
        } else {
            self.temporary
        }
    }
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self {
            permanent: 301,
            temporary: 302,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Surface error detail in response bodies.
    pub debug: bool,
    pub redirects: RedirectPolicy,
}

/// Transport-neutral response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub location: Option<String>,
    pub allow: Option<String>,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
            allow: None,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn html(body: Vec<u8>) -> Self {
        Self {
            content_type: Some(HTML_CONTENT_TYPE),
            body,
            ..Self::status(200)
        }
    }

    pub fn redirect(status: u16, url: String) -> Self {
        Self {
            location: Some(url),
            ..Self::status(status)
        }
    }

    fn with_diagnostic(mut self, diagnostic: &ApiError) -> Self {
        if let Ok(body) = serde_json::to_vec(diagnostic) {
            self.content_type = Some(JSON_CONTENT_TYPE);
            self.body = body;
        }
        self
    }
}

struct Dispatched {
    controller: String,
    action: ActionName,
    outcome: Outcome,
}

pub struct Dispatcher {
    routes: RouteTable,
    registry: ControllerRegistry,
    renderer: Renderer,
    identity: Option<Arc<dyn IdentityProvider>>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(registry: ControllerRegistry, renderer: Renderer) -> Self {
        Self {
            routes: RouteTable::conventional(),
            registry,
            renderer,
            identity: None,
            config: DispatcherConfig::default(),
        }
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    pub fn config(&self) -> DispatcherConfig {
        self.config
    }

    pub async fn dispatch(&self, request: RequestContext) -> Reply {
        let method = request.method().clone();
        let path = request.path().to_string();

        let reply = match self.run(request).await {
            Ok(dispatched) => self.complete(dispatched),
            Err(err) => self.fail(&err),
        };

        if reply.status >= 500 {
            error!(%method, %path, status = reply.status, "request failed");
        } else if reply.status >= 400 {
            warn!(%method, %path, status = reply.status, "request rejected");
        } else {
            info!(%method, %path, status = reply.status, "request served");
        }
        reply
    }

    async fn run(&self, mut request: RequestContext) -> Result<Dispatched, DispatchError> {
        let route = self
            .routes
            .match_path(request.path())
            .ok_or_else(|| DispatchError::not_found(format!("no route for '{}'", request.path())))?;
        let action = resolve_action(route.kind, request.method(), request.params())?;
        info!(
            controller = %route.controller,
            key = route.key.as_deref().unwrap_or(""),
            kind = %route.kind,
            %action,
            "dispatching"
        );

        let controller = route.controller.clone();
        let key = route.key.clone();
        request.bind_route(route);
        let base = ControllerBase::new(request).with_identity(self.identity.clone());
        let outcome = self
            .registry
            .load_and_invoke(&controller, action, key.as_deref(), base)
            .await?;

        Ok(Dispatched {
            controller,
            action,
            outcome,
        })
    }

    fn complete(&self, dispatched: Dispatched) -> Reply {
        let Dispatched {
            controller,
            action,
            outcome,
        } = dispatched;

        match outcome {
            Outcome::Rendered(context) => {
                match self.renderer.render(&controller, action, &context) {
                    Ok(body) => Reply::html(body),
                    Err(err) => self.fail(&DispatchError::Internal(err.into())),
                }
            }
            Outcome::Redirected { url, permanent } => {
                Reply::redirect(self.config.redirects.status_for(permanent), url)
            }
            Outcome::Failed { code, detail } => {
                let status = if (100..=999).contains(&code) {
                    code
                } else {
                    warn!(code, "action raised an invalid status, answering 500");
                    500
                };
                let reply = Reply::status(status);
                if self.config.debug {
                    reply.with_diagnostic(&HttpError { code: status, detail }.into())
                } else {
                    reply
                }
            }
        }
    }

    fn fail(&self, err: &DispatchError) -> Reply {
        if let DispatchError::Internal(source) = err {
            error!(error = %format!("{source:#}"), "unhandled fault during dispatch");
        }

        let mut reply = Reply::status(err.status());
        if let DispatchError::MethodNotAllowed { kind, .. } = err {
            let allow: Vec<&str> = kind.allowed_methods().iter().map(|m| m.as_str()).collect();
            reply.allow = Some(allow.join(", "));
        }
        if self.config.debug {
            reply.with_diagnostic(&ApiError::from(err))
        } else {
            reply
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes)
            .field("registry", &self.registry)
            .field("renderer", &self.renderer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
